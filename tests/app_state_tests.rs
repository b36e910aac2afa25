//! Tests for the navigator state machine
//!
//! Drives `App` with key events over a real directory tree, without a
//! terminal.
//!
//! These tests verify:
//! - Home menu contents and unit navigation
//! - Back navigation through the screen stack
//! - Empty recent/favorite lists stay on the current screen
//! - Search input flow and script actions
//! - Status line kind after a run

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use scriptdeck::app::{App, Effect, InputPurpose, View};
use scriptdeck::catalog::resolve_path;
use scriptdeck::config::CONFIG_FILE;
use scriptdeck::launcher::RunOutcome;
use scriptdeck::session::Session;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn fixture() -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let base = resolve_path(dir.path());
    let lab = base.join("U1").join("lab1");
    fs::create_dir_all(&lab).unwrap();
    fs::write(lab.join("alpha.py"), "print('alpha')\n").unwrap();
    fs::write(lab.join("beta.py"), "print('beta')\n").unwrap();
    fs::write(
        base.join(CONFIG_FILE),
        json!({"units": {"1": "U1"}, "preferred_editor": ""}).to_string(),
    )
    .unwrap();

    let app = App::new(Session::open(&base));
    (dir, app)
}

fn press(app: &mut App, code: KeyCode) -> Effect {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn labels(app: &App) -> Vec<String> {
    app.state
        .current()
        .unwrap()
        .entries
        .iter()
        .map(|e| e.label.clone())
        .collect()
}

/// Move the selection onto the entry whose label contains `label` and press Enter
fn choose(app: &mut App, label: &str) -> Effect {
    let index = labels(app)
        .iter()
        .position(|l| l.contains(label))
        .unwrap_or_else(|| panic!("no entry {label:?} in {:?}", labels(app)));
    app.state.current_mut().unwrap().selected = index;
    press(app, KeyCode::Enter)
}

fn view(app: &App) -> &View {
    &app.state.current().unwrap().view
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_home_menu_lists_units_and_actions() {
    let (_dir, app) = fixture();
    assert_eq!(
        labels(&app),
        vec![
            "1) U1",
            "Recent",
            "Favorites",
            "Search scripts by name",
            "Edit configuration",
            "Reload configuration",
            "Quit",
        ]
    );
    assert_eq!(app.state.stack.len(), 1);
}

#[test]
fn test_drill_down_and_back() {
    let (_dir, mut app) = fixture();

    choose(&mut app, "1) U1");
    assert!(matches!(view(&app), View::Unit(unit) if unit.name == "U1"));
    assert_eq!(labels(&app)[0], "lab1");

    choose(&mut app, "lab1");
    assert!(matches!(view(&app), View::Folder(_)));
    assert_eq!(&labels(&app)[..2], &["  alpha.py", "  beta.py"]);

    choose(&mut app, "beta.py");
    assert!(matches!(view(&app), View::ScriptActions(s) if s.name == "beta.py"));
    assert_eq!(app.state.breadcrumb(), "Script Deck > U1 > lab1 > Script: beta.py");

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Esc);
    assert!(matches!(view(&app), View::Home));

    // Back on the root screen is a no-op
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.state.stack.len(), 1);
}

#[test]
fn test_selection_wraps_with_keys() {
    let (_dir, mut app) = fixture();
    press(&mut app, KeyCode::Up);
    assert_eq!(app.state.current().unwrap().selected, 6);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.state.current().unwrap().selected, 0);
}

#[test]
fn test_quit_from_menu() {
    let (_dir, mut app) = fixture();
    assert_eq!(press(&mut app, KeyCode::Char('q')), Effect::Quit);
    assert_eq!(choose(&mut app, "Quit"), Effect::Quit);
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn test_empty_recent_and_favorites_stay_home() {
    let (_dir, mut app) = fixture();

    choose(&mut app, "Recent");
    assert_eq!(app.state.stack.len(), 1);
    assert_eq!(app.state.status_message, "No recent scripts yet.");

    choose(&mut app, "Favorites");
    assert_eq!(app.state.stack.len(), 1);
    assert!(app.state.status_message.starts_with("No favorites yet"));
}

#[test]
fn test_toggle_favorite_marks_listing() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "1) U1");
    choose(&mut app, "lab1");
    choose(&mut app, "alpha.py");

    choose(&mut app, "Mark as favorite");
    assert!(labels(&app).iter().any(|l| l == "Remove from favorites"));

    press(&mut app, KeyCode::Esc);
    assert_eq!(labels(&app)[0], "★ alpha.py");

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Esc);
    choose(&mut app, "Favorites");
    assert!(matches!(view(&app), View::Scripts(_)));
    assert!(labels(&app)[0].contains("alpha.py"));
    assert!(labels(&app)[0].contains("U1/lab1"));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_flow() {
    let (_dir, mut app) = fixture();

    choose(&mut app, "Search scripts by name");
    assert!(matches!(
        app.state.input.as_ref().map(|i| &i.purpose),
        Some(InputPurpose::UnitKey)
    ));

    type_text(&mut app, "1");
    press(&mut app, KeyCode::Enter);
    assert!(matches!(
        app.state.input.as_ref().map(|i| &i.purpose),
        Some(InputPurpose::Query(_))
    ));

    // 'q' is text while typing
    type_text(&mut app, "ALPq");
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Enter);

    assert!(app.state.input.is_none());
    assert!(matches!(view(&app), View::Scripts(_)));
    assert!(labels(&app)[0].contains("alpha.py"));
}

#[test]
fn test_search_without_hits_reports() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "1) U1");
    choose(&mut app, "Search in this unit");
    type_text(&mut app, "zzz");
    press(&mut app, KeyCode::Enter);

    assert!(matches!(view(&app), View::Unit(_)));
    assert_eq!(app.state.status_message, "No scripts found.");
}

#[test]
fn test_unknown_unit_key() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "Search scripts by name");
    type_text(&mut app, "7");
    press(&mut app, KeyCode::Enter);
    assert!(app.state.input.is_none());
    assert_eq!(app.state.status_message, "Unknown unit: 7");
    assert!(app.state.status_is_error);
}

#[test]
fn test_escape_cancels_input() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "Search scripts by name");
    press(&mut app, KeyCode::Esc);
    assert!(app.state.input.is_none());
    assert_eq!(app.state.stack.len(), 1);
}

// =============================================================================
// Script actions
// =============================================================================

#[test]
fn test_run_actions_produce_effects() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "1) U1");
    choose(&mut app, "lab1");
    choose(&mut app, "alpha.py");

    match choose(&mut app, "Run") {
        Effect::Run {
            script,
            invert_confirm,
        } => {
            assert_eq!(script.name, "alpha.py");
            assert!(!invert_confirm);
        }
        other => panic!("expected run effect, got {other:?}"),
    }

    match choose(&mut app, "Run (skip confirmation)") {
        Effect::Run { invert_confirm, .. } => assert!(invert_confirm),
        other => panic!("expected run effect, got {other:?}"),
    }
}

#[test]
fn test_failed_launch_is_reported_as_error() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "1) U1");
    choose(&mut app, "lab1");
    choose(&mut app, "alpha.py");
    let Effect::Run { script, .. } = choose(&mut app, "Run") else {
        panic!("expected run effect");
    };

    app.finish_run(&script, &RunOutcome::LaunchFailed("no interpreter".to_string()));
    assert!(app.state.status_is_error);
    assert!(app.state.status_message.starts_with("alpha.py:"));

    app.finish_run(&script, &RunOutcome::Completed(0));
    assert!(!app.state.status_is_error);
}

#[test]
fn test_preview_opens_and_closes() {
    let (_dir, mut app) = fixture();
    choose(&mut app, "1) U1");
    choose(&mut app, "lab1");
    choose(&mut app, "alpha.py");
    choose(&mut app, "View code");

    match view(&app) {
        View::Preview { preview, page, .. } => {
            assert_eq!(preview.lines, vec!["print('alpha')".to_string()]);
            assert_eq!(*page, 0);
        }
        other => panic!("expected preview, got {other:?}"),
    }

    // Paging a short file stays on the only page
    press(&mut app, KeyCode::PageDown);
    assert!(matches!(view(&app), View::Preview { page: 0, .. }));

    press(&mut app, KeyCode::Char('q'));
    assert!(matches!(view(&app), View::ScriptActions(_)));
}

#[test]
fn test_help_overlay_toggles() {
    let (_dir, mut app) = fixture();
    press(&mut app, KeyCode::Char('?'));
    assert!(app.state.help_visible);
    // Any key closes help without acting
    assert_eq!(press(&mut app, KeyCode::Char('q')), Effect::None);
    assert!(!app.state.help_visible);
}
