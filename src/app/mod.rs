//! Navigator controller
//!
//! `App` owns the session and the screen stack. Key handling is pure state
//! manipulation that returns an [`Effect`]; the main loop performs effects
//! that need the real terminal (running a script) between frames.

mod state;

pub use state::{
    AppState, Effect, InputPurpose, InputState, MenuAction, MenuEntry, Screen, ScriptSource, View,
};

use crate::catalog::{relative_to, Script, Unit};
use crate::components::keybindings::{KeyAction, KeyMode, KeybindingContext};
use crate::error::{DeckError, Result};
use crate::launcher::{RunOutcome, TerminalPrompt};
use crate::preview::Preview;
use crate::session::Session;
use crate::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, BufRead, Stdout, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lines moved per key press in an unpaged preview
const SCROLL_STEP: usize = 10;

/// Terminal type the navigator draws on
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub struct App {
    pub session: Session,
    pub state: AppState,
    keybindings: KeybindingContext,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            state: AppState::default(),
            keybindings: KeybindingContext::new(),
        };
        app.reset_to_home();
        app.state.set_status("Welcome! Press ? for help.");
        app
    }

    pub fn keybindings(&self) -> &KeybindingContext {
        &self.keybindings
    }

    /// Which binding set applies right now
    pub fn key_mode(&self) -> KeyMode {
        if self.state.input.is_some() {
            KeyMode::Input
        } else if matches!(
            self.state.current().map(|s| &s.view),
            Some(View::Preview { .. })
        ) {
            KeyMode::Preview
        } else {
            KeyMode::Menu
        }
    }

    fn reset_to_home(&mut self) {
        let home = self.build_screen(View::Home);
        self.state.stack = vec![home];
    }

    // ------------------------------------------------------------------
    // Screen construction
    // ------------------------------------------------------------------

    fn build_screen(&self, view: View) -> Screen {
        let config = self.session.config.config();
        let (title, subtitle) = match &view {
            View::Home => (
                config.app_name.clone(),
                format!("Base: {}", config.base_dir.display()),
            ),
            View::Unit(unit) => (unit.name.clone(), unit.path.display().to_string()),
            View::Folder(folder) => (folder.name.clone(), folder.path.display().to_string()),
            View::Scripts(ScriptSource::Recent) => ("Recent".to_string(), String::new()),
            View::Scripts(ScriptSource::Favorites) => ("Favorites".to_string(), String::new()),
            View::Scripts(ScriptSource::Search { unit, query }) => (
                format!("Search results in {}", unit.name),
                format!("Query: {query}"),
            ),
            View::ScriptActions(script) => (
                format!("Script: {}", script.name),
                format!(
                    "{}  ({})",
                    relative_to(&script.path, &config.base_dir),
                    script.path.display()
                ),
            ),
            View::Preview { preview, .. } => (
                format!(
                    "Code: {}",
                    preview
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                ),
                preview.path.display().to_string(),
            ),
        };

        let mut screen = Screen::new(title, subtitle, view);
        self.fill_entries(&mut screen);
        screen
    }

    /// Rebuild the entries of `screen` from the filesystem and state
    fn fill_entries(&self, screen: &mut Screen) {
        let config = self.session.config.config();
        let catalog = self.session.catalog();
        let mut entries = Vec::new();
        let mut empty_message = None;

        match &screen.view {
            View::Home => {
                for unit in catalog.units() {
                    entries.push(MenuEntry::new(
                        format!("{}) {}", unit.key, unit.name),
                        MenuAction::OpenUnit(unit),
                    ));
                }
                entries.push(MenuEntry::new("Recent", MenuAction::ShowRecent));
                if config.favorites_enabled {
                    entries.push(MenuEntry::new("Favorites", MenuAction::ShowFavorites));
                }
                entries.push(MenuEntry::new("Search scripts by name", MenuAction::StartSearch));
                entries.push(MenuEntry::new("Edit configuration", MenuAction::EditConfig));
                entries.push(MenuEntry::new("Reload configuration", MenuAction::ReloadConfig));
                entries.push(MenuEntry::new("Quit", MenuAction::Quit));
            }
            View::Unit(unit) => {
                let folders = catalog.folders(&unit.path);
                if folders.is_empty() {
                    empty_message = Some("No subfolders (or the path does not exist).".to_string());
                }
                for folder in folders {
                    entries.push(MenuEntry::new(
                        folder.name.clone(),
                        MenuAction::EnterFolder(folder),
                    ));
                }
                entries.push(MenuEntry::new(
                    "Search in this unit",
                    MenuAction::SearchUnit(unit.clone()),
                ));
                if config.open_unit_folder_shortcut {
                    entries.push(MenuEntry::new(
                        "Open folder in file manager",
                        MenuAction::RevealFolder(unit.path.clone()),
                    ));
                }
                entries.push(MenuEntry::new("Back", MenuAction::Back));
            }
            View::Folder(folder) => {
                let scripts = catalog.scripts(&folder.path);
                if scripts.is_empty() {
                    empty_message = Some("No scripts in this folder.".to_string());
                }
                for script in scripts {
                    entries.push(MenuEntry::new(
                        self.script_label(&script, false),
                        MenuAction::SelectScript(script),
                    ));
                }
                entries.push(MenuEntry::new(
                    "Open folder in file manager",
                    MenuAction::RevealFolder(folder.path.clone()),
                ));
                entries.push(MenuEntry::new("Back", MenuAction::Back));
            }
            View::Scripts(source) => {
                let scripts = self.scripts_for(source);
                if scripts.is_empty() {
                    empty_message = Some("Nothing to show.".to_string());
                }
                for script in scripts {
                    entries.push(MenuEntry::new(
                        self.script_label(&script, true),
                        MenuAction::SelectScript(script),
                    ));
                }
                entries.push(MenuEntry::new("Back", MenuAction::Back));
            }
            View::ScriptActions(script) => {
                entries.push(MenuEntry::new("View code", MenuAction::PreviewScript(script.clone())));
                entries.push(MenuEntry::new("Run", MenuAction::RunScript(script.clone())));
                let inverted = if config.confirm_before_run {
                    "Run (skip confirmation)"
                } else {
                    "Run (with confirmation)"
                };
                entries.push(MenuEntry::new(
                    inverted,
                    MenuAction::RunScriptInverted(script.clone()),
                ));
                entries.push(MenuEntry::new("Open in editor", MenuAction::EditScript(script.clone())));
                entries.push(MenuEntry::new(
                    "Open containing folder",
                    MenuAction::RevealFolder(script.folder().to_path_buf()),
                ));
                if config.favorites_enabled {
                    let label = if self.session.is_favorite(script) {
                        "Remove from favorites"
                    } else {
                        "Mark as favorite"
                    };
                    entries.push(MenuEntry::new(label, MenuAction::ToggleFavorite(script.clone())));
                }
                entries.push(MenuEntry::new("Back", MenuAction::Back));
            }
            View::Preview { .. } => {}
        }

        screen.entries = entries;
        screen.empty_message = empty_message;
        screen.clamp_selection();
    }

    fn scripts_for(&self, source: &ScriptSource) -> Vec<Script> {
        match source {
            ScriptSource::Recent => self.session.list_recent(),
            ScriptSource::Favorites => self.session.list_favorites(),
            ScriptSource::Search { unit, query } => {
                self.session.catalog().search(&unit.path, query)
            }
        }
    }

    fn script_label(&self, script: &Script, with_location: bool) -> String {
        let favorites_enabled = self.session.config.config().favorites_enabled;
        let star = if favorites_enabled && self.session.is_favorite(script) {
            "★ "
        } else {
            "  "
        };
        if with_location {
            let base_dir = &self.session.config.config().base_dir;
            format!(
                "{star}{}   ({})",
                script.name,
                relative_to(script.folder(), base_dir)
            )
        } else {
            format!("{star}{}", script.name)
        }
    }

    fn push(&mut self, view: View) {
        let screen = self.build_screen(view);
        self.state.stack.push(screen);
    }

    /// Push a flat script list, or report `empty` when it has no scripts
    fn push_script_list(&mut self, source: ScriptSource, empty: &str) {
        if self.scripts_for(&source).is_empty() {
            self.state.set_status(empty);
            return;
        }
        self.push(View::Scripts(source));
    }

    /// Rebuild the visible screen
    pub fn refresh(&mut self) {
        if let Some(mut screen) = self.state.stack.pop() {
            self.fill_entries(&mut screen);
            self.state.stack.push(screen);
        }
    }

    fn back(&mut self) {
        if self.state.stack.len() > 1 {
            self.state.stack.pop();
            self.refresh();
        }
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    /// Apply a key press; returns work for the main loop
    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if key.kind != KeyEventKind::Press {
            return Effect::None;
        }
        if self.state.help_visible {
            self.state.help_visible = false;
            return Effect::None;
        }

        let mode = self.key_mode();
        let action = self.keybindings.resolve(mode, &key);
        match mode {
            KeyMode::Input => self.handle_input_key(key, action),
            KeyMode::Preview => self.handle_preview_key(action),
            KeyMode::Menu => self.handle_menu_key(action),
        }
    }

    fn handle_menu_key(&mut self, action: Option<KeyAction>) -> Effect {
        let Some(action) = action else {
            return Effect::None;
        };
        match action {
            KeyAction::NavigateUp => {
                if let Some(screen) = self.state.current_mut() {
                    screen.select_previous();
                }
            }
            KeyAction::NavigateDown => {
                if let Some(screen) = self.state.current_mut() {
                    screen.select_next();
                }
            }
            KeyAction::First => {
                if let Some(screen) = self.state.current_mut() {
                    screen.selected = 0;
                }
            }
            KeyAction::Last => {
                if let Some(screen) = self.state.current_mut() {
                    screen.selected = screen.entries.len().saturating_sub(1);
                }
            }
            KeyAction::Select => {
                let selected = self
                    .state
                    .current()
                    .and_then(|screen| screen.selected_entry())
                    .map(|entry| entry.action.clone());
                if let Some(menu_action) = selected {
                    return self.activate(menu_action);
                }
            }
            KeyAction::Back => self.back(),
            KeyAction::Help => self.state.help_visible = true,
            KeyAction::Quit => return Effect::Quit,
            _ => {}
        }
        Effect::None
    }

    fn handle_preview_key(&mut self, action: Option<KeyAction>) -> Effect {
        match action {
            Some(KeyAction::Quit) => return Effect::Quit,
            Some(KeyAction::Back) => self.back(),
            Some(KeyAction::Help) => self.state.help_visible = true,
            Some(KeyAction::NextPage) | Some(KeyAction::PreviousPage) => {
                let forward = action == Some(KeyAction::NextPage);
                if let Some(Screen {
                    view: View::Preview {
                        preview,
                        page,
                        scroll,
                    },
                    ..
                }) = self.state.current_mut()
                {
                    if preview.paged {
                        let last = preview.page_count().saturating_sub(1);
                        *page = if forward {
                            (*page + 1).min(last)
                        } else {
                            page.saturating_sub(1)
                        };
                    } else {
                        let last = preview.lines.len().saturating_sub(1);
                        *scroll = if forward {
                            (*scroll + SCROLL_STEP).min(last)
                        } else {
                            scroll.saturating_sub(SCROLL_STEP)
                        };
                    }
                }
            }
            _ => {}
        }
        Effect::None
    }

    fn handle_input_key(&mut self, key: KeyEvent, action: Option<KeyAction>) -> Effect {
        match action {
            Some(KeyAction::Quit) => return Effect::Quit,
            Some(KeyAction::Submit) => self.submit_input(),
            Some(KeyAction::Cancel) => self.state.input = None,
            Some(KeyAction::DeleteChar) => {
                if let Some(input) = self.state.input.as_mut() {
                    input.buffer.pop();
                }
            }
            _ => {
                if let KeyCode::Char(c) = key.code {
                    if !key.modifiers.contains(KeyModifiers::CONTROL) {
                        if let Some(input) = self.state.input.as_mut() {
                            input.buffer.push(c);
                        }
                    }
                }
            }
        }
        Effect::None
    }

    fn begin_input(&mut self, purpose: InputPurpose) {
        let prompt = match &purpose {
            InputPurpose::UnitKey => {
                let keys: Vec<String> = self
                    .session
                    .catalog()
                    .units()
                    .into_iter()
                    .map(|u| u.key)
                    .collect();
                format!("Unit ({})", keys.join(", "))
            }
            InputPurpose::Query(unit) => format!("Search in {} (part of the name)", unit.name),
        };
        self.state.input = Some(InputState {
            purpose,
            prompt,
            buffer: String::new(),
        });
    }

    fn submit_input(&mut self) {
        let Some(input) = self.state.input.take() else {
            return;
        };
        let value = input.buffer.trim().to_string();

        match input.purpose {
            InputPurpose::UnitKey => match self.session.catalog().unit(&value) {
                Some(unit) => self.begin_input(InputPurpose::Query(unit)),
                None => self.state.set_error(format!("Unknown unit: {value}")),
            },
            InputPurpose::Query(unit) => {
                if value.is_empty() {
                    return;
                }
                self.search(unit, value);
            }
        }
    }

    fn search(&mut self, unit: Unit, query: String) {
        debug!(unit = %unit.name, query = %query, "Searching");
        self.push_script_list(ScriptSource::Search { unit, query }, "No scripts found.");
    }

    /// Perform a menu action
    pub fn activate(&mut self, action: MenuAction) -> Effect {
        match action {
            MenuAction::OpenUnit(unit) => self.push(View::Unit(unit)),
            MenuAction::ShowRecent => {
                self.push_script_list(ScriptSource::Recent, "No recent scripts yet.")
            }
            MenuAction::ShowFavorites => self.push_script_list(
                ScriptSource::Favorites,
                "No favorites yet. Mark one from a script's menu.",
            ),
            MenuAction::StartSearch => self.begin_input(InputPurpose::UnitKey),
            MenuAction::SearchUnit(unit) => self.begin_input(InputPurpose::Query(unit)),
            MenuAction::EditConfig => {
                let path = self.session.config.path().to_path_buf();
                if let Err(e) = self.session.launcher().open_in_editor(&path) {
                    warn!(error = %e, "Could not open configuration in editor");
                    self.state.set_error(format!("Could not open the editor: {e}"));
                } else {
                    self.session.reload_config();
                    self.reset_to_home();
                    self.state
                        .set_status("Configuration opened. Use \"Reload configuration\" after saving.");
                }
            }
            MenuAction::ReloadConfig => {
                self.session.reload_config();
                self.reset_to_home();
                self.state.set_status("Configuration reloaded.");
            }
            MenuAction::EnterFolder(folder) => self.push(View::Folder(folder)),
            MenuAction::SelectScript(script) => self.push(View::ScriptActions(script)),
            MenuAction::PreviewScript(script) => {
                let limit = self.session.config.config().code_preview_lines;
                match Preview::load(&script.path, limit) {
                    Ok(preview) => self.push(View::Preview {
                        preview,
                        page: 0,
                        scroll: 0,
                    }),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        self.state.set_error("The file was not found.");
                    }
                    Err(e) => {
                        self.state.set_error(format!("Error reading the file: {e}"));
                    }
                }
            }
            MenuAction::RunScript(script) => {
                return Effect::Run {
                    script,
                    invert_confirm: false,
                };
            }
            MenuAction::RunScriptInverted(script) => {
                return Effect::Run {
                    script,
                    invert_confirm: true,
                };
            }
            MenuAction::EditScript(script) => {
                if let Err(e) = self.session.launcher().open_in_editor(&script.path) {
                    self.state.set_error(format!("Could not open the editor: {e}"));
                }
            }
            MenuAction::ToggleFavorite(script) => {
                let now_favorite = self.session.toggle_favorite(&script);
                self.state.set_status(if now_favorite {
                    format!("{} marked as favorite.", script.name)
                } else {
                    format!("{} removed from favorites.", script.name)
                });
                self.refresh();
            }
            MenuAction::RevealFolder(path) => self.session.launcher().open_folder(&path),
            MenuAction::Back => self.back(),
            MenuAction::Quit => return Effect::Quit,
        }
        Effect::None
    }

    /// Record the outcome of a run in the status line
    pub fn finish_run(&mut self, script: &Script, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Cancelled => self.state.set_status("Run cancelled."),
            RunOutcome::LaunchFailed(_) | RunOutcome::Signaled(_) => {
                self.state.set_error(format!("{}: {}", script.name, outcome))
            }
            other => self.state.set_status(format!("{}: {}", script.name, other)),
        }
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Main loop
    // ------------------------------------------------------------------

    pub fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        info!("Starting navigator loop");
        loop {
            terminal
                .draw(|f| ui::render(f, self))
                .map_err(|e| DeckError::terminal(format!("Failed to draw: {e}")))?;

            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match self.handle_key(key) {
                    Effect::None => {}
                    Effect::Quit => break,
                    Effect::Run {
                        script,
                        invert_confirm,
                    } => self.run_outside_tui(terminal, &script, invert_confirm)?,
                }
            }
        }
        info!("Navigator loop finished");
        Ok(())
    }

    /// Leave the alternate screen, run the script on the plain terminal, and
    /// come back once the user has read the result
    fn run_outside_tui(&mut self, terminal: &mut Tui, script: &Script, invert_confirm: bool) -> Result<()> {
        leave_tui()?;

        let base_dir = self.session.config.config().base_dir.clone();
        println!("Script: {}", script.name);
        println!("Path: {}", relative_to(&script.path, &base_dir));
        println!("{}", "-".repeat(60));

        let outcome = self
            .session
            .run_configured(script, invert_confirm, &mut TerminalPrompt);

        println!();
        println!("{}", "-".repeat(60));
        println!("{outcome}");
        wait_for_enter();

        enter_tui()?;
        terminal
            .clear()
            .map_err(|e| DeckError::terminal(format!("Failed to clear terminal: {e}")))?;
        self.finish_run(script, &outcome);
        Ok(())
    }
}

fn wait_for_enter() {
    print!("\nPress Enter to continue...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

/// Switch the terminal into raw mode on the alternate screen
pub fn enter_tui() -> Result<()> {
    enable_raw_mode().map_err(|e| DeckError::terminal(format!("Failed to enable raw mode: {e}")))?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)
        .map_err(|e| DeckError::terminal(format!("Failed to enter alternate screen: {e}")))?;
    Ok(())
}

/// Restore the normal terminal
pub fn leave_tui() -> Result<()> {
    disable_raw_mode().map_err(|e| DeckError::terminal(format!("Failed to disable raw mode: {e}")))?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show)
        .map_err(|e| DeckError::terminal(format!("Failed to leave alternate screen: {e}")))?;
    Ok(())
}
