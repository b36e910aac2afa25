//! User interface rendering
//!
//! - `header` - title, breadcrumb, status line and navigation bar
//! - `screens` - menu lists, code preview and the input prompt

mod header;
mod screens;

use crate::app::{App, View};
use crate::components::help_overlay::HelpOverlay;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Draw one frame of the navigator
pub fn render(f: &mut Frame, app: &App) {
    let Some(screen) = app.state.current() else {
        return;
    };
    let mode = app.key_mode();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + subtitle
            Constraint::Min(5),    // Body
            Constraint::Length(3), // Input prompt or status
            Constraint::Length(1), // Nav bar
        ])
        .split(f.area());

    header::render_title(f, chunks[0], screen, &app.state.breadcrumb());

    match &screen.view {
        View::Preview {
            preview,
            page,
            scroll,
        } => screens::render_preview(f, chunks[1], preview, *page, *scroll),
        _ => screens::render_menu(f, chunks[1], screen),
    }

    match &app.state.input {
        Some(input) => screens::render_input(f, chunks[2], input),
        None => header::render_status(
            f,
            chunks[2],
            &app.state.status_message,
            app.state.status_is_error,
        ),
    }

    header::render_nav_bar(f, chunks[3], &app.keybindings().get_nav_items(mode));

    if app.state.help_visible {
        HelpOverlay::new(mode, app.keybindings()).render(f, f.area());
    }
}
