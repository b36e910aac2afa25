//! Title block, status line and navigation bar

use crate::app::Screen;
use crate::components::keybindings::NavBarItem;
use crate::theme::Styles;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the screen title with its breadcrumb and subtitle
pub fn render_title(f: &mut Frame, area: Rect, screen: &Screen, breadcrumb: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let lines = vec![
        Line::from(Span::styled(screen.subtitle.clone(), Styles::text_secondary())),
        Line::from(Span::styled(breadcrumb.to_string(), Styles::text_muted())),
    ];
    let title = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title(Span::styled(format!(" {} ", screen.title), Styles::title())),
    );
    f.render_widget(title, area);
}

/// Render the last status message, in red when it reports a failure
pub fn render_status(f: &mut Frame, area: Rect, message: &str, is_error: bool) {
    let style = if is_error {
        Styles::error()
    } else {
        Styles::success()
    };
    let status = Paragraph::new(message.to_string())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

/// Render the key hints for the current mode
pub fn render_nav_bar(f: &mut Frame, area: Rect, items: &[NavBarItem]) {
    let mut spans = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  |  ", Styles::nav_hint()));
        }
        spans.push(Span::styled(item.key_display.clone(), Styles::nav_key()));
        spans.push(Span::styled(format!(" {}", item.action_label), Styles::nav_hint()));
    }
    let bar = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(bar, area);
}
