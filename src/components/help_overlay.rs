//! Help overlay component
//!
//! Displays the bindings of the current key mode in a centered window.

use super::keybindings::{HelpSection, KeyMode, KeybindingContext};
use crate::theme::{Colors, Styles};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Help overlay component
pub struct HelpOverlay {
    content: Vec<Line<'static>>,
}

impl HelpOverlay {
    pub fn new(mode: KeyMode, keybinding_ctx: &KeybindingContext) -> Self {
        let sections = keybinding_ctx.get_help_content(mode);
        Self {
            content: Self::build_content(&sections),
        }
    }

    fn build_content(sections: &[HelpSection]) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(Span::styled("  Script Deck Help  ", Styles::title())),
            Line::from(""),
        ];

        for section in sections {
            lines.push(Line::from(Span::styled(
                format!("  {}  ", section.title),
                Style::default()
                    .fg(Colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )));

            for (key, description) in &section.items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{:<10}", key), Styles::nav_key()),
                    Span::styled(description.clone(), Styles::text()),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "Press any key to close",
            Styles::text_muted(),
        )));
        lines
    }

    pub fn line_count(&self) -> usize {
        self.content.len()
    }

    /// Render the overlay centered in `parent`
    pub fn render(&self, f: &mut Frame, parent: Rect) {
        let height = (self.content.len() as u16 + 2).min(parent.height);
        let area = centered(parent, 60, height);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(self.content.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active())
                .title("Help"),
        );
        f.render_widget(paragraph, area);
    }
}

/// Rectangle of `width_percent` width and fixed `height`, centered in `parent`
fn centered(parent: Rect, width_percent: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(parent);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_lists_every_binding() {
        let ctx = KeybindingContext::new();
        let overlay = HelpOverlay::new(KeyMode::Menu, &ctx);
        let bindings = ctx.get_help_content(KeyMode::Menu);
        let items: usize = bindings.iter().map(|s| s.items.len()).sum();
        // header (2) + per section title and trailing blank + footer
        assert_eq!(overlay.line_count(), 2 + items + bindings.len() * 2 + 1);
    }
}
