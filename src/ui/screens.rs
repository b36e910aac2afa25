//! Screen bodies: menu lists, code preview and the input prompt

use crate::app::{InputState, Screen};
use crate::preview::{Preview, PAGE_LINES};
use crate::theme::Styles;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render a menu screen; the empty-listing message sits above the entries
pub fn render_menu(f: &mut Frame, area: Rect, screen: &Screen) {
    let list_area = match &screen.empty_message {
        Some(message) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(3)])
                .split(area);
            f.render_widget(
                Paragraph::new(Span::styled(format!(" {message}"), Styles::warning())),
                chunks[0],
            );
            chunks[1]
        }
        None => area,
    };

    let items: Vec<ListItem> = screen
        .entries
        .iter()
        .map(|entry| {
            let style = if entry.label.starts_with('★') {
                Styles::favorite()
            } else {
                Styles::text()
            };
            ListItem::new(entry.label.clone()).style(style)
        })
        .collect();

    let menu = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        )
        .highlight_style(Styles::selected())
        .highlight_symbol(">> ");

    let mut list_state = ListState::default().with_selected(Some(screen.selected));
    f.render_stateful_widget(menu, list_area, &mut list_state);
}

/// Render one page of a code preview with line numbers
pub fn render_preview(f: &mut Frame, area: Rect, preview: &Preview, page: usize, scroll: usize) {
    let (first_line, text) = if preview.paged {
        (page * PAGE_LINES, preview.page(page))
    } else {
        let start = scroll.min(preview.lines.len());
        (start, &preview.lines[start..])
    };
    let lines: Vec<Line> = text
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            Line::from(vec![
                Span::styled(format!("{:>5} ", first_line + offset + 1), Styles::text_muted()),
                Span::styled(text.clone(), Styles::text()),
            ])
        })
        .collect();

    let title = if preview.paged {
        format!(" Page {}/{} ", page + 1, preview.page_count())
    } else {
        format!(" {} lines ", preview.lines.len())
    };
    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title(title),
    );
    f.render_widget(body, area);
}

/// Render the line-input prompt
pub fn render_input(f: &mut Frame, area: Rect, input: &InputState) {
    let line = Line::from(vec![
        Span::styled(input.buffer.clone(), Styles::text()),
        Span::styled("_", Styles::nav_key()),
    ]);
    let prompt = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title(format!(" {} ", input.prompt)),
    );
    f.render_widget(prompt, area);
}
