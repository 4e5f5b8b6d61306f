//! Utility functions for rendering UI components

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .padding(Padding::horizontal(1))
        .border_style(if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        })
}

pub fn item_style(selected: bool, focused: bool) -> Style {
    if selected && focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn format_duration(ms: u32) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Cut `s` to at most `max_width` terminal columns, ending in "..." when
/// anything was dropped.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width >= 3 {
        out.push_str("...");
    }
    out
}

/// Inner text width of a bordered, horizontally padded panel
pub fn content_width(area: Rect) -> usize {
    area.width.saturating_sub(4) as usize
}
