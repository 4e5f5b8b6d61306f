//! Main content area and queue rendering

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, Paragraph},
};

use crate::model::{AppModel, FocusPanel, PlaylistItem, SearchSession, Track, TrackRow};
use super::utils::{content_width, format_duration, item_style, panel_block, render_scrollable_list, truncate_string};

/// Anything shown as one row of a list panel
pub enum ListEntry<'a> {
    Playlist(&'a PlaylistItem),
    Track { index: usize, row: &'a TrackRow },
    Queued { position: usize, track: &'a Track },
    SearchHit(&'a Track),
}

impl ListEntry<'_> {
    pub fn render(&self, width: usize, selected: bool, focused: bool) -> ListItem<'static> {
        let style = item_style(selected, focused);
        match self {
            ListEntry::Playlist(item) => {
                ListItem::new(truncate_string(&item.name, width)).style(style)
            }
            ListEntry::Track { index, row } => {
                let marker = if row.now_playing { "♫ " } else { "  " };
                let style = if row.now_playing && !selected {
                    style.fg(Color::Green)
                } else {
                    style
                };
                track_line(marker, &format!("{:>3} ", index + 1), &row.track, width, style)
            }
            ListEntry::Queued { position, track } => {
                track_line("", &format!("{:>2}. ", position + 1), track, width, style)
            }
            ListEntry::SearchHit(track) => track_line("", "", track, width, style),
        }
    }
}

fn track_line(marker: &str, prefix: &str, track: &Track, width: usize, style: Style) -> ListItem<'static> {
    let duration = format_duration(track.duration_ms);
    let fixed = marker.chars().count() + prefix.len() + duration.len() + 1;
    let text_width = width.saturating_sub(fixed);
    let title = truncate_string(&format!("{} - {}", track.name, track.artist_line()), text_width);
    let padding = text_width.saturating_sub(unicode_width::UnicodeWidthStr::width(title.as_str()));

    ListItem::new(Line::from(vec![
        Span::styled(format!("{}{}{}", marker, prefix, title), style),
        Span::raw(" ".repeat(padding + 1)),
        Span::styled(duration, Style::default().fg(Color::DarkGray)),
    ]))
}

pub fn render_main_content(frame: &mut Frame, area: Rect, model: &AppModel) {
    let focused = model.focus == FocusPanel::Main;

    if let Some(search) = &model.search {
        render_search(frame, area, search);
        return;
    }

    let browse = &model.browse;
    if browse.loading {
        let loading = Paragraph::new("Loading tracks…")
            .style(Style::default().fg(Color::Yellow))
            .block(panel_block(&browse.name, focused));
        frame.render_widget(loading, area);
        return;
    }

    if browse.source.is_none() {
        let hint = Paragraph::new("Select a playlist and press Enter\n\nTab/Shift+Tab switch panels\n/ searches tracks\na toggles autoplay")
            .style(Style::default().fg(Color::DarkGray))
            .block(panel_block("Tracks", focused));
        frame.render_widget(hint, area);
        return;
    }

    let width = content_width(area);
    let items: Vec<ListItem> = browse
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| ListEntry::Track { index, row }.render(width, index == browse.selected, focused))
        .collect();
    let title = format!("{} ({})", browse.name, browse.rows.len());
    render_scrollable_list(frame, area, items, browse.selected, panel_block(&title, focused));
}

fn render_search(frame: &mut Frame, area: Rect, search: &SearchSession) {
    let block = panel_block("Search", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let status = if search.searching {
        "searching...".to_string()
    } else if search.results_query.is_some() {
        format!("{} results", search.results.len())
    } else {
        "Enter to search, Esc to cancel".to_string()
    };
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Green)),
            Span::styled(search.query.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("▏", Style::default().fg(Color::Green)),
        ]),
        Line::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
    ]);
    frame.render_widget(header, chunks[0]);

    let width = chunks[1].width as usize;
    let items: Vec<ListItem> = search
        .results
        .iter()
        .enumerate()
        .map(|(i, track)| ListEntry::SearchHit(track).render(width, i == search.selected, true))
        .collect();
    render_scrollable_list(frame, chunks[1], items, search.selected, ratatui::widgets::Block::default());
}

pub fn render_queue(frame: &mut Frame, area: Rect, model: &AppModel) {
    let focused = model.focus == FocusPanel::Queue;
    let queue = &model.queue;
    let block = panel_block(&format!("Queue ({})", queue.len()), focused);

    if queue.is_empty() {
        let empty = Paragraph::new("Queue is empty")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = content_width(area);
    let items: Vec<ListItem> = queue
        .tracks
        .iter()
        .enumerate()
        .map(|(position, track)| {
            ListEntry::Queued { position, track }.render(width, position == queue.selected, focused)
        })
        .collect();
    render_scrollable_list(frame, area, items, queue.selected, block);
}
