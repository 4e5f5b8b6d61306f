//! Layout rendering (panel structure, sidebar)

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{ListItem, Paragraph},
};

use crate::model::{AppModel, FocusPanel};
use super::content::ListEntry;
use super::utils::{content_width, panel_block, render_scrollable_list};

pub const MIN_WIDTH: u16 = 100;
pub const MIN_HEIGHT: u16 = 15;
const BOTTOM_BAR_HEIGHT: u16 = 6;

/// Areas of the three top panels and the three bottom panes
pub struct AppLayout {
    pub sidebar: Rect,
    pub main: Rect,
    pub queue: Rect,
    pub user: Rect,
    pub player: Rect,
    pub device: Rect,
}

fn split_3_4_3(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(3, 10),
            Constraint::Ratio(4, 10),
            Constraint::Ratio(3, 10),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

pub fn calculate_layout(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(BOTTOM_BAR_HEIGHT)])
        .split(area);

    let [sidebar, main, queue] = split_3_4_3(rows[0]);
    let [user, player, device] = split_3_4_3(rows[1]);
    AppLayout { sidebar, main, queue, user, player, device }
}

pub fn is_too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

pub fn render_too_small(frame: &mut Frame, area: Rect) {
    let text = format!(
        "Terminal too small\n\nNeed at least {}x{}, have {}x{}",
        MIN_WIDTH, MIN_HEIGHT, area.width, area.height
    );
    let notice = Paragraph::new(text).style(Style::default().fg(Color::Yellow));
    frame.render_widget(notice, area);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let focused = model.focus == FocusPanel::Sidebar;
    let width = content_width(area);
    let items: Vec<ListItem> = model
        .playlists
        .iter()
        .enumerate()
        .map(|(i, item)| ListEntry::Playlist(item).render(width, i == model.playlist_selected, focused))
        .collect();

    render_scrollable_list(
        frame,
        area,
        items,
        model.playlist_selected,
        panel_block("My Library", focused),
    );
}
