//! User and device info panes of the bottom bar

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::model::{AppModel, DeviceSet};
use super::utils::truncate_string;

const VOLUME_BAR_CELLS: usize = 10;

pub fn render_user_info(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default().borders(Borders::ALL).title(" User ");
    let width = block.inner(area).width as usize;

    let lines = match &model.user {
        Some(user) => vec![
            Line::from(Span::styled(
                truncate_string(&user.display_name, width),
                Style::default().fg(Color::Green),
            )),
            Line::from(format!("Plan: {}", user.product)),
            Line::from(format!("Followers: {}", user.followers)),
        ],
        None => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn volume_bar(volume: u8) -> String {
    let filled = (volume.min(100) as usize * VOLUME_BAR_CELLS + 50) / 100;
    format!(
        "{}{} {}%",
        "█".repeat(filled),
        "░".repeat(VOLUME_BAR_CELLS - filled),
        volume
    )
}

fn device_lines(devices: &DeviceSet, width: usize) -> Vec<Line<'static>> {
    let Some(device) = devices.active_device() else {
        let (text, color) = if !devices.loaded {
            ("Loading...", Color::DarkGray)
        } else if devices.devices.is_empty() {
            ("No devices", Color::Yellow)
        } else {
            ("No active device", Color::Yellow)
        };
        return vec![Line::from(Span::styled(text, Style::default().fg(color)))];
    };

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_string(&device.name, width),
            Style::default().fg(Color::Green),
        )),
        Line::from(device.kind.clone()),
    ];
    if let Some(volume) = devices.volume {
        lines.push(Line::from(volume_bar(volume)));
    }
    lines
}

pub fn render_device_info(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default().borders(Borders::ALL).title(" Device ");
    let width = block.inner(area).width as usize;
    let lines = device_lines(&model.devices, width);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
