//! Player bar rendering (track line, progress gauge, controls)

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::model::{AppModel, RepeatMode};
use super::utils::{format_duration, truncate_string};

const KEYBINDINGS: &str = "space play · n/p skip · s shuffle · r repeat · a autoplay · / search · q quit";

fn context_label(model: &AppModel) -> Option<String> {
    match (model.playback.context.as_ref(), model.playing_context_name()) {
        (Some(context), Some(name)) => Some(format!("{}: {}", context.kind.label(), name)),
        (Some(context), None) => Some(context.kind.label().to_string()),
        (None, name) => name.map(str::to_string),
    }
}

fn on_off(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn render_player_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let block = Block::default().borders(Borders::ALL).title(" Now Playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);
    let width = inner.width as usize;
    let playback = &model.playback;

    let track_line = match &playback.track {
        Some(track) => {
            let mut text = format!("{} - {}", track.name, track.artist_line());
            if let Some(label) = context_label(model) {
                text = format!("{}  [{}]", text, label);
            }
            Line::from(Span::styled(
                truncate_string(&text, width),
                Style::default().add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            "No track playing",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(track_line), rows[0]);

    let clock = &playback.clock;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(clock.ratio())
        .label(format!(
            "{} / {}",
            format_duration(clock.position_ms()),
            format_duration(clock.duration_ms())
        ));
    frame.render_widget(gauge, rows[1]);

    let play_icon = if playback.is_playing() { "▶" } else { "⏸" };
    let repeat = match playback.repeat {
        RepeatMode::Track => "↻1",
        RepeatMode::Off | RepeatMode::Context => "↻",
    };
    let autoplay = if model.autoplay.enabled { "♾ Autoplay On" } else { "♾ Autoplay Off" };
    let controls = Line::from(vec![
        Span::styled("⇄", on_off(playback.shuffle)),
        Span::raw("   "),
        Span::styled(play_icon, Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled(repeat, on_off(playback.repeat != RepeatMode::Off)),
        Span::raw("   "),
        Span::styled(autoplay, on_off(model.autoplay.enabled)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(controls), rows[2]);

    let status = match &model.error_message {
        Some(error) => Line::from(Span::styled(
            truncate_string(error, width),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            truncate_string(KEYBINDINGS, width),
            Style::default().fg(Color::DarkGray),
        )),
    }
    .centered();
    frame.render_widget(Paragraph::new(status), rows[3]);
}
