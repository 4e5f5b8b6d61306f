//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! Rendering is a pure function of the `AppModel`.
//!
//! - `utils`: Shared helpers (formatting, truncation, scrollable lists)
//! - `layout`: Panel structure and the sidebar
//! - `content`: Main panel, search view and queue panel
//! - `progress`: Player bar
//! - `panels`: User and device info panes

mod utils;
mod layout;
mod content;
mod progress;
mod panels;

use ratatui::Frame;

use crate::model::AppModel;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, model: &AppModel) {
        let area = frame.area();
        if layout::is_too_small(area) {
            layout::render_too_small(frame, area);
            return;
        }

        let panes = layout::calculate_layout(area);

        layout::render_sidebar(frame, panes.sidebar, model);
        content::render_main_content(frame, panes.main, model);
        content::render_queue(frame, panes.queue, model);

        panels::render_user_info(frame, panes.user, model);
        progress::render_player_bar(frame, panes.player, model);
        panels::render_device_info(frame, panes.device, model);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::model::{
        ArtistRef, PlaybackContext, PlaybackState, PlaylistItem, PlaylistSource, SearchSession,
        StartedContext, Track,
    };

    fn track(id: &str, name: &str) -> Track {
        Track {
            id: id.into(),
            name: name.into(),
            artists: vec![ArtistRef { id: format!("{}-ar", id), name: "Band".into() }],
            album: "Album".into(),
            duration_ms: 200_000,
        }
    }

    fn draw(model: &AppModel, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| AppView::render(frame, model)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn small_terminal_shows_notice() {
        let model = AppModel::new(Instant::now(), false);
        let screen = draw(&model, 80, 24);
        assert!(screen.contains("Terminal too small"));
        assert!(!screen.contains("My Library"));
    }

    #[test]
    fn empty_model_renders_all_panels() {
        let model = AppModel::new(Instant::now(), false);
        let screen = draw(&model, 120, 30);
        assert!(screen.contains("My Library"));
        assert!(screen.contains("Queue is empty"));
        assert!(screen.contains("No track playing"));
        assert!(screen.contains("Autoplay Off"));
    }

    #[test]
    fn playing_track_and_error_are_shown() {
        let now = Instant::now();
        let mut model = AppModel::new(now, true);
        model.set_playlists(vec![PlaylistItem {
            id: "p1".into(),
            name: "Road Trip".into(),
            uri: "spotify:playlist:p1".into(),
            track_count: 2,
        }]);
        model.apply_playback(
            PlaybackState {
                track: Some(track("t1", "Current Song")),
                progress_ms: 60_000,
                is_playing: true,
                ..Default::default()
            },
            now,
        );
        model.set_queue(vec![track("q1", "Next Up")]);
        model.set_error("Device not found".into());

        let screen = draw(&model, 120, 30);
        assert!(screen.contains("Road Trip"));
        assert!(screen.contains("Current Song"));
        assert!(screen.contains("Next Up"));
        assert!(screen.contains("1:00 / 3:20"));
        assert!(screen.contains("Device not found"));
        assert!(screen.contains("Autoplay On"));
    }

    #[test]
    fn loading_and_now_playing_marker() {
        let now = Instant::now();
        let mut model = AppModel::new(now, false);
        let source = PlaylistSource::Playlist {
            id: "p1".into(),
            uri: "spotify:playlist:p1".into(),
        };
        assert!(model.browse.begin_loading(source.clone(), "Mix".into()));
        assert!(draw(&model, 120, 30).contains("Loading tracks…"));

        model
            .browse
            .finish_loading(&source, vec![track("t1", "First"), track("t2", "Second")], None);
        model.apply_playback(
            PlaybackState {
                track: Some(track("t2", "Second")),
                is_playing: true,
                ..Default::default()
            },
            now,
        );
        let screen = draw(&model, 120, 30);
        assert!(screen.contains("♫"));
        assert!(screen.contains("Mix (2)"));
    }

    #[test]
    fn context_name_is_dropped_when_playback_moves_elsewhere() {
        let now = Instant::now();
        let mut model = AppModel::new(now, false);
        model.started_context = Some(StartedContext {
            uri: Some("spotify:playlist:p1".into()),
            name: "Road Trip".into(),
        });
        let playing_in = |uri: &str| PlaybackState {
            track: Some(track("t1", "Song")),
            is_playing: true,
            context: Some(PlaybackContext::from_uri(uri)),
            ..Default::default()
        };

        model.apply_playback(playing_in("spotify:playlist:p1"), now);
        assert!(draw(&model, 120, 30).contains("[Playlist: Road Trip]"));

        model.apply_playback(playing_in("spotify:album:a1"), now);
        let screen = draw(&model, 120, 30);
        assert!(screen.contains("[Album]"));
        assert!(!screen.contains("Road Trip"));
    }

    #[test]
    fn search_view_replaces_track_list() {
        let mut model = AppModel::new(Instant::now(), false);
        let mut search = SearchSession::default();
        for c in "jazz".chars() {
            search.push_char(c);
        }
        model.search = Some(search);
        let screen = draw(&model, 120, 30);
        assert!(screen.contains("Search"));
        assert!(screen.contains("jazz"));
    }
}
