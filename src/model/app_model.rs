//! Main application model with state management methods

use std::time::Instant;

use super::autoplay::AutoplayState;
use super::content::{BrowseContext, QueueView, SearchSession, step_down, step_up};
use super::playback::{PlaybackSnapshot, PlaybackState};
use super::types::{DeviceInfo, DeviceSet, FocusPanel, PlaylistItem, StartedContext, Track, UserProfile};

/// Everything the client knows. Owned by the controller and only mutated
/// there; the view borrows it immutably once per frame.
#[derive(Clone, Debug)]
pub struct AppModel {
    pub playback: PlaybackSnapshot,
    /// Context last started from this client
    pub started_context: Option<StartedContext>,
    pub playlists: Vec<PlaylistItem>,
    pub playlist_selected: usize,
    pub browse: BrowseContext,
    pub queue: QueueView,
    pub devices: DeviceSet,
    pub search: Option<SearchSession>,
    pub autoplay: AutoplayState,
    pub focus: FocusPanel,
    pub user: Option<UserProfile>,
    pub error_message: Option<String>,
    pub should_quit: bool,
}

impl AppModel {
    pub fn new(now: Instant, autoplay_enabled: bool) -> Self {
        Self {
            playback: PlaybackSnapshot::new(now),
            started_context: None,
            playlists: vec![PlaylistItem::liked_songs()],
            playlist_selected: 0,
            browse: BrowseContext::default(),
            queue: QueueView::default(),
            devices: DeviceSet::default(),
            search: None,
            autoplay: AutoplayState::new(autoplay_enabled),
            focus: FocusPanel::default(),
            user: None,
            error_message: None,
            should_quit: false,
        }
    }

    pub fn set_playlists(&mut self, playlists: Vec<PlaylistItem>) {
        let mut all = Vec::with_capacity(playlists.len() + 1);
        all.push(PlaylistItem::liked_songs());
        all.extend(playlists.into_iter().filter(|p| !p.is_liked()));
        self.playlist_selected = self.playlist_selected.min(all.len() - 1);
        self.playlists = all;
    }

    pub fn selected_playlist(&self) -> Option<&PlaylistItem> {
        self.playlists.get(self.playlist_selected)
    }

    /// Apply a fetched playback state, moving the now-playing marker in the
    /// open track list when the track changed. The reported device is
    /// folded into the device set even when nothing is playing.
    pub fn apply_playback(&mut self, mut state: PlaybackState, now: Instant) {
        if let Some(device) = state.device.take() {
            self.devices.sync_active(device);
        }
        if self.playback.apply(state, now) {
            if let Some(track) = &self.playback.track {
                tracing::debug!(track = %track.name, "Now playing changed");
            }
            let id = self.playback.track_id().map(str::to_string);
            self.browse.mark_now_playing(id.as_deref());
        }
    }

    /// Name of the context this client started, while the server still
    /// reports playback in that same context.
    pub fn playing_context_name(&self) -> Option<&str> {
        let started = self.started_context.as_ref()?;
        let current = self.playback.context.as_ref().map(|c| c.uri.as_str());
        (started.uri.as_deref() == current).then_some(started.name.as_str())
    }

    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        self.queue.replace(tracks);
    }

    pub fn set_devices(&mut self, devices: Vec<DeviceInfo>) {
        self.devices.replace(devices);
    }

    pub fn set_error(&mut self, message: String) {
        tracing::warn!(error = %message, "UI error");
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    pub fn cycle_focus_forward(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn cycle_focus_backward(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn move_selection_up(&mut self) {
        if let Some(search) = self.search.as_mut() {
            search.move_up();
            return;
        }
        match self.focus {
            FocusPanel::Sidebar => step_up(&mut self.playlist_selected),
            FocusPanel::Main => self.browse.move_up(),
            FocusPanel::Queue => self.queue.move_up(),
        }
    }

    pub fn move_selection_down(&mut self) {
        if let Some(search) = self.search.as_mut() {
            search.move_down();
            return;
        }
        match self.focus {
            FocusPanel::Sidebar => step_down(&mut self.playlist_selected, self.playlists.len()),
            FocusPanel::Main => self.browse.move_down(),
            FocusPanel::Queue => self.queue.move_down(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::PlaylistSource;
    use crate::model::types::PlaybackContext;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: id.to_string(),
            artists: vec![],
            album: String::new(),
            duration_ms: 100_000,
        }
    }

    fn playlist(id: &str) -> PlaylistItem {
        PlaylistItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            uri: format!("spotify:playlist:{id}"),
            track_count: 1,
        }
    }

    #[test]
    fn liked_songs_is_always_first() {
        let mut model = AppModel::new(Instant::now(), false);
        model.set_playlists(vec![playlist("a"), playlist("b")]);
        assert_eq!(model.playlists.len(), 3);
        assert!(model.playlists[0].is_liked());
        assert_eq!(model.playlists[1].id, "a");
    }

    #[test]
    fn track_change_moves_marker() {
        let now = Instant::now();
        let mut model = AppModel::new(now, false);
        let source = PlaylistSource::from_item(&playlist("p"));
        model.browse.begin_loading(source.clone(), "P".into());
        model.browse.finish_loading(&source, vec![track("a"), track("b")], None);

        model.apply_playback(
            PlaybackState {
                track: Some(track("b")),
                is_playing: true,
                ..Default::default()
            },
            now,
        );
        assert!(!model.browse.rows[0].now_playing);
        assert!(model.browse.rows[1].now_playing);
    }

    #[test]
    fn playback_device_refreshes_volume_between_polls() {
        let now = Instant::now();
        let mut model = AppModel::new(now, false);
        model.set_devices(vec![DeviceInfo {
            id: "d1".into(),
            name: "Desk".into(),
            kind: "Computer".into(),
            is_active: true,
            volume: Some(30),
        }]);

        // no track: the snapshot stays empty but the device still counts
        model.apply_playback(
            PlaybackState {
                device: Some(DeviceInfo {
                    id: "d1".into(),
                    name: "Desk".into(),
                    kind: "Computer".into(),
                    is_active: true,
                    volume: Some(80),
                }),
                ..Default::default()
            },
            now,
        );
        assert!(model.playback.track.is_none());
        assert_eq!(model.devices.volume, Some(80));
        assert_eq!(model.devices.active, Some(0));
    }

    #[test]
    fn started_context_name_only_matches_its_own_uri() {
        let now = Instant::now();
        let mut model = AppModel::new(now, false);
        model.started_context = Some(StartedContext {
            uri: Some("spotify:playlist:p".into()),
            name: "Road Trip".into(),
        });
        let playing_in = |uri: Option<&str>| PlaybackState {
            track: Some(track("a")),
            is_playing: true,
            context: uri.map(PlaybackContext::from_uri),
            ..Default::default()
        };

        model.apply_playback(playing_in(Some("spotify:playlist:p")), now);
        assert_eq!(model.playing_context_name(), Some("Road Trip"));

        // moved to an album from another device
        model.apply_playback(playing_in(Some("spotify:album:x")), now);
        assert_eq!(model.playing_context_name(), None);

        // liked songs are started as a plain uri list with no context
        model.started_context = Some(StartedContext {
            uri: None,
            name: "Liked".into(),
        });
        model.apply_playback(playing_in(None), now);
        assert_eq!(model.playing_context_name(), Some("Liked"));
        model.apply_playback(playing_in(Some("spotify:album:x")), now);
        assert_eq!(model.playing_context_name(), None);
    }

    #[test]
    fn selection_follows_focus() {
        let mut model = AppModel::new(Instant::now(), false);
        model.set_playlists(vec![playlist("a")]);
        model.move_selection_down();
        assert_eq!(model.playlist_selected, 1);
        model.move_selection_down();
        assert_eq!(model.playlist_selected, 1);

        model.cycle_focus_forward();
        model.cycle_focus_forward();
        model.set_queue(vec![track("x"), track("y")]);
        model.move_selection_down();
        assert_eq!(model.queue.selected, 1);
        assert_eq!(model.playlist_selected, 1);
    }
}
