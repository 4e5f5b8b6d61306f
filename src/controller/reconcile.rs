//! Applying fetch results and command outcomes to the model.
//!
//! Fetch handlers replace state wholesale, so a late or duplicate response
//! simply overwrites again.

use std::time::Instant;

use crate::model::{
    DeviceInfo, PlaybackState, PlaylistItem, PlaylistSource, StartedContext, Track, UserProfile,
};

use super::{AppController, PlayerCommand, Request};

impl AppController {
    pub(super) fn on_playback_fetched(
        &mut self,
        result: Result<Option<PlaybackState>, String>,
        now: Instant,
    ) -> Vec<Request> {
        match result {
            Ok(Some(state)) => {
                self.model.apply_playback(state, now);
                Vec::new()
            }
            Ok(None) => Vec::new(),
            Err(e) => self.fail(e),
        }
    }

    pub(super) fn on_queue_fetched(&mut self, result: Result<Vec<Track>, String>) -> Vec<Request> {
        match result {
            Ok(tracks) => {
                tracing::trace!(len = tracks.len(), "Queue updated");
                self.model.set_queue(tracks);
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    pub(super) fn on_devices_fetched(&mut self, result: Result<Vec<DeviceInfo>, String>) -> Vec<Request> {
        match result {
            Ok(devices) => {
                self.model.set_devices(devices);
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    pub(super) fn on_playlists_fetched(&mut self, result: Result<Vec<PlaylistItem>, String>) -> Vec<Request> {
        match result {
            Ok(playlists) => {
                tracing::info!(count = playlists.len(), "Playlists loaded");
                self.model.set_playlists(playlists);
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    pub(super) fn on_user_fetched(&mut self, result: Result<UserProfile, String>) -> Vec<Request> {
        match result {
            Ok(user) => {
                self.model.user = Some(user);
                Vec::new()
            }
            Err(e) => self.fail(e),
        }
    }

    pub(super) fn on_tracks_fetched(
        &mut self,
        source: PlaylistSource,
        result: Result<Vec<Track>, String>,
    ) -> Vec<Request> {
        match result {
            Ok(tracks) => {
                let count = tracks.len();
                let now_playing = self.model.playback.track_id().map(str::to_string);
                if self.model.browse.finish_loading(&source, tracks, now_playing.as_deref()) {
                    tracing::debug!(playlist = source.id(), count, "Playlist tracks loaded");
                } else {
                    tracing::debug!(playlist = source.id(), "Dropping stale track list");
                }
                Vec::new()
            }
            Err(e) => {
                if self.model.browse.fail_loading(&source) {
                    self.fail(e)
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub(super) fn on_search_finished(&mut self, query: String, result: Result<Vec<Track>, String>) -> Vec<Request> {
        let Some(search) = self.model.search.as_mut() else {
            return Vec::new();
        };
        if search.query != query {
            return Vec::new();
        }
        match result {
            Ok(tracks) => {
                tracing::debug!(query, count = tracks.len(), "Search finished");
                search.set_results(query, tracks);
                Vec::new()
            }
            Err(e) => {
                search.searching = false;
                self.fail(e)
            }
        }
    }

    pub(super) fn on_play_started(&mut self, context: StartedContext, result: Result<(), String>) -> Vec<Request> {
        match result {
            Ok(()) => {
                self.model.started_context = Some(context);
                vec![Request::FetchPlayback, Request::FetchQueue]
            }
            Err(e) => self.fail(e),
        }
    }

    pub(super) fn on_single_played(
        &mut self,
        track: Track,
        result: Result<(), String>,
        now: Instant,
    ) -> Vec<Request> {
        if let Err(e) = result {
            return self.fail(e);
        }
        self.model.started_context = None;
        let mut requests = vec![Request::FetchPlayback];
        requests.extend(self.start_session(&track, now));
        requests
    }

    pub(super) fn on_command_finished(
        &mut self,
        command: PlayerCommand,
        result: Result<(), String>,
    ) -> Vec<Request> {
        match result {
            Ok(()) => vec![Request::FetchPlayback],
            Err(e) => {
                tracing::debug!(command = ?command, "Player command failed");
                self.fail(e)
            }
        }
    }

    /// Playback resyncs on the next tick; the queue is refetched right away.
    pub(super) fn on_queue_skip_finished(&mut self, result: Result<(), String>) -> Vec<Request> {
        let mut requests = match result {
            Ok(()) => Vec::new(),
            Err(e) => self.fail(e),
        };
        requests.push(Request::FetchQueue);
        requests
    }
}
