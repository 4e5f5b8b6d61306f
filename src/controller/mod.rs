//! Controller module - Application logic and event handling
//!
//! The controller owns the model and consumes one `AppEvent` at a time,
//! returning the `Request`s the event calls for. It never awaits; the
//! dispatcher runs requests and feeds their outcomes back as events.
//! It is organized into submodules by responsibility:
//!
//! - `events`: Event and request types
//! - `input`: Key classification
//! - `playback`: Player command intents
//! - `navigation`: Focus, lists, playlists and search
//! - `reconcile`: Fetch and command completions
//! - `autoplay`: Queue refill policy
//! - `dispatch`: Running requests against a gateway

mod events;
mod input;
mod playback;
mod navigation;
mod reconcile;
mod autoplay;
mod dispatch;

use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::model::AppModel;

pub use dispatch::Dispatcher;
pub use events::{AppEvent, AutoplayTrigger, PlayerCommand, Request};
pub use input::Intent;

pub(crate) const TICK_INTERVAL: Duration = Duration::from_secs(1);
const QUEUE_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEVICE_POLL_INTERVAL: Duration = Duration::from_secs(10);
const ERROR_DISPLAY: Duration = Duration::from_secs(3);
const VOLUME_STEP: i16 = 5;
const SEEK_STEP_MS: i64 = 10_000;

/// Tracks when the slower polls last went out
#[derive(Clone, Copy, Debug)]
struct PollSchedule {
    last_queue: Instant,
    last_devices: Instant,
}

impl PollSchedule {
    fn new(now: Instant) -> Self {
        Self {
            last_queue: now,
            last_devices: now,
        }
    }

    fn queue_due(&mut self, now: Instant) -> bool {
        let due = now.saturating_duration_since(self.last_queue) >= QUEUE_POLL_INTERVAL;
        if due {
            self.last_queue = now;
        }
        due
    }

    fn devices_due(&mut self, now: Instant) -> bool {
        let due = now.saturating_duration_since(self.last_devices) >= DEVICE_POLL_INTERVAL;
        if due {
            self.last_devices = now;
        }
        due
    }
}

pub struct AppController {
    model: AppModel,
    schedule: PollSchedule,
}

impl AppController {
    pub fn new(model: AppModel, now: Instant) -> Self {
        Self {
            model,
            schedule: PollSchedule::new(now),
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn should_quit(&self) -> bool {
        self.model.should_quit
    }

    /// Initial fetches issued once before the first tick
    pub fn startup_requests(&self) -> Vec<Request> {
        vec![
            Request::FetchUser,
            Request::FetchPlaylists,
            Request::FetchPlayback,
            Request::FetchQueue,
            Request::FetchDevices,
        ]
    }

    pub fn handle(&mut self, event: AppEvent, now: Instant) -> Vec<Request> {
        match event {
            AppEvent::Tick => self.on_tick(now),
            AppEvent::Input(Event::Key(key)) => {
                match input::classify(key, self.model.is_searching()) {
                    Some(intent) => self.handle_intent(intent, now),
                    None => Vec::new(),
                }
            }
            // Resize and mouse events only need a redraw
            AppEvent::Input(_) => Vec::new(),
            AppEvent::PlaybackFetched(result) => self.on_playback_fetched(result, now),
            AppEvent::QueueFetched(result) => self.on_queue_fetched(result),
            AppEvent::DevicesFetched(result) => self.on_devices_fetched(result),
            AppEvent::PlaylistsFetched(result) => self.on_playlists_fetched(result),
            AppEvent::UserFetched(result) => self.on_user_fetched(result),
            AppEvent::TracksFetched { source, result } => self.on_tracks_fetched(source, result),
            AppEvent::SearchFinished { query, result } => self.on_search_finished(query, result),
            AppEvent::PlayStarted { context, result } => self.on_play_started(context, result),
            AppEvent::SinglePlayed { track, result } => self.on_single_played(track, result, now),
            AppEvent::CommandFinished { command, result } => self.on_command_finished(command, result),
            AppEvent::QueueSkipFinished(result) => self.on_queue_skip_finished(result),
            AppEvent::RecommendationsFetched { trigger, result } => {
                self.on_recommendations(trigger, result, now)
            }
            AppEvent::TrackEnqueued { track_id, result } => self.on_track_enqueued(track_id, result),
            AppEvent::ClearError => {
                self.model.clear_error();
                Vec::new()
            }
        }
    }

    pub fn handle_intent(&mut self, intent: Intent, now: Instant) -> Vec<Request> {
        match intent {
            Intent::Quit => {
                self.model.should_quit = true;
                Vec::new()
            }
            Intent::TogglePlay => self.toggle_play(),
            Intent::Next => vec![Request::Command(PlayerCommand::Next)],
            Intent::Previous => vec![Request::Command(PlayerCommand::Previous)],
            Intent::ToggleShuffle => self.toggle_shuffle(),
            Intent::CycleRepeat => self.cycle_repeat(),
            Intent::ToggleAutoplay => self.toggle_autoplay(),
            Intent::VolumeUp => self.change_volume(VOLUME_STEP),
            Intent::VolumeDown => self.change_volume(-VOLUME_STEP),
            Intent::SeekForward => self.seek_relative(SEEK_STEP_MS, now),
            Intent::SeekBackward => self.seek_relative(-SEEK_STEP_MS, now),
            Intent::NextDevice => self.transfer_to_next_device(),
            Intent::FocusNext => {
                self.model.cycle_focus_forward();
                Vec::new()
            }
            Intent::FocusPrev => {
                self.model.cycle_focus_backward();
                Vec::new()
            }
            Intent::MoveUp => {
                self.model.move_selection_up();
                Vec::new()
            }
            Intent::MoveDown => {
                self.model.move_selection_down();
                Vec::new()
            }
            Intent::Activate => self.activate(),
            Intent::EnterSearch => self.enter_search(),
            Intent::SearchInput(c) => self.search_input(c),
            Intent::SearchBackspace => self.search_backspace(),
            Intent::SearchExit => self.exit_search(),
            Intent::SearchSubmit => self.submit_search(),
        }
    }

    fn on_tick(&mut self, now: Instant) -> Vec<Request> {
        self.model.playback.clock.advance(now);

        let mut requests = vec![Request::FetchPlayback];
        if self.schedule.queue_due(now) {
            requests.push(Request::FetchQueue);
        }
        if self.schedule.devices_due(now) {
            requests.push(Request::FetchDevices);
        }
        requests.extend(self.maybe_refill(now));
        requests
    }

    /// Show `message` and schedule the unconditional clear.
    fn fail(&mut self, message: String) -> Vec<Request> {
        self.model.set_error(message);
        vec![Request::ClearErrorAfter(ERROR_DISPLAY)]
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = error.to_string();

        // Handle common Spotify API errors
        if error_str.contains("404") {
            "No active device found. Start playing on Spotify and try again.".to_string()
        } else if error_str.contains("403") {
            "Action forbidden. Check your Spotify Premium status.".to_string()
        } else if error_str.contains("401") {
            "Authentication expired. Please restart the app.".to_string()
        } else if error_str.contains("429") {
            "Rate limited. Please wait a moment.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Instant;

    use crate::model::{ArtistRef, AppModel, PlaybackState, Track};

    use super::AppController;

    pub fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Track {id}"),
            artists: vec![
                ArtistRef { id: format!("{id}-ar1"), name: "One".into() },
                ArtistRef { id: format!("{id}-ar2"), name: "Two".into() },
                ArtistRef { id: format!("{id}-ar3"), name: "Three".into() },
            ],
            album: "Album".into(),
            duration_ms: 180_000,
        }
    }

    pub fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| track(id)).collect()
    }

    pub fn controller(now: Instant) -> AppController {
        AppController::new(AppModel::new(now, false), now)
    }

    /// Controller with `current` playing and autoplay enabled
    pub fn playing_controller(now: Instant, current: &str) -> AppController {
        let mut c = AppController::new(AppModel::new(now, true), now);
        c.model.apply_playback(
            PlaybackState {
                track: Some(track(current)),
                progress_ms: 1_000,
                is_playing: true,
                ..Default::default()
            },
            now,
        );
        c
    }

    pub fn model_mut(c: &mut AppController) -> &mut AppModel {
        &mut c.model
    }
}
