//! Playback-related types and state management

use std::time::Instant;

use super::types::{DeviceInfo, PlaybackContext, RepeatMode, Track};

/// Playback state as returned by a single fetch from the server
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub track: Option<Track>,
    pub progress_ms: u32,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub context: Option<PlaybackContext>,
    pub device: Option<DeviceInfo>,
}

/// Client-side progress estimate between polls.
///
/// The server value is ground truth: `sync` overwrites the estimate, and
/// `advance` only interpolates while playing. The position never exceeds the
/// track duration.
#[derive(Clone, Debug)]
pub struct ProgressClock {
    position_ms: u32,
    duration_ms: u32,
    playing: bool,
    last_update: Instant,
}

impl ProgressClock {
    pub fn new(now: Instant) -> Self {
        Self {
            position_ms: 0,
            duration_ms: 0,
            playing: false,
            last_update: now,
        }
    }

    pub fn sync(&mut self, position_ms: u32, duration_ms: u32, playing: bool, now: Instant) {
        self.duration_ms = duration_ms;
        self.position_ms = position_ms.min(duration_ms);
        self.playing = playing;
        self.last_update = now;
    }

    pub fn advance(&mut self, now: Instant) {
        self.position_ms = self.position_at(now);
        self.last_update = now;
    }

    pub fn position_at(&self, now: Instant) -> u32 {
        if !self.playing || self.duration_ms == 0 {
            return self.position_ms;
        }
        let elapsed = now.saturating_duration_since(self.last_update).as_millis();
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.position_ms.saturating_add(elapsed).min(self.duration_ms)
    }

    pub fn position_ms(&self) -> u32 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn ratio(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
        }
    }
}

/// Everything known about what the remote player is doing
#[derive(Clone, Debug)]
pub struct PlaybackSnapshot {
    pub track: Option<Track>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub context: Option<PlaybackContext>,
    pub clock: ProgressClock,
}

impl PlaybackSnapshot {
    pub fn new(now: Instant) -> Self {
        Self {
            track: None,
            shuffle: false,
            repeat: RepeatMode::Off,
            context: None,
            clock: ProgressClock::new(now),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.track.is_some() && self.clock.is_playing()
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.id.as_str())
    }

    /// Overwrite the snapshot with a fetched state.
    ///
    /// A state without a track leaves everything untouched. Returns whether
    /// the playing track changed identity.
    pub fn apply(&mut self, state: PlaybackState, now: Instant) -> bool {
        let Some(track) = state.track else {
            return false;
        };

        let changed = self.track_id() != Some(track.id.as_str());
        self.clock.sync(state.progress_ms, track.duration_ms, state.is_playing, now);
        self.shuffle = state.shuffle;
        self.repeat = state.repeat;
        self.context = state.context;
        self.track = Some(track);
        changed
    }
}
