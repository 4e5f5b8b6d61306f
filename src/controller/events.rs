//! Messages flowing into and out of the reconciliation loop

use std::time::Duration;

use crossterm::event::Event;

use crate::model::{
    DeviceInfo, PlaybackState, PlaylistItem, PlaylistSource, RepeatMode, Seeds, StartedContext, Track,
    UserProfile,
};

/// Which autoplay trigger issued a recommendation request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoplayTrigger {
    /// Queue ran low during normal listening
    Refill,
    /// A single track was played outside any context
    SessionStart,
}

/// One-shot player commands with no payload of interest on success
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    Resume,
    Pause,
    Next,
    Previous,
    Seek(u32),
    Shuffle(bool),
    Repeat(RepeatMode),
    Volume(u8),
    Transfer(String),
}

/// Everything the loop reacts to. Completions carry their outcome as a
/// `Result` with a display-ready error string.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Tick,
    Input(Event),
    PlaybackFetched(Result<Option<PlaybackState>, String>),
    QueueFetched(Result<Vec<Track>, String>),
    DevicesFetched(Result<Vec<DeviceInfo>, String>),
    PlaylistsFetched(Result<Vec<PlaylistItem>, String>),
    UserFetched(Result<UserProfile, String>),
    TracksFetched {
        source: PlaylistSource,
        result: Result<Vec<Track>, String>,
    },
    SearchFinished {
        query: String,
        result: Result<Vec<Track>, String>,
    },
    PlayStarted {
        context: StartedContext,
        result: Result<(), String>,
    },
    SinglePlayed {
        track: Track,
        result: Result<(), String>,
    },
    CommandFinished {
        command: PlayerCommand,
        result: Result<(), String>,
    },
    QueueSkipFinished(Result<(), String>),
    RecommendationsFetched {
        trigger: AutoplayTrigger,
        result: Result<Vec<Track>, String>,
    },
    TrackEnqueued {
        track_id: String,
        result: Result<(), String>,
    },
    ClearError,
}

/// Work the loop hands to the dispatcher
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    FetchPlayback,
    FetchQueue,
    FetchDevices,
    FetchPlaylists,
    FetchUser,
    FetchTracks(PlaylistSource),
    Search(String),
    Command(PlayerCommand),
    PlayInContext {
        context_uri: String,
        offset: usize,
        context_name: String,
    },
    PlayUriList {
        uris: Vec<String>,
        offset: usize,
        context_name: String,
    },
    PlaySingle(Track),
    SkipToQueuePosition(usize),
    Recommend {
        trigger: AutoplayTrigger,
        seeds: Seeds,
        limit: u32,
    },
    Enqueue(String),
    ClearErrorAfter(Duration),
}
