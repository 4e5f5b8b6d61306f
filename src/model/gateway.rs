//! The remote playback capabilities the controller relies on

use std::future::Future;

use anyhow::Result;

use super::playback::PlaybackState;
use super::types::{DeviceInfo, PlaylistItem, RepeatMode, Track, UserProfile};

/// Seed entries for a recommendation request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seeds {
    pub track_ids: Vec<String>,
    pub artist_ids: Vec<String>,
}

impl Seeds {
    pub fn len(&self) -> usize {
        self.track_ids.len() + self.artist_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty() && self.artist_ids.is_empty()
    }
}

/// One page of the saved-tracks collection.
///
/// `has_more` comes from the server's paging, not from `tracks.len()`:
/// items without a playable id are dropped during conversion, so a full
/// page can come back with fewer tracks than were requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LikedPage {
    pub tracks: Vec<Track>,
    pub has_more: bool,
}

/// Async facade over the remote player.
///
/// Every call is independent and fallible. Implementations are cloned into
/// spawned tasks, so they must be cheap to clone and shareable.
pub trait Gateway: Clone + Send + Sync + 'static {
    fn fetch_playback_state(&self) -> impl Future<Output = Result<Option<PlaybackState>>> + Send;
    fn fetch_currently_playing(&self) -> impl Future<Output = Result<Option<PlaybackState>>> + Send;

    fn resume(&self) -> impl Future<Output = Result<()>> + Send;
    fn pause(&self) -> impl Future<Output = Result<()>> + Send;
    fn next_track(&self) -> impl Future<Output = Result<()>> + Send;
    fn previous_track(&self) -> impl Future<Output = Result<()>> + Send;
    fn seek(&self, position_ms: u32) -> impl Future<Output = Result<()>> + Send;
    fn set_shuffle(&self, state: bool) -> impl Future<Output = Result<()>> + Send;
    fn set_repeat(&self, mode: RepeatMode) -> impl Future<Output = Result<()>> + Send;
    fn set_volume(&self, volume: u8) -> impl Future<Output = Result<()>> + Send;
    fn transfer_playback(&self, device_id: String) -> impl Future<Output = Result<()>> + Send;

    fn play_in_context(&self, context_uri: String, offset: usize) -> impl Future<Output = Result<()>> + Send;
    fn play_uri_list(&self, uris: Vec<String>, offset: usize) -> impl Future<Output = Result<()>> + Send;
    fn play_single(&self, uri: String) -> impl Future<Output = Result<()>> + Send;

    fn fetch_queue(&self) -> impl Future<Output = Result<Vec<Track>>> + Send;
    fn enqueue_track(&self, track_id: String) -> impl Future<Output = Result<()>> + Send;
    fn fetch_devices(&self) -> impl Future<Output = Result<Vec<DeviceInfo>>> + Send;
    fn fetch_playlists(&self) -> impl Future<Output = Result<Vec<PlaylistItem>>> + Send;
    fn fetch_playlist_tracks(&self, playlist_id: String) -> impl Future<Output = Result<Vec<Track>>> + Send;
    fn fetch_liked_page(&self, offset: u32, limit: u32) -> impl Future<Output = Result<LikedPage>> + Send;
    fn fetch_current_user(&self) -> impl Future<Output = Result<UserProfile>> + Send;
    fn search_tracks(&self, query: String, limit: u32) -> impl Future<Output = Result<Vec<Track>>> + Send;
    fn recommend(&self, seeds: Seeds, limit: u32) -> impl Future<Output = Result<Vec<Track>>> + Send;
}
