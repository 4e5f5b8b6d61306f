//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (focus, repeat mode, tracks, devices)
//! - `playback`: Playback snapshot and the interpolating progress clock
//! - `content`: Browse context, queue view and search session
//! - `autoplay`: Autoplay flags and the recently-queued de-dup window
//! - `gateway`: The remote playback capability trait
//! - `spotify_client`: Spotify API implementation of the gateway
//! - `app_model`: Main application model with state management methods

mod types;
mod playback;
mod content;
mod autoplay;
mod gateway;
mod spotify_client;
mod app_model;

pub use types::{
    DeviceInfo, DeviceSet, FocusPanel, PlaylistItem, RepeatMode, StartedContext, Track, UserProfile,
};
#[cfg(test)]
pub use types::{ArtistRef, ContextKind, PlaybackContext};

pub use playback::PlaybackState;

pub use content::{PlaylistSource, SearchSession, TrackRow};

pub use autoplay::RecentlyQueued;

pub use gateway::{Gateway, Seeds};
#[cfg(test)]
pub use gateway::LikedPage;

pub use spotify_client::SpotifyClient;

pub use app_model::AppModel;
