//! Spotify Web API implementation of the gateway

use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::Duration as ChronoDuration;
use futures::TryStreamExt;
use rspotify::{
    AuthCodeSpotify,
    model::{
        AlbumId, ArtistId, CurrentPlaybackContext, CurrentlyPlayingContext, Device, FullTrack,
        Offset, PlayContextId, PlayableId, PlayableItem, PlaylistId, SearchResult, SearchType,
        SimplifiedTrack, TrackId,
    },
    prelude::*,
};

use super::gateway::{Gateway, LikedPage, Seeds};
use super::playback::PlaybackState;
use super::types::{
    ArtistRef, DeviceInfo, PlaybackContext, PlaylistItem, RepeatMode, Track, UserProfile,
};

fn artist_refs(artists: &[rspotify::model::SimplifiedArtist]) -> Vec<ArtistRef> {
    artists
        .iter()
        .map(|a| ArtistRef {
            id: a.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
            name: a.name.clone(),
        })
        .collect()
}

fn duration_ms(duration: ChronoDuration) -> u32 {
    u32::try_from(duration.num_milliseconds()).unwrap_or(0)
}

/// Local (uploaded) tracks have no id and cannot be queued or played by uri.
fn track_from_full(track: &FullTrack) -> Option<Track> {
    let id = track.id.as_ref()?.id().to_string();
    Some(Track {
        id,
        name: track.name.clone(),
        artists: artist_refs(&track.artists),
        album: track.album.name.clone(),
        duration_ms: duration_ms(track.duration),
    })
}

fn track_from_simplified(track: &SimplifiedTrack) -> Option<Track> {
    let id = track.id.as_ref()?.id().to_string();
    Some(Track {
        id,
        name: track.name.clone(),
        artists: artist_refs(&track.artists),
        album: String::new(),
        duration_ms: duration_ms(track.duration),
    })
}

fn track_from_item(item: &PlayableItem) -> Option<Track> {
    match item {
        PlayableItem::Track(track) => track_from_full(track),
        _ => None,
    }
}

fn device_info(device: &Device) -> DeviceInfo {
    DeviceInfo {
        id: device.id.clone().unwrap_or_default(),
        name: device.name.clone(),
        kind: format!("{:?}", device._type),
        is_active: device.is_active,
        volume: device.volume_percent.map(|v| v.min(100) as u8),
    }
}

fn repeat_mode(state: rspotify::model::RepeatState) -> RepeatMode {
    match state {
        rspotify::model::RepeatState::Off => RepeatMode::Off,
        rspotify::model::RepeatState::Context => RepeatMode::Context,
        rspotify::model::RepeatState::Track => RepeatMode::Track,
    }
}

fn playback_state(playback: &CurrentPlaybackContext) -> PlaybackState {
    PlaybackState {
        track: playback.item.as_ref().and_then(track_from_item),
        progress_ms: playback.progress.map(duration_ms).unwrap_or(0),
        is_playing: playback.is_playing,
        shuffle: playback.shuffle_state,
        repeat: repeat_mode(playback.repeat_state),
        context: playback
            .context
            .as_ref()
            .map(|c| PlaybackContext::from_uri(c.uri.clone())),
        device: Some(device_info(&playback.device)),
    }
}

fn currently_playing_state(playing: &CurrentlyPlayingContext) -> PlaybackState {
    PlaybackState {
        track: playing.item.as_ref().and_then(track_from_item),
        progress_ms: playing.progress.map(duration_ms).unwrap_or(0),
        is_playing: playing.is_playing,
        context: playing
            .context
            .as_ref()
            .map(|c| PlaybackContext::from_uri(c.uri.clone())),
        ..Default::default()
    }
}

fn play_context_id(uri: &str) -> Result<PlayContextId<'_>> {
    let context = if uri.contains(":album:") {
        PlayContextId::Album(AlbumId::from_uri(uri)?)
    } else if uri.contains(":playlist:") {
        PlayContextId::Playlist(PlaylistId::from_uri(uri)?)
    } else if uri.contains(":artist:") {
        PlayContextId::Artist(ArtistId::from_uri(uri)?)
    } else {
        return Err(anyhow!("Unknown context type: {}", uri));
    };
    Ok(context)
}

fn offset_at(index: usize) -> Option<Offset> {
    Some(Offset::Position(ChronoDuration::milliseconds(index as i64)))
}

/// Spotify API client. Commands target whichever device is active on the
/// account; the server answers 404 when there is none.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    pub fn new(client: AuthCodeSpotify) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Gateway for SpotifyClient {
    async fn fetch_playback_state(&self) -> Result<Option<PlaybackState>> {
        tracing::trace!("Fetching current playback state");
        let result = self.client.current_playback(None, None::<Vec<_>>).await?;
        if let Some(ref playback) = result {
            tracing::trace!(
                is_playing = playback.is_playing,
                device = ?playback.device.name,
                "Got playback state"
            );
        }
        Ok(result.as_ref().map(playback_state))
    }

    async fn fetch_currently_playing(&self) -> Result<Option<PlaybackState>> {
        tracing::debug!("API: current_playing");
        let result = self.client.current_playing(None, None::<Vec<_>>).await?;
        Ok(result.as_ref().map(currently_playing_state))
    }

    async fn resume(&self) -> Result<()> {
        tracing::debug!("API: resume_playback");
        self.client.resume_playback(None, None).await?;
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        tracing::debug!("API: pause_playback");
        self.client.pause_playback(None).await?;
        Ok(())
    }

    async fn next_track(&self) -> Result<()> {
        tracing::debug!("API: next_track");
        self.client.next_track(None).await?;
        Ok(())
    }

    async fn previous_track(&self) -> Result<()> {
        tracing::debug!("API: previous_track");
        self.client.previous_track(None).await?;
        Ok(())
    }

    async fn seek(&self, position_ms: u32) -> Result<()> {
        tracing::debug!(position_ms, "API: seek_track");
        self.client
            .seek_track(ChronoDuration::milliseconds(position_ms as i64), None)
            .await?;
        Ok(())
    }

    async fn set_shuffle(&self, state: bool) -> Result<()> {
        tracing::debug!(state, "API: set_shuffle");
        self.client.shuffle(state, None).await?;
        Ok(())
    }

    async fn set_repeat(&self, mode: RepeatMode) -> Result<()> {
        tracing::debug!(mode = ?mode, "API: set_repeat");
        let repeat_state = match mode {
            RepeatMode::Off => rspotify::model::RepeatState::Off,
            RepeatMode::Context => rspotify::model::RepeatState::Context,
            RepeatMode::Track => rspotify::model::RepeatState::Track,
        };
        self.client.repeat(repeat_state, None).await?;
        Ok(())
    }

    async fn set_volume(&self, volume: u8) -> Result<()> {
        tracing::debug!(volume, "API: set_volume");
        self.client.volume(volume.min(100), None).await?;
        Ok(())
    }

    async fn transfer_playback(&self, device_id: String) -> Result<()> {
        tracing::debug!(device_id, "API: transfer_playback");
        self.client.transfer_playback(&device_id, Some(true)).await?;
        Ok(())
    }

    async fn play_in_context(&self, context_uri: String, offset: usize) -> Result<()> {
        tracing::debug!(context_uri, offset, "API: start_context_playback");
        let context = play_context_id(&context_uri)?;
        self.client
            .start_context_playback(context, None, offset_at(offset), None)
            .await?;
        Ok(())
    }

    async fn play_uri_list(&self, uris: Vec<String>, offset: usize) -> Result<()> {
        tracing::debug!(count = uris.len(), offset, "API: start_uris_playback");
        let ids = uris
            .iter()
            .map(|uri| TrackId::from_uri(uri).map(PlayableId::Track))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.client
            .start_uris_playback(ids, None, offset_at(offset), None)
            .await?;
        Ok(())
    }

    async fn play_single(&self, uri: String) -> Result<()> {
        tracing::debug!(uri, "API: start_uris_playback (single)");
        let id = TrackId::from_uri(&uri)?;
        self.client
            .start_uris_playback([PlayableId::Track(id)], None, None, None)
            .await?;
        Ok(())
    }

    async fn fetch_queue(&self) -> Result<Vec<Track>> {
        tracing::trace!("API: current_user_queue");
        let queue = self.client.current_user_queue().await?;
        Ok(queue.queue.iter().filter_map(track_from_item).collect())
    }

    async fn enqueue_track(&self, track_id: String) -> Result<()> {
        tracing::debug!(track_id, "API: add_item_to_queue");
        let id = TrackId::from_id(track_id.as_str())?;
        self.client.add_item_to_queue(PlayableId::Track(id), None).await?;
        Ok(())
    }

    async fn fetch_devices(&self) -> Result<Vec<DeviceInfo>> {
        tracing::trace!("API: device");
        let devices = self.client.device().await?;
        Ok(devices.iter().map(device_info).collect())
    }

    async fn fetch_playlists(&self) -> Result<Vec<PlaylistItem>> {
        tracing::debug!("API: current_user_playlists");
        let playlists: Vec<_> = self.client.current_user_playlists().try_collect().await?;
        tracing::debug!(count = playlists.len(), "Loaded user playlists");
        Ok(playlists
            .into_iter()
            .map(|p| {
                let id = p.id.id().to_string();
                PlaylistItem {
                    uri: format!("spotify:playlist:{}", id),
                    id,
                    name: p.name,
                    track_count: p.tracks.total,
                }
            })
            .collect())
    }

    async fn fetch_playlist_tracks(&self, playlist_id: String) -> Result<Vec<Track>> {
        tracing::debug!(playlist_id, "API: playlist_items");
        let id = PlaylistId::from_id(playlist_id.as_str())?;
        let items: Vec<_> = self.client.playlist_items(id, None, None).try_collect().await?;
        Ok(items
            .iter()
            .filter_map(|item| item.track.as_ref().and_then(track_from_item))
            .collect())
    }

    async fn fetch_liked_page(&self, offset: u32, limit: u32) -> Result<LikedPage> {
        tracing::debug!(offset, limit, "API: current_user_saved_tracks");
        let page = self
            .client
            .current_user_saved_tracks_manual(None, Some(limit), Some(offset))
            .await?;
        let tracks: Vec<Track> = page
            .items
            .iter()
            .filter_map(|saved| track_from_full(&saved.track))
            .collect();
        if tracks.len() < page.items.len() {
            tracing::debug!(
                offset,
                skipped = page.items.len() - tracks.len(),
                "Skipped saved items without a track id"
            );
        }
        Ok(LikedPage {
            tracks,
            has_more: page.next.is_some(),
        })
    }

    async fn fetch_current_user(&self) -> Result<UserProfile> {
        tracing::debug!("API: me");
        let user = self.client.me().await?;
        Ok(UserProfile {
            id: user.id.id().to_string(),
            display_name: user.display_name.unwrap_or_default(),
            product: user.product.map(|p| format!("{:?}", p)).unwrap_or_default(),
            followers: user.followers.map(|f| f.total).unwrap_or(0),
        })
    }

    async fn search_tracks(&self, query: String, limit: u32) -> Result<Vec<Track>> {
        tracing::debug!(query, limit, "API: search");
        let result = self
            .client
            .search(&query, SearchType::Track, None, None, Some(limit), None)
            .await?;
        match result {
            SearchResult::Tracks(page) => Ok(page.items.iter().filter_map(track_from_full).collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn recommend(&self, seeds: Seeds, limit: u32) -> Result<Vec<Track>> {
        tracing::debug!(
            seed_tracks = seeds.track_ids.len(),
            seed_artists = seeds.artist_ids.len(),
            limit,
            "API: recommendations"
        );
        if seeds.is_empty() {
            return Err(anyhow!("Recommendations need at least one seed"));
        }
        let seed_tracks = seeds
            .track_ids
            .iter()
            .map(|id| TrackId::from_id(id.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let seed_artists = seeds
            .artist_ids
            .iter()
            .map(|id| ArtistId::from_id(id.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let recommendations = self
            .client
            .recommendations(
                std::iter::empty(),
                (!seed_artists.is_empty()).then_some(seed_artists),
                None::<Vec<&str>>,
                (!seed_tracks.is_empty()).then_some(seed_tracks),
                None,
                Some(limit),
            )
            .await?;
        Ok(recommendations
            .tracks
            .iter()
            .filter_map(track_from_simplified)
            .collect())
    }
}
