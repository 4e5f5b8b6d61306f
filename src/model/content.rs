//! Browsing state: the selected playlist's tracks, the queue and search

use super::types::{LIKED_PLAYLIST_ID, PlaylistItem, Track};

pub(crate) fn step_up(index: &mut usize) {
    *index = index.saturating_sub(1);
}

pub(crate) fn step_down(index: &mut usize, len: usize) {
    if *index + 1 < len {
        *index += 1;
    }
}

/// Where a track list comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaylistSource {
    /// The saved-tracks collection; it has no playable context URI
    Liked,
    Playlist { id: String, uri: String },
}

impl PlaylistSource {
    pub fn from_item(item: &PlaylistItem) -> Self {
        if item.is_liked() {
            PlaylistSource::Liked
        } else {
            PlaylistSource::Playlist {
                id: item.id.clone(),
                uri: item.uri.clone(),
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PlaylistSource::Liked => LIKED_PLAYLIST_ID,
            PlaylistSource::Playlist { id, .. } => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackRow {
    pub track: Track,
    pub now_playing: bool,
}

/// The playlist currently open in the main panel
#[derive(Clone, Debug, Default)]
pub struct BrowseContext {
    pub source: Option<PlaylistSource>,
    pub name: String,
    pub rows: Vec<TrackRow>,
    pub selected: usize,
    pub loading: bool,
}

impl BrowseContext {
    /// Start loading `source`. Returns false when that exact source is
    /// already loading, in which case nothing changes.
    pub fn begin_loading(&mut self, source: PlaylistSource, name: String) -> bool {
        if self.loading && self.source.as_ref() == Some(&source) {
            return false;
        }
        self.source = Some(source);
        self.name = name;
        self.rows.clear();
        self.selected = 0;
        self.loading = true;
        true
    }

    /// Install a fetched track list. Results for anything but the current
    /// source are stale and dropped.
    pub fn finish_loading(
        &mut self,
        source: &PlaylistSource,
        tracks: Vec<Track>,
        now_playing: Option<&str>,
    ) -> bool {
        if self.source.as_ref() != Some(source) {
            return false;
        }
        self.rows = tracks
            .into_iter()
            .map(|track| TrackRow {
                now_playing: now_playing == Some(track.id.as_str()),
                track,
            })
            .collect();
        self.selected = 0;
        self.loading = false;
        true
    }

    pub fn fail_loading(&mut self, source: &PlaylistSource) -> bool {
        if self.source.as_ref() != Some(source) {
            return false;
        }
        self.loading = false;
        true
    }

    /// Flag at most one row as playing. The cursor is left alone.
    pub fn mark_now_playing(&mut self, track_id: Option<&str>) {
        let mut marked = false;
        for row in &mut self.rows {
            row.now_playing = !marked && track_id == Some(row.track.id.as_str());
            marked |= row.now_playing;
        }
    }

    pub fn selected_row(&self) -> Option<&TrackRow> {
        self.rows.get(self.selected)
    }

    pub fn move_up(&mut self) {
        step_up(&mut self.selected);
    }

    pub fn move_down(&mut self) {
        step_down(&mut self.selected, self.rows.len());
    }
}

/// Upcoming tracks as last reported by the server
#[derive(Clone, Debug, Default)]
pub struct QueueView {
    pub tracks: Vec<Track>,
    pub selected: usize,
}

impl QueueView {
    /// Replace the queue wholesale, keeping the cursor by index.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.selected = self.selected.min(tracks.len().saturating_sub(1));
        self.tracks = tracks;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn move_up(&mut self) {
        step_up(&mut self.selected);
    }

    pub fn move_down(&mut self) {
        step_down(&mut self.selected, self.tracks.len());
    }
}

/// Search mode state; only exists while search mode is active
#[derive(Clone, Debug, Default)]
pub struct SearchSession {
    pub query: String,
    pub results: Vec<Track>,
    /// Query the current results were produced for
    pub results_query: Option<String>,
    pub selected: usize,
    pub searching: bool,
}

impl SearchSession {
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn backspace(&mut self) {
        self.query.pop();
    }

    /// True when the shown results belong to the query as typed
    pub fn results_are_current(&self) -> bool {
        !self.results.is_empty() && self.results_query.as_deref() == Some(self.query.as_str())
    }

    pub fn set_results(&mut self, query: String, results: Vec<Track>) {
        self.results = results;
        self.results_query = Some(query);
        self.selected = 0;
        self.searching = false;
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.results.get(self.selected)
    }

    pub fn move_up(&mut self) {
        step_up(&mut self.selected);
    }

    pub fn move_down(&mut self) {
        step_down(&mut self.selected, self.results.len());
    }
}
