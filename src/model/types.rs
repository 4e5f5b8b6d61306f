//! Core type definitions for the application

/// Pseudo-playlist id used for the user's saved tracks
pub const LIKED_PLAYLIST_ID: &str = "liked";

/// Which panel receives directional input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FocusPanel {
    #[default]
    Sidebar,
    Main,
    Queue,
}

impl FocusPanel {
    pub fn next(self) -> Self {
        match self {
            FocusPanel::Sidebar => FocusPanel::Main,
            FocusPanel::Main => FocusPanel::Queue,
            FocusPanel::Queue => FocusPanel::Sidebar,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusPanel::Sidebar => FocusPanel::Queue,
            FocusPanel::Main => FocusPanel::Sidebar,
            FocusPanel::Queue => FocusPanel::Main,
        }
    }
}

/// Repeat mode state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    Context,
    Track,
}

impl RepeatMode {
    /// Order used by the repeat key: off, context, track, off.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::Context,
            RepeatMode::Context => RepeatMode::Track,
            RepeatMode::Track => RepeatMode::Off,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

/// A playable track as the rest of the app sees it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    pub album: String,
    pub duration_ms: u32,
}

impl Track {
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.id)
    }

    pub fn artist_line(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Container a track is being played from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextKind {
    Playlist,
    Album,
    Artist,
    Collection,
    Other,
}

impl ContextKind {
    pub fn from_uri(uri: &str) -> Self {
        let mut parts = uri.split(':').skip(1);
        match parts.next() {
            Some("playlist") => ContextKind::Playlist,
            Some("album") => ContextKind::Album,
            Some("artist") => ContextKind::Artist,
            Some("collection") => ContextKind::Collection,
            // spotify:user:<id>:collection
            Some("user") if uri.ends_with(":collection") => ContextKind::Collection,
            _ => ContextKind::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContextKind::Playlist => "Playlist",
            ContextKind::Album => "Album",
            ContextKind::Artist => "Artist",
            ContextKind::Collection => "Liked Songs",
            ContextKind::Other => "Context",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackContext {
    pub kind: ContextKind,
    pub uri: String,
}

impl PlaybackContext {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self { kind: ContextKind::from_uri(&uri), uri }
    }
}

/// A context this client started playing and the name it was shown under.
/// `uri` is `None` for a plain uri list such as liked songs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartedContext {
    pub uri: Option<String>,
    pub name: String,
}

/// Information about a Spotify playback device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub is_active: bool,
    pub volume: Option<u8>,
}

/// Devices as last reported by the server
#[derive(Clone, Debug, Default)]
pub struct DeviceSet {
    pub devices: Vec<DeviceInfo>,
    pub active: Option<usize>,
    pub volume: Option<u8>,
    /// Set once a device list fetch has succeeded
    pub loaded: bool,
}

impl DeviceSet {
    pub fn replace(&mut self, devices: Vec<DeviceInfo>) {
        self.active = devices.iter().position(|d| d.is_active);
        self.volume = self.active.and_then(|i| devices[i].volume);
        self.devices = devices;
        self.loaded = true;
    }

    /// Fold in the device a playback fetch reported as playing, so the
    /// active device and its volume stay current between device polls.
    /// A device missing from the last list is appended.
    pub fn sync_active(&mut self, device: DeviceInfo) {
        let index = match self.devices.iter().position(|d| d.id == device.id) {
            Some(i) => {
                self.devices[i] = device;
                i
            }
            None => {
                self.devices.push(device);
                self.devices.len() - 1
            }
        };
        for (i, d) in self.devices.iter_mut().enumerate() {
            d.is_active = i == index;
        }
        self.active = Some(index);
        self.volume = self.devices[index].volume;
    }

    pub fn active_device(&self) -> Option<&DeviceInfo> {
        self.active.and_then(|i| self.devices.get(i))
    }

    /// Device after the active one, wrapping. With no active device the
    /// first known device is returned.
    pub fn next_after_active(&self) -> Option<&DeviceInfo> {
        if self.devices.is_empty() {
            return None;
        }
        let next = match self.active {
            Some(i) => (i + 1) % self.devices.len(),
            None => 0,
        };
        match self.active {
            Some(i) if i == next => None,
            _ => self.devices.get(next),
        }
    }
}

/// A user's playlist (for sidebar display)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistItem {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub track_count: u32,
}

impl PlaylistItem {
    pub fn liked_songs() -> Self {
        Self {
            id: LIKED_PLAYLIST_ID.to_string(),
            name: "💚 Liked Songs".to_string(),
            uri: String::new(),
            track_count: 0,
        }
    }

    pub fn is_liked(&self) -> bool {
        self.id == LIKED_PLAYLIST_ID
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub product: String,
    pub followers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, active: bool, volume: Option<u8>) -> DeviceInfo {
        DeviceInfo {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind: "Computer".to_string(),
            is_active: active,
            volume,
        }
    }

    #[test]
    fn focus_ring_round_trips() {
        let start = FocusPanel::Sidebar;
        assert_eq!(start.next(), FocusPanel::Main);
        assert_eq!(start.next().next(), FocusPanel::Queue);
        assert_eq!(start.next().next().next(), start);
        assert_eq!(start.prev(), FocusPanel::Queue);
    }

    #[test]
    fn repeat_cycles_through_all_modes() {
        assert_eq!(RepeatMode::Off.cycle(), RepeatMode::Context);
        assert_eq!(RepeatMode::Context.cycle(), RepeatMode::Track);
        assert_eq!(RepeatMode::Track.cycle(), RepeatMode::Off);
    }

    #[test]
    fn context_kind_is_parsed_from_uri() {
        assert_eq!(ContextKind::from_uri("spotify:playlist:abc"), ContextKind::Playlist);
        assert_eq!(ContextKind::from_uri("spotify:album:abc"), ContextKind::Album);
        assert_eq!(ContextKind::from_uri("spotify:user:bob:collection"), ContextKind::Collection);
        assert_eq!(ContextKind::from_uri("spotify:show:abc"), ContextKind::Other);
    }

    #[test]
    fn device_set_mirrors_active_volume() {
        let mut set = DeviceSet::default();
        set.replace(vec![device("a", false, Some(10)), device("b", true, Some(70))]);
        assert_eq!(set.active, Some(1));
        assert_eq!(set.volume, Some(70));

        set.replace(vec![device("a", false, Some(10))]);
        assert_eq!(set.active, None);
        assert_eq!(set.volume, None);
        assert_eq!(set.devices.len(), 1);
    }

    #[test]
    fn playback_device_updates_active_and_volume() {
        let mut set = DeviceSet::default();
        set.replace(vec![device("a", true, Some(10)), device("b", false, Some(20))]);

        set.sync_active(device("b", true, Some(65)));
        assert_eq!(set.active, Some(1));
        assert_eq!(set.volume, Some(65));
        assert!(!set.devices[0].is_active);
        assert!(set.devices[1].is_active);

        set.sync_active(device("c", true, None));
        assert_eq!(set.devices.len(), 3);
        assert_eq!(set.active_device().map(|d| d.id.as_str()), Some("c"));
        assert_eq!(set.volume, None);
    }

    #[test]
    fn loaded_tracks_a_completed_fetch() {
        let mut set = DeviceSet::default();
        assert!(!set.loaded);
        set.replace(Vec::new());
        assert!(set.loaded);
        assert!(set.devices.is_empty());
    }

    #[test]
    fn next_device_wraps_and_skips_single_active() {
        let mut set = DeviceSet::default();
        set.replace(vec![device("a", false, None), device("b", true, None)]);
        assert_eq!(set.next_after_active().map(|d| d.id.as_str()), Some("a"));

        set.replace(vec![device("a", true, None)]);
        assert!(set.next_after_active().is_none());
    }
}
