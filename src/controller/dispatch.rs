//! Runs requests against the gateway on their own tasks.
//!
//! Nothing here touches the model. Each task reports back by sending an
//! `AppEvent` into the loop's channel; if the loop is gone the send fails
//! and the result is dropped.

use std::future::Future;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::log_api_result;
use crate::model::{Gateway, PlaylistSource, StartedContext, Track};

use super::{AppController, AppEvent, PlayerCommand, Request};

pub const LIKED_PAGE_SIZE: u32 = 50;
const SEARCH_LIMIT: u32 = 20;

/// Collect the saved-tracks collection page by page until the server
/// reports no further page.
pub async fn fetch_all_liked<G: Gateway>(gateway: &G) -> Result<Vec<Track>> {
    let mut tracks = Vec::new();
    let mut offset = 0;
    loop {
        let page = gateway.fetch_liked_page(offset, LIKED_PAGE_SIZE).await?;
        tracks.extend(page.tracks);
        if !page.has_more {
            break;
        }
        offset += LIKED_PAGE_SIZE;
    }
    tracing::debug!(count = tracks.len(), "Loaded liked songs");
    Ok(tracks)
}

/// Advance to zero-based queue entry `index` with `index + 1` serial skips.
/// Stops at the first failure; playback stays wherever it got to.
pub async fn skip_to_queue_position<G: Gateway>(gateway: &G, index: usize) -> Result<()> {
    for step in 0..=index {
        if let Err(e) = gateway.next_track().await {
            tracing::warn!(step, index, error = %e, "Queue skip aborted");
            return Err(e);
        }
    }
    Ok(())
}

async fn run_command<G: Gateway>(gateway: &G, command: &PlayerCommand) -> Result<()> {
    match command {
        PlayerCommand::Resume => gateway.resume().await,
        PlayerCommand::Pause => gateway.pause().await,
        PlayerCommand::Next => gateway.next_track().await,
        PlayerCommand::Previous => gateway.previous_track().await,
        PlayerCommand::Seek(ms) => gateway.seek(*ms).await,
        PlayerCommand::Shuffle(state) => gateway.set_shuffle(*state).await,
        PlayerCommand::Repeat(mode) => gateway.set_repeat(*mode).await,
        PlayerCommand::Volume(volume) => gateway.set_volume(*volume).await,
        PlayerCommand::Transfer(device_id) => gateway.transfer_playback(device_id.clone()).await,
    }
}

fn display<T>(result: Result<T>) -> std::result::Result<T, String> {
    result.map_err(|e| AppController::format_error(&e))
}

pub struct Dispatcher<G: Gateway> {
    gateway: G,
    events: UnboundedSender<AppEvent>,
}

impl<G: Gateway> Dispatcher<G> {
    pub fn new(gateway: G, events: UnboundedSender<AppEvent>) -> Self {
        Self { gateway, events }
    }

    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }

    /// Spawn `work` and turn its outcome into an event.
    fn spawn<T, Fut>(
        &self,
        operation: &'static str,
        work: impl FnOnce(G) -> Fut + Send + 'static,
        into_event: impl FnOnce(std::result::Result<T, String>) -> AppEvent + Send + 'static,
    ) where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let gateway = self.gateway.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = work(gateway).await;
            log_api_result!(operation, result);
            let _ = events.send(into_event(display(result)));
        });
    }

    pub fn dispatch(&self, request: Request) {
        match request {
            Request::FetchPlayback => self.spawn(
                "fetch_playback_state",
                |g| async move { g.fetch_playback_state().await },
                AppEvent::PlaybackFetched,
            ),
            Request::FetchQueue => self.spawn(
                "fetch_queue",
                |g| async move { g.fetch_queue().await },
                AppEvent::QueueFetched,
            ),
            Request::FetchDevices => self.spawn(
                "fetch_devices",
                |g| async move { g.fetch_devices().await },
                AppEvent::DevicesFetched,
            ),
            Request::FetchPlaylists => self.spawn(
                "fetch_playlists",
                |g| async move { g.fetch_playlists().await },
                AppEvent::PlaylistsFetched,
            ),
            Request::FetchUser => self.spawn(
                "fetch_current_user",
                |g| async move { g.fetch_current_user().await },
                AppEvent::UserFetched,
            ),
            Request::FetchTracks(source) => {
                let tag = source.clone();
                self.spawn(
                    "fetch_tracks",
                    move |g| async move {
                        match source {
                            PlaylistSource::Liked => fetch_all_liked(&g).await,
                            PlaylistSource::Playlist { id, .. } => g.fetch_playlist_tracks(id).await,
                        }
                    },
                    move |result| AppEvent::TracksFetched { source: tag, result },
                )
            }
            Request::Search(query) => {
                let tag = query.clone();
                self.spawn(
                    "search",
                    move |g| async move { g.search_tracks(query, SEARCH_LIMIT).await },
                    move |result| AppEvent::SearchFinished { query: tag, result },
                )
            }
            Request::Command(command) => {
                let tag = command.clone();
                self.spawn(
                    "player_command",
                    move |g| async move { run_command(&g, &command).await },
                    move |result| AppEvent::CommandFinished { command: tag, result },
                )
            }
            Request::PlayInContext { context_uri, offset, context_name } => {
                let context = StartedContext {
                    uri: Some(context_uri.clone()),
                    name: context_name,
                };
                self.spawn(
                    "play_in_context",
                    move |g| async move { g.play_in_context(context_uri, offset).await },
                    move |result| AppEvent::PlayStarted { context, result },
                )
            }
            Request::PlayUriList { uris, offset, context_name } => {
                let context = StartedContext {
                    uri: None,
                    name: context_name,
                };
                self.spawn(
                    "play_uri_list",
                    move |g| async move { g.play_uri_list(uris, offset).await },
                    move |result| AppEvent::PlayStarted { context, result },
                )
            }
            Request::PlaySingle(track) => {
                let uri = track.uri();
                self.spawn(
                    "play_single",
                    move |g| async move { g.play_single(uri).await },
                    move |result| AppEvent::SinglePlayed { track, result },
                )
            }
            Request::SkipToQueuePosition(index) => self.spawn(
                "skip_to_queue_position",
                move |g| async move { skip_to_queue_position(&g, index).await },
                AppEvent::QueueSkipFinished,
            ),
            Request::Recommend { trigger, seeds, limit } => self.spawn(
                "recommend",
                move |g| async move { g.recommend(seeds, limit).await },
                move |result| AppEvent::RecommendationsFetched { trigger, result },
            ),
            Request::Enqueue(track_id) => {
                let tag = track_id.clone();
                self.spawn(
                    "enqueue_track",
                    move |g| async move { g.enqueue_track(track_id).await },
                    move |result| AppEvent::TrackEnqueued { track_id: tag, result },
                )
            }
            Request::ClearErrorAfter(delay) => {
                let events = self.events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(AppEvent::ClearError);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use anyhow::anyhow;
    use tokio::sync::mpsc;

    use super::super::AutoplayTrigger;
    use super::*;
    use crate::model::{DeviceInfo, LikedPage, PlaybackState, PlaylistItem, RepeatMode, Seeds, UserProfile};

    #[derive(Default)]
    struct Calls {
        liked_pages: Vec<(u32, u32)>,
        skips: usize,
        enqueued: Vec<String>,
    }

    /// In-memory gateway that records calls
    #[derive(Clone, Default)]
    struct FakeGateway {
        liked_total: usize,
        /// Saved items the fake drops as unplayable, by position
        liked_unplayable: Vec<usize>,
        fail_skip_at: Option<usize>,
        recommendations: Vec<Track>,
        calls: Arc<Mutex<Calls>>,
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: id.to_string(),
            artists: vec![],
            album: String::new(),
            duration_ms: 1_000,
        }
    }

    impl Gateway for FakeGateway {
        async fn fetch_playback_state(&self) -> Result<Option<PlaybackState>> {
            Ok(None)
        }
        async fn fetch_currently_playing(&self) -> Result<Option<PlaybackState>> {
            Ok(None)
        }
        async fn resume(&self) -> Result<()> {
            Ok(())
        }
        async fn pause(&self) -> Result<()> {
            Err(anyhow!("status code 404"))
        }
        async fn next_track(&self) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.skips += 1;
            if self.fail_skip_at == Some(calls.skips) {
                return Err(anyhow!("skip failed"));
            }
            Ok(())
        }
        async fn previous_track(&self) -> Result<()> {
            Ok(())
        }
        async fn seek(&self, _position_ms: u32) -> Result<()> {
            Ok(())
        }
        async fn set_shuffle(&self, _state: bool) -> Result<()> {
            Ok(())
        }
        async fn set_repeat(&self, _mode: RepeatMode) -> Result<()> {
            Ok(())
        }
        async fn set_volume(&self, _volume: u8) -> Result<()> {
            Ok(())
        }
        async fn transfer_playback(&self, _device_id: String) -> Result<()> {
            Ok(())
        }
        async fn play_in_context(&self, _context_uri: String, _offset: usize) -> Result<()> {
            Ok(())
        }
        async fn play_uri_list(&self, _uris: Vec<String>, _offset: usize) -> Result<()> {
            Ok(())
        }
        async fn play_single(&self, _uri: String) -> Result<()> {
            Ok(())
        }
        async fn fetch_queue(&self) -> Result<Vec<Track>> {
            Ok(vec![])
        }
        async fn enqueue_track(&self, track_id: String) -> Result<()> {
            self.calls.lock().unwrap().enqueued.push(track_id);
            Ok(())
        }
        async fn fetch_devices(&self) -> Result<Vec<DeviceInfo>> {
            Ok(vec![])
        }
        async fn fetch_playlists(&self) -> Result<Vec<PlaylistItem>> {
            Ok(vec![])
        }
        async fn fetch_playlist_tracks(&self, _playlist_id: String) -> Result<Vec<Track>> {
            Ok(vec![track("p1")])
        }
        async fn fetch_liked_page(&self, offset: u32, limit: u32) -> Result<LikedPage> {
            self.calls.lock().unwrap().liked_pages.push((offset, limit));
            let start = (offset as usize).min(self.liked_total);
            let end = (start + limit as usize).min(self.liked_total);
            Ok(LikedPage {
                tracks: (start..end)
                    .filter(|i| !self.liked_unplayable.contains(i))
                    .map(|i| track(&format!("liked{i}")))
                    .collect(),
                has_more: end < self.liked_total,
            })
        }
        async fn fetch_current_user(&self) -> Result<UserProfile> {
            Ok(UserProfile::default())
        }
        async fn search_tracks(&self, _query: String, _limit: u32) -> Result<Vec<Track>> {
            Ok(vec![])
        }
        async fn recommend(&self, _seeds: Seeds, _limit: u32) -> Result<Vec<Track>> {
            Ok(self.recommendations.clone())
        }
    }

    #[tokio::test]
    async fn liked_songs_are_paged_until_short_page() {
        let gateway = FakeGateway {
            liked_total: 117,
            ..Default::default()
        };
        let tracks = fetch_all_liked(&gateway).await.unwrap();

        assert_eq!(tracks.len(), 117);
        let pages = gateway.calls.lock().unwrap().liked_pages.clone();
        assert_eq!(pages, vec![(0, 50), (50, 50), (100, 50)]);
    }

    #[tokio::test]
    async fn unplayable_saved_item_does_not_end_paging() {
        let gateway = FakeGateway {
            liked_total: 117,
            liked_unplayable: vec![10],
            ..Default::default()
        };
        let tracks = fetch_all_liked(&gateway).await.unwrap();

        assert_eq!(tracks.len(), 116);
        assert!(tracks.iter().all(|t| t.id != "liked10"));
        assert_eq!(tracks.last().map(|t| t.id.as_str()), Some("liked116"));
        let pages = gateway.calls.lock().unwrap().liked_pages.clone();
        assert_eq!(pages, vec![(0, 50), (50, 50), (100, 50)]);
    }

    #[tokio::test]
    async fn exact_multiple_of_page_size_stops_on_server_signal() {
        let gateway = FakeGateway {
            liked_total: 100,
            ..Default::default()
        };
        let tracks = fetch_all_liked(&gateway).await.unwrap();

        assert_eq!(tracks.len(), 100);
        let pages = gateway.calls.lock().unwrap().liked_pages.clone();
        assert_eq!(pages, vec![(0, 50), (50, 50)]);
    }

    #[tokio::test]
    async fn skip_issues_index_plus_one_calls() {
        let gateway = FakeGateway::default();
        skip_to_queue_position(&gateway, 3).await.unwrap();
        assert_eq!(gateway.calls.lock().unwrap().skips, 4);
    }

    #[tokio::test]
    async fn skip_stops_at_first_failure() {
        let gateway = FakeGateway {
            fail_skip_at: Some(2),
            ..Default::default()
        };
        assert!(skip_to_queue_position(&gateway, 4).await.is_err());
        assert_eq!(gateway.calls.lock().unwrap().skips, 2);
    }

    #[tokio::test]
    async fn liked_tracks_come_back_tagged() {
        let gateway = FakeGateway {
            liked_total: 3,
            ..Default::default()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        Dispatcher::new(gateway, tx).dispatch(Request::FetchTracks(PlaylistSource::Liked));

        match rx.recv().await {
            Some(AppEvent::TracksFetched { source, result }) => {
                assert_eq!(source, PlaylistSource::Liked);
                assert_eq!(result.unwrap().len(), 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn command_errors_are_formatted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Dispatcher::new(FakeGateway::default(), tx).dispatch(Request::Command(PlayerCommand::Pause));

        match rx.recv().await {
            Some(AppEvent::CommandFinished { command, result }) => {
                assert_eq!(command, PlayerCommand::Pause);
                assert!(result.unwrap_err().starts_with("No active device"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn recommendations_keep_their_trigger() {
        let gateway = FakeGateway {
            recommendations: vec![track("r1")],
            ..Default::default()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        Dispatcher::new(gateway, tx).dispatch(Request::Recommend {
            trigger: AutoplayTrigger::SessionStart,
            seeds: Seeds::default(),
            limit: 20,
        });

        match rx.recv().await {
            Some(AppEvent::RecommendationsFetched { trigger, result }) => {
                assert_eq!(trigger, AutoplayTrigger::SessionStart);
                assert_eq!(result.unwrap(), vec![track("r1")]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_enqueues_complete_independently() {
        let gateway = FakeGateway::default();
        let calls = gateway.calls.clone();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(gateway, tx);
        dispatcher.dispatch_all(vec![Request::Enqueue("a".into()), Request::Enqueue("b".into())]);

        let mut done = Vec::new();
        for _ in 0..2 {
            if let Some(AppEvent::TrackEnqueued { track_id, result }) = rx.recv().await {
                assert!(result.is_ok());
                done.push(track_id);
            }
        }
        done.sort();
        assert_eq!(done, vec!["a", "b"]);
        assert_eq!(calls.lock().unwrap().enqueued.len(), 2);
    }

    #[tokio::test]
    async fn clear_error_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Dispatcher::new(FakeGateway::default(), tx)
            .dispatch(Request::ClearErrorAfter(Duration::from_millis(10)));
        assert!(matches!(rx.recv().await, Some(AppEvent::ClearError)));
    }
}
