//! Queue refill policy.
//!
//! Two triggers lead to the same recommend-then-enqueue action. A refill
//! fires from the tick when the queue runs low; a session start fires once
//! after a single out-of-context track starts playing.

use std::time::{Duration, Instant};

use crate::model::{AppModel, RecentlyQueued, Seeds, Track};

use super::{AppController, AutoplayTrigger, Request};

/// Refill is eligible at or below this many queued tracks
pub const LOW_WATER_MARK: usize = 2;
pub const COOLDOWN: Duration = Duration::from_secs(30);
/// The recommendation endpoint accepts at most five seeds in total
pub const MAX_SEEDS: usize = 5;
const MAX_SEED_ARTISTS: usize = 2;
const MAX_SEED_QUEUE_TRACKS: usize = 2;

impl AutoplayTrigger {
    pub fn batch_size(self) -> usize {
        match self {
            AutoplayTrigger::Refill => 3,
            AutoplayTrigger::SessionStart => 10,
        }
    }

    pub fn request_limit(self) -> u32 {
        match self {
            AutoplayTrigger::Refill => 10,
            AutoplayTrigger::SessionStart => 20,
        }
    }
}

pub fn should_refill(model: &AppModel, now: Instant) -> bool {
    let autoplay = &model.autoplay;
    if !autoplay.enabled || autoplay.in_flight {
        return false;
    }
    if !model.playback.is_playing() {
        return false;
    }
    if model.queue.len() > LOW_WATER_MARK {
        return false;
    }
    match autoplay.last_trigger {
        Some(last) => now.saturating_duration_since(last) >= COOLDOWN,
        None => true,
    }
}

/// Current track, up to two of its artists, then the head of the queue
/// while the total stays within `MAX_SEEDS`.
pub fn refill_seeds(current: Option<&Track>, queue: &[Track]) -> Seeds {
    let mut seeds = Seeds::default();
    if let Some(track) = current {
        seeds.track_ids.push(track.id.clone());
        seeds.artist_ids.extend(
            track
                .artists
                .iter()
                .filter(|a| !a.id.is_empty())
                .take(MAX_SEED_ARTISTS)
                .map(|a| a.id.clone()),
        );
    }
    let remaining = MAX_SEEDS.saturating_sub(seeds.len()).min(MAX_SEED_QUEUE_TRACKS);
    seeds
        .track_ids
        .extend(queue.iter().take(remaining).map(|t| t.id.clone()));
    seeds
}

/// Pick up to `batch` candidates not seen recently, recording each pick.
pub fn select_batch(candidates: Vec<Track>, recent: &mut RecentlyQueued, batch: usize) -> Vec<Track> {
    let mut picked = Vec::with_capacity(batch);
    for track in candidates {
        if picked.len() >= batch {
            break;
        }
        if recent.insert(&track.id) {
            picked.push(track);
        }
    }
    picked
}

impl AppController {
    pub(super) fn maybe_refill(&mut self, now: Instant) -> Option<Request> {
        if !should_refill(&self.model, now) {
            return None;
        }
        let seeds = refill_seeds(self.model.playback.track.as_ref(), &self.model.queue.tracks);
        tracing::info!(queue_len = self.model.queue.len(), seeds = seeds.len(), "Autoplay: refilling queue");
        Some(self.begin_recommendation(AutoplayTrigger::Refill, seeds, now))
    }

    /// A single track started outside any context. The de-dup window is
    /// reset and, with autoplay on, a larger batch is requested regardless
    /// of the refill gates.
    pub(super) fn start_session(&mut self, track: &Track, now: Instant) -> Option<Request> {
        let autoplay = &mut self.model.autoplay;
        autoplay.recent.clear();
        autoplay.recent.insert(&track.id);
        if !autoplay.enabled {
            return None;
        }
        let seeds = Seeds {
            track_ids: vec![track.id.clone()],
            artist_ids: Vec::new(),
        };
        tracing::info!(track = %track.name, "Autoplay: new listening session");
        Some(self.begin_recommendation(AutoplayTrigger::SessionStart, seeds, now))
    }

    fn begin_recommendation(&mut self, trigger: AutoplayTrigger, seeds: Seeds, now: Instant) -> Request {
        self.model.autoplay.in_flight = true;
        self.model.autoplay.last_trigger = Some(now);
        Request::Recommend {
            trigger,
            seeds,
            limit: trigger.request_limit(),
        }
    }

    pub(super) fn on_recommendations(
        &mut self,
        trigger: AutoplayTrigger,
        result: Result<Vec<Track>, String>,
        now: Instant,
    ) -> Vec<Request> {
        let autoplay = &mut self.model.autoplay;
        autoplay.in_flight = false;
        autoplay.last_trigger = Some(now);

        let candidates = match result {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::error!(error = %e, "Autoplay: failed to get recommendations");
                return self.fail(format!("Autoplay: {}", e));
            }
        };

        let batch = select_batch(candidates, &mut autoplay.recent, trigger.batch_size());
        tracing::info!(count = batch.len(), trigger = ?trigger, "Autoplay: queuing tracks");
        batch.into_iter().map(|t| Request::Enqueue(t.id)).collect()
    }

    pub(super) fn on_track_enqueued(&mut self, track_id: String, result: Result<(), String>) -> Vec<Request> {
        match result {
            Ok(()) => tracing::debug!(track_id, "Autoplay: track queued"),
            Err(e) => tracing::error!(track_id, error = %e, "Autoplay: failed to queue track"),
        }
        Vec::new()
    }
}
