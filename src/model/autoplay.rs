//! Autoplay bookkeeping: the enabled flag, trigger timing and de-dup window

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

/// Number of track ids remembered for de-duplication
pub const RECENTLY_QUEUED_CAPACITY: usize = 50;

/// Bounded FIFO set of track ids that autoplay has already queued.
///
/// Inserting past capacity evicts the oldest id. Inserting an id that is
/// already present does nothing and does not refresh its position.
#[derive(Clone, Debug)]
pub struct RecentlyQueued {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl Default for RecentlyQueued {
    fn default() -> Self {
        Self::with_capacity(RECENTLY_QUEUED_CAPACITY)
    }
}

impl RecentlyQueued {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns false when the id was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.ids.insert(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        if !self.order.is_empty() {
            tracing::debug!(count = self.order.len(), "Clearing recently queued tracks");
        }
        self.order.clear();
        self.ids.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AutoplayState {
    pub enabled: bool,
    pub in_flight: bool,
    pub last_trigger: Option<Instant>,
    pub recent: RecentlyQueued,
}

impl AutoplayState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }
}
