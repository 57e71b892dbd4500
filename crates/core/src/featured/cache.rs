//! The featured cache and its staleness oracle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::model::{FeaturedItem, SubjectId};
use super::overlay::{FollowState, OverlayState, ProjectedItem};

/// Window after which a populated cache is due for refresh.
pub const DEFAULT_STALENESS_WINDOW: Duration = Duration::from_secs(60);

/// Whether the cache has been written since creation or the last clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Populated,
}

/// Owned copy of the cache contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub records: Vec<FeaturedItem>,
    pub overlay: OverlayState,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Featured list plus follow overlay, with a freshness timestamp.
///
/// One instance per session or view, built by the composition root and
/// handed to consumers. Setters take `&mut self` and replace a whole field
/// at once, so readers never observe a half-written cache. Concurrent
/// refreshes are not arbitrated here: the last write wins.
#[derive(Debug, Clone)]
pub struct FeaturedCache {
    records: Vec<FeaturedItem>,
    overlay: OverlayState,
    last_refreshed_at: Option<DateTime<Utc>>,
    staleness_window: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for FeaturedCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALENESS_WINDOW)
    }
}

impl FeaturedCache {
    /// Create an empty cache using the system clock.
    pub fn new(staleness_window: Duration) -> Self {
        Self::with_clock(staleness_window, Arc::new(SystemClock))
    }

    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(staleness_window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { records: Vec::new(), overlay: OverlayState::new(), last_refreshed_at: None, staleness_window, clock }
    }

    /// True if the cache was never populated, or a full staleness window
    /// has elapsed since the last write.
    ///
    /// A timestamp in the future (clock stepped backwards) counts as fresh.
    pub fn is_stale(&self) -> bool {
        match self.age() {
            None => true,
            Some(age) => age.to_std().is_ok_and(|age| age >= self.staleness_window),
        }
    }

    /// Replace the featured list. The previous list is discarded, not merged.
    pub fn set_records(&mut self, records: Vec<FeaturedItem>) {
        let now = self.clock.now();
        tracing::debug!(count = records.len(), replaced = self.records.len(), "featured records replaced");
        self.records = records;
        self.last_refreshed_at = Some(now);
    }

    /// Replace the follow overlay. Keys missing from `overlay` become unknown.
    pub fn set_overlay(&mut self, overlay: OverlayState) {
        let now = self.clock.now();
        tracing::debug!(count = overlay.len(), replaced = self.overlay.len(), "follow overlay replaced");
        self.overlay = overlay;
        self.last_refreshed_at = Some(now);
    }

    /// Reset to the empty, never-populated state.
    pub fn clear(&mut self) {
        if self.last_refreshed_at.is_some() {
            tracing::debug!("featured cache cleared");
        }
        self.records.clear();
        self.overlay = OverlayState::new();
        self.last_refreshed_at = None;
    }

    pub fn records(&self) -> &[FeaturedItem] {
        &self.records
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    pub fn staleness_window(&self) -> Duration {
        self.staleness_window
    }

    /// Time since the last write, or `None` if never populated.
    pub fn age(&self) -> Option<TimeDelta> {
        self.last_refreshed_at.map(|at| self.clock.now() - at)
    }

    pub fn state(&self) -> CacheState {
        if self.last_refreshed_at.is_some() { CacheState::Populated } else { CacheState::Empty }
    }

    pub fn is_empty(&self) -> bool {
        self.state() == CacheState::Empty
    }

    pub fn follow_state(&self, subject: &SubjectId) -> FollowState {
        self.overlay.follow_state(subject)
    }

    /// Records in fetch order, each paired with its owner's follow state.
    pub fn projected_view(&self) -> Vec<ProjectedItem<'_>> {
        self.records
            .iter()
            .map(|item| ProjectedItem::project(item, &self.overlay))
            .collect()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            records: self.records.clone(),
            overlay: self.overlay.clone(),
            last_refreshed_at: self.last_refreshed_at,
        }
    }
}
