//! Read-through loading of the featured cache.
//!
//! ### Refresh Flow
//! - `load` returns the cache untouched while it is fresh.
//! - Once stale, the featured list is fetched, then follow flags for the
//!   distinct owners in that list.
//! - The cache is written only after both fetches succeed, so a failed
//!   refresh leaves the previous contents (and their timestamp) in place.
//!
//! ### Follow Updates
//! - The mutation goes to the backend first; on success the single flag is
//!   merged into the current overlay and the full map is written back.

use std::collections::HashSet;

use featured_core::{Error, FeaturedCache, FeaturedItem, SubjectId};

use crate::backend::FeedBackend;

/// Keeps one `FeaturedCache` filled from one backend.
#[derive(Debug)]
pub struct FeaturedLoader<B> {
    backend: B,
    cache: FeaturedCache,
}

impl<B: FeedBackend> FeaturedLoader<B> {
    pub fn new(backend: B, cache: FeaturedCache) -> Self {
        Self { backend, cache }
    }

    /// Return the cache, refreshing it first if it is stale.
    pub async fn load(&mut self) -> Result<&FeaturedCache, Error> {
        if !self.cache.is_stale() {
            tracing::debug!(age = ?self.cache.age(), "featured cache hit");
            return Ok(&self.cache);
        }
        self.refresh().await
    }

    /// Refetch records and follow flags regardless of freshness.
    pub async fn refresh(&mut self) -> Result<&FeaturedCache, Error> {
        let records = self.backend.featured().await.inspect_err(|e| {
            tracing::warn!(error = %e, "featured refresh failed; keeping cached list");
        })?;

        let owners = distinct_owners(&records);
        let overlay = self.backend.follows(&owners).await.inspect_err(|e| {
            tracing::warn!(error = %e, owners = owners.len(), "follow refresh failed; keeping cached list");
        })?;

        self.cache.set_records(records);
        self.cache.set_overlay(overlay);
        Ok(&self.cache)
    }

    /// Follow or unfollow `subject`, then record the new flag locally.
    pub async fn set_follow(&mut self, subject: &SubjectId, followed: bool) -> Result<(), Error> {
        if subject.as_str().is_empty() {
            return Err(Error::InvalidInput("subject id cannot be empty".into()));
        }

        self.backend.set_follow(subject, followed).await?;

        let next = self.cache.overlay().with(subject.clone(), followed);
        self.cache.set_overlay(next);
        tracing::debug!(%subject, followed, "follow flag updated");
        Ok(())
    }

    /// Drop everything cached, e.g. on sign-out.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &FeaturedCache {
        &self.cache
    }
}

/// Owners of `records` in first-seen order, without duplicates.
fn distinct_owners(records: &[FeaturedItem]) -> Vec<SubjectId> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|item| item.owner.as_ref())
        .filter(|owner| seen.insert(*owner))
        .cloned()
        .collect()
}
