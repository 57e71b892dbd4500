//! JSON document printed by the binary.

use chrono::{DateTime, Utc};
use featured_core::{FeaturedCache, ProjectedItem};
use serde::Serialize;

/// Featured list with each item's follow state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedOutput<'a> {
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub items: Vec<ProjectedItem<'a>>,
}

impl<'a> FeaturedOutput<'a> {
    pub fn from_cache(cache: &'a FeaturedCache) -> Self {
        Self { last_refreshed_at: cache.last_refreshed_at(), items: cache.projected_view() }
    }
}
