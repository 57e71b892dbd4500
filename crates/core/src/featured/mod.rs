//! In-memory featured list cache with a follow-state overlay.
//!
//! ### Contents
//! - The last fetched, ordered list of [`FeaturedItem`]s.
//! - An [`OverlayState`] of follow flags keyed by [`SubjectId`], refreshed
//!   independently of the list and merged at read time via
//!   [`FeaturedCache::projected_view`].
//! - A freshness timestamp driving [`FeaturedCache::is_stale`].
//!
//! ### Write Semantics
//! - Every setter replaces its field wholesale and stamps the refresh time.
//! - There is no per-entry expiry; the whole cache is replaced or cleared.
//! - Records are never modified after they are handed to the cache.

pub mod cache;
pub mod clock;
pub mod model;
pub mod overlay;

pub use cache::{CacheSnapshot, CacheState, DEFAULT_STALENESS_WINDOW, FeaturedCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use model::{FeaturedItem, ItemId, SubjectId};
pub use overlay::{FollowState, OverlayState, ProjectedItem};
