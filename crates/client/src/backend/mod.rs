//! Backend query and mutation boundary.
//!
//! ### Contract
//! - `featured` returns the list already ordered and paginated for display.
//! - `follows` answers for the requested subjects only; subjects the
//!   backend omits stay unknown. Without a signed-in viewer every subject
//!   is unknown, which is not an error.
//! - Errors are surfaced as-is. There are no retries at this layer.

pub mod http;

pub use http::{HttpBackend, HttpBackendConfig};

use async_trait::async_trait;
use featured_core::{Error, FeaturedItem, OverlayState, SubjectId};

/// Source of featured records and follow relationships.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    /// Fetch the current featured list.
    async fn featured(&self) -> Result<Vec<FeaturedItem>, Error>;

    /// Fetch the viewer's follow flags for `subjects`.
    async fn follows(&self, subjects: &[SubjectId]) -> Result<OverlayState, Error>;

    /// Follow or unfollow `subject` as the viewer.
    async fn set_follow(&self, subject: &SubjectId, followed: bool) -> Result<(), Error>;
}
