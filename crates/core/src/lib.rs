//! Core types and shared functionality for the featured feed client.
//!
//! This crate provides:
//! - The in-memory featured cache with staleness tracking and follow overlay
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod featured;

pub use config::AppConfig;
pub use error::Error;
pub use featured::{
    CacheSnapshot, CacheState, Clock, FeaturedCache, FeaturedItem, FollowState, ItemId, ManualClock, OverlayState,
    ProjectedItem, SubjectId, SystemClock,
};
