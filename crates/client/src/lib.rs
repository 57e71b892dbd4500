//! Client code for the featured feed.
//!
//! This crate provides the backend collaborator boundary, an HTTP
//! implementation of it, and the loader that keeps a `FeaturedCache`
//! filled from the backend.

pub mod backend;
pub mod loader;

pub use backend::{FeedBackend, HttpBackend, HttpBackendConfig};
pub use loader::FeaturedLoader;
