//! featured entry point.
//!
//! Composition root: loads configuration, builds one backend and one cache,
//! loads the featured list and prints it with follow state as JSON.
//! Logging goes to stderr so stdout carries only the JSON document.

use anyhow::{Context, Result};
use featured_client::{FeaturedLoader, HttpBackend, HttpBackendConfig};
use featured_core::{AppConfig, FeaturedCache};
use tracing_subscriber::EnvFilter;

mod output;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        backend_url = %config.backend_url,
        staleness_window_secs = config.staleness_window_secs,
        "Starting featured client"
    );

    let backend = HttpBackend::new(HttpBackendConfig::from(&config))?;
    let cache = FeaturedCache::new(config.staleness_window());
    let mut loader = FeaturedLoader::new(backend, cache);

    let cache = loader.load().await.context("loading featured list")?;
    let document = output::FeaturedOutput::from_cache(cache);

    println!("{}", serde_json::to_string_pretty(&document)?);

    Ok(())
}
