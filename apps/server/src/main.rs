// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ytinfo Server - cached YouTube video metadata over HTTP.
//!
//! Successful lookups are cached for four hours and failed ones for one
//! hour, so repeated requests for the same video never hit YouTube twice
//! within that window.
//!
//! # Endpoints
//!
//! - `GET /?id=<videoId>` - Metadata by video id
//! - `GET /?url=<videoUrl>` - Metadata by URL (`id` wins when both are given)
//! - `GET /api/v1/health` - Health check with cache counters

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use ytinfo_core::{FetchCoordinator, ResponseCache};

mod config;
mod routes;
mod services;

use config::Config;
use services::YoutubeFetcher;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: FetchCoordinator,
}

/// Build the router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::metadata::lookup))
        .route("/api/v1/health", get(routes::health::check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "info,tower_http=debug,ytinfo_server=debug,ytinfo_core=debug".into()
        }))
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        clear_cache = config.clear_cache,
        success_ttl_secs = config.success_ttl_secs,
        error_ttl_secs = config.error_ttl_secs,
        cache_check_period_secs = config.cache_check_period_secs,
        "Starting ytinfo server"
    );

    let cache = Arc::new(ResponseCache::with_system_clock());
    if config.clear_cache {
        let removed = cache.clear();
        tracing::info!(removed, "Cleared cache on start");
    }
    let _sweeper = cache.spawn_sweeper(config.cache_check_period());

    let fetcher = YoutubeFetcher::new(&config.oembed_endpoint)
        .context("Failed to build HTTP client")?;

    let state = AppState {
        coordinator: FetchCoordinator::new(cache, Arc::new(fetcher), config.ttl_policy()),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
