// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use ytinfo_core::CacheStats;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub cache: CacheHealth,
}

/// Cache counters and the TTLs currently applied.
#[derive(Debug, Serialize)]
pub struct CacheHealth {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub success_ttl_secs: u64,
    pub error_ttl_secs: u64,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ttl = state.coordinator.ttl();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "ytinfo-server",
        cache: CacheHealth {
            stats: state.coordinator.cache().stats(),
            success_ttl_secs: ttl.success.as_secs(),
            error_ttl_secs: ttl.failure.as_secs(),
        },
    })
}
