// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! YouTube metadata lookups over the oEmbed endpoint.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use ytinfo_core::{FetchError, MetadataFetcher, ResourceKey};

/// Hosts whose URLs carry a `v=` query parameter.
const QUERY_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
];

/// Hosts whose URLs carry the id as the path.
const PATH_HOSTS: &[&str] = &["youtu.be", "www.youtube-nocookie.com", "youtube-nocookie.com"];

/// Check that a key points at a YouTube video page.
pub fn is_youtube_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    QUERY_HOSTS.contains(&host.as_str()) || PATH_HOSTS.contains(&host.as_str())
}

/// Fetcher backed by YouTube's oEmbed endpoint.
#[derive(Debug, Clone)]
pub struct YoutubeFetcher {
    endpoint: String,
    http: reqwest::Client,
}

impl YoutubeFetcher {
    /// Create a fetcher querying `endpoint`.
    pub fn new(endpoint: &str) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ytinfo-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl MetadataFetcher for YoutubeFetcher {
    async fn fetch(&self, key: &ResourceKey) -> Result<Value, FetchError> {
        if !is_youtube_url(key.as_str()) {
            return Err(FetchError::message("Not a YouTube domain"));
        }

        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("url", key.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| FetchError::message(format!("Request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("Upstream error");
            let message = match body.trim() {
                "" => reason.to_string(),
                text => text.to_string(),
            };
            tracing::debug!(key = %key, status = status.as_u16(), "oEmbed lookup rejected");
            return Err(FetchError::status(status.as_u16()).with_message(message));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::message(format!("Invalid metadata response: {}", e)))
    }
}
