// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Metadata lookup endpoint.

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use ytinfo_core::ResourceRequest;

/// GET /?id=<videoId> or GET /?url=<videoUrl> - Cached metadata lookup.
///
/// Always answers 200; `success` in the body tells hits from failures.
/// Repeated query keys keep the last value.
pub async fn lookup(
    State(state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Response {
    let request = ResourceRequest {
        id: params.remove("id"),
        url: params.remove("url"),
    };
    tracing::debug!(id = ?request.id, url = ?request.url, "Metadata query");

    let envelope = state.coordinator.resolve(&request).await.into_envelope();

    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
        ],
        Json(envelope),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get_json, test_app, CountingFetcher};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_lookup_by_id_returns_success_envelope() {
        let (app, fetcher) = test_app(CountingFetcher::ok(json!({ "title": "T" })));

        let (status, headers, body) = get_json(app, "/?id=abc123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": { "title": "T" } }));
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(fetcher.urls(), vec!["https://www.youtube.com/watch?v=abc123"]);
    }

    #[tokio::test]
    async fn test_missing_parameters_answer_200_with_failure() {
        let (app, fetcher) = test_app(CountingFetcher::ok(json!({ "title": "T" })));

        let (status, _headers, body) = get_json(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": false, "data": "Missing `url` or `id` parameter." })
        );
        assert!(fetcher.urls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_answers_200_and_is_cached() {
        let (app, fetcher) = test_app(CountingFetcher::status(410));

        let (status, _, first) = get_json(app.clone(), "/?id=badurl").await;
        let (_, _, second) = get_json(app, "/?url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dbadurl").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, json!({ "success": false, "data": { "statusCode": 410 } }));
        assert_eq!(second, first);
        assert_eq!(fetcher.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_id_wins_over_url() {
        let (app, fetcher) = test_app(CountingFetcher::ok(json!({ "title": "T" })));

        get_json(app, "/?url=https%3A%2F%2Fyoutu.be%2Fother&id=first").await;

        assert_eq!(fetcher.urls(), vec!["https://www.youtube.com/watch?v=first"]);
    }

    #[tokio::test]
    async fn test_repeated_query_key_keeps_last_value() {
        let (app, fetcher) = test_app(CountingFetcher::ok(json!({ "title": "T" })));

        let (status, _, body) = get_json(app, "/?id=a&id=b").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(fetcher.urls(), vec!["https://www.youtube.com/watch?v=b"]);
    }
}
