//! Shared HTTP plumbing for the Spotify Web API.
//!
//! Every outbound call reads the bearer token from the injected
//! [`TokenProvider`] and maps non-success statuses onto the error taxonomy.
//! Remote failures are annotated with the originating operation name and
//! surfaced unchanged; nothing here retries or logs-and-discards.

use std::sync::Arc;

use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, error};

use crate::auth::TokenProvider;
use crate::error::{Result, SpotifyError};

/// Base URL for the Spotify Web API.
pub(crate) const API_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Map a non-success HTTP status onto the error taxonomy.
///
/// 409, and 400 responses whose message names the snapshot, both surface as
/// [`SpotifyError::Conflict`]: Spotify reports stale snapshot tokens either
/// way depending on the endpoint.
pub(crate) fn status_error(
    operation: &'static str,
    status: u16,
    retry_after: Option<u64>,
    message: String,
) -> SpotifyError {
    match status {
        401 => SpotifyError::AuthExpired,
        404 => SpotifyError::NotFound { operation, message },
        429 => SpotifyError::RateLimited {
            operation,
            retry_after,
        },
        409 => SpotifyError::Conflict(message),
        400 if message.to_ascii_lowercase().contains("snapshot") => {
            SpotifyError::Conflict(message)
        }
        _ => SpotifyError::Api {
            operation,
            status,
            message,
        },
    }
}

/// Pull the human-readable message out of a Spotify error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// HTTP client handle shared by the aggregation client and the reconciler.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub(crate) struct Http {
    client: Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
}

impl Http {
    pub(crate) fn new(client: Client, tokens: Arc<dyn TokenProvider>, base_url: String) -> Self {
        Self {
            client,
            tokens,
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with the current bearer token and map error statuses.
    async fn dispatch(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<RequestBody<'_>>,
    ) -> Result<Response> {
        let token = self.tokens.access_token()?;
        let url = self.url(path);
        debug!(%method, %url, operation, "request");

        let mut builder = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .query(query);
        builder = match body {
            Some(RequestBody::Json(json)) => builder.json(json),
            Some(RequestBody::Raw { content_type, data }) => builder
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(data.to_string()),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|source| SpotifyError::Transport { operation, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        error!(operation, status = status.as_u16(), %message, "remote error");

        Err(status_error(
            operation,
            status.as_u16(),
            retry_after,
            message,
        ))
    }

    /// GET a JSON document.
    pub(crate) async fn get_json(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let response = self
            .dispatch(operation, Method::GET, path, query, None)
            .await?;
        response.json::<Value>().await.map_err(|e| {
            SpotifyError::MalformedPayload(format!("{operation}: invalid JSON body: {e}"))
        })
    }

    /// Send a JSON body and return the response document.
    ///
    /// Endpoints that answer with an empty body yield `Value::Null`.
    pub(crate) async fn send_json(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Value> {
        let response = self
            .dispatch(operation, method, path, &[], Some(RequestBody::Json(body)))
            .await?;
        let text = response
            .text()
            .await
            .map_err(|source| SpotifyError::Transport { operation, source })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            SpotifyError::MalformedPayload(format!("{operation}: invalid JSON body: {e}"))
        })
    }

    /// PUT a raw body (cover image uploads).
    pub(crate) async fn put_raw(
        &self,
        operation: &'static str,
        path: &str,
        content_type: &'static str,
        data: &str,
    ) -> Result<()> {
        self.dispatch(
            operation,
            Method::PUT,
            path,
            &[],
            Some(RequestBody::Raw { content_type, data }),
        )
        .await?;
        Ok(())
    }
}

enum RequestBody<'a> {
    Json(&'a Value),
    Raw {
        content_type: &'static str,
        data: &'a str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_401_is_auth_expired() {
        assert!(matches!(
            status_error("get_profile", 401, None, String::new()),
            SpotifyError::AuthExpired
        ));
    }

    #[test]
    fn test_status_429_carries_retry_after() {
        match status_error("get_playlists", 429, Some(7), String::new()) {
            SpotifyError::RateLimited {
                operation,
                retry_after,
            } => {
                assert_eq!(operation, "get_playlists");
                assert_eq!(retry_after, Some(7));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_status_409_is_conflict() {
        assert!(matches!(
            status_error("replace_playlist_tracks", 409, None, "stale".to_string()),
            SpotifyError::Conflict(_)
        ));
    }

    #[test]
    fn test_status_400_with_snapshot_message_is_conflict() {
        let err = status_error(
            "replace_playlist_tracks",
            400,
            None,
            "Snapshot ID is stale".to_string(),
        );
        assert!(matches!(err, SpotifyError::Conflict(_)));
    }

    #[test]
    fn test_status_400_without_snapshot_message_is_api_error() {
        let err = status_error("replace_playlist_tracks", 400, None, "bad uri".to_string());
        assert!(matches!(err, SpotifyError::Api { status: 400, .. }));
    }

    #[test]
    fn test_status_404_is_not_found() {
        assert!(matches!(
            status_error("get_playlist", 404, None, "gone".to_string()),
            SpotifyError::NotFound { .. }
        ));
    }

    #[test]
    fn test_error_message_prefers_structured_body() {
        let body = r#"{"error":{"status":403,"message":"Insufficient scope"}}"#;
        assert_eq!(error_message(body), "Insufficient scope");
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        assert_eq!(error_message("upstream exploded"), "upstream exploded");
    }
}
