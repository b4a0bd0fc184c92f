//! Error types for the Spotify integration layer.

use thiserror::Error;

/// Main error type for all Spotify operations.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// The access credential supplied by the session holder has expired.
    ///
    /// Propagated unchanged; re-authentication is the caller's job.
    #[error("access token expired")]
    AuthExpired,

    /// HTTP request failed at the transport level (network, timeout).
    #[error("transport failure during {operation}: {source}")]
    Transport {
        /// Name of the operation that issued the request.
        operation: &'static str,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Rate limited by the remote service (HTTP 429).
    ///
    /// Carries the Retry-After hint in seconds when the service provides one.
    /// Never retried automatically.
    #[error("rate limited during {operation} (retry after {retry_after:?}s)")]
    RateLimited {
        /// Name of the operation that issued the request.
        operation: &'static str,
        /// Seconds to wait, from the Retry-After header.
        retry_after: Option<u64>,
    },

    /// A remote payload could not be normalized into the internal schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// One or more pages of a paginated fetch failed.
    ///
    /// Carries the offsets of every failed page. No partial collection is
    /// ever returned alongside this error.
    #[error("partial retrieval: pages at offsets {offsets:?} failed")]
    PartialRetrieval {
        /// Offsets of the pages that failed, ascending.
        offsets: Vec<u32>,
    },

    /// A mutation was rejected because the supplied snapshot token is stale.
    ///
    /// The caller must refetch the playlist and retry with the fresh token;
    /// the reconciler never retries on its own.
    #[error("snapshot conflict: {0}")]
    Conflict(String),

    /// A mutation payload failed local validation before transmission.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Requested resource does not exist (HTTP 404).
    #[error("not found during {operation}: {message}")]
    NotFound {
        /// Name of the operation that issued the request.
        operation: &'static str,
        /// Message from the remote service.
        message: String,
    },

    /// Any other remote API failure.
    #[error("{operation} failed with status {status}: {message}")]
    Api {
        /// Name of the operation that issued the request.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Message from the remote service.
        message: String,
    },
}

/// Result type alias for Spotify operations.
pub type Result<T> = std::result::Result<T, SpotifyError>;
