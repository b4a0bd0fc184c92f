//! Access-credential injection.
//!
//! The integration layer never manages tokens itself: an external session
//! holder owns acquisition and refresh, and the client reads the current
//! bearer token through [`TokenProvider`] before every outbound call. Passing
//! the provider in explicitly (instead of module-level client state) keeps
//! concurrent sessions and mock tokens in tests straightforward.

use std::sync::Arc;

use crate::error::{Result, SpotifyError};

/// Source of the bearer token used on every outbound call.
///
/// Implementations are supplied by the session holder. Returning
/// [`SpotifyError::AuthExpired`] signals that the credential can no longer be
/// used; the error propagates to the caller unchanged.
pub trait TokenProvider: Send + Sync {
    /// Current access token, or `AuthExpired` if none is available.
    fn access_token(&self) -> Result<String>;
}

/// Shared handle to a token provider.
pub type SharedTokenProvider = Arc<dyn TokenProvider>;

/// Fixed token, never refreshed.
///
/// Useful for tests and short-lived CLI sessions where the token outlives
/// the process.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wrap an already-acquired access token.
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(SpotifyError::AuthExpired);
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_returns_value() {
        let provider = StaticToken::new("abc123");
        assert_eq!(provider.access_token().unwrap(), "abc123");
    }

    #[test]
    fn test_empty_static_token_is_expired() {
        let provider = StaticToken::new("");
        assert!(matches!(
            provider.access_token(),
            Err(SpotifyError::AuthExpired)
        ));
    }
}
