//! # Tunesync
//!
//! A Rust client layer for the Spotify Web API: typed models, concurrent
//! paginated retrieval, and playlist write-back under optimistic
//! concurrency.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tunesync::{SpotifyClient, StaticToken};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // The session holder owns token acquisition; inject it.
//!     let tokens = Arc::new(StaticToken::new(std::env::var("SPOTIFY_ACCESS_TOKEN")?));
//!     let client = SpotifyClient::new(tokens);
//!
//!     // Oversized track lists are fetched page-concurrently and
//!     // reassembled in playlist order.
//!     let playlist = client.playlist("37i9dQZF1DXcBWIGoYBM5M").await?;
//!     println!("{} ({} tracks)", playlist.name, playlist.track_count());
//!
//!     // Write local edits back under the playlist's snapshot token.
//!     let kept: Vec<_> = playlist
//!         .tracks
//!         .items
//!         .iter()
//!         .filter(|t| !t.explicit)
//!         .cloned()
//!         .collect();
//!     let update = client
//!         .reconciler()
//!         .replace_tracks(&playlist.reference.id, &playlist.snapshot_id, &kept)
//!         .await?;
//!     println!("new snapshot: {}", update.snapshot_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! - **Normalization**: every remote payload is mapped into the internal
//!   schema in [`normalize`]; raw wire shapes never cross the public
//!   surface, and malformed payloads fail loudly instead of mis-mapping.
//! - **Pagination**: collections past the API's 100-item page cap are
//!   fetched with an all-or-nothing concurrent fan-out ([`api::pages`]).
//! - **Reconciliation**: track-list mutations carry a snapshot token; a
//!   stale token surfaces as [`SpotifyError::Conflict`] and is never
//!   retried automatically.
//! - **Credentials**: injected via [`TokenProvider`]; the library never
//!   refreshes or stores tokens.

pub mod api;
pub mod auth;
pub mod error;
pub mod models;
pub mod normalize;

// Main interfaces
pub use api::{Reconciler, SpotifyClient, TrackListUpdate};
pub use auth::{SharedTokenProvider, StaticToken, TokenProvider};
pub use error::{Result, SpotifyError};
pub use models::{
    Album, Artist, Paginated, Playlist, PlaylistDetails, PlaylistSummary, SavedAlbum, Track,
    UserProfile,
};
