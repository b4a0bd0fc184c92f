//! API clients for the Spotify Web API.
//!
//! - [`SpotifyClient`]: read side — aggregation over the retrieval endpoints
//! - [`Reconciler`]: write side — playlist mutations under optimistic
//!   concurrency
//! - [`pages`]: concurrent page fan-out shared by oversized collections

pub mod client;
mod http;
pub mod pages;
pub mod reconciler;

pub use client::SpotifyClient;
pub use pages::{fetch_all, page_offsets, PAGE_SIZE};
pub use reconciler::{Reconciler, TrackListUpdate};
