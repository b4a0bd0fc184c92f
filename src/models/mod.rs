//! Internal schema for normalized Spotify resources.
//!
//! Every entity here is a fresh, caller-owned value object created per
//! retrieval call. Raw remote payload shapes never appear in this module;
//! the mapping from wire shape to these types lives in [`crate::normalize`].

pub mod album;
pub mod artist;
pub mod common;
pub mod playlist;
pub mod track;
pub mod user;

// Re-exports for convenience
pub use album::{Album, SavedAlbum, TrackAlbum};
pub use artist::{Artist, ArtistStub};
pub use common::{Image, Paginated, ReleaseDate, ResourceKind, ResourceRef};
pub use playlist::{Playlist, PlaylistDetails, PlaylistSummary};
pub use track::Track;
pub use user::{UserProfile, UserRef};
