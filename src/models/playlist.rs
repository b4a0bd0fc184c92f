//! Playlist models.

use serde::{Deserialize, Serialize};

use super::common::{Image, Paginated, ResourceRef};
use super::track::Track;
use super::user::UserRef;

/// A fully materialized playlist.
///
/// `snapshot_id` is the opaque version marker issued by the remote service.
/// It changes on every successful track-list mutation and must be supplied
/// on the next one (optimistic concurrency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Playlist name.
    pub name: String,

    /// Playlist description, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Playlist owner.
    pub owner: UserRef,

    /// Tracks in playlist order.
    pub tracks: Paginated<Track>,

    /// Concurrency token for track-list mutations.
    pub snapshot_id: String,

    /// Whether the playlist is public.
    pub public: bool,

    /// Whether the playlist is collaborative.
    pub collaborative: bool,

    /// Playlist cover images.
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Playlist {
    /// Number of materialized tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.items.len()
    }

    /// Total duration of all materialized tracks in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.tracks.items.iter().map(|t| t.duration_ms).sum()
    }

    /// Largest cover image available, by area.
    pub fn largest_image(&self) -> Option<&Image> {
        self.images
            .iter()
            .max_by_key(|img| img.width.unwrap_or(0) * img.height.unwrap_or(0))
    }
}

/// A playlist row from a list endpoint (user playlists, featured playlists).
///
/// Carries no track items; fetch the full playlist for those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Playlist name.
    pub name: String,

    /// Playlist description, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Playlist owner.
    pub owner: UserRef,

    /// Whether the playlist is public. Spotify reports `null` for playlists
    /// outside the user's own library.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,

    /// Whether the playlist is collaborative.
    pub collaborative: bool,

    /// Track count reported by the list row, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_count: Option<u32>,

    /// Concurrency token, when the list row carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,

    /// Playlist cover images.
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Editable playlist metadata.
///
/// Used both to create a playlist and to patch an existing one. Metadata
/// writes carry no snapshot token; the remote treats them as
/// last-writer-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetails {
    /// Playlist name.
    pub name: String,

    /// Playlist description.
    pub description: String,

    /// Whether the playlist is public.
    pub public: bool,

    /// Whether the playlist is collaborative.
    pub collaborative: bool,
}
