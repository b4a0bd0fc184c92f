//! Album models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artist::ArtistStub;
use super::common::{Image, ReleaseDate, ResourceRef};

/// A full album record, as returned by the saved-albums and artist-albums
/// operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Album name.
    pub name: String,

    /// Album artists.
    #[serde(default)]
    pub artists: Vec<ArtistStub>,

    /// Release date, at the precision Spotify reports.
    pub release_date: ReleaseDate,

    /// Total number of tracks on the album.
    pub total_tracks: u32,

    /// Cover images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Album {
    /// Primary (first-listed) artist.
    pub fn primary_artist(&self) -> Option<&ArtistStub> {
        self.artists.first()
    }

    /// All artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// An album in the user's library, with the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAlbum {
    /// When the album was added to the library.
    pub added_at: DateTime<Utc>,

    /// The album itself.
    pub album: Album,
}

/// Album as nested inside a track.
///
/// Carries the subset of album fields the embedding payloads provide;
/// `total_tracks` and artists are absent in the playlist-item shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAlbum {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Album name.
    pub name: String,

    /// Release date, at the precision Spotify reports.
    pub release_date: ReleaseDate,

    /// Total track count, when the embedding payload carries it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tracks: Option<u32>,

    /// Album artists, when the embedding payload carries them.
    #[serde(default)]
    pub artists: Vec<ArtistStub>,

    /// Cover images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,
}
