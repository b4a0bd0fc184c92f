//! Artist models.

use serde::{Deserialize, Serialize};

use super::common::{Image, ResourceRef};

/// Artist as nested inside tracks, albums and playlists.
///
/// Nested artist payloads carry identity only; images and genres are not
/// present on stubs and normalize to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistStub {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Artist name.
    pub name: String,

    /// Images, when the embedding payload happens to carry them.
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A full artist record, as returned by the followed-artists, top-artists
/// and related-artists operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Artist name.
    pub name: String,

    /// Genres associated with the artist.
    #[serde(default)]
    pub genres: Vec<String>,

    /// Artist images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,

    /// Follower count, when the endpoint reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,

    /// Popularity score (0-100), when the endpoint reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

impl Artist {
    /// Largest image available, by area.
    pub fn largest_image(&self) -> Option<&Image> {
        self.images
            .iter()
            .max_by_key(|img| img.width.unwrap_or(0) * img.height.unwrap_or(0))
    }
}
