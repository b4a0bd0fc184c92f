//! Track model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::album::TrackAlbum;
use super::artist::ArtistStub;
use super::common::ResourceRef;

/// A track, in any context it appears: top tracks, artist top tracks, or a
/// playlist item.
///
/// Local tracks (`is_local == true`) come from the user's own file library.
/// They have no catalog entry, so their reference id may be empty (the URI
/// still identifies them), and they can never be part of an outbound
/// track-list mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Resource identity.
    pub reference: ResourceRef,

    /// Track name.
    pub name: String,

    /// Album containing this track.
    pub album: TrackAlbum,

    /// Artists who performed this track, primary first.
    #[serde(default)]
    pub artists: Vec<ArtistStub>,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the track is sourced from the user's local file library.
    #[serde(default)]
    pub is_local: bool,

    /// Whether the track has explicit content.
    #[serde(default)]
    pub explicit: bool,

    /// When the track was added to the containing collection, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,

    /// Popularity score (0-100), when the endpoint reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,

    /// Track number on its disc (1-indexed).
    pub track_number: u32,

    /// Disc number (1-indexed).
    #[serde(default = "default_disc")]
    pub disc_number: u32,

    /// Position within the containing playlist (0-indexed), when the track
    /// was retrieved as a playlist item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

fn default_disc() -> u32 {
    1
}

impl Track {
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

    /// Duration formatted as MM:SS.
    pub fn duration_formatted(&self) -> String {
        let total_seconds = self.duration_ms / 1000;
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}
