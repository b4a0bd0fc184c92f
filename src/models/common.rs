//! Common types shared across all models.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpotifyError};

/// Kind of a Spotify resource.
///
/// Exhaustive: a payload carrying any other `type` string fails
/// normalization instead of being silently mis-mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A single track.
    Track,
    /// An album.
    Album,
    /// An artist.
    Artist,
    /// A playlist.
    Playlist,
    /// A user account.
    User,
}

impl ResourceKind {
    /// Parse the `type` field of a remote payload.
    pub fn from_remote(value: &str) -> Result<Self> {
        match value {
            "track" => Ok(Self::Track),
            "album" => Ok(Self::Album),
            "artist" => Ok(Self::Artist),
            "playlist" => Ok(Self::Playlist),
            "user" => Ok(Self::User),
            other => Err(SpotifyError::MalformedPayload(format!(
                "unknown resource kind: {other}"
            ))),
        }
    }

    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
            Self::User => "user",
        }
    }
}

/// Opaque identity of a remote resource.
///
/// Immutable once created; shared by every normalized entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Spotify ID. Empty only for local tracks, which have no catalog entry.
    pub id: String,

    /// Resource kind.
    pub kind: ResourceKind,

    /// Spotify URI (`spotify:track:…`, `spotify:local:…`).
    pub uri: String,
}

impl ResourceRef {
    /// Create a new reference.
    pub fn new<S1: Into<String>, S2: Into<String>>(id: S1, kind: ResourceKind, uri: S2) -> Self {
        Self {
            id: id.into(),
            kind,
            uri: uri.into(),
        }
    }
}

/// Image with URL and optional dimensions.
///
/// Spotify omits dimensions on some CDN images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// URL to the image.
    pub url: String,

    /// Height in pixels, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Width in pixels, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl Image {
    /// Create a new image.
    pub fn new<S: Into<String>>(url: S, height: Option<u32>, width: Option<u32>) -> Self {
        Self {
            url: url.into(),
            height,
            width,
        }
    }
}

/// Release date with Spotify's variable precision.
///
/// Year is always present; month and day depend on the payload's
/// `release_date_precision`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDate {
    /// Year of release.
    pub year: i32,

    /// Month of release (1-12), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,

    /// Day of release (1-31), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl ReleaseDate {
    /// Parse a date string in "YYYY", "YYYY-MM" or "YYYY-MM-DD" form.
    ///
    /// Strict: a malformed string is an error, never coerced to a default
    /// date.
    pub fn parse(date_str: &str) -> Result<Self> {
        let malformed =
            || SpotifyError::MalformedPayload(format!("invalid release date: {date_str:?}"));

        let mut parts = date_str.split('-');

        let year = parts
            .next()
            .filter(|y| y.len() == 4)
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(malformed)?;

        let month = match parts.next() {
            Some(m) => Some(
                m.parse::<u32>()
                    .ok()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(malformed)?,
            ),
            None => None,
        };

        let day = match parts.next() {
            Some(d) => Some(
                d.parse::<u32>()
                    .ok()
                    .filter(|d| (1..=31).contains(d))
                    .ok_or_else(malformed)?,
            ),
            None => None,
        };

        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self { year, month, day })
    }

    /// Format back to the most precise form available.
    pub fn display(&self) -> String {
        match (self.month, self.day) {
            (Some(m), Some(d)) => format!("{:04}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => format!("{:04}-{:02}", self.year, m),
            _ => format!("{:04}", self.year),
        }
    }
}

/// A fully materialized slice-addressed remote collection.
///
/// Item order matches remote order exactly; for playlist tracks that order
/// is the playlist position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total item count reported by the remote resource.
    pub total: u32,

    /// Page size the collection was fetched with.
    pub page_size: u32,

    /// Items in remote order.
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    /// Whether the materialized items match the reported total.
    ///
    /// Can be false when the remote collection was edited between the count
    /// call and the page fetches; see the accepted inconsistency window on
    /// playlist retrieval.
    pub fn is_complete(&self) -> bool {
        self.items.len() as u32 == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_date_full() {
        let date = ReleaseDate::parse("2023-05-15").unwrap();
        assert_eq!(date.year, 2023);
        assert_eq!(date.month, Some(5));
        assert_eq!(date.day, Some(15));
    }

    #[test]
    fn test_parse_release_date_year_only() {
        let date = ReleaseDate::parse("2020").unwrap();
        assert_eq!(date.year, 2020);
        assert_eq!(date.month, None);
        assert_eq!(date.day, None);
    }

    #[test]
    fn test_parse_release_date_year_month() {
        let date = ReleaseDate::parse("1999-11").unwrap();
        assert_eq!(date.year, 1999);
        assert_eq!(date.month, Some(11));
        assert_eq!(date.day, None);
    }

    #[test]
    fn test_parse_release_date_rejects_garbage() {
        assert!(ReleaseDate::parse("").is_err());
        assert!(ReleaseDate::parse("not-a-date").is_err());
        assert!(ReleaseDate::parse("2023-13").is_err());
        assert!(ReleaseDate::parse("2023-05-15-07").is_err());
        assert!(ReleaseDate::parse("23-05-15").is_err());
    }

    #[test]
    fn test_release_date_display_roundtrip() {
        assert_eq!(ReleaseDate::parse("2023-05-15").unwrap().display(), "2023-05-15");
        assert_eq!(ReleaseDate::parse("2023-05").unwrap().display(), "2023-05");
        assert_eq!(ReleaseDate::parse("2023").unwrap().display(), "2023");
    }

    #[test]
    fn test_resource_kind_roundtrip() {
        for kind in ["track", "album", "artist", "playlist", "user"] {
            assert_eq!(ResourceKind::from_remote(kind).unwrap().as_str(), kind);
        }
        assert!(ResourceKind::from_remote("episode").is_err());
    }

    #[test]
    fn test_paginated_completeness() {
        let collection = Paginated {
            total: 2,
            page_size: 100,
            items: vec!["a", "b"],
        };
        assert!(collection.is_complete());

        let stale = Paginated {
            total: 3,
            page_size: 100,
            items: vec!["a", "b"],
        };
        assert!(!stale.is_complete());
    }
}
