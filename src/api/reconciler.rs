//! Write-back of local playlist edits under optimistic concurrency.
//!
//! A track-list mutation moves through prepared (caller supplies the current
//! snapshot token and the desired list), sent, and then accepted or
//! rejected. On acceptance the remote returns a fresh snapshot token and the
//! caller replaces both its stored token and its in-memory track list from
//! the returned [`TrackListUpdate`]. On rejection with a stale token the
//! error is [`SpotifyError::Conflict`]; the reconciler never retries on its
//! own, since blindly resending risks double-applying the edit.
//!
//! Metadata patches carry no snapshot and are last-writer-wins. Cover image
//! upload replaces the playlist's sole image and is safely repeatable.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, Method};
use serde_json::json;
use tracing::{debug, info};

use super::http::{Http, API_BASE_URL};
use crate::auth::TokenProvider;
use crate::error::{Result, SpotifyError};
use crate::models::{PlaylistDetails, Track};

/// Spotify rejects cover uploads whose base64 payload exceeds 256 KB.
const MAX_IMAGE_BASE64_BYTES: usize = 256 * 1024;

/// Result of an accepted track-list mutation.
///
/// Replaces the caller's stored snapshot token and in-memory track list in
/// one step, so a caller-held [`crate::models::Playlist`] is never left
/// half-updated.
#[derive(Debug, Clone)]
pub struct TrackListUpdate {
    /// Fresh snapshot token issued by the remote service.
    pub snapshot_id: String,

    /// The track list as the remote now holds it: the requested tracks minus
    /// local ones, re-positioned from zero.
    pub tracks: Vec<Track>,
}

/// Client for the write side of the Spotify Web API.
#[derive(Clone)]
pub struct Reconciler {
    http: Http,
}

impl Reconciler {
    /// Create a reconciler against the production API.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(tokens, API_BASE_URL)
    }

    /// Create a reconciler against a non-default base URL.
    pub fn with_base_url<S: Into<String>>(tokens: Arc<dyn TokenProvider>, base_url: S) -> Self {
        let client = Client::builder()
            .user_agent(concat!("tunesync/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");
        Self {
            http: Http::new(client, tokens, base_url.into()),
        }
    }

    pub(crate) fn from_http(http: Http) -> Self {
        Self { http }
    }

    /// Replace a playlist's track list (covers removal and reordering).
    ///
    /// `snapshot_id` must be the token from the caller's last observation of
    /// the playlist. Local tracks in `tracks` are filtered out before
    /// transmission; the remote API cannot address them.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Validation`] when the snapshot token is empty, and
    /// [`SpotifyError::Conflict`] when the remote rejects the token as stale.
    pub async fn replace_tracks(
        &self,
        playlist_id: &str,
        snapshot_id: &str,
        tracks: &[Track],
    ) -> Result<TrackListUpdate> {
        if snapshot_id.is_empty() {
            return Err(SpotifyError::Validation(
                "track-list mutation requires a snapshot token".to_string(),
            ));
        }

        let remote = remote_tracks(tracks);
        let uris: Vec<&str> = remote.iter().map(|t| t.reference.uri.as_str()).collect();
        debug!(
            playlist_id,
            requested = tracks.len(),
            transmitted = uris.len(),
            "replacing playlist tracks"
        );

        let body = json!({
            "uris": uris,
            "snapshot_id": snapshot_id,
        });
        let response = self
            .http
            .send_json(
                "replace_playlist_tracks",
                Method::PUT,
                &format!("playlists/{playlist_id}/tracks"),
                &body,
            )
            .await?;

        let new_snapshot = response
            .get("snapshot_id")
            .and_then(|s| s.as_str())
            .ok_or_else(|| {
                SpotifyError::MalformedPayload(
                    "replace_playlist_tracks: response carries no snapshot_id".to_string(),
                )
            })?
            .to_string();
        info!(playlist_id, "track list accepted, snapshot advanced");

        Ok(TrackListUpdate {
            snapshot_id: new_snapshot,
            tracks: remote,
        })
    }

    /// Patch a playlist's metadata (name, description, visibility).
    ///
    /// No snapshot token is involved; the remote treats metadata as a
    /// last-writer-wins resource.
    pub async fn update_details(
        &self,
        playlist_id: &str,
        details: &PlaylistDetails,
    ) -> Result<()> {
        let body = json!({
            "name": details.name,
            "description": details.description,
            "public": details.public,
            "collaborative": details.collaborative,
        });
        self.http
            .send_json(
                "update_playlist_details",
                Method::PUT,
                &format!("playlists/{playlist_id}"),
                &body,
            )
            .await?;
        info!(playlist_id, "playlist details updated");
        Ok(())
    }

    /// Upload a JPEG as the playlist's cover image.
    ///
    /// Replaces the playlist's sole image; repeating the call with the same
    /// bytes is safe and changes nothing else on the playlist.
    pub async fn upload_cover_image(&self, playlist_id: &str, jpeg: &[u8]) -> Result<()> {
        let encoded = encode_cover_image(jpeg)?;
        self.http
            .put_raw(
                "upload_cover_image",
                &format!("playlists/{playlist_id}/images"),
                "image/jpeg",
                &encoded,
            )
            .await?;
        info!(playlist_id, bytes = jpeg.len(), "cover image uploaded");
        Ok(())
    }
}

/// Tracks eligible for transmission: local tracks are dropped, the rest are
/// re-positioned from zero to mirror the post-mutation remote order.
fn remote_tracks(tracks: &[Track]) -> Vec<Track> {
    tracks
        .iter()
        .filter(|t| !t.is_local)
        .cloned()
        .enumerate()
        .map(|(i, mut t)| {
            t.position = Some(i as u32);
            t
        })
        .collect()
}

/// Base64-encode a cover image, enforcing the remote size limit before any
/// request is sent.
fn encode_cover_image(jpeg: &[u8]) -> Result<String> {
    let encoded = BASE64.encode(jpeg);
    if encoded.len() > MAX_IMAGE_BASE64_BYTES {
        return Err(SpotifyError::Validation(format!(
            "cover image too large: {} bytes base64, limit {}",
            encoded.len(),
            MAX_IMAGE_BASE64_BYTES
        )));
    }
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReleaseDate, ResourceKind, ResourceRef, TrackAlbum};

    fn track(id: &str, uri: &str, is_local: bool) -> Track {
        Track {
            reference: ResourceRef::new(id, ResourceKind::Track, uri),
            name: format!("track {id}"),
            album: TrackAlbum {
                reference: ResourceRef::new("al", ResourceKind::Album, "spotify:album:al"),
                name: "Album".to_string(),
                release_date: ReleaseDate::parse("2020").unwrap(),
                total_tracks: None,
                artists: Vec::new(),
                images: Vec::new(),
            },
            artists: Vec::new(),
            duration_ms: 1000,
            is_local,
            explicit: false,
            added_at: None,
            popularity: None,
            track_number: 1,
            disc_number: 1,
            position: Some(99),
        }
    }

    #[test]
    fn test_local_tracks_never_reach_the_outbound_list() {
        let tracks = vec![
            track("a", "spotify:track:a", false),
            track("", "spotify:local:::Home:100", true),
            track("b", "spotify:track:b", false),
        ];
        let remote = remote_tracks(&tracks);
        assert_eq!(remote.len(), 2);
        assert!(remote.iter().all(|t| !t.is_local));
        assert!(remote.iter().all(|t| !t.reference.uri.contains("local")));
    }

    #[test]
    fn test_remote_tracks_repositioned_from_zero() {
        let tracks = vec![
            track("", "spotify:local:::Home:100", true),
            track("a", "spotify:track:a", false),
            track("b", "spotify:track:b", false),
        ];
        let remote = remote_tracks(&tracks);
        assert_eq!(remote[0].position, Some(0));
        assert_eq!(remote[0].reference.id, "a");
        assert_eq!(remote[1].position, Some(1));
    }

    #[test]
    fn test_cover_image_encoding_is_deterministic() {
        let bytes = b"\xff\xd8\xff\xe0 jpeg-ish";
        assert_eq!(
            encode_cover_image(bytes).unwrap(),
            encode_cover_image(bytes).unwrap()
        );
    }

    #[test]
    fn test_oversized_cover_image_rejected_before_transmission() {
        let bytes = vec![0u8; 200 * 1024];
        assert!(matches!(
            encode_cover_image(&bytes),
            Err(SpotifyError::Validation(_))
        ));
    }

    #[test]
    fn test_small_cover_image_accepted() {
        let bytes = vec![0u8; 10 * 1024];
        assert!(encode_cover_image(&bytes).is_ok());
    }
}
