//! Aggregation client: one retrieval operation per resource kind.
//!
//! Each operation issues the remote call(s), passes the raw payload through
//! the matching normalizer, and returns caller-owned typed values. Raw wire
//! shapes never escape this module.

use std::sync::Arc;

use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::debug;

use super::http::{Http, API_BASE_URL};
use super::pages::{self, PAGE_SIZE};
use super::reconciler::Reconciler;
use crate::auth::TokenProvider;
use crate::error::{Result, SpotifyError};
use crate::models::{
    Album, Artist, Paginated, Playlist, PlaylistDetails, PlaylistSummary, SavedAlbum, Track,
    UserProfile,
};
use crate::normalize;

/// Page size for list endpoints that fit in a single call.
const LIST_LIMIT: u32 = 50;

/// Client for the read side of the Spotify Web API.
///
/// Holds a shared HTTP connection pool and the injected credential source.
/// All returned entities are fresh value objects; the client keeps no cache.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tunesync::{SpotifyClient, StaticToken};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SpotifyClient::new(Arc::new(StaticToken::new("token")));
///     let playlist = client.playlist("37i9dQZF1DXcBWIGoYBM5M").await?;
///     println!("{}: {} tracks", playlist.name, playlist.track_count());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SpotifyClient {
    http: Http,
}

impl SpotifyClient {
    /// Create a client against the production API.
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(tokens, API_BASE_URL)
    }

    /// Create a client against a non-default base URL.
    pub fn with_base_url<S: Into<String>>(tokens: Arc<dyn TokenProvider>, base_url: S) -> Self {
        let client = Client::builder()
            .user_agent(concat!("tunesync/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");
        Self {
            http: Http::new(client, tokens, base_url.into()),
        }
    }

    /// Reconciler sharing this client's connection pool and credentials.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::from_http(self.http.clone())
    }

    /// The authenticated user's profile.
    pub async fn profile(&self) -> Result<UserProfile> {
        let body = self.http.get_json("get_profile", "me", &[]).await?;
        normalize::user_profile(&body)
    }

    /// Artists the user follows.
    pub async fn followed_artists(&self) -> Result<Vec<Artist>> {
        let body = self
            .http
            .get_json(
                "get_followed_artists",
                "me/following",
                &[
                    ("type", "artist".to_string()),
                    ("limit", LIST_LIMIT.to_string()),
                ],
            )
            .await?;
        let items = section(&body, &["artists", "items"], "get_followed_artists")?;
        normalize::list(items, "followed artists", normalize::artist)
    }

    /// Albums saved in the user's library.
    pub async fn saved_albums(&self) -> Result<Vec<SavedAlbum>> {
        let body = self
            .http
            .get_json(
                "get_saved_albums",
                "me/albums",
                &[("limit", LIST_LIMIT.to_string())],
            )
            .await?;
        let items = section(&body, &["items"], "get_saved_albums")?;
        normalize::list(items, "saved albums", normalize::saved_album)
    }

    /// The user's top tracks.
    pub async fn top_tracks(&self) -> Result<Vec<Track>> {
        let body = self
            .http
            .get_json(
                "get_top_tracks",
                "me/top/tracks",
                &[("limit", LIST_LIMIT.to_string())],
            )
            .await?;
        let items = section(&body, &["items"], "get_top_tracks")?;
        normalize::list(items, "top tracks", normalize::track)
    }

    /// The user's top artists.
    pub async fn top_artists(&self) -> Result<Vec<Artist>> {
        let body = self
            .http
            .get_json(
                "get_top_artists",
                "me/top/artists",
                &[("limit", LIST_LIMIT.to_string())],
            )
            .await?;
        let items = section(&body, &["items"], "get_top_artists")?;
        normalize::list(items, "top artists", normalize::artist)
    }

    /// The user's playlists.
    pub async fn playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let body = self
            .http
            .get_json(
                "get_playlists",
                "me/playlists",
                &[("limit", LIST_LIMIT.to_string())],
            )
            .await?;
        let items = section(&body, &["items"], "get_playlists")?;
        normalize::list(items, "playlists", normalize::playlist_summary)
    }

    /// Editorially featured playlists.
    pub async fn featured_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let body = self
            .http
            .get_json("get_featured_playlists", "browse/featured-playlists", &[])
            .await?;
        let items = section(&body, &["playlists", "items"], "get_featured_playlists")?;
        normalize::list(items, "featured playlists", normalize::playlist_summary)
    }

    /// A single playlist with its full track list.
    ///
    /// Composite: one metadata call learns the track total, then every track
    /// page is fetched concurrently and reassembled in playlist order. A
    /// populated `tracks.items` is returned only when both stages succeed.
    ///
    /// The total and the pages are separate calls, so remote edits landing
    /// between them can shift offsets and duplicate or skip rows. This
    /// window is accepted; callers that care can check
    /// [`Paginated::is_complete`] and refetch.
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let meta = self
            .http
            .get_json(
                "get_playlist",
                &format!("playlists/{playlist_id}"),
                &[("limit", "1".to_string())],
            )
            .await?;
        let total = meta
            .get("tracks")
            .and_then(|t| t.get("total"))
            .and_then(|t| t.as_u64())
            .ok_or_else(|| {
                SpotifyError::MalformedPayload("playlist: missing `tracks.total`".to_string())
            })? as u32;
        debug!(playlist_id, total, "materializing playlist tracks");

        let items = pages::fetch_all(total, PAGE_SIZE, |offset| {
            self.playlist_tracks_page(playlist_id, offset)
        })
        .await?;

        normalize::playlist(
            &meta,
            Paginated {
                total,
                page_size: PAGE_SIZE,
                items,
            },
        )
    }

    /// One page of a playlist's track list, normalized with playlist
    /// positions derived from the page offset.
    async fn playlist_tracks_page(&self, playlist_id: &str, offset: u32) -> Result<Vec<Track>> {
        let body = self
            .http
            .get_json(
                "playlist_tracks_page",
                &format!("playlists/{playlist_id}/tracks"),
                &[
                    ("limit", PAGE_SIZE.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;
        let items = section(&body, &["items"], "playlist_tracks_page")?;
        items
            .as_array()
            .ok_or_else(|| {
                SpotifyError::MalformedPayload("playlist page: expected an array".to_string())
            })?
            .iter()
            .enumerate()
            .map(|(i, item)| normalize::playlist_item(item, offset + i as u32))
            .collect()
    }

    /// An artist's discography.
    pub async fn artist_albums(&self, artist_id: &str) -> Result<Vec<Album>> {
        let body = self
            .http
            .get_json(
                "get_artist_albums",
                &format!("artists/{artist_id}/albums"),
                &[("limit", LIST_LIMIT.to_string())],
            )
            .await?;
        let items = section(&body, &["items"], "get_artist_albums")?;
        normalize::list(items, "artist albums", normalize::album)
    }

    /// An artist's top tracks in a market.
    pub async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Result<Vec<Track>> {
        let body = self
            .http
            .get_json(
                "get_artist_top_tracks",
                &format!("artists/{artist_id}/top-tracks"),
                &[("market", market.to_string())],
            )
            .await?;
        let items = section(&body, &["tracks"], "get_artist_top_tracks")?;
        normalize::list(items, "artist top tracks", normalize::track)
    }

    /// Artists related to an artist.
    pub async fn related_artists(&self, artist_id: &str) -> Result<Vec<Artist>> {
        let body = self
            .http
            .get_json(
                "get_related_artists",
                &format!("artists/{artist_id}/related-artists"),
                &[],
            )
            .await?;
        let items = section(&body, &["artists"], "get_related_artists")?;
        normalize::list(items, "related artists", normalize::artist)
    }

    /// Create a playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        details: &PlaylistDetails,
    ) -> Result<PlaylistSummary> {
        let body = json!({
            "name": details.name,
            "description": details.description,
            "public": details.public,
            "collaborative": details.collaborative,
        });
        let response = self
            .http
            .send_json(
                "create_playlist",
                Method::POST,
                &format!("users/{user_id}/playlists"),
                &body,
            )
            .await?;
        normalize::playlist_summary(&response)
    }
}

/// Walk a nested path into a response body, failing with the operation name
/// when the expected envelope is missing.
fn section<'a>(body: &'a Value, path: &[&str], operation: &str) -> Result<&'a Value> {
    let mut current = body;
    for key in path {
        current = current.get(key).ok_or_else(|| {
            SpotifyError::MalformedPayload(format!("{operation}: missing `{key}` in response"))
        })?;
    }
    Ok(current)
}
