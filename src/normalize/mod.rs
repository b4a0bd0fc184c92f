//! Raw payload to internal-schema normalizers.
//!
//! Pure functions, one per resource kind, converting Spotify Web API JSON
//! into the typed models. No I/O happens here.
//!
//! Rules the whole module follows:
//! - missing *optional* fields are tolerated (stub artists carry no images,
//!   descriptions may be null) and normalize to empty/`None`;
//! - missing *required* fields and malformed dates fail the whole call with
//!   [`SpotifyError::MalformedPayload`], never a silently defaulted value;
//! - nested artists and albums reuse the same per-kind function in every
//!   context, so there is exactly one mapping per shape.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, SpotifyError};
use crate::models::{
    Album, Artist, ArtistStub, Image, Paginated, Playlist, PlaylistSummary, ReleaseDate,
    ResourceKind, ResourceRef, SavedAlbum, Track, TrackAlbum, UserProfile, UserRef,
};

fn malformed(context: &str, key: &str) -> SpotifyError {
    SpotifyError::MalformedPayload(format!("{context}: missing or invalid `{key}`"))
}

/// Required string field.
fn req_str(json: &Value, key: &str, context: &str) -> Result<String> {
    json.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| malformed(context, key))
}

/// Optional string field; JSON null and absence both map to `None`.
fn opt_str(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Required unsigned integer field.
fn req_u64(json: &Value, key: &str, context: &str) -> Result<u64> {
    json.get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| malformed(context, key))
}

fn opt_u64(json: &Value, key: &str) -> Option<u64> {
    json.get(key).and_then(|v| v.as_u64())
}

fn opt_u32(json: &Value, key: &str) -> Option<u32> {
    opt_u64(json, key).map(|v| v as u32)
}

fn get_bool(json: &Value, key: &str) -> bool {
    json.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Identity triple (`id`, `type`, `uri`) shared by every remote resource.
fn resource_ref(json: &Value, context: &str) -> Result<ResourceRef> {
    let kind = ResourceKind::from_remote(&req_str(json, "type", context)?)?;
    Ok(ResourceRef::new(
        req_str(json, "id", context)?,
        kind,
        req_str(json, "uri", context)?,
    ))
}

/// Identity for local tracks, which have no catalog id.
///
/// The URI (`spotify:local:…`) still identifies the item; the id normalizes
/// to empty.
fn local_track_ref(json: &Value, context: &str) -> Result<ResourceRef> {
    Ok(ResourceRef::new(
        opt_str(json, "id").unwrap_or_default(),
        ResourceKind::Track,
        req_str(json, "uri", context)?,
    ))
}

/// Image array; absence normalizes to empty, entries without a URL are
/// dropped.
fn images(json: &Value) -> Vec<Image> {
    json.get("images")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|img| {
                    let url = img.get("url").and_then(|u| u.as_str())?;
                    Some(Image::new(
                        url,
                        img.get("height").and_then(|h| h.as_u64()).map(|h| h as u32),
                        img.get("width").and_then(|w| w.as_u64()).map(|w| w as u32),
                    ))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Strict RFC 3339 timestamp; absence and null map to `None`, anything else
/// malformed is an error.
fn opt_timestamp(json: &Value, key: &str, context: &str) -> Result<Option<DateTime<Utc>>> {
    match json.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                SpotifyError::MalformedPayload(format!("{context}: invalid timestamp {s:?}"))
            }),
        Some(_) => Err(malformed(context, key)),
    }
}

fn req_timestamp(json: &Value, key: &str, context: &str) -> Result<DateTime<Utc>> {
    opt_timestamp(json, key, context)?.ok_or_else(|| malformed(context, key))
}

fn release_date(json: &Value, context: &str) -> Result<ReleaseDate> {
    ReleaseDate::parse(&req_str(json, "release_date", context)?)
}

/// Artist stub, as nested in tracks, albums and playlist items.
///
/// Images are usually absent on stubs and normalize to empty.
pub fn artist_stub(json: &Value) -> Result<ArtistStub> {
    Ok(ArtistStub {
        reference: resource_ref(json, "artist stub")?,
        name: req_str(json, "name", "artist stub")?,
        images: images(json),
    })
}

fn artist_stubs(json: &Value, key: &str) -> Result<Vec<ArtistStub>> {
    json.get(key)
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().map(artist_stub).collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// Full artist record.
pub fn artist(json: &Value) -> Result<Artist> {
    Ok(Artist {
        reference: resource_ref(json, "artist")?,
        name: req_str(json, "name", "artist")?,
        genres: json
            .get("genres")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|g| g.as_str())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default(),
        images: images(json),
        followers: json
            .get("followers")
            .and_then(|f| f.get("total"))
            .and_then(|t| t.as_u64()),
        popularity: opt_u32(json, "popularity"),
    })
}

/// Album as nested inside a track payload.
pub fn track_album(json: &Value) -> Result<TrackAlbum> {
    Ok(TrackAlbum {
        reference: resource_ref(json, "track album")?,
        name: req_str(json, "name", "track album")?,
        release_date: release_date(json, "track album")?,
        total_tracks: opt_u32(json, "total_tracks"),
        artists: artist_stubs(json, "artists")?,
        images: images(json),
    })
}

/// Full album record.
pub fn album(json: &Value) -> Result<Album> {
    Ok(Album {
        reference: resource_ref(json, "album")?,
        name: req_str(json, "name", "album")?,
        artists: artist_stubs(json, "artists")?,
        release_date: release_date(json, "album")?,
        total_tracks: req_u64(json, "total_tracks", "album")? as u32,
        images: images(json),
    })
}

/// Saved-albums library entry (`{added_at, album}`).
pub fn saved_album(json: &Value) -> Result<SavedAlbum> {
    let album_json = json
        .get("album")
        .ok_or_else(|| malformed("saved album", "album"))?;
    Ok(SavedAlbum {
        added_at: req_timestamp(json, "added_at", "saved album")?,
        album: album(album_json)?,
    })
}

/// Bare track payload (top tracks, artist top tracks).
pub fn track(json: &Value) -> Result<Track> {
    let is_local = get_bool(json, "is_local");
    let reference = if is_local {
        local_track_ref(json, "track")?
    } else {
        resource_ref(json, "track")?
    };
    let album_json = json
        .get("album")
        .ok_or_else(|| malformed("track", "album"))?;

    Ok(Track {
        reference,
        name: req_str(json, "name", "track")?,
        album: track_album(album_json)?,
        artists: artist_stubs(json, "artists")?,
        duration_ms: req_u64(json, "duration_ms", "track")?,
        is_local,
        explicit: get_bool(json, "explicit"),
        added_at: None,
        popularity: opt_u32(json, "popularity"),
        track_number: opt_u32(json, "track_number").unwrap_or(0),
        disc_number: opt_u32(json, "disc_number").unwrap_or(1),
        position: None,
    })
}

/// Playlist item (`{added_at, is_local, track}`), with its 0-based playlist
/// position.
pub fn playlist_item(json: &Value, position: u32) -> Result<Track> {
    let track_json = json
        .get("track")
        .filter(|t| !t.is_null())
        .ok_or_else(|| malformed("playlist item", "track"))?;

    // is_local lives on the wrapping item; newer payloads mirror it on the
    // track as well.
    let is_local = get_bool(json, "is_local") || get_bool(track_json, "is_local");

    let reference = if is_local {
        local_track_ref(track_json, "playlist item")?
    } else {
        resource_ref(track_json, "playlist item")?
    };
    let album_json = track_json
        .get("album")
        .ok_or_else(|| malformed("playlist item", "album"))?;

    Ok(Track {
        reference,
        name: req_str(track_json, "name", "playlist item")?,
        album: track_album(album_json)?,
        artists: artist_stubs(track_json, "artists")?,
        duration_ms: req_u64(track_json, "duration_ms", "playlist item")?,
        is_local,
        explicit: get_bool(track_json, "explicit"),
        added_at: opt_timestamp(json, "added_at", "playlist item")?,
        popularity: opt_u32(track_json, "popularity"),
        track_number: opt_u32(track_json, "track_number").unwrap_or(0),
        disc_number: opt_u32(track_json, "disc_number").unwrap_or(1),
        position: Some(position),
    })
}

/// Playlist owner stub.
pub fn user_ref(json: &Value) -> Result<UserRef> {
    Ok(UserRef {
        reference: resource_ref(json, "user")?,
        name: opt_str(json, "display_name"),
    })
}

/// The authenticated user's profile.
pub fn user_profile(json: &Value) -> Result<UserProfile> {
    Ok(UserProfile {
        reference: resource_ref(json, "profile")?,
        display_name: opt_str(json, "display_name"),
        email: opt_str(json, "email"),
        country: opt_str(json, "country"),
        followers: json
            .get("followers")
            .and_then(|f| f.get("total"))
            .and_then(|t| t.as_u64())
            .unwrap_or(0),
        images: images(json),
    })
}

/// Playlist row from a list endpoint.
pub fn playlist_summary(json: &Value) -> Result<PlaylistSummary> {
    let owner_json = json
        .get("owner")
        .ok_or_else(|| malformed("playlist summary", "owner"))?;
    Ok(PlaylistSummary {
        reference: resource_ref(json, "playlist summary")?,
        name: req_str(json, "name", "playlist summary")?,
        description: opt_str(json, "description"),
        owner: user_ref(owner_json)?,
        public: json.get("public").and_then(|v| v.as_bool()),
        collaborative: get_bool(json, "collaborative"),
        track_count: json
            .get("tracks")
            .and_then(|t| t.get("total"))
            .and_then(|t| t.as_u64())
            .map(|t| t as u32),
        snapshot_id: opt_str(json, "snapshot_id"),
        images: images(json),
    })
}

/// Assemble a full playlist from its metadata payload and an already
/// materialized track collection.
///
/// The aggregation client calls this only after both the metadata call and
/// every track page have succeeded.
pub fn playlist(meta: &Value, tracks: Paginated<Track>) -> Result<Playlist> {
    let owner_json = meta
        .get("owner")
        .ok_or_else(|| malformed("playlist", "owner"))?;
    Ok(Playlist {
        reference: resource_ref(meta, "playlist")?,
        name: req_str(meta, "name", "playlist")?,
        description: opt_str(meta, "description"),
        owner: user_ref(owner_json)?,
        tracks,
        snapshot_id: req_str(meta, "snapshot_id", "playlist")?,
        public: get_bool(meta, "public"),
        collaborative: get_bool(meta, "collaborative"),
        images: images(meta),
    })
}

/// Map every element of a wire array, failing the whole list on the first
/// malformed element.
pub fn list<T>(json: &Value, context: &str, f: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    json.as_array()
        .ok_or_else(|| SpotifyError::MalformedPayload(format!("{context}: expected an array")))?
        .iter()
        .map(f)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artist_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "type": "artist",
            "uri": format!("spotify:artist:{id}"),
        })
    }

    fn track_json() -> Value {
        json!({
            "id": "t1",
            "name": "Song",
            "type": "track",
            "uri": "spotify:track:t1",
            "duration_ms": 215000,
            "explicit": true,
            "popularity": 61,
            "track_number": 4,
            "disc_number": 1,
            "is_local": false,
            "artists": [artist_json("a1", "First"), artist_json("a2", "Second")],
            "album": {
                "id": "al1",
                "name": "Album",
                "type": "album",
                "uri": "spotify:album:al1",
                "release_date": "2019-07-12",
                "total_tracks": 10,
                "artists": [artist_json("a1", "First")],
                "images": [{"url": "https://img/640", "height": 640, "width": 640}],
            },
        })
    }

    #[test]
    fn test_artist_stub_without_images() {
        let stub = artist_stub(&artist_json("a1", "First")).unwrap();
        assert_eq!(stub.reference.id, "a1");
        assert_eq!(stub.name, "First");
        assert!(stub.images.is_empty());
    }

    #[test]
    fn test_full_artist_with_followers() {
        let payload = json!({
            "id": "a9",
            "name": "Big",
            "type": "artist",
            "uri": "spotify:artist:a9",
            "genres": ["electro", "house"],
            "followers": {"href": null, "total": 123456},
            "popularity": 80,
            "images": [{"url": "https://img/160", "height": 160, "width": 160}],
        });
        let full = artist(&payload).unwrap();
        assert_eq!(full.followers, Some(123456));
        assert_eq!(full.popularity, Some(80));
        assert_eq!(full.genres, vec!["electro", "house"]);
        assert_eq!(full.images.len(), 1);
    }

    #[test]
    fn test_track_maps_every_contract_field() {
        let track = track(&track_json()).unwrap();
        assert_eq!(track.reference.id, "t1");
        assert_eq!(track.reference.kind, ResourceKind::Track);
        assert_eq!(track.name, "Song");
        assert_eq!(track.duration_ms, 215000);
        assert!(track.explicit);
        assert!(!track.is_local);
        assert_eq!(track.added_at, None);
        assert_eq!(track.popularity, Some(61));
        assert_eq!(track.track_number, 4);
        assert_eq!(track.artists.len(), 2);
        assert_eq!(track.album.name, "Album");
        assert_eq!(track.album.release_date.year, 2019);
        assert_eq!(track.album.artists[0].name, "First");
        assert_eq!(track.album.images[0].height, Some(640));
    }

    #[test]
    fn test_track_missing_id_fails() {
        let mut payload = track_json();
        payload.as_object_mut().unwrap().remove("id");
        assert!(matches!(
            track(&payload),
            Err(SpotifyError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_malformed_release_date_fails_whole_track() {
        let mut payload = track_json();
        payload["album"]["release_date"] = json!("someday");
        assert!(matches!(
            track(&payload),
            Err(SpotifyError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_playlist_item_with_added_at_and_position() {
        let item = json!({
            "added_at": "2021-06-01T12:30:00Z",
            "is_local": false,
            "track": track_json(),
        });
        let track = playlist_item(&item, 42).unwrap();
        assert_eq!(track.position, Some(42));
        let added = track.added_at.unwrap();
        assert_eq!(added.to_rfc3339(), "2021-06-01T12:30:00+00:00");
    }

    #[test]
    fn test_playlist_item_null_added_at_is_none() {
        let item = json!({
            "added_at": null,
            "is_local": false,
            "track": track_json(),
        });
        assert_eq!(playlist_item(&item, 0).unwrap().added_at, None);
    }

    #[test]
    fn test_playlist_item_malformed_added_at_fails() {
        let item = json!({
            "added_at": "last tuesday",
            "is_local": false,
            "track": track_json(),
        });
        assert!(matches!(
            playlist_item(&item, 0),
            Err(SpotifyError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_local_track_without_id() {
        let item = json!({
            "added_at": "2020-01-01T00:00:00Z",
            "is_local": true,
            "track": {
                "id": null,
                "name": "Home Recording",
                "uri": "spotify:local:::Home+Recording:180",
                "duration_ms": 180000,
                "explicit": false,
                "artists": [],
                "album": {
                    "id": "",
                    "name": "",
                    "type": "album",
                    "uri": "spotify:album:",
                    "release_date": "0000",
                },
            },
        });
        let track = playlist_item(&item, 3).unwrap();
        assert!(track.is_local);
        assert_eq!(track.reference.id, "");
        assert_eq!(track.reference.uri, "spotify:local:::Home+Recording:180");
    }

    #[test]
    fn test_saved_album() {
        let item = json!({
            "added_at": "2022-02-02T02:02:02Z",
            "album": {
                "id": "al7",
                "name": "Library Album",
                "type": "album",
                "uri": "spotify:album:al7",
                "release_date": "2022-01",
                "total_tracks": 8,
                "artists": [artist_json("a1", "First")],
            },
        });
        let saved = saved_album(&item).unwrap();
        assert_eq!(saved.album.name, "Library Album");
        assert_eq!(saved.album.total_tracks, 8);
        assert_eq!(saved.album.release_date.month, Some(1));
    }

    #[test]
    fn test_playlist_summary_tolerates_null_public() {
        let row = json!({
            "id": "p1",
            "name": "Weekly",
            "type": "playlist",
            "uri": "spotify:playlist:p1",
            "description": "",
            "public": null,
            "collaborative": false,
            "snapshot_id": "snap0",
            "tracks": {"href": "…", "total": 30},
            "owner": {
                "id": "u1",
                "type": "user",
                "uri": "spotify:user:u1",
                "display_name": "Owner",
            },
        });
        let summary = playlist_summary(&row).unwrap();
        assert_eq!(summary.public, None);
        assert_eq!(summary.description, None);
        assert_eq!(summary.track_count, Some(30));
        assert_eq!(summary.snapshot_id.as_deref(), Some("snap0"));
        assert_eq!(summary.owner.name.as_deref(), Some("Owner"));
    }

    #[test]
    fn test_playlist_assembly() {
        let meta = json!({
            "id": "p1",
            "name": "Mix",
            "type": "playlist",
            "uri": "spotify:playlist:p1",
            "description": "desc",
            "public": true,
            "collaborative": false,
            "snapshot_id": "snap1",
            "owner": {
                "id": "u1",
                "type": "user",
                "uri": "spotify:user:u1",
                "display_name": null,
            },
        });
        let tracks = Paginated {
            total: 1,
            page_size: 100,
            items: vec![playlist_item(
                &json!({"added_at": null, "is_local": false, "track": track_json()}),
                0,
            )
            .unwrap()],
        };
        let playlist = playlist(&meta, tracks).unwrap();
        assert_eq!(playlist.snapshot_id, "snap1");
        assert_eq!(playlist.owner.name, None);
        assert!(playlist.tracks.is_complete());
    }

    #[test]
    fn test_playlist_missing_snapshot_fails() {
        let meta = json!({
            "id": "p1",
            "name": "Mix",
            "type": "playlist",
            "uri": "spotify:playlist:p1",
            "owner": {"id": "u1", "type": "user", "uri": "spotify:user:u1"},
        });
        let empty = Paginated {
            total: 0,
            page_size: 100,
            items: Vec::new(),
        };
        assert!(matches!(
            playlist(&meta, empty),
            Err(SpotifyError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_list_fails_on_first_malformed_element() {
        let payload = json!([artist_json("a1", "Ok"), {"name": "no identity"}]);
        assert!(list(&payload, "artists", artist_stub).is_err());
    }
}
