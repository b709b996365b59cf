//! JSON to model converters.
//!
//! This module provides functions to convert raw Spotify Web API JSON
//! responses into typed model structures. Converters are tolerant of
//! missing optional fields but refuse resources without an `id`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, SpotifyError};
use crate::models::{
    album::{Album, AlbumLink, AlbumTrack},
    artist::{Artist, ArtistLink},
    common::{Image, ReleaseDate},
    playlist::{Playlist, PlaylistItem, PlaylistOwner},
    search::SearchResults,
    track::Track,
    user::User,
};

/// Get string from JSON, returning empty string if not found.
fn get_str(json: &Value, key: &str) -> String {
    json.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Get optional string from JSON; null, missing and empty all map to None.
fn opt_str(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Get string ID from JSON (handles both string and numeric IDs).
fn get_id(json: &Value, key: &str) -> Option<String> {
    match json.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Get u32 from JSON.
fn get_u32(json: &Value, key: &str) -> u32 {
    json.get(key).and_then(|v| v.as_u64()).unwrap_or(0) as u32
}

/// Get u64 from JSON.
fn get_u64(json: &Value, key: &str) -> u64 {
    json.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
}

/// Get bool from JSON.
fn get_bool(json: &Value, key: &str) -> bool {
    json.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Missing-id error for the given resource kind.
fn missing_id(what: &str) -> SpotifyError {
    SpotifyError::MalformedResponse(format!("missing {what} ID"))
}

/// Extract the `images` array: `[{url, height, width}, ...]`.
///
/// Dimensions are null for some images (playlist mosaics), so they stay
/// optional.
pub fn extract_images(json: &Value) -> Vec<Image> {
    json.get("images")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|img| {
                    let url = img.get("url").and_then(|v| v.as_str())?;
                    Some(Image {
                        url: url.to_string(),
                        height: img.get("height").and_then(|v| v.as_u64()).map(|h| h as u32),
                        width: img.get("width").and_then(|v| v.as_u64()).map(|w| w as u32),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract `followers.total`.
fn followers_total(json: &Value) -> u64 {
    json.get("followers")
        .and_then(|f| f.get("total"))
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
}

/// Extract the `genres` string array.
fn extract_genres(json: &Value) -> Vec<String> {
    json.get("genres")
        .and_then(|g| g.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|g| g.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Extract the `next` URL from a paging object; null maps to None.
pub fn next_url(json: &Value) -> Option<String> {
    json.get("next")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Parse an ISO-8601 timestamp such as `2015-01-15T12:39:22Z`.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a compact artist reference.
fn parse_artist_link(json: &Value) -> ArtistLink {
    ArtistLink {
        id: get_id(json, "id").unwrap_or_default(),
        name: get_str(json, "name"),
    }
}

/// Parse the `artists` array of a track or album.
fn parse_artist_links(json: &Value) -> Vec<ArtistLink> {
    json.get("artists")
        .and_then(|a| a.as_array())
        .map(|arr| arr.iter().map(parse_artist_link).collect())
        .unwrap_or_default()
}

/// Parse the compact album nested in a track.
fn parse_album_link(json: &Value) -> AlbumLink {
    AlbumLink {
        id: get_id(json, "id").unwrap_or_default(),
        name: get_str(json, "name"),
        album_type: get_str(json, "album_type"),
        release_date: ReleaseDate::parse(&get_str(json, "release_date")),
        images: extract_images(json),
    }
}

/// Parse a track from raw JSON.
pub fn parse_track(json: &Value) -> Result<Track> {
    let id = get_id(json, "id").ok_or_else(|| missing_id("track"))?;

    let album = json.get("album").map(parse_album_link).unwrap_or_default();

    Ok(Track {
        id,
        name: get_str(json, "name"),
        artists: parse_artist_links(json),
        album,
        duration_ms: get_u64(json, "duration_ms"),
        explicit: get_bool(json, "explicit"),
        disc_number: json
            .get("disc_number")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as u32,
        track_number: json
            .get("track_number")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as u32,
        popularity: get_u32(json, "popularity"),
        preview_url: opt_str(json, "preview_url"),
    })
}

/// Parse a simplified track nested in an album's track listing.
///
/// Returns None when the entry has no usable ID.
fn parse_album_track(json: &Value) -> Option<AlbumTrack> {
    let id = get_id(json, "id")?;

    Some(AlbumTrack {
        id,
        name: get_str(json, "name"),
        disc_number: json
            .get("disc_number")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as u32,
        track_number: json
            .get("track_number")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as u32,
        duration_ms: get_u64(json, "duration_ms"),
        explicit: get_bool(json, "explicit"),
        artists: parse_artist_links(json),
    })
}

/// Parse one page of an album's `tracks` paging object.
///
/// Returns the page's tracks and the `next` URL if more pages follow.
pub fn parse_album_tracks_page(json: &Value) -> (Vec<AlbumTrack>, Option<String>) {
    let tracks = json
        .get("items")
        .and_then(|i| i.as_array())
        .map(|arr| arr.iter().filter_map(parse_album_track).collect())
        .unwrap_or_default();

    (tracks, next_url(json))
}

/// Parse an album from raw JSON.
///
/// Works for both full albums and the simplified albums in search
/// results; simplified ones carry no label, popularity or track listing.
pub fn parse_album(json: &Value) -> Result<Album> {
    let id = get_id(json, "id").ok_or_else(|| missing_id("album"))?;

    let (tracks, _) = json
        .get("tracks")
        .map(parse_album_tracks_page)
        .unwrap_or_default();

    Ok(Album {
        id,
        name: get_str(json, "name"),
        album_type: get_str(json, "album_type"),
        release_date: ReleaseDate::parse(&get_str(json, "release_date")),
        total_tracks: get_u32(json, "total_tracks"),
        label: opt_str(json, "label"),
        popularity: json
            .get("popularity")
            .and_then(|v| v.as_u64())
            .map(|p| p as u32),
        genres: extract_genres(json),
        images: extract_images(json),
        artists: parse_artist_links(json),
        tracks,
    })
}

/// Parse an artist profile from raw JSON.
///
/// Top tracks come from a separate endpoint; see [`parse_top_tracks`].
pub fn parse_artist(json: &Value) -> Result<Artist> {
    let id = get_id(json, "id").ok_or_else(|| missing_id("artist"))?;

    Ok(Artist {
        id,
        name: get_str(json, "name"),
        genres: extract_genres(json),
        images: extract_images(json),
        followers: followers_total(json),
        popularity: get_u32(json, "popularity"),
        top_tracks: Vec::new(),
    })
}

/// Parse the top-tracks envelope: `{"tracks": [...]}`.
pub fn parse_top_tracks(json: &Value) -> Result<Vec<Track>> {
    let items = json
        .get("tracks")
        .and_then(|t| t.as_array())
        .ok_or_else(|| SpotifyError::MalformedResponse("missing tracks array".to_string()))?;

    Ok(items
        .iter()
        .filter(|t| t.is_object())
        .filter_map(|t| parse_track(t).ok())
        .collect())
}

/// Parse one playlist entry: `{"added_at": ..., "track": {...}}`.
///
/// Returns None for removed tracks (null), local files and entries with
/// no usable ID, which the playlist simply skips.
fn parse_playlist_item(json: &Value) -> Option<PlaylistItem> {
    let track_json = json.get("track")?;
    if !track_json.is_object() || get_bool(track_json, "is_local") {
        return None;
    }

    let track = parse_track(track_json).ok()?;

    Some(PlaylistItem {
        added_at: json
            .get("added_at")
            .and_then(|v| v.as_str())
            .and_then(parse_timestamp),
        track,
    })
}

/// Parse one page of a playlist's `tracks` paging object.
///
/// Returns the page's entries and the `next` URL if more pages follow.
pub fn parse_playlist_items_page(json: &Value) -> (Vec<PlaylistItem>, Option<String>) {
    let items = json
        .get("items")
        .and_then(|i| i.as_array())
        .map(|arr| arr.iter().filter_map(parse_playlist_item).collect())
        .unwrap_or_default();

    (items, next_url(json))
}

/// Parse the owner object of a playlist.
fn parse_owner(json: &Value) -> PlaylistOwner {
    let id = get_id(json, "id").unwrap_or_default();
    let display_name = match opt_str(json, "display_name") {
        Some(name) => name,
        None => id.clone(),
    };

    PlaylistOwner { id, display_name }
}

/// Parse a playlist from raw JSON.
///
/// Works for both full playlists and the simplified playlists in search
/// results; simplified ones carry the track total but no entries.
pub fn parse_playlist(json: &Value) -> Result<Playlist> {
    let id = get_id(json, "id").ok_or_else(|| missing_id("playlist"))?;

    let tracks_obj = json.get("tracks").unwrap_or(&Value::Null);
    let (tracks, _) = parse_playlist_items_page(tracks_obj);

    Ok(Playlist {
        id,
        name: get_str(json, "name"),
        description: opt_str(json, "description"),
        owner: json.get("owner").map(parse_owner).unwrap_or_default(),
        public: json.get("public").and_then(|v| v.as_bool()),
        collaborative: get_bool(json, "collaborative"),
        snapshot_id: get_str(json, "snapshot_id"),
        total_tracks: get_u32(tracks_obj, "total"),
        images: extract_images(json),
        tracks,
    })
}

/// Parse a user profile from raw JSON.
///
/// Users without a display name fall back to their ID, which the API
/// reports as null display_name.
pub fn parse_user(json: &Value) -> Result<User> {
    let id = get_id(json, "id").ok_or_else(|| missing_id("user"))?;

    let display_name = match opt_str(json, "display_name") {
        Some(name) => name,
        None => id.clone(),
    };

    Ok(User {
        id,
        display_name,
        images: extract_images(json),
        followers: followers_total(json),
        country: opt_str(json, "country"),
        email: opt_str(json, "email"),
        product: opt_str(json, "product"),
    })
}

/// Parse a combined search response.
///
/// Only the categories present in the response are filled. Null or
/// malformed items (the API returns null playlist slots) are skipped.
pub fn parse_search(json: &Value) -> Result<SearchResults> {
    let mut results = SearchResults::default();

    if let Some(items) = json
        .get("tracks")
        .and_then(|c| c.get("items"))
        .and_then(|i| i.as_array())
    {
        results.tracks = items
            .iter()
            .filter(|i| i.is_object())
            .filter_map(|i| parse_track(i).ok())
            .collect();
    }

    if let Some(items) = json
        .get("albums")
        .and_then(|c| c.get("items"))
        .and_then(|i| i.as_array())
    {
        results.albums = items
            .iter()
            .filter(|i| i.is_object())
            .filter_map(|i| parse_album(i).ok())
            .collect();
    }

    if let Some(items) = json
        .get("artists")
        .and_then(|c| c.get("items"))
        .and_then(|i| i.as_array())
    {
        results.artists = items
            .iter()
            .filter(|i| i.is_object())
            .filter_map(|i| parse_artist(i).ok())
            .collect();
    }

    if let Some(items) = json
        .get("playlists")
        .and_then(|c| c.get("items"))
        .and_then(|i| i.as_array())
    {
        results.playlists = items
            .iter()
            .filter(|i| i.is_object())
            .filter_map(|i| parse_playlist(i).ok())
            .collect();
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_images() {
        let json = json!({
            "images": [
                {"url": "http://example.com/640.jpg", "height": 640, "width": 640},
                {"url": "http://example.com/mosaic.jpg", "height": null, "width": null}
            ]
        });

        let images = extract_images(&json);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].height, Some(640));
        assert_eq!(images[1].height, None);
    }

    #[test]
    fn test_parse_track() {
        let json = json!({
            "id": "4uLU6hMCjMI75M1A2tKUQC",
            "name": "Never Gonna Give You Up",
            "duration_ms": 213573,
            "explicit": false,
            "track_number": 1,
            "disc_number": 1,
            "popularity": 80,
            "preview_url": "https://p.scdn.co/mp3-preview/abc",
            "artists": [
                {"id": "0gxyHStUsqpMadRV0Di1Qt", "name": "Rick Astley"}
            ],
            "album": {
                "id": "6eUW0wxWtzkFdaEFsTJto6",
                "name": "Whenever You Need Somebody",
                "album_type": "album",
                "release_date": "1987-11-12",
                "images": [
                    {"url": "http://example.com/cover.jpg", "height": 640, "width": 640}
                ]
            }
        });

        let track = parse_track(&json).unwrap();
        assert_eq!(track.name, "Never Gonna Give You Up");
        assert_eq!(track.duration_ms, 213573);
        assert_eq!(track.popularity, 80);
        assert_eq!(track.artists[0].name, "Rick Astley");
        assert_eq!(track.album.name, "Whenever You Need Somebody");
        assert_eq!(track.album.release_date.year, 1987);
        assert_eq!(track.uri(), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_parse_track_without_id_fails() {
        let json = json!({"name": "No ID"});
        assert!(parse_track(&json).is_err());
    }

    #[test]
    fn test_parse_album_with_tracks_page() {
        let json = json!({
            "id": "2noRn2Aes5aoNVsU6iWThc",
            "name": "Discovery",
            "album_type": "album",
            "release_date": "2001-03-07",
            "total_tracks": 14,
            "label": "Virgin",
            "popularity": 83,
            "genres": [],
            "artists": [
                {"id": "4tZwfgrHOc3mvqYlEYSvVi", "name": "Daft Punk"}
            ],
            "tracks": {
                "items": [
                    {
                        "id": "0DiWol3AO6WpXZgp0goxAV",
                        "name": "One More Time",
                        "duration_ms": 320357,
                        "track_number": 1,
                        "disc_number": 1,
                        "explicit": false,
                        "artists": [
                            {"id": "4tZwfgrHOc3mvqYlEYSvVi", "name": "Daft Punk"}
                        ]
                    }
                ],
                "next": "https://api.spotify.com/v1/albums/2noRn2Aes5aoNVsU6iWThc/tracks?offset=50",
                "total": 14
            }
        });

        let album = parse_album(&json).unwrap();
        assert_eq!(album.name, "Discovery");
        assert_eq!(album.total_tracks, 14);
        assert_eq!(album.label.as_deref(), Some("Virgin"));
        assert_eq!(album.tracks.len(), 1);
        assert_eq!(album.tracks[0].name, "One More Time");

        let (tracks, next) = parse_album_tracks_page(&json["tracks"]);
        assert_eq!(tracks.len(), 1);
        assert!(next.unwrap().contains("offset=50"));
    }

    #[test]
    fn test_parse_simplified_album_from_search() {
        let json = json!({
            "id": "abc",
            "name": "Some Single",
            "album_type": "single",
            "release_date": "2020",
            "total_tracks": 1,
            "artists": [{"id": "xyz", "name": "Someone"}]
        });

        let album = parse_album(&json).unwrap();
        assert!(album.tracks.is_empty());
        assert_eq!(album.label, None);
        assert_eq!(album.popularity, None);
        assert_eq!(album.release_date.year, 2020);
    }

    #[test]
    fn test_parse_artist_profile() {
        let json = json!({
            "id": "4tZwfgrHOc3mvqYlEYSvVi",
            "name": "Daft Punk",
            "genres": ["electro", "filter house"],
            "followers": {"href": null, "total": 11811586},
            "popularity": 82,
            "images": [{"url": "http://example.com/a.jpg", "height": 640, "width": 640}]
        });

        let artist = parse_artist(&json).unwrap();
        assert_eq!(artist.name, "Daft Punk");
        assert_eq!(artist.followers, 11811586);
        assert_eq!(artist.genres, vec!["electro", "filter house"]);
        assert!(artist.top_tracks.is_empty());
    }

    #[test]
    fn test_parse_top_tracks_envelope() {
        let json = json!({
            "tracks": [
                {"id": "t1", "name": "Hit One", "duration_ms": 1000},
                {"id": "t2", "name": "Hit Two", "duration_ms": 2000}
            ]
        });

        let tracks = parse_top_tracks(&json).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].name, "Hit Two");
    }

    #[test]
    fn test_parse_playlist_skips_null_and_local_tracks() {
        let json = json!({
            "id": "37i9dQZF1DXcBWIGoYBM5M",
            "name": "Today's Top Hits",
            "description": "The hottest 50.",
            "owner": {"id": "spotify", "display_name": "Spotify"},
            "public": true,
            "collaborative": false,
            "snapshot_id": "MTY4NzE4",
            "tracks": {
                "items": [
                    {
                        "added_at": "2015-01-15T12:39:22Z",
                        "track": {
                            "id": "t1",
                            "name": "Kept",
                            "duration_ms": 1000,
                            "artists": [{"id": "a1", "name": "Artist"}]
                        }
                    },
                    {"added_at": "2015-01-16T00:00:00Z", "track": null},
                    {
                        "added_at": "2015-01-17T00:00:00Z",
                        "track": {"id": null, "name": "Local File", "is_local": true}
                    }
                ],
                "next": null,
                "total": 50
            }
        });

        let playlist = parse_playlist(&json).unwrap();
        assert_eq!(playlist.name, "Today's Top Hits");
        assert_eq!(playlist.owner.id, "spotify");
        assert_eq!(playlist.public, Some(true));
        assert_eq!(playlist.total_tracks, 50);
        assert_eq!(playlist.tracks.len(), 1);
        assert_eq!(playlist.tracks[0].track.name, "Kept");
        assert!(playlist.tracks[0].added_at.is_some());
    }

    #[test]
    fn test_parse_user_null_display_name_falls_back_to_id() {
        let json = json!({
            "id": "leocoronag",
            "display_name": null,
            "followers": {"total": 12}
        });

        let user = parse_user(&json).unwrap();
        assert_eq!(user.display_name, "leocoronag");
        assert_eq!(user.followers, 12);
        assert_eq!(user.email, None);
    }

    #[test]
    fn test_parse_search_mixed_categories() {
        let json = json!({
            "tracks": {
                "items": [
                    {"id": "t1", "name": "Song", "duration_ms": 1000}
                ],
                "total": 1
            },
            "playlists": {
                "items": [
                    null,
                    {
                        "id": "p1",
                        "name": "Mix",
                        "owner": {"id": "u1", "display_name": "User"},
                        "tracks": {"total": 30}
                    }
                ],
                "total": 2
            }
        });

        let results = parse_search(&json).unwrap();
        assert_eq!(results.tracks.len(), 1);
        assert_eq!(results.playlists.len(), 1);
        assert_eq!(results.playlists[0].total_tracks, 30);
        assert!(results.albums.is_empty());
        assert_eq!(results.len(), 2);
    }
}
