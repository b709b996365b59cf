//! Web API client (api.spotify.com).
//!
//! Every call takes a bearer token; token acquisition lives in
//! [`accounts`](super::accounts) and the [`Spotify`](crate::Spotify)
//! facade decides which token a call gets.

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::converters;
use crate::error::{Result, SpotifyError};
use crate::models::{Album, Artist, Playlist, ResourceKind, SearchResults, Track, User};

/// Base URL for the web API.
const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// User agent sent with every request.
const USER_AGENT: &str = concat!("spotlas/", env!("CARGO_PKG_VERSION"));

/// The API accepts at most this many track URIs per playlist mutation.
pub(crate) const TRACK_BATCH_SIZE: usize = 100;

/// Give up on a rate-limited request after this many attempts.
const MAX_ATTEMPTS: u32 = 3;

/// Retry-After delays beyond this are treated as a hard quota error
/// instead of being slept through.
const RETRY_AFTER_CAP_SECS: u64 = 60;

/// Split URIs into API-sized batches with the position each batch is
/// inserted at, so overall order is preserved.
pub(crate) fn batch_with_positions(uris: &[String], position: u32) -> Vec<(Vec<String>, u32)> {
    uris.chunks(TRACK_BATCH_SIZE)
        .enumerate()
        .map(|(i, chunk)| {
            (
                chunk.to_vec(),
                position + (i * TRACK_BATCH_SIZE) as u32,
            )
        })
        .collect()
}

/// Web API client.
///
/// Stateless apart from the HTTP connection pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct WebApi {
    client: Client,
}

impl Default for WebApi {
    fn default() -> Self {
        Self::new()
    }
}

impl WebApi {
    /// Create a new web API client.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Send one API request, retrying rate limits within the budget.
    ///
    /// Success bodies parse to JSON (empty bodies become `Null`); other
    /// responses map to the error taxonomy.
    async fn send(
        &self,
        token: &str,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("{} {}", method, url);

            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(token);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                let text = response.text().await?;
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                return Ok(serde_json::from_str(&text)?);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1);

                if attempt >= MAX_ATTEMPTS || retry_after > RETRY_AFTER_CAP_SECS {
                    return Err(SpotifyError::QuotaExceeded);
                }

                warn!("Rate limited, retrying in {retry_after}s");
                tokio::time::sleep(std::time::Duration::from_secs(retry_after)).await;
                continue;
            }

            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text);
            error!("Spotify API error {}: {}", status.as_u16(), message);
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }
    }

    /// GET an API path relative to the base URL.
    async fn get_json(&self, token: &str, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{API_BASE_URL}{path}");
        self.send(token, Method::GET, &url, query, None).await
    }

    /// GET an absolute URL; pagination `next` links are already absolute.
    async fn get_absolute(&self, token: &str, url: &str) -> Result<Value> {
        self.send(token, Method::GET, url, &[], None).await
    }

    /// Get a track by ID.
    pub async fn track(&self, token: &str, id: &str) -> Result<Track> {
        let json = self.get_json(token, &format!("/tracks/{id}"), &[]).await?;
        converters::parse_track(&json)
    }

    /// Get an album by ID with its complete track listing.
    ///
    /// The album response embeds the first page of tracks; remaining
    /// pages are fetched by following `next` URLs.
    pub async fn album(&self, token: &str, id: &str) -> Result<Album> {
        let json = self.get_json(token, &format!("/albums/{id}"), &[]).await?;
        let mut album = converters::parse_album(&json)?;

        let mut next = json.get("tracks").and_then(converters::next_url);
        while let Some(url) = next {
            let page = self.get_absolute(token, &url).await?;
            let (tracks, more) = converters::parse_album_tracks_page(&page);
            album.tracks.extend(tracks);
            next = more;
        }

        debug!("Fetched {} tracks for album {}", album.tracks.len(), album.id);
        Ok(album)
    }

    /// Get an artist profile by ID, without top tracks.
    pub async fn artist_profile(&self, token: &str, id: &str) -> Result<Artist> {
        let json = self.get_json(token, &format!("/artists/{id}"), &[]).await?;
        converters::parse_artist(&json)
    }

    /// Get an artist's top tracks for a market.
    pub async fn artist_top_tracks(
        &self,
        token: &str,
        id: &str,
        market: &str,
    ) -> Result<Vec<Track>> {
        let json = self
            .get_json(
                token,
                &format!("/artists/{id}/top-tracks"),
                &[("market", market)],
            )
            .await?;
        converters::parse_top_tracks(&json)
    }

    /// Get a playlist by ID with its complete entry list.
    pub async fn playlist(&self, token: &str, id: &str) -> Result<Playlist> {
        let json = self
            .get_json(token, &format!("/playlists/{id}"), &[])
            .await?;
        let mut playlist = converters::parse_playlist(&json)?;

        let mut next = json.get("tracks").and_then(converters::next_url);
        while let Some(url) = next {
            let page = self.get_absolute(token, &url).await?;
            let (items, more) = converters::parse_playlist_items_page(&page);
            playlist.tracks.extend(items);
            next = more;
        }

        debug!(
            "Fetched {} of {} playlist entries for {}",
            playlist.tracks.len(),
            playlist.total_tracks,
            playlist.id
        );
        Ok(playlist)
    }

    /// Get a public user profile by ID.
    pub async fn user(&self, token: &str, id: &str) -> Result<User> {
        let json = self.get_json(token, &format!("/users/{id}"), &[]).await?;
        converters::parse_user(&json)
    }

    /// Get the profile of the user the token belongs to.
    pub async fn me(&self, token: &str) -> Result<User> {
        let json = self.get_json(token, "/me", &[]).await?;
        converters::parse_user(&json)
    }

    /// Search across the given resource kinds.
    ///
    /// `limit` applies per kind. Searching for users is not an API
    /// capability and returns an error.
    pub async fn search(
        &self,
        token: &str,
        query: &str,
        kinds: &[ResourceKind],
        limit: u32,
    ) -> Result<SearchResults> {
        let type_param = search_type_param(kinds)?;
        let limit_param = limit.to_string();

        let json = self
            .get_json(
                token,
                "/search",
                &[
                    ("q", query),
                    ("type", &type_param),
                    ("limit", &limit_param),
                ],
            )
            .await?;
        converters::parse_search(&json)
    }

    /// Create a playlist owned by the given user.
    pub async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        let url = format!("{API_BASE_URL}/users/{user_id}/playlists");
        let body = json!({
            "name": name,
            "description": description,
            "public": public,
        });

        let json = self
            .send(token, Method::POST, &url, &[], Some(&body))
            .await?;
        converters::parse_playlist(&json)
    }

    /// Insert track URIs into a playlist, batching to the API maximum.
    ///
    /// Batches advance the insert position so the URIs end up in the
    /// given order starting at `position`.
    pub async fn add_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
        position: u32,
    ) -> Result<()> {
        let url = format!("{API_BASE_URL}/playlists/{playlist_id}/tracks");

        for (batch, batch_position) in batch_with_positions(uris, position) {
            let body = json!({
                "uris": batch,
                "position": batch_position,
            });
            self.send(token, Method::POST, &url, &[], Some(&body))
                .await?;
        }

        Ok(())
    }

    /// Remove track URIs from a playlist, batching to the API maximum.
    ///
    /// Removes every occurrence of each URI.
    pub async fn remove_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        let url = format!("{API_BASE_URL}/playlists/{playlist_id}/tracks");

        for chunk in uris.chunks(TRACK_BATCH_SIZE) {
            let tracks: Vec<Value> = chunk.iter().map(|uri| json!({ "uri": uri })).collect();
            let body = json!({ "tracks": tracks });
            self.send(token, Method::DELETE, &url, &[], Some(&body))
                .await?;
        }

        Ok(())
    }

    /// Move a contiguous range of playlist entries.
    pub async fn reorder_playlist(
        &self,
        token: &str,
        playlist_id: &str,
        range_start: u32,
        range_length: u32,
        insert_before: u32,
    ) -> Result<()> {
        let url = format!("{API_BASE_URL}/playlists/{playlist_id}/tracks");
        let body = json!({
            "range_start": range_start,
            "range_length": range_length,
            "insert_before": insert_before,
        });

        self.send(token, Method::PUT, &url, &[], Some(&body))
            .await?;
        Ok(())
    }
}

/// Build the `type` parameter for the search endpoint.
fn search_type_param(kinds: &[ResourceKind]) -> Result<String> {
    if kinds.contains(&ResourceKind::User) {
        return Err(SpotifyError::Unsupported(
            "the web API cannot search for users".to_string(),
        ));
    }

    let kinds: &[ResourceKind] = if kinds.is_empty() {
        &[
            ResourceKind::Track,
            ResourceKind::Album,
            ResourceKind::Artist,
            ResourceKind::Playlist,
        ]
    } else {
        kinds
    };

    Ok(kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(","))
}

/// Pull the human-readable message out of an error body, falling back
/// to the raw text. Error bodies look like
/// `{"error": {"status": 404, "message": "Not found."}}`.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_positions_preserve_order() {
        let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{i}")).collect();

        let batches = batch_with_positions(&uris, 5);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].0.len(), 100);
        assert_eq!(batches[0].1, 5);
        assert_eq!(batches[1].1, 105);
        assert_eq!(batches[2].0.len(), 50);
        assert_eq!(batches[2].1, 205);
    }

    #[test]
    fn test_batch_positions_single_batch() {
        let uris = vec!["spotify:track:a".to_string()];
        let batches = batch_with_positions(&uris, 0);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1, 0);
    }

    #[test]
    fn test_search_type_param() {
        let param =
            search_type_param(&[ResourceKind::Track, ResourceKind::Playlist]).unwrap();
        assert_eq!(param, "track,playlist");
    }

    #[test]
    fn test_search_type_param_defaults_to_all() {
        assert_eq!(
            search_type_param(&[]).unwrap(),
            "track,album,artist,playlist"
        );
    }

    #[test]
    fn test_search_rejects_user_kind() {
        assert!(search_type_param(&[ResourceKind::User]).is_err());
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"status": 404, "message": "Not found."}}"#;
        assert_eq!(extract_error_message(body), "Not found.");
        assert_eq!(extract_error_message("plain text"), "plain text");
    }
}
