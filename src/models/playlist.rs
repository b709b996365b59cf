//! Playlist-related models.
//!
//! This module contains models for representing playlists and their
//! entries. Playlist-nested tracks are full track records, so entries
//! wrap a [`Track`] together with entry metadata rather than repeating
//! the track fields.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{resource_uri, resource_url, Image, ResourceKind};
use super::track::{Track, TrackRef};
use super::user::User;

/// The user who owns a playlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistOwner {
    /// Spotify user ID.
    pub id: String,

    /// Display name of the user.
    pub display_name: String,
}

impl PlaylistOwner {
    /// Create a new owner with display name and Spotify ID.
    pub fn new<S1: Into<String>, S2: Into<String>>(display_name: S1, id: S2) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// The `open.spotify.com` share URL for the owner's profile.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::User, &self.id)
    }
}

// Owners are the same user exactly when their Spotify IDs match.
impl PartialEq for PlaylistOwner {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlaylistOwner {}

impl PartialEq<User> for PlaylistOwner {
    fn eq(&self, other: &User) -> bool {
        self.id == other.id
    }
}

impl PartialEq<PlaylistOwner> for User {
    fn eq(&self, other: &PlaylistOwner) -> bool {
        self.id == other.id
    }
}

/// One entry of a playlist: the track plus entry metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaylistItem {
    /// When the track was added to the playlist, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,

    /// The track itself.
    pub track: Track,
}

impl PlaylistItem {
    /// Wrap a bare track as a playlist entry.
    pub fn from_track(track: Track) -> Self {
        Self {
            added_at: None,
            track,
        }
    }
}

impl TrackRef for PlaylistItem {
    fn track_id(&self) -> &str {
        &self.track.id
    }
}

/// A user-curated playlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
    /// Spotify playlist ID.
    pub id: String,

    /// Playlist title.
    pub name: String,

    /// Playlist description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Playlist owner.
    pub owner: PlaylistOwner,

    /// Whether the playlist is public; the API omits this for playlists
    /// it will not disclose visibility for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,

    /// Whether other users can modify the playlist.
    #[serde(default)]
    pub collaborative: bool,

    /// Version identifier returned by the API; changes on every edit.
    #[serde(default)]
    pub snapshot_id: String,

    /// Total number of tracks, as reported by the API. May exceed
    /// `tracks.len()` for playlists taken from search results, which
    /// carry no entries.
    pub total_tracks: u32,

    /// Playlist cover images.
    #[serde(default)]
    pub images: Vec<Image>,

    /// Entries in playlist order.
    #[serde(default)]
    pub tracks: Vec<PlaylistItem>,
}

impl Playlist {
    /// The `spotify:playlist:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Playlist, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::Playlist, &self.id)
    }

    /// Get total duration of all fetched tracks in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.tracks.iter().map(|t| t.track.duration_ms).sum()
    }

    /// Get the number of fetched tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Get the largest cover image available.
    pub fn largest_image(&self) -> Option<&Image> {
        self.images.iter().max_by_key(|img| img.area())
    }

    /// Iterate over the tracks without the entry wrappers.
    pub fn track_iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().map(|item| &item.track)
    }
}

// Playlists are the same playlist exactly when their Spotify IDs match.
impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}

impl Hash for Playlist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
