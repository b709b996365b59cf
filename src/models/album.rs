//! Album-related models.
//!
//! This module contains models for representing albums and their
//! nested tracks and artist references.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::artist::ArtistLink;
use super::common::{resource_uri, resource_url, Image, ReleaseDate, ResourceKind};
use super::track::TrackRef;

/// Album when nested inside a track context.
///
/// Contains album metadata relevant to the track.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumLink {
    /// Spotify album ID.
    pub id: String,

    /// Album title.
    pub name: String,

    /// Album type: "album", "single", or "compilation".
    pub album_type: String,

    /// Release date.
    pub release_date: ReleaseDate,

    /// Cover images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,
}

impl AlbumLink {
    /// Create a new album reference with title and Spotify ID.
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, id: S2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// The `spotify:album:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Album, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::Album, &self.id)
    }
}

/// Track when nested inside an album context.
///
/// Contains track metadata without the album info (since it's implicit).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumTrack {
    /// Spotify track ID.
    pub id: String,

    /// Track title.
    pub name: String,

    /// Disc number (1-indexed).
    #[serde(default = "default_one")]
    pub disc_number: u32,

    /// Track number on the disc (1-indexed).
    #[serde(default = "default_one")]
    pub track_number: u32,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the track has explicit content.
    #[serde(default)]
    pub explicit: bool,

    /// Artists who performed this track.
    #[serde(default)]
    pub artists: Vec<ArtistLink>,
}

fn default_one() -> u32 {
    1
}

impl AlbumTrack {
    /// Get the primary artist name.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// Get all artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Get duration formatted as MM:SS.
    pub fn duration_formatted(&self) -> String {
        let total_seconds = self.duration_ms / 1000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    /// The `spotify:track:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Track, &self.id)
    }
}

impl TrackRef for AlbumTrack {
    fn track_id(&self) -> &str {
        &self.id
    }
}

/// A full album record.
///
/// Contains complete album information including its track listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    /// Spotify album ID.
    pub id: String,

    /// Album title.
    pub name: String,

    /// Album type: "album", "single", or "compilation".
    pub album_type: String,

    /// Release date.
    pub release_date: ReleaseDate,

    /// Total number of tracks in the album.
    pub total_tracks: u32,

    /// Record label, when reported (full album fetches only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Popularity score (0-100), when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,

    /// Genres associated with the album.
    #[serde(default)]
    pub genres: Vec<String>,

    /// Cover images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,

    /// Album artists.
    #[serde(default)]
    pub artists: Vec<ArtistLink>,

    /// Tracks in the album; empty for albums taken from search results.
    #[serde(default)]
    pub tracks: Vec<AlbumTrack>,
}

impl Album {
    /// The `spotify:album:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Album, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::Album, &self.id)
    }

    /// Get the primary artist name.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    /// Get all artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Get total duration of all tracks in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration_ms).sum()
    }

    /// Get the largest cover image available.
    pub fn largest_image(&self) -> Option<&Image> {
        self.images.iter().max_by_key(|img| img.area())
    }

    /// Get tracks for a specific disc.
    pub fn tracks_for_disc(&self, disc_number: u32) -> Vec<&AlbumTrack> {
        self.tracks
            .iter()
            .filter(|t| t.disc_number == disc_number)
            .collect()
    }
}

// Albums are the same album exactly when their Spotify IDs match.
impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq<AlbumLink> for Album {
    fn eq(&self, other: &AlbumLink) -> bool {
        self.id == other.id
    }
}

impl PartialEq<Album> for AlbumLink {
    fn eq(&self, other: &Album) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_total_duration() {
        let album = Album {
            tracks: vec![
                AlbumTrack {
                    duration_ms: 180000,
                    ..Default::default()
                },
                AlbumTrack {
                    duration_ms: 240000,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(album.total_duration_ms(), 420000);
    }

    #[test]
    fn test_album_artists_string() {
        let album = Album {
            artists: vec![
                ArtistLink::new("Artist A", "1"),
                ArtistLink::new("Artist B", "2"),
            ],
            ..Default::default()
        };
        assert_eq!(album.artists_string(" & "), "Artist A & Artist B");
    }

    #[test]
    fn test_tracks_for_disc() {
        let album = Album {
            tracks: vec![
                AlbumTrack {
                    name: "Track 1".to_string(),
                    disc_number: 1,
                    ..Default::default()
                },
                AlbumTrack {
                    name: "Track 2".to_string(),
                    disc_number: 2,
                    ..Default::default()
                },
                AlbumTrack {
                    name: "Track 3".to_string(),
                    disc_number: 1,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let disc1_tracks = album.tracks_for_disc(1);
        assert_eq!(disc1_tracks.len(), 2);
        assert_eq!(disc1_tracks[0].name, "Track 1");
        assert_eq!(disc1_tracks[1].name, "Track 3");
    }

    #[test]
    fn test_album_equality_by_id() {
        let a = Album {
            id: "2noRn2Aes5aoNVsU6iWThc".to_string(),
            name: "Discovery".to_string(),
            ..Default::default()
        };
        let b = Album {
            id: "2noRn2Aes5aoNVsU6iWThc".to_string(),
            total_tracks: 14,
            ..Default::default()
        };
        assert_eq!(a, b);
    }
}
