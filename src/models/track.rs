//! Track-related models.
//!
//! This module contains the full track record and the [`TrackRef`] trait
//! that playlist mutations accept.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::album::AlbumLink;
use super::artist::ArtistLink;
use super::common::{resource_uri, resource_url, ResourceKind};

/// Anything that resolves to a Spotify track.
///
/// Playlist mutations are URI-based on the wire; this trait lets them
/// accept full tracks, album tracks, playlist items or raw IDs alike.
pub trait TrackRef {
    /// The Spotify track ID.
    fn track_id(&self) -> &str;

    /// The `spotify:track:{id}` URI sent to the API.
    fn track_uri(&self) -> String {
        resource_uri(ResourceKind::Track, self.track_id())
    }
}

impl TrackRef for str {
    fn track_id(&self) -> &str {
        self
    }
}

impl TrackRef for String {
    fn track_id(&self) -> &str {
        self
    }
}

impl<T: TrackRef + ?Sized> TrackRef for &T {
    fn track_id(&self) -> &str {
        (**self).track_id()
    }
}

/// A full track record.
///
/// Contains complete track information including nested album and artist
/// references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    /// Spotify track ID.
    pub id: String,

    /// Track title.
    pub name: String,

    /// Artists who performed this track.
    #[serde(default)]
    pub artists: Vec<ArtistLink>,

    /// Album containing this track.
    pub album: AlbumLink,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the track has explicit content.
    #[serde(default)]
    pub explicit: bool,

    /// Disc number (1-indexed).
    #[serde(default = "default_one")]
    pub disc_number: u32,

    /// Track number on the disc (1-indexed).
    #[serde(default = "default_one")]
    pub track_number: u32,

    /// Popularity score (0-100).
    #[serde(default)]
    pub popularity: u32,

    /// 30-second preview URL, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

fn default_one() -> u32 {
    1
}

impl Track {
    /// Create a new track with title and Spotify ID.
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, id: S2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// The `spotify:track:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Track, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::Track, &self.id)
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

    /// Get duration formatted as MM:SS.
    pub fn duration_formatted(&self) -> String {
        let total_seconds = self.duration_ms / 1000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl TrackRef for Track {
    fn track_id(&self) -> &str {
        &self.id
    }
}

// Tracks are the same track exactly when their Spotify IDs match.
impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_duration_formatted() {
        let track = Track {
            duration_ms: 215000, // 3:35
            ..Default::default()
        };
        assert_eq!(track.duration_formatted(), "03:35");
    }

    #[test]
    fn test_track_artists_string() {
        let track = Track {
            artists: vec![
                ArtistLink::new("Artist One", "1"),
                ArtistLink::new("Artist Two", "2"),
            ],
            ..Default::default()
        };
        assert_eq!(track.artists_string(", "), "Artist One, Artist Two");
    }

    #[test]
    fn test_primary_artist() {
        let track = Track {
            artists: vec![ArtistLink::new("Main Artist", "1")],
            ..Default::default()
        };
        assert_eq!(track.primary_artist(), Some("Main Artist"));
    }

    #[test]
    fn test_track_uri_from_ref() {
        let track = Track::new("Around the World", "1pKYYY0dkg23sQQXi0Q5zN");
        assert_eq!(track.track_uri(), "spotify:track:1pKYYY0dkg23sQQXi0Q5zN");
        assert_eq!(track.uri(), track.track_uri());
    }

    #[test]
    fn test_str_as_track_ref() {
        assert_eq!("abc123".track_uri(), "spotify:track:abc123");
    }

    #[test]
    fn test_track_equality_by_id() {
        let a = Track::new("Song", "id1");
        let mut b = Track::new("Song (Remastered)", "id1");
        b.popularity = 80;
        assert_eq!(a, b);
        assert_ne!(a, Track::new("Song", "id2"));
    }
}
