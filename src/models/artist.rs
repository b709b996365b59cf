//! Artist-related models.
//!
//! This module contains models for representing artists, both as full
//! profiles and as the compact references nested in tracks and albums.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::common::{resource_uri, resource_url, Image, ResourceKind};
use super::track::Track;

/// Artist when nested inside a track or album context.
///
/// Contains basic identifying information only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistLink {
    /// Spotify artist ID.
    pub id: String,

    /// Artist name.
    pub name: String,
}

impl ArtistLink {
    /// Create a new artist reference with name and Spotify ID.
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, id: S2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The `spotify:artist:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Artist, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::Artist, &self.id)
    }
}

/// A full artist record.
///
/// Contains the artist profile plus the artist's current top tracks
/// for the requested market.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    /// Spotify artist ID.
    pub id: String,

    /// Artist name.
    pub name: String,

    /// Genres associated with the artist.
    #[serde(default)]
    pub genres: Vec<String>,

    /// Artist images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,

    /// Number of followers.
    #[serde(default)]
    pub followers: u64,

    /// Popularity score (0-100).
    #[serde(default)]
    pub popularity: u32,

    /// The artist's top tracks; empty for artists taken from search results.
    #[serde(default)]
    pub top_tracks: Vec<Track>,
}

impl Artist {
    /// The `spotify:artist:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::Artist, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::Artist, &self.id)
    }

    /// Get the largest image available.
    pub fn largest_image(&self) -> Option<&Image> {
        self.images.iter().max_by_key(|img| img.area())
    }
}

// Artists are the same artist exactly when their Spotify IDs match.
impl PartialEq for Artist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Artist {}

impl Hash for Artist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialEq<ArtistLink> for Artist {
    fn eq(&self, other: &ArtistLink) -> bool {
        self.id == other.id
    }
}

impl PartialEq<Artist> for ArtistLink {
    fn eq(&self, other: &Artist) -> bool {
        self.id == other.id
    }
}
