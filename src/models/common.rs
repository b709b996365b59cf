//! Common types shared across all models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpotifyError;

/// The kinds of resource the web API can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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
    /// A user profile.
    User,
}

impl ResourceKind {
    /// The path segment used for this kind in share links and URIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Track => "track",
            ResourceKind::Album => "album",
            ResourceKind::Artist => "artist",
            ResourceKind::Playlist => "playlist",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = SpotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(ResourceKind::Track),
            "album" => Ok(ResourceKind::Album),
            "artist" => Ok(ResourceKind::Artist),
            "playlist" => Ok(ResourceKind::Playlist),
            "user" => Ok(ResourceKind::User),
            other => Err(SpotifyError::InvalidLink(format!(
                "unknown resource kind '{other}'"
            ))),
        }
    }
}

/// Build the `spotify:{kind}:{id}` URI for a resource.
pub(crate) fn resource_uri(kind: ResourceKind, id: &str) -> String {
    format!("spotify:{}:{}", kind.as_str(), id)
}

/// Build the `open.spotify.com` share URL for a resource.
pub(crate) fn resource_url(kind: ResourceKind, id: &str) -> String {
    format!("https://open.spotify.com/{}/{}", kind.as_str(), id)
}

/// Release date structure.
///
/// Not all fields may be available; year is always present when known,
/// but month and day may be unknown (the API reports day, month or year
/// precision depending on the release).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDate {
    /// Year of release.
    pub year: i32,

    /// Month of release (1-12), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i32>,

    /// Day of release (1-31), if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
}

impl ReleaseDate {
    /// Parse a date string in "YYYY-MM-DD", "YYYY-MM" or "YYYY" format.
    pub fn parse(date_str: &str) -> Self {
        if date_str.is_empty() {
            return Self::default();
        }

        let parts: Vec<&str> = date_str.split('-').collect();

        Self {
            year: parts.first().and_then(|s| s.parse().ok()).unwrap_or(0),
            month: parts.get(1).and_then(|s| s.parse().ok()),
            day: parts.get(2).and_then(|s| s.parse().ok()),
        }
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(m), Some(d)) => write!(f, "{:04}-{:02}-{:02}", self.year, m, d),
            (Some(m), None) => write!(f, "{:04}-{:02}", self.year, m),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

/// Image with URL and dimensions.
///
/// Dimensions are reported as null for some images (playlist mosaics in
/// particular), hence the options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Image {
    /// URL to the image.
    pub url: String,

    /// Height in pixels, if reported.
    pub height: Option<u32>,

    /// Width in pixels, if reported.
    pub width: Option<u32>,
}

impl Image {
    /// Create a new image.
    pub fn new<S: Into<String>>(url: S, height: u32, width: u32) -> Self {
        Self {
            url: url.into(),
            height: Some(height),
            width: Some(width),
        }
    }

    /// Pixel area, treating unknown dimensions as zero.
    pub(crate) fn area(&self) -> u64 {
        self.width.unwrap_or(0) as u64 * self.height.unwrap_or(0) as u64
    }
}
