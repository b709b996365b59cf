//! Search result models.

use serde::{Deserialize, Serialize};

use super::album::Album;
use super::artist::Artist;
use super::playlist::Playlist;
use super::track::Track;

/// Combined results of a search across one or more resource kinds.
///
/// Only the kinds that were requested are populated; the rest stay empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    /// Matching tracks, best match first.
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Matching albums, best match first.
    #[serde(default)]
    pub albums: Vec<Album>,

    /// Matching artists, best match first.
    #[serde(default)]
    pub artists: Vec<Artist>,

    /// Matching playlists, best match first.
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl SearchResults {
    /// Total number of hits across all kinds.
    pub fn len(&self) -> usize {
        self.tracks.len() + self.albums.len() + self.artists.len() + self.playlists.len()
    }

    /// Whether the search matched nothing at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
