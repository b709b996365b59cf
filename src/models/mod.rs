//! Data models for Spotify Web API responses.
//!
//! This module contains all the data structures used to represent
//! tracks, albums, artists, playlists, users and search results.

pub mod album;
pub mod artist;
pub mod common;
pub mod playlist;
pub mod search;
pub mod track;
pub mod user;

// Re-exports for convenience
pub use album::{Album, AlbumLink, AlbumTrack};
pub use artist::{Artist, ArtistLink};
pub use common::{Image, ReleaseDate, ResourceKind};
pub use playlist::{Playlist, PlaylistItem, PlaylistOwner};
pub use search::SearchResults;
pub use track::{Track, TrackRef};
pub use user::User;

/// Any resource the universal getter can return.
///
/// Produced by [`Spotify::get`](crate::Spotify::get), which resolves the
/// resource kind from the link itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// A single track.
    Track(Track),
    /// An album with its track listing.
    Album(Album),
    /// An artist with their top tracks.
    Artist(Artist),
    /// A playlist with its entries.
    Playlist(Playlist),
    /// A user profile.
    User(User),
}

impl Resource {
    /// The kind of resource held.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Track(_) => ResourceKind::Track,
            Resource::Album(_) => ResourceKind::Album,
            Resource::Artist(_) => ResourceKind::Artist,
            Resource::Playlist(_) => ResourceKind::Playlist,
            Resource::User(_) => ResourceKind::User,
        }
    }

    /// The Spotify ID of the held resource.
    pub fn id(&self) -> &str {
        match self {
            Resource::Track(t) => &t.id,
            Resource::Album(a) => &a.id,
            Resource::Artist(a) => &a.id,
            Resource::Playlist(p) => &p.id,
            Resource::User(u) => &u.id,
        }
    }

    /// The display name of the held resource.
    pub fn name(&self) -> &str {
        match self {
            Resource::Track(t) => &t.name,
            Resource::Album(a) => &a.name,
            Resource::Artist(a) => &a.name,
            Resource::Playlist(p) => &p.name,
            Resource::User(u) => &u.display_name,
        }
    }

    /// The `spotify:{kind}:{id}` URI.
    pub fn uri(&self) -> String {
        common::resource_uri(self.kind(), self.id())
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        common::resource_url(self.kind(), self.id())
    }

    /// Unwrap as a track, if that is what was fetched.
    pub fn into_track(self) -> Option<Track> {
        match self {
            Resource::Track(t) => Some(t),
            _ => None,
        }
    }

    /// Unwrap as an album, if that is what was fetched.
    pub fn into_album(self) -> Option<Album> {
        match self {
            Resource::Album(a) => Some(a),
            _ => None,
        }
    }

    /// Unwrap as an artist, if that is what was fetched.
    pub fn into_artist(self) -> Option<Artist> {
        match self {
            Resource::Artist(a) => Some(a),
            _ => None,
        }
    }

    /// Unwrap as a playlist, if that is what was fetched.
    pub fn into_playlist(self) -> Option<Playlist> {
        match self {
            Resource::Playlist(p) => Some(p),
            _ => None,
        }
    }

    /// Unwrap as a user, if that is what was fetched.
    pub fn into_user(self) -> Option<User> {
        match self {
            Resource::User(u) => Some(u),
            _ => None,
        }
    }
}
