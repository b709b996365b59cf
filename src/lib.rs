//! # spotlas
//!
//! A typed Rust client for the Spotify Web API: metadata, search and
//! playlist editing.
//!
//! ## Quick Start
//!
//! The easiest way to use this library is through the [`Spotify`] struct:
//!
//! ```rust,no_run
//! use spotlas::{ResourceKind, Spotify};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from the Spotify developer dashboard
//!     let spotify = Spotify::new("client_id", "client_secret")?;
//!
//!     // Fetch anything a share link points at
//!     let resource = spotify
//!         .get("https://open.spotify.com/album/2PPMzbHGYDjLazQ2age3pQ")
//!         .await?;
//!     println!("{}: {}", resource.kind(), resource.name());
//!
//!     // Search with a plain string...
//!     let tracks = spotify.search_tracks("higher ground", 10).await?;
//!     println!("{} hits", tracks.len());
//!
//!     // ...or grab the best match directly
//!     let lucky = spotify
//!         .im_feeling_lucky("study beats", ResourceKind::Playlist)
//!         .await?;
//!     println!("Feeling lucky: {}", lucky.url());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Metadata fetching** for tracks, albums, artists, playlists and
//!   users, with pagination handled for you
//! - **Search** across resource kinds, including the filter syntax via
//!   [`SearchQuery`]
//! - **Playlist editing**: create, add, clear and reorder
//! - **Both authorization flows**: app tokens for public data, and the
//!   browser consent flow (with optional on-disk token caching) for
//!   private data and edits
//!
//! ## Low-Level APIs
//!
//! For more control, you can use the lower-level pieces directly:
//!
//! - [`WebApi`](api::WebApi) - typed Web API endpoints against raw tokens
//! - [`AccountsApi`](api::AccountsApi) - token grants and authorize URLs
//! - [`link`] - share-link and URI parsing
//! - [`converters`] - raw JSON to model conversion

pub mod api;
pub mod auth;
mod client;
pub mod converters;
pub mod error;
pub mod link;
pub mod models;
pub mod search;

// Main interface (recommended)
pub use client::{Spotify, DEFAULT_MARKET, DEFAULT_SEARCH_LIMIT};

// Low-level APIs
pub use auth::{scopes, Credentials, OAuthConfig, Token, TokenCache};
pub use error::SpotifyError;
pub use link::SpotifyLink;
pub use models::{
    Album, Artist, Playlist, PlaylistItem, Resource, ResourceKind, SearchResults, Track, TrackRef,
    User,
};
pub use search::{Genre, SearchQuery};
