//! Unified Spotify client.
//!
//! This module provides a high-level, easy-to-use interface for
//! fetching metadata, searching and editing playlists on Spotify.

use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::{accounts, consent, AccountsApi, WebApi};
use crate::auth::{Credentials, OAuthConfig, Token, TokenCache};
use crate::error::{Result, SpotifyError};
use crate::link;
use crate::models::{
    Album, Artist, Playlist, Resource, ResourceKind, SearchResults, Track, TrackRef, User,
};
use crate::search::SearchQuery;

/// Market used for artist top tracks unless configured otherwise.
pub const DEFAULT_MARKET: &str = "US";

/// Search result limit the CLI and examples default to.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Main Spotify client.
///
/// Wraps the Web API and the Accounts service behind typed methods.
/// Public metadata only needs application credentials (client-credentials
/// grant, handled transparently); playlist editing and private data run
/// the browser consent flow on first use and refresh the user token
/// afterwards.
///
/// # Example
///
/// ```rust,no_run
/// use spotlas::Spotify;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let spotify = Spotify::from_env()?;
///
///     let track = spotify
///         .get_track("https://open.spotify.com/track/4u7EnebtmKWzUH433cf5Qv")
///         .await?;
///     println!("{} - {}", track.artists_string(", "), track.name);
///
///     for playlist in spotify.search_playlists("lofi beats", 5).await? {
///         println!("{} ({})", playlist.name, playlist.url());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Spotify {
    accounts: AccountsApi,
    web: WebApi,
    creds: Credentials,
    oauth: OAuthConfig,
    /// Market for top-track queries.
    market: String,
    app_token: RwLock<Option<Token>>,
    user_token: RwLock<Option<Token>>,
    /// Optional on-disk cache so consent survives restarts.
    token_cache: Option<TokenCache>,
}

impl Spotify {
    /// Create a new client from application credentials.
    ///
    /// # Errors
    ///
    /// Returns `BadCredentials` if either value is empty.
    pub fn new<S1, S2>(client_id: S1, client_secret: S2) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Ok(Self::with_credentials(Credentials::new(
            client_id,
            client_secret,
        )?))
    }

    /// Create a new client from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`,
    /// loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_credentials(Credentials::from_env()?))
    }

    /// Create a new client from already-validated credentials.
    pub fn with_credentials(creds: Credentials) -> Self {
        Self {
            accounts: AccountsApi::new(),
            web: WebApi::new(),
            creds,
            oauth: OAuthConfig::default(),
            market: DEFAULT_MARKET.to_string(),
            app_token: RwLock::new(None),
            user_token: RwLock::new(None),
            token_cache: None,
        }
    }

    /// Set the redirect URI the consent flow listens on.
    ///
    /// Must exactly match a redirect URI registered for the application.
    /// Default is `http://127.0.0.1:8000/callback`.
    pub fn set_redirect_uri<S: Into<String>>(&mut self, uri: S) {
        self.oauth.redirect_uri = uri.into();
    }

    /// Get the configured redirect URI.
    pub fn redirect_uri(&self) -> &str {
        &self.oauth.redirect_uri
    }

    /// Set the scopes requested during consent.
    ///
    /// Defaults cover private playlist reads and playlist editing.
    pub fn set_scopes<I, S>(&mut self, scopes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.oauth.scopes = scopes.into_iter().map(Into::into).collect();
    }

    /// Get the configured consent scopes.
    pub fn scopes(&self) -> &[String] {
        &self.oauth.scopes
    }

    /// Set how long the consent listener waits for the redirect, in seconds.
    pub fn set_consent_timeout(&mut self, secs: u64) {
        self.oauth.consent_timeout_secs = secs;
    }

    /// Set the market used for artist top tracks.
    pub fn set_market<S: Into<String>>(&mut self, market: S) {
        self.market = market.into();
    }

    /// Get the configured market.
    pub fn market(&self) -> &str {
        &self.market
    }

    /// Cache user tokens at the given path so consent survives restarts.
    pub fn set_token_cache<P: Into<PathBuf>>(&mut self, path: P) {
        self.token_cache = Some(TokenCache::new(path));
    }

    /// Cache user tokens at the platform-default location.
    ///
    /// # Errors
    ///
    /// Fails when the platform exposes no local data directory.
    pub fn set_default_token_cache(&mut self) -> Result<()> {
        let path = TokenCache::default_path()
            .ok_or_else(|| SpotifyError::IoError(io::Error::other("no platform data directory")))?;
        self.token_cache = Some(TokenCache::new(path));
        Ok(())
    }

    /// Get the token cache path, when caching is enabled.
    pub fn token_cache_path(&self) -> Option<&Path> {
        self.token_cache.as_ref().map(|c| c.path())
    }

    /// Drop the in-memory user token and delete the cached one.
    ///
    /// The next user operation will prompt for consent again.
    pub async fn forget_user_token(&self) -> Result<()> {
        *self.user_token.write().await = None;
        if let Some(cache) = &self.token_cache {
            cache.clear().await?;
        }
        Ok(())
    }

    // ==================
    // METADATA FETCHING
    // ==================

    /// Fetch whatever a share link points at.
    ///
    /// The resource kind is taken from the link, so bare IDs are
    /// rejected here; use [`get_as`](Self::get_as) when the kind is
    /// known out of band.
    pub async fn get(&self, link: &str) -> Result<Resource> {
        let parsed = link::parse(link)?;
        self.fetch_resource(parsed.kind, &parsed.id).await
    }

    /// Fetch a resource of a known kind from a link or bare ID.
    pub async fn get_as(&self, input: &str, kind: ResourceKind) -> Result<Resource> {
        let id = link::extract_id(input, kind)?;
        self.fetch_resource(kind, &id).await
    }

    /// Get full track details from a link or bare ID.
    pub async fn get_track(&self, track: &str) -> Result<Track> {
        let id = link::extract_id(track, ResourceKind::Track)?;
        let token = self.app_access_token().await?;
        self.web.track(&token, &id).await
    }

    /// Get album details plus its complete track list.
    pub async fn get_album(&self, album: &str) -> Result<Album> {
        let id = link::extract_id(album, ResourceKind::Album)?;
        let token = self.app_access_token().await?;
        self.web.album(&token, &id).await
    }

    /// Get an artist profile plus their top tracks in the configured
    /// market.
    pub async fn get_artist(&self, artist: &str) -> Result<Artist> {
        let id = link::extract_id(artist, ResourceKind::Artist)?;
        let token = self.app_access_token().await?;

        let mut profile = self.web.artist_profile(&token, &id).await?;
        profile.top_tracks = self.web.artist_top_tracks(&token, &id, &self.market).await?;
        Ok(profile)
    }

    /// Get an artist's top tracks for an explicit market.
    pub async fn artist_top_tracks(&self, artist: &str, market: &str) -> Result<Vec<Track>> {
        let id = link::extract_id(artist, ResourceKind::Artist)?;
        let token = self.app_access_token().await?;
        self.web.artist_top_tracks(&token, &id, market).await
    }

    /// Get playlist details plus its complete track list.
    ///
    /// Resolves public playlists; for private playlists the caller
    /// owns, use [`get_private_playlist`](Self::get_private_playlist).
    pub async fn get_playlist(&self, playlist: &str) -> Result<Playlist> {
        let id = link::extract_id(playlist, ResourceKind::Playlist)?;
        let token = self.app_access_token().await?;
        self.web.playlist(&token, &id).await
    }

    /// Get a public user profile.
    pub async fn get_user(&self, user: &str) -> Result<User> {
        let id = link::extract_id(user, ResourceKind::User)?;
        let token = self.app_access_token().await?;
        self.web.user(&token, &id).await
    }

    // ==================
    // SEARCH
    // ==================

    /// Search across the given resource kinds.
    ///
    /// `limit` applies per kind. Accepts plain text or a
    /// [`SearchQuery`] built with filters:
    ///
    /// ```rust,no_run
    /// use spotlas::{Genre, ResourceKind, SearchQuery, Spotify};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let spotify = Spotify::from_env()?;
    /// let query = SearchQuery::new("higher ground")
    ///     .artist("Stevie Wonder")
    ///     .genre(Genre::Funk);
    /// let results = spotify.search(query, &[ResourceKind::Track], 10).await?;
    /// println!("{} tracks", results.tracks.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search<Q>(
        &self,
        query: Q,
        kinds: &[ResourceKind],
        limit: u32,
    ) -> Result<SearchResults>
    where
        Q: Into<SearchQuery>,
    {
        let rendered = query.into().build();
        let token = self.app_access_token().await?;
        self.web.search(&token, &rendered, kinds, limit).await
    }

    /// Search for tracks.
    pub async fn search_tracks<Q: Into<SearchQuery>>(
        &self,
        query: Q,
        limit: u32,
    ) -> Result<Vec<Track>> {
        Ok(self
            .search(query, &[ResourceKind::Track], limit)
            .await?
            .tracks)
    }

    /// Search for albums.
    pub async fn search_albums<Q: Into<SearchQuery>>(
        &self,
        query: Q,
        limit: u32,
    ) -> Result<Vec<Album>> {
        Ok(self
            .search(query, &[ResourceKind::Album], limit)
            .await?
            .albums)
    }

    /// Search for artists.
    pub async fn search_artists<Q: Into<SearchQuery>>(
        &self,
        query: Q,
        limit: u32,
    ) -> Result<Vec<Artist>> {
        Ok(self
            .search(query, &[ResourceKind::Artist], limit)
            .await?
            .artists)
    }

    /// Search for playlists.
    pub async fn search_playlists<Q: Into<SearchQuery>>(
        &self,
        query: Q,
        limit: u32,
    ) -> Result<Vec<Playlist>> {
        Ok(self
            .search(query, &[ResourceKind::Playlist], limit)
            .await?
            .playlists)
    }

    /// Fetch the first search hit of the given kind in full.
    ///
    /// # Errors
    ///
    /// Returns `NoResults` when the search comes back empty.
    pub async fn im_feeling_lucky<Q>(&self, query: Q, kind: ResourceKind) -> Result<Resource>
    where
        Q: Into<SearchQuery>,
    {
        let rendered = query.into().build();
        let results = self.search(rendered.as_str(), &[kind], 1).await?;

        let hit = match kind {
            ResourceKind::Track => results.tracks.first().map(|t| t.id.clone()),
            ResourceKind::Album => results.albums.first().map(|a| a.id.clone()),
            ResourceKind::Artist => results.artists.first().map(|a| a.id.clone()),
            ResourceKind::Playlist => results.playlists.first().map(|p| p.id.clone()),
            // search() already rejected this kind
            ResourceKind::User => None,
        };

        match hit {
            Some(id) => self.fetch_resource(kind, &id).await,
            None => Err(SpotifyError::NoResults(format!(
                "no {kind} results for '{rendered}'"
            ))),
        }
    }

    // ==================
    // USER OPERATIONS
    // ==================

    /// Get the authorizing user's own profile.
    ///
    /// Runs the consent flow on first use.
    pub async fn get_me(&self) -> Result<User> {
        let token = self.user_access_token().await?;
        self.web.me(&token).await
    }

    /// Get a playlist with the user token, so private playlists the
    /// user can see resolve too.
    pub async fn get_private_playlist(&self, playlist: &str) -> Result<Playlist> {
        let id = link::extract_id(playlist, ResourceKind::Playlist)?;
        let token = self.user_access_token().await?;
        self.web.playlist(&token, &id).await
    }

    /// Create a playlist owned by the authorizing user.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        let token = self.user_access_token().await?;
        let me = self.web.me(&token).await?;
        self.web
            .create_playlist(&token, &me.id, name, description, public)
            .await
    }

    /// Insert tracks into a playlist at `position` (0 = the top).
    ///
    /// The playlist must belong to the user or be collaborative.
    /// Accepts anything track-shaped: full tracks, album tracks,
    /// playlist items, or raw IDs. Inserts happen in API-sized batches
    /// that preserve the overall order.
    pub async fn add_to_playlist<T: TrackRef>(
        &self,
        playlist: &str,
        tracks: &[T],
        position: u32,
    ) -> Result<()> {
        let id = link::extract_id(playlist, ResourceKind::Playlist)?;

        let uris: Vec<String> = tracks.iter().map(|t| t.track_uri()).collect();
        if uris.is_empty() {
            return Ok(());
        }

        let token = self.user_access_token().await?;
        self.web
            .add_playlist_tracks(&token, &id, &uris, position)
            .await
    }

    /// Remove every track from a playlist.
    ///
    /// Returns the playlist contents as they were before clearing, so
    /// rearrange-style flows can put tracks back if a later step fails.
    pub async fn clear_playlist(&self, playlist: &str) -> Result<Playlist> {
        let id = link::extract_id(playlist, ResourceKind::Playlist)?;
        let token = self.user_access_token().await?;

        let before = self.web.playlist(&token, &id).await?;
        let uris: Vec<String> = before.tracks.iter().map(|item| item.track_uri()).collect();
        if !uris.is_empty() {
            self.web.remove_playlist_tracks(&token, &id, &uris).await?;
        }

        debug!("Cleared {} entries from playlist {}", uris.len(), before.id);
        Ok(before)
    }

    /// Move a contiguous range of playlist entries.
    ///
    /// All indexes start at zero: the range begins at `range_start`,
    /// spans `range_length` entries and lands before the entry
    /// currently at `insert_before`.
    pub async fn reorder_playlist(
        &self,
        playlist: &str,
        range_start: u32,
        range_length: u32,
        insert_before: u32,
    ) -> Result<()> {
        let id = link::extract_id(playlist, ResourceKind::Playlist)?;
        let token = self.user_access_token().await?;
        self.web
            .reorder_playlist(&token, &id, range_start, range_length, insert_before)
            .await
    }

    // ==================
    // INTERNAL HELPERS
    // ==================

    /// Fetch a resource of the given kind by bare ID.
    async fn fetch_resource(&self, kind: ResourceKind, id: &str) -> Result<Resource> {
        let token = self.app_access_token().await?;

        match kind {
            ResourceKind::Track => Ok(Resource::Track(self.web.track(&token, id).await?)),
            ResourceKind::Album => Ok(Resource::Album(self.web.album(&token, id).await?)),
            ResourceKind::Artist => {
                let mut profile = self.web.artist_profile(&token, id).await?;
                profile.top_tracks =
                    self.web.artist_top_tracks(&token, id, &self.market).await?;
                Ok(Resource::Artist(profile))
            }
            ResourceKind::Playlist => Ok(Resource::Playlist(self.web.playlist(&token, id).await?)),
            ResourceKind::User => Ok(Resource::User(self.web.user(&token, id).await?)),
        }
    }

    /// Get a valid app access token, granting one when missing or stale.
    async fn app_access_token(&self) -> Result<String> {
        if let Some(access) = fresh_access(&self.app_token).await {
            return Ok(access);
        }

        let mut guard = self.app_token.write().await;
        // Another task may have granted while this one waited.
        if let Some(token) = guard.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.access_token.clone());
        }

        debug!("Requesting an app token via the client-credentials grant");
        let token = self.accounts.client_credentials_token(&self.creds).await?;
        let access = token.access_token.clone();
        *guard = Some(token);
        Ok(access)
    }

    /// Get a valid user access token.
    ///
    /// Tries, in order: the in-memory token, the on-disk cache, a
    /// refresh grant, and finally a fresh consent flow.
    async fn user_access_token(&self) -> Result<String> {
        if let Some(access) = fresh_access(&self.user_token).await {
            return Ok(access);
        }

        let mut guard = self.user_token.write().await;
        if let Some(token) = guard.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.access_token.clone());
        }

        // A previous run may have left a usable token on disk.
        if guard.is_none() {
            if let Some(cache) = &self.token_cache {
                if let Some(token) = cache.load().await {
                    debug!("Loaded a user token from {}", cache.path().display());
                    *guard = Some(token);
                }
            }
        }

        match guard.as_ref() {
            Some(token) if !token.is_expired() => return Ok(token.access_token.clone()),
            Some(token) => {
                // Stale: refresh instead of prompting for consent again.
                if let Some(refresh) = token.refresh_token.clone() {
                    match self.accounts.refresh_token(&self.creds, &refresh).await {
                        Ok(fresh) => {
                            let access = fresh.access_token.clone();
                            self.persist_user_token(&fresh).await;
                            *guard = Some(fresh);
                            return Ok(access);
                        }
                        Err(e) => {
                            warn!("User token refresh failed, starting a new consent flow: {e}")
                        }
                    }
                }
            }
            None => {}
        }

        let token = self.request_user_consent().await?;
        let access = token.access_token.clone();
        self.persist_user_token(&token).await;
        *guard = Some(token);
        Ok(access)
    }

    /// Run the browser consent flow and exchange the code for a token.
    async fn request_user_consent(&self) -> Result<Token> {
        let state = accounts::generate_state();
        let authorize_url = self.accounts.authorize_url(&self.creds, &self.oauth, &state)?;

        debug!("Starting the user consent flow");
        let code = consent::request_authorization_code(&self.oauth, &authorize_url, &state).await?;
        self.accounts
            .exchange_code(&self.creds, &code, &self.oauth.redirect_uri)
            .await
    }

    /// Persist the user token when a cache is configured.
    async fn persist_user_token(&self, token: &Token) {
        if let Some(cache) = &self.token_cache {
            if let Err(e) = cache.store(token).await {
                warn!("Could not persist the user token: {e}");
            }
        }
    }
}

/// Read-path expiry check: clone the access token while it is fresh.
async fn fresh_access(slot: &RwLock<Option<Token>>) -> Option<String> {
    let guard = slot.read().await;
    guard
        .as_ref()
        .filter(|t| !t.is_expired())
        .map(|t| t.access_token.clone())
}
