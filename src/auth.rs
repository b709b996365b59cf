//! Authorization building blocks: application credentials, consent
//! configuration, access tokens and the optional on-disk token cache.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Result, SpotifyError};

/// Tokens are treated as stale this many seconds before they really
/// expire, so a request never races the boundary.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// Seconds to wait for the user to finish the consent flow.
pub(crate) const CONSENT_TIMEOUT_SECS: u64 = 120;

/// OAuth scope names used by this crate.
pub mod scopes {
    /// Read access to the user's private playlists.
    pub const PLAYLIST_READ_PRIVATE: &str = "playlist-read-private";
    /// Write access to the user's private playlists.
    pub const PLAYLIST_MODIFY_PRIVATE: &str = "playlist-modify-private";
    /// Write access to the user's public playlists.
    pub const PLAYLIST_MODIFY_PUBLIC: &str = "playlist-modify-public";
    /// Read access to subscription level and country.
    pub const USER_READ_PRIVATE: &str = "user-read-private";
    /// Read access to the account email address.
    pub const USER_READ_EMAIL: &str = "user-read-email";

    /// Scopes requested when none are configured: enough for every
    /// playlist operation this crate offers.
    pub const DEFAULT: &[&str] = &[
        PLAYLIST_READ_PRIVATE,
        PLAYLIST_MODIFY_PRIVATE,
        PLAYLIST_MODIFY_PUBLIC,
    ];
}

/// Application client credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The application's client ID.
    pub client_id: String,
    /// The application's client secret.
    pub client_secret: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values up front.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        client_id: S1,
        client_secret: S2,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(SpotifyError::BadCredentials(
                "client ID and client secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Read `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`, loading a
    /// `.env` file first when one is present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let client_id = std::env::var("SPOTIFY_CLIENT_ID").unwrap_or_default();
        let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default();

        Self::new(client_id, client_secret)
    }

    /// The `Basic` authorization header value for the token endpoint:
    /// base64 of `client_id:client_secret`.
    pub(crate) fn basic_header(&self) -> String {
        let encoded = BASE64.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {encoded}")
    }
}

/// Settings for the user-consent flow.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Where the authorization server redirects the browser. Must be
    /// registered in the application settings and point at a local
    /// address this process can bind.
    pub redirect_uri: String,

    /// Scopes requested from the user.
    pub scopes: Vec<String>,

    /// How long to wait for the user before giving up, in seconds.
    pub consent_timeout_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            redirect_uri: "http://127.0.0.1:8000/callback".to_string(),
            scopes: scopes::DEFAULT.iter().map(|s| s.to_string()).collect(),
            consent_timeout_secs: CONSENT_TIMEOUT_SECS,
        }
    }
}

impl OAuthConfig {
    /// The space-separated scope string sent to the authorize endpoint.
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Split the redirect URI into the address to bind and the path the
    /// callback route serves.
    pub(crate) fn listener_parts(&self) -> Result<(String, String)> {
        let url = Url::parse(&self.redirect_uri).map_err(|e| {
            SpotifyError::UserConsent(format!(
                "invalid redirect URI '{}': {e}",
                self.redirect_uri
            ))
        })?;

        let host = url
            .host_str()
            .ok_or_else(|| {
                SpotifyError::UserConsent(format!(
                    "redirect URI '{}' has no host",
                    self.redirect_uri
                ))
            })?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(80);
        let path = if url.path().is_empty() {
            "/".to_string()
        } else {
            url.path().to_string()
        };

        Ok((format!("{host}:{port}"), path))
    }
}

/// An access token with everything needed to refresh it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// The bearer token sent with API requests.
    pub access_token: String,

    /// The refresh token, when the grant produced one. Client-credential
    /// grants never do.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Space-separated scopes the token was granted.
    #[serde(default)]
    pub scope: String,

    /// Lifetime reported by the token endpoint, in seconds.
    pub expires_in: u64,

    /// When the token was obtained.
    pub obtained_at: DateTime<Utc>,
}

impl Token {
    /// Build a token from a token-endpoint response body.
    pub(crate) fn from_json(json: &Value) -> Result<Self> {
        let access_token = json
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                SpotifyError::MalformedResponse(
                    "token response without access_token".to_string(),
                )
            })?
            .to_string();

        Ok(Self {
            access_token,
            refresh_token: json
                .get("refresh_token")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            scope: json
                .get("scope")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            expires_in: json
                .get("expires_in")
                .and_then(|v| v.as_u64())
                .unwrap_or(3600),
            obtained_at: Utc::now(),
        })
    }

    /// When the token stops being used, margin included.
    pub fn stale_at(&self) -> DateTime<Utc> {
        let usable = self.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        self.obtained_at + chrono::Duration::seconds(usable as i64)
    }

    /// Whether the token should be refreshed before use.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.stale_at()
    }
}

/// On-disk persistence for the user token, so consent survives restarts.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Cache at an explicit location.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The platform-conventional location:
    /// `<local data dir>/spotlas/token.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("spotlas").join("token.json"))
    }

    /// Where this cache reads and writes.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the cached token, if there is a readable one.
    pub async fn load(&self) -> Option<Token> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                debug!("Ignoring unreadable token cache {}: {e}", self.path.display());
                None
            }
        }
    }

    /// Persist a token, creating parent directories as needed.
    pub async fn store(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.path, raw).await?;
        debug!("Stored token cache at {}", self.path.display());
        Ok(())
    }

    /// Delete the cached token; missing files are fine.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_reject_empty() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("id", "").is_err());
        assert!(Credentials::new("id", "secret").is_ok());
    }

    #[test]
    fn test_basic_header() {
        let creds = Credentials::new("id", "secret").unwrap();
        // base64("id:secret")
        assert_eq!(creds.basic_header(), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn test_token_from_json() {
        let token = Token::from_json(&json!({
            "access_token": "NgCXRK...MzYjw",
            "token_type": "Bearer",
            "scope": "playlist-read-private",
            "expires_in": 3600,
            "refresh_token": "NgAagA...Um_SHo"
        }))
        .unwrap();

        assert_eq!(token.access_token, "NgCXRK...MzYjw");
        assert_eq!(token.refresh_token.as_deref(), Some("NgAagA...Um_SHo"));
        assert_eq!(token.expires_in, 3600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_from_json_requires_access_token() {
        assert!(Token::from_json(&json!({"token_type": "Bearer"})).is_err());
    }

    #[test]
    fn test_token_expiry_margin() {
        let mut token = Token::from_json(&json!({
            "access_token": "x",
            "expires_in": 3600
        }))
        .unwrap();

        token.obtained_at = Utc::now() - chrono::Duration::seconds(3600 - 30);
        assert!(token.is_expired(), "inside the safety margin counts as stale");

        token.obtained_at = Utc::now() - chrono::Duration::seconds(600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_listener_parts() {
        let oauth = OAuthConfig::default();
        let (addr, path) = oauth.listener_parts().unwrap();
        assert_eq!(addr, "127.0.0.1:8000");
        assert_eq!(path, "/callback");
    }

    #[test]
    fn test_listener_parts_default_port() {
        let oauth = OAuthConfig {
            redirect_uri: "http://localhost/done".to_string(),
            ..Default::default()
        };
        let (addr, path) = oauth.listener_parts().unwrap();
        assert_eq!(addr, "localhost:80");
        assert_eq!(path, "/done");
    }

    #[test]
    fn test_scope_string() {
        let oauth = OAuthConfig::default();
        assert_eq!(
            oauth.scope_string(),
            "playlist-read-private playlist-modify-private playlist-modify-public"
        );
    }

    #[test]
    fn test_token_round_trips_through_cache_format() {
        let token = Token {
            access_token: "abc".to_string(),
            refresh_token: Some("def".to_string()),
            scope: "playlist-read-private".to_string(),
            expires_in: 3600,
            obtained_at: Utc::now(),
        };

        let raw = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.access_token, "abc");
        assert_eq!(back.refresh_token.as_deref(), Some("def"));
    }
}
