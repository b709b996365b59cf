//! Share-link parsing.
//!
//! The same resource can be spelled several ways in the wild: an
//! `open.spotify.com` share URL (with tracking query parameters, an
//! optional locale segment and sometimes a trailing slash), a
//! `spotify:{kind}:{id}` URI, or a bare ID copied out of one of those.
//! This module canonicalizes all of them to a kind plus ID.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Result, SpotifyError};
use crate::models::common::{resource_uri, resource_url, ResourceKind};

/// The host share links live on.
const OPEN_HOST: &str = "open.spotify.com";

/// A canonicalized share link: what kind of resource, and which one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpotifyLink {
    /// The resource kind named by the link.
    pub kind: ResourceKind,
    /// The Spotify ID.
    pub id: String,
}

impl SpotifyLink {
    /// Create a link from parts already known to be valid.
    pub fn new<S: Into<String>>(kind: ResourceKind, id: S) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// The `spotify:{kind}:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(self.kind, &self.id)
    }

    /// The canonical `open.spotify.com` URL.
    pub fn url(&self) -> String {
        resource_url(self.kind, &self.id)
    }
}

impl fmt::Display for SpotifyLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl FromStr for SpotifyLink {
    type Err = SpotifyError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Check the character class of an ID.
///
/// IDs are base62, but user IDs predate that scheme and may carry
/// `.`, `-` or `_`.
fn valid_id(id: &str, kind: ResourceKind) -> bool {
    !id.is_empty()
        && id.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || (kind == ResourceKind::User && matches!(c, '.' | '-' | '_'))
        })
}

/// Parse a share URL or URI into a [`SpotifyLink`].
///
/// Bare IDs are rejected here because the kind cannot be inferred from
/// them; use [`extract_id`] when the kind is known out of band.
pub fn parse(input: &str) -> Result<SpotifyLink> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SpotifyError::InvalidLink("empty input".to_string()));
    }

    if input.starts_with("spotify:") {
        return parse_uri(input);
    }

    if looks_like_url(input) {
        return parse_url(input);
    }

    Err(SpotifyError::InvalidLink(format!(
        "cannot infer the resource kind from '{input}'"
    )))
}

/// Extract the ID from a link, URI or bare ID for a known resource kind.
///
/// Full links must agree with the expected kind; bare input only has to
/// be a plausible ID.
pub fn extract_id(input: &str, kind: ResourceKind) -> Result<String> {
    let input = input.trim();

    if input.starts_with("spotify:") || looks_like_url(input) {
        let link = parse(input)?;
        if link.kind != kind {
            return Err(SpotifyError::InvalidLink(format!(
                "expected a {} link, got a {} link",
                kind, link.kind
            )));
        }
        return Ok(link.id);
    }

    if valid_id(input, kind) {
        return Ok(input.to_string());
    }

    Err(SpotifyError::InvalidLink(format!(
        "'{input}' is not a valid {kind} ID"
    )))
}

fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://")
        || input.starts_with("https://")
        || input.starts_with(OPEN_HOST)
}

/// Parse a `spotify:{kind}:{id}` URI.
fn parse_uri(input: &str) -> Result<SpotifyLink> {
    let parts: Vec<&str> = input.split(':').collect();

    match parts.as_slice() {
        ["spotify", kind, id] => {
            let kind: ResourceKind = kind.parse()?;
            if !valid_id(id, kind) {
                return Err(SpotifyError::InvalidLink(format!(
                    "'{id}' is not a valid {kind} ID"
                )));
            }
            Ok(SpotifyLink::new(kind, *id))
        }
        _ => Err(SpotifyError::InvalidLink(format!(
            "malformed URI '{input}'"
        ))),
    }
}

/// Parse an `open.spotify.com` share URL.
fn parse_url(input: &str) -> Result<SpotifyLink> {
    // Browsers copy links with the scheme, but people retype them without.
    let with_scheme;
    let input = if input.starts_with(OPEN_HOST) {
        with_scheme = format!("https://{input}");
        &with_scheme
    } else {
        input
    };

    let parsed =
        Url::parse(input).map_err(|e| SpotifyError::InvalidLink(format!("{input}: {e}")))?;

    if parsed.host_str() != Some(OPEN_HOST) {
        return Err(SpotifyError::InvalidLink(format!(
            "'{input}' is not an {OPEN_HOST} link"
        )));
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    // Localized share links insert a segment such as "intl-es".
    let segments: Vec<&str> = segments
        .into_iter()
        .skip_while(|seg| seg.starts_with("intl-"))
        .collect();

    match segments.as_slice() {
        [kind, id] => {
            let kind: ResourceKind = kind.parse()?;
            if !valid_id(id, kind) {
                return Err(SpotifyError::InvalidLink(format!(
                    "'{id}' is not a valid {kind} ID"
                )));
            }
            Ok(SpotifyLink::new(kind, *id))
        }
        _ => Err(SpotifyError::InvalidLink(format!(
            "unrecognized link path '{}'",
            parsed.path()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_track_url_with_query() {
        let link = parse(
            "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc123def456",
        )
        .unwrap();
        assert_eq!(link.kind, ResourceKind::Track);
        assert_eq!(link.id, "4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_parse_url_with_locale_segment() {
        let link =
            parse("https://open.spotify.com/intl-es/album/2noRn2Aes5aoNVsU6iWThc").unwrap();
        assert_eq!(link.kind, ResourceKind::Album);
        assert_eq!(link.id, "2noRn2Aes5aoNVsU6iWThc");
    }

    #[test]
    fn test_parse_url_with_trailing_slash() {
        let link = parse("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M/").unwrap();
        assert_eq!(link.kind, ResourceKind::Playlist);
        assert_eq!(link.id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn test_parse_url_without_scheme() {
        let link = parse("open.spotify.com/artist/4tZwfgrHOc3mvqYlEYSvVi").unwrap();
        assert_eq!(link.kind, ResourceKind::Artist);
    }

    #[test]
    fn test_parse_uri() {
        let link = parse("spotify:track:4uLU6hMCjMI75M1A2tKUQC").unwrap();
        assert_eq!(link.kind, ResourceKind::Track);
        assert_eq!(link.id, "4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_parse_rejects_bare_id() {
        assert!(parse("4uLU6hMCjMI75M1A2tKUQC").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(parse("https://open.spotify.com/badurl/fakeid123").is_err());
        assert!(parse("spotify:podcast:someid").is_err());
    }

    #[test]
    fn test_parse_rejects_foreign_host() {
        assert!(parse("https://example.com/track/4uLU6hMCjMI75M1A2tKUQC").is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_extract_id_accepts_bare_id() {
        let id = extract_id("4uLU6hMCjMI75M1A2tKUQC", ResourceKind::Track).unwrap();
        assert_eq!(id, "4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_extract_id_accepts_matching_link() {
        let id = extract_id(
            "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=xyz",
            ResourceKind::Track,
        )
        .unwrap();
        assert_eq!(id, "4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn test_extract_id_rejects_kind_mismatch() {
        assert!(extract_id(
            "https://open.spotify.com/album/2noRn2Aes5aoNVsU6iWThc",
            ResourceKind::Track
        )
        .is_err());
    }

    #[test]
    fn test_extract_id_rejects_garbage() {
        assert!(extract_id("not a spotify id!", ResourceKind::Track).is_err());
    }

    #[test]
    fn test_user_ids_allow_legacy_characters() {
        let id = extract_id("john.doe-77", ResourceKind::User).unwrap();
        assert_eq!(id, "john.doe-77");
        assert!(extract_id("john.doe-77", ResourceKind::Track).is_err());

        let link = parse("https://open.spotify.com/user/john.doe-77").unwrap();
        assert_eq!(link.kind, ResourceKind::User);
    }

    #[test]
    fn test_link_round_trip() {
        let link: SpotifyLink = "spotify:album:2noRn2Aes5aoNVsU6iWThc".parse().unwrap();
        assert_eq!(
            link.url(),
            "https://open.spotify.com/album/2noRn2Aes5aoNVsU6iWThc"
        );
        assert_eq!(link.uri(), "spotify:album:2noRn2Aes5aoNVsU6iWThc");
        assert_eq!(link.to_string(), link.url());
    }
}
