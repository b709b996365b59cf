//! User profile models.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::common::{resource_uri, resource_url, Image, ResourceKind};

/// A user profile.
///
/// Public profile fetches populate the public fields only; fetching the
/// authorizing user's own profile also fills country, email and product
/// when the granted scopes allow it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Spotify user ID.
    pub id: String,

    /// Display name of the user.
    pub display_name: String,

    /// Profile images in various sizes.
    #[serde(default)]
    pub images: Vec<Image>,

    /// Number of followers.
    #[serde(default)]
    pub followers: u64,

    /// ISO country code; own profile only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Account email; own profile only, `user-read-email` scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Subscription level ("premium", "free", ...); own profile only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl User {
    /// Create a new user with display name and Spotify ID.
    pub fn new<S1: Into<String>, S2: Into<String>>(display_name: S1, id: S2) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// The `spotify:user:{id}` URI.
    pub fn uri(&self) -> String {
        resource_uri(ResourceKind::User, &self.id)
    }

    /// The `open.spotify.com` share URL.
    pub fn url(&self) -> String {
        resource_url(ResourceKind::User, &self.id)
    }

    /// Get the largest profile image available.
    pub fn largest_image(&self) -> Option<&Image> {
        self.images.iter().max_by_key(|img| img.area())
    }
}

// Users are the same user exactly when their Spotify IDs match.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_equality_by_id() {
        let a = User::new("Leo Corona", "leocoronag");
        let mut b = User::new("renamed", "leocoronag");
        b.followers = 7;
        assert_eq!(a, b);
    }

    #[test]
    fn test_user_url() {
        let user = User::new("Leo Corona", "leocoronag");
        assert_eq!(user.url(), "https://open.spotify.com/user/leocoronag");
        assert_eq!(user.uri(), "spotify:user:leocoronag");
    }
}
