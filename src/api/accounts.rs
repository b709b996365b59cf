//! Accounts service client (accounts.spotify.com).
//!
//! Handles the three token grants (client credentials, authorization
//! code, refresh) and builds the authorize URL the consent flow opens
//! in the browser.

use rand::{distributions::Alphanumeric, Rng};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, OAuthConfig, Token};
use crate::error::{Result, SpotifyError};

/// Base URL for the accounts service.
const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Length of the random `state` parameter.
const STATE_LEN: usize = 16;

/// Generate the random `state` the consent flow round-trips to detect
/// forged callbacks.
pub(crate) fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// Map a token-endpoint failure body to the error taxonomy.
///
/// Failure bodies look like
/// `{"error": "invalid_client", "error_description": "..."}`.
fn token_error(status: u16, body: &str) -> SpotifyError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let description = parsed
        .as_ref()
        .and_then(|v| v.get("error_description"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    match code.as_str() {
        "invalid_client" => SpotifyError::BadCredentials(
            description.unwrap_or_else(|| "client credentials were rejected".to_string()),
        ),
        _ => SpotifyError::Api {
            status,
            message: description.unwrap_or_else(|| body.to_string()),
        },
    }
}

/// Accounts service client.
#[derive(Debug, Clone)]
pub struct AccountsApi {
    client: Client,
}

impl Default for AccountsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountsApi {
    /// Create a new accounts client.
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("spotlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Build the authorize URL the user's browser is sent to.
    pub fn authorize_url(
        &self,
        creds: &Credentials,
        oauth: &OAuthConfig,
        state: &str,
    ) -> Result<String> {
        let mut url = Url::parse(ACCOUNTS_BASE_URL)
            .map_err(|e| SpotifyError::UserConsent(format!("bad accounts URL: {e}")))?;
        url.set_path("/authorize");
        url.query_pairs_mut()
            .append_pair("client_id", &creds.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &oauth.redirect_uri)
            .append_pair("state", state)
            .append_pair("scope", &oauth.scope_string());

        Ok(url.to_string())
    }

    /// POST a grant to the token endpoint with HTTP Basic client auth.
    async fn token_request(
        &self,
        creds: &Credentials,
        form: &[(&str, &str)],
    ) -> Result<Token> {
        let url = format!("{ACCOUNTS_BASE_URL}/api/token");
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, creds.basic_header())
            .form(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(token_error(status.as_u16(), &text));
        }

        let body: Value = serde_json::from_str(&text)?;
        Token::from_json(&body)
    }

    /// Obtain an app token via the client-credentials grant.
    pub async fn client_credentials_token(&self, creds: &Credentials) -> Result<Token> {
        self.token_request(creds, &[("grant_type", "client_credentials")])
            .await
    }

    /// Exchange an authorization code for a user token.
    pub async fn exchange_code(
        &self,
        creds: &Credentials,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Token> {
        self.token_request(
            creds,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
        )
        .await
    }

    /// Refresh a user token.
    ///
    /// The endpoint may omit the refresh token from the response, in
    /// which case the one just used stays valid and is carried over.
    pub async fn refresh_token(&self, creds: &Credentials, refresh: &str) -> Result<Token> {
        let mut token = self
            .token_request(
                creds,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh),
                ],
            )
            .await?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh.to_string());
        }

        Ok(token)
    }
}
