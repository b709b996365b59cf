//! Local consent listener.
//!
//! The user-consent flow sends the browser to the authorize page, which
//! redirects back to a loopback address with the authorization code.
//! A short-lived HTTP server on that address captures the redirect's
//! query parameters; the handler does nothing else, so verification and
//! the code exchange stay outside the request path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::response::Html;
use axum::routing::get;
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::OAuthConfig;
use crate::error::{Result, SpotifyError};

/// Page served after a successful redirect.
const CONSENT_OK_PAGE: &str = "<!DOCTYPE html>\
<html>\
<head><meta charset=\"utf-8\"><title>Authorization complete</title></head>\
<body style=\"font-family: sans-serif; text-align: center; margin-top: 4rem;\">\
<h1>Authorization complete</h1>\
<p>You can close this window and return to your application.</p>\
</body>\
</html>";

/// Page served when the redirect reports an error.
const CONSENT_DENIED_PAGE: &str = "<!DOCTYPE html>\
<html>\
<head><meta charset=\"utf-8\"><title>Authorization failed</title></head>\
<body style=\"font-family: sans-serif; text-align: center; margin-top: 4rem;\">\
<h1>Authorization failed</h1>\
<p>You can close this window. The application was not granted access.</p>\
</body>\
</html>";

/// The captured redirect parameters, shared with the route handler.
type Captured = Arc<Mutex<Option<HashMap<String, String>>>>;

/// Callback route handler: record the query parameters, tell the user
/// to close the window. The first redirect wins.
async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(captured): Extension<Captured>,
) -> Html<&'static str> {
    debug!("Consent callback received");

    let page = if params.contains_key("error") {
        CONSENT_DENIED_PAGE
    } else {
        CONSENT_OK_PAGE
    };

    let mut slot = captured.lock().await;
    if slot.is_none() {
        *slot = Some(params);
    }

    Html(page)
}

/// Check the captured parameters against the expected state and pull
/// out the authorization code.
fn verify_callback(params: &HashMap<String, String>, expected_state: &str) -> Result<String> {
    match params.get("state") {
        Some(state) if state == expected_state => {}
        _ => {
            return Err(SpotifyError::UserConsent(
                "state mismatch in the callback; rejecting the response".to_string(),
            ))
        }
    }

    if let Some(error) = params.get("error") {
        if error == "access_denied" {
            return Err(SpotifyError::UserConsent(
                "the user denied the authorization request".to_string(),
            ));
        }
        return Err(SpotifyError::UserConsent(format!(
            "authorization failed: {error}"
        )));
    }

    params.get("code").cloned().ok_or_else(|| {
        SpotifyError::UserConsent("the callback carried no authorization code".to_string())
    })
}

/// Poll the shared slot until the redirect lands or the timeout passes.
async fn wait_for_callback(
    captured: &Captured,
    timeout_secs: u64,
) -> Result<HashMap<String, String>> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(timeout_secs);

    loop {
        if let Some(params) = captured.lock().await.take() {
            return Ok(params);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(SpotifyError::UserConsent(format!(
                "no authorization response within {timeout_secs}s"
            )));
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}

/// Run the interactive part of the consent flow.
///
/// Binds the listener, opens the browser at `authorize_url`, waits for
/// the redirect and returns the verified authorization code. The code
/// exchange happens in the caller, after the listener is gone.
pub(crate) async fn request_authorization_code(
    oauth: &OAuthConfig,
    authorize_url: &str,
    expected_state: &str,
) -> Result<String> {
    let (addr, path) = oauth.listener_parts()?;
    let captured: Captured = Arc::new(Mutex::new(None));

    let app = Router::new()
        .route(&path, get(callback))
        .layer(Extension(captured.clone()));

    // Bind before opening the browser so the redirect cannot race the
    // listener.
    let listener = TcpListener::bind(&addr).await?;
    debug!("Consent listener bound on {addr}");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!("Consent listener stopped: {e}");
        }
    });

    if webbrowser::open(authorize_url).is_err() {
        warn!("Could not open a browser; authorize manually at {authorize_url}");
    }

    let outcome = wait_for_callback(&captured, oauth.consent_timeout_secs).await;
    server.abort();

    verify_callback(&outcome?, expected_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_verify_accepts_matching_state() {
        let code =
            verify_callback(&params(&[("code", "authcode"), ("state", "xyz")]), "xyz").unwrap();
        assert_eq!(code, "authcode");
    }

    #[test]
    fn test_verify_rejects_state_mismatch() {
        let err = verify_callback(&params(&[("code", "authcode"), ("state", "evil")]), "xyz")
            .unwrap_err();
        assert!(matches!(err, SpotifyError::UserConsent(msg) if msg.contains("state mismatch")));
    }

    #[test]
    fn test_verify_maps_denial() {
        let err = verify_callback(
            &params(&[("error", "access_denied"), ("state", "xyz")]),
            "xyz",
        )
        .unwrap_err();
        assert!(matches!(err, SpotifyError::UserConsent(msg) if msg.contains("denied")));
    }

    #[test]
    fn test_verify_requires_code() {
        let err = verify_callback(&params(&[("state", "xyz")]), "xyz").unwrap_err();
        assert!(matches!(err, SpotifyError::UserConsent(msg) if msg.contains("no authorization code")));
    }

    #[test]
    fn test_callback_captures_first_hit_only() {
        tokio_test::block_on(async {
            let captured: Captured = Arc::new(Mutex::new(None));

            callback(
                Query(params(&[("code", "first"), ("state", "s")])),
                Extension(captured.clone()),
            )
            .await;
            callback(
                Query(params(&[("code", "second"), ("state", "s")])),
                Extension(captured.clone()),
            )
            .await;

            let slot = captured.lock().await;
            let stored = slot.as_ref().unwrap();
            assert_eq!(stored.get("code").map(|s| s.as_str()), Some("first"));
        });
    }

    #[test]
    fn test_denied_callback_serves_failure_page() {
        tokio_test::block_on(async {
            let captured: Captured = Arc::new(Mutex::new(None));

            let Html(page) = callback(
                Query(params(&[("error", "access_denied"), ("state", "s")])),
                Extension(captured.clone()),
            )
            .await;
            assert!(page.contains("Authorization failed"));
        });
    }

    #[test]
    fn test_wait_times_out() {
        tokio_test::block_on(async {
            let captured: Captured = Arc::new(Mutex::new(None));
            let err = wait_for_callback(&captured, 0).await.unwrap_err();
            assert!(matches!(err, SpotifyError::UserConsent(msg) if msg.contains("within 0s")));
        });
    }

    #[test]
    fn test_wait_returns_captured_params() {
        tokio_test::block_on(async {
            let captured: Captured = Arc::new(Mutex::new(None));
            *captured.lock().await = Some(params(&[("code", "c")]));

            let got = wait_for_callback(&captured, 5).await.unwrap();
            assert_eq!(got.get("code").map(|s| s.as_str()), Some("c"));
        });
    }
}
