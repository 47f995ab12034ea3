//! HTTP client for the member portal's login endpoint.
//!
//! The portal authenticates with a JSON POST to `/user/login` and answers
//! a successful login with a session token in the response body. Cookies
//! are enabled on the client because the endpoint participates in the
//! portal's cookie-based request context.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiError;

/// Login endpoint path, relative to the configured server URL.
const LOGIN_PATH: &str = "/user/login";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct LoginRequest<'a> {
    id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Client for the portal's auth endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new auth client for the given server URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Submit credentials and return the session token on success.
    ///
    /// A 200 response without a usable token establishes no session and is
    /// reported as `ApiError::InvalidResponse`.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                id: identifier,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Login response received");

        // reqwest hands back non-2xx responses as Ok, so rejection handling
        // lives here rather than in the transport error path.
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let parsed: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login body: {e}")))?;

        match parsed.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::InvalidResponse(
                "Login response did not contain a session token".to_string(),
            )),
        }
    }
}
