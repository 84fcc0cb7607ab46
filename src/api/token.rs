//! OAuth2 client-credentials token exchange
//!
//! One POST against the configured token endpoint at the start of a run.
//! Without a token no rows can be produced, so any failure here is fatal.

use crate::config::ApiCredentials;
use crate::error::{HonorRollError, Result};
use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// Exchange client credentials for a bearer token
pub async fn request_access_token(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &ApiCredentials,
) -> Result<String> {
    debug!("Requesting access token from {}", token_url);

    let response = client
        .post(token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .context("Token request failed to complete")?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .context("Token response body unreadable")?;

    let parsed: Option<TokenResponse> = serde_json::from_str(&body).ok();
    match parsed {
        Some(token) if status == 200 && !token.access_token.is_empty() => Ok(token.access_token),
        _ => Err(HonorRollError::AuthenticationFailed {
            status,
            body: crate::utils::truncate_sample(&body, 200),
        }
        .into()),
    }
}
