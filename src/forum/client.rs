//! Signed forum uAPI client
//!
//! The forum platform speaks OAuth 1.0: every GET carries consumer/token
//! parameters plus an HMAC-SHA1 signature over the normalized request. The
//! whole fetch-users stage aborts on any forum API failure, so errors here
//! are fatal rather than per-record.

use crate::config::ForumCredentials;
use crate::error::Result;
use crate::types::UserRecord;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use tracing::debug;

type HmacSha1 = Hmac<Sha1>;

fn default_pages() -> u32 {
    1
}

/// One page of the `/users` listing
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPage {
    /// Total page count reported by the API
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl Default for UsersPage {
    fn default() -> Self {
        Self {
            pages: 1,
            users: Vec::new(),
        }
    }
}

impl UsersPage {
    /// Decode a raw uAPI response; non-object bodies yield an empty page
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Trait for the forum user API
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Fetch the user-field catalog (diagnostic artifact)
    async fn users_fields(&self) -> Result<serde_json::Value>;

    /// Fetch one page of the user listing
    async fn users_page(&self, page: u32, per_page: u32) -> Result<serde_json::Value>;
}

/// RFC 3986 percent-encoding as OAuth 1.0 requires it
fn rfc3986_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Normalized signature base string: `METHOD&enc(url)&enc(sorted k=v pairs)`
fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (rfc3986_encode(k), rfc3986_encode(v)))
        .collect();
    encoded.sort();

    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method,
        rfc3986_encode(url),
        rfc3986_encode(&joined)
    )
}

/// HMAC-SHA1 signature over the base string, base64-rendered
fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!(
        "{}&{}",
        rfc3986_encode(consumer_secret),
        rfc3986_encode(token_secret)
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| anyhow!("HMAC key error: {}", e))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// reqwest-backed uAPI client
pub struct HttpForumClient {
    client: reqwest::Client,
    base_url: String,
    credentials: ForumCredentials,
}

impl HttpForumClient {
    pub fn new(client: reqwest::Client, base_url: String, credentials: ForumCredentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// All request parameters including the computed `oauth_signature`
    fn signed_params(
        &self,
        url: &str,
        extra: &[(String, String)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<Vec<(String, String)>> {
        let mut params: Vec<(String, String)> = vec![
            (
                "oauth_consumer_key".to_string(),
                self.credentials.consumer_key.clone(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.credentials.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];
        params.extend_from_slice(extra);

        let base = signature_base_string("GET", url, &params);
        let signature = sign(
            &base,
            &self.credentials.consumer_secret,
            &self.credentials.token_secret,
        )?;
        params.push(("oauth_signature".to_string(), signature));
        Ok(params)
    }

    async fn get(&self, path: &str, extra: &[(String, String)]) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = crate::utils::current_timestamp().timestamp();
        let params = self.signed_params(&url, extra, &nonce, timestamp)?;

        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Forum API request to {} failed", path))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Forum API response from {} unreadable", path))?;

        if status != 200 {
            return Err(anyhow!(
                "Forum API {} returned status {}: {}",
                path,
                status,
                crate::utils::truncate_sample(&body, 200)
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Forum API response from {} is not JSON", path))
    }
}

#[async_trait]
impl ForumApi for HttpForumClient {
    async fn users_fields(&self) -> Result<serde_json::Value> {
        self.get("/users/fields", &[]).await
    }

    async fn users_page(&self, page: u32, per_page: u32) -> Result<serde_json::Value> {
        self.get(
            "/users",
            &[
                ("page".to_string(), page.to_string()),
                ("per_page".to_string(), per_page.to_string()),
            ],
        )
        .await
    }
}
