//! Per-character profile client
//!
//! One request per character per needed endpoint, region-specific host and
//! namespace substitution, fixed per-request timeout, no retry. A failed or
//! timed-out request fails that character alone, never the run.

use crate::config::ApiSettings;
use crate::error::Result;
use crate::types::CharacterIdentity;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// A single failed fetch: non-200 status, undecodable body, or transport
/// failure (status 0). Carries the raw body for error-record samples.
#[derive(Debug, Clone, thiserror::Error)]
#[error("request failed (status {status})")]
pub struct FetchFailure {
    pub status: u16,
    pub raw_body: String,
}

impl FetchFailure {
    fn transport(message: String) -> Self {
        Self {
            status: 0,
            raw_body: message,
        }
    }
}

/// Character summary; only the level matters to the pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterSummary {
    #[serde(default)]
    pub level: u32,
}

/// PvP summary; the cumulative honorable-kills counter
#[derive(Debug, Clone, Deserialize)]
pub struct PvpSummary {
    #[serde(default)]
    pub honorable_kills: u64,
}

/// Profile documents the diagnostic scan walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileDocument {
    PvpSummary,
    Statistics,
}

impl ProfileDocument {
    /// URL path suffix below the character base path
    pub fn path_suffix(&self) -> &'static str {
        match self {
            ProfileDocument::PvpSummary => "/pvp-summary",
            ProfileDocument::Statistics => "/statistics",
        }
    }
}

/// Raw document fetch for the diagnostic scan
///
/// Unlike the typed fetches, a non-200 status is not an error here: the scan
/// records the status and still walks any decodable body.
#[derive(Debug, Clone)]
pub struct DocumentFetch {
    pub url: String,
    pub status: u16,
    /// Decoded body, when the response was valid JSON
    pub value: Option<serde_json::Value>,
    pub raw_body: String,
}

/// Trait for the per-character profile API
#[async_trait]
pub trait CharacterApi: Send + Sync {
    /// Fetch the character summary (level)
    async fn character_summary(
        &self,
        identity: &CharacterIdentity,
    ) -> std::result::Result<CharacterSummary, FetchFailure>;

    /// Fetch the PvP summary (cumulative honorable-kills counter)
    async fn pvp_summary(
        &self,
        identity: &CharacterIdentity,
    ) -> std::result::Result<PvpSummary, FetchFailure>;

    /// Fetch a raw profile document for the diagnostic scan
    async fn profile_document(
        &self,
        identity: &CharacterIdentity,
        document: ProfileDocument,
    ) -> std::result::Result<DocumentFetch, FetchFailure>;
}

/// Build the shared HTTP client with the pipeline's timeout and user agent
///
/// Both upstream clients reuse this client; the timeout applies per request.
pub fn build_http_client(settings: &ApiSettings, user_agent: &str) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_seconds))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// reqwest-backed implementation against the region-parameterized hosts
pub struct HttpCharacterApi {
    client: reqwest::Client,
    settings: ApiSettings,
    token: String,
}

impl HttpCharacterApi {
    pub fn new(client: reqwest::Client, settings: ApiSettings, token: String) -> Self {
        Self {
            client,
            settings,
            token,
        }
    }

    /// `https://{region}.{suffix}/profile/wow/character/{realm}/{name}{suffix_path}`
    ///
    /// Realm and name are case-folded; the url parser percent-encodes
    /// non-ASCII path characters when the request is built.
    fn profile_url(&self, identity: &CharacterIdentity, path_suffix: &str) -> String {
        let region = identity.region.to_lowercase();
        format!(
            "https://{}.{}/profile/wow/character/{}/{}{}",
            region,
            self.settings.api_host_suffix,
            identity.realm.to_lowercase(),
            identity.name.to_lowercase(),
            path_suffix
        )
    }

    async fn get_raw(
        &self,
        identity: &CharacterIdentity,
        path_suffix: &str,
    ) -> std::result::Result<(String, u16, String), FetchFailure> {
        let url = self.profile_url(identity, path_suffix);
        let namespace = format!("profile-{}", identity.region.to_lowercase());

        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("namespace", namespace.as_str()),
                ("locale", self.settings.locale.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchFailure::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let raw_body = response
            .text()
            .await
            .map_err(|e| FetchFailure::transport(e.to_string()))?;

        Ok((url, status, raw_body))
    }

    /// Decode a 200 response into `T`; anything else is a `FetchFailure`
    fn decode<T: serde::de::DeserializeOwned>(
        status: u16,
        raw_body: String,
    ) -> std::result::Result<T, FetchFailure> {
        if status != 200 {
            return Err(FetchFailure {
                status,
                raw_body,
            });
        }
        serde_json::from_str(&raw_body).map_err(|_| FetchFailure { status, raw_body })
    }
}

#[async_trait]
impl CharacterApi for HttpCharacterApi {
    async fn character_summary(
        &self,
        identity: &CharacterIdentity,
    ) -> std::result::Result<CharacterSummary, FetchFailure> {
        let (_, status, raw_body) = self.get_raw(identity, "").await?;
        Self::decode(status, raw_body)
    }

    async fn pvp_summary(
        &self,
        identity: &CharacterIdentity,
    ) -> std::result::Result<PvpSummary, FetchFailure> {
        let (_, status, raw_body) = self.get_raw(identity, "/pvp-summary").await?;
        Self::decode(status, raw_body)
    }

    async fn profile_document(
        &self,
        identity: &CharacterIdentity,
        document: ProfileDocument,
    ) -> std::result::Result<DocumentFetch, FetchFailure> {
        let (url, status, raw_body) = self.get_raw(identity, document.path_suffix()).await?;
        let value = serde_json::from_str(&raw_body).ok();
        Ok(DocumentFetch {
            url,
            status,
            value,
            raw_body,
        })
    }
}
