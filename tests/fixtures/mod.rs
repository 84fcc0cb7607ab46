//! Test fixtures and mock implementations for integration testing

use async_trait::async_trait;
use honor_roll::api::{
    CharacterApi, CharacterSummary, DocumentFetch, FetchFailure, ProfileDocument, PvpSummary,
};
use honor_roll::types::CharacterIdentity;
use honor_roll::utils::character_key;
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted character API that serves canned per-character responses
#[derive(Default)]
pub struct ScriptedCharacterApi {
    summaries: HashMap<String, Result<CharacterSummary, FetchFailure>>,
    pvp_summaries: HashMap<String, Result<PvpSummary, FetchFailure>>,
    documents: HashMap<(String, &'static str), DocumentFetch>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCharacterApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, key: &str, level: u32) -> Self {
        self.summaries
            .insert(key.to_string(), Ok(CharacterSummary { level }));
        self
    }

    pub fn with_summary_failure(mut self, key: &str, status: u16, raw_body: &str) -> Self {
        self.summaries.insert(
            key.to_string(),
            Err(FetchFailure {
                status,
                raw_body: raw_body.to_string(),
            }),
        );
        self
    }

    pub fn with_pvp(mut self, key: &str, honorable_kills: u64) -> Self {
        self.pvp_summaries
            .insert(key.to_string(), Ok(PvpSummary { honorable_kills }));
        self
    }

    pub fn with_pvp_failure(mut self, key: &str, status: u16, raw_body: &str) -> Self {
        self.pvp_summaries.insert(
            key.to_string(),
            Err(FetchFailure {
                status,
                raw_body: raw_body.to_string(),
            }),
        );
        self
    }

    pub fn with_document(mut self, key: &str, label: &'static str, fetch: DocumentFetch) -> Self {
        self.documents.insert((key.to_string(), label), fetch);
        self
    }

    /// All `endpoint:key` calls made, in order (for testing)
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, endpoint: &str, key: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}:{}", endpoint, key));
        }
    }

    fn unscripted(key: &str) -> FetchFailure {
        FetchFailure {
            status: 404,
            raw_body: format!("no scripted response for {}", key),
        }
    }
}

#[async_trait]
impl CharacterApi for ScriptedCharacterApi {
    async fn character_summary(
        &self,
        identity: &CharacterIdentity,
    ) -> Result<CharacterSummary, FetchFailure> {
        let key = character_key(&identity.region, &identity.realm, &identity.name);
        self.record("summary", &key);
        self.summaries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(Self::unscripted(&key)))
    }

    async fn pvp_summary(
        &self,
        identity: &CharacterIdentity,
    ) -> Result<PvpSummary, FetchFailure> {
        let key = character_key(&identity.region, &identity.realm, &identity.name);
        self.record("pvp", &key);
        self.pvp_summaries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(Self::unscripted(&key)))
    }

    async fn profile_document(
        &self,
        identity: &CharacterIdentity,
        document: ProfileDocument,
    ) -> Result<DocumentFetch, FetchFailure> {
        let key = character_key(&identity.region, &identity.realm, &identity.name);
        let label = match document {
            ProfileDocument::PvpSummary => "pvp_summary",
            ProfileDocument::Statistics => "statistics",
        };
        self.record(label, &key);
        self.documents
            .get(&(key.clone(), label))
            .cloned()
            .ok_or_else(|| Self::unscripted(&key))
    }
}

/// Build a character identity for tests
pub fn test_identity(uid: u64, user: &str, name: &str) -> CharacterIdentity {
    CharacterIdentity {
        uid,
        user: user.to_string(),
        skype: String::new(),
        region: "eu".to_string(),
        realm: "goldrinn".to_string(),
        name: name.to_string(),
        char_url: format!(
            "https://worldofwarcraft.blizzard.com/character/eu/goldrinn/{}",
            name
        ),
        pvp_url: format!(
            "https://worldofwarcraft.blizzard.com/character/eu/goldrinn/{}/pvp",
            name
        ),
    }
}

/// State key for a test identity created by `test_identity`
pub fn test_key(name: &str) -> String {
    character_key("eu", "goldrinn", name)
}
