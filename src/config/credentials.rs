//! Credential loading for the upstream APIs
//!
//! Credentials are read from the environment exactly once at process start and
//! passed into the collaborators that need them; business logic never touches
//! the environment directly.

use crate::error::{HonorRollError, Result};
use std::env;

/// Read a required credential variable, trimming surrounding whitespace
fn need_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(HonorRollError::MissingCredential {
            name: name.to_string(),
        }
        .into()),
    }
}

/// OAuth2 client credentials for the game publisher API
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ApiCredentials {
    /// Load from `BLIZZARD_CLIENT_ID` / `BLIZZARD_CLIENT_SECRET`
    ///
    /// Absence of either variable is a fatal startup error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: need_env("BLIZZARD_CLIENT_ID")?,
            client_secret: need_env("BLIZZARD_CLIENT_SECRET")?,
        })
    }
}

/// OAuth 1.0 credentials for the forum user API
#[derive(Debug, Clone)]
pub struct ForumCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl ForumCredentials {
    /// Load from the four `UCOZ_*` variables; only the fetch-users stage needs these
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            consumer_key: need_env("UCOZ_CONSUMER_KEY")?,
            consumer_secret: need_env("UCOZ_CONSUMER_SECRET")?,
            token: need_env("UCOZ_TOKEN")?,
            token_secret: need_env("UCOZ_TOKEN_SECRET")?,
        })
    }
}
