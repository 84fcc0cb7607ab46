//! Character directory loader
//!
//! Parses character profile URLs embedded in free-text user home-page fields
//! into `(region, realm, name)` triples and derives the canonical character
//! base URL. Percent-encoded home pages are rejected outright.

use crate::error::{HonorRollError, Result};
use crate::types::{CharacterIdentity, UserRecord};
use anyhow::Context;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// `(region, realm, name)` extracted from a profile URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterLocation {
    pub region: String,
    pub realm: String,
    pub name: String,
}

/// URL-shape parser for the fixed character profile pattern
pub struct DirectoryParser {
    character_url_re: Regex,
    percent_escape_re: Regex,
    pvp_suffix_re: Regex,
}

impl DirectoryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            character_url_re: Regex::new(
                r"(?i)^https?://worldofwarcraft\.blizzard\.com/(?:[a-z]{2}-[a-z]{2}/)?character/([^/]+)/([^/]+)/([^/?#]+)",
            )
            .context("character URL pattern")?,
            percent_escape_re: Regex::new(r"%[0-9A-Fa-f]{2}").context("percent escape pattern")?,
            pvp_suffix_re: Regex::new(r"(?i)/(pvp)(/.*)?$").context("pvp suffix pattern")?,
        })
    }

    /// True when the home page contains a percent escape and must be rejected
    pub fn has_percent_escape(&self, url: &str) -> bool {
        self.percent_escape_re.is_match(url)
    }

    /// Extract `(region, realm, name)` from a profile URL, if it matches
    ///
    /// A missing scheme is defaulted to `https://` and backslashes are
    /// normalized before matching.
    pub fn parse_character_url(&self, url: &str) -> Option<CharacterLocation> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lowered = trimmed.to_lowercase();
        let mut normalized =
            if lowered.starts_with("http://") || lowered.starts_with("https://") {
                trimmed.to_string()
            } else {
                format!("https://{}", trimmed)
            };
        normalized = normalized.replace('\\', "/");

        let captures = self.character_url_re.captures(&normalized)?;
        Some(CharacterLocation {
            region: captures[1].to_string(),
            realm: captures[2].to_string(),
            name: captures[3].to_string(),
        })
    }

    /// Canonical character base URL: trailing slash and `/pvp` segment stripped
    pub fn character_base_url(&self, home_page: &str) -> String {
        let base = home_page.trim_end_matches('/');
        self.pvp_suffix_re.replace(base, "").into_owned()
    }

    /// Build the character directory out of the collected forum users
    ///
    /// Users with an empty, percent-encoded, or unparseable home page are
    /// skipped silently, exactly as the consumer expects.
    pub fn build_directory(&self, users: &[UserRecord]) -> Vec<CharacterIdentity> {
        let mut out = Vec::new();

        for user in users {
            let home_page = user.home_page.trim();
            if home_page.is_empty() {
                continue;
            }
            if self.has_percent_escape(home_page) {
                debug!("Skipping {}: percent-encoded home page", user.user);
                continue;
            }
            let location = match self.parse_character_url(home_page) {
                Some(location) => location,
                None => continue,
            };

            let base = self.character_base_url(home_page);
            out.push(CharacterIdentity {
                uid: user.uid,
                user: user.user.clone(),
                skype: user.skype.clone(),
                region: location.region,
                realm: location.realm,
                name: location.name,
                pvp_url: format!("{}/pvp", base),
                char_url: base,
            });
        }

        out
    }
}

/// Load the character directory artifact; missing, invalid, or empty is fatal
pub fn load_characters(path: &Path) -> Result<Vec<CharacterIdentity>> {
    let raw = std::fs::read_to_string(path).map_err(|_| HonorRollError::EmptyDirectory {
        path: path.display().to_string(),
    })?;

    let characters: Vec<CharacterIdentity> =
        serde_json::from_str(&raw).map_err(|_| HonorRollError::EmptyDirectory {
            path: path.display().to_string(),
        })?;

    if characters.is_empty() {
        return Err(HonorRollError::EmptyDirectory {
            path: path.display().to_string(),
        }
        .into());
    }

    info!("Loaded {} characters from {}", characters.len(), path.display());
    Ok(characters)
}

/// Load the collected forum users artifact
pub fn load_users(path: &Path) -> Result<Vec<UserRecord>> {
    let raw = std::fs::read_to_string(path).map_err(|_| HonorRollError::ConfigurationError {
        message: format!("Missing {}", path.display()),
    })?;

    let users: Vec<UserRecord> =
        serde_json::from_str(&raw).map_err(|_| HonorRollError::ConfigurationError {
            message: format!("Bad JSON in {}", path.display()),
        })?;

    Ok(users)
}
