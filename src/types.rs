//! Common types used throughout the leaderboard pipeline

use serde::{Deserialize, Serialize};

/// Lowercase `region|realm|name` key for a character
pub type CharacterKey = String;

/// One forum user as collected from the forum user API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub uid: u64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub group_id: u64,
    #[serde(default)]
    pub home_page: String,
    #[serde(default)]
    pub skype: String,
}

/// One linked game character, produced once per run by the directory loader
///
/// Immutable within a run. Keyed by `(region, realm, name)` case-folded
/// to lowercase, see [`crate::utils::character_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterIdentity {
    #[serde(default)]
    pub uid: u64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub skype: String,
    pub region: String,
    pub realm: String,
    pub name: String,
    #[serde(default)]
    pub char_url: String,
    #[serde(default)]
    pub pvp_url: String,
}

impl CharacterIdentity {
    /// `region/realm/name` label used in error records and logs
    pub fn label(&self) -> String {
        format!("{}/{}/{}", self.region, self.realm, self.name)
    }
}

/// Transient per-run reading for one character; not persisted
#[derive(Debug, Clone)]
pub struct CharacterReading {
    pub identity: CharacterIdentity,
    pub level: u32,
    pub honor_total: u64,
}

/// Pipeline stage that produced a per-character error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStage {
    CharacterSummary,
    PvpSummary,
    LevelFilter,
}

impl std::fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorStage::CharacterSummary => write!(f, "character_summary"),
            ErrorStage::PvpSummary => write!(f, "pvp_summary"),
            ErrorStage::LevelFilter => write!(f, "level_filter"),
        }
    }
}

/// One recovered per-character failure, aggregated into the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub user: String,
    pub uid: u64,
    /// `region/realm/name` of the affected character
    #[serde(rename = "char")]
    pub character: String,
    /// HTTP status of the failing request (0 for transport failures)
    pub status: u16,
    #[serde(rename = "where")]
    pub stage: ErrorStage,
    /// Truncated raw body or diagnostic text
    pub raw_sample: String,
}

/// One ranked character's output record for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRow {
    pub uid: u64,
    pub user: String,
    pub skype: String,
    pub char_url: String,
    pub pvp_url: String,
    pub region: String,
    pub realm: String,
    pub name: String,
    pub level: u32,
    pub honorable_kills_total: u64,
    pub honorable_kills_month: u64,
    pub honorable_kills_prev_month: u64,
}

/// The complete report written to `rating.json` / `rating_data.js`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingReport {
    /// `YYYY-MM` month the run was scored against
    pub month: String,
    pub updated_utc: String,
    /// Number of successfully ranked characters
    pub count: usize,
    /// Number of characters in the input directory
    pub count_all_chars: usize,
    pub max_level: u32,
    pub rows: Vec<RatingRow>,
    pub errors: Vec<ErrorRecord>,
}

/// Collection statistics emitted by the forum user walk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchStats {
    pub total_users_seen: usize,
    pub total_with_home_page_any: usize,
    pub total_with_www_saved: usize,
}
