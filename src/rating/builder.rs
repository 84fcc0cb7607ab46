//! Rating run orchestration
//!
//! Walks the character directory strictly sequentially, acquires one reading
//! per character, feeds readings through the engine, and assembles the ranked
//! report. A failed character contributes an error record and leaves its
//! persisted state untouched; processing always continues with the next one.

use crate::api::{CharacterApi, FetchFailure};
use crate::config::RatingSettings;
use crate::rating::engine::RatingState;
use crate::rating::report::build_report;
use crate::types::{
    CharacterIdentity, CharacterReading, ErrorRecord, ErrorStage, RatingReport, RatingRow,
};
use crate::utils::{character_key, month_key, truncate_sample};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds one rating report per invocation
pub struct RatingBuilder {
    api: Arc<dyn CharacterApi>,
    settings: RatingSettings,
}

impl RatingBuilder {
    pub fn new(api: Arc<dyn CharacterApi>, settings: RatingSettings) -> Self {
        Self { api, settings }
    }

    /// Run the full rating pass for `now`, mutating `state` in place
    ///
    /// Per-character failures are aggregated into the report; this method
    /// itself cannot fail.
    pub async fn run(
        &self,
        characters: &[CharacterIdentity],
        state: &mut RatingState,
        now: DateTime<Utc>,
    ) -> RatingReport {
        let month = month_key(now);
        info!(
            "Building rating for {} over {} characters",
            month,
            characters.len()
        );

        let mut rows: Vec<RatingRow> = Vec::new();
        let mut errors: Vec<ErrorRecord> = Vec::new();

        for identity in characters {
            match self.acquire_reading(identity).await {
                Ok(reading) => {
                    let key = character_key(&reading.identity.region, &reading.identity.realm, &reading.identity.name);
                    let observation = state.observe(&key, &month, reading.honor_total);

                    debug!(
                        "{}: total {} month {} prev {}",
                        reading.identity.label(),
                        reading.honor_total,
                        observation.month_delta,
                        observation.prev_month_kills
                    );

                    rows.push(RatingRow {
                        uid: reading.identity.uid,
                        user: reading.identity.user.clone(),
                        skype: reading.identity.skype.clone(),
                        char_url: reading.identity.char_url.clone(),
                        pvp_url: reading.identity.pvp_url.clone(),
                        region: reading.identity.region.clone(),
                        realm: reading.identity.realm.clone(),
                        name: reading.identity.name.clone(),
                        level: reading.level,
                        honorable_kills_total: reading.honor_total,
                        honorable_kills_month: observation.month_delta,
                        honorable_kills_prev_month: observation.prev_month_kills,
                    });
                }
                Err(record) => {
                    warn!(
                        "{} skipped at {}: status {}",
                        record.character, record.stage, record.status
                    );
                    errors.push(record);
                }
            }
        }

        build_report(
            month,
            now,
            rows,
            errors,
            characters.len(),
            self.settings.max_level,
        )
    }

    /// Fetch and validate one character's reading
    ///
    /// Both API calls and the level checks happen here, before any state is
    /// touched, so a failure cannot leave a partial update behind.
    async fn acquire_reading(
        &self,
        identity: &CharacterIdentity,
    ) -> std::result::Result<CharacterReading, ErrorRecord> {
        let summary = self
            .api
            .character_summary(identity)
            .await
            .map_err(|failure| self.fetch_error(identity, ErrorStage::CharacterSummary, failure))?;

        if summary.level == 0 {
            return Err(self.validation_error(
                identity,
                ErrorStage::CharacterSummary,
                "Missing or invalid level".to_string(),
            ));
        }

        if summary.level > self.settings.max_level {
            return Err(self.validation_error(
                identity,
                ErrorStage::LevelFilter,
                format!(
                    "Skipped: level {} > {}",
                    summary.level, self.settings.max_level
                ),
            ));
        }

        let pvp = self
            .api
            .pvp_summary(identity)
            .await
            .map_err(|failure| self.fetch_error(identity, ErrorStage::PvpSummary, failure))?;

        Ok(CharacterReading {
            identity: identity.clone(),
            level: summary.level,
            honor_total: pvp.honorable_kills,
        })
    }

    fn fetch_error(
        &self,
        identity: &CharacterIdentity,
        stage: ErrorStage,
        failure: FetchFailure,
    ) -> ErrorRecord {
        ErrorRecord {
            user: identity.user.clone(),
            uid: identity.uid,
            character: identity.label(),
            status: failure.status,
            stage,
            raw_sample: truncate_sample(&failure.raw_body, self.settings.raw_sample_chars),
        }
    }

    fn validation_error(
        &self,
        identity: &CharacterIdentity,
        stage: ErrorStage,
        message: String,
    ) -> ErrorRecord {
        ErrorRecord {
            user: identity.user.clone(),
            uid: identity.uid,
            character: identity.label(),
            status: 200,
            stage,
            raw_sample: message,
        }
    }
}
