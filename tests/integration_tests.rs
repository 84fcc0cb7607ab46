//! Integration tests for the honor-roll pipeline
//!
//! These tests validate the rating run end to end: reading acquisition
//! through the scripted API, stateful delta computation, per-character
//! failure isolation, ranking, and artifact output.

// Modules for organizing tests
mod fixtures;

use chrono::{TimeZone, Utc};
use honor_roll::config::RatingSettings;
use honor_roll::rating::{CharacterMonthState, RatingBuilder, RatingState};
use honor_roll::types::ErrorStage;
use std::sync::Arc;

use fixtures::{test_identity, test_key, ScriptedCharacterApi};

fn run_time() -> chrono::DateTime<Utc> {
    // Mid-January run; month key 2024-01.
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn settings() -> RatingSettings {
    RatingSettings::default()
}

#[tokio::test]
async fn test_end_to_end_three_characters() {
    // A: first observation. B: existing state. C: PvP endpoint down.
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("alpha"), 20)
        .with_pvp(&test_key("alpha"), 500)
        .with_summary(&test_key("bravo"), 19)
        .with_pvp(&test_key("bravo"), 320)
        .with_summary(&test_key("charlie"), 20)
        .with_pvp_failure(&test_key("charlie"), 503, "<html>unavailable</html>");

    let characters = vec![
        test_identity(1, "anna", "alpha"),
        test_identity(2, "boris", "bravo"),
        test_identity(3, "clara", "charlie"),
    ];

    let mut state = RatingState::new();
    state.insert(
        test_key("bravo"),
        CharacterMonthState {
            month: "2024-01".to_string(),
            month_start: 200,
            last: 300,
            prev_month: None,
            prev_month_kills: None,
        },
    );

    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder.run(&characters, &mut state, run_time()).await;

    assert_eq!(report.month, "2024-01");
    assert_eq!(report.count, 2);
    assert_eq!(report.count_all_chars, 3);
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.errors.len(), 1);

    // B leads with a scored delta; A's first observation scores zero.
    assert_eq!(report.rows[0].name, "bravo");
    assert_eq!(report.rows[0].honorable_kills_month, 120);
    assert_eq!(report.rows[0].honorable_kills_total, 320);
    assert_eq!(report.rows[1].name, "alpha");
    assert_eq!(report.rows[1].honorable_kills_month, 0);
    assert_eq!(report.rows[1].honorable_kills_total, 500);

    // C appears only in errors.
    let error = &report.errors[0];
    assert_eq!(error.uid, 3);
    assert_eq!(error.stage, ErrorStage::PvpSummary);
    assert_eq!(error.status, 503);
    assert!(error.raw_sample.contains("unavailable"));
    assert!(!report.rows.iter().any(|r| r.name == "charlie"));

    println!("✅ End-to-end three-character scenario passed");
}

#[tokio::test]
async fn test_api_failure_never_mutates_state() {
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("alpha"), 20)
        .with_pvp_failure(&test_key("alpha"), 500, "boom");

    let prior = CharacterMonthState {
        month: "2024-01".to_string(),
        month_start: 100,
        last: 150,
        prev_month: Some("2023-12".to_string()),
        prev_month_kills: Some(30),
    };

    let mut state = RatingState::new();
    state.insert(test_key("alpha"), prior.clone());

    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder
        .run(&[test_identity(1, "anna", "alpha")], &mut state, run_time())
        .await;

    assert_eq!(report.count, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(state.get(&test_key("alpha")), Some(&prior));

    println!("✅ Failure isolation left state untouched");
}

#[tokio::test]
async fn test_failure_does_not_abort_remaining_characters() {
    let api = ScriptedCharacterApi::new()
        .with_summary_failure(&test_key("alpha"), 404, "not found")
        .with_summary(&test_key("bravo"), 20)
        .with_pvp(&test_key("bravo"), 40);

    let characters = vec![
        test_identity(1, "anna", "alpha"),
        test_identity(2, "boris", "bravo"),
    ];

    let mut state = RatingState::new();
    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder.run(&characters, &mut state, run_time()).await;

    assert_eq!(report.count, 1);
    assert_eq!(report.rows[0].name, "bravo");
    assert_eq!(report.errors[0].stage, ErrorStage::CharacterSummary);
    assert_eq!(report.errors[0].status, 404);
}

#[tokio::test]
async fn test_level_ceiling_excludes_character_and_state() {
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("alpha"), 21)
        .with_pvp(&test_key("alpha"), 999);

    let mut state = RatingState::new();
    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder
        .run(&[test_identity(1, "anna", "alpha")], &mut state, run_time())
        .await;

    assert!(report.rows.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].stage, ErrorStage::LevelFilter);
    assert_eq!(report.errors[0].status, 200);
    assert!(report.errors[0].raw_sample.contains("level 21 > 20"));

    // Skipped, not zero-scored: no state entry was created.
    assert!(state.get(&test_key("alpha")).is_none());
    assert!(state.is_empty());
}

#[tokio::test]
async fn test_over_ceiling_character_skips_pvp_call() {
    let api = Arc::new(ScriptedCharacterApi::new().with_summary(&test_key("alpha"), 60));

    let mut state = RatingState::new();
    let builder = RatingBuilder::new(api.clone(), settings());
    let _ = builder
        .run(&[test_identity(1, "anna", "alpha")], &mut state, run_time())
        .await;

    // The level filter fires before the PvP endpoint is ever touched.
    assert_eq!(api.get_calls(), vec![format!("summary:{}", test_key("alpha"))]);
}

#[tokio::test]
async fn test_missing_level_recorded_as_validation_error() {
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("alpha"), 0)
        .with_pvp(&test_key("alpha"), 10);

    let mut state = RatingState::new();
    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder
        .run(&[test_identity(1, "anna", "alpha")], &mut state, run_time())
        .await;

    assert!(report.rows.is_empty());
    assert_eq!(report.errors[0].stage, ErrorStage::CharacterSummary);
    assert_eq!(report.errors[0].raw_sample, "Missing or invalid level");
    assert!(state.is_empty());
}

#[tokio::test]
async fn test_month_rollover_in_full_run() {
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("alpha"), 20)
        .with_pvp(&test_key("alpha"), 160);

    let mut state = RatingState::new();
    state.insert(
        test_key("alpha"),
        CharacterMonthState {
            month: "2023-12".to_string(),
            month_start: 100,
            last: 150,
            prev_month: None,
            prev_month_kills: None,
        },
    );

    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder
        .run(&[test_identity(1, "anna", "alpha")], &mut state, run_time())
        .await;

    let row = &report.rows[0];
    assert_eq!(row.honorable_kills_month, 0);
    assert_eq!(row.honorable_kills_prev_month, 50);
    assert_eq!(row.honorable_kills_total, 160);

    let entry = state.get(&test_key("alpha")).unwrap();
    assert_eq!(entry.month, "2024-01");
    assert_eq!(entry.month_start, 160);
    assert_eq!(entry.prev_month.as_deref(), Some("2023-12"));
    assert_eq!(entry.prev_month_kills, Some(50));

    println!("✅ Month rollover archived the previous month in a full run");
}

#[tokio::test]
async fn test_report_serializes_with_original_field_names() {
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("alpha"), 20)
        .with_pvp_failure(&test_key("alpha"), 503, "down");

    let mut state = RatingState::new();
    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder
        .run(&[test_identity(1, "anna", "alpha")], &mut state, run_time())
        .await;

    let value = serde_json::to_value(&report).unwrap();
    let error = &value["errors"][0];
    assert_eq!(error["where"], "pvp_summary");
    assert_eq!(error["char"], "eu/goldrinn/alpha");
    assert_eq!(value["count_all_chars"], 1);
    assert_eq!(value["max_level"], 20);
}

#[tokio::test]
async fn test_scan_collects_candidates_and_statuses() {
    use honor_roll::api::DocumentFetch;

    let pvp_doc = serde_json::json!({
        "honorable_kills": 1523,
        "pvp_map_statistics": [{"match_statistics": {"honor_kills_won": 12}}]
    });
    let api = ScriptedCharacterApi::new()
        .with_document(
            &test_key("alpha"),
            "pvp_summary",
            DocumentFetch {
                url: "https://eu.api.blizzard.com/profile/wow/character/goldrinn/alpha/pvp-summary"
                    .to_string(),
                status: 200,
                value: Some(pvp_doc.clone()),
                raw_body: pvp_doc.to_string(),
            },
        )
        .with_document(
            &test_key("alpha"),
            "statistics",
            DocumentFetch {
                url: "https://eu.api.blizzard.com/profile/wow/character/goldrinn/alpha/statistics"
                    .to_string(),
                status: 404,
                value: None,
                raw_body: "<html>not found</html>".to_string(),
            },
        );

    let records =
        honor_roll::scan::run_scan(&api, &[test_identity(1, "anna", "alpha")], 500).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert!(record.http["pvp_summary"].ok);
    assert!(!record.http["statistics"].ok);
    assert_eq!(record.http["statistics"].status, 404);
    assert!(record.http["statistics"]
        .raw_sample
        .as_deref()
        .unwrap()
        .contains("not found"));

    let candidates = &record.honor_candidates["pvp_summary"];
    let paths: Vec<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
    assert!(paths.contains(&"honorable_kills"));
    assert!(paths.contains(&"pvp_map_statistics.0.match_statistics.honor_kills_won"));
    assert!(!record.honor_candidates.contains_key("statistics"));

    println!("✅ Scan surfaced honor candidates with per-endpoint statuses");
}

#[tokio::test]
async fn test_artifacts_round_trip_through_disk() {
    let api = ScriptedCharacterApi::new()
        .with_summary(&test_key("тентара"), 20)
        .with_pvp(&test_key("тентара"), 1523);

    let mut state = RatingState::new();
    let builder = RatingBuilder::new(Arc::new(api), settings());
    let report = builder
        .run(
            &[test_identity(9, "мария", "тентара")],
            &mut state,
            run_time(),
        )
        .await;

    let dir = tempfile::tempdir().unwrap();
    honor_roll::output::write_rating_artifacts(dir.path(), &report).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("rating.json")).unwrap();
    assert!(raw.contains("тентара"));

    let restored: honor_roll::types::RatingReport = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored.rows[0].honorable_kills_total, 1523);

    let js = std::fs::read_to_string(dir.path().join("rating_data.js")).unwrap();
    assert!(js.starts_with("window.HONOR_ROLL_RATING = "));

    println!("✅ Artifacts round-tripped with Unicode intact");
}
