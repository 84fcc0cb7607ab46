//! Main entry point for the Honor Roll pipeline
//!
//! One binary, one subcommand per pipeline stage. Configuration and
//! credential failures abort before any state mutation; per-character
//! failures inside a stage are aggregated into the output artifacts and
//! still exit successfully.

use anyhow::Result;
use clap::{Parser, Subcommand};
use honor_roll::api::{build_http_client, request_access_token, HttpCharacterApi};
use honor_roll::config::{ApiCredentials, AppConfig, ForumCredentials};
use honor_roll::directory::{load_characters, load_users, DirectoryParser};
use honor_roll::error::HonorRollError;
use honor_roll::forum::{fetch_users_with_home_page, ForumApi, HttpForumClient};
use honor_roll::output::{artifact_path, ensure_docs_dir, write_pretty_json, write_rating_artifacts};
use honor_roll::rating::{JsonFileStateStore, RatingBuilder, StateStore};
use honor_roll::scan::run_scan;
use honor_roll::utils::current_timestamp;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Honor Roll - Monthly honorable-kills leaderboard builder
#[derive(Parser)]
#[command(
    name = "honor-roll",
    version,
    about = "Monthly honorable-kills leaderboard builder for forum-linked characters",
    long_about = "Honor Roll polls a forum user API for linked character profile URLs, \
                 reads each character's cumulative honorable-kills counter from the game \
                 publisher API, tracks month-over-month deltas in a persisted state file, \
                 and writes the ranked leaderboard as static JSON/JS artifacts."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Artifacts directory override
    #[arg(long, value_name = "DIR", help = "Override the docs artifacts directory")]
    docs_dir: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running a stage")]
    dry_run: bool,

    #[command(subcommand)]
    command: Stage,
}

/// Pipeline stages
#[derive(Subcommand)]
enum Stage {
    /// Walk the forum user API and collect users with home-page links
    FetchUsers,
    /// Parse collected home pages into the character directory
    BuildCharacters,
    /// Build the monthly honorable-kills rating artifacts
    BuildRating,
    /// Scan profile documents for honor-related fields (diagnostic)
    ScanHonor,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if let Some(docs_dir) = &args.docs_dir {
        config.service.docs_dir = docs_dir.clone();
    }

    Ok(config)
}

async fn fetch_users(config: &AppConfig) -> Result<()> {
    let credentials = ForumCredentials::from_env()?;
    if config.forum.base_url.is_empty() {
        return Err(HonorRollError::ConfigurationError {
            message: "Forum API base URL is not configured (FORUM_API_URL)".to_string(),
        }
        .into());
    }

    let http = build_http_client(&config.api, &config.user_agent())?;
    let client = HttpForumClient::new(http, config.forum.base_url.clone(), credentials);

    let docs = &config.service.docs_dir;
    ensure_docs_dir(docs)?;

    let fields = client.users_fields().await?;
    write_pretty_json(&artifact_path(docs, "uapi_users_fields.json"), &fields)?;

    let first_page = client.users_page(1, config.forum.per_page).await?;
    write_pretty_json(&artifact_path(docs, "uapi_users_page1.json"), &first_page)?;

    let (users, stats) = fetch_users_with_home_page(&client, config.forum.per_page).await?;
    write_pretty_json(&artifact_path(docs, "users_with_www.json"), &users)?;
    write_pretty_json(&artifact_path(docs, "uapi_users_stats.json"), &stats)?;

    info!(
        "Users seen: {}, with home page: {}, saved: {}",
        stats.total_users_seen, stats.total_with_home_page_any, stats.total_with_www_saved
    );
    Ok(())
}

fn build_characters(config: &AppConfig) -> Result<()> {
    let docs = &config.service.docs_dir;
    let users = load_users(&artifact_path(docs, "users_with_www.json"))?;

    let parser = DirectoryParser::new()?;
    let directory = parser.build_directory(&users);

    ensure_docs_dir(docs)?;
    write_pretty_json(&artifact_path(docs, "characters.json"), &directory)?;

    info!("{} character links parsed", directory.len());
    Ok(())
}

async fn build_rating(config: &AppConfig) -> Result<()> {
    let credentials = ApiCredentials::from_env()?;

    let docs = &config.service.docs_dir;
    ensure_docs_dir(docs)?;

    let characters = load_characters(&artifact_path(docs, "characters.json"))?;

    let store = JsonFileStateStore::new(artifact_path(docs, "rating_state.json"));
    let mut state = store.load()?;

    let http = build_http_client(&config.api, &config.user_agent())?;
    let token = request_access_token(&http, &config.api.token_url, &credentials).await?;
    let api = HttpCharacterApi::new(http, config.api.clone(), token);

    let builder = RatingBuilder::new(Arc::new(api), config.rating.clone());
    let report = builder.run(&characters, &mut state, current_timestamp()).await;

    store.save(&state)?;
    write_rating_artifacts(docs, &report)?;

    info!(
        "OK: {} rows, {} errors, state entries: {}",
        report.count,
        report.errors.len(),
        state.len()
    );
    Ok(())
}

async fn scan_honor(config: &AppConfig) -> Result<()> {
    let credentials = ApiCredentials::from_env()?;

    let docs = &config.service.docs_dir;
    ensure_docs_dir(docs)?;

    let characters = load_characters(&artifact_path(docs, "characters.json"))?;

    let http = build_http_client(&config.api, &config.user_agent())?;
    let token = request_access_token(&http, &config.api.token_url, &credentials).await?;
    let api = HttpCharacterApi::new(http, config.api.clone(), token);

    let records = run_scan(&api, &characters, 500).await;
    write_pretty_json(&artifact_path(docs, "honor_debug.json"), &records)?;

    info!("OK: wrote honor_debug.json for {} characters", records.len());
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        info!("   Docs dir: {}", config.service.docs_dir.display());
        info!("   Max level: {}", config.rating.max_level);
        info!("Dry run completed - exiting without running a stage");
        return;
    }

    let outcome = match args.command {
        Stage::FetchUsers => fetch_users(&config).await,
        Stage::BuildCharacters => build_characters(&config),
        Stage::BuildRating => build_rating(&config).await,
        Stage::ScanHonor => scan_honor(&config).await,
    };

    if let Err(e) = outcome {
        error!("Stage failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
