//! Honor Roll - monthly honorable-kills leaderboard builder
//!
//! This crate polls a forum user API and a game publisher character API on a
//! schedule, derives a monthly honorable-kills leaderboard for forum users
//! with linked characters, and persists the result as static JSON/JS
//! artifacts for a website to consume.

pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod forum;
pub mod output;
pub mod rating;
pub mod scan;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{HonorRollError, Result};
pub use types::*;

// Re-export key components
pub use rating::builder::RatingBuilder;
pub use rating::engine::{CharacterMonthState, RatingState};
pub use rating::storage::{JsonFileStateStore, StateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
