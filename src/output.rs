//! Static artifact output
//!
//! All pipeline results are batch-written JSON files under the docs
//! directory, plus a JS wrapper for direct inclusion in a static page.
//! serde_json leaves non-ASCII text unescaped, so the artifacts stay
//! readable for the Cyrillic names they carry.

use crate::error::{HonorRollError, Result};
use crate::types::RatingReport;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Global assigned in `rating_data.js` for the static page to read
pub const RATING_GLOBAL: &str = "window.HONOR_ROLL_RATING";

/// Create the docs directory if it does not exist yet
pub fn ensure_docs_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        HonorRollError::ArtifactWriteError {
            path: dir.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Write a pretty-printed JSON artifact
pub fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|e| HonorRollError::ArtifactWriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    std::fs::write(path, rendered).map_err(|e| HonorRollError::ArtifactWriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    info!("Wrote {}", path.display());
    Ok(())
}

/// Write `rating.json` and the `rating_data.js` wrapper
pub fn write_rating_artifacts(docs_dir: &Path, report: &RatingReport) -> Result<()> {
    write_pretty_json(&docs_dir.join("rating.json"), report)?;

    let compact =
        serde_json::to_string(report).map_err(|e| HonorRollError::ArtifactWriteError {
            path: "rating_data.js".to_string(),
            message: e.to_string(),
        })?;
    let js = format!("{} = {};\n", RATING_GLOBAL, compact);

    let js_path = docs_dir.join("rating_data.js");
    std::fs::write(&js_path, js).map_err(|e| HonorRollError::ArtifactWriteError {
        path: js_path.display().to_string(),
        message: e.to_string(),
    })?;

    info!("Wrote {}", js_path.display());
    Ok(())
}

/// Well-known artifact paths under the docs directory
pub fn artifact_path(docs_dir: &Path, name: &str) -> PathBuf {
    docs_dir.join(name)
}
