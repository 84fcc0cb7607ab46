//! Diagnostic honor-field scan
//!
//! Walks raw profile documents looking for numeric fields whose names look
//! honor-related, so a schema change upstream can be spotted without guessing.
//! The walk is a generic traversal over the self-describing JSON value type;
//! no schema is assumed.

use crate::api::{CharacterApi, ProfileDocument};
use crate::types::CharacterIdentity;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One honor-looking numeric field found in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HonorCandidate {
    /// Dotted path from the document root
    pub path: String,
    pub value: i64,
}

/// Per-endpoint HTTP outcome recorded alongside the candidates
#[derive(Debug, Clone, Serialize)]
pub struct ScanEndpoint {
    pub status: u16,
    pub ok: bool,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_sample: Option<String>,
}

/// Character identification echoed into the scan artifact
#[derive(Debug, Clone, Serialize)]
pub struct ScanTarget {
    pub region: String,
    pub realm: String,
    pub name: String,
}

/// Scan result for one character
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub uid: u64,
    pub user: String,
    #[serde(rename = "char")]
    pub target: ScanTarget,
    pub http: BTreeMap<String, ScanEndpoint>,
    pub honor_candidates: BTreeMap<String, Vec<HonorCandidate>>,
}

/// True for keys that look like an honorable-kills counter
fn key_matches_honor(key: &str) -> bool {
    let lowered = key.to_lowercase();
    (lowered.contains("honor") && lowered.contains("kill")) || lowered.contains("honorable")
}

/// Numeric reading of a JSON leaf, if it has one
fn numeric_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn walk(node: &Value, path: &str, found: &mut Vec<HonorCandidate>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                if key_matches_honor(key) {
                    if let Some(value) = numeric_value(child) {
                        found.push(HonorCandidate {
                            path: child_path.clone(),
                            value,
                        });
                    }
                }
                walk(child, &child_path, found);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_path = if path.is_empty() {
                    index.to_string()
                } else {
                    format!("{}.{}", path, index)
                };
                walk(child, &child_path, found);
            }
        }
        _ => {}
    }
}

/// Collect every honor-looking numeric field in a document
pub fn find_honor_candidates(document: &Value) -> Vec<HonorCandidate> {
    let mut found = Vec::new();
    walk(document, "", &mut found);
    found
}

/// Fetch and scan both diagnostic documents for every character
pub async fn run_scan(
    api: &dyn CharacterApi,
    characters: &[CharacterIdentity],
    sample_chars: usize,
) -> Vec<ScanRecord> {
    let documents = [
        ("pvp_summary", ProfileDocument::PvpSummary),
        ("statistics", ProfileDocument::Statistics),
    ];

    let mut records = Vec::with_capacity(characters.len());

    for identity in characters {
        let mut record = ScanRecord {
            uid: identity.uid,
            user: identity.user.clone(),
            target: ScanTarget {
                region: identity.region.clone(),
                realm: identity.realm.clone(),
                name: identity.name.clone(),
            },
            http: BTreeMap::new(),
            honor_candidates: BTreeMap::new(),
        };

        for (label, document) in documents {
            match api.profile_document(identity, document).await {
                Ok(fetch) => {
                    let decoded = fetch.value.is_some();
                    record.http.insert(
                        label.to_string(),
                        ScanEndpoint {
                            status: fetch.status,
                            ok: fetch.status == 200,
                            url: fetch.url,
                            raw_sample: if decoded {
                                None
                            } else {
                                Some(crate::utils::truncate_sample(&fetch.raw_body, sample_chars))
                            },
                        },
                    );
                    if let Some(value) = fetch.value {
                        let candidates = find_honor_candidates(&value);
                        if !candidates.is_empty() {
                            record.honor_candidates.insert(label.to_string(), candidates);
                        }
                    }
                }
                Err(failure) => {
                    warn!(
                        "{} {} fetch failed: status {}",
                        identity.label(),
                        label,
                        failure.status
                    );
                    record.http.insert(
                        label.to_string(),
                        ScanEndpoint {
                            status: failure.status,
                            ok: false,
                            url: String::new(),
                            raw_sample: Some(crate::utils::truncate_sample(
                                &failure.raw_body,
                                sample_chars,
                            )),
                        },
                    );
                }
            }
        }

        records.push(record);
    }

    info!("Scanned {} characters for honor fields", records.len());
    records
}
