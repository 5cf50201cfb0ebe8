//! Loading and validating browsing exports
//!
//! ```text
//! file → exists? → .json? → read → parse → (repair) → schema check → BrowsingRecord
//! ```
//!
//! Repair only runs when some key carries leading or trailing whitespace. The
//! original bytes are always backed up to `<name>.json.bak` before anything
//! else happens.

use crate::config::RepairMode;
use crate::error::DigestError;
use crate::normalize::{needs_repair, normalize};
use crate::types::{LoadedRecord, RepairReport};
use digest_domain::{BrowsingRecord, PageEntry};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Top-level keys every export must have
pub const REQUIRED_KEYS: [&str; 2] = ["date", "pages"];

/// Extension of the pre-repair backup
pub const BACKUP_EXTENSION: &str = "json.bak";

/// Date shown when the export's date is null
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Loads browsing exports from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    repair_mode: RepairMode,
}

impl Loader {
    /// Create a loader with the given repair behavior
    pub fn new(repair_mode: RepairMode) -> Self {
        Self { repair_mode }
    }

    /// Load, repair if needed, and validate an export file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedRecord, DigestError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(DigestError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        if !extension.eq_ignore_ascii_case(".json") {
            return Err(DigestError::Format {
                path: path.to_path_buf(),
                extension,
            });
        }

        let raw = fs::read(path).map_err(|source| DigestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from {}", raw.len(), path.display());

        let mut value: Value = serde_json::from_slice(&raw).map_err(|source| DigestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut repair = None;
        if needs_repair(&value) {
            warn!("Malformed JSON detected in {}, repairing keys/values", path.display());
            let repaired = normalize(&value);
            repair = Some(self.repair(path, &repaired)?);
            value = repaired;
        }

        let record = validate(&value)?;
        info!(
            "Loaded {} pages for {} from {}",
            record.pages.len(),
            record.date,
            path.display()
        );

        Ok(LoadedRecord { record, repair })
    }

    /// Back up the original bytes, then write `repaired` over the input if configured to
    fn repair(&self, path: &Path, repaired: &Value) -> Result<RepairReport, DigestError> {
        let backup_path = backup_path(path);
        fs::copy(path, &backup_path).map_err(|source| DigestError::Write {
            path: backup_path.clone(),
            source,
        })?;
        info!("Original saved as {}", backup_path.display());

        let rewritten_path = match self.repair_mode {
            RepairMode::InPlace => {
                let bytes = serde_json::to_vec_pretty(repaired).map_err(|e| {
                    DigestError::Write {
                        path: path.to_path_buf(),
                        source: io::Error::new(io::ErrorKind::InvalidData, e),
                    }
                })?;
                fs::write(path, bytes).map_err(|source| DigestError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("Repaired JSON saved to {}", path.display());
                Some(path.to_path_buf())
            }
            RepairMode::InMemory => None,
        };

        Ok(RepairReport {
            backup_path,
            rewritten_path,
        })
    }
}

/// Load an export with the default (in-place) repair behavior
pub fn load(path: impl AsRef<Path>) -> Result<BrowsingRecord, DigestError> {
    Loader::default().load(path).map(|loaded| loaded.record)
}

/// Sibling backup path: `export.json` → `export.json.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension(BACKUP_EXTENSION)
}

/// Check the required schema and build a [`BrowsingRecord`]
pub fn validate(value: &Value) -> Result<BrowsingRecord, DigestError> {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);

    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        let mut found: Vec<String> = object.keys().cloned().collect();
        found.sort();
        return Err(DigestError::Schema { missing, found });
    }

    let pages = match &object["pages"] {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(page_from_json(fields)),
                other => Err(DigestError::FieldType {
                    field: format!("pages[{}]", index),
                    expected: "an object",
                    found: json_type(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(DigestError::FieldType {
                field: "pages".to_string(),
                expected: "an array",
                found: json_type(other),
            })
        }
    };

    Ok(BrowsingRecord {
        date: text_field(object, "date").unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        pages,
        total_pages: object.get("totalPages").and_then(Value::as_u64),
    })
}

fn page_from_json(fields: &Map<String, Value>) -> PageEntry {
    PageEntry {
        title: text_field(fields, "title"),
        domain: text_field(fields, "domain"),
        content: fields.get("content").and_then(Value::as_str).map(str::to_string),
        timestamp: fields.get("timestamp").and_then(Value::as_str).map(str::to_string),
        reading_time: fields.get("readingTime").and_then(Value::as_f64),
    }
}

/// String fields as-is, other non-null values as their JSON text
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
