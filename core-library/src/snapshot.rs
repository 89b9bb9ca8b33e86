//! Export/import of the whole catalog as a single JSON document.

use crate::error::{LibraryError, Result};
use crate::models::{decode_records, MediaRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub media: Vec<MediaRecord>,
    #[serde(rename = "exportDate")]
    pub export_date: String,
    pub version: String,
}

impl CatalogSnapshot {
    pub fn new(media: Vec<MediaRecord>, exported_at: DateTime<Utc>) -> Self {
        Self {
            media,
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download name, e.g. `media-catalog-2025-03-14.json`.
    pub fn file_name(exported_at: DateTime<Utc>) -> String {
        format!("media-catalog-{}.json", exported_at.format("%Y-%m-%d"))
    }

    /// Parse an exported document and return its records.
    ///
    /// The document must carry a `media` array; malformed entries inside it
    /// are skipped. Version and export date are informational only.
    pub fn parse_records(json: &str) -> Result<Vec<MediaRecord>> {
        let document: Value = serde_json::from_str(json)?;
        match document.get("media") {
            Some(Value::Array(items)) => Ok(decode_records(items.clone())),
            _ => Err(LibraryError::invalid(
                "media",
                "Snapshot must contain a `media` array",
            )),
        }
    }
}
