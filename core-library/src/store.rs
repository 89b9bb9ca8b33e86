//! In-memory record store.
//!
//! Holds the authoritative record list and the last derived view. Mutations
//! here are purely local; callers apply them only after the remote store has
//! confirmed the change.

use crate::error::{LibraryError, Result};
use crate::models::{decode_records, MediaId, MediaRecord};
use crate::query::{derive_view, ViewConfig};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<MediaRecord>,
    view: Vec<MediaRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole record set.
    ///
    /// Later records repeating an earlier id are dropped. The view is reset to
    /// the unfiltered list until the next [`refresh_view`](Self::refresh_view).
    /// Returns the number of records kept.
    pub fn load(&mut self, records: Vec<MediaRecord>) -> usize {
        let mut seen: HashSet<MediaId> = HashSet::with_capacity(records.len());
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            if seen.insert(record.id.clone()) {
                kept.push(record);
            } else {
                warn!(id = %record.id, "Dropping record with duplicate id");
            }
        }

        debug!(count = kept.len(), "Loaded records into store");
        self.view = kept.clone();
        self.records = kept;
        self.records.len()
    }

    /// Load from an untyped JSON document. Anything but an array loads as empty.
    pub fn load_json(&mut self, value: Value) -> usize {
        match value {
            Value::Array(items) => self.load(decode_records(items)),
            other => {
                warn!(kind = json_kind(&other), "Expected a JSON array of records");
                self.load(Vec::new())
            }
        }
    }

    /// Insert a confirmed record at the front, or replace the record with the same id.
    ///
    /// Returns `true` when the record was new.
    pub fn upsert_local(&mut self, record: MediaRecord) -> bool {
        match self.position(&record.id) {
            Some(index) => {
                if let Some(slot) = self.view.iter_mut().find(|r| r.id == record.id) {
                    *slot = record.clone();
                }
                self.records[index] = record;
                false
            }
            None => {
                self.records.insert(0, record);
                true
            }
        }
    }

    pub fn remove_local(&mut self, id: &MediaId) -> Result<MediaRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| LibraryError::record_not_found(id))?;
        self.view.retain(|r| &r.id != id);
        Ok(self.records.remove(index))
    }

    /// Merge fields returned by the remote store into a record.
    pub fn patch_local(&mut self, id: &MediaId, fields: &Map<String, Value>) -> Result<&MediaRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| LibraryError::record_not_found(id))?;

        self.records[index].apply_remote(fields)?;

        let updated = &self.records[index];
        if let Some(slot) = self.view.iter_mut().find(|r| &r.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    pub fn get(&self, id: &MediaId) -> Option<&MediaRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &MediaId) -> bool {
        self.position(id).is_some()
    }

    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn view(&self) -> &[MediaRecord] {
        &self.view
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-derive the visible list from the full set.
    pub fn refresh_view(&mut self, config: &ViewConfig) -> &[MediaRecord] {
        self.view = derive_view(&self.records, config);
        &self.view
    }

    fn position(&self, id: &MediaId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
