//! Project records and the key/value project store.
//!
//! A [`ProjectRecord`] bundles the metadata, the optional generated content,
//! and the design snapshot for one project. The [`ProjectStore`] trait is
//! deliberately thin (get/put/remove/list over opaque serialized blobs)
//! because the backing storage may be cleared at any time and carries no
//! schema migration. Every optional field deserializes through defaults, so
//! a record written by an older shape loads instead of crashing.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{BrandBrief, BrandContent};
use crate::design::DesignSnapshot;

/// Errors from the backing storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The full persisted state of one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub brief: BrandBrief,
    pub content: Option<BrandContent>,
    pub design: DesignSnapshot,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, brief: BrandBrief) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brief,
            content: None,
            design: DesignSnapshot::default(),
        }
    }
}

/// Key/value persistence keyed by project id.
///
/// A store returning `None` is first-run normal, not an error.
pub trait ProjectStore {
    fn get(&self, id: &str) -> Result<Option<ProjectRecord>, StoreError>;
    fn put(&mut self, record: &ProjectRecord) -> Result<(), StoreError>;
    fn remove(&mut self, id: &str) -> Result<bool, StoreError>;
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store over an in-memory map of serialized blobs. Primarily for tests and
/// ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<ProjectRecord>, StoreError> {
        match self.records.get(id) {
            Some(blob) => Ok(Some(serde_json::from_str(blob)?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, record: &ProjectRecord) -> Result<(), StoreError> {
        let blob = serde_json::to_string(record)?;
        self.records.insert(record.id.clone(), blob);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        Ok(self.records.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.records.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Store over a single JSON file mapping project id → record.
///
/// The whole file is read and rewritten per operation; this matches the
/// scale of a local authoring tool and keeps the file human-inspectable.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, serde_json::Value>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, map: &HashMap<String, serde_json::Value>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl ProjectStore for JsonFileStore {
    fn get(&self, id: &str) -> Result<Option<ProjectRecord>, StoreError> {
        let map = self.load()?;
        match map.get(id) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn put(&mut self, record: &ProjectRecord) -> Result<(), StoreError> {
        let mut map = self.load()?;
        map.insert(record.id.clone(), serde_json::to_value(record)?);
        self.save(&map)
    }

    fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut map = self.load()?;
        let existed = map.remove(id).is_some();
        if existed {
            self.save(&map)?;
        }
        Ok(existed)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.load()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// ============================================================================
// Tests
// ============================================================================
