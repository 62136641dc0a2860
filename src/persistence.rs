//! Save snapshots: codec, storage backends, and quota-aware saving.
//!
//! A snapshot is flat JSON:
//!
//! ```json
//! { "maps": [...], "locations": [...], "version": "1", "changelogChecksum": "..." }
//! ```
//!
//! Loading is best-effort. A missing or unknown `version` is logged and the
//! parse proceeds; malformed JSON is a hard [`PersistenceError`] and the
//! caller falls back to an empty document.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::HashMap;

use canvas::doc::{DocStore, Location, MapData};
use serde::{Deserialize, Serialize};

/// Version written by this build.
pub const CURRENT_SAVE_VERSION: &str = "1";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// On-disk form of the editor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub maps: Vec<MapData>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog_checksum: Option<String>,
}

impl SaveData {
    /// Snapshot the store at the current version.
    #[must_use]
    pub fn from_store(doc: &DocStore, changelog_checksum: Option<String>) -> Self {
        Self {
            maps: doc.maps().to_vec(),
            locations: doc.locations().to_vec(),
            version: Some(CURRENT_SAVE_VERSION.to_owned()),
            changelog_checksum,
        }
    }

    /// Rebuild a store. The first map becomes current.
    #[must_use]
    pub fn into_store(self) -> DocStore {
        DocStore::from_parts(self.maps, self.locations)
    }

    /// Drop every map's image payload.
    pub fn strip_images(&mut self) {
        for map in &mut self.maps {
            map.image.clear();
        }
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot, logging version problems.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, PersistenceError> {
        let data: Self = serde_json::from_str(raw)?;
        match data.version.as_deref() {
            None => log::error!("save data lacks a version and is probably broken"),
            Some(CURRENT_SAVE_VERSION) => {}
            Some(other) => log::warn!("unknown save version {other:?}, loading best-effort"),
        }
        Ok(data)
    }
}

/// Key/value storage for serialized snapshots.
pub trait SnapshotStorage {
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// # Errors
    ///
    /// Returns [`PersistenceError::QuotaExceeded`] when the value does not fit,
    /// or [`PersistenceError::Storage`] for other backend failures.
    fn store(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// In-process storage with an optional byte capacity.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    capacity: Option<u64>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes pushing total size past `bytes`.
    #[must_use]
    pub fn with_capacity(bytes: u64) -> Self {
        Self { entries: HashMap::new(), capacity: Some(bytes) }
    }

    fn used_except(&self, key: &str) -> u64 {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }

    /// Bytes still free if `key` were rewritten, or `None` when unbounded.
    #[must_use]
    pub fn remaining_bytes(&self, key: &str) -> Option<u64> {
        self.capacity.map(|cap| cap.saturating_sub(self.used_except(key) + key.len() as u64))
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.remaining_bytes(key).is_some_and(|free| (value.len() as u64) > free) {
            return Err(PersistenceError::QuotaExceeded);
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// How a save attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { bytes: u64 },
    /// The full snapshot did not fit; it was written without images.
    SavedWithoutImages { bytes: u64 },
    /// Nothing fit; the previous snapshot is untouched.
    Skipped { bytes: u64 },
}

/// Write `data`, falling back to an image-less snapshot when it does not fit.
///
/// `remaining` is the free quota reported by the host, if known. A write
/// can also fail with [`PersistenceError::QuotaExceeded`] from the backend
/// itself; both paths take the same fallback.
///
/// # Errors
///
/// Returns serialization errors and non-quota storage failures.
pub fn save_snapshot(
    storage: &mut impl SnapshotStorage,
    key: &str,
    data: &SaveData,
    remaining: Option<u64>,
    strip_images_on_quota: bool,
) -> Result<SaveOutcome, PersistenceError> {
    let raw = data.to_json()?;
    let bytes = raw.len() as u64;
    if fits(bytes, remaining) {
        match storage.store(key, &raw) {
            Ok(()) => {
                log::info!("saved snapshot ({bytes} bytes)");
                return Ok(SaveOutcome::Saved { bytes });
            }
            Err(PersistenceError::QuotaExceeded) => {}
            Err(e) => return Err(e),
        }
    }

    log::warn!("snapshot of {bytes} bytes exceeds storage quota");
    if !strip_images_on_quota {
        return Ok(SaveOutcome::Skipped { bytes });
    }

    let mut stripped = data.clone();
    stripped.strip_images();
    let raw = stripped.to_json()?;
    let bytes = raw.len() as u64;
    if !fits(bytes, remaining) {
        log::warn!("snapshot without images ({bytes} bytes) still does not fit, skipping save");
        return Ok(SaveOutcome::Skipped { bytes });
    }
    match storage.store(key, &raw) {
        Ok(()) => {
            log::warn!("saved snapshot without images ({bytes} bytes)");
            Ok(SaveOutcome::SavedWithoutImages { bytes })
        }
        Err(PersistenceError::QuotaExceeded) => {
            log::warn!("snapshot without images rejected by storage, skipping save");
            Ok(SaveOutcome::Skipped { bytes })
        }
        Err(e) => Err(e),
    }
}

fn fits(bytes: u64, remaining: Option<u64>) -> bool {
    remaining.is_none_or(|free| bytes <= free)
}

/// A loaded snapshot, ready for the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loaded {
    pub doc: DocStore,
    pub changelog_checksum: Option<String>,
}

/// Load the snapshot under `key`. Missing, unreadable, or malformed data
/// yields an empty document.
pub fn load_or_default(storage: &impl SnapshotStorage, key: &str) -> Loaded {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Loaded::default(),
        Err(e) => {
            log::error!("could not read saved data: {e}");
            return Loaded::default();
        }
    };
    match SaveData::from_json(&raw) {
        Ok(mut data) => {
            let changelog_checksum = data.changelog_checksum.take();
            let doc = data.into_store();
            log::info!("loaded {} maps and {} locations", doc.maps().len(), doc.len());
            Loaded { doc, changelog_checksum }
        }
        Err(e) => {
            log::error!("discarding unreadable save data: {e}");
            Loaded::default()
        }
    }
}
