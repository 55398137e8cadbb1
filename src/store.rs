//! Key-value record store
//!
//! Collections are stored whole: one key holds one serialized `Vec` (or the
//! settings value), and every write replaces the previous value in a single
//! backend operation. Reads never fail; an absent key, a backend error or a
//! payload that no longer decodes all yield the type's default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{HabbitError, Result};
use crate::metrics::StoreMetrics;

/// Logical key names
pub mod keys {
    /// Ordered list of habits
    pub const HABITS: &str = "habits";
    /// Ordered list of habit completions
    pub const HABIT_COMPLETIONS: &str = "habit_completions";
    /// Ordered list of mood entries
    pub const MOOD_ENTRIES: &str = "mood_entries";
    /// Ordered list of hydration records, one per date
    pub const HYDRATION_RECORDS: &str = "hydration_records";
    /// The settings value
    pub const APP_SETTINGS: &str = "app_settings";
    /// First-launch flag, true until cleared
    pub const FIRST_LAUNCH: &str = "first_launch";

    /// Every key the store writes
    pub const ALL: [&str; 6] = [HABITS, HABIT_COMPLETIONS, MOOD_ENTRIES, HYDRATION_RECORDS, APP_SETTINGS, FIRST_LAUNCH];
}

/// Byte-level storage backend.
///
/// Implementations must make each `insert` atomic per key and each
/// `apply_batch` atomic across all of its keys.
pub trait KeyValueStore {
    /// Read the raw value under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Replace the value under `key`
    fn insert(&self, key: &str, value: Vec<u8>) -> Result<()>;
    /// Replace several keys at once; either all writes land or none do
    fn apply_batch(&self, entries: Vec<(&str, Vec<u8>)>) -> Result<()>;
    /// Delete `key` if present
    fn remove(&self, key: &str) -> Result<()>;
    /// Delete every key
    fn clear(&self) -> Result<()>;
    /// Make previous writes durable
    fn flush(&self) -> Result<()>;
}

/// On-disk backend over a sled tree
pub struct SledStore {
    db: sled::Db,
    flush_on_write: bool,
}

impl SledStore {
    /// Open (or create) a store under `path`
    pub fn open(path: &Path, flush_on_write: bool) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        debug!(path = %path.display(), "Opened sled store");
        Ok(Self { db, flush_on_write })
    }

    /// Open a store that is deleted when dropped
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db, flush_on_write: false })
    }

    fn maybe_flush(&self) -> Result<()> {
        if self.flush_on_write {
            self.db.flush()?;
        }
        Ok(())
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|value| value.to_vec()))
    }

    fn insert(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.db.insert(key, value)?;
        self.maybe_flush()
    }

    fn apply_batch(&self, entries: Vec<(&str, Vec<u8>)>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for (key, value) in entries {
            batch.insert(key, value);
        }
        self.db.apply_batch(batch)?;
        self.maybe_flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.remove(key)?;
        self.maybe_flush()
    }

    fn clear(&self) -> Result<()> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

/// In-memory backend, used for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> HabbitError {
    HabbitError::Storage("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn insert(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.write().map_err(poisoned)?.insert(key.to_string(), value);
        Ok(())
    }

    fn apply_batch(&self, entries: Vec<(&str, Vec<u8>)>) -> Result<()> {
        let mut map = self.entries.write().map_err(poisoned)?;
        for (key, value) in entries {
            map.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().map_err(poisoned)?.clear();
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Payload encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// Human-readable JSON
    #[default]
    Json,
    /// Compact bincode
    Bincode,
}

impl Codec {
    /// Serialize `value`
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>> {
        match self {
            Self::Json => Ok(serde_json::to_vec(value)?),
            Self::Bincode => Ok(bincode::serialize(value)?),
        }
    }

    /// Deserialize `bytes`
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::Bincode => Ok(bincode::deserialize(bytes)?),
        }
    }
}

/// Typed access to collections stored in a [`KeyValueStore`]
pub struct RecordStore<S> {
    backend: S,
    codec: Codec,
    metrics: StoreMetrics,
}

impl RecordStore<MemoryStore> {
    /// A JSON record store held entirely in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), Codec::Json)
    }
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Wrap `backend`, encoding payloads with `codec`
    pub fn new(backend: S, codec: Codec) -> Self {
        Self {
            backend,
            codec,
            metrics: StoreMetrics::default(),
        }
    }

    /// The underlying backend
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Read/write tallies for this store
    pub const fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    /// Load the value under `key`, or `T::default()` if it is absent or unreadable
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_or(key, T::default)
    }

    /// Load the value under `key`, or `fallback()` if it is absent or unreadable
    pub fn load_or<T: DeserializeOwned>(&self, key: &str, fallback: impl FnOnce() -> T) -> T {
        self.metrics.record_read(key);

        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return fallback(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read collection, using default");
                return fallback();
            }
        };

        match self.codec.decode(&bytes) {
            Ok(value) => value,
            Err(e) => {
                self.metrics.record_decode_failure(key);
                warn!(key, error = %e, "Failed to decode collection, using default");
                fallback()
            }
        }
    }

    /// Serialize `value` and overwrite `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = self.codec.encode(value)?;
        let size = bytes.len();
        let start = Instant::now();
        let result = self.backend.insert(key, bytes);
        self.metrics.record_write(key, size, start.elapsed(), result.is_ok());
        debug!(key, bytes = size, "Saved collection");
        result
    }

    /// Serialize `value` for use in [`RecordStore::save_many`]
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        self.codec.encode(value)
    }

    /// Overwrite several keys in one atomic batch
    pub fn save_many(&self, entries: Vec<(&str, Vec<u8>)>) -> Result<()> {
        let sizes: Vec<(String, usize)> = entries.iter().map(|(key, bytes)| ((*key).to_string(), bytes.len())).collect();
        let start = Instant::now();
        let result = self.backend.apply_batch(entries);
        let elapsed = start.elapsed();
        for (key, size) in &sizes {
            self.metrics.record_write(key, *size, elapsed, result.is_ok());
        }
        debug!(keys = sizes.len(), "Saved collections in one batch");
        result
    }

    /// Read a boolean flag, `default` if unset
    pub fn load_flag(&self, key: &str, default: bool) -> bool {
        self.load_or(key, || default)
    }

    /// Write a boolean flag
    pub fn save_flag(&self, key: &str, value: bool) -> Result<()> {
        self.save(key, &value)
    }

    /// Delete every stored value
    pub fn clear(&self) -> Result<()> {
        self.backend.clear()?;
        debug!("Cleared record store");
        Ok(())
    }

    /// Flush the backend
    pub fn flush(&self) -> Result<()> {
        self.backend.flush()
    }
}
