//! Persistence of the card collection in a key-value slot.
//!
//! The slot holds one JSON array of card records under a versioned key.
//! Loading never fails: absent, unreadable or malformed data yields an empty
//! collection and a logged warning. Saving replaces the whole array.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::model::Card;

/// Key of the slot holding the card array.
pub const CARDS_KEY: &str = "weatherCards_v1";

/// A string-valued key-value slot.
pub trait Slot {
    /// `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Slot backed by one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { key: key.to_string(), source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write { key: key.to_string(), source };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Write beside the target and rename so a crash never leaves half a file.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;

        Ok(())
    }
}

/// In-process slot. Writes can be made to fail for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: HashMap<String, String>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                key: key.to_string(),
                source: io::Error::other("slot is read-only"),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Loads and saves the card collection through a [`Slot`].
#[derive(Debug, Clone)]
pub struct CardStore<S: Slot> {
    slot: S,
    key: String,
}

impl<S: Slot> CardStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot, key: CARDS_KEY.to_string() }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the stored collection, recovering from any read failure with an
    /// empty one.
    pub fn load(&self) -> Vec<Card> {
        match self.try_load() {
            Ok(cards) => {
                debug!(key = %self.key, count = cards.len(), "loaded cards");
                cards
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to load cards, starting empty");
                Vec::new()
            }
        }
    }

    /// Like [`CardStore::load`] but reports why the slot could not be read.
    ///
    /// Records that do not form a valid card, and repeats of an id already
    /// seen, are skipped with a warning rather than failing the whole load.
    pub fn try_load(&self) -> Result<Vec<Card>, StoreError> {
        let Some(raw) = self.slot.read(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: Value = serde_json::from_str(&raw)
            .map_err(|source| StoreError::Corrupt { key: self.key.clone(), source })?;
        let Value::Array(records) = parsed else {
            return Err(StoreError::NotASequence { key: self.key.clone() });
        };

        let mut seen = HashSet::new();
        let mut cards = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let card = match serde_json::from_value::<Card>(record) {
                Ok(card) if card.is_well_formed() => card,
                Ok(_) => {
                    warn!(index, "dropping stored card without id or city");
                    continue;
                }
                Err(e) => {
                    warn!(index, error = %e, "dropping unreadable stored card");
                    continue;
                }
            };
            if !seen.insert(card.id.clone()) {
                warn!(index, id = %card.id, "dropping stored card with duplicate id");
                continue;
            }
            cards.push(card);
        }

        Ok(cards)
    }

    /// Replace the stored collection with `cards`.
    pub fn save(&mut self, cards: &[Card]) -> Result<(), StoreError> {
        let json = serde_json::to_string(cards)?;
        self.slot.write(&self.key, &json)?;
        debug!(key = %self.key, count = cards.len(), "saved cards");
        Ok(())
    }
}
