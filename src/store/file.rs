//! File-backed TOML snapshot store
//!
//! The file is plain TOML, so it stays human-editable:
//!
//! ```toml
//! name = "Ada"
//! volume = 7
//!
//! [main]
//! geometry = [100, 0, 0, 0, 100, 0, 0, 0, 32, 3, 0, 0, 88, 2, 0, 0, 0]
//! state = []
//!
//! [customData]
//! recent = '["a.txt","b.txt"]'
//! ```
//!
//! A key `group/rest` is written as `rest` inside table `[group]`; keys
//! without a `/` are top-level values. Strings, integers, floats and booleans
//! use their native TOML types, byte blobs are arrays of integers. Because a
//! top-level name is either a value or a table, a key `x` cannot coexist
//! with keys under `x/`.

use super::{SnapshotStore, StoreValue};
use crate::error::{Error, Result};
use crate::sync::RwLockExt;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// One top-level entry of the file
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Entry {
    Value(StoreValue),
    Table(BTreeMap<String, StoreValue>),
}

type Document = BTreeMap<String, Entry>;

/// TOML file snapshot store (default store)
///
/// The whole file is held in memory. `set`/`remove` only touch memory;
/// [`SnapshotStore::sync`] writes the file atomically (temp file + rename).
pub struct TomlStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, StoreValue>>,
    dirty: AtomicBool,
}

impl TomlStore {
    /// Open the store at `path`, reading it if it exists.
    ///
    /// A missing file opens as an empty store; it is created on the first
    /// `sync` after a write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file exists but cannot be read, or
    /// [`Error::Parse`] if it is not a settings document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = read_file(&path)?;
        debug!("Opened TOML store {} ({} keys)", path.display(), values.len());

        Ok(Self {
            path,
            values: RwLock::new(values),
            dirty: AtomicBool::new(false),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if there are writes not yet synced to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Discard in-memory state and re-read the file
    ///
    /// # Errors
    ///
    /// Same as [`TomlStore::open`]. On error the in-memory state is unchanged.
    pub fn reload(&self) -> Result<()> {
        let values = read_file(&self.path)?;
        *self.values.write_recovered() = values;
        self.dirty.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Remove every key
    pub fn clear(&self) {
        self.values.write_recovered().clear();
        self.dirty.store(true, Ordering::SeqCst);
    }
}

impl SnapshotStore for TomlStore {
    fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.values.read_recovered().get(key).cloned())
    }

    /// # Errors
    ///
    /// Returns [`Error::StoreWrite`] if `key` would turn a top-level value
    /// into a table or the other way round.
    fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        let mut values = self.values.write_recovered();
        if let Some(existing) = shape_conflict(&values, key) {
            return Err(Error::StoreWrite {
                key: key.to_string(),
                reason: format!("'{existing}' already uses that name at the top level"),
            });
        }

        let previous = values.insert(key.to_string(), value.clone());
        if previous.as_ref() != Some(&value) {
            self.dirty.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.values.write_recovered().remove(key).is_some() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read_recovered().keys().cloned().collect())
    }

    fn sync(&self) -> Result<()> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let written = toml::to_string(&to_document(&self.values.read_recovered()))
            .map_err(Error::from)
            .and_then(|content| write_atomic(&self.path, &content));
        if let Err(e) = written {
            self.dirty.store(true, Ordering::SeqCst);
            return Err(e);
        }

        debug!("Synced TOML store {}", self.path.display());
        Ok(())
    }
}

/// Existing key that gives the top-level name of `key` a different shape
fn shape_conflict(values: &BTreeMap<String, StoreValue>, key: &str) -> Option<String> {
    match key.split_once('/') {
        Some((table, _)) => values.contains_key(table).then(|| table.to_string()),
        None => {
            let prefix = format!("{key}/");
            values
                .range(prefix.clone()..)
                .next()
                .map(|(existing, _)| existing)
                .filter(|existing| existing.starts_with(&prefix))
                .cloned()
        }
    }
}

fn to_document(values: &BTreeMap<String, StoreValue>) -> Document {
    let mut document = Document::new();
    for (key, value) in values {
        match key.split_once('/') {
            Some((table, rest)) => {
                let entry = document
                    .entry(table.to_string())
                    .or_insert_with(|| Entry::Table(BTreeMap::new()));
                if let Entry::Table(entries) = entry {
                    entries.insert(rest.to_string(), value.clone());
                }
            }
            None => {
                document.insert(key.clone(), Entry::Value(value.clone()));
            }
        }
    }
    document
}

fn from_document(document: Document) -> BTreeMap<String, StoreValue> {
    let mut values = BTreeMap::new();
    for (name, entry) in document {
        match entry {
            Entry::Value(value) => {
                values.insert(name, value);
            }
            Entry::Table(entries) => {
                for (rest, value) in entries {
                    values.insert(format!("{name}/{rest}"), value);
                }
            }
        }
    }
    values
}

// =============================================================================
// File I/O
// =============================================================================

fn read_file(path: &Path) -> Result<BTreeMap<String, StoreValue>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(Error::FileRead {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let document: Document = toml::from_str(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(from_document(document))
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Append .tmp to the full file name so the original extension survives
    let file_name = path.file_name().ok_or_else(|| {
        Error::Config(format!(
            "Invalid path '{}': must have a filename",
            path.display()
        ))
    })?;
    let mut temp_filename = file_name.to_os_string();
    temp_filename.push(".tmp");
    let temp_path = path.with_file_name(temp_filename);

    std::fs::write(&temp_path, content).map_err(|e| Error::FileWrite {
        path: temp_path.clone(),
        source: e,
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// =============================================================================
// Tests
// =============================================================================
