//! Snapshot stores
//!
//! A snapshot store is the key/value persistence that save, load and compare
//! passes run against. Keys are plain strings; `/` nests a key inside a group
//! (`"window/geometry"`). Grouping is a store concern. The manager and the
//! handlers only ever build keys, they never interpret them.
//!
//! Two implementations ship with the crate:
//! - [`TomlStore`] - file-backed, human-editable TOML (the default store)
//! - [`MemoryStore`] - in-memory only, for tests and scratch snapshots

mod file;
mod memory;
mod value;

pub use file::TomlStore;
pub use memory::MemoryStore;
pub use value::{StoreValue, ValueKind};

use crate::error::Result;

/// Trait for snapshot store implementations
///
/// All methods take `&self`: a store is shared (`Arc<dyn SnapshotStore>`)
/// between the manager, application code and possibly other managers, so
/// implementations use interior mutability. No atomicity across a batch of
/// `set` calls is implied.
pub trait SnapshotStore: Send + Sync {
    /// Read a raw value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read the key.
    fn get(&self, key: &str) -> Result<Option<StoreValue>>;

    /// Write a value, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write the key.
    fn set(&self, key: &str, value: StoreValue) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to remove the key.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently present, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to list keys.
    fn keys(&self) -> Result<Vec<String>>;

    /// Flush pending writes to the backing medium
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    fn sync(&self) -> Result<()>;

    /// Check if a key exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read the key.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Read a value converted to `kind`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TypeMismatch`] if the stored value cannot be
    /// converted, or any backend read error.
    fn get_as(&self, key: &str, kind: ValueKind) -> Result<Option<StoreValue>> {
        self.get(key)?
            .map(|value| value.coerce(key, kind))
            .transpose()
    }

    /// Read a string value
    ///
    /// # Errors
    ///
    /// See [`SnapshotStore::get_as`].
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(match self.get_as(key, ValueKind::String)? {
            Some(StoreValue::String(s)) => Some(s),
            _ => None,
        })
    }

    /// Read an integer value
    ///
    /// # Errors
    ///
    /// See [`SnapshotStore::get_as`].
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(match self.get_as(key, ValueKind::Int)? {
            Some(StoreValue::Int(n)) => Some(n),
            _ => None,
        })
    }

    /// Read a floating-point value
    ///
    /// # Errors
    ///
    /// See [`SnapshotStore::get_as`].
    fn get_float(&self, key: &str) -> Result<Option<f64>> {
        Ok(match self.get_as(key, ValueKind::Float)? {
            Some(StoreValue::Float(x)) => Some(x),
            _ => None,
        })
    }

    /// Read a boolean value
    ///
    /// # Errors
    ///
    /// See [`SnapshotStore::get_as`].
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(match self.get_as(key, ValueKind::Bool)? {
            Some(StoreValue::Bool(b)) => Some(b),
            _ => None,
        })
    }

    /// Read a byte blob
    ///
    /// # Errors
    ///
    /// See [`SnapshotStore::get_as`].
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(match self.get_as(key, ValueKind::Bytes)? {
            Some(StoreValue::Bytes(bytes)) => Some(bytes),
            _ => None,
        })
    }
}
