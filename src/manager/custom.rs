//! Custom data entries
//!
//! Arbitrary serializable values stored next to control state, under
//! `<custom_data_prefix>/<key>` in the same store. Values are JSON strings,
//! so they stay readable in the TOML file.

use super::SettingsManager;
use crate::error::{Error, Result};
use crate::store::{SnapshotStore, StoreValue};
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

/// One or more `/`-separated segments of word characters, dots and dashes
static KEY_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[\w.\-]+(/[\w.\-]+)*$"));

fn validate_key(key: &str) -> Result<()> {
    let pattern = KEY_PATTERN
        .as_ref()
        .map_err(|e| Error::Config(format!("Invalid custom data key pattern: {e}")))?;

    if pattern.is_match(key) {
        Ok(())
    } else {
        Err(Error::InvalidCustomDataKey {
            key: key.to_string(),
            reason: "expected '/'-separated segments of letters, digits, '_', '.' or '-'"
                .into(),
        })
    }
}

impl SettingsManager {
    /// Store `value` as custom data under `key`.
    ///
    /// Always marks the state touched on success, even when the stored value
    /// did not change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCustomDataKey`] for a malformed key (nothing is
    /// written), [`Error::Serialize`] if `value` cannot be serialized, or a
    /// store error.
    pub fn save_custom_data<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        validate_key(key)?;
        let json = serde_json::to_string(value)?;

        let full_key = self.custom_data_key(key);
        self.store.set(&full_key, StoreValue::String(json))?;
        if self.config.sync_on_save {
            self.store.sync()?;
        }

        debug!("Saved custom data '{}'", key);
        self.touched.set(true);
        Ok(())
    }

    /// Read custom data stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored, or if the stored value cannot
    /// be read as a `T` (logged as a warning). Never changes the touched state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCustomDataKey`] for a malformed key, or a store
    /// read error.
    pub fn load_custom_data<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        let full_key = self.custom_data_key(key);

        let json = match self.store.get_string(&full_key) {
            Ok(Some(json)) => json,
            Ok(None) => return Ok(None),
            Err(e @ Error::TypeMismatch { .. }) => {
                warn!("Ignoring unreadable custom data '{}': {}", key, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring unreadable custom data '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Remove the custom data entry `key`. Marks the state touched if an
    /// entry was actually removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCustomDataKey`] for a malformed key, or a store
    /// error.
    pub fn remove_custom_data(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let full_key = self.custom_data_key(key);

        if !self.store.contains(&full_key)? {
            return Ok(());
        }
        self.store.remove(&full_key)?;
        if self.config.sync_on_save {
            self.store.sync()?;
        }

        debug!("Removed custom data '{}'", key);
        self.touched.set(true);
        Ok(())
    }

    /// Keys of all stored custom data entries, without the prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot list its keys.
    pub fn custom_data_keys(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", self.config.custom_data_prefix);
        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    fn custom_data_key(&self, key: &str) -> String {
        format!("{}/{}", self.config.custom_data_prefix, key)
    }
}

// =============================================================================
// Tests
// =============================================================================
