//! Save, load and compare passes

use super::{CompareSource, OperationReport, SettingsManager};
use crate::error::Result;
use crate::store::{TomlStore, SnapshotStore};
use log::{debug, info, warn};
use std::path::Path;

impl SettingsManager {
    /// Save every managed control to the default store.
    ///
    /// A failing control is recorded in the report and the pass continues.
    /// Afterwards change subscriptions are rebuilt and the touched state is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns an error only if flushing the store fails. The touched state
    /// is left as it was in that case.
    pub fn save_state(&self) -> Result<OperationReport> {
        let store = self.store.clone();
        self.save_state_to(store.as_ref())
    }

    /// Save every managed control to `store` instead of the default store
    ///
    /// # Errors
    ///
    /// See [`save_state`](Self::save_state).
    pub fn save_state_to(&self, store: &dyn SnapshotStore) -> Result<OperationReport> {
        let managed = self.collect();
        info!("Saving state of {} controls", managed.len());

        let mut report = OperationReport::default();
        for control in &managed {
            let result = self.check_control_key(&control.key).and_then(|()| {
                control
                    .handler
                    .save(control.control.as_ref(), &control.key, store)
            });
            report.record("save", &control.key, result);
        }

        let synced = if self.config.sync_on_save {
            store.sync()
        } else {
            Ok(())
        };

        self.rewire(&managed);
        synced?;
        self.touched.set(false);

        debug!(
            "Saved {} of {} controls",
            report.succeeded(),
            report.processed
        );
        Ok(report)
    }

    /// Save every managed control to a TOML file.
    ///
    /// Existing keys in the file that no control writes are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file cannot be parsed or the file
    /// cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<OperationReport> {
        let path = path.as_ref();
        info!("Saving state to {}", path.display());
        let store = TomlStore::open(path)?;
        let report = self.save_state_to(&store)?;
        // The file is the whole point here, flush even if sync_on_save is off
        store.sync()?;
        Ok(report)
    }

    /// Apply the default store to every managed control.
    ///
    /// Change subscriptions are dropped for the duration of the pass, so
    /// the changes made by loading never mark the state touched. A control
    /// without a stored value keeps its current state.
    ///
    /// # Errors
    ///
    /// Per-control failures are reported, not returned; this currently
    /// always returns `Ok`.
    pub fn load_state(&self) -> Result<OperationReport> {
        let store = self.store.clone();
        self.load_state_from(store.as_ref())
    }

    /// Apply `store` to every managed control
    ///
    /// # Errors
    ///
    /// See [`load_state`](Self::load_state).
    pub fn load_state_from(&self, store: &dyn SnapshotStore) -> Result<OperationReport> {
        self.disconnect_all();

        let managed = self.collect();
        info!("Loading state of {} controls", managed.len());

        let mut report = OperationReport::default();
        for control in &managed {
            let result = self.check_control_key(&control.key).and_then(|()| {
                control
                    .handler
                    .load(control.control.as_ref(), &control.key, store)
            });
            report.record("load", &control.key, result);
        }

        self.rewire(&managed);
        self.touched.set(false);

        debug!(
            "Loaded {} of {} controls",
            report.succeeded(),
            report.processed
        );
        Ok(report)
    }

    /// Apply a TOML file to every managed control.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed;
    /// controls and the touched state are left unchanged in that case.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<OperationReport> {
        let path = path.as_ref();
        info!("Loading state from {}", path.display());
        let store = TomlStore::open(path)?;
        self.load_state_from(&store)
    }

    /// True if any managed control differs from the default store.
    ///
    /// Never changes a control or the touched state. Custom data is not
    /// compared.
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes_against(CompareSource::Default)
    }

    /// True if any managed control differs from the snapshot in `source`.
    ///
    /// Stops at the first difference. A control whose compare fails counts
    /// as unchanged. A file that cannot be opened yields `false`.
    pub fn has_unsaved_changes_against(&self, source: CompareSource) -> bool {
        let file_store;
        let store: &dyn SnapshotStore = match &source {
            CompareSource::Default => self.store.as_ref(),
            CompareSource::Store(store) => store.as_ref(),
            CompareSource::File(path) => match TomlStore::open(path) {
                Ok(opened) => {
                    file_store = opened;
                    &file_store
                }
                Err(e) => {
                    warn!("Cannot compare against {}: {}", path.display(), e);
                    return false;
                }
            },
        };

        let managed = self.collect();
        debug!("Comparing {} controls", managed.len());

        for control in &managed {
            if self.check_control_key(&control.key).is_err() {
                continue;
            }
            match control
                .handler
                .compare(control.control.as_ref(), &control.key, store)
            {
                Ok(true) => {
                    info!("Unsaved changes in '{}'", control.key);
                    return true;
                }
                Ok(false) => {}
                Err(e) => warn!("Could not compare '{}': {}", control.key, e),
            }
        }
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
