//! Builder for SettingsManager
//!
//! This module contains [`SettingsManagerBuilder`] which provides a fluent API
//! for creating a [`SettingsManager`](super::SettingsManager).

use crate::config::ManagerConfigBuilder;
use crate::control::{Control, TypeTag};
use crate::error::Result;
use crate::handler::{HandlerRegistry, StateHandler};
use crate::store::{TomlStore, SnapshotStore};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use super::SettingsManager;

/// Builder for creating a [`SettingsManager`] with a fluent API.
///
/// Without [`with_store`](Self::with_store) the manager opens a TOML file at
/// `<config_dir>/<settings_file>`.
///
/// # Example
///
/// ```rust,no_run
/// use wsman::SettingsManager;
///
/// let manager = SettingsManager::builder("acme", "editor")
///     .config_dir("~/.config/acme")
///     .settings_file("window-state.toml")
///     .float_tolerance(1e-3)
///     .build()
///     .unwrap();
/// ```
pub struct SettingsManagerBuilder {
    config_builder: ManagerConfigBuilder,
    store: Option<Arc<dyn SnapshotStore>>,
    handlers: Vec<(TypeTag, Arc<dyn StateHandler>)>,
}

impl SettingsManagerBuilder {
    /// Create a new builder with the required organization and application names.
    pub fn new(organization: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            config_builder: ManagerConfigBuilder::new(organization, application),
            store: None,
            handlers: Vec::new(),
        }
    }

    /// Set the configuration directory.
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.config_dir(path);
        self
    }

    /// Set the settings filename (default: "<application>.toml").
    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.settings_file(filename);
        self
    }

    /// Set the namespace reserved for custom data (default: "customData").
    pub fn custom_data_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.custom_data_prefix(prefix);
        self
    }

    /// Set the float compare tolerance used by the built-in handlers.
    pub fn float_tolerance(mut self, tolerance: f64) -> Self {
        self.config_builder = self.config_builder.float_tolerance(tolerance);
        self
    }

    /// Flush the store after every save pass (default: true).
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config_builder = self.config_builder.sync_on_save(sync);
        self
    }

    /// Use `store` instead of opening the TOML settings file.
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a handler for control type `T`, overriding any built-in one.
    pub fn with_handler<T: Control>(mut self, handler: impl StateHandler + 'static) -> Self {
        self.handlers.push((TypeTag::of::<T>(), Arc::new(handler)));
        self
    }

    /// Build the manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, or if the settings
    /// file exists but cannot be read or parsed.
    pub fn build(self) -> Result<SettingsManager> {
        let config = self.config_builder.build()?;

        let store: Arc<dyn SnapshotStore> = match self.store {
            Some(store) => store,
            None => {
                let path = config.settings_path();
                info!("Using settings file {}", path.display());
                Arc::new(TomlStore::open(path)?)
            }
        };

        let mut registry = HandlerRegistry::with_defaults(config.float_tolerance);
        for (tag, handler) in self.handlers {
            registry.register(tag, handler);
        }

        Ok(SettingsManager::from_parts(config, store, registry))
    }
}
