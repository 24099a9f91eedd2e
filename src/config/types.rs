//! Configuration types for wsman

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default namespace for custom data entries
pub const DEFAULT_CUSTOM_DATA_PREFIX: &str = "customData";

/// Default absolute tolerance for floating-point compares
pub const DEFAULT_FLOAT_TOLERANCE: f64 = 1e-6;

/// Configuration for a [`SettingsManager`](crate::SettingsManager)
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Organization name (default config directory component)
    pub organization: String,

    /// Application name (default settings file stem)
    pub application: String,

    /// Directory holding the settings file
    pub config_dir: PathBuf,

    /// Filename of the default TOML store (e.g., "editor.toml")
    pub settings_file: String,

    /// Store key prefix reserved for custom data
    pub custom_data_prefix: String,

    /// Absolute difference below which two floats compare equal
    pub float_tolerance: f64,

    /// Flush the store after every save pass
    pub sync_on_save: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            organization: "wsman".into(),
            application: "app".into(),
            config_dir: PathBuf::from("."),
            settings_file: "app.toml".into(),
            custom_data_prefix: DEFAULT_CUSTOM_DATA_PREFIX.into(),
            float_tolerance: DEFAULT_FLOAT_TOLERANCE,
            sync_on_save: true,
        }
    }
}

impl ManagerConfig {
    /// Create a new builder for `ManagerConfig`
    ///
    /// # Example
    /// ```rust
    /// use wsman::ManagerConfig;
    ///
    /// let config = ManagerConfig::builder("acme", "editor")
    ///     .config_dir("/tmp/acme")
    ///     .build()
    ///     .unwrap();
    /// assert!(config.settings_path().ends_with("editor.toml"));
    /// ```
    pub fn builder(
        organization: impl Into<String>,
        application: impl Into<String>,
    ) -> ManagerConfigBuilder {
        ManagerConfigBuilder::new(organization, application)
    }

    /// Full path to the default settings file
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings_file)
    }

    /// Check the configuration for values that would break custom data or
    /// compares.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty, nested or padded custom data
    /// prefix, an empty settings file name, or a negative / NaN tolerance.
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.custom_data_prefix;
        if prefix.is_empty() {
            return Err(Error::Config("custom data prefix must not be empty".into()));
        }
        if prefix.contains('/') || prefix.trim() != prefix {
            return Err(Error::Config(format!(
                "custom data prefix '{prefix}' must be a single path segment"
            )));
        }
        if self.settings_file.is_empty() {
            return Err(Error::Config("settings file name must not be empty".into()));
        }
        if self.float_tolerance.is_nan() || self.float_tolerance < 0.0 {
            return Err(Error::Config(format!(
                "float tolerance must be a non-negative number, got {}",
                self.float_tolerance
            )));
        }
        Ok(())
    }
}

/// Builder for creating `ManagerConfig` with a fluent API
#[derive(Debug, Clone)]
pub struct ManagerConfigBuilder {
    organization: String,
    application: String,
    config_dir: Option<PathBuf>,
    settings_file: Option<String>,
    custom_data_prefix: String,
    float_tolerance: f64,
    sync_on_save: bool,
}

impl ManagerConfigBuilder {
    /// Create a new builder with the required organization and application names
    pub fn new(organization: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            application: application.into(),
            config_dir: None,
            settings_file: None,
            custom_data_prefix: DEFAULT_CUSTOM_DATA_PREFIX.into(),
            float_tolerance: DEFAULT_FLOAT_TOLERANCE,
            sync_on_save: true,
        }
    }

    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();

        let expanded = match (path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path,
        };

        self.config_dir = Some(expanded);
        self
    }

    /// Set the settings filename (default: "<application>.toml")
    pub fn settings_file(mut self, filename: impl Into<String>) -> Self {
        self.settings_file = Some(filename.into());
        self
    }

    /// Set the namespace reserved for custom data (default: "customData")
    pub fn custom_data_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.custom_data_prefix = prefix.into();
        self
    }

    /// Set the float compare tolerance (default: 1e-6)
    pub fn float_tolerance(mut self, tolerance: f64) -> Self {
        self.float_tolerance = tolerance;
        self
    }

    /// Flush the store after every save pass (default: true)
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.sync_on_save = sync;
        self
    }

    /// Build and validate the `ManagerConfig`
    ///
    /// If `config_dir` is not set, uses `<system config dir>/<organization>`.
    ///
    /// # Errors
    ///
    /// See [`ManagerConfig::validate`].
    pub fn build(self) -> Result<ManagerConfig> {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join(&self.organization))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        let settings_file = self
            .settings_file
            .unwrap_or_else(|| format!("{}.toml", self.application));

        let config = ManagerConfig {
            organization: self.organization,
            application: self.application,
            config_dir,
            settings_file,
            custom_data_prefix: self.custom_data_prefix,
            float_tolerance: self.float_tolerance,
            sync_on_save: self.sync_on_save,
        };
        config.validate()?;
        Ok(config)
    }
}
