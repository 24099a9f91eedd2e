//! Main settings manager module
//!
//! This module contains the [`SettingsManager`] struct, the entry point for
//! saving, restoring and tracking the state of a control tree.
//!
//! The implementation is split by concern:
//! - `operations` - save / load / compare passes
//! - `wiring` - change subscriptions, skip set and touched state
//! - `custom` - custom data entries
//! - `builder` - [`SettingsManagerBuilder`]

mod builder;
mod custom;
mod operations;
mod wiring;

pub use builder::SettingsManagerBuilder;

use crate::config::ManagerConfig;
use crate::control::{Control, ControlId, ControlRef, TypeTag};
use crate::error::{Error, Result};
use crate::handler::{HandlerRegistry, StateHandler};
use crate::signal::Subscription;
use crate::store::SnapshotStore;
use crate::sync::RwLockExt;
use crate::touched::TouchedState;
use crate::traversal::{self, ManagedControl, SkipSet};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, Weak};

/// Persists and restores the state of a control tree and tracks whether it
/// changed since the last save or load.
///
/// The manager never owns the controls: [`set_root`](Self::set_root) binds the
/// tree weakly, and every pass walks whatever the tree holds at that moment.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use wsman::{ControlRef, MemoryStore, SettingsManager, SnapshotStore};
/// use wsman::widgets::{Container, LineEdit};
///
/// let name = Arc::new(LineEdit::new("").with_key("name"));
/// let root: ControlRef = Arc::new(Container::with_children([name.clone() as ControlRef]));
///
/// let store = Arc::new(MemoryStore::new());
/// let manager = SettingsManager::new(store.clone());
/// manager.set_root(&root);
///
/// manager.load_state().unwrap();
/// name.set_text("Ada");
/// assert!(manager.is_touched());
///
/// manager.save_state().unwrap();
/// assert!(!manager.is_touched());
/// assert_eq!(store.get_string("name").unwrap().as_deref(), Some("Ada"));
/// ```
pub struct SettingsManager {
    /// Configuration
    config: ManagerConfig,

    /// Default snapshot store
    store: Arc<dyn SnapshotStore>,

    /// Control type -> handler
    registry: RwLock<HandlerRegistry>,

    /// Controls excluded from every pass
    skipped: RwLock<SkipSet>,

    /// Root of the managed tree (not owned)
    root: RwLock<Option<Weak<dyn Control>>>,

    /// Touched flag and its listeners
    touched: Arc<TouchedState>,

    /// Live change subscriptions per control, replaced on every save/load
    wiring: RwLock<HashMap<ControlId, WiredControl>>,
}

/// Subscriptions held for one control
struct WiredControl {
    control: Weak<dyn Control>,
    subscriptions: Vec<Subscription>,
}

/// Where [`SettingsManager::has_unsaved_changes_against`] reads the
/// reference snapshot from
#[derive(Clone)]
pub enum CompareSource {
    /// The manager's own store
    Default,
    /// Another store
    Store(Arc<dyn SnapshotStore>),
    /// An TOML file, opened read-only for the compare
    File(PathBuf),
}

/// Outcome of a save or load pass
#[derive(Debug, Default)]
pub struct OperationReport {
    /// Number of managed controls the pass visited
    pub processed: usize,

    /// Controls whose handler failed; the rest of the pass went ahead
    pub failures: Vec<ControlFailure>,
}

/// A per-control failure inside a save or load pass
#[derive(Debug)]
pub struct ControlFailure {
    pub key: String,
    pub error: Error,
}

impl OperationReport {
    /// True if every control was handled
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of controls handled without error
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.processed - self.failures.len()
    }

    fn record(&mut self, operation: &str, key: &str, result: Result<()>) {
        self.processed += 1;
        if let Err(e) = result {
            error!("Failed to {} '{}': {}", operation, key, e);
            self.failures.push(ControlFailure {
                key: key.to_string(),
                error: e,
            });
        }
    }
}

impl SettingsManager {
    /// Create a manager over `store` with the default configuration and
    /// the built-in handlers.
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        let config = ManagerConfig::default();
        let registry = HandlerRegistry::with_defaults(config.float_tolerance);
        Self::from_parts(config, store, registry)
    }

    /// Create a manager over `store` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_config(config: ManagerConfig, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        config.validate()?;
        let registry = HandlerRegistry::with_defaults(config.float_tolerance);
        Ok(Self::from_parts(config, store, registry))
    }

    /// Create a builder for a manager backed by a TOML file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use wsman::SettingsManager;
    ///
    /// let manager = SettingsManager::builder("acme", "editor")
    ///     .config_dir("~/.config/acme")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(
        organization: impl Into<String>,
        application: impl Into<String>,
    ) -> SettingsManagerBuilder {
        SettingsManagerBuilder::new(organization, application)
    }

    pub(crate) fn from_parts(
        config: ManagerConfig,
        store: Arc<dyn SnapshotStore>,
        registry: HandlerRegistry,
    ) -> Self {
        debug!(
            "Creating settings manager (custom data prefix '{}')",
            config.custom_data_prefix
        );
        Self {
            config,
            store,
            registry: RwLock::new(registry),
            skipped: RwLock::new(SkipSet::default()),
            root: RwLock::new(None),
            touched: Arc::new(TouchedState::new()),
            wiring: RwLock::new(HashMap::new()),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Get the default snapshot store
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Bind the root of the control tree. The manager keeps only a weak
    /// reference; once the tree is dropped every pass sees no controls.
    pub fn set_root(&self, root: &ControlRef) {
        debug!(
            "Binding root control {}",
            TypeTag::of_control(root.as_ref()).name()
        );
        *self.root.write_recovered() = Some(Arc::downgrade(root));
    }

    /// The bound root, if it is still alive
    pub fn root(&self) -> Option<ControlRef> {
        self.root.read_recovered().as_ref().and_then(Weak::upgrade)
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// Register `handler` for controls whose runtime type is `tag`,
    /// replacing any previous handler. Takes effect on the next pass.
    pub fn register_handler(&self, tag: TypeTag, handler: Arc<dyn StateHandler>) {
        self.registry.write_recovered().register(tag, handler);
    }

    /// Register `handler` for control type `T`
    pub fn register_handler_for<T: Control>(&self, handler: impl StateHandler + 'static) {
        self.registry.write_recovered().register_for::<T>(handler);
    }

    /// Remove an application handler, restoring the built-in default (if any)
    pub fn unregister_handler(&self, tag: TypeTag) -> Option<Arc<dyn StateHandler>> {
        self.registry.write_recovered().unregister(tag)
    }

    /// Handler that would be used for `control`
    pub fn handler_for(&self, control: &dyn Control) -> Option<Arc<dyn StateHandler>> {
        self.registry.read_recovered().resolve(control)
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Controls the next pass would act on: marker present, not skipped,
    /// handler resolved. Controls keyed inside the custom data namespace
    /// are listed too; passes report them as failures.
    pub fn managed_controls(&self) -> Vec<ManagedControl> {
        self.collect()
    }

    pub(crate) fn collect(&self) -> Vec<ManagedControl> {
        let Some(root) = self.root() else {
            warn!("No live root control bound; nothing to manage");
            return Vec::new();
        };
        // Clone out so handlers never run under the registry lock
        let registry = self.registry.read_recovered().clone();
        let skipped = self.skipped.read_recovered();
        traversal::collect(&root, &registry, &skipped)
    }

    /// Reject control keys that fall inside the custom data namespace
    pub(crate) fn check_control_key(&self, key: &str) -> Result<()> {
        let prefix = &self.config.custom_data_prefix;
        let reserved = key == prefix
            || key
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'));
        if reserved {
            return Err(Error::ReservedKey(key.to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("config", &self.config)
            .field("touched", &self.touched.get())
            .field("skipped", &self.skipped.read_recovered().len())
            .field("wired", &self.wiring.read_recovered().len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
