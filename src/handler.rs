//! State handlers and the handler registry
//!
//! A [`StateHandler`] knows how to save, load, compare and monitor one control
//! type. Handlers live outside the controls they manage, so third-party control
//! types can be managed and built-in behavior can be replaced per application
//! without touching the control type itself.

use crate::control::{Control, TypeTag};
use crate::error::Result;
use crate::signal::ChangeSource;
use crate::store::SnapshotStore;
use crate::widgets;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-control-type strategy for persisting and tracking state.
///
/// Every method receives the control, its identifier (the management marker)
/// and the store to act on. Handlers usually start with
/// [`downcast`](crate::downcast) to reach the concrete control type.
pub trait StateHandler: Send + Sync {
    /// Write the control's current state under `key` (and sub-keys of `key`).
    ///
    /// Must be idempotent: saving an unchanged control twice writes the same
    /// values.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()>;

    /// Apply stored state to the control. A missing value leaves the control
    /// unchanged and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or holds an unusable value.
    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()>;

    /// True if the control's current state differs from what is stored.
    ///
    /// A control that was never saved is compared against its empty state.
    /// Must not mutate the control or the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    fn compare(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore)
    -> Result<bool>;

    /// Change-event sources that mean "this control's state may have changed".
    ///
    /// An empty list hides the control from touched tracking; it is still
    /// saved, loaded and compared.
    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>>;
}

/// Maps control types to handlers.
///
/// Lookup is by exact runtime type: a handler registered for one type never
/// applies to another, even a wrapper around it. Registered handlers take
/// precedence over the built-in defaults; re-registering a type replaces the
/// previous handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    /// Handlers registered by the application
    overrides: HashMap<TypeTag, Arc<dyn StateHandler>>,

    /// Built-in handlers shipped with the crate
    defaults: HashMap<TypeTag, Arc<dyn StateHandler>>,
}

impl HandlerRegistry {
    /// Registry with no handlers at all
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in widget handlers as defaults
    ///
    /// `float_tolerance` is the absolute difference below which two
    /// floating-point values compare equal.
    #[must_use]
    pub fn with_defaults(float_tolerance: f64) -> Self {
        Self {
            overrides: HashMap::new(),
            defaults: widgets::default_handlers(float_tolerance)
                .into_iter()
                .collect(),
        }
    }

    /// Register `handler` for `tag`, replacing any previous registration
    pub fn register(&mut self, tag: TypeTag, handler: Arc<dyn StateHandler>) {
        debug!("Registering handler for type {}", tag.name());
        self.overrides.insert(tag, handler);
    }

    /// Register `handler` for control type `T`
    pub fn register_for<T: Control>(&mut self, handler: impl StateHandler + 'static) {
        self.register(TypeTag::of::<T>(), Arc::new(handler));
    }

    /// Remove the application handler for `tag`, falling back to the
    /// built-in default (if any). Returns the removed handler.
    pub fn unregister(&mut self, tag: TypeTag) -> Option<Arc<dyn StateHandler>> {
        self.overrides.remove(&tag)
    }

    /// Resolve the handler for `control`'s exact runtime type
    #[must_use]
    pub fn resolve(&self, control: &dyn Control) -> Option<Arc<dyn StateHandler>> {
        self.resolve_tag(TypeTag::of_control(control))
    }

    /// Resolve the handler for a type tag
    #[must_use]
    pub fn resolve_tag(&self, tag: TypeTag) -> Option<Arc<dyn StateHandler>> {
        self.overrides
            .get(&tag)
            .or_else(|| self.defaults.get(&tag))
            .cloned()
    }

    /// Check if any handler (registered or default) exists for `tag`
    #[must_use]
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.overrides.contains_key(&tag) || self.defaults.contains_key(&tag)
    }
}

// =============================================================================
// Tests
// =============================================================================
