//! Discovery of managed controls in a UI tree

use crate::control::{Control, ControlId, ControlRef, TypeTag, managed_key};
use crate::handler::{HandlerRegistry, StateHandler};
use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// A control found by traversal, paired with its key and resolved handler
#[derive(Clone)]
pub struct ManagedControl {
    /// Snapshot-store key (the management marker)
    pub key: String,

    /// The control itself
    pub control: ControlRef,

    /// Handler resolved for the control's runtime type
    pub handler: Arc<dyn StateHandler>,
}

impl std::fmt::Debug for ManagedControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedControl")
            .field("key", &self.key)
            .field("type", &TypeTag::of_control(self.control.as_ref()).name())
            .finish_non_exhaustive()
    }
}

/// Controls excluded from every pass, by reference identity.
///
/// Entries hold a [`Weak`] handle, which keeps the allocation (and so the
/// address behind the [`ControlId`]) from being reused while the entry exists.
#[derive(Default)]
pub(crate) struct SkipSet {
    entries: HashMap<ControlId, Weak<dyn Control>>,
}

impl SkipSet {
    /// Returns false if the control was already skipped
    pub(crate) fn insert(&mut self, control: &ControlRef) -> bool {
        self.prune();
        self.entries
            .insert(ControlId::of(control), Arc::downgrade(control))
            .is_none()
    }

    /// Returns false if the control was not skipped
    pub(crate) fn remove(&mut self, control: &ControlRef) -> bool {
        self.entries.remove(&ControlId::of(control)).is_some()
    }

    pub(crate) fn contains(&self, control: &ControlRef) -> bool {
        self.entries.contains_key(&ControlId::of(control))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop entries whose control no longer exists
    fn prune(&mut self) {
        self.entries.retain(|_, control| control.strong_count() > 0);
    }
}

/// Depth-first, pre-order walk from `root` collecting managed controls.
///
/// Skipped nodes are not collected but their children are still visited.
/// Nodes without a marker or without a handler are walked through silently.
pub(crate) fn collect(
    root: &ControlRef,
    registry: &HandlerRegistry,
    skipped: &SkipSet,
) -> Vec<ManagedControl> {
    let mut found = Vec::new();
    visit(root, registry, skipped, &mut found);
    found
}

fn visit(
    node: &ControlRef,
    registry: &HandlerRegistry,
    skipped: &SkipSet,
    found: &mut Vec<ManagedControl>,
) {
    if skipped.contains(node) {
        trace!("Skipping {}", TypeTag::of_control(node.as_ref()).name());
    } else if let Some(key) = managed_key(node.as_ref()) {
        match registry.resolve(node.as_ref()) {
            Some(handler) => found.push(ManagedControl {
                key,
                control: node.clone(),
                handler,
            }),
            None => trace!(
                "No handler for '{}' ({})",
                key,
                TypeTag::of_control(node.as_ref()).name()
            ),
        }
    }

    for child in node.children() {
        visit(&child, registry, skipped, found);
    }
}

// =============================================================================
// Tests
// =============================================================================
