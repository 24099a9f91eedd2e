//! Grouping widgets

use super::{Children, Marker, Observable, managed_widget, source};
use crate::control::{Control, ControlRef, downcast};
use crate::error::Result;
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::store::{SnapshotStore, StoreValue};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Plain container (a panel or layout host). Carries no state of its own.
#[derive(Default)]
pub struct Container {
    marker: Marker,
    children: Children,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container holding `children`
    #[must_use]
    pub fn with_children(children: impl IntoIterator<Item = ControlRef>) -> Self {
        let container = Self::new();
        for child in children {
            container.add_child(child);
        }
        container
    }

    pub fn add_child(&self, child: ControlRef) {
        self.children.push(child);
    }

    pub fn remove_child(&self, child: &ControlRef) -> bool {
        self.children.remove(child)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

managed_widget!(Container, children);

/// Titled group of controls, optionally with its own check box
pub struct GroupBox {
    marker: Marker,
    children: Children,
    checkable: AtomicBool,
    checked: Observable<bool>,
}

impl GroupBox {
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            children: Children::default(),
            checkable: AtomicBool::new(false),
            checked: Observable::new(false),
        }
    }

    /// Make the group checkable (builder style)
    #[must_use]
    pub fn checkable(self, checkable: bool) -> Self {
        self.set_checkable(checkable);
        self
    }

    pub fn add_child(&self, child: ControlRef) {
        self.children.push(child);
    }

    pub fn is_checkable(&self) -> bool {
        self.checkable.load(Ordering::SeqCst)
    }

    pub fn set_checkable(&self, checkable: bool) {
        self.checkable.store(checkable, Ordering::SeqCst);
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    /// Ignored unless the group is checkable
    pub fn set_checked(&self, checked: bool) {
        if self.is_checkable() {
            self.checked.set(checked);
        }
    }

    pub fn toggled(&self) -> &Arc<Signal<bool>> {
        self.checked.signal()
    }
}

impl Default for GroupBox {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(GroupBox, children);

/// Persists the checked state of checkable groups. Non-checkable groups are
/// only traversed.
pub struct GroupBoxHandler;

impl StateHandler for GroupBoxHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let group = downcast::<GroupBox>(control, key)?;
        if group.is_checkable() {
            store.set(key, StoreValue::Bool(group.is_checked()))?;
        }
        Ok(())
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let group = downcast::<GroupBox>(control, key)?;
        if !group.is_checkable() {
            return Ok(());
        }
        if let Some(checked) = store.get_bool(key)? {
            group.set_checked(checked);
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let group = downcast::<GroupBox>(control, key)?;
        if !group.is_checkable() {
            return Ok(false);
        }
        Ok(group.is_checked() != store.get_bool(key)?.unwrap_or(false))
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        match control.as_any().downcast_ref::<GroupBox>() {
            Some(group) if group.is_checkable() => vec![source(group.toggled())],
            _ => Vec::new(),
        }
    }
}
