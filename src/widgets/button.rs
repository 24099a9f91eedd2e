//! Two-state buttons

use super::{Marker, Observable, managed_widget, source};
use crate::control::{Control, downcast};
use crate::error::Result;
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::store::{SnapshotStore, StoreValue};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Check box
pub struct CheckBox {
    marker: Marker,
    checked: Observable<bool>,
}

impl CheckBox {
    #[must_use]
    pub fn new(checked: bool) -> Self {
        Self {
            marker: Marker::default(),
            checked: Observable::new(checked),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    /// Emitted with the new checked state
    pub fn state_changed(&self) -> &Arc<Signal<bool>> {
        self.checked.signal()
    }
}

managed_widget!(CheckBox);

/// Radio button. Exclusivity within a group is the UI layer's concern; each
/// button persists its own checked state.
pub struct RadioButton {
    marker: Marker,
    checked: Observable<bool>,
}

impl RadioButton {
    #[must_use]
    pub fn new(checked: bool) -> Self {
        Self {
            marker: Marker::default(),
            checked: Observable::new(checked),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }

    pub fn toggled(&self) -> &Arc<Signal<bool>> {
        self.checked.signal()
    }
}

managed_widget!(RadioButton);

/// Push button; only checkable (toggle) buttons carry state
pub struct PushButton {
    marker: Marker,
    checkable: AtomicBool,
    checked: Observable<bool>,
}

impl PushButton {
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            checkable: AtomicBool::new(false),
            checked: Observable::new(false),
        }
    }

    /// Make the button a toggle button (builder style)
    #[must_use]
    pub fn checkable(self, checkable: bool) -> Self {
        self.set_checkable(checkable);
        self
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

    /// Ignored unless the button is checkable
    pub fn set_checked(&self, checked: bool) {
        if self.is_checkable() {
            self.checked.set(checked);
        }
    }

    pub fn toggled(&self) -> &Arc<Signal<bool>> {
        self.checked.signal()
    }
}

impl Default for PushButton {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(PushButton);

// =============================================================================
// Handlers
// =============================================================================

fn load_checked(key: &str, store: &dyn SnapshotStore, apply: impl FnOnce(bool)) -> Result<()> {
    if let Some(checked) = store.get_bool(key)? {
        apply(checked);
    }
    Ok(())
}

fn checked_differs(current: bool, key: &str, store: &dyn SnapshotStore) -> Result<bool> {
    Ok(current != store.get_bool(key)?.unwrap_or(false))
}

/// Saves the checked state as a bool
pub struct CheckBoxHandler;

impl StateHandler for CheckBoxHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let check_box = downcast::<CheckBox>(control, key)?;
        store.set(key, StoreValue::Bool(check_box.is_checked()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let check_box = downcast::<CheckBox>(control, key)?;
        load_checked(key, store, |checked| check_box.set_checked(checked))
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let check_box = downcast::<CheckBox>(control, key)?;
        checked_differs(check_box.is_checked(), key, store)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<CheckBox>()
            .map(|check_box| vec![source(check_box.state_changed())])
            .unwrap_or_default()
    }
}

/// Saves the checked state as a bool. An absent value leaves the button
/// untouched so the group's default selection survives a first load.
pub struct RadioButtonHandler;

impl StateHandler for RadioButtonHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let radio = downcast::<RadioButton>(control, key)?;
        store.set(key, StoreValue::Bool(radio.is_checked()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let radio = downcast::<RadioButton>(control, key)?;
        load_checked(key, store, |checked| radio.set_checked(checked))
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let radio = downcast::<RadioButton>(control, key)?;
        checked_differs(radio.is_checked(), key, store)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<RadioButton>()
            .map(|radio| vec![source(radio.toggled())])
            .unwrap_or_default()
    }
}

/// Saves the checked state of toggle buttons; plain buttons are ignored
pub struct PushButtonHandler;

impl StateHandler for PushButtonHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let button = downcast::<PushButton>(control, key)?;
        if button.is_checkable() {
            store.set(key, StoreValue::Bool(button.is_checked()))?;
        }
        Ok(())
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let button = downcast::<PushButton>(control, key)?;
        if !button.is_checkable() {
            return Ok(());
        }
        load_checked(key, store, |checked| button.set_checked(checked))
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let button = downcast::<PushButton>(control, key)?;
        if !button.is_checkable() {
            return Ok(false);
        }
        checked_differs(button.is_checked(), key, store)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        match control.as_any().downcast_ref::<PushButton>() {
            Some(button) if button.is_checkable() => vec![source(button.toggled())],
            _ => Vec::new(),
        }
    }
}
