//! Handler Registry Integration Tests
//!
//! Tests for plugging in control types and handlers:
//! - Third-party controls with their own handler
//! - Overriding a built-in handler
//! - Exact runtime type matching
//! - Re-registration and unregistration
//! - Handler failures are reported per control

mod common;

use common::memory_manager;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use wsman::widgets::{Container, LineEdit};
use wsman::{
    ChangeSource, Control, ControlRef, Error, Result, Signal, SnapshotStore, StateHandler,
    StoreValue, TypeTag, downcast,
};

// =============================================================================
// Test Controls
// =============================================================================

/// A rotary control the crate knows nothing about
struct Dial {
    key: String,
    angle: RwLock<i64>,
    turned: Arc<Signal<i64>>,
}

impl Dial {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            angle: RwLock::new(0),
            turned: Arc::new(Signal::new()),
        }
    }

    fn angle(&self) -> i64 {
        *self.angle.read().unwrap()
    }

    fn turn(&self, angle: i64) {
        *self.angle.write().unwrap() = angle;
        self.turned.emit(&angle);
    }
}

impl Control for Dial {
    fn settings_key(&self) -> Option<String> {
        Some(self.key.clone())
    }
}

struct DialHandler;

impl StateHandler for DialHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let dial = downcast::<Dial>(control, key)?;
        store.set(&format!("{key}/angle"), StoreValue::Int(dial.angle()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let dial = downcast::<Dial>(control, key)?;
        if let Some(angle) = store.get_int(&format!("{key}/angle"))? {
            *dial.angle.write().unwrap() = angle;
        }
        Ok(())
    }

    fn compare(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<bool> {
        let dial = downcast::<Dial>(control, key)?;
        let stored = store.get_int(&format!("{key}/angle"))?.unwrap_or(0);
        Ok(dial.angle() != stored)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<Dial>()
            .map(|dial| {
                let turned: Arc<dyn ChangeSource> = dial.turned.clone();
                vec![turned]
            })
            .unwrap_or_default()
    }
}

/// Wraps a line edit without being one
struct LabeledEdit {
    edit: Arc<LineEdit>,
}

impl Control for LabeledEdit {
    fn settings_key(&self) -> Option<String> {
        Some("labeled".into())
    }

    fn children(&self) -> Vec<ControlRef> {
        vec![self.edit.clone()]
    }
}

/// Stores line edits upper-cased and counts calls
#[derive(Default)]
struct ShoutingHandler {
    saves: AtomicUsize,
}

impl StateHandler for ShoutingHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let edit = downcast::<LineEdit>(control, key)?;
        store.set(key, StoreValue::String(edit.text().to_uppercase()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let edit = downcast::<LineEdit>(control, key)?;
        if let Some(text) = store.get_string(key)? {
            edit.set_text(&text.to_lowercase());
        }
        Ok(())
    }

    fn compare(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<bool> {
        let edit = downcast::<LineEdit>(control, key)?;
        Ok(store.get_string(key)?.unwrap_or_default() != edit.text().to_uppercase())
    }

    fn signals_to_monitor(&self, _control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        Vec::new()
    }
}

/// Fails every operation
struct BrokenHandler;

impl StateHandler for BrokenHandler {
    fn save(&self, _control: &dyn Control, key: &str, _store: &dyn SnapshotStore) -> Result<()> {
        Err(Error::Handler {
            key: key.to_string(),
            reason: "broken on purpose".into(),
        })
    }

    fn load(&self, _control: &dyn Control, key: &str, _store: &dyn SnapshotStore) -> Result<()> {
        Err(Error::Handler {
            key: key.to_string(),
            reason: "broken on purpose".into(),
        })
    }

    fn compare(&self, _control: &dyn Control, key: &str, _store: &dyn SnapshotStore) -> Result<bool> {
        Err(Error::Handler {
            key: key.to_string(),
            reason: "broken on purpose".into(),
        })
    }

    fn signals_to_monitor(&self, _control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        Vec::new()
    }
}

// =============================================================================
// Third-Party Controls
// =============================================================================

#[test]
fn test_unregistered_control_is_ignored() {
    let dial = Arc::new(Dial::new("dial"));
    let root: ControlRef = Arc::new(Container::with_children([dial.clone() as ControlRef]));
    let (manager, store) = memory_manager(&root);

    dial.turn(90);
    let report = manager.save_state().unwrap();
    assert_eq!(report.processed, 0);
    assert!(store.is_empty());
    assert!(!manager.has_unsaved_changes());
}

#[test]
fn test_custom_control_with_handler() {
    let dial = Arc::new(Dial::new("dial"));
    let root: ControlRef = Arc::new(Container::with_children([dial.clone() as ControlRef]));
    let (manager, store) = memory_manager(&root);
    manager.register_handler_for::<Dial>(DialHandler);

    manager.load_state().unwrap();
    dial.turn(90);
    assert!(manager.is_touched());
    assert!(manager.has_unsaved_changes());

    manager.save_state().unwrap();
    assert_eq!(store.get_int("dial/angle").unwrap(), Some(90));
    assert!(!manager.has_unsaved_changes());

    dial.turn(180);
    manager.load_state().unwrap();
    assert_eq!(dial.angle(), 90);
    assert!(!manager.is_touched());
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn test_override_builtin_handler() {
    let name = Arc::new(LineEdit::new("quiet").with_key("name"));
    let root: ControlRef = Arc::new(Container::with_children([name.clone() as ControlRef]));
    let (manager, store) = memory_manager(&root);
    manager.register_handler_for::<LineEdit>(ShoutingHandler::default());

    manager.save_state().unwrap();
    assert_eq!(store.get_string("name").unwrap().as_deref(), Some("QUIET"));
    assert!(!manager.has_unsaved_changes());

    // The override monitors nothing
    manager.mark_untouched();
    name.set_text("louder");
    assert!(!manager.is_touched());
}

#[test]
fn test_last_registration_wins() {
    let name = Arc::new(LineEdit::new("x").with_key("name"));
    let root: ControlRef = Arc::new(Container::with_children([name.clone() as ControlRef]));
    let (manager, _store) = memory_manager(&root);

    let first = Arc::new(ShoutingHandler::default());
    let second = Arc::new(ShoutingHandler::default());
    manager.register_handler(TypeTag::of::<LineEdit>(), first.clone());
    manager.register_handler(TypeTag::of::<LineEdit>(), second.clone());

    manager.save_state().unwrap();
    assert_eq!(first.saves.load(Ordering::SeqCst), 0);
    assert_eq!(second.saves.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unregister_restores_builtin() {
    let name = Arc::new(LineEdit::new("quiet").with_key("name"));
    let root: ControlRef = Arc::new(Container::with_children([name.clone() as ControlRef]));
    let (manager, store) = memory_manager(&root);

    manager.register_handler_for::<LineEdit>(ShoutingHandler::default());
    assert!(manager.unregister_handler(TypeTag::of::<LineEdit>()).is_some());
    assert!(manager.unregister_handler(TypeTag::of::<LineEdit>()).is_none());

    manager.save_state().unwrap();
    assert_eq!(store.get_string("name").unwrap().as_deref(), Some("quiet"));
}

#[test]
fn test_handler_matches_exact_type_only() {
    let inner = Arc::new(LineEdit::new("inner").with_key("inner"));
    let labeled = Arc::new(LabeledEdit {
        edit: inner.clone(),
    });
    let root: ControlRef = Arc::new(Container::with_children([labeled.clone() as ControlRef]));
    let (manager, store) = memory_manager(&root);

    // The wrapper has a marker but no handler; its child is still reached
    let keys: Vec<String> = manager
        .managed_controls()
        .into_iter()
        .map(|managed| managed.key)
        .collect();
    assert_eq!(keys, vec!["inner".to_string()]);
    assert!(manager.handler_for(labeled.as_ref()).is_none());

    manager.save_state().unwrap();
    assert!(!store.contains("labeled").unwrap());
    assert_eq!(store.get_string("inner").unwrap().as_deref(), Some("inner"));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_handler_failure_does_not_stop_pass() {
    let dial = Arc::new(Dial::new("dial"));
    let name = Arc::new(LineEdit::new("kept").with_key("name"));
    let root: ControlRef = Arc::new(Container::with_children([
        dial.clone() as ControlRef,
        name.clone() as ControlRef,
    ]));
    let (manager, store) = memory_manager(&root);
    manager.register_handler_for::<Dial>(BrokenHandler);

    let report = manager.save_state().unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failures[0].key, "dial");
    assert!(matches!(report.failures[0].error, Error::Handler { .. }));
    assert_eq!(store.get_string("name").unwrap().as_deref(), Some("kept"));

    let report = manager.load_state().unwrap();
    assert!(!report.is_success());
    assert!(!manager.has_unsaved_changes());
}

#[test]
fn test_mismatched_handler_is_reported() {
    let dial = Arc::new(Dial::new("dial"));
    let root: ControlRef = Arc::new(Container::with_children([dial.clone() as ControlRef]));
    let (manager, _store) = memory_manager(&root);
    // A handler written for a different control type
    manager.register_handler_for::<Dial>(ShoutingHandler::default());

    let report = manager.save_state().unwrap();
    assert!(matches!(
        report.failures[0].error,
        Error::HandlerMismatch { .. }
    ));
}
