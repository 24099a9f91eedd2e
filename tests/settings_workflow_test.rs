//! Settings Workflow Integration Tests
//!
//! Tests for the complete save / load lifecycle including:
//! - The typing scenario (load, edit, save, compare, edit, reload)
//! - Round-trips of every built-in widget through the TOML file
//! - Idempotent saves
//! - Persistence across manager instances
//! - Saving to and loading from explicit files

mod common;

use common::{TestFixture, TestWindow, memory_manager, read_settings_file};
use std::sync::Arc;
use wsman::widgets::{Container, LineEdit, WindowGeometry};
use wsman::{ControlRef, Error, SettingsManager, SnapshotStore, StoreValue};

// =============================================================================
// Typing Scenario
// =============================================================================

#[test]
fn test_typing_scenario() {
    let name = Arc::new(LineEdit::new("").with_key("name"));
    let root: ControlRef = Arc::new(Container::with_children([name.clone() as ControlRef]));
    let (manager, store) = memory_manager(&root);

    manager.load_state().unwrap();
    assert_eq!(name.text(), "");
    assert!(!manager.is_touched());

    name.set_text("Ada");
    assert!(manager.is_touched());

    manager.save_state().unwrap();
    assert!(!manager.is_touched());
    assert_eq!(store.get_string("name").unwrap().as_deref(), Some("Ada"));
    assert!(!manager.has_unsaved_changes());

    name.set_text("Bob");
    assert!(manager.is_touched());
    assert!(manager.has_unsaved_changes());

    manager.load_state().unwrap();
    assert_eq!(name.text(), "Ada");
    assert!(!manager.is_touched());
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_every_widget_round_trips_through_file() {
    let fixture = TestFixture::new();
    let ui = &fixture.ui;

    fixture.manager.load_state().unwrap();
    ui.edit_everything();
    let report = fixture.manager.save_state().unwrap();
    assert!(report.is_success(), "{:?}", report.failures);

    // A fresh tree and manager over the same file
    let manager = SettingsManager::builder("wsman-tests", "app")
        .config_dir(fixture.temp_dir.path())
        .build()
        .unwrap();
    let restored = TestWindow::new();
    manager.set_root(&restored.root);
    manager.load_state().unwrap();

    assert_eq!(
        restored.window.geometry(),
        WindowGeometry::new(50, 60, 1024, 768)
    );
    assert_eq!(restored.window.state(), vec![1, 2, 3]);
    assert_eq!(restored.name.text(), "Ada");
    assert_eq!(restored.notes.plain_text(), "first line\nsecond line");
    assert!(restored.advanced.is_checked());
    assert!(restored.notify.is_checked());
    assert!(!restored.mode_fast.is_checked());
    assert!(restored.mode_safe.is_checked());
    assert_eq!(restored.color.current_index(), 2);
    assert_eq!(restored.size.current_text(), "medium");
    assert_eq!(restored.count.value(), 42);
    assert_eq!(restored.ratio.value(), 0.25);
    assert_eq!(restored.volume.value(), 75);
    assert!(restored.bold.is_checked());
    assert_eq!(restored.tabs.current_index(), 1);
    assert_eq!(restored.page1_field.text(), "inside a tab");

    assert!(!manager.has_unsaved_changes());
    assert!(!manager.is_touched());
}

#[test]
fn test_save_is_idempotent_on_disk() {
    let fixture = TestFixture::new();
    fixture.ui.edit_everything();

    fixture.manager.save_state().unwrap();
    let first = read_settings_file(&fixture).unwrap();
    fixture.manager.save_state().unwrap();
    let second = read_settings_file(&fixture).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_settings_file_layout() {
    let fixture = TestFixture::new();
    fixture.ui.name.set_text("Ada");
    fixture.manager.save_state().unwrap();

    let content = read_settings_file(&fixture).unwrap();
    assert!(content.contains("name = \"Ada\""));
    assert!(content.contains("[color]"));

    let table: toml::Table = toml::from_str(&content).unwrap();
    assert_eq!(table["color"]["currentIndex"].as_integer(), Some(0));
    assert_eq!(table["count"].as_integer(), Some(0));
    assert_eq!(table["notify"].as_bool(), Some(false));
    let geometry = table["main"]["geometry"].as_array().unwrap();
    assert_eq!(geometry.len(), 17);
}

#[test]
fn test_load_without_stored_values_keeps_controls() {
    let fixture = TestFixture::new();
    fixture.ui.name.set_text("typed before load");

    let report = fixture.manager.load_state().unwrap();
    assert!(report.is_success());
    assert_eq!(fixture.ui.name.text(), "typed before load");
    assert!(fixture.ui.mode_fast.is_checked());
}

// =============================================================================
// Explicit Files and Stores
// =============================================================================

#[test]
fn test_save_to_and_load_from_file() {
    let fixture = TestFixture::new();
    let snapshot = fixture.path("snapshots/profile.toml");

    fixture.ui.name.set_text("snapshot value");
    fixture.manager.save_to_file(&snapshot).unwrap();
    assert!(snapshot.exists());
    assert!(!fixture.manager.is_touched());

    fixture.ui.name.set_text("changed");
    fixture.manager.load_from_file(&snapshot).unwrap();
    assert_eq!(fixture.ui.name.text(), "snapshot value");
    assert!(!fixture.manager.is_touched());

    // The default store never saw the snapshot
    assert_eq!(fixture.manager.store().get_string("name").unwrap(), None);
}

#[test]
fn test_load_from_malformed_file_changes_nothing() {
    let fixture = TestFixture::new();
    let broken = fixture.path("broken.toml");
    std::fs::write(&broken, "name = \"unterminated\n").unwrap();

    fixture.manager.load_state().unwrap();
    fixture.ui.name.set_text("typed");
    assert!(fixture.manager.is_touched());

    let err = fixture.manager.load_from_file(&broken).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(fixture.ui.name.text(), "typed");
    assert!(fixture.manager.is_touched());

    // Subscriptions survived the failed load
    fixture.manager.mark_untouched();
    fixture.ui.name.set_text("typed again");
    assert!(fixture.manager.is_touched());
}

#[test]
fn test_save_state_to_other_store() {
    let ui = TestWindow::new();
    let (manager, store) = memory_manager(&ui.root);
    let other = wsman::MemoryStore::new();

    ui.name.set_text("elsewhere");
    manager.save_state_to(&other).unwrap();

    assert_eq!(
        other.get_string("name").unwrap().as_deref(),
        Some("elsewhere")
    );
    assert!(store.is_empty());
}

#[test]
fn test_reserved_control_key_is_reported() {
    let clash = Arc::new(LineEdit::new("x").with_key("customData/clash"));
    let name = Arc::new(LineEdit::new("y").with_key("name"));
    let root: ControlRef = Arc::new(Container::with_children([
        clash.clone() as ControlRef,
        name.clone() as ControlRef,
    ]));
    let (manager, store) = memory_manager(&root);

    let report = manager.save_state().unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, Error::ReservedKey(_)));
    assert!(!store.contains("customData/clash").unwrap());
    assert_eq!(store.get("name").unwrap(), Some(StoreValue::from("y")));
}

#[test]
fn test_dropped_tree_is_ignored() {
    let fixture = TestFixture::new();
    let TestFixture {
        temp_dir: _temp_dir,
        manager,
        ui,
    } = fixture;
    drop(ui);

    assert!(manager.managed_controls().is_empty());
    let report = manager.save_state().unwrap();
    assert_eq!(report.processed, 0);
    assert!(!manager.has_unsaved_changes());
}
