//! Common test utilities for wsman integration tests
//!
//! Provides a representative control tree, manager fixtures and helpers.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wsman::widgets::{
    CheckBox, ComboBox, Container, DoubleSpinBox, GroupBox, LineEdit, PushButton, RadioButton,
    Slider, SpinBox, TabWidget, TextEdit, Window, WindowGeometry,
};
use wsman::{ControlRef, MemoryStore, SettingsManager};

/// Install a test logger once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Test Control Tree
// =============================================================================

/// A main window holding one of every built-in widget.
///
/// ```text
/// Window "main"
/// ├── LineEdit "name"
/// ├── TextEdit "notes"
/// ├── GroupBox "advanced" (checkable)
/// │   ├── CheckBox "notify"
/// │   ├── RadioButton "mode_fast"
/// │   └── RadioButton "mode_safe"
/// ├── Container (unmanaged)
/// │   ├── ComboBox "color"
/// │   ├── ComboBox "size" (editable)
/// │   ├── SpinBox "count"
/// │   ├── DoubleSpinBox "ratio"
/// │   └── Slider "volume"
/// ├── PushButton "bold" (checkable)
/// └── TabWidget "tabs"
///     ├── Container (page 1)
///     │   └── LineEdit "page1_field"
///     └── Container (page 2)
/// ```
pub struct TestWindow {
    pub root: ControlRef,
    pub window: Arc<Window>,
    pub name: Arc<LineEdit>,
    pub notes: Arc<TextEdit>,
    pub advanced: Arc<GroupBox>,
    pub notify: Arc<CheckBox>,
    pub mode_fast: Arc<RadioButton>,
    pub mode_safe: Arc<RadioButton>,
    pub panel: Arc<Container>,
    pub color: Arc<ComboBox>,
    pub size: Arc<ComboBox>,
    pub count: Arc<SpinBox>,
    pub ratio: Arc<DoubleSpinBox>,
    pub volume: Arc<Slider>,
    pub bold: Arc<PushButton>,
    pub tabs: Arc<TabWidget>,
    pub page1_field: Arc<LineEdit>,
}

impl TestWindow {
    pub fn new() -> Self {
        let name = Arc::new(LineEdit::new("").with_key("name"));
        let notes = Arc::new(TextEdit::new("").with_key("notes"));

        let notify = Arc::new(CheckBox::new(false).with_key("notify"));
        let mode_fast = Arc::new(RadioButton::new(true).with_key("mode_fast"));
        let mode_safe = Arc::new(RadioButton::new(false).with_key("mode_safe"));
        let advanced = Arc::new(GroupBox::new().checkable(true).with_key("advanced"));
        advanced.add_child(notify.clone());
        advanced.add_child(mode_fast.clone());
        advanced.add_child(mode_safe.clone());

        let color = Arc::new(ComboBox::with_items(["red", "green", "blue"]).with_key("color"));
        let size = Arc::new(
            ComboBox::with_items(["small", "large"])
                .editable(true)
                .with_key("size"),
        );
        let count = Arc::new(SpinBox::new().with_range(0, 100).with_key("count"));
        let ratio = Arc::new(DoubleSpinBox::new().with_range(0.0, 1.0).with_key("ratio"));
        let volume = Arc::new(Slider::new().with_range(0, 100).with_key("volume"));
        let panel = Arc::new(Container::with_children([
            color.clone() as ControlRef,
            size.clone() as ControlRef,
            count.clone() as ControlRef,
            ratio.clone() as ControlRef,
            volume.clone() as ControlRef,
        ]));

        let bold = Arc::new(PushButton::new().checkable(true).with_key("bold"));

        let page1_field = Arc::new(LineEdit::new("").with_key("page1_field"));
        let tabs = Arc::new(TabWidget::new().with_key("tabs"));
        tabs.add_page(Arc::new(Container::with_children([
            page1_field.clone() as ControlRef
        ])));
        tabs.add_page(Arc::new(Container::new()));

        let window = Arc::new(Window::new().with_key("main"));
        window.set_geometry(WindowGeometry::new(100, 100, 800, 600));
        window.add_child(name.clone());
        window.add_child(notes.clone());
        window.add_child(advanced.clone());
        window.add_child(panel.clone());
        window.add_child(bold.clone());
        window.add_child(tabs.clone());

        Self {
            root: window.clone(),
            window,
            name,
            notes,
            advanced,
            notify,
            mode_fast,
            mode_safe,
            panel,
            color,
            size,
            count,
            ratio,
            volume,
            bold,
            tabs,
            page1_field,
        }
    }

    /// Change every managed control away from its initial state
    pub fn edit_everything(&self) {
        self.window
            .set_geometry(WindowGeometry::new(50, 60, 1024, 768));
        self.window.set_state(vec![1, 2, 3]);
        self.name.set_text("Ada");
        self.notes.set_plain_text("first line\nsecond line");
        self.advanced.set_checked(true);
        self.notify.set_checked(true);
        self.mode_fast.set_checked(false);
        self.mode_safe.set_checked(true);
        self.color.set_current_index(2);
        self.size.set_edit_text("medium");
        self.count.set_value(42);
        self.ratio.set_value(0.25);
        self.volume.set_value(75);
        self.bold.set_checked(true);
        self.tabs.set_current_index(1);
        self.page1_field.set_text("inside a tab");
    }
}

impl Default for TestWindow {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture with a temporary directory, a TOML-backed manager and a
/// bound control tree
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub manager: SettingsManager,
    pub ui: TestWindow,
}

impl TestFixture {
    /// Create a new test fixture with default configuration
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = SettingsManager::builder("wsman-tests", "app")
            .config_dir(temp_dir.path())
            .build()
            .expect("Failed to create manager");
        let ui = TestWindow::new();
        manager.set_root(&ui.root);

        Self {
            temp_dir,
            manager,
            ui,
        }
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.temp_dir.path().join("app.toml")
    }

    /// A path inside the temp dir
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Manager over a fresh memory store, bound to `root`
pub fn memory_manager(root: &ControlRef) -> (SettingsManager, Arc<MemoryStore>) {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let manager = SettingsManager::new(store.clone());
    manager.set_root(root);
    (manager, store)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Counts touched transitions, split by direction
pub struct TouchedCounter {
    pub became_touched: Arc<AtomicUsize>,
    pub became_untouched: Arc<AtomicUsize>,
}

impl TouchedCounter {
    pub fn attach(manager: &SettingsManager) -> Self {
        let became_touched = Arc::new(AtomicUsize::new(0));
        let became_untouched = Arc::new(AtomicUsize::new(0));
        let (touched, untouched) = (became_touched.clone(), became_untouched.clone());
        manager.on_touched_changed(move |value| {
            let counter = if value { &touched } else { &untouched };
            counter.fetch_add(1, Ordering::SeqCst);
        });
        Self {
            became_touched,
            became_untouched,
        }
    }

    pub fn touched(&self) -> usize {
        self.became_touched.load(Ordering::SeqCst)
    }

    pub fn untouched(&self) -> usize {
        self.became_untouched.load(Ordering::SeqCst)
    }
}

/// Read the raw settings file content
pub fn read_settings_file(fixture: &TestFixture) -> Option<String> {
    std::fs::read_to_string(fixture.settings_path()).ok()
}
