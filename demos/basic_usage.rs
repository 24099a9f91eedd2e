// Basic usage example for wsman
//
// Run with: cargo run --example basic_usage

use std::sync::Arc;
use wsman::widgets::{CheckBox, ComboBox, GroupBox, LineEdit, SpinBox, Window, WindowGeometry};
use wsman::{ControlRef, SettingsManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Build a small preferences window
    let name = Arc::new(LineEdit::new("").with_key("user_name"));
    let theme = Arc::new(ComboBox::with_items(["light", "dark", "auto"]).with_key("theme"));
    let autosave = Arc::new(CheckBox::new(false).with_key("autosave"));
    let interval = Arc::new(SpinBox::new().with_range(1, 60).with_key("autosave_minutes"));

    let advanced = Arc::new(GroupBox::new().with_key("advanced"));
    advanced.add_child(autosave.clone());
    advanced.add_child(interval.clone());

    let window = Arc::new(Window::new().with_key("preferences"));
    window.add_child(name.clone());
    window.add_child(theme.clone());
    window.add_child(advanced.clone());
    let root: ControlRef = window.clone();

    let manager = SettingsManager::builder("wsman-demo", "preferences")
        .config_dir("./example_config")
        .build()?;
    manager.set_root(&root);

    println!("🪟 wsman Basic Usage Example\n");

    manager.on_touched_changed(|touched| {
        let marker = if touched { "*" } else { "" };
        println!("   title bar: Preferences{marker}");
    });

    // Restore the previous session
    let report = manager.load_state()?;
    println!(
        "📂 Loaded {} controls ({} failed)",
        report.processed,
        report.failures.len()
    );
    println!("   user name: {:?}", name.text());
    println!("   theme:     {}\n", theme.current_text());

    // The user edits a few things
    println!("✏️  Editing...");
    name.set_text("Ada");
    theme.set_current_index(1);
    autosave.set_checked(true);
    interval.set_value(5);
    window.set_geometry(WindowGeometry::new(120, 80, 640, 480));
    println!(
        "   touched: {}, unsaved changes: {}\n",
        manager.is_touched(),
        manager.has_unsaved_changes()
    );

    // Remember something that is not a control
    manager.save_custom_data("recent_files", &["notes.txt", "todo.md"])?;
    let recent: Option<Vec<String>> = manager.load_custom_data("recent_files")?;
    println!("📋 Recent files: {:?}\n", recent.unwrap_or_default());

    // Keep the user name out of the settings file
    manager.skip_widget(&name);

    println!("💾 Saving...");
    let report = manager.save_state()?;
    println!("✅ Saved {} controls", report.succeeded());
    println!(
        "   touched: {}, unsaved changes: {}\n",
        manager.is_touched(),
        manager.has_unsaved_changes()
    );

    // Change our mind and revert to what is on disk
    println!("↩️  Reverting an edit...");
    theme.set_current_index(2);
    println!("   unsaved changes: {}", manager.has_unsaved_changes());
    manager.load_state()?;
    println!("✅ Theme restored to: {}\n", theme.current_text());

    println!(
        "💾 Settings file location: {}",
        manager.config().settings_path().display()
    );

    Ok(())
}
