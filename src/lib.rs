//! # wsman - Widget State Manager
//!
//! A toolkit-neutral Rust library for persisting and restoring the
//! interactive state of a tree of UI controls, and for tracking whether that
//! state changed since it was last saved or loaded.
//!
//! ## Features
//!
//! - **Save / Load**: Walk a control tree and persist every managed control
//!   through a per-type [`StateHandler`]
//! - **Touched Tracking**: One boolean per manager, flipped by control change
//!   signals and custom data writes, reset by save and load
//! - **Unsaved Changes**: Non-mutating compare of the live tree against the
//!   default store, another store or a TOML file
//! - **Skip Set**: Exclude individual controls (by identity) from every pass
//! - **Custom Data**: Arbitrary serde values stored next to control state
//! - **TOML Store**: Human-editable, lossless settings file with atomic writes
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wsman::widgets::{CheckBox, LineEdit, Window};
//! use wsman::{ControlRef, MemoryStore, SettingsManager};
//!
//! let name = Arc::new(LineEdit::new("").with_key("name"));
//! let notify = Arc::new(CheckBox::new(false).with_key("notify"));
//!
//! let window = Window::new().with_key("main");
//! window.add_child(name.clone());
//! window.add_child(notify.clone());
//! let root: ControlRef = Arc::new(window);
//!
//! let manager = SettingsManager::new(Arc::new(MemoryStore::new()));
//! manager.set_root(&root);
//! manager.load_state()?;
//!
//! notify.set_checked(true);
//! assert!(manager.is_touched());
//! assert!(manager.has_unsaved_changes());
//!
//! manager.save_state()?;
//! assert!(!manager.is_touched());
//! assert!(!manager.has_unsaved_changes());
//! # Ok::<(), wsman::Error>(())
//! ```
//!
//! ## Managing Your Own Control Types
//!
//! Implement [`Control`] for the control and [`StateHandler`] for its state,
//! then register the handler:
//!
//! ```rust
//! use std::sync::{Arc, RwLock};
//! use wsman::{
//!     ChangeSource, Control, MemoryStore, Result, SettingsManager, SnapshotStore, StateHandler,
//!     StoreValue, downcast,
//! };
//!
//! struct Dial {
//!     key: String,
//!     angle: RwLock<i64>,
//! }
//!
//! impl Control for Dial {
//!     fn settings_key(&self) -> Option<String> {
//!         Some(self.key.clone())
//!     }
//! }
//!
//! struct DialHandler;
//!
//! impl StateHandler for DialHandler {
//!     fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
//!         let dial = downcast::<Dial>(control, key)?;
//!         let angle = *dial.angle.read().unwrap();
//!         store.set(key, StoreValue::Int(angle))
//!     }
//!
//!     fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
//!         let dial = downcast::<Dial>(control, key)?;
//!         if let Some(angle) = store.get_int(key)? {
//!             *dial.angle.write().unwrap() = angle;
//!         }
//!         Ok(())
//!     }
//!
//!     fn compare(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<bool> {
//!         let dial = downcast::<Dial>(control, key)?;
//!         Ok(*dial.angle.read().unwrap() != store.get_int(key)?.unwrap_or(0))
//!     }
//!
//!     fn signals_to_monitor(&self, _control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
//!         Vec::new()
//!     }
//! }
//!
//! let manager = SettingsManager::new(Arc::new(MemoryStore::new()));
//! manager.register_handler_for::<Dial>(DialHandler);
//! ```
//!
//! ## Custom Data
//!
//! ```rust
//! use std::sync::Arc;
//! use wsman::{MemoryStore, SettingsManager};
//!
//! let manager = SettingsManager::new(Arc::new(MemoryStore::new()));
//! manager.save_custom_data("recent", &vec!["a.txt", "b.txt"])?;
//! assert!(manager.is_touched());
//!
//! let recent: Option<Vec<String>> = manager.load_custom_data("recent")?;
//! assert_eq!(recent.unwrap().len(), 2);
//! # Ok::<(), wsman::Error>(())
//! ```

// Core modules
mod control;
mod error;
mod handler;
mod manager;
mod signal;
mod sync;
mod touched;
mod traversal;

// Grouped modules
pub mod config;
pub mod store;
pub mod widgets;

// Re-exports from core
pub use control::{AsAny, Control, ControlId, ControlRef, TypeTag, downcast};
pub use error::{Error, Result};
pub use handler::{HandlerRegistry, StateHandler};
pub use manager::{
    CompareSource, ControlFailure, OperationReport, SettingsManager, SettingsManagerBuilder,
};
pub use signal::{ChangeCallback, ChangeSource, Listener, Signal, Subscription, SubscriptionId};
pub use touched::{ListenerId, TouchedCallback, TouchedState};
pub use traversal::ManagedControl;

// Re-exports from grouped modules
pub use config::{ManagerConfig, ManagerConfigBuilder};
pub use store::{MemoryStore, SnapshotStore, StoreValue, TomlStore, ValueKind};
