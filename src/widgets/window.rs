//! Top-level window model

use super::{Children, Marker, Observable, managed_widget};
use crate::control::{Control, ControlRef, downcast};
use crate::error::{Error, Result};
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::store::{SnapshotStore, StoreValue};
use std::sync::Arc;

/// Window placement on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

impl WindowGeometry {
    const ENCODED_LEN: usize = 17;

    /// Geometry with the given position and size, not maximized
    #[must_use]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            maximized: false,
        }
    }

    /// Encode as a fixed-size little-endian blob
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        bytes.extend_from_slice(&self.x.to_le_bytes());
        bytes.extend_from_slice(&self.y.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.push(u8::from(self.maximized));
        bytes
    }

    /// Decode a blob produced by [`WindowGeometry::to_bytes`]
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return None;
        }
        let word = |at: usize| -> [u8; 4] { [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]] };
        Some(Self {
            x: i32::from_le_bytes(word(0)),
            y: i32::from_le_bytes(word(4)),
            width: u32::from_le_bytes(word(8)),
            height: u32::from_le_bytes(word(12)),
            maximized: bytes[16] != 0,
        })
    }
}

/// Top-level window: geometry, an opaque state blob (toolbars, docks) and
/// child controls.
pub struct Window {
    marker: Marker,
    children: Children,
    geometry: Observable<WindowGeometry>,
    state: Observable<Vec<u8>>,
}

impl Window {
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            children: Children::default(),
            geometry: Observable::new(WindowGeometry::default()),
            state: Observable::new(Vec::new()),
        }
    }

    pub fn add_child(&self, child: ControlRef) {
        self.children.push(child);
    }

    pub fn remove_child(&self, child: &ControlRef) -> bool {
        self.children.remove(child)
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry.get()
    }

    pub fn set_geometry(&self, geometry: WindowGeometry) {
        self.geometry.set(geometry);
    }

    pub fn state(&self) -> Vec<u8> {
        self.state.get()
    }

    pub fn set_state(&self, state: Vec<u8>) {
        self.state.set(state);
    }

    pub fn geometry_changed(&self) -> &Arc<Signal<WindowGeometry>> {
        self.geometry.signal()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(Window, children);

/// Saves `<key>/geometry` and `<key>/state`. Window moves are not user edits,
/// so nothing is monitored.
pub struct WindowHandler;

fn geometry_key(key: &str) -> String {
    format!("{key}/geometry")
}

fn state_key(key: &str) -> String {
    format!("{key}/state")
}

impl StateHandler for WindowHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let window = downcast::<Window>(control, key)?;
        store.set(
            &geometry_key(key),
            StoreValue::Bytes(window.geometry().to_bytes()),
        )?;
        store.set(&state_key(key), StoreValue::Bytes(window.state()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let window = downcast::<Window>(control, key)?;

        if let Some(bytes) = store.get_bytes(&geometry_key(key))? {
            let geometry = WindowGeometry::from_bytes(&bytes).ok_or_else(|| Error::Handler {
                key: key.to_string(),
                reason: format!("geometry blob has {} bytes", bytes.len()),
            })?;
            window.set_geometry(geometry);
        }
        if let Some(state) = store.get_bytes(&state_key(key))? {
            window.set_state(state);
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let window = downcast::<Window>(control, key)?;
        // Never saved means the default placement and no state
        let stored_geometry = store
            .get_bytes(&geometry_key(key))?
            .unwrap_or_else(|| WindowGeometry::default().to_bytes());
        let stored_state = store.get_bytes(&state_key(key))?.unwrap_or_default();

        Ok(stored_geometry != window.geometry().to_bytes() || stored_state != window.state())
    }

    fn signals_to_monitor(&self, _control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        Vec::new()
    }
}
