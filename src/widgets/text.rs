//! Text inputs

use super::{Marker, Observable, managed_widget, source};
use crate::control::{Control, downcast};
use crate::error::Result;
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::store::{SnapshotStore, StoreValue};
use std::sync::Arc;

/// Single-line text input
pub struct LineEdit {
    marker: Marker,
    text: Observable<String>,
}

impl LineEdit {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            marker: Marker::default(),
            text: Observable::new(text.to_string()),
        }
    }

    pub fn text(&self) -> String {
        self.text.get()
    }

    pub fn set_text(&self, text: &str) {
        self.text.set(text.to_string());
    }

    pub fn clear(&self) {
        self.set_text("");
    }

    pub fn text_changed(&self) -> &Arc<Signal<String>> {
        self.text.signal()
    }
}

managed_widget!(LineEdit);

/// Multi-line plain text input
pub struct TextEdit {
    marker: Marker,
    text: Observable<String>,
}

impl TextEdit {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            marker: Marker::default(),
            text: Observable::new(text.to_string()),
        }
    }

    pub fn plain_text(&self) -> String {
        self.text.get()
    }

    pub fn set_plain_text(&self, text: &str) {
        self.text.set(text.to_string());
    }

    pub fn text_changed(&self) -> &Arc<Signal<String>> {
        self.text.signal()
    }
}

managed_widget!(TextEdit);

fn text_differs(current: &str, key: &str, store: &dyn SnapshotStore) -> Result<bool> {
    Ok(store.get_string(key)?.as_deref().unwrap_or_default() != current)
}

pub struct LineEditHandler;

impl StateHandler for LineEditHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let edit = downcast::<LineEdit>(control, key)?;
        store.set(key, StoreValue::String(edit.text()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let edit = downcast::<LineEdit>(control, key)?;
        if let Some(text) = store.get_string(key)? {
            edit.set_text(&text);
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let edit = downcast::<LineEdit>(control, key)?;
        text_differs(&edit.text(), key, store)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<LineEdit>()
            .map(|edit| vec![source(edit.text_changed())])
            .unwrap_or_default()
    }
}

pub struct TextEditHandler;

impl StateHandler for TextEditHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let edit = downcast::<TextEdit>(control, key)?;
        store.set(key, StoreValue::String(edit.plain_text()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let edit = downcast::<TextEdit>(control, key)?;
        if let Some(text) = store.get_string(key)? {
            edit.set_plain_text(&text);
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let edit = downcast::<TextEdit>(control, key)?;
        text_differs(&edit.plain_text(), key, store)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<TextEdit>()
            .map(|edit| vec![source(edit.text_changed())])
            .unwrap_or_default()
    }
}
