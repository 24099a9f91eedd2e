//! Index-based selectors: combo boxes and tab widgets

use super::{Children, Marker, Observable, managed_widget, source};
use crate::control::{Control, ControlRef, downcast};
use crate::error::Result;
use crate::handler::StateHandler;
use crate::signal::{ChangeSource, Signal};
use crate::store::{SnapshotStore, StoreValue};
use crate::sync::RwLockExt;
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Drop-down list, optionally with an editable text field.
///
/// The current index is -1 exactly when there are no items.
pub struct ComboBox {
    marker: Marker,
    items: RwLock<Vec<String>>,
    editable: AtomicBool,
    index: Observable<i64>,
    edit_text: Observable<String>,
}

impl ComboBox {
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            items: RwLock::new(Vec::new()),
            editable: AtomicBool::new(false),
            index: Observable::new(-1),
            edit_text: Observable::new(String::new()),
        }
    }

    /// Build a combo box holding `items`, with the first one selected
    #[must_use]
    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let combo = Self::new();
        for item in items {
            combo.add_item(item);
        }
        combo
    }

    /// Make the text field editable (builder style)
    #[must_use]
    pub fn editable(self, editable: bool) -> Self {
        self.editable.store(editable, Ordering::SeqCst);
        self
    }

    pub fn is_editable(&self) -> bool {
        self.editable.load(Ordering::SeqCst)
    }

    /// Append an item; the first item added becomes current
    pub fn add_item(&self, item: impl Into<String>) {
        let first = {
            let mut items = self.items.write_recovered();
            items.push(item.into());
            items.len() == 1
        };
        if first {
            self.set_current_index(0);
        }
    }

    pub fn items(&self) -> Vec<String> {
        self.items.read_recovered().clone()
    }

    pub fn count(&self) -> usize {
        self.items.read_recovered().len()
    }

    pub fn current_index(&self) -> i64 {
        self.index.get()
    }

    /// Select an item. Returns false (and changes nothing) for an invalid index.
    pub fn set_current_index(&self, index: i64) -> bool {
        let Some(text) = self.item_text(index) else {
            return false;
        };
        self.index.set(index);
        self.edit_text.set(text);
        true
    }

    /// Displayed text: the edit field when editable, the current item otherwise
    pub fn current_text(&self) -> String {
        if self.is_editable() {
            self.edit_text.get()
        } else {
            self.item_text(self.current_index()).unwrap_or_default()
        }
    }

    /// Set the edit field text. Ignored unless the combo box is editable.
    pub fn set_edit_text(&self, text: &str) {
        if self.is_editable() {
            self.edit_text.set(text.to_string());
        }
    }

    pub fn current_index_changed(&self) -> &Arc<Signal<i64>> {
        self.index.signal()
    }

    pub fn current_text_changed(&self) -> &Arc<Signal<String>> {
        self.edit_text.signal()
    }

    /// Index an untouched combo box would show
    fn empty_index(&self) -> i64 {
        if self.count() > 0 { 0 } else { -1 }
    }

    fn item_text(&self, index: i64) -> Option<String> {
        let index = usize::try_from(index).ok()?;
        self.items.read_recovered().get(index).cloned()
    }
}

impl Default for ComboBox {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(ComboBox);

/// Tabbed page container. Pages are the children; the current index is -1
/// exactly when there are no pages.
pub struct TabWidget {
    marker: Marker,
    children: Children,
    index: Observable<i64>,
}

impl TabWidget {
    #[must_use]
    pub fn new() -> Self {
        Self {
            marker: Marker::default(),
            children: Children::default(),
            index: Observable::new(-1),
        }
    }

    /// Append a page; the first page added becomes current
    pub fn add_page(&self, page: ControlRef) {
        self.children.push(page);
        if self.children.len() == 1 {
            self.index.set(0);
        }
    }

    pub fn count(&self) -> usize {
        self.children.len()
    }

    pub fn current_index(&self) -> i64 {
        self.index.get()
    }

    /// Switch page. Returns false (and changes nothing) for an invalid index.
    pub fn set_current_index(&self, index: i64) -> bool {
        if !self.contains(index) {
            return false;
        }
        self.index.set(index);
        true
    }

    pub fn current_changed(&self) -> &Arc<Signal<i64>> {
        self.index.signal()
    }

    fn contains(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|index| index < self.count())
    }
}

impl Default for TabWidget {
    fn default() -> Self {
        Self::new()
    }
}

managed_widget!(TabWidget, children);

// =============================================================================
// Handlers
// =============================================================================

fn index_key(key: &str) -> String {
    format!("{key}/currentIndex")
}

fn text_key(key: &str) -> String {
    format!("{key}/currentText")
}

/// Saves `<key>/currentIndex`, plus `<key>/currentText` for editable combo boxes
pub struct ComboBoxHandler;

impl StateHandler for ComboBoxHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let combo = downcast::<ComboBox>(control, key)?;
        store.set(&index_key(key), StoreValue::Int(combo.current_index()))?;
        if combo.is_editable() {
            store.set(&text_key(key), StoreValue::String(combo.current_text()))?;
        }
        Ok(())
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let combo = downcast::<ComboBox>(control, key)?;

        if let Some(index) = store.get_int(&index_key(key))? {
            if !combo.set_current_index(index) && combo.count() > 0 {
                warn!(
                    "Stored index {} for combo box '{}' is out of range, selecting the first item",
                    index, key
                );
                combo.set_current_index(0);
            }
        }
        if combo.is_editable() {
            if let Some(text) = store.get_string(&text_key(key))? {
                combo.set_edit_text(&text);
            }
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let combo = downcast::<ComboBox>(control, key)?;

        let stored_index = store
            .get_int(&index_key(key))?
            .unwrap_or_else(|| combo.empty_index());
        if stored_index != combo.current_index() {
            return Ok(true);
        }
        if combo.is_editable() {
            let stored_text = store.get_string(&text_key(key))?.unwrap_or_default();
            return Ok(stored_text != combo.current_text());
        }
        Ok(false)
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        let Some(combo) = control.as_any().downcast_ref::<ComboBox>() else {
            return Vec::new();
        };
        let mut sources = vec![source(combo.current_index_changed())];
        if combo.is_editable() {
            sources.push(source(combo.current_text_changed()));
        }
        sources
    }
}

/// Saves the current page index
pub struct TabWidgetHandler;

impl StateHandler for TabWidgetHandler {
    fn save(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let tabs = downcast::<TabWidget>(control, key)?;
        store.set(key, StoreValue::Int(tabs.current_index()))
    }

    fn load(&self, control: &dyn Control, key: &str, store: &dyn SnapshotStore) -> Result<()> {
        let tabs = downcast::<TabWidget>(control, key)?;
        if let Some(index) = store.get_int(key)? {
            if !tabs.set_current_index(index) {
                warn!(
                    "Stored page {} for tab widget '{}' is out of range ({} pages)",
                    index,
                    key,
                    tabs.count()
                );
            }
        }
        Ok(())
    }

    fn compare(
        &self,
        control: &dyn Control,
        key: &str,
        store: &dyn SnapshotStore,
    ) -> Result<bool> {
        let tabs = downcast::<TabWidget>(control, key)?;
        let empty = if tabs.count() > 0 { 0 } else { -1 };
        Ok(store.get_int(key)?.unwrap_or(empty) != tabs.current_index())
    }

    fn signals_to_monitor(&self, control: &dyn Control) -> Vec<Arc<dyn ChangeSource>> {
        control
            .as_any()
            .downcast_ref::<TabWidget>()
            .map(|tabs| vec![source(tabs.current_changed())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::widgets::Container;

    #[test]
    fn test_combo_box_index_round_trip() {
        let store = MemoryStore::new();
        let combo = ComboBox::with_items(["red", "green", "blue"]);
        assert!(combo.set_current_index(2));

        ComboBoxHandler.save(&combo, "color", &store).unwrap();
        assert_eq!(store.get_int("color/currentIndex").unwrap(), Some(2));
        assert!(!store.contains("color/currentText").unwrap());

        let restored = ComboBox::with_items(["red", "green", "blue"]);
        ComboBoxHandler.load(&restored, "color", &store).unwrap();
        assert_eq!(restored.current_text(), "blue");
    }

    #[test]
    fn test_combo_box_out_of_range_falls_back_to_first() {
        let store = MemoryStore::new();
        store.set("color/currentIndex", StoreValue::Int(9)).unwrap();

        let combo = ComboBox::with_items(["red", "green"]);
        combo.set_current_index(1);
        ComboBoxHandler.load(&combo, "color", &store).unwrap();
        assert_eq!(combo.current_index(), 0);
    }

    #[test]
    fn test_editable_combo_box_keeps_text() {
        let store = MemoryStore::new();
        let combo = ComboBox::with_items(["small", "large"]).editable(true);
        combo.set_edit_text("medium");

        ComboBoxHandler.save(&combo, "size", &store).unwrap();
        let restored = ComboBox::with_items(["small", "large"]).editable(true);
        ComboBoxHandler.load(&restored, "size", &store).unwrap();

        assert_eq!(restored.current_text(), "medium");
        assert!(!ComboBoxHandler.compare(&restored, "size", &store).unwrap());
        assert_eq!(ComboBoxHandler.signals_to_monitor(&restored).len(), 2);
    }

    #[test]
    fn test_empty_combo_box_matches_empty_store() {
        let store = MemoryStore::new();
        assert!(!ComboBoxHandler.compare(&ComboBox::new(), "c", &store).unwrap());
        assert!(!ComboBoxHandler
            .compare(&ComboBox::with_items(["a"]), "c", &store)
            .unwrap());
    }

    #[test]
    fn test_tab_widget_pages_are_children() {
        let tabs = TabWidget::new();
        assert_eq!(tabs.current_index(), -1);

        tabs.add_page(Arc::new(Container::new()));
        tabs.add_page(Arc::new(Container::new()));
        assert_eq!(tabs.current_index(), 0);
        assert_eq!(tabs.children().len(), 2);
    }

    #[test]
    fn test_tab_widget_applies_index_only_in_range() {
        let store = MemoryStore::new();
        let tabs = TabWidget::new();
        tabs.add_page(Arc::new(Container::new()));
        tabs.add_page(Arc::new(Container::new()));

        store.set("tabs", StoreValue::Int(5)).unwrap();
        TabWidgetHandler.load(&tabs, "tabs", &store).unwrap();
        assert_eq!(tabs.current_index(), 0);

        store.set("tabs", StoreValue::Int(1)).unwrap();
        TabWidgetHandler.load(&tabs, "tabs", &store).unwrap();
        assert_eq!(tabs.current_index(), 1);
        assert!(!TabWidgetHandler.compare(&tabs, "tabs", &store).unwrap());
    }
}
