//! Change subscriptions, the skip set and the touched-state API

use super::{SettingsManager, WiredControl};
use crate::control::{Control, ControlId, ControlRef, managed_key};
use crate::signal::{ChangeCallback, Subscription};
use crate::sync::RwLockExt;
use crate::touched::ListenerId;
use crate::traversal::ManagedControl;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

impl SettingsManager {
    // =========================================================================
    // Touched State
    // =========================================================================

    /// True if a monitored change or a custom data write happened since
    /// the last save, load or reset
    pub fn is_touched(&self) -> bool {
        self.touched.get()
    }

    /// Force the touched state on
    pub fn mark_touched(&self) {
        self.touched.set(true);
    }

    /// Force the touched state off without saving
    pub fn mark_untouched(&self) {
        self.touched.set(false);
    }

    /// Register a listener called with the new value on every touched
    /// transition (never for redundant sets).
    ///
    /// Listeners run synchronously; they may call back into the manager,
    /// including `save_state`.
    pub fn on_touched_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.touched.on_changed(callback)
    }

    /// Remove a touched listener. Returns false if `id` is unknown.
    pub fn remove_touched_listener(&self, id: ListenerId) -> bool {
        self.touched.remove_listener(id)
    }

    // =========================================================================
    // Skip Set
    // =========================================================================

    /// Exclude `control` from every pass, matched by identity.
    ///
    /// Its live change subscriptions are dropped at once. Children of the
    /// control are not affected.
    pub fn skip_widget<C: Control>(&self, control: &Arc<C>) {
        let control: ControlRef = control.clone();
        self.skip_control(&control);
    }

    /// [`skip_widget`](Self::skip_widget) for an already type-erased control
    pub fn skip_control(&self, control: &ControlRef) {
        if !self.skipped.write_recovered().insert(control) {
            return;
        }
        debug!("Skipping control {:?}", control.settings_key());

        let removed = self
            .wiring
            .write_recovered()
            .remove(&ControlId::of(control));
        // Drop outside the lock: unsubscribing may take the signal's lock
        drop(removed);
    }

    /// Undo [`skip_widget`](Self::skip_widget).
    ///
    /// A managed control with a handler is wired again at once, so its
    /// changes count as touched without waiting for the next save or load.
    pub fn unskip_widget<C: Control>(&self, control: &Arc<C>) {
        let control: ControlRef = control.clone();
        self.unskip_control(&control);
    }

    /// [`unskip_widget`](Self::unskip_widget) for an already type-erased control
    pub fn unskip_control(&self, control: &ControlRef) {
        if !self.skipped.write_recovered().remove(control) {
            return;
        }
        debug!("Unskipping control {:?}", control.settings_key());

        let Some(key) = managed_key(control.as_ref()) else {
            return;
        };
        let Some(handler) = self.handler_for(control.as_ref()) else {
            return;
        };
        self.wire(&ManagedControl {
            key,
            control: control.clone(),
            handler,
        });
    }

    /// True if `control` is currently skipped
    pub fn is_skipped(&self, control: &ControlRef) -> bool {
        self.skipped.read_recovered().contains(control)
    }

    // =========================================================================
    // Wiring
    // =========================================================================

    /// Tear down every subscription, then subscribe to the monitored
    /// signals of `managed`.
    pub(crate) fn rewire(&self, managed: &[ManagedControl]) {
        self.disconnect_all();

        let mut fresh = HashMap::with_capacity(managed.len());
        for control in managed {
            fresh.insert(ControlId::of(&control.control), self.subscribe(control));
        }
        let count: usize = fresh.values().map(|wired| wired.subscriptions.len()).sum();

        let replaced = std::mem::replace(&mut *self.wiring.write_recovered(), fresh);
        drop(replaced);
        debug!(
            "Wired {} subscriptions across {} controls",
            count,
            managed.len()
        );
    }

    /// Drop every live subscription
    pub(crate) fn disconnect_all(&self) {
        let old = std::mem::take(&mut *self.wiring.write_recovered());
        drop(old);
    }

    /// Number of live change subscriptions
    pub fn subscription_count(&self) -> usize {
        self.wiring
            .read_recovered()
            .values()
            .filter(|wired| wired.control.strong_count() > 0)
            .map(|wired| wired.subscriptions.len())
            .sum()
    }

    fn wire(&self, control: &ManagedControl) {
        let wired = self.subscribe(control);
        let previous = self
            .wiring
            .write_recovered()
            .insert(ControlId::of(&control.control), wired);
        drop(previous);
    }

    fn subscribe(&self, control: &ManagedControl) -> WiredControl {
        let subscriptions = control
            .handler
            .signals_to_monitor(control.control.as_ref())
            .into_iter()
            .map(|source| Subscription::connect(source, self.touch_callback()))
            .collect();

        WiredControl {
            control: Arc::downgrade(&control.control),
            subscriptions,
        }
    }

    /// Callback that marks the state touched. Holds the touched state weakly
    /// so subscriptions never keep a dropped manager's state alive.
    fn touch_callback(&self) -> ChangeCallback {
        let touched = Arc::downgrade(&self.touched);
        Arc::new(move || {
            if let Some(touched) = touched.upgrade() {
                touched.set(true);
            }
        })
    }
}

impl Drop for SettingsManager {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

// =============================================================================
// Tests
// =============================================================================
