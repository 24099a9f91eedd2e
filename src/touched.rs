//! Touched-state tracking
//!
//! One boolean per manager, flipped to `true` by monitored control changes
//! and custom-data writes, and back to `false` by save, load or an explicit
//! reset. Listeners hear about transitions only, never about redundant sets.
//!
//! A listener may flip the flag again (an autosave listener saves on `true`).
//! That transition is queued and delivered to every listener after the
//! current fan-out, so each listener sees transitions in the order they
//! happened and its last value always matches the flag.

use crate::sync::RwLockExt;
use log::debug;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Type alias for a touched-state listener
pub type TouchedCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Identifier returned by [`TouchedState::on_changed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The touched flag plus its listeners
pub struct TouchedState {
    touched: AtomicBool,
    listeners: RwLock<Vec<(ListenerId, TouchedCallback)>>,
    next_id: AtomicU64,
    pending: RwLock<Pending>,
}

/// Transitions waiting for delivery
#[derive(Default)]
struct Pending {
    queue: VecDeque<bool>,
    delivering: bool,
}

impl TouchedState {
    /// Create an untouched state with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self {
            touched: AtomicBool::new(false),
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            pending: RwLock::new(Pending::default()),
        }
    }

    /// Current value
    pub fn get(&self) -> bool {
        self.touched.load(Ordering::SeqCst)
    }

    /// Set the flag, notifying listeners only if the value actually changed.
    ///
    /// Returns true if this call caused a transition.
    pub fn set(&self, touched: bool) -> bool {
        let mut pending = self.pending.write_recovered();
        if self.touched.swap(touched, Ordering::SeqCst) == touched {
            return false;
        }

        debug!("Touched state changed to {}", touched);
        pending.queue.push_back(touched);
        if pending.delivering {
            // Raised from inside a listener; the running fan-out delivers it
            return true;
        }
        pending.delivering = true;
        drop(pending);

        self.deliver();
        true
    }

    /// Register a listener called with the new value on every transition
    pub fn on_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write_recovered()
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a listener. Returns false if `id` is unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write_recovered();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read_recovered().len()
    }

    fn deliver(&self) {
        loop {
            let next = {
                let mut pending = self.pending.write_recovered();
                match pending.queue.pop_front() {
                    Some(touched) => touched,
                    None => {
                        pending.delivering = false;
                        return;
                    }
                }
            };
            self.notify(next);
        }
    }

    fn notify(&self, touched: bool) {
        // Clone out so listeners can call back into the manager
        let snapshot: Vec<TouchedCallback> = self
            .listeners
            .read_recovered()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        for callback in snapshot {
            callback(touched);
        }
    }
}

impl Default for TouchedState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
