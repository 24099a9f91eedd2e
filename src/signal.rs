//! Change-event sources
//!
//! [`Signal`] is the notification primitive the built-in widgets expose.
//! Handlers hand signals to the manager as [`ChangeSource`] trait objects, and
//! the manager keeps one [`Subscription`] per connection so that every wiring
//! pass can be torn down completely before the next one.

use crate::sync::RwLockExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Type alias for a typed signal listener
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Type alias for a payload-free change callback
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Identifier of one connection on a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Something that announces "state may have changed".
pub trait ChangeSource: Send + Sync {
    /// Connect a callback, returning the id needed to disconnect it
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId;

    /// Disconnect a callback. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Typed multi-listener signal.
///
/// `emit` snapshots the listener list before calling anything, so listeners
/// may connect or disconnect (on this or any other signal) while being called.
pub struct Signal<T> {
    listeners: RwLock<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T> Signal<T> {
    /// Create a signal with no listeners
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Connect a listener
    pub fn connect<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write_recovered()
            .push((id, Arc::new(listener)));
        id
    }

    /// Disconnect a listener. Returns false if `id` was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write_recovered();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Call every connected listener with `value`
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .read_recovered()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in snapshot {
            listener(value);
        }
    }

    /// Number of connected listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read_recovered().len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ChangeSource for Signal<T> {
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId {
        self.connect(move |_| callback())
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.disconnect(id);
    }
}

/// Owned connection to a [`ChangeSource`]. Dropping it disconnects.
#[must_use = "dropping a Subscription disconnects it immediately"]
pub struct Subscription {
    source: Arc<dyn ChangeSource>,
    id: SubscriptionId,
}

impl Subscription {
    /// Subscribe `callback` to `source` and keep the connection alive
    pub fn connect(source: Arc<dyn ChangeSource>, callback: ChangeCallback) -> Self {
        let id = source.subscribe(callback);
        Self { source, id }
    }

    /// Connection id on the underlying source
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
