// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener management for change notifications.
//!
//! This module provides the core types for managing update listeners:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`ListenerRegistry`] - Per-referent observer list that dispatches updates

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{ReentrantMutex, RwLock};

/// Unique identifier for a subscription.
///
/// This ID is returned when registering a listener and is used to
/// unsubscribe later. IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for update listeners.
type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

/// A registered listener and the gate that serializes its delivery
/// against its removal.
struct Listener {
    /// `true` while the listener is registered. Only read or written with
    /// the gate held, so a closed gate means the callback never starts again.
    live: ReentrantMutex<Cell<bool>>,
    callback: UpdateCallback,
}

impl Listener {
    fn deliver(&self) {
        let live = self.live.lock();
        if live.get() {
            (self.callback)();
        }
    }

    fn close(&self) {
        self.live.lock().set(false);
    }
}

/// Observer list owned by a single referent (a session or one control).
///
/// # Delivery and removal
///
/// [`dispatch`](Self::dispatch) snapshots the listener set and releases
/// the map lock before invoking anything, so a listener may subscribe or
/// unsubscribe from inside its own callback. Each delivery runs under the
/// listener's reentrant gate and [`unsubscribe`](Self::unsubscribe) closes
/// that gate before returning:
///
/// - once `unsubscribe` returns, the callback is never started again;
/// - a delivery already running on another thread finishes first;
/// - a listener removing itself during its own delivery does not deadlock.
///
/// Notifications are neither merged nor dropped: every `dispatch` calls
/// every listener that is registered when it runs.
pub struct ListenerRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    listeners: RwLock<HashMap<SubscriptionId, Arc<Listener>>>,
}

impl ListenerRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a listener called on every update.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        let listener = Listener {
            live: ReentrantMutex::new(Cell::new(true)),
            callback: Arc::new(callback),
        };
        self.listeners.write().insert(id, Arc::new(listener));
        id
    }

    /// Unregisters a listener by its subscription ID.
    ///
    /// Returns `true` if a listener was found and removed. Blocks while
    /// that listener is being delivered on another thread; see
    /// [`Observable::unsubscribe`](super::Observable::unsubscribe).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.listeners.write().remove(&id);
        match removed {
            Some(listener) => {
                listener.close();
                true
            }
            None => false,
        }
    }

    /// Calls every registered listener once.
    ///
    /// Returns the number of listeners the update was offered to.
    pub fn dispatch(&self) -> usize {
        let snapshot: Vec<Arc<Listener>> = self.listeners.read().values().cloned().collect();
        for listener in &snapshot {
            listener.deliver();
        }
        snapshot.len()
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns `true` if there are no registered listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listener_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    fn counter() -> (Arc<AtomicU32>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let clone = count.clone();
        (count, move || {
            clone.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.dispatch(), 0);
    }

    #[test]
    fn dispatch_reaches_every_listener() {
        let registry = ListenerRegistry::new();
        let (c1, f1) = counter();
        let (c2, f2) = counter();
        registry.subscribe(f1);
        registry.subscribe(f2);

        assert_eq!(registry.dispatch(), 2);
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let registry = ListenerRegistry::new();
        let (count, f) = counter();
        let id = registry.subscribe(f);

        registry.dispatch();
        assert!(registry.unsubscribe(id));
        registry.dispatch();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!registry.unsubscribe(id));
    }

    #[test]
    fn notifications_are_not_merged() {
        let registry = ListenerRegistry::new();
        let (count, f) = counter();
        registry.subscribe(f);

        for _ in 0..5 {
            registry.dispatch();
        }
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn listener_can_unsubscribe_itself_during_delivery() {
        let registry = Arc::new(ListenerRegistry::new());
        let slot: Arc<RwLock<Option<SubscriptionId>>> = Arc::new(RwLock::new(None));
        let (count, bump) = counter();

        let reg = registry.clone();
        let own_id = slot.clone();
        let id = registry.subscribe(move || {
            bump();
            if let Some(id) = *own_id.read() {
                reg.unsubscribe(id);
            }
        });
        *slot.write() = Some(id);

        registry.dispatch();
        registry.dispatch();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn listener_removed_mid_dispatch_fires_at_most_once() {
        let registry = Arc::new(ListenerRegistry::new());
        let victim: Arc<RwLock<Option<SubscriptionId>>> = Arc::new(RwLock::new(None));
        let (remover_count, remover_bump) = counter();
        let (victim_count, victim_bump) = counter();

        let reg = registry.clone();
        let target = victim.clone();
        registry.subscribe(move || {
            remover_bump();
            if let Some(id) = *target.read() {
                reg.unsubscribe(id);
            }
        });
        let id = registry.subscribe(victim_bump);
        *victim.write() = Some(id);

        registry.dispatch();
        registry.dispatch();

        // Delivery order is unspecified, so the victim may or may not have
        // run in the first round, but never in the second.
        assert_eq!(remover_count.load(Ordering::SeqCst), 2);
        assert!(victim_count.load(Ordering::SeqCst) <= 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unsubscribe_waits_for_in_flight_delivery() {
        let registry = Arc::new(ListenerRegistry::new());
        let finished = Arc::new(AtomicU32::new(0));
        let started = Arc::new(std::sync::Barrier::new(2));

        let done = finished.clone();
        let barrier = started.clone();
        let id = registry.subscribe(move || {
            barrier.wait();
            std::thread::sleep(Duration::from_millis(50));
            done.fetch_add(1, Ordering::SeqCst);
        });

        let reg = registry.clone();
        let delivery = std::thread::spawn(move || {
            reg.dispatch();
        });

        started.wait();
        assert!(registry.unsubscribe(id));
        // The in-flight callback completed before unsubscribe returned.
        assert_eq!(finished.load(Ordering::SeqCst), 1);

        delivery.join().unwrap();
        registry.dispatch();
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_debug() {
        let registry = ListenerRegistry::new();
        registry.subscribe(|| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("ListenerRegistry"));
        assert!(debug.contains("listener_count"));
    }
}
