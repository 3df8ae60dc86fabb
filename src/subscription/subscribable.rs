// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observable trait for referents that emit update notifications.

use crate::subscription::SubscriptionId;

/// Trait for referents that announce state updates.
///
/// Implemented by the spa session and by each control. Every referent owns
/// its own observer list, so a control update only reaches listeners of
/// that control while a session update reaches session listeners.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// use balboa_entities::client::SpaClient;
/// use balboa_entities::state::SpaUpdate;
/// use balboa_entities::subscription::Observable;
///
/// let (spa, _commands) = SpaClient::channel("192.168.1.20", 16);
/// let seen = Arc::new(AtomicU32::new(0));
/// let counter = seen.clone();
///
/// let id = spa.on_update(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
/// spa.ingest(SpaUpdate::Temperature(38.5));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
///
/// assert!(spa.unsubscribe(id));
/// ```
pub trait Observable {
    /// Registers a listener called after every update of this referent.
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Unsubscribes a listener by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed. Once this
    /// returns, the listener is not called again.
    ///
    /// # Blocking
    ///
    /// If the listener is being called on another thread, this waits for
    /// that call to return. Do not unsubscribe while holding a lock the
    /// listener takes, and do not let listeners remove each other from
    /// concurrent dispatches. A listener may remove itself from inside its
    /// own call without blocking.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Returns the number of listeners currently registered.
    fn listener_count(&self) -> usize;
}
