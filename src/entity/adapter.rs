// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The generic entity adapter.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::client::SpaControl;
use crate::error::{ConnectionError, Result};
use crate::subscription::SubscriptionId;
use crate::types::ControlState;

use super::{
    DeviceClass, DeviceInfo, EntityCategory, EntityDescription, Readable, Referent, Writable,
};

/// How long telemetry is trusted before entity states are flagged as
/// assumed.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(300);

/// Whether an entity's state reflects recent telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    /// Telemetry arrived within the freshness window.
    Live,
    /// No telemetry within the window, or the link is down; the state is
    /// the last known one.
    Assumed,
}

impl Freshness {
    /// Returns `true` for [`Freshness::Assumed`].
    #[must_use]
    pub const fn is_assumed(&self) -> bool {
        matches!(self, Self::Assumed)
    }
}

/// Refresh procedure supplied by the display layer.
pub type RefreshCallback = Arc<dyn Fn() + Send + Sync>;

/// Type-erased view of an [`Entity`], whatever it wraps.
pub trait EntityHandle: Send + Sync {
    /// Returns the description key.
    fn key(&self) -> &'static str;
    /// Returns the entity name, if any.
    fn name(&self) -> Option<&str>;
    /// Returns the identifier that survives restarts.
    fn unique_id(&self) -> String;
    /// Returns the device metadata.
    fn device_metadata(&self) -> &DeviceInfo;
    /// Returns the display category.
    fn category(&self) -> Option<EntityCategory>;
    /// Returns the semantic class.
    fn device_class(&self) -> Option<DeviceClass>;
    /// Returns the unit of measurement.
    fn unit(&self) -> Option<&'static str>;
    /// Returns the static icon.
    fn icon(&self) -> Option<&'static str>;
    /// Registers a refresh callback; see [`Entity::attach`].
    fn attach_callback(&self, refresh: RefreshCallback) -> bool;
    /// Removes the refresh callback; see [`Entity::detach`].
    fn detach(&self) -> bool;
    /// Returns `true` while attached.
    fn is_attached(&self) -> bool;
    /// Returns `true` while the session is connected.
    fn is_available(&self) -> bool;
    /// Returns whether the state reflects recent telemetry.
    fn freshness(&self) -> Freshness;
}

/// Adapts a referent onto one display-layer entity.
///
/// An entity holds no copy of the referent's state: every read goes through
/// the description's projection. While attached, each notification of the
/// referent calls the refresh callback once.
///
/// Lifecycle:
///
/// ```text
/// new ──> Detached ──attach──> Attached ──detach/drop──> Detached
/// ```
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use balboa_entities::client::SpaClient;
/// use balboa_entities::entity::Entity;
/// use balboa_entities::platform::sensor;
/// use balboa_entities::state::SpaUpdate;
/// use balboa_entities::testing;
///
/// let (spa, _commands) = SpaClient::channel("192.168.1.20", 4);
/// spa.ingest(SpaUpdate::Configuration(testing::configuration()));
///
/// let entity = Entity::new(Arc::new(spa.clone()), &sensor::FILTER_CYCLE_1_DURATION).unwrap();
/// let refreshes = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&refreshes);
/// entity.attach(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// spa.ingest(SpaUpdate::Temperature(37.0));
/// assert_eq!(refreshes.load(Ordering::SeqCst), 1);
/// ```
pub struct Entity<R: Referent, V: 'static> {
    referent: Arc<R>,
    description: &'static EntityDescription<R, V>,
    name: Option<String>,
    device: DeviceInfo,
    freshness_window: Duration,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl<R: Referent, V: 'static> Entity<R, V> {
    /// Creates a detached entity.
    ///
    /// The device identity is captured here, so the unique id stays stable
    /// for the entity's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// before the configuration handshake, and
    /// [`ConnectionError::NotConnected`] if the session was dropped.
    pub fn new(referent: Arc<R>, description: &'static EntityDescription<R, V>) -> Result<Self> {
        let session = referent.session().ok_or(ConnectionError::NotConnected)?;
        let device = DeviceInfo::from_session(&session)?;
        let name = description
            .name
            .map(str::to_string)
            .or_else(|| referent.referent_name());

        Ok(Self {
            referent,
            description,
            name,
            device,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            subscription: Mutex::new(None),
        })
    }

    /// Sets how long telemetry is trusted.
    #[must_use]
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// Returns the wrapped referent.
    #[must_use]
    pub fn referent(&self) -> &Arc<R> {
        &self.referent
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &'static EntityDescription<R, V> {
        self.description
    }

    /// Returns the description key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.description.key
    }

    /// Returns the entity name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the freshness window.
    #[must_use]
    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    // ========== Subscription ==========

    /// Registers `refresh` with the referent.
    ///
    /// Returns `false` and registers nothing if the entity is already
    /// attached.
    pub fn attach<F>(&self, refresh: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            tracing::trace!(key = self.key(), "Entity already attached");
            return false;
        }
        let id = self.referent.on_update(refresh);
        tracing::debug!(unique_id = %self.unique_id(), subscription = %id, "Entity attached");
        *subscription = Some(id);
        true
    }

    /// Removes the refresh callback.
    ///
    /// After this returns, the callback is not invoked again, even if a
    /// notification is being delivered on another thread. Returns `false`
    /// if the entity was not attached.
    ///
    /// # Blocking
    ///
    /// A refresh running on another thread is waited for, so do not call
    /// this while holding a lock the refresh callback takes. Detaching from
    /// inside the entity's own refresh callback does not block. See
    /// [`Observable::unsubscribe`](crate::Observable::unsubscribe).
    pub fn detach(&self) -> bool {
        let Some(id) = self.subscription.lock().take() else {
            return false;
        };
        self.referent.unsubscribe(id);
        tracing::debug!(unique_id = %self.unique_id(), subscription = %id, "Entity detached");
        true
    }

    /// Returns `true` while attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    // ========== Display state ==========

    /// Reads the current value from the referent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// until the underlying telemetry arrives.
    pub fn current_value(&self) -> Result<V> {
        self.description.value(&self.referent)
    }

    /// Returns `true` while the session is connected.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.referent.is_connected()
    }

    /// Returns whether the state reflects recent telemetry.
    #[must_use]
    pub fn freshness(&self) -> Freshness {
        match self.referent.last_update() {
            Some(at) if self.referent.is_connected() && at.elapsed() <= self.freshness_window => {
                Freshness::Live
            }
            _ => Freshness::Assumed,
        }
    }

    /// Returns `true` if the state is assumed rather than live.
    #[must_use]
    pub fn assumed_state(&self) -> bool {
        self.freshness().is_assumed()
    }

    // ========== Identity ==========

    /// Returns the identifier that survives restarts.
    ///
    /// `"{mac}-{model}"` for unnamed entities, `"{mac}-{model}-{name}"`
    /// otherwise. The description key is deliberately not part of the id,
    /// so ids stay compatible with entities registered by earlier
    /// installations. Two descriptions with the same name on one spa
    /// therefore share an id.
    #[must_use]
    pub fn unique_id(&self) -> String {
        let base = format!("{}-{}", self.device.mac(), self.device.model);
        match &self.name {
            Some(name) => format!("{base}-{name}"),
            None => base,
        }
    }

    /// Returns the device metadata.
    #[must_use]
    pub fn device_metadata(&self) -> &DeviceInfo {
        &self.device
    }
}

impl<R: Referent, V: 'static> EntityHandle for Entity<R, V> {
    fn key(&self) -> &'static str {
        self.description.key
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn unique_id(&self) -> String {
        Entity::unique_id(self)
    }

    fn device_metadata(&self) -> &DeviceInfo {
        &self.device
    }

    fn category(&self) -> Option<EntityCategory> {
        self.description.category
    }

    fn device_class(&self) -> Option<DeviceClass> {
        self.description.device_class
    }

    fn unit(&self) -> Option<&'static str> {
        self.description.unit
    }

    fn icon(&self) -> Option<&'static str> {
        self.description.icon
    }

    fn attach_callback(&self, refresh: RefreshCallback) -> bool {
        self.attach(move || refresh())
    }

    fn detach(&self) -> bool {
        Entity::detach(self)
    }

    fn is_attached(&self) -> bool {
        Entity::is_attached(self)
    }

    fn is_available(&self) -> bool {
        Entity::is_available(self)
    }

    fn freshness(&self) -> Freshness {
        Entity::freshness(self)
    }
}

impl<R: Referent, V: 'static> Readable for Entity<R, V> {
    type Value = V;

    fn current_value(&self) -> Result<V> {
        Entity::current_value(self)
    }
}

impl<V: 'static> Writable for Entity<SpaControl, V> {
    type Value = ControlState;

    async fn write(&self, value: ControlState) -> Result<()> {
        self.referent.set_state(value).await
    }
}

impl<R: Referent, V: 'static> Drop for Entity<R, V> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.get_mut().take() {
            self.referent.unsubscribe(id);
        }
    }
}

impl<R: Referent, V: 'static> fmt::Debug for Entity<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("key", &self.description.key)
            .field("name", &self.name)
            .field("attached", &self.is_attached())
            .field("freshness_window", &self.freshness_window)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::client::SpaClient;
    use crate::error::Error;
    use crate::state::{SpaConfiguration, SpaUpdate};
    use crate::subscription::Observable;

    static TEMPERATURE: EntityDescription<SpaClient, f64> = EntityDescription {
        key: "temperature",
        name: None,
        category: None,
        device_class: None,
        unit: None,
        icon: None,
        value_fn: SpaClient::temperature,
    };

    static NAMED: EntityDescription<SpaClient, f64> = EntityDescription {
        key: "target",
        name: Some("Target"),
        category: None,
        device_class: None,
        unit: None,
        icon: None,
        value_fn: SpaClient::target_temperature,
    };

    fn configured() -> SpaClient {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(SpaConfiguration::new(
            "00:15:27:ab:cd:ef".parse().unwrap(),
            "BP501G1",
            "1.0",
        )));
        spa
    }

    #[test]
    fn new_requires_configuration() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        let err = Entity::new(Arc::new(spa), &TEMPERATURE).unwrap_err();
        assert!(matches!(err, Error::NotYetAvailable { .. }));
    }

    #[test]
    fn unique_id_with_and_without_name() {
        let spa = Arc::new(configured());
        let unnamed = Entity::new(Arc::clone(&spa), &TEMPERATURE).unwrap();
        let named = Entity::new(spa, &NAMED).unwrap();
        assert_eq!(unnamed.unique_id(), "00:15:27:ab:cd:ef-BP501G1");
        assert_eq!(named.unique_id(), "00:15:27:ab:cd:ef-BP501G1-Target");
    }

    #[test]
    fn unique_id_ignores_description_key() {
        static RENAMED_KEY: EntityDescription<SpaClient, f64> = EntityDescription {
            key: "set_point",
            name: Some("Target"),
            category: None,
            device_class: None,
            unit: None,
            icon: None,
            value_fn: SpaClient::target_temperature,
        };

        let spa = Arc::new(configured());
        let named = Entity::new(Arc::clone(&spa), &NAMED).unwrap();
        let rekeyed = Entity::new(spa, &RENAMED_KEY).unwrap();
        assert_ne!(named.key(), rekeyed.key());
        assert_eq!(named.unique_id(), rekeyed.unique_id());
    }

    #[test]
    fn attach_is_idempotent() {
        let spa = Arc::new(configured());
        let entity = Entity::new(Arc::clone(&spa), &TEMPERATURE).unwrap();

        assert!(entity.attach(|| {}));
        assert!(!entity.attach(|| {}));
        assert_eq!(spa.listener_count(), 1);

        assert!(entity.detach());
        assert!(!entity.detach());
        assert_eq!(spa.listener_count(), 0);
    }

    #[test]
    fn drop_detaches() {
        let spa = Arc::new(configured());
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let entity = Entity::new(Arc::clone(&spa), &TEMPERATURE).unwrap();
            let c = Arc::clone(&hits);
            entity.attach(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        spa.ingest(SpaUpdate::Temperature(30.0));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(spa.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn freshness_follows_window() {
        let spa = Arc::new(configured());
        spa.set_connected(true);
        let entity = Entity::new(Arc::clone(&spa), &TEMPERATURE)
            .unwrap()
            .with_freshness_window(Duration::from_secs(10));
        assert_eq!(entity.freshness(), Freshness::Live);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(entity.freshness(), Freshness::Assumed);

        spa.ingest(SpaUpdate::Temperature(30.0));
        assert_eq!(entity.freshness(), Freshness::Live);
        spa.set_connected(false);
        assert!(entity.assumed_state());
        assert!(!entity.is_available());
    }
}
