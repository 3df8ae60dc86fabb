// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The session referent.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::command::SpaCommand;
use crate::error::{CommandError, ConnectionError, Error, Result, ValueError};
use crate::state::{FilterCycleId, SpaConfiguration, SpaState, SpaUpdate};
use crate::subscription::{ListenerRegistry, Observable, SubscriptionId};
use crate::types::{
    ControlId, ControlKind, HeatMode, HeatState, MacAddress, TemperatureRange, TemperatureUnit,
};

use super::SpaControl;

/// Default capacity of the outbound command queue.
pub const DEFAULT_COMMAND_CAPACITY: usize = 32;

#[derive(Debug, Default)]
struct Link {
    connected: bool,
    last_update: Option<Instant>,
}

pub(super) struct Shared {
    host: String,
    state: RwLock<SpaState>,
    link: RwLock<Link>,
    controls: RwLock<Vec<Arc<SpaControl>>>,
    outbox: RwLock<Option<mpsc::Sender<SpaCommand>>>,
    configured: watch::Sender<bool>,
    listeners: ListenerRegistry,
}

/// A live session with one spa.
///
/// Cloning is cheap and every clone refers to the same session. State is
/// only ever changed through [`ingest`](Self::ingest); everything else
/// reads snapshots.
///
/// # Examples
///
/// ```
/// use balboa_entities::client::SpaClient;
/// use balboa_entities::state::SpaUpdate;
/// use balboa_entities::subscription::Observable;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let (spa, _commands) = SpaClient::channel("192.168.1.20", 16);
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// spa.on_update(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// spa.ingest(SpaUpdate::Temperature(38.0));
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct SpaClient {
    shared: Arc<Shared>,
}

impl SpaClient {
    /// Creates a disconnected session and the receiving end of its command
    /// queue.
    ///
    /// The protocol client owns the receiver and encodes every command it
    /// yields. The queue holds at most `capacity` pending commands.
    #[must_use]
    pub fn channel(host: impl Into<String>, capacity: usize) -> (Self, mpsc::Receiver<SpaCommand>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (configured, _) = watch::channel(false);
        let client = Self {
            shared: Arc::new(Shared {
                host: host.into(),
                state: RwLock::new(SpaState::new()),
                link: RwLock::new(Link::default()),
                controls: RwLock::new(Vec::new()),
                outbox: RwLock::new(Some(tx)),
                configured,
                listeners: ListenerRegistry::new(),
            }),
        };
        (client, rx)
    }

    pub(super) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub(super) fn downgrade(&self) -> std::sync::Weak<Shared> {
        Arc::downgrade(&self.shared)
    }

    /// Returns `true` if both handles refer to the same session.
    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Returns the host this session talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.shared.host
    }

    // ========== Link ==========

    /// Returns `true` while the protocol link is up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.shared.link.read().connected
    }

    /// Records a link change reported by the protocol client.
    ///
    /// Session and control observers are notified when the flag actually
    /// changes, so availability repaints without waiting for telemetry.
    pub fn set_connected(&self, connected: bool) {
        let changed = {
            let mut link = self.shared.link.write();
            let changed = link.connected != connected;
            link.connected = connected;
            changed
        };
        if changed {
            tracing::info!(host = %self.shared.host, connected, "Spa link changed");
            self.notify_all();
        }
    }

    /// Marks the session disconnected and closes the command queue.
    ///
    /// The protocol client sees its receiver end once pending commands are
    /// drained. Further writes fail with [`ConnectionError::NotConnected`].
    pub fn disconnect(&self) {
        self.shared.outbox.write().take();
        self.set_connected(false);
    }

    /// Returns when telemetry was last ingested, if ever.
    #[must_use]
    pub fn last_update(&self) -> Option<Instant> {
        self.shared.link.read().last_update
    }

    // ========== Configuration ==========

    /// Returns `true` once the configuration handshake has completed.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        *self.shared.configured.borrow()
    }

    /// Waits for the configuration handshake.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Timeout`] if the spa does not report its
    /// configuration within `timeout`.
    pub async fn wait_until_configured(&self, timeout: Duration) -> Result<()> {
        let mut rx = self.shared.configured.subscribe();
        match tokio::time::timeout(timeout, rx.wait_for(|configured| *configured)).await {
            Ok(Ok(_)) => Ok(()),
            // The sender lives as long as the session, so only the timeout
            // can realistically fire here.
            Ok(Err(_)) | Err(_) => {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                Err(ConnectionError::Timeout(millis).into())
            }
        }
    }

    /// Returns the configuration, once reported.
    #[must_use]
    pub fn configuration(&self) -> Option<SpaConfiguration> {
        self.shared.state.read().configuration().cloned()
    }

    fn with_configuration<T>(
        &self,
        field: &'static str,
        f: impl FnOnce(&SpaConfiguration) -> T,
    ) -> Result<T> {
        self.shared
            .state
            .read()
            .configuration()
            .map(f)
            .ok_or(Error::not_yet_available(field))
    }

    /// Returns the hardware address of the spa.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn mac_address(&self) -> Result<MacAddress> {
        self.with_configuration("MAC address", |c| c.mac)
    }

    /// Returns the model name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn model(&self) -> Result<String> {
        self.with_configuration("model", |c| c.model.clone())
    }

    /// Returns the software version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn software_version(&self) -> Result<String> {
        self.with_configuration("software version", |c| c.software_version.clone())
    }

    // ========== Controls ==========

    /// Returns every control, in configuration order.
    #[must_use]
    pub fn controls(&self) -> Vec<Arc<SpaControl>> {
        self.shared.controls.read().clone()
    }

    /// Returns the controls of one kind.
    #[must_use]
    pub fn controls_of(&self, kind: ControlKind) -> Vec<Arc<SpaControl>> {
        self.shared
            .controls
            .read()
            .iter()
            .filter(|c| c.kind() == kind)
            .cloned()
            .collect()
    }

    /// Looks up a control.
    #[must_use]
    pub fn control(&self, id: ControlId) -> Option<Arc<SpaControl>> {
        self.shared
            .controls
            .read()
            .iter()
            .find(|c| c.id() == id)
            .cloned()
    }

    /// Returns the circulation pump, if installed.
    #[must_use]
    pub fn circulation_pump(&self) -> Option<Arc<SpaControl>> {
        self.control(ControlId::single(ControlKind::CirculationPump))
    }

    // ========== Telemetry reads ==========

    fn read_state<T>(&self, field: &'static str, f: impl FnOnce(&SpaState) -> Option<T>) -> Result<T> {
        f(&self.shared.state.read()).ok_or(Error::not_yet_available(field))
    }

    /// Returns the water temperature in the spa's unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn temperature(&self) -> Result<f64> {
        self.read_state("temperature", SpaState::temperature)
    }

    /// Returns the target temperature in the spa's unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn target_temperature(&self) -> Result<f64> {
        self.read_state("target temperature", SpaState::target_temperature)
    }

    /// Returns the panel's temperature unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn temperature_unit(&self) -> Result<TemperatureUnit> {
        self.read_state("temperature unit", SpaState::temperature_unit)
    }

    /// Returns what the heater is doing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn heat_state(&self) -> Result<HeatState> {
        self.read_state("heat state", SpaState::heat_state)
    }

    /// Returns the heat mode reported by the heat mode control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it, or if it
    /// reports a state outside the known modes.
    pub fn heat_mode(&self) -> Result<HeatMode> {
        let control = self
            .control(ControlId::single(ControlKind::HeatMode))
            .ok_or(Error::not_yet_available("heat mode"))?;
        HeatMode::from_state(control.state()?).ok_or(Error::not_yet_available("heat mode"))
    }

    /// Returns the temperature range reported by its control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn temperature_range(&self) -> Result<TemperatureRange> {
        let control = self
            .control(ControlId::single(ControlKind::TemperatureRange))
            .ok_or(Error::not_yet_available("temperature range"))?;
        TemperatureRange::from_state(control.state()?)
            .ok_or(Error::not_yet_available("temperature range"))
    }

    /// Returns the lowest settable target temperature for the current unit
    /// and range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until unit and range are reported.
    pub fn temperature_minimum(&self) -> Result<f64> {
        Ok(temperature_limits(self.temperature_unit()?, self.temperature_range()?).0)
    }

    /// Returns the highest settable target temperature for the current unit
    /// and range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until unit and range are reported.
    pub fn temperature_maximum(&self) -> Result<f64> {
        Ok(temperature_limits(self.temperature_unit()?, self.temperature_range()?).1)
    }

    /// Returns the local start time of a filter cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn filter_cycle_start(&self, cycle: FilterCycleId) -> Result<NaiveTime> {
        self.read_state("filter cycle start", |s| s.filter_cycle(cycle).start)
    }

    /// Returns how long a filter cycle runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn filter_cycle_duration(&self, cycle: FilterCycleId) -> Result<Duration> {
        self.read_state("filter cycle duration", |s| s.filter_cycle(cycle).duration)
    }

    /// Returns whether a filter cycle is running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn filter_cycle_running(&self, cycle: FilterCycleId) -> Result<bool> {
        self.read_state("filter cycle running", |s| s.filter_cycle(cycle).running)
    }

    /// Returns whether filter cycle 2 is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn filter_cycle_2_enabled(&self) -> Result<bool> {
        self.read_state("filter cycle 2 enabled", SpaState::filter_cycle_2_enabled)
    }

    // ========== Ingestion ==========

    /// Applies decoded telemetry and notifies observers.
    ///
    /// Every call stamps the freshness clock and notifies session observers
    /// once. Control observers are notified only when their control's state
    /// changed. The first configuration update creates the controls; within
    /// a batch it is applied before any other entry.
    ///
    /// Returns `true` if any state changed.
    pub fn ingest(&self, update: SpaUpdate) -> bool {
        let mut session_changed = false;
        let mut changed_controls: Vec<Arc<SpaControl>> = Vec::new();

        {
            let mut state = self.shared.state.write();
            // Configuration first, so control states in the same batch
            // find their controls.
            let mut leaves = update.leaves();
            leaves.sort_by_key(|leaf| !matches!(leaf, SpaUpdate::Configuration(_)));
            for leaf in leaves {
                match leaf {
                    SpaUpdate::Control { id, state: value } => match self.control(*id) {
                        Some(control) => {
                            if control.apply(*value)
                                && !changed_controls.iter().any(|c| Arc::ptr_eq(c, &control))
                            {
                                changed_controls.push(control);
                            }
                        }
                        None => tracing::trace!(control = %id, "Ignoring state of unknown control"),
                    },
                    SpaUpdate::Configuration(config) => {
                        if state.apply(leaf) {
                            session_changed = true;
                            self.install_controls(config);
                        }
                    }
                    other => session_changed |= state.apply(other),
                }
            }
            self.shared.link.write().last_update = Some(Instant::now());
        }

        tracing::trace!(
            host = %self.shared.host,
            changes = update.change_count(),
            session_changed,
            controls_changed = changed_controls.len(),
            "Ingested telemetry"
        );

        for control in &changed_controls {
            control.notify();
        }
        self.shared.listeners.dispatch();

        session_changed || !changed_controls.is_empty()
    }

    fn install_controls(&self, config: &SpaConfiguration) {
        {
            let mut controls = self.shared.controls.write();
            if controls.is_empty() {
                let session = self.downgrade();
                *controls = config
                    .controls()
                    .into_iter()
                    .map(|(id, options)| Arc::new(SpaControl::new(id, options, session.clone())))
                    .collect();
                tracing::debug!(
                    host = %self.shared.host,
                    mac = %config.mac,
                    model = %config.model,
                    controls = controls.len(),
                    "Spa configuration loaded"
                );
            } else {
                tracing::debug!(host = %self.shared.host, "Keeping controls from earlier configuration");
            }
        }
        self.shared.configured.send_replace(true);
    }

    fn notify_all(&self) {
        for control in self.controls() {
            control.notify();
        }
        self.shared.listeners.dispatch();
    }

    // ========== Commands ==========

    /// Queues a command for the protocol client.
    ///
    /// Returns once the command is queued; the resulting state change
    /// arrives later through [`ingest`](Self::ingest).
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NotConnected`] while the link is down and
    /// [`CommandError::Closed`] if the protocol client stopped draining.
    pub async fn send(&self, command: SpaCommand) -> Result<()> {
        if !self.is_connected() {
            return Err(ConnectionError::NotConnected.into());
        }
        let sender = self
            .shared
            .outbox
            .read()
            .clone()
            .ok_or(ConnectionError::NotConnected)?;

        tracing::debug!(host = %self.shared.host, command = %command, "Queueing spa command");
        sender
            .send(command)
            .await
            .map_err(|_| Error::Command(CommandError::Closed))
    }

    /// Requests a new target temperature, in the spa's unit.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] for non-finite values and
    /// the errors of [`send`](Self::send).
    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !temperature.is_finite() {
            return Err(ValueError::InvalidTemperature(temperature.to_string()).into());
        }
        self.send(SpaCommand::SetTemperature(temperature)).await
    }

    /// Enables or disables filter cycle 2.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send`](Self::send).
    pub async fn set_filter_cycle_2_enabled(&self, enabled: bool) -> Result<()> {
        self.send(SpaCommand::SetFilterCycle2Enabled(enabled)).await
    }

    /// Sets the spa clock.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send`](Self::send).
    pub async fn set_time(&self, time: NaiveTime) -> Result<()> {
        self.send(SpaCommand::SetTime(time)).await
    }

    /// Asks the spa to resend its configuration.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send`](Self::send).
    pub async fn request_configuration(&self) -> Result<()> {
        self.send(SpaCommand::RequestConfiguration).await
    }
}

/// Target temperature bounds for a unit and range.
#[must_use]
pub(crate) fn temperature_limits(unit: TemperatureUnit, range: TemperatureRange) -> (f64, f64) {
    match (unit, range) {
        (TemperatureUnit::Celsius, TemperatureRange::Low) => (10.0, 26.0),
        (TemperatureUnit::Celsius, TemperatureRange::High) => (26.0, 40.0),
        (TemperatureUnit::Fahrenheit, TemperatureRange::Low) => (50.0, 80.0),
        (TemperatureUnit::Fahrenheit, TemperatureRange::High) => (80.0, 104.0),
    }
}

impl Observable for SpaClient {
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.listeners.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.listeners.unsubscribe(id)
    }

    fn listener_count(&self) -> usize {
        self.shared.listeners.len()
    }
}

impl fmt::Debug for SpaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let link = self.shared.link.read();
        f.debug_struct("SpaClient")
            .field("host", &self.shared.host)
            .field("connected", &link.connected)
            .field("configured", &self.is_configured())
            .field("controls", &self.shared.controls.read().len())
            .field("listeners", &self.shared.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::ControlState;

    fn configuration() -> SpaConfiguration {
        SpaConfiguration::new("00:15:27:ab:cd:ef".parse().unwrap(), "BP501G1", "M100_226 V43.0")
            .with_pumps(vec![2])
            .with_lights(1)
    }

    fn counter<O: Observable>(referent: &O) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&hits);
        referent.on_update(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn reads_before_telemetry_are_not_yet_available() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        assert!(spa.temperature().unwrap_err().is_not_yet_available());
        assert!(spa.mac_address().unwrap_err().is_not_yet_available());
        assert!(spa.heat_mode().unwrap_err().is_not_yet_available());
        assert!(spa.last_update().is_none());
    }

    #[tokio::test]
    async fn configuration_creates_controls() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        assert!(!spa.is_configured());

        spa.ingest(SpaUpdate::Configuration(configuration()));

        assert!(spa.is_configured());
        spa.wait_until_configured(Duration::from_millis(1)).await.unwrap();
        assert_eq!(spa.controls().len(), 4);
        assert_eq!(spa.controls_of(ControlKind::Pump).len(), 1);
        assert_eq!(spa.model().unwrap(), "BP501G1");
        assert!(spa.circulation_pump().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_configured_times_out() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        let err = spa
            .wait_until_configured(Duration::from_secs(15))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::Timeout(15_000))));
    }

    #[test]
    fn ingest_notifies_session_every_time() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        let hits = counter(&spa);

        assert!(spa.ingest(SpaUpdate::Temperature(37.0)));
        assert!(!spa.ingest(SpaUpdate::Temperature(37.0)));

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(spa.last_update().is_some());
    }

    #[test]
    fn control_observers_fire_only_on_their_change() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(configuration()));
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();
        let light = spa.control(ControlId::new(ControlKind::Light, 1)).unwrap();
        let pump_hits = counter(pump.as_ref());
        let light_hits = counter(light.as_ref());

        spa.ingest(SpaUpdate::control(pump.id(), ControlState::HIGH));
        spa.ingest(SpaUpdate::control(pump.id(), ControlState::HIGH));
        spa.ingest(SpaUpdate::Temperature(36.5));

        assert_eq!(pump_hits.load(Ordering::SeqCst), 1);
        assert_eq!(light_hits.load(Ordering::SeqCst), 0);
        assert_eq!(pump.state().unwrap(), ControlState::HIGH);
    }

    #[test]
    fn configuration_and_states_in_one_batch() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        let light = ControlId::new(ControlKind::Light, 1);

        spa.ingest(SpaUpdate::batch(vec![
            SpaUpdate::Configuration(configuration()),
            SpaUpdate::control(light, ControlState::ON),
        ]));

        assert!(spa.control(light).unwrap().state().unwrap().is_on());
    }

    #[test]
    fn control_states_before_configuration_in_a_batch() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        let pump = ControlId::new(ControlKind::Pump, 1);

        spa.ingest(SpaUpdate::batch(vec![
            SpaUpdate::control(pump, ControlState::LOW),
            SpaUpdate::Temperature(37.5),
            SpaUpdate::Configuration(configuration()),
        ]));

        assert_eq!(spa.control(pump).unwrap().state().unwrap(), ControlState::LOW);
        assert_eq!(spa.temperature().unwrap(), 37.5);
    }

    #[test]
    fn link_change_notifies_controls() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(configuration()));
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();
        let session_hits = counter(&spa);
        let pump_hits = counter(pump.as_ref());

        spa.set_connected(true);
        spa.set_connected(true);
        spa.disconnect();

        assert_eq!(session_hits.load(Ordering::SeqCst), 2);
        assert_eq!(pump_hits.load(Ordering::SeqCst), 2);
        assert!(!pump.is_connected());
    }

    #[test]
    fn temperature_limits_follow_unit_and_range() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::batch(vec![
            SpaUpdate::Configuration(configuration()),
            SpaUpdate::TemperatureUnit(TemperatureUnit::Fahrenheit),
            SpaUpdate::control(
                ControlId::single(ControlKind::TemperatureRange),
                TemperatureRange::High.as_state(),
            ),
        ]));

        assert_eq!(spa.temperature_minimum().unwrap(), 80.0);
        assert_eq!(spa.temperature_maximum().unwrap(), 104.0);
        assert_eq!(
            temperature_limits(TemperatureUnit::Celsius, TemperatureRange::Low),
            (10.0, 26.0)
        );
    }

    #[tokio::test]
    async fn send_requires_connection() {
        let (spa, mut rx) = SpaClient::channel("spa.local", 4);
        let err = spa.set_filter_cycle_2_enabled(true).await.unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::NotConnected)));

        spa.set_connected(true);
        spa.set_temperature(38.5).await.unwrap();
        assert_eq!(rx.recv().await, Some(SpaCommand::SetTemperature(38.5)));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (spa, rx) = SpaClient::channel("spa.local", 4);
        spa.set_connected(true);
        drop(rx);

        let err = spa.request_configuration().await.unwrap_err();
        assert!(matches!(err, Error::Command(CommandError::Closed)));
    }

    #[tokio::test]
    async fn non_finite_temperature_is_rejected() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.set_connected(true);
        let err = spa.set_temperature(f64::NAN).await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::InvalidTemperature(_))));
    }
}
