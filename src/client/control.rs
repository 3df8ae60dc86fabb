// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control referents owned by a session.

use std::fmt;
use std::sync::Weak;

use parking_lot::RwLock;
use tokio::time::Instant;

use crate::command::SpaCommand;
use crate::error::{ConnectionError, Error, Result, ValueError};
use crate::subscription::{ListenerRegistry, Observable, SubscriptionId};
use crate::types::{ControlId, ControlKind, ControlState};

use super::SpaClient;
use super::session::Shared;

/// One controllable part of a spa: a pump, light, aux relay, mister, the
/// circulation pump, or the heat mode and temperature range selectors.
///
/// Controls are created by the session when the configuration handshake
/// completes and live as long as it does. Each control has its own
/// observer list, notified only when its state changes or the link flips.
pub struct SpaControl {
    id: ControlId,
    options: Vec<ControlState>,
    state: RwLock<Option<ControlState>>,
    listeners: ListenerRegistry,
    session: Weak<Shared>,
}

impl SpaControl {
    pub(super) fn new(id: ControlId, options: Vec<ControlState>, session: Weak<Shared>) -> Self {
        Self {
            id,
            options,
            state: RwLock::new(None),
            listeners: ListenerRegistry::new(),
            session,
        }
    }

    /// Returns the control's address.
    #[must_use]
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// Returns the control's kind.
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        self.id.kind
    }

    /// Returns the 1-based index among controls of the same kind.
    #[must_use]
    pub fn index(&self) -> u8 {
        self.id.index
    }

    /// Returns the display name, e.g. `Pump 2`.
    #[must_use]
    pub fn name(&self) -> String {
        self.id.name()
    }

    /// Returns the states this control accepts, in ascending order.
    #[must_use]
    pub fn options(&self) -> &[ControlState] {
        &self.options
    }

    /// Returns the highest accepted state.
    #[must_use]
    pub fn max_option(&self) -> ControlState {
        self.options.last().copied().unwrap_or_default()
    }

    /// Returns the last reported state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reports it.
    pub fn state(&self) -> Result<ControlState> {
        self.state
            .read()
            .ok_or(Error::not_yet_available("control state"))
    }

    /// Returns the owning session, unless it was dropped.
    #[must_use]
    pub fn client(&self) -> Option<SpaClient> {
        self.session.upgrade().map(SpaClient::from_shared)
    }

    /// Returns `true` while the owning session is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.client().is_some_and(|c| c.is_connected())
    }

    /// Returns when the owning session last ingested telemetry.
    #[must_use]
    pub fn last_update(&self) -> Option<Instant> {
        self.client().and_then(|c| c.last_update())
    }

    /// Requests a new state.
    ///
    /// Returns once the command is queued. The control keeps reporting its
    /// old state until the spa confirms the change through telemetry.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidOption`] if `state` is not one of
    /// [`options`](Self::options), and the errors of [`SpaClient::send`].
    pub async fn set_state(&self, state: ControlState) -> Result<()> {
        if !self.options.contains(&state) {
            return Err(ValueError::InvalidOption {
                control: self.name(),
                value: state.value(),
            }
            .into());
        }
        let client = self.client().ok_or(ConnectionError::NotConnected)?;
        client
            .send(SpaCommand::SetControl { id: self.id, state })
            .await
    }

    pub(super) fn apply(&self, state: ControlState) -> bool {
        let mut current = self.state.write();
        if *current == Some(state) {
            return false;
        }
        *current = Some(state);
        true
    }

    pub(super) fn notify(&self) {
        self.listeners.dispatch();
    }
}

impl Observable for SpaControl {
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for SpaControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaControl")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandError;
    use crate::state::{SpaConfiguration, SpaUpdate};

    fn spa() -> (SpaClient, tokio::sync::mpsc::Receiver<SpaCommand>) {
        let (spa, rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(
            SpaConfiguration::new("00:15:27:ab:cd:ef".parse().unwrap(), "BP501G1", "1.0")
                .with_pumps(vec![2]),
        ));
        (spa, rx)
    }

    #[test]
    fn pump_options_and_name() {
        let (spa, _rx) = spa();
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();
        assert_eq!(pump.name(), "Pump 1");
        assert_eq!(pump.max_option(), ControlState::HIGH);
        assert_eq!(pump.options().len(), 3);
        assert!(pump.state().unwrap_err().is_not_yet_available());
    }

    #[tokio::test]
    async fn set_state_validates_options() {
        let (spa, _rx) = spa();
        spa.set_connected(true);
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();

        let err = pump.set_state(ControlState::new(3)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidOption { value: 3, .. })
        ));
    }

    #[tokio::test]
    async fn set_state_queues_without_changing_state() {
        let (spa, mut rx) = spa();
        spa.set_connected(true);
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();
        spa.ingest(SpaUpdate::control(pump.id(), ControlState::OFF));

        pump.set_state(ControlState::HIGH).await.unwrap();

        assert_eq!(pump.state().unwrap(), ControlState::OFF);
        assert_eq!(
            rx.recv().await,
            Some(SpaCommand::SetControl {
                id: pump.id(),
                state: ControlState::HIGH
            })
        );
    }

    #[tokio::test]
    async fn set_state_after_disconnect_fails() {
        let (spa, _rx) = spa();
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();
        spa.set_connected(true);
        spa.disconnect();

        let err = pump.set_state(ControlState::LOW).await.unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::NotConnected)));
        assert!(!matches!(err, Error::Command(CommandError::Closed)));
    }

    #[test]
    fn control_outlives_dropped_session() {
        let (spa, _rx) = spa();
        let pump = spa.control(ControlId::new(ControlKind::Pump, 1)).unwrap();
        drop(spa);
        assert!(pump.client().is_none());
        assert!(!pump.is_connected());
        assert!(pump.last_update().is_none());
    }
}
