// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory spas for tests and documentation.
//!
//! [`MockConnector`] stands in for the wire-protocol client: it hands out
//! connected sessions, optionally completes the configuration handshake and
//! keeps the latest session's command receiver so tests can inspect what
//! was queued.
//!
//! Compiled for this crate's own tests and behind the `testing` feature.
//!
//! ```
//! use balboa_entities::client::Connector;
//! use balboa_entities::testing::MockConnector;
//!
//! #[tokio::main]
//! async fn main() -> balboa_entities::Result<()> {
//!     let connector = MockConnector::new();
//!     let spa = connector.connect("192.168.1.20").await?;
//!
//!     spa.set_temperature(38.0).await?;
//!     let mut commands = connector.take_commands().unwrap();
//!     assert_eq!(commands.recv().await.unwrap().name(), "SetTemperature");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::client::{Connector, DEFAULT_COMMAND_CAPACITY, SpaClient};
use crate::command::SpaCommand;
use crate::error::ConnectionError;
use crate::state::{SpaConfiguration, SpaUpdate};
use crate::types::MacAddress;

/// MAC address of the sample spa.
pub const MAC: MacAddress = MacAddress::new([0x00, 0x15, 0x27, 0xab, 0xcd, 0xef]);

/// Model of the sample spa.
pub const MODEL: &str = "BP501G1";

/// Software version of the sample spa.
pub const SOFTWARE_VERSION: &str = "M100_220 V44.0";

/// Returns the sample spa's MAC address.
#[must_use]
pub fn mac() -> MacAddress {
    MAC
}

/// A spa with two pumps, a light, an aux relay, a mister and a
/// circulation pump.
#[must_use]
pub fn configuration() -> SpaConfiguration {
    SpaConfiguration::new(MAC, MODEL, SOFTWARE_VERSION)
        .with_pumps(vec![2, 1])
        .with_lights(1)
        .with_aux(1)
        .with_misters(1)
        .with_circulation_pump()
}

/// Creates a connected session that already reported [`configuration`].
#[must_use]
pub fn session(host: &str) -> (SpaClient, mpsc::Receiver<SpaCommand>) {
    let (spa, rx) = SpaClient::channel(host, DEFAULT_COMMAND_CAPACITY);
    spa.set_connected(true);
    spa.ingest(SpaUpdate::Configuration(configuration()));
    (spa, rx)
}

#[derive(Debug)]
struct Inner {
    reachable: AtomicBool,
    configuration: Mutex<Option<SpaConfiguration>>,
    session: Mutex<Option<SpaClient>>,
    commands: Mutex<Option<mpsc::Receiver<SpaCommand>>>,
    connects: AtomicUsize,
}

/// [`Connector`] backed by in-memory sessions.
///
/// Clones share their state.
#[derive(Debug, Clone)]
pub struct MockConnector {
    inner: Arc<Inner>,
}

impl MockConnector {
    /// Creates a connector whose spas answer with [`configuration`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                reachable: AtomicBool::new(true),
                configuration: Mutex::new(Some(configuration())),
                session: Mutex::new(None),
                commands: Mutex::new(None),
                connects: AtomicUsize::new(0),
            }),
        }
    }

    /// Creates a connector that refuses every connection.
    #[must_use]
    pub fn unreachable() -> Self {
        let connector = Self::new();
        connector.set_reachable(false);
        connector
    }

    /// Answers with `configuration` instead of the sample spa.
    #[must_use]
    pub fn with_configuration(self, configuration: SpaConfiguration) -> Self {
        *self.inner.configuration.lock() = Some(configuration);
        self
    }

    /// Connects without ever completing the configuration handshake.
    #[must_use]
    pub fn without_configuration(self) -> Self {
        *self.inner.configuration.lock() = None;
        self
    }

    /// Makes later connection attempts succeed or fail.
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Returns how many connection attempts were made.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Returns the most recent session handed out.
    ///
    /// Earlier sessions are released on the next connect.
    #[must_use]
    pub fn last_session(&self) -> Option<SpaClient> {
        self.inner.session.lock().clone()
    }

    /// Takes the command receiver of the most recent session.
    ///
    /// Returns `None` if no session was opened or it was already taken.
    #[must_use]
    pub fn take_commands(&self) -> Option<mpsc::Receiver<SpaCommand>> {
        self.inner.commands.lock().take()
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MockConnector {
    async fn connect(&self, host: &str) -> Result<SpaClient, ConnectionError> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        if !self.inner.reachable.load(Ordering::SeqCst) {
            return Err(ConnectionError::Unreachable(host.to_string()));
        }

        let (spa, rx) = SpaClient::channel(host, DEFAULT_COMMAND_CAPACITY);
        spa.set_connected(true);
        if let Some(configuration) = self.inner.configuration.lock().clone() {
            spa.ingest(SpaUpdate::Configuration(configuration));
        }

        *self.inner.session.lock() = Some(spa.clone());
        *self.inner.commands.lock() = Some(rx);
        Ok(spa)
    }
}
