// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lifecycle of a configured spa.
//!
//! [`setup_entry`] turns a [`ConfigEntry`] into a running [`SpaIntegration`]:
//! a connected session, its platform entities and, when enabled, a task
//! that sets the spa clock once a day.
//!
//! ```
//! use balboa_entities::config::ConfigEntry;
//! use balboa_entities::integration::setup_entry;
//! use balboa_entities::platform::EntitySettings;
//! use balboa_entities::testing::{self, MockConnector};
//!
//! #[tokio::main]
//! async fn main() -> balboa_entities::Result<()> {
//!     let entry = ConfigEntry::new("BP501G1", "192.168.1.20", testing::mac());
//!     let mut spa = setup_entry(&entry, &MockConnector::new(), &EntitySettings::default()).await?;
//!
//!     assert!(!spa.entities().is_empty());
//!     spa.unload();
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use chrono::Local;
use tokio::task::JoinHandle;

use crate::client::{Connector, SpaClient};
use crate::config::{ConfigEntry, DEFAULT_VALIDATION_TIMEOUT, EntryOptions};
use crate::error::{ConnectionError, Result};
use crate::platform::{EntitySettings, SpaEntities, setup_entities};

/// How often the spa clock is set when time sync is enabled.
pub const TIME_SYNC_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// A configured spa that is up and running.
#[derive(Debug)]
pub struct SpaIntegration {
    entry: ConfigEntry,
    client: SpaClient,
    entities: SpaEntities,
    time_sync: Option<JoinHandle<()>>,
}

/// Connects to the spa of `entry` and builds its entities.
///
/// # Errors
///
/// Returns [`ConnectionError::NotReady`] if the spa cannot be reached or
/// does not finish its configuration handshake in time. Setup can be
/// retried later.
pub async fn setup_entry<C: Connector>(
    entry: &ConfigEntry,
    connector: &C,
    settings: &EntitySettings,
) -> Result<SpaIntegration> {
    let host = entry.host();
    tracing::debug!(host = %host, entry = %entry.entry_id, "Setting up spa");

    let client = connector.connect(host).await.map_err(|e| {
        tracing::warn!(host = %host, error = %e, "Failed to connect to spa");
        ConnectionError::NotReady(host.to_string())
    })?;

    if let Err(e) = client.wait_until_configured(DEFAULT_VALIDATION_TIMEOUT).await {
        tracing::warn!(host = %host, error = %e, "Spa did not finish configuration");
        client.disconnect();
        return Err(ConnectionError::NotReady(host.to_string()).into());
    }

    let entities = match setup_entities(&client, settings) {
        Ok(entities) => entities,
        Err(e) => {
            client.disconnect();
            return Err(e);
        }
    };
    tracing::info!(host = %host, entities = entities.len(), "Spa set up");

    let mut integration = SpaIntegration {
        entry: entry.clone(),
        client,
        entities,
        time_sync: None,
    };
    if entry.options.sync_time {
        integration.start_time_sync();
    }
    Ok(integration)
}

impl SpaIntegration {
    /// Returns the entry this spa was set up from.
    #[must_use]
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    /// Returns the session.
    #[must_use]
    pub fn client(&self) -> &SpaClient {
        &self.client
    }

    /// Returns the platform entities.
    #[must_use]
    pub fn entities(&self) -> &SpaEntities {
        &self.entities
    }

    /// Returns `true` while the daily clock sync is running.
    #[must_use]
    pub fn is_syncing_time(&self) -> bool {
        self.time_sync.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Applies changed options, starting or stopping the clock sync.
    pub fn update_options(&mut self, options: EntryOptions) {
        self.entry.options = options;
        self.stop_time_sync();
        if options.sync_time {
            self.start_time_sync();
        }
    }

    /// Detaches every entity, stops the clock sync and disconnects.
    ///
    /// Returns the number of entities that were attached.
    pub fn unload(&mut self) -> usize {
        let detached = self.entities.detach_all();
        self.stop_time_sync();
        self.client.disconnect();
        tracing::debug!(host = %self.client.host(), detached, "Spa unloaded");
        detached
    }

    fn start_time_sync(&mut self) {
        let client = self.client.clone();
        tracing::debug!(host = %client.host(), "Starting daily clock sync");
        self.time_sync = Some(tokio::spawn(async move {
            loop {
                let now = Local::now().time();
                match client.set_time(now).await {
                    Ok(()) => tracing::debug!(host = %client.host(), time = %now, "Spa clock set"),
                    Err(e) => tracing::warn!(host = %client.host(), error = %e, "Failed to set spa clock"),
                }
                tokio::time::sleep(TIME_SYNC_INTERVAL).await;
            }
        }));
    }

    fn stop_time_sync(&mut self) {
        if let Some(task) = self.time_sync.take() {
            task.abort();
        }
    }
}

impl Drop for SpaIntegration {
    fn drop(&mut self) {
        self.stop_time_sync();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::Error;
    use crate::command::SpaCommand;
    use crate::entity::RefreshCallback;
    use crate::platform::PlatformEntity;
    use crate::testing::{self, MockConnector};

    fn entry(sync_time: bool) -> ConfigEntry {
        ConfigEntry::new("BP501G1", "10.0.0.5", testing::mac())
            .with_options(EntryOptions { sync_time })
    }

    #[tokio::test]
    async fn unreachable_spa_is_not_ready() {
        let err = setup_entry(&entry(false), &MockConnector::unreachable(), &EntitySettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::NotReady(ref h)) if h == "10.0.0.5"));
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_configuration_is_not_ready() {
        let connector = MockConnector::new().without_configuration();
        let err = setup_entry(&entry(false), &connector, &EntitySettings::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Connection(ConnectionError::NotReady(_))));
        assert!(!connector.last_session().unwrap().is_connected());
    }

    #[tokio::test]
    async fn setup_builds_entities_without_time_sync() {
        let spa = setup_entry(&entry(false), &MockConnector::new(), &EntitySettings::default())
            .await
            .unwrap();

        assert!(!spa.is_syncing_time());
        assert_eq!(spa.entities().climates.len(), 1);
        assert_eq!(spa.entities().fans.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn time_sync_runs_daily() {
        let connector = MockConnector::new();
        let spa = setup_entry(&entry(true), &connector, &EntitySettings::default())
            .await
            .unwrap();
        let mut commands = connector.take_commands().unwrap();

        assert!(matches!(commands.recv().await, Some(SpaCommand::SetTime(_))));
        tokio::time::advance(TIME_SYNC_INTERVAL).await;
        assert!(matches!(commands.recv().await, Some(SpaCommand::SetTime(_))));
        assert!(spa.is_syncing_time());
    }

    #[tokio::test]
    async fn options_toggle_time_sync() {
        let mut spa = setup_entry(&entry(false), &MockConnector::new(), &EntitySettings::default())
            .await
            .unwrap();

        spa.update_options(EntryOptions { sync_time: true });
        assert!(spa.is_syncing_time());
        assert!(spa.entry().options.sync_time);

        spa.update_options(EntryOptions { sync_time: false });
        assert!(!spa.is_syncing_time());
    }

    #[tokio::test]
    async fn unload_detaches_and_disconnects() {
        let mut spa = setup_entry(&entry(true), &MockConnector::new(), &EntitySettings::default())
            .await
            .unwrap();
        let attached = spa
            .entities()
            .attach_all(|_| -> RefreshCallback { Arc::new(|| {}) });

        assert_eq!(spa.unload(), attached);
        assert!(!spa.client().is_connected());
        assert!(!spa.is_syncing_time());
        assert!(spa.entities().iter().all(|e| !e.handle().is_attached()));
    }
}
