// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The temperature range selector.

use std::sync::Arc;
use std::time::Duration;

use crate::client::SpaControl;
use crate::entity::{Entity, EntityCategory, EntityDescription, EntityHandle, Writable};
use crate::error::{Error, Result};
use crate::types::TemperatureRange;

use super::{Platform, PlatformEntity};

/// The temperature range; named after its control.
pub static TEMPERATURE_RANGE: EntityDescription<SpaControl, TemperatureRange> =
    EntityDescription {
        key: "temperature_range",
        name: None,
        category: Some(EntityCategory::Config),
        device_class: None,
        unit: None,
        icon: None,
        value_fn: |control| {
            TemperatureRange::from_state(control.state()?)
                .ok_or(Error::not_yet_available("temperature range"))
        },
    };

/// Low/high temperature range picker.
#[derive(Debug)]
pub struct BalboaSelect {
    entity: Entity<SpaControl, TemperatureRange>,
}

impl BalboaSelect {
    /// Creates the select for the temperature range control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn new(control: Arc<SpaControl>, freshness_window: Duration) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(control, &TEMPERATURE_RANGE)?
                .with_freshness_window(freshness_window),
        })
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn entity(&self) -> &Entity<SpaControl, TemperatureRange> {
        &self.entity
    }

    /// Returns the option names.
    #[must_use]
    pub fn options(&self) -> Vec<&'static str> {
        self.entity
            .referent()
            .options()
            .iter()
            .filter_map(|state| TemperatureRange::from_state(*state))
            .map(|range| range.as_str())
            .collect()
    }

    /// Returns the selected option.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn current_option(&self) -> Result<&'static str> {
        Ok(self.entity.current_value()?.as_str())
    }

    /// Selects an option by name.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownOption`](crate::error::ValueError::UnknownOption)
    /// for unknown names and the errors of [`SpaControl::set_state`].
    pub async fn select_option(&self, option: &str) -> Result<()> {
        let range: TemperatureRange = option.parse()?;
        self.entity.write(range.as_state()).await
    }
}

impl PlatformEntity for BalboaSelect {
    fn platform(&self) -> Platform {
        Platform::Select
    }

    fn handle(&self) -> &dyn EntityHandle {
        &self.entity
    }

    fn state(&self) -> Result<String> {
        self.current_option().map(str::to_string)
    }

    fn icon(&self) -> Option<&'static str> {
        self.entity.current_value().ok().map(|range| range.icon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SpaClient;
    use crate::command::SpaCommand;
    use crate::entity::DEFAULT_FRESHNESS_WINDOW;
    use crate::error::ValueError;
    use crate::state::{SpaConfiguration, SpaUpdate};
    use crate::types::{ControlId, ControlKind};

    #[tokio::test]
    async fn select_temperature_range() {
        let (spa, mut rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(SpaConfiguration::new(
            "00:15:27:ab:cd:ef".parse().unwrap(),
            "BP501G1",
            "1.0",
        )));
        spa.set_connected(true);
        let id = ControlId::single(ControlKind::TemperatureRange);
        let select = BalboaSelect::new(spa.control(id).unwrap(), DEFAULT_FRESHNESS_WINDOW).unwrap();

        assert_eq!(select.options(), vec!["LOW", "HIGH"]);
        assert_eq!(select.icon(), None);
        assert_eq!(select.entity().category(), Some(EntityCategory::Config));

        spa.ingest(SpaUpdate::control(id, TemperatureRange::Low.as_state()));
        assert_eq!(select.current_option().unwrap(), "LOW");
        assert_eq!(select.icon(), Some("mdi:thermometer-minus"));

        select.select_option("HIGH").await.unwrap();
        assert_eq!(
            rx.recv().await,
            Some(SpaCommand::SetControl { id, state: TemperatureRange::High.as_state() })
        );

        let err = select.select_option("MEDIUM").await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownOption(_))));
    }
}
