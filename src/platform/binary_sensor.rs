// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary sensors of the session.

use std::sync::Arc;
use std::time::Duration;

use crate::client::SpaClient;
use crate::entity::{DeviceClass, Entity, EntityCategory, EntityDescription, EntityHandle};
use crate::error::{Error, Result};
use crate::state::FilterCycleId;

use super::{Platform, PlatformEntity};

/// A binary sensor description with optional on/off icons.
#[derive(Debug)]
pub struct BinarySensorDescription {
    /// Entity metadata and projection.
    pub entity: EntityDescription<SpaClient, bool>,
    /// Icons shown while on and while off.
    pub on_off_icons: Option<(&'static str, &'static str)>,
}

const FILTER_CYCLE_ICONS: (&str, &str) = ("mdi:sync", "mdi:sync-off");

/// Whether the protocol link is up.
pub static MODULE: BinarySensorDescription = BinarySensorDescription {
    entity: EntityDescription {
        key: "module",
        name: Some("Module"),
        category: Some(EntityCategory::Diagnostic),
        device_class: Some(DeviceClass::Connectivity),
        unit: None,
        icon: None,
        value_fn: |spa| Ok(spa.is_connected()),
    },
    on_off_icons: None,
};

/// Whether filter cycle 1 is running.
pub static FILTER_CYCLE_1: BinarySensorDescription = BinarySensorDescription {
    entity: EntityDescription {
        key: "filter_cycle_1",
        name: Some("Filter cycle 1"),
        category: None,
        device_class: Some(DeviceClass::Running),
        unit: None,
        icon: None,
        value_fn: |spa| spa.filter_cycle_running(FilterCycleId::One),
    },
    on_off_icons: Some(FILTER_CYCLE_ICONS),
};

/// Whether filter cycle 2 is running.
pub static FILTER_CYCLE_2: BinarySensorDescription = BinarySensorDescription {
    entity: EntityDescription {
        key: "filter_cycle_2",
        name: Some("Filter cycle 2"),
        category: None,
        device_class: Some(DeviceClass::Running),
        unit: None,
        icon: None,
        value_fn: |spa| spa.filter_cycle_running(FilterCycleId::Two),
    },
    on_off_icons: Some(FILTER_CYCLE_ICONS),
};

/// Whether the circulation pump is running; only for spas that have one.
pub static CIRCULATION_PUMP: BinarySensorDescription = BinarySensorDescription {
    entity: EntityDescription {
        key: "circulation_pump",
        name: Some("Circulation pump"),
        category: None,
        device_class: Some(DeviceClass::Running),
        unit: None,
        icon: None,
        value_fn: |spa| {
            let pump = spa
                .circulation_pump()
                .ok_or(Error::not_yet_available("circulation pump"))?;
            Ok(pump.state()?.is_on())
        },
    },
    on_off_icons: Some(("mdi:pump", "mdi:pump-off")),
};

/// Binary sensors every spa has.
pub static DESCRIPTIONS: [&BinarySensorDescription; 3] = [&MODULE, &FILTER_CYCLE_1, &FILTER_CYCLE_2];

/// A binary sensor backed by the session.
#[derive(Debug)]
pub struct BalboaBinarySensor {
    entity: Entity<SpaClient, bool>,
    on_off_icons: Option<(&'static str, &'static str)>,
}

impl BalboaBinarySensor {
    /// Creates the sensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn new(
        spa: Arc<SpaClient>,
        description: &'static BinarySensorDescription,
        freshness_window: Duration,
    ) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(spa, &description.entity)?.with_freshness_window(freshness_window),
            on_off_icons: description.on_off_icons,
        })
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn entity(&self) -> &Entity<SpaClient, bool> {
        &self.entity
    }

    /// Returns `true` if the sensor is on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported the value.
    pub fn is_on(&self) -> Result<bool> {
        self.entity.current_value()
    }
}

impl PlatformEntity for BalboaBinarySensor {
    fn platform(&self) -> Platform {
        Platform::BinarySensor
    }

    fn handle(&self) -> &dyn EntityHandle {
        &self.entity
    }

    fn state(&self) -> Result<String> {
        Ok(if self.is_on()? { "on" } else { "off" }.to_string())
    }

    fn icon(&self) -> Option<&'static str> {
        match (self.on_off_icons, self.is_on()) {
            (Some((on, _)), Ok(true)) => Some(on),
            (Some((_, off)), _) => Some(off),
            (None, _) => self.entity.description().icon,
        }
    }
}
