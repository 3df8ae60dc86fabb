// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display-layer platforms built on [`Entity`](crate::entity::Entity).
//!
//! | Platform | Referent | Entities |
//! |----------|----------|----------|
//! | [`binary_sensor`] | session | Module link, filter cycles 1 and 2, circulation pump |
//! | [`climate`] | session | Water heater |
//! | [`fan`] | pump controls | One per jet pump |
//! | [`light`] | light controls | One per light |
//! | [`select`] | temperature range control | Low/high range |
//! | [`sensor`] | session | Filter cycle start and duration |
//! | [`switch`] | aux and mister controls, session | One per relay, filter cycle 2 enable |
//!
//! [`setup_entities`] builds all of them for a configured session.

pub mod binary_sensor;
pub mod climate;
pub mod fan;
pub mod light;
pub mod select;
pub mod sensor;
pub mod switch;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::client::SpaClient;
use crate::entity::{DEFAULT_FRESHNESS_WINDOW, EntityHandle, Freshness, RefreshCallback};
use crate::error::Result;
use crate::types::{ControlKind, TemperatureUnit};

pub use binary_sensor::BalboaBinarySensor;
pub use climate::BalboaClimate;
pub use fan::BalboaFan;
pub use light::BalboaLight;
pub use select::BalboaSelect;
pub use sensor::{BalboaSensor, SensorValue};
pub use switch::BalboaSwitch;

/// The display-layer platform an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// On/off sensors.
    BinarySensor,
    /// Thermostats.
    Climate,
    /// Fans; used for jet pumps.
    Fan,
    /// Lights.
    Light,
    /// Option pickers.
    Select,
    /// Value sensors.
    Sensor,
    /// Switches.
    Switch,
}

impl Platform {
    /// Returns the platform name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BinarySensor => "binary_sensor",
            Self::Climate => "climate",
            Self::Fan => "fan",
            Self::Light => "light",
            Self::Select => "select",
            Self::Sensor => "sensor",
            Self::Switch => "switch",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the display layer writes after a refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    /// The entity's unique id.
    pub unique_id: String,
    /// Formatted state; `None` until the spa reported it.
    pub state: Option<String>,
    /// Whether the session is connected.
    pub available: bool,
    /// Whether the state is assumed rather than live.
    pub assumed_state: bool,
    /// Icon for the current state.
    pub icon: Option<&'static str>,
}

/// An entity of one of the platforms.
pub trait PlatformEntity: Send + Sync {
    /// Returns the platform.
    fn platform(&self) -> Platform;

    /// Returns the underlying adapter.
    fn handle(&self) -> &dyn EntityHandle;

    /// Formats the current state for the display layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// until the spa reported the value.
    fn state(&self) -> Result<String>;

    /// Returns the icon for the current state.
    fn icon(&self) -> Option<&'static str> {
        self.handle().icon()
    }

    /// Reads everything the display layer shows.
    fn snapshot(&self) -> EntityState {
        let handle = self.handle();
        let state = match self.state() {
            Ok(state) => Some(state),
            Err(e) if e.is_not_yet_available() => None,
            Err(e) => {
                tracing::warn!(unique_id = %handle.unique_id(), error = %e, "Failed to read entity state");
                None
            }
        };
        EntityState {
            unique_id: handle.unique_id(),
            state,
            available: handle.is_available(),
            assumed_state: handle.freshness() == Freshness::Assumed,
            icon: self.icon(),
        }
    }
}

/// Settings applied to every entity of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySettings {
    /// Temperature unit of the display layer.
    pub temperature_unit: TemperatureUnit,
    /// How long telemetry is trusted.
    pub freshness_window: Duration,
}

impl EntitySettings {
    /// Sets the display-layer temperature unit.
    #[must_use]
    pub fn with_temperature_unit(mut self, unit: TemperatureUnit) -> Self {
        self.temperature_unit = unit;
        self
    }

    /// Sets the freshness window.
    #[must_use]
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }
}

impl Default for EntitySettings {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::Celsius,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }
}

/// Every entity of one spa, grouped by platform.
#[derive(Debug, Default)]
pub struct SpaEntities {
    /// Binary sensors.
    pub binary_sensors: Vec<BalboaBinarySensor>,
    /// The climate entity.
    pub climates: Vec<BalboaClimate>,
    /// One fan per jet pump.
    pub fans: Vec<BalboaFan>,
    /// One light per light control.
    pub lights: Vec<BalboaLight>,
    /// The temperature range select.
    pub selects: Vec<BalboaSelect>,
    /// Filter cycle sensors.
    pub sensors: Vec<BalboaSensor>,
    /// Relay and filter cycle switches.
    pub switches: Vec<BalboaSwitch>,
}

impl SpaEntities {
    /// Iterates over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &dyn PlatformEntity> {
        let binary_sensors = self.binary_sensors.iter().map(|e| e as &dyn PlatformEntity);
        let climates = self.climates.iter().map(|e| e as &dyn PlatformEntity);
        let fans = self.fans.iter().map(|e| e as &dyn PlatformEntity);
        let lights = self.lights.iter().map(|e| e as &dyn PlatformEntity);
        let selects = self.selects.iter().map(|e| e as &dyn PlatformEntity);
        let sensors = self.sensors.iter().map(|e| e as &dyn PlatformEntity);
        let switches = self.switches.iter().map(|e| e as &dyn PlatformEntity);
        binary_sensors
            .chain(climates)
            .chain(fans)
            .chain(lights)
            .chain(selects)
            .chain(sensors)
            .chain(switches)
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if there are no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds an entity by unique id.
    #[must_use]
    pub fn find(&self, unique_id: &str) -> Option<&dyn PlatformEntity> {
        self.iter().find(|e| e.handle().unique_id() == unique_id)
    }

    /// Attaches every entity, using `refresh_for` to build each callback.
    ///
    /// Returns the number of entities that were newly attached.
    pub fn attach_all<F>(&self, mut refresh_for: F) -> usize
    where
        F: FnMut(&dyn PlatformEntity) -> RefreshCallback,
    {
        self.iter()
            .filter(|e| e.handle().attach_callback(refresh_for(*e)))
            .count()
    }

    /// Detaches every entity. Returns the number that were attached.
    pub fn detach_all(&self) -> usize {
        self.iter().filter(|e| e.handle().detach()).count()
    }
}

/// Builds every entity the spa supports.
///
/// The session must have completed its configuration handshake. Exactly
/// one entity is created per referent and attribute; entities start
/// detached.
///
/// # Errors
///
/// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable) before
/// the configuration handshake.
pub fn setup_entities(client: &SpaClient, settings: &EntitySettings) -> Result<SpaEntities> {
    let window = settings.freshness_window;
    let session = Arc::new(client.clone());
    let mut entities = SpaEntities::default();

    for description in binary_sensor::DESCRIPTIONS {
        entities
            .binary_sensors
            .push(BalboaBinarySensor::new(Arc::clone(&session), description, window)?);
    }
    if client.circulation_pump().is_some() {
        entities.binary_sensors.push(BalboaBinarySensor::new(
            Arc::clone(&session),
            &binary_sensor::CIRCULATION_PUMP,
            window,
        )?);
    }

    entities.climates.push(BalboaClimate::new(
        Arc::clone(&session),
        settings.temperature_unit,
        window,
    )?);

    for pump in client.controls_of(ControlKind::Pump) {
        entities.fans.push(BalboaFan::new(pump, window)?);
    }
    for light in client.controls_of(ControlKind::Light) {
        entities.lights.push(BalboaLight::new(light, window)?);
    }
    for range in client.controls_of(ControlKind::TemperatureRange) {
        entities.selects.push(BalboaSelect::new(range, window)?);
    }

    for description in sensor::DESCRIPTIONS {
        entities
            .sensors
            .push(BalboaSensor::new(Arc::clone(&session), description, window)?);
    }

    entities
        .switches
        .push(BalboaSwitch::filter_cycle_2(Arc::clone(&session), window)?);
    for kind in [ControlKind::Aux, ControlKind::Mister] {
        for control in client.controls_of(kind) {
            entities.switches.push(BalboaSwitch::control(control, window)?);
        }
    }

    tracing::debug!(
        host = %client.host(),
        count = entities.len(),
        "Spa entities created"
    );
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::state::{SpaConfiguration, SpaUpdate};

    fn spa(config: SpaConfiguration) -> SpaClient {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(config));
        spa
    }

    fn full() -> SpaConfiguration {
        SpaConfiguration::new("00:15:27:ab:cd:ef".parse().unwrap(), "BP501G1", "1.0")
            .with_pumps(vec![2, 1])
            .with_lights(1)
            .with_aux(1)
            .with_misters(1)
            .with_circulation_pump()
    }

    #[test]
    fn setup_creates_one_entity_per_attribute() {
        let client = spa(full());
        let entities = setup_entities(&client, &EntitySettings::default()).unwrap();

        assert_eq!(entities.binary_sensors.len(), 4);
        assert_eq!(entities.climates.len(), 1);
        assert_eq!(entities.fans.len(), 2);
        assert_eq!(entities.lights.len(), 1);
        assert_eq!(entities.selects.len(), 1);
        assert_eq!(entities.sensors.len(), 4);
        assert_eq!(entities.switches.len(), 3);

        let ids: HashSet<String> = entities.iter().map(|e| e.handle().unique_id()).collect();
        assert_eq!(ids.len(), entities.len());
    }

    #[test]
    fn minimal_spa_has_no_optional_entities() {
        let client = spa(SpaConfiguration::new(
            "00:15:27:ab:cd:ef".parse().unwrap(),
            "BP501G1",
            "1.0",
        ));
        let entities = setup_entities(&client, &EntitySettings::default()).unwrap();

        assert_eq!(entities.binary_sensors.len(), 3);
        assert!(entities.fans.is_empty());
        assert!(entities.lights.is_empty());
        assert_eq!(entities.switches.len(), 1);
    }

    #[test]
    fn setup_before_configuration_fails() {
        let (client, _rx) = SpaClient::channel("spa.local", 4);
        let err = setup_entities(&client, &EntitySettings::default()).unwrap_err();
        assert!(err.is_not_yet_available());
    }

    #[test]
    fn attach_and_detach_all() {
        let client = spa(full());
        let entities = setup_entities(&client, &EntitySettings::default()).unwrap();
        let total = entities.len();

        assert_eq!(entities.attach_all(|_| Arc::new(|| {})), total);
        assert_eq!(entities.attach_all(|_| Arc::new(|| {})), 0);
        assert_eq!(entities.detach_all(), total);
    }

    #[test]
    fn snapshot_before_telemetry() {
        let client = spa(full());
        let entities = setup_entities(&client, &EntitySettings::default()).unwrap();
        let climate = entities.find("00:15:27:ab:cd:ef-BP501G1").unwrap();

        let snapshot = climate.snapshot();
        assert_eq!(snapshot.state, None);
        assert!(!snapshot.available);
        assert!(snapshot.assumed_state);
        assert_eq!(climate.platform(), Platform::Climate);
    }
}
