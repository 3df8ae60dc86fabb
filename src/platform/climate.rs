// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The spa heater as a climate entity.

use std::sync::Arc;
use std::time::Duration;

use crate::client::{SpaClient, SpaControl};
use crate::entity::{Entity, EntityDescription, EntityHandle, Writable};
use crate::error::{Error, Result};
use crate::types::{
    ControlId, ControlKind, HeatMode, HvacAction, HvacMode, TemperatureUnit,
};

use super::{Platform, PlatformEntity};

/// The climate entity; unnamed, so it takes the device's name.
pub static CLIMATE: EntityDescription<SpaClient, HvacMode> = EntityDescription {
    key: "climate",
    name: None,
    category: None,
    device_class: None,
    unit: None,
    icon: Some("mdi:hot-tub"),
    value_fn: |spa| spa.heat_mode().map(|mode| mode.hvac_mode()),
};

/// HVAC modes the display layer may request.
pub const HVAC_MODES: [HvacMode; 2] = [HvacMode::Heat, HvacMode::Off];

/// Rounds a target temperature entered in `host` units for a spa that works
/// in `spa` units.
///
/// Celsius spas accept half degrees, Fahrenheit spas whole degrees.
#[must_use]
pub fn round_for_spa(temperature: f64, spa: TemperatureUnit, host: TemperatureUnit) -> f64 {
    if spa == host {
        return temperature;
    }
    match spa {
        TemperatureUnit::Celsius => 0.5 * (temperature / 0.5).round_ties_even(),
        TemperatureUnit::Fahrenheit => (temperature + 0.5).floor(),
    }
}

/// Water temperature, heat mode and heater activity of a spa.
#[derive(Debug)]
pub struct BalboaClimate {
    entity: Entity<SpaClient, HvacMode>,
    host_unit: TemperatureUnit,
}

impl BalboaClimate {
    /// Creates the climate entity.
    ///
    /// `host_unit` is the display layer's unit; it decides precision and
    /// rounding of requested temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn new(
        spa: Arc<SpaClient>,
        host_unit: TemperatureUnit,
        freshness_window: Duration,
    ) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(spa, &CLIMATE)?.with_freshness_window(freshness_window),
            host_unit,
        })
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn entity(&self) -> &Entity<SpaClient, HvacMode> {
        &self.entity
    }

    fn spa(&self) -> &SpaClient {
        self.entity.referent()
    }

    fn heat_mode_control(&self) -> Result<Arc<SpaControl>> {
        self.spa()
            .control(ControlId::single(ControlKind::HeatMode))
            .ok_or(Error::not_yet_available("heat mode"))
    }

    /// Returns the display precision: halves for Celsius hosts, whole
    /// degrees otherwise.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.host_unit.precision()
    }

    /// Returns the spa's unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn temperature_unit(&self) -> Result<TemperatureUnit> {
        self.spa().temperature_unit()
    }

    /// Returns the water temperature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn current_temperature(&self) -> Result<f64> {
        self.spa().temperature()
    }

    /// Returns the target temperature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn target_temperature(&self) -> Result<f64> {
        self.spa().target_temperature()
    }

    /// Returns the lowest settable temperature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until unit and range are reported.
    pub fn min_temp(&self) -> Result<f64> {
        self.spa().temperature_minimum()
    }

    /// Returns the highest settable temperature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until unit and range are reported.
    pub fn max_temp(&self) -> Result<f64> {
        self.spa().temperature_maximum()
    }

    /// Returns the HVAC mode derived from the heat mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn hvac_mode(&self) -> Result<HvacMode> {
        self.entity.current_value()
    }

    /// Returns what the heater is doing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn hvac_action(&self) -> Result<HvacAction> {
        self.spa().heat_state().map(|s| s.hvac_action())
    }

    /// Returns the current preset name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported it.
    pub fn preset_mode(&self) -> Result<&'static str> {
        self.spa().heat_mode().map(|m| m.preset_name())
    }

    /// Returns the presets that can be requested.
    #[must_use]
    pub fn preset_modes(&self) -> Vec<&'static str> {
        self.heat_mode_control()
            .map(|control| {
                control
                    .options()
                    .iter()
                    .filter_map(|state| HeatMode::from_state(*state))
                    .map(|mode| mode.preset_name())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Requests a new target temperature given in the display layer's unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa's unit is known, and
    /// dispatch errors.
    pub async fn set_temperature(&self, temperature: f64) -> Result<()> {
        let spa_unit = self.temperature_unit()?;
        let target = round_for_spa(temperature, spa_unit, self.host_unit);
        tracing::debug!(requested = temperature, target, "Setting spa temperature");
        self.spa().set_temperature(target).await
    }

    /// Requests a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownOption`](crate::error::ValueError::UnknownOption)
    /// for unknown names, and the errors of [`SpaControl::set_state`].
    pub async fn set_preset_mode(&self, preset: &str) -> Result<()> {
        let mode = HeatMode::from_preset_name(preset)?;
        self.heat_mode_control()?.set_state(mode.as_state()).await
    }

    /// Requests an HVAC mode.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SpaControl::set_state`]; `Auto` maps onto a
    /// mode the spa does not accept.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        self.heat_mode_control()?
            .set_state(mode.heat_mode().as_state())
            .await
    }
}

impl Writable for BalboaClimate {
    type Value = f64;

    async fn write(&self, value: f64) -> Result<()> {
        self.set_temperature(value).await
    }
}

impl PlatformEntity for BalboaClimate {
    fn platform(&self) -> Platform {
        Platform::Climate
    }

    fn handle(&self) -> &dyn EntityHandle {
        &self.entity
    }

    fn state(&self) -> Result<String> {
        Ok(self.hvac_mode()?.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SpaCommand;
    use crate::entity::DEFAULT_FRESHNESS_WINDOW;
    use crate::error::ValueError;
    use crate::state::{SpaConfiguration, SpaUpdate};
    use crate::types::HeatState;
    use tokio::sync::mpsc;

    fn climate(host: TemperatureUnit) -> (BalboaClimate, Arc<SpaClient>, mpsc::Receiver<SpaCommand>) {
        let (spa, rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(SpaConfiguration::new(
            "00:15:27:ab:cd:ef".parse().unwrap(),
            "BP501G1",
            "1.0",
        )));
        spa.set_connected(true);
        let spa = Arc::new(spa);
        let climate = BalboaClimate::new(Arc::clone(&spa), host, DEFAULT_FRESHNESS_WINDOW).unwrap();
        (climate, spa, rx)
    }

    #[test]
    fn rounding_only_when_units_differ() {
        use TemperatureUnit::{Celsius, Fahrenheit};
        assert_eq!(round_for_spa(38.3, Celsius, Celsius), 38.3);
        assert_eq!(round_for_spa(38.3, Celsius, Fahrenheit), 38.5);
        assert_eq!(round_for_spa(38.2, Celsius, Fahrenheit), 38.0);
        assert_eq!(round_for_spa(100.4, Fahrenheit, Celsius), 100.0);
        assert_eq!(round_for_spa(100.5, Fahrenheit, Celsius), 101.0);
    }

    #[test]
    fn modes_follow_heat_mode_control() {
        let (climate, spa, _rx) = climate(TemperatureUnit::Celsius);
        assert!(climate.hvac_mode().unwrap_err().is_not_yet_available());

        spa.ingest(SpaUpdate::batch(vec![
            SpaUpdate::control(
                ControlId::single(ControlKind::HeatMode),
                HeatMode::ReadyInRest.as_state(),
            ),
            SpaUpdate::HeatState(HeatState::HeatWaiting),
        ]));

        assert_eq!(climate.hvac_mode().unwrap(), HvacMode::Auto);
        assert_eq!(climate.preset_mode().unwrap(), "Ready-in-Rest");
        assert_eq!(climate.hvac_action().unwrap(), HvacAction::Idle);
        assert_eq!(climate.preset_modes(), vec!["Ready", "Rest"]);
        assert_eq!(climate.state().unwrap(), "auto");
        assert_eq!(climate.icon(), Some("mdi:hot-tub"));
    }

    #[test]
    fn climate_is_unnamed() {
        let (climate, _spa, _rx) = climate(TemperatureUnit::Celsius);
        assert_eq!(climate.entity().name(), None);
        assert_eq!(climate.entity().unique_id(), "00:15:27:ab:cd:ef-BP501G1");
        assert_eq!(climate.precision(), 0.5);
    }

    #[tokio::test]
    async fn set_temperature_rounds_for_fahrenheit_spa() {
        let (climate, spa, mut rx) = climate(TemperatureUnit::Celsius);
        spa.ingest(SpaUpdate::TemperatureUnit(TemperatureUnit::Fahrenheit));

        climate.write(100.6).await.unwrap();

        assert_eq!(rx.recv().await, Some(SpaCommand::SetTemperature(101.0)));
    }

    #[tokio::test]
    async fn set_modes_dispatch_heat_mode() {
        let (climate, _spa, mut rx) = climate(TemperatureUnit::Celsius);

        climate.set_hvac_mode(HvacMode::Off).await.unwrap();
        climate.set_preset_mode("Ready").await.unwrap();

        let heat_mode = ControlId::single(ControlKind::HeatMode);
        assert_eq!(
            rx.recv().await,
            Some(SpaCommand::SetControl { id: heat_mode, state: HeatMode::Rest.as_state() })
        );
        assert_eq!(
            rx.recv().await,
            Some(SpaCommand::SetControl { id: heat_mode, state: HeatMode::Ready.as_state() })
        );

        let err = climate.set_preset_mode("Sleep").await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownOption(_))));
        let err = climate.set_hvac_mode(HvacMode::Auto).await.unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::InvalidOption { .. })));
    }
}
