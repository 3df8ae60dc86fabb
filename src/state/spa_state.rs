// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session-level spa state tracking.

use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::types::{
    ControlId, ControlKind, ControlState, HeatMode, HeatState, MacAddress, TemperatureRange,
    TemperatureUnit,
};

use super::{FilterCycleId, SpaUpdate};

/// Hardware layout and identity reported by the configuration handshake.
///
/// # Examples
///
/// ```
/// use balboa_entities::state::SpaConfiguration;
///
/// let config = SpaConfiguration::new("00:15:27:ab:cd:ef".parse().unwrap(), "BP501G1", "M100_226 V43.0")
///     .with_pumps(vec![2, 1])
///     .with_lights(1);
///
/// // Two pumps, one light, heat mode and temperature range
/// assert_eq!(config.controls().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaConfiguration {
    /// Hardware address of the Wi-Fi module.
    pub mac: MacAddress,
    /// Model name.
    pub model: String,
    /// Software version string.
    pub software_version: String,
    /// Highest speed of each jet pump, in pump order.
    pub pumps: Vec<u8>,
    /// Number of lights.
    pub lights: u8,
    /// Number of auxiliary relays.
    pub aux: u8,
    /// Number of misters.
    pub misters: u8,
    /// Whether a circulation pump is installed.
    pub circulation_pump: bool,
}

impl SpaConfiguration {
    /// Creates a configuration with no pumps, lights, aux relays or misters.
    #[must_use]
    pub fn new(
        mac: MacAddress,
        model: impl Into<String>,
        software_version: impl Into<String>,
    ) -> Self {
        Self {
            mac,
            model: model.into(),
            software_version: software_version.into(),
            pumps: Vec::new(),
            lights: 0,
            aux: 0,
            misters: 0,
            circulation_pump: false,
        }
    }

    /// Sets the highest speed of each jet pump.
    #[must_use]
    pub fn with_pumps(mut self, pumps: Vec<u8>) -> Self {
        self.pumps = pumps;
        self
    }

    /// Sets the number of lights.
    #[must_use]
    pub fn with_lights(mut self, count: u8) -> Self {
        self.lights = count;
        self
    }

    /// Sets the number of auxiliary relays.
    #[must_use]
    pub fn with_aux(mut self, count: u8) -> Self {
        self.aux = count;
        self
    }

    /// Sets the number of misters.
    #[must_use]
    pub fn with_misters(mut self, count: u8) -> Self {
        self.misters = count;
        self
    }

    /// Marks a circulation pump as installed.
    #[must_use]
    pub fn with_circulation_pump(mut self) -> Self {
        self.circulation_pump = true;
        self
    }

    /// Lists every control this spa exposes along with its valid states.
    #[must_use]
    pub fn controls(&self) -> Vec<(ControlId, Vec<ControlState>)> {
        let binary = || vec![ControlState::OFF, ControlState::ON];
        let mut controls = Vec::new();

        for (i, max_speed) in (1u8..).zip(&self.pumps) {
            let options = (0..=*max_speed).map(ControlState::new).collect();
            controls.push((ControlId::new(ControlKind::Pump, i), options));
        }
        for (kind, count) in [
            (ControlKind::Light, self.lights),
            (ControlKind::Aux, self.aux),
            (ControlKind::Mister, self.misters),
        ] {
            for i in 1..=count {
                controls.push((ControlId::new(kind, i), binary()));
            }
        }
        if self.circulation_pump {
            controls.push((ControlId::single(ControlKind::CirculationPump), binary()));
        }
        controls.push((
            ControlId::single(ControlKind::HeatMode),
            vec![HeatMode::Ready.as_state(), HeatMode::Rest.as_state()],
        ));
        controls.push((
            ControlId::single(ControlKind::TemperatureRange),
            vec![
                TemperatureRange::Low.as_state(),
                TemperatureRange::High.as_state(),
            ],
        ));
        controls
    }
}

/// Schedule and activity of one filter cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCycle {
    /// Local start time of day.
    pub start: Option<NaiveTime>,
    /// Run length.
    pub duration: Option<Duration>,
    /// Whether the cycle is running right now.
    pub running: Option<bool>,
}

/// Tracked session-level state of a spa.
///
/// All fields are optional because nothing is known until the spa reports
/// it. Control states are tracked by the controls themselves.
///
/// # Examples
///
/// ```
/// use balboa_entities::state::{SpaState, SpaUpdate};
///
/// let mut state = SpaState::new();
/// assert!(state.apply(&SpaUpdate::Temperature(37.0)));
/// assert!(!state.apply(&SpaUpdate::Temperature(37.0)));
/// assert_eq!(state.temperature(), Some(37.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaState {
    configuration: Option<SpaConfiguration>,
    temperature: Option<f64>,
    target_temperature: Option<f64>,
    temperature_unit: Option<TemperatureUnit>,
    heat_state: Option<HeatState>,
    filter_cycles: [FilterCycle; 2],
    filter_cycle_2_enabled: Option<bool>,
}

impl SpaState {
    /// Creates a new empty spa state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configuration, once the handshake finished.
    #[must_use]
    pub fn configuration(&self) -> Option<&SpaConfiguration> {
        self.configuration.as_ref()
    }

    /// Gets the current water temperature.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Gets the target water temperature.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Gets the panel's temperature unit.
    #[must_use]
    pub fn temperature_unit(&self) -> Option<TemperatureUnit> {
        self.temperature_unit
    }

    /// Gets the heater activity.
    #[must_use]
    pub fn heat_state(&self) -> Option<HeatState> {
        self.heat_state
    }

    /// Gets a filter cycle.
    #[must_use]
    pub fn filter_cycle(&self, cycle: FilterCycleId) -> &FilterCycle {
        &self.filter_cycles[usize::from(cycle.number() - 1)]
    }

    fn filter_cycle_mut(&mut self, cycle: FilterCycleId) -> &mut FilterCycle {
        &mut self.filter_cycles[usize::from(cycle.number() - 1)]
    }

    /// Gets whether filter cycle 2 is enabled.
    #[must_use]
    pub fn filter_cycle_2_enabled(&self) -> Option<bool> {
        self.filter_cycle_2_enabled
    }

    // ========== Updates ==========

    /// Applies an update and returns whether the state actually changed.
    ///
    /// Control updates are ignored here; they belong to the controls.
    pub fn apply(&mut self, update: &SpaUpdate) -> bool {
        // Replaces `$field` with `Some($value)` and reports whether it differed.
        macro_rules! replace {
            ($field:expr, $value:expr) => {{
                let next = Some($value);
                if $field == next {
                    false
                } else {
                    $field = next;
                    true
                }
            }};
        }

        match update {
            SpaUpdate::Configuration(config) => replace!(self.configuration, config.clone()),
            SpaUpdate::Temperature(t) => replace!(self.temperature, *t),
            SpaUpdate::TargetTemperature(t) => replace!(self.target_temperature, *t),
            SpaUpdate::TemperatureUnit(unit) => replace!(self.temperature_unit, *unit),
            SpaUpdate::HeatState(state) => replace!(self.heat_state, *state),
            SpaUpdate::FilterSchedule {
                cycle,
                start,
                duration,
            } => {
                let entry = self.filter_cycle_mut(*cycle);
                let start_changed = replace!(entry.start, *start);
                let duration_changed = replace!(entry.duration, *duration);
                start_changed || duration_changed
            }
            SpaUpdate::FilterRunning { cycle, running } => {
                replace!(self.filter_cycle_mut(*cycle).running, *running)
            }
            SpaUpdate::FilterCycle2Enabled(enabled) => {
                replace!(self.filter_cycle_2_enabled, *enabled)
            }
            SpaUpdate::Control { .. } => false,
            SpaUpdate::Batch(updates) => {
                let mut any_changed = false;
                for u in updates {
                    if self.apply(u) {
                        any_changed = true;
                    }
                }
                any_changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac() -> MacAddress {
        "00:15:27:ab:cd:ef".parse().unwrap()
    }

    #[test]
    fn new_state_is_empty() {
        let state = SpaState::new();
        assert!(state.configuration().is_none());
        assert!(state.temperature().is_none());
        assert!(state.heat_state().is_none());
        assert!(state.filter_cycle(FilterCycleId::One).start.is_none());
        assert!(state.filter_cycle_2_enabled().is_none());
    }

    #[test]
    fn apply_reports_changes_only() {
        let mut state = SpaState::new();
        assert!(state.apply(&SpaUpdate::TargetTemperature(38.0)));
        assert!(!state.apply(&SpaUpdate::TargetTemperature(38.0)));
        assert!(state.apply(&SpaUpdate::TargetTemperature(38.5)));
        assert_eq!(state.target_temperature(), Some(38.5));
    }

    #[test]
    fn apply_filter_schedule() {
        let mut state = SpaState::new();
        let start = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        let update = SpaUpdate::FilterSchedule {
            cycle: FilterCycleId::Two,
            start,
            duration: Duration::from_secs(3600),
        };

        assert!(state.apply(&update));
        assert!(!state.apply(&update));
        let cycle = state.filter_cycle(FilterCycleId::Two);
        assert_eq!(cycle.start, Some(start));
        assert_eq!(cycle.duration, Some(Duration::from_secs(3600)));
        assert!(state.filter_cycle(FilterCycleId::One).start.is_none());
    }

    #[test]
    fn control_updates_do_not_touch_session_state() {
        let mut state = SpaState::new();
        let update = SpaUpdate::control(
            ControlId::new(ControlKind::Pump, 1),
            ControlState::HIGH,
        );
        assert!(!state.apply(&update));
        assert_eq!(state, SpaState::new());
    }

    #[test]
    fn apply_batch() {
        let mut state = SpaState::new();
        let batch = SpaUpdate::batch(vec![
            SpaUpdate::Temperature(36.0),
            SpaUpdate::HeatState(HeatState::Heating),
            SpaUpdate::FilterRunning {
                cycle: FilterCycleId::One,
                running: true,
            },
        ]);

        assert!(state.apply(&batch));
        assert_eq!(state.temperature(), Some(36.0));
        assert_eq!(state.heat_state(), Some(HeatState::Heating));
        assert_eq!(state.filter_cycle(FilterCycleId::One).running, Some(true));
    }

    #[test]
    fn configuration_lists_controls() {
        let config = SpaConfiguration::new(mac(), "BP501G1", "1.0")
            .with_pumps(vec![2, 1])
            .with_lights(1)
            .with_aux(2)
            .with_misters(1)
            .with_circulation_pump();

        let controls = config.controls();
        let names: Vec<String> = controls.iter().map(|(id, _)| id.name()).collect();
        assert_eq!(
            names,
            vec![
                "Pump 1",
                "Pump 2",
                "Light 1",
                "Aux 1",
                "Aux 2",
                "Mister 1",
                "Circulation pump",
                "Heat mode",
                "Temperature range",
            ]
        );
        assert_eq!(
            controls[0].1,
            vec![ControlState::OFF, ControlState::LOW, ControlState::HIGH]
        );
        assert_eq!(controls[1].1, vec![ControlState::OFF, ControlState::ON]);
    }
}
