// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating related types and their host-facing counterparts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

use super::ControlState;

/// Heat mode reported by the spa.
///
/// `ReadyInRest` is a transient mode the spa enters on its own; it can be
/// reported but not requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatMode {
    /// Keep the water at the target temperature.
    Ready,
    /// Only heat during filter cycles.
    Rest,
    /// Resting, but heating because a pump was turned on.
    ReadyInRest,
}

impl HeatMode {
    /// Returns the preset name shown by the display layer.
    #[must_use]
    pub const fn preset_name(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Rest => "Rest",
            Self::ReadyInRest => "Ready-in-Rest",
        }
    }

    /// Parses a preset name produced by [`HeatMode::preset_name`].
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownOption`] for any other name.
    pub fn from_preset_name(name: &str) -> Result<Self, ValueError> {
        match name {
            "Ready" => Ok(Self::Ready),
            "Rest" => Ok(Self::Rest),
            "Ready-in-Rest" => Ok(Self::ReadyInRest),
            other => Err(ValueError::UnknownOption(other.to_string())),
        }
    }

    /// Maps the heat mode onto the host's HVAC mode.
    #[must_use]
    pub const fn hvac_mode(&self) -> HvacMode {
        match self {
            Self::Ready => HvacMode::Heat,
            Self::Rest => HvacMode::Off,
            Self::ReadyInRest => HvacMode::Auto,
        }
    }

    /// Returns the ordinal used by the heat mode control.
    #[must_use]
    pub const fn as_state(&self) -> ControlState {
        match self {
            Self::Ready => ControlState::new(0),
            Self::Rest => ControlState::new(1),
            Self::ReadyInRest => ControlState::new(2),
        }
    }

    /// Converts a heat mode control ordinal back into a heat mode.
    #[must_use]
    pub const fn from_state(state: ControlState) -> Option<Self> {
        match state.value() {
            0 => Some(Self::Ready),
            1 => Some(Self::Rest),
            2 => Some(Self::ReadyInRest),
            _ => None,
        }
    }
}

impl fmt::Display for HeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.preset_name())
    }
}

/// What the heater is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatState {
    /// Heater off.
    Off,
    /// Heater running.
    Heating,
    /// Waiting for the next heating window.
    HeatWaiting,
}

impl HeatState {
    /// Maps the heat state onto the host's HVAC action.
    #[must_use]
    pub const fn hvac_action(&self) -> HvacAction {
        match self {
            Self::Off => HvacAction::Off,
            Self::Heating => HvacAction::Heating,
            Self::HeatWaiting => HvacAction::Idle,
        }
    }
}

/// Temperature scale the spa panel is set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl TemperatureUnit {
    /// Returns the unit symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Smallest target step the spa accepts in this unit.
    #[must_use]
    pub const fn precision(&self) -> f64 {
        match self {
            Self::Celsius => 0.5,
            Self::Fahrenheit => 1.0,
        }
    }
}

/// Low/high temperature range of the spa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureRange {
    /// Low range.
    Low,
    /// High range.
    High,
}

impl TemperatureRange {
    /// Returns the option name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
        }
    }

    /// Returns the icon for this option.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Low => "mdi:thermometer-minus",
            Self::High => "mdi:thermometer-plus",
        }
    }

    /// Returns the ordinal used by the temperature range control.
    #[must_use]
    pub const fn as_state(&self) -> ControlState {
        match self {
            Self::Low => ControlState::new(0),
            Self::High => ControlState::new(1),
        }
    }

    /// Converts a temperature range control ordinal.
    #[must_use]
    pub const fn from_state(state: ControlState) -> Option<Self> {
        match state.value() {
            0 => Some(Self::Low),
            1 => Some(Self::High),
            _ => None,
        }
    }
}

impl FromStr for TemperatureRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "HIGH" => Ok(Self::High),
            _ => Err(ValueError::UnknownOption(s.to_string())),
        }
    }
}

/// HVAC mode as understood by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HvacMode {
    /// Heating to target.
    Heat,
    /// Not heating.
    Off,
    /// Device decides.
    Auto,
}

impl HvacMode {
    /// Returns the display-layer name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heat => "heat",
            Self::Off => "off",
            Self::Auto => "auto",
        }
    }

    /// Maps an HVAC mode back to the heat mode that produces it.
    #[must_use]
    pub const fn heat_mode(&self) -> HeatMode {
        match self {
            Self::Heat => HeatMode::Ready,
            Self::Off => HeatMode::Rest,
            Self::Auto => HeatMode::ReadyInRest,
        }
    }
}

/// HVAC action as understood by the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HvacAction {
    /// Idle and off.
    Off,
    /// Actively heating.
    Heating,
    /// On but not heating.
    Idle,
}

impl HvacAction {
    /// Returns the display-layer name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heating => "heating",
            Self::Idle => "idle",
        }
    }
}
