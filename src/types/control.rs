// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control identity and state types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal state of a spa control.
///
/// Binary controls use `0`/`1`, multi-speed pumps use `0`/`1`/`2`. The
/// meaning of each ordinal depends on the control's [`ControlKind`].
///
/// # Examples
///
/// ```
/// use balboa_entities::types::{ControlKind, ControlState};
///
/// let state = ControlState::HIGH;
/// assert!(state.is_on());
/// assert_eq!(ControlKind::Pump.state_name(state), "HIGH");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ControlState(u8);

impl ControlState {
    /// Off.
    pub const OFF: Self = Self(0);
    /// On, for binary controls.
    pub const ON: Self = Self(1);
    /// Low speed.
    pub const LOW: Self = Self(1);
    /// High speed.
    pub const HIGH: Self = Self(2);

    /// Creates a state from its ordinal.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the ordinal.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for any state other than off.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.0 > 0
    }
}

impl From<bool> for ControlState {
    fn from(value: bool) -> Self {
        if value { Self::ON } else { Self::OFF }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of sub-device a control drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    /// Jet pump, one or two speeds.
    Pump,
    /// Light.
    Light,
    /// Auxiliary relay.
    Aux,
    /// Mister.
    Mister,
    /// Circulation pump; read-only.
    CirculationPump,
    /// Heat mode selector.
    HeatMode,
    /// Temperature range selector.
    TemperatureRange,
}

impl ControlKind {
    /// Returns the name prefix used for controls of this kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pump => "Pump",
            Self::Light => "Light",
            Self::Aux => "Aux",
            Self::Mister => "Mister",
            Self::CirculationPump => "Circulation pump",
            Self::HeatMode => "Heat mode",
            Self::TemperatureRange => "Temperature range",
        }
    }

    /// Returns `true` if several controls of this kind can exist and are
    /// therefore numbered.
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        matches!(self, Self::Pump | Self::Light | Self::Aux | Self::Mister)
    }

    /// Returns the display name of a state for this kind of control.
    #[must_use]
    pub const fn state_name(&self, state: ControlState) -> &'static str {
        match (self, state.value()) {
            (Self::HeatMode, 0) => "READY",
            (Self::HeatMode, 1) => "REST",
            (Self::HeatMode, 2) => "READY_IN_REST",
            (Self::TemperatureRange, 0) => "LOW",
            (Self::TemperatureRange, 1) => "HIGH",
            (Self::Pump, 1) => "LOW",
            (Self::Pump, 2) => "HIGH",
            (_, 0) => "OFF",
            (_, 1) => "ON",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Address of a control within its session.
///
/// Indexed kinds (pumps, lights, aux relays, misters) are numbered from 1;
/// singleton kinds use index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ControlId {
    /// What the control drives.
    pub kind: ControlKind,
    /// Position among controls of the same kind.
    pub index: u8,
}

impl ControlId {
    /// Creates an identifier for the `index`-th control of `kind`.
    #[must_use]
    pub const fn new(kind: ControlKind, index: u8) -> Self {
        Self { kind, index }
    }

    /// Creates an identifier for a singleton control.
    #[must_use]
    pub const fn single(kind: ControlKind) -> Self {
        Self { kind, index: 0 }
    }

    /// Returns the control's display name, e.g. `Pump 2` or `Heat mode`.
    #[must_use]
    pub fn name(&self) -> String {
        if self.kind.is_indexed() {
            format!("{} {}", self.kind.label(), self.index)
        } else {
            self.kind.label().to_string()
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_depend_on_kind() {
        assert_eq!(ControlKind::Pump.state_name(ControlState::new(1)), "LOW");
        assert_eq!(ControlKind::Light.state_name(ControlState::new(1)), "ON");
        assert_eq!(
            ControlKind::TemperatureRange.state_name(ControlState::new(0)),
            "LOW"
        );
        assert_eq!(ControlKind::Aux.state_name(ControlState::new(7)), "UNKNOWN");
    }

    #[test]
    fn control_id_names() {
        assert_eq!(ControlId::new(ControlKind::Pump, 2).name(), "Pump 2");
        assert_eq!(ControlId::single(ControlKind::HeatMode).name(), "Heat mode");
        assert_eq!(
            ControlId::single(ControlKind::CirculationPump).to_string(),
            "Circulation pump"
        );
    }

    #[test]
    fn control_state_ordering() {
        assert!(ControlState::OFF < ControlState::LOW);
        assert!(ControlState::LOW < ControlState::HIGH);
        assert!(!ControlState::OFF.is_on());
        assert_eq!(ControlState::from(true), ControlState::ON);
    }
}
