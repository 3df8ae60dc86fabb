// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry updates fed into a session.
//!
//! The wire-protocol client decodes spa messages into [`SpaUpdate`] values
//! and hands them to [`SpaClient::ingest`](crate::client::SpaClient::ingest).
//!
//! # Update Types
//!
//! - [`SpaUpdate::Configuration`] - Result of the configuration handshake
//! - [`SpaUpdate::Temperature`] / [`SpaUpdate::TargetTemperature`] - Water temperatures
//! - [`SpaUpdate::FilterSchedule`] / [`SpaUpdate::FilterRunning`] - Filter cycle data
//! - [`SpaUpdate::Control`] - State of one control (pump, light, heat mode, ...)
//! - [`SpaUpdate::Batch`] - Several updates decoded from one status message

use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::types::{ControlId, ControlState, HeatState, TemperatureUnit};

use super::SpaConfiguration;

/// Identifies one of the spa's two filter cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterCycleId {
    /// Filter cycle 1, always enabled.
    One,
    /// Filter cycle 2, can be disabled.
    Two,
}

impl FilterCycleId {
    /// Returns the cycle number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// A single decoded change reported by the spa.
///
/// # Examples
///
/// ```
/// use balboa_entities::state::SpaUpdate;
/// use balboa_entities::types::{ControlId, ControlKind, ControlState};
///
/// let update = SpaUpdate::batch(vec![
///     SpaUpdate::Temperature(37.5),
///     SpaUpdate::control(ControlId::new(ControlKind::Pump, 1), ControlState::HIGH),
/// ]);
/// assert_eq!(update.change_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaUpdate {
    /// The spa finished its configuration handshake.
    Configuration(SpaConfiguration),

    /// Current water temperature.
    Temperature(f64),

    /// Target water temperature.
    TargetTemperature(f64),

    /// Temperature scale of the panel.
    TemperatureUnit(TemperatureUnit),

    /// What the heater is doing.
    HeatState(HeatState),

    /// Schedule of a filter cycle.
    FilterSchedule {
        /// Which cycle.
        cycle: FilterCycleId,
        /// Local start time.
        start: NaiveTime,
        /// How long the cycle runs.
        duration: Duration,
    },

    /// Whether a filter cycle is running right now.
    FilterRunning {
        /// Which cycle.
        cycle: FilterCycleId,
        /// `true` while running.
        running: bool,
    },

    /// Whether filter cycle 2 is enabled.
    FilterCycle2Enabled(bool),

    /// State of one control.
    Control {
        /// The control that changed.
        id: ControlId,
        /// Its new state.
        state: ControlState,
    },

    /// Several updates decoded from one message.
    ///
    /// A [`Configuration`](Self::Configuration) entry is applied before the
    /// other entries, wherever it sits in the batch.
    Batch(Vec<SpaUpdate>),
}

impl SpaUpdate {
    /// Creates a control state update.
    #[must_use]
    pub fn control(id: ControlId, state: ControlState) -> Self {
        Self::Control { id, state }
    }

    /// Creates a batch of updates.
    #[must_use]
    pub fn batch(updates: Vec<SpaUpdate>) -> Self {
        Self::Batch(updates)
    }

    /// Returns the number of individual updates.
    ///
    /// For batches, returns the total count of nested updates.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(updates) => updates.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }

    /// Returns every non-batch update in order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&SpaUpdate> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a SpaUpdate>) {
        match self {
            Self::Batch(updates) => {
                for update in updates {
                    update.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControlKind;

    #[test]
    fn change_count_flattens_batches() {
        let pump = ControlId::new(ControlKind::Pump, 1);
        assert_eq!(SpaUpdate::Temperature(38.0).change_count(), 1);

        let batch = SpaUpdate::batch(vec![
            SpaUpdate::Temperature(38.0),
            SpaUpdate::control(pump, ControlState::LOW),
        ]);
        assert_eq!(batch.change_count(), 2);

        let nested = SpaUpdate::batch(vec![batch, SpaUpdate::FilterCycle2Enabled(true)]);
        assert_eq!(nested.change_count(), 3);
    }

    #[test]
    fn leaves_are_returned_in_order() {
        let nested = SpaUpdate::batch(vec![
            SpaUpdate::Temperature(1.0),
            SpaUpdate::batch(vec![SpaUpdate::Temperature(2.0)]),
            SpaUpdate::Temperature(3.0),
        ]);

        let seen: Vec<f64> = nested
            .leaves()
            .into_iter()
            .filter_map(|u| match u {
                SpaUpdate::Temperature(t) => Some(*t),
                _ => None,
            })
            .collect();
        assert_eq!(seen, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn filter_cycle_numbers() {
        assert_eq!(FilterCycleId::One.number(), 1);
        assert_eq!(FilterCycleId::Two.number(), 2);
    }
}
