// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound spa commands.
//!
//! Writes made through sessions, controls and entity adapters end up as a
//! [`SpaCommand`] on the session's outbound queue. The wire-protocol client
//! drains that queue and encodes each command; the resulting state change
//! comes back later as ordinary telemetry.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`SpaCommand::SetControl`] | Change a pump, light, aux, mister, heat mode or range |
//! | [`SpaCommand::SetTemperature`] | Change the target temperature |
//! | [`SpaCommand::SetFilterCycle2Enabled`] | Enable or disable filter cycle 2 |
//! | [`SpaCommand::SetTime`] | Set the spa clock |
//! | [`SpaCommand::RequestConfiguration`] | Ask for module identification and panel configuration |

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::{ControlId, ControlState};

/// A command queued for the spa.
///
/// # Examples
///
/// ```
/// use balboa_entities::command::SpaCommand;
/// use balboa_entities::types::{ControlId, ControlKind, ControlState};
///
/// let cmd = SpaCommand::SetControl {
///     id: ControlId::new(ControlKind::Pump, 1),
///     state: ControlState::HIGH,
/// };
/// assert_eq!(cmd.name(), "SetControl");
/// assert_eq!(cmd.to_string(), "SetControl Pump 1=2");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaCommand {
    /// Request a new state for a control.
    SetControl {
        /// The control to change.
        id: ControlId,
        /// The requested state.
        state: ControlState,
    },

    /// Request a new target temperature, in the spa's unit.
    SetTemperature(f64),

    /// Enable or disable filter cycle 2.
    SetFilterCycle2Enabled(bool),

    /// Set the spa clock to a local time of day.
    SetTime(NaiveTime),

    /// Ask the spa to send its configuration.
    RequestConfiguration,
}

impl SpaCommand {
    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetControl { .. } => "SetControl",
            Self::SetTemperature(_) => "SetTemperature",
            Self::SetFilterCycle2Enabled(_) => "SetFilterCycle2Enabled",
            Self::SetTime(_) => "SetTime",
            Self::RequestConfiguration => "RequestConfiguration",
        }
    }

    /// Returns the command payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<String> {
        match self {
            Self::SetControl { id, state } => Some(format!("{id}={state}")),
            Self::SetTemperature(t) => Some(t.to_string()),
            Self::SetFilterCycle2Enabled(enabled) => Some(enabled.to_string()),
            Self::SetTime(time) => Some(format!("{:02}:{:02}", time.hour(), time.minute())),
            Self::RequestConfiguration => None,
        }
    }
}

impl fmt::Display for SpaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Some(p) => write!(f, "{} {}", self.name(), p),
            None => f.write_str(self.name()),
        }
    }
}
