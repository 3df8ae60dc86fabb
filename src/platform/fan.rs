// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Jet pumps as fans.
//!
//! Pump speeds map onto percentages by position: a two-speed pump reports
//! 50 % on low and 100 % on high.

use std::sync::Arc;
use std::time::Duration;

use crate::client::SpaControl;
use crate::entity::{Entity, EntityDescription, EntityHandle};
use crate::error::{Result, ValueError};
use crate::types::ControlState;

use super::{Platform, PlatformEntity};

/// A pump; named after its control.
pub static PUMP: EntityDescription<SpaControl, ControlState> = EntityDescription {
    key: "pump",
    name: None,
    category: None,
    device_class: None,
    unit: None,
    icon: Some("mdi:hydro-power"),
    value_fn: SpaControl::state,
};

/// Percentage of `item` by its 1-based position in `items`.
///
/// Returns `None` if `item` is not in `items`.
#[must_use]
pub fn ordered_list_item_to_percentage<T: PartialEq>(items: &[T], item: &T) -> Option<u8> {
    let position = items.iter().position(|i| i == item)? + 1;
    u8::try_from(position * 100 / items.len()).ok()
}

/// The item whose percentage band contains `percentage`.
///
/// Returns `None` for an empty list.
#[must_use]
pub fn percentage_to_ordered_list_item<T: Copy>(items: &[T], percentage: u8) -> Option<T> {
    let len = items.len();
    items
        .iter()
        .enumerate()
        .find(|(offset, _)| usize::from(percentage) <= (offset + 1) * 100 / len)
        .map(|(_, item)| *item)
        .or_else(|| items.last().copied())
}

/// A jet pump.
#[derive(Debug)]
pub struct BalboaFan {
    entity: Entity<SpaControl, ControlState>,
}

impl BalboaFan {
    /// Creates the fan for a pump control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// before the configuration handshake.
    pub fn new(pump: Arc<SpaControl>, freshness_window: Duration) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(pump, &PUMP)?.with_freshness_window(freshness_window),
        })
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn entity(&self) -> &Entity<SpaControl, ControlState> {
        &self.entity
    }

    fn pump(&self) -> &SpaControl {
        self.entity.referent()
    }

    fn speeds(&self) -> &[ControlState] {
        self.pump().options().get(1..).unwrap_or_default()
    }

    /// Returns the number of speeds.
    #[must_use]
    pub fn speed_count(&self) -> u8 {
        self.pump().max_option().value()
    }

    /// Returns `true` if the pump has more than one speed.
    #[must_use]
    pub fn supports_set_speed(&self) -> bool {
        self.speed_count() > 1
    }

    /// Returns `true` while the pump runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// until the spa reported the pump state.
    pub fn is_on(&self) -> Result<bool> {
        Ok(self.entity.current_value()?.is_on())
    }

    /// Returns the speed as a percentage, or `None` while off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// until the spa reported the pump state.
    pub fn percentage(&self) -> Result<Option<u8>> {
        let state = self.entity.current_value()?;
        if !state.is_on() {
            return Ok(None);
        }
        Ok(ordered_list_item_to_percentage(self.speeds(), &state))
    }

    /// Requests a speed by percentage; 0 turns the pump off.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] above 100, or for any non-zero
    /// percentage on a pump without speeds, and the errors of
    /// [`SpaControl::set_state`].
    pub async fn set_percentage(&self, percentage: u8) -> Result<()> {
        if percentage > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(percentage),
            }
            .into());
        }
        let state = if percentage == 0 {
            self.pump().options().first().copied().unwrap_or_default()
        } else {
            percentage_to_ordered_list_item(self.speeds(), percentage).ok_or(
                ValueError::OutOfRange {
                    min: 0,
                    max: 0,
                    actual: u16::from(percentage),
                },
            )?
        };
        self.pump().set_state(state).await
    }

    /// Turns the pump on, at the lowest speed unless `percentage` is given.
    ///
    /// # Errors
    ///
    /// See [`set_percentage`](Self::set_percentage).
    pub async fn turn_on(&self, percentage: Option<u8>) -> Result<()> {
        self.set_percentage(percentage.unwrap_or(1)).await
    }

    /// Turns the pump off.
    ///
    /// # Errors
    ///
    /// See [`set_percentage`](Self::set_percentage).
    pub async fn turn_off(&self) -> Result<()> {
        self.set_percentage(0).await
    }
}

impl PlatformEntity for BalboaFan {
    fn platform(&self) -> Platform {
        Platform::Fan
    }

    fn handle(&self) -> &dyn EntityHandle {
        &self.entity
    }

    fn state(&self) -> Result<String> {
        Ok(if self.is_on()? { "on" } else { "off" }.to_string())
    }
}
