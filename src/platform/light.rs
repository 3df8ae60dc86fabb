// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spa lights.

use std::sync::Arc;
use std::time::Duration;

use crate::client::SpaControl;
use crate::entity::{Entity, EntityDescription, EntityHandle, Writable};
use crate::error::Result;
use crate::types::ControlState;

use super::{Platform, PlatformEntity};

/// A light; named after its control.
pub static LIGHT: EntityDescription<SpaControl, bool> = EntityDescription {
    key: "light",
    name: None,
    category: None,
    device_class: None,
    unit: None,
    icon: None,
    value_fn: |light| light.state().map(|s| s.is_on()),
};

/// A spa light.
#[derive(Debug)]
pub struct BalboaLight {
    entity: Entity<SpaControl, bool>,
}

impl BalboaLight {
    /// Creates the entity for a light control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// before the configuration handshake.
    pub fn new(light: Arc<SpaControl>, freshness_window: Duration) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(light, &LIGHT)?.with_freshness_window(freshness_window),
        })
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn entity(&self) -> &Entity<SpaControl, bool> {
        &self.entity
    }

    /// Returns `true` while lit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// until the spa reported the light state.
    pub fn is_on(&self) -> Result<bool> {
        self.entity.current_value()
    }

    /// Turns the light on.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SpaControl::set_state`].
    pub async fn turn_on(&self) -> Result<()> {
        self.entity.write(ControlState::ON).await
    }

    /// Turns the light off.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SpaControl::set_state`].
    pub async fn turn_off(&self) -> Result<()> {
        self.entity.write(ControlState::OFF).await
    }
}

impl PlatformEntity for BalboaLight {
    fn platform(&self) -> Platform {
        Platform::Light
    }

    fn handle(&self) -> &dyn EntityHandle {
        &self.entity
    }

    fn state(&self) -> Result<String> {
        Ok(if self.is_on()? { "on" } else { "off" }.to_string())
    }
}
