// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static entity descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where the display layer files an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// A setting of the spa.
    Config,
    /// Information about the spa rather than the water.
    Diagnostic,
}

impl EntityCategory {
    /// Returns the display-layer name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Diagnostic => "diagnostic",
        }
    }
}

/// Semantic class of an entity's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Link up or down.
    Connectivity,
    /// Something is running.
    Running,
    /// A point in time.
    Timestamp,
    /// A span of time.
    Duration,
    /// An on/off switch.
    Switch,
}

impl DeviceClass {
    /// Returns the display-layer name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Running => "running",
            Self::Timestamp => "timestamp",
            Self::Duration => "duration",
            Self::Switch => "switch",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static metadata and value projection of one entity kind.
///
/// Descriptions live in `static` tables. The projection is a plain function
/// pointer, so a description never captures runtime state and every entity
/// built from it reads the referent afresh.
///
/// # Examples
///
/// ```
/// use balboa_entities::client::SpaClient;
/// use balboa_entities::entity::{EntityCategory, EntityDescription};
///
/// static TEMPERATURE: EntityDescription<SpaClient, f64> = EntityDescription {
///     key: "temperature",
///     name: Some("Temperature"),
///     category: None,
///     device_class: None,
///     unit: None,
///     icon: Some("mdi:thermometer"),
///     value_fn: SpaClient::temperature,
/// };
///
/// let (spa, _commands) = SpaClient::channel("192.168.1.20", 4);
/// assert!(TEMPERATURE.value(&spa).unwrap_err().is_not_yet_available());
/// ```
pub struct EntityDescription<R, V> {
    /// Stable key of the entity kind.
    pub key: &'static str,
    /// Entity name; `None` inherits the referent's name.
    pub name: Option<&'static str>,
    /// Display category.
    pub category: Option<EntityCategory>,
    /// Semantic class.
    pub device_class: Option<DeviceClass>,
    /// Unit of measurement.
    pub unit: Option<&'static str>,
    /// Static icon.
    pub icon: Option<&'static str>,
    /// Projects the referent onto the entity's value.
    pub value_fn: fn(&R) -> Result<V>,
}

impl<R, V> EntityDescription<R, V> {
    /// Reads the value from a referent.
    ///
    /// # Errors
    ///
    /// Returns whatever the projection returns, typically
    /// [`Error::NotYetAvailable`](crate::Error::NotYetAvailable).
    pub fn value(&self, referent: &R) -> Result<V> {
        (self.value_fn)(referent)
    }
}

impl<R, V> fmt::Debug for EntityDescription<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescription")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("device_class", &self.device_class)
            .field("unit", &self.unit)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}
