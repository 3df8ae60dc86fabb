// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry metadata.

use serde::{Deserialize, Serialize};

use crate::client::SpaClient;
use crate::error::Result;
use crate::types::MacAddress;

/// Integration domain used in device identifiers.
pub const DOMAIN: &str = "balboa";

/// Manufacturer reported for every spa.
pub const MANUFACTURER: &str = "Balboa Water Group";

/// Connection type of the MAC entry in [`DeviceInfo::connections`].
pub const CONNECTION_NETWORK_MAC: &str = "mac";

/// Metadata grouping all entities of one spa under one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(domain, mac)` pairs identifying the device.
    pub identifiers: Vec<(String, String)>,
    /// `(connection type, value)` pairs.
    pub connections: Vec<(String, String)>,
    /// Device name; the model.
    pub name: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Software version.
    pub sw_version: String,
}

impl DeviceInfo {
    /// Builds the metadata from identity values.
    #[must_use]
    pub fn new(mac: MacAddress, model: &str, sw_version: &str) -> Self {
        let mac = mac.to_string();
        Self {
            identifiers: vec![(DOMAIN.to_string(), mac.clone())],
            connections: vec![(CONNECTION_NETWORK_MAC.to_string(), mac)],
            name: model.to_string(),
            manufacturer: MANUFACTURER.to_string(),
            model: model.to_string(),
            sw_version: sw_version.to_string(),
        }
    }

    /// Reads the identity of a configured session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// before the configuration handshake.
    pub fn from_session(session: &SpaClient) -> Result<Self> {
        Ok(Self::new(
            session.mac_address()?,
            &session.model()?,
            &session.software_version()?,
        ))
    }

    /// Returns the MAC address string the device is identified by.
    #[must_use]
    pub fn mac(&self) -> &str {
        self.identifiers
            .first()
            .map_or("", |(_, mac)| mac.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_info_fields() {
        let info = DeviceInfo::new("00-15-27-AB-CD-EF".parse().unwrap(), "BP501G1", "M100_226 V43.0");
        assert_eq!(
            info.identifiers,
            vec![("balboa".to_string(), "00:15:27:ab:cd:ef".to_string())]
        );
        assert_eq!(
            info.connections,
            vec![("mac".to_string(), "00:15:27:ab:cd:ef".to_string())]
        );
        assert_eq!(info.manufacturer, "Balboa Water Group");
        assert_eq!(info.name, "BP501G1");
        assert_eq!(info.mac(), "00:15:27:ab:cd:ef");
    }

    #[test]
    fn device_info_serializes() {
        let info = DeviceInfo::new("001527abcdef".parse().unwrap(), "BP501G1", "1.0");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["sw_version"], "1.0");
        assert_eq!(json["identifiers"][0][0], "balboa");
    }
}
