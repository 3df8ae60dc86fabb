// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware address of a spa controller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// MAC address of the spa's Wi-Fi module.
///
/// Parsing accepts colon, dash or no separators in either case. The
/// canonical form is lower-case and colon separated, which is what entity
/// identifiers and device metadata are built from.
///
/// # Examples
///
/// ```
/// use balboa_entities::types::MacAddress;
///
/// let mac: MacAddress = "00-15-27-AB-CD-EF".parse().unwrap();
/// assert_eq!(mac.to_string(), "00:15:27:ab:cd:ef");
/// assert_eq!(mac.compact(), "001527abcdef");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates an address from raw octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Returns the address as twelve lower-case hex digits.
    #[must_use]
    pub fn compact(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValueError::InvalidMacAddress(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| ValueError::InvalidMacAddress(s.to_string()))?;
        }
        Ok(Self(octets))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_separator_variants() {
        let expected = MacAddress::new([0x00, 0x15, 0x27, 0xab, 0xcd, 0xef]);
        for input in ["00:15:27:ab:cd:ef", "00-15-27-AB-CD-EF", "001527abcdef"] {
            assert_eq!(input.parse::<MacAddress>().unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn rejects_malformed() {
        assert!("00:15:27".parse::<MacAddress>().is_err());
        assert!("zz:15:27:ab:cd:ef".parse::<MacAddress>().is_err());
        assert!("".parse::<MacAddress>().is_err());
    }

    #[test]
    fn serde_uses_canonical_string() {
        let mac: MacAddress = "00-15-27-AB-CD-EF".parse().unwrap();
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"00:15:27:ab:cd:ef\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
