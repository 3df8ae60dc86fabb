// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted configuration entries.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::types::MacAddress;

/// Identifier of a configuration entry.
///
/// Generated once when the entry is created and stable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Connection data entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    /// Host name or IP address of the spa's Wi-Fi module.
    pub host: String,
}

/// User-adjustable options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryOptions {
    /// Set the spa clock once a day.
    pub sync_time: bool,
}

/// A configured spa.
///
/// # Examples
///
/// ```
/// use balboa_entities::config::{ConfigEntry, EntryOptions};
///
/// let entry = ConfigEntry::new("BP501G1", "192.168.1.20", "00:15:27:ab:cd:ef".parse().unwrap())
///     .with_options(EntryOptions { sync_time: true });
///
/// let json = entry.to_json().unwrap();
/// assert_eq!(ConfigEntry::from_json(&json).unwrap(), entry);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Entry identifier.
    pub entry_id: EntryId,
    /// Display title; the spa model.
    pub title: String,
    /// Unique id of the spa; its MAC address.
    pub unique_id: MacAddress,
    /// Connection data.
    pub data: EntryData,
    /// Options.
    #[serde(default)]
    pub options: EntryOptions,
}

impl ConfigEntry {
    /// Creates an entry with default options.
    #[must_use]
    pub fn new(title: impl Into<String>, host: impl Into<String>, mac: MacAddress) -> Self {
        Self {
            entry_id: EntryId::new(),
            title: title.into(),
            unique_id: mac,
            data: EntryData { host: host.into() },
            options: EntryOptions::default(),
        }
    }

    /// Sets the options.
    #[must_use]
    pub fn with_options(mut self, options: EntryOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the configured host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.data.host
    }

    /// Serializes the entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The set of configured spas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigEntries {
    entries: Vec<ConfigEntry>,
}

impl ConfigEntries {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all entries.
    #[must_use]
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by identifier.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.entry_id == id)
    }

    /// Looks up an entry by host.
    #[must_use]
    pub fn find_by_host(&self, host: &str) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.data.host == host)
    }

    /// Looks up an entry by MAC address.
    #[must_use]
    pub fn find_by_mac(&self, mac: MacAddress) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.unique_id == mac)
    }

    /// Adds an entry.
    pub fn insert(&mut self, entry: ConfigEntry) {
        self.entries.push(entry);
    }

    /// Points the entry of `mac` at a new host.
    ///
    /// Returns `true` if the host changed.
    pub fn update_host(&mut self, mac: MacAddress, host: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.unique_id == mac) {
            Some(entry) if entry.data.host != host => {
                tracing::info!(mac = %mac, old = %entry.data.host, new = %host, "Spa moved to new host");
                entry.data.host = host.to_string();
                true
            }
            _ => false,
        }
    }

    /// Replaces the options of an entry.
    ///
    /// Returns `false` if no such entry exists.
    pub fn update_options(&mut self, id: EntryId, options: EntryOptions) -> bool {
        match self.entries.iter_mut().find(|e| e.entry_id == id) {
            Some(entry) => {
                entry.options = options;
                true
            }
            None => false,
        }
    }

    /// Removes an entry.
    pub fn remove(&mut self, id: EntryId) -> Option<ConfigEntry> {
        let index = self.entries.iter().position(|e| e.entry_id == id)?;
        Some(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac() -> MacAddress {
        "00:15:27:ab:cd:ef".parse().unwrap()
    }

    #[test]
    fn entry_ids_are_unique() {
        assert_ne!(EntryId::new(), EntryId::new());
        assert_eq!(EntryId::new().to_string().len(), 32);
    }

    #[test]
    fn options_default_when_missing() {
        let entry = ConfigEntry::new("BP501G1", "10.0.0.5", mac());
        let mut json: serde_json::Value = serde_json::from_str(&entry.to_json().unwrap()).unwrap();
        json.as_object_mut().unwrap().remove("options");

        let parsed = ConfigEntry::from_json(&json.to_string()).unwrap();
        assert!(!parsed.options.sync_time);
        assert_eq!(parsed.unique_id, mac());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = ConfigEntry::from_json("{").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn entries_lookup_and_update() {
        let mut entries = ConfigEntries::new();
        let entry = ConfigEntry::new("BP501G1", "10.0.0.5", mac());
        let id = entry.entry_id;
        entries.insert(entry);

        assert!(entries.find_by_host("10.0.0.5").is_some());
        assert!(entries.update_host(mac(), "10.0.0.6"));
        assert!(!entries.update_host(mac(), "10.0.0.6"));
        assert_eq!(entries.get(id).unwrap().host(), "10.0.0.6");

        assert!(entries.update_options(id, EntryOptions { sync_time: true }));
        assert!(entries.get(id).unwrap().options.sync_time);

        assert!(entries.remove(id).is_some());
        assert!(entries.is_empty());
    }
}
