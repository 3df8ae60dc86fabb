// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setup and options flows.
//!
//! A spa is added either by the user typing its host ([`ConfigFlow::step_user`])
//! or by DHCP discovery followed by a confirmation
//! ([`ConfigFlow::step_dhcp`], then [`ConfigFlow::step_confirm`]). Each
//! step returns a [`FlowResult`] telling the front end what to show next.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::client::Connector;
use crate::error::Error;
use crate::types::MacAddress;

use super::entry::{ConfigEntries, ConfigEntry, EntryId, EntryOptions};
use super::validate::{DEFAULT_VALIDATION_TIMEOUT, validate};

/// A step that shows a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Host entry form.
    User,
    /// Confirmation of a discovered spa.
    Confirm,
    /// Options form.
    Init,
}

impl FlowStep {
    /// Returns the step identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Confirm => "confirm",
            Self::Init => "init",
        }
    }
}

/// Error shown on the host entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowError {
    /// The spa was unreachable or never finished its handshake.
    CannotConnect,
    /// Anything else.
    Unknown,
}

impl FlowError {
    /// Returns the translation key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CannotConnect => "cannot_connect",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a flow ended without creating an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The host or MAC address is already configured.
    AlreadyConfigured,
    /// The confirmation step ran without a discovered host.
    NoDiscoveredHost,
    /// The entry being edited no longer exists.
    UnknownEntry,
}

/// Outcome of a flow step.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowResult {
    /// Show a form for `step`.
    ShowForm {
        /// The step the form belongs to.
        step: FlowStep,
        /// Error from the previous submission.
        error: Option<FlowError>,
        /// Device shown in the form description.
        placeholder: Option<String>,
    },
    /// A new entry was created and stored.
    CreateEntry(ConfigEntry),
    /// Options were saved.
    UpdateOptions(EntryOptions),
    /// The flow ended.
    Abort(AbortReason),
}

impl FlowResult {
    fn form(step: FlowStep) -> Self {
        Self::ShowForm {
            step,
            error: None,
            placeholder: None,
        }
    }
}

/// Flow that adds a spa.
///
/// # Examples
///
/// ```
/// use balboa_entities::config::{ConfigEntries, ConfigFlow, FlowResult};
/// use balboa_entities::testing::MockConnector;
///
/// #[tokio::main]
/// async fn main() {
///     let mut entries = ConfigEntries::new();
///     let mut flow = ConfigFlow::new(MockConnector::new());
///
///     let FlowResult::CreateEntry(entry) = flow.step_user(&mut entries, Some("192.168.1.20")).await
///     else {
///         panic!("expected a new entry");
///     };
///     assert_eq!(entry.title, "BP501G1");
///     assert_eq!(entries.len(), 1);
/// }
/// ```
#[derive(Debug)]
pub struct ConfigFlow<C> {
    connector: C,
    timeout: Duration,
    discovered: Option<String>,
}

impl<C: Connector> ConfigFlow<C> {
    /// Creates a flow using `connector` to validate spas.
    #[must_use]
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            timeout: DEFAULT_VALIDATION_TIMEOUT,
            discovered: None,
        }
    }

    /// Sets how long validation waits for the configuration handshake.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host found by DHCP discovery, if any.
    #[must_use]
    pub fn discovered_host(&self) -> Option<&str> {
        self.discovered.as_deref()
    }

    /// Handles the host entry form.
    ///
    /// With `None` the empty form is shown. With a host the spa is
    /// validated and, on success, an entry keyed by its MAC address is
    /// added to `entries`.
    pub async fn step_user(&mut self, entries: &mut ConfigEntries, host: Option<&str>) -> FlowResult {
        let Some(host) = host else {
            return FlowResult::form(FlowStep::User);
        };
        if entries.find_by_host(host).is_some() {
            return FlowResult::Abort(AbortReason::AlreadyConfigured);
        }

        let spa = match validate(&self.connector, host, self.timeout).await {
            Ok(spa) => spa,
            Err(e) => {
                let error = match e {
                    Error::Connection(_) => FlowError::CannotConnect,
                    other => {
                        tracing::error!(host = %host, error = %other, "Unexpected error validating spa");
                        FlowError::Unknown
                    }
                };
                return FlowResult::ShowForm {
                    step: FlowStep::User,
                    error: Some(error),
                    placeholder: None,
                };
            }
        };

        if entries.find_by_mac(spa.mac).is_some() {
            return FlowResult::Abort(AbortReason::AlreadyConfigured);
        }

        let entry = ConfigEntry::new(spa.title, host, spa.mac);
        tracing::info!(host = %host, mac = %entry.unique_id, entry = %entry.entry_id, "Spa configured");
        entries.insert(entry.clone());
        FlowResult::CreateEntry(entry)
    }

    /// Handles a spa found by DHCP.
    ///
    /// A known MAC gets its host updated and the flow aborts. Otherwise
    /// the host is remembered and the confirmation form is shown.
    pub fn step_dhcp(&mut self, entries: &mut ConfigEntries, ip: &str, mac: MacAddress) -> FlowResult {
        tracing::debug!(ip = %ip, mac = %mac, "Spa found via DHCP");
        if entries.find_by_mac(mac).is_some() {
            entries.update_host(mac, ip);
            return FlowResult::Abort(AbortReason::AlreadyConfigured);
        }
        self.discovered = Some(ip.to_string());
        FlowResult::ShowForm {
            step: FlowStep::Confirm,
            error: None,
            placeholder: Some(ip.to_string()),
        }
    }

    /// Handles the confirmation form.
    ///
    /// Until `confirmed`, the form is shown again. Once confirmed the flow
    /// continues as [`step_user`](Self::step_user) with the discovered host.
    pub async fn step_confirm(&mut self, entries: &mut ConfigEntries, confirmed: bool) -> FlowResult {
        let Some(host) = self.discovered.clone() else {
            return FlowResult::Abort(AbortReason::NoDiscoveredHost);
        };
        if !confirmed {
            return FlowResult::ShowForm {
                step: FlowStep::Confirm,
                error: None,
                placeholder: Some(host),
            };
        }
        self.step_user(entries, Some(&host)).await
    }
}

/// Flow that edits the options of an existing entry.
#[derive(Debug, Clone, Copy)]
pub struct OptionsFlow {
    entry_id: EntryId,
    current: EntryOptions,
}

impl OptionsFlow {
    /// Starts editing `entry`.
    #[must_use]
    pub fn new(entry: &ConfigEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            current: entry.options,
        }
    }

    /// Returns the values the form is pre-filled with.
    #[must_use]
    pub fn defaults(&self) -> EntryOptions {
        self.current
    }

    /// Shows the form, or saves `input` into `entries`.
    pub fn step_init(&self, entries: &mut ConfigEntries, input: Option<EntryOptions>) -> FlowResult {
        match input {
            None => FlowResult::form(FlowStep::Init),
            Some(options) if entries.update_options(self.entry_id, options) => {
                FlowResult::UpdateOptions(options)
            }
            Some(_) => FlowResult::Abort(AbortReason::UnknownEntry),
        }
    }
}
