// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configured spas and the flows that add them.
//!
//! - [`ConfigEntry`] - A configured spa: host, title, MAC and options
//! - [`validate`] - Connects once and reads the spa's model and MAC
//! - [`ConfigFlow`] - User and DHCP setup steps
//! - [`OptionsFlow`] - Edits [`EntryOptions`] of an existing entry

mod entry;
mod flow;
mod validate;

pub use entry::{ConfigEntries, ConfigEntry, EntryData, EntryId, EntryOptions};
pub use flow::{AbortReason, ConfigFlow, FlowError, FlowResult, FlowStep, OptionsFlow};
pub use validate::{DEFAULT_VALIDATION_TIMEOUT, ValidatedSpa, validate};
