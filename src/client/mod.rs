// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live spa sessions and their controls.
//!
//! A [`SpaClient`] is the session referent: it owns the latest telemetry of
//! one spa and the [`SpaControl`]s discovered during the configuration
//! handshake. Both are observable, so entity adapters can subscribe to
//! either one.
//!
//! The wire protocol lives outside this crate. A protocol client creates a
//! session with [`SpaClient::channel`], feeds decoded telemetry into
//! [`SpaClient::ingest`], reports link changes with
//! [`SpaClient::set_connected`] and drains the returned command receiver.
//!
//! ```
//! use balboa_entities::client::SpaClient;
//! use balboa_entities::state::SpaUpdate;
//!
//! let (spa, _commands) = SpaClient::channel("192.168.1.20", 16);
//! spa.set_connected(true);
//! spa.ingest(SpaUpdate::Temperature(38.5));
//!
//! assert_eq!(spa.temperature().unwrap(), 38.5);
//! ```

mod control;
mod session;

pub use control::SpaControl;
pub use session::{DEFAULT_COMMAND_CAPACITY, SpaClient};

use crate::error::ConnectionError;

/// Opens sessions to spas.
///
/// Implemented by the wire-protocol client. A successful `connect` returns a
/// connected session whose telemetry is already being ingested; the
/// configuration handshake may still be in progress.
#[allow(async_fn_in_trait)]
pub trait Connector {
    /// Connects to the spa at `host`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Unreachable`] if the spa cannot be reached.
    async fn connect(&self, host: &str) -> Result<SpaClient, ConnectionError>;
}
