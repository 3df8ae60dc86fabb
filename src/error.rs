// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the spa entity library.
//!
//! The hierarchy separates four kinds of failure: a value that arrived
//! too early ([`Error::NotYetAvailable`]), invalid values, connection
//! problems during setup, and rejected outbound commands.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A telemetry field was read before the spa first reported it.
    ///
    /// Adapters treat this as "not available yet", not as a failure to
    /// show to the user.
    #[error("{field} has not been reported by the spa yet")]
    NotYetAvailable {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while connecting to or configuring the spa.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// An outbound command could not be dispatched.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration entry data could not be (de)serialized.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Creates a [`Error::NotYetAvailable`] for the given field.
    #[must_use]
    pub const fn not_yet_available(field: &'static str) -> Self {
        Self::NotYetAvailable { field }
    }

    /// Returns `true` if this error only means the value has not arrived yet.
    #[must_use]
    pub const fn is_not_yet_available(&self) -> bool {
        matches!(self, Self::NotYetAvailable { .. })
    }

    /// Returns `true` if the failed operation can be retried later.
    ///
    /// Setup failures caused by an unreachable or unresponsive spa are
    /// retryable; invalid values are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::NotYetAvailable { .. })
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A requested state is not among the control's options.
    #[error("{control} does not accept state {value}")]
    InvalidOption {
        /// Name of the control.
        control: String,
        /// The rejected state value.
        value: u8,
    },

    /// An option name could not be mapped to a state.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A hardware address could not be parsed.
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// A temperature is not a finite number.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(String),
}

/// Errors raised while establishing or validating a spa connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The spa could not be reached at the given host.
    #[error("cannot connect to spa at {0}")]
    Unreachable(String),

    /// The spa did not finish its configuration handshake in time.
    #[error("spa did not finish configuration within {0} ms")]
    Timeout(u64),

    /// The configuration entry is not ready and setup should be retried.
    #[error("spa at {0} is not ready")]
    NotReady(String),

    /// The spa is not connected.
    #[error("spa is not connected")]
    NotConnected,
}

/// Errors raised on the write path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The transport refused the outbound command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The transport is closed.
    #[error("transport closed")]
    Closed,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
