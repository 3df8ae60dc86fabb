// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection check run before a spa is configured.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::Connector;
use crate::error::Result;
use crate::types::MacAddress;

/// How long [`validate`] waits for the configuration handshake.
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(15);

/// What a successful [`validate`] learned about the spa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSpa {
    /// Entry title; the spa model.
    pub title: String,
    /// Hardware address, used as the entry's unique id.
    pub mac: MacAddress,
}

/// Connects to `host`, waits for the configuration handshake and
/// disconnects again.
///
/// # Errors
///
/// Returns [`ConnectionError::Unreachable`](crate::ConnectionError::Unreachable)
/// if the spa cannot be reached and
/// [`ConnectionError::Timeout`](crate::ConnectionError::Timeout) if it does not complete the handshake
/// within `timeout`.
///
/// # Examples
///
/// ```
/// use balboa_entities::config::{validate, DEFAULT_VALIDATION_TIMEOUT};
/// use balboa_entities::testing::MockConnector;
///
/// #[tokio::main]
/// async fn main() -> balboa_entities::Result<()> {
///     let connector = MockConnector::new();
///     let spa = validate(&connector, "192.168.1.20", DEFAULT_VALIDATION_TIMEOUT).await?;
///     assert_eq!(spa.title, "BP501G1");
///     Ok(())
/// }
/// ```
pub async fn validate<C: Connector>(
    connector: &C,
    host: &str,
    timeout: Duration,
) -> Result<ValidatedSpa> {
    tracing::debug!(host = %host, "Attempting to connect to spa");

    let spa = connector.connect(host).await?;
    let result: Result<ValidatedSpa> = async {
        spa.wait_until_configured(timeout).await?;
        Ok(ValidatedSpa {
            title: spa.model()?,
            mac: spa.mac_address()?,
        })
    }
    .await;
    spa.disconnect();

    match &result {
        Ok(validated) => {
            tracing::debug!(host = %host, mac = %validated.mac, model = %validated.title, "Spa validated");
        }
        Err(e) => tracing::debug!(host = %host, error = %e, "Spa validation failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::error::ConnectionError;
    use crate::testing::{self, MockConnector};

    #[tokio::test]
    async fn returns_model_and_mac() {
        let connector = MockConnector::new();
        let spa = validate(&connector, "10.0.0.5", DEFAULT_VALIDATION_TIMEOUT)
            .await
            .unwrap();

        assert_eq!(spa.title, "BP501G1");
        assert_eq!(spa.mac, testing::mac());
        let session = connector.last_session().unwrap();
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn unreachable_spa() {
        let connector = MockConnector::unreachable();
        let err = validate(&connector, "10.0.0.5", DEFAULT_VALIDATION_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Unreachable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn handshake_timeout() {
        let connector = MockConnector::new().without_configuration();
        let err = validate(&connector, "10.0.0.5", Duration::from_secs(15))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Timeout(15_000))
        ));
        assert!(!connector.last_session().unwrap().is_connected());
    }
}
