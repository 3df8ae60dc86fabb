// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! What an entity can wrap.

use tokio::time::Instant;

use crate::client::{SpaClient, SpaControl};
use crate::subscription::Observable;

/// A session or control that entities observe.
///
/// Reads through a referent are snapshots of ingested telemetry; they never
/// block on the spa.
pub trait Referent: Observable + Send + Sync + 'static {
    /// Returns the session this referent belongs to, unless it was dropped.
    fn session(&self) -> Option<SpaClient>;

    /// Returns the name entities of this referent inherit when their
    /// description has none.
    fn referent_name(&self) -> Option<String>;

    /// Returns `true` while the owning session is connected.
    fn is_connected(&self) -> bool {
        self.session().is_some_and(|s| s.is_connected())
    }

    /// Returns when the owning session last ingested telemetry.
    fn last_update(&self) -> Option<Instant> {
        self.session().and_then(|s| s.last_update())
    }
}

impl Referent for SpaClient {
    fn session(&self) -> Option<SpaClient> {
        Some(self.clone())
    }

    fn referent_name(&self) -> Option<String> {
        None
    }

    fn is_connected(&self) -> bool {
        SpaClient::is_connected(self)
    }

    fn last_update(&self) -> Option<Instant> {
        SpaClient::last_update(self)
    }
}

impl Referent for SpaControl {
    fn session(&self) -> Option<SpaClient> {
        self.client()
    }

    fn referent_name(&self) -> Option<String> {
        Some(self.name())
    }
}
