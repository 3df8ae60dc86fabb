// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity adapters.
//!
//! An [`Entity`] wraps a [`Referent`] (the session or one control) and a
//! static [`EntityDescription`]. It never polls and never caches: the
//! display layer attaches a refresh callback, the referent calls it after
//! every relevant update, and the display layer then reads
//! [`Entity::current_value`] again.
//!
//! Availability and freshness are separate questions. An entity is
//! available while the session is connected; its state is
//! [`Freshness::Assumed`] once no telemetry arrived for
//! [`DEFAULT_FRESHNESS_WINDOW`]. Reads keep working in both cases.
//!
//! # Capabilities
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Readable`] | Synchronous projection of the referent's state |
//! | [`Writable`] | Dispatch a new state without waiting for confirmation |
//! | [`Observable`](crate::subscription::Observable) | Change notification on the referent |

mod adapter;
mod description;
mod device_info;
mod referent;

pub use adapter::{DEFAULT_FRESHNESS_WINDOW, Entity, EntityHandle, Freshness, RefreshCallback};
pub use description::{DeviceClass, EntityCategory, EntityDescription};
pub use device_info::{CONNECTION_NETWORK_MAC, DOMAIN, DeviceInfo, MANUFACTURER};
pub use referent::Referent;

use crate::error::Result;

/// An entity whose value can be read.
pub trait Readable {
    /// The value type.
    type Value;

    /// Reads the value from the live referent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`](crate::Error::NotYetAvailable)
    /// until the underlying telemetry arrives.
    fn current_value(&self) -> Result<Self::Value>;
}

/// An entity whose referent accepts writes.
///
/// A write returns once the command is queued. The new state shows up later
/// through the referent's notifications, so a read right after a write may
/// still return the old value.
#[allow(async_fn_in_trait)]
pub trait Writable {
    /// The value type accepted by [`write`](Self::write).
    type Value;

    /// Requests a new state.
    ///
    /// # Errors
    ///
    /// Returns validation and dispatch errors; the displayed state is left
    /// unchanged.
    async fn write(&self, value: Self::Value) -> Result<()>;
}
