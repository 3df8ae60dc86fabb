// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Balboa Entities - Home-automation entities for Balboa spas.
//!
//! This library exposes a Balboa spa as a set of home-automation entities
//! (sensors, switches, fans, lights, a climate and a select) that stay in
//! sync with the spa's live telemetry.
//!
//! # Architecture
//!
//! - A [`SpaClient`] session holds the spa's latest telemetry and owns one
//!   [`SpaControl`](client::SpaControl) per pump, light, relay or selector.
//!   Both are observable referents.
//! - An [`Entity`](entity::Entity) adapts one attribute of one referent.
//!   It never caches: every read goes to the referent, and a refresh
//!   callback fires whenever the referent notifies.
//! - The [`platform`] module builds the concrete entities, and
//!   [`integration`] ties a configured spa to a running session.
//!
//! The wire protocol lives outside this crate. It plugs in through
//! [`Connector`](client::Connector), feeds decoded telemetry to
//! [`SpaClient::ingest`] and drains queued [`SpaCommand`]s.
//!
//! # Quick Start
//!
//! The sample spa below comes from the [`testing`] module, available with
//! the `testing` feature.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use balboa_entities::platform::{EntitySettings, setup_entities};
//! use balboa_entities::state::SpaUpdate;
//! use balboa_entities::{testing, RefreshCallback};
//!
//! let (spa, _commands) = testing::session("192.168.1.20");
//! let entities = setup_entities(&spa, &EntitySettings::default())?;
//!
//! let refreshes = Arc::new(AtomicUsize::new(0));
//! entities.attach_all(|_| -> RefreshCallback {
//!     let refreshes = Arc::clone(&refreshes);
//!     Arc::new(move || {
//!         refreshes.fetch_add(1, Ordering::SeqCst);
//!     })
//! });
//!
//! spa.ingest(SpaUpdate::Temperature(38.5));
//! assert!(refreshes.load(Ordering::SeqCst) > 0);
//! # Ok::<(), balboa_entities::Error>(())
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod integration;
pub mod platform;
pub mod state;
pub mod subscription;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use client::{Connector, SpaClient, SpaControl};
pub use command::SpaCommand;
pub use config::{ConfigEntry, ConfigFlow, EntryOptions, validate};
pub use entity::{Entity, EntityHandle, Freshness, RefreshCallback, Referent};
pub use error::{CommandError, ConnectionError, Error, Result, ValueError};
pub use integration::{SpaIntegration, setup_entry};
pub use platform::{EntitySettings, Platform, PlatformEntity, SpaEntities, setup_entities};
pub use state::SpaUpdate;
pub use subscription::{Observable, SubscriptionId};
pub use types::{ControlId, ControlKind, ControlState, MacAddress};
