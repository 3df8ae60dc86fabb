// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for referent updates.
//!
//! The session and every control own a [`ListenerRegistry`]. There is no
//! process-wide dispatcher: a listener registers directly on the referent
//! whose changes it cares about.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`ListenerRegistry`] - Observer list that stores and dispatches listeners
//! - [`Observable`] - Trait for referents that support update subscriptions

mod callback;
mod subscribable;

pub use callback::{ListenerRegistry, SubscriptionId};
pub use subscribable::Observable;
