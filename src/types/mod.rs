// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the session model and the entity adapters.
//!
//! # Types
//!
//! - [`MacAddress`] - Hardware address of the spa controller
//! - [`ControlState`], [`ControlKind`], [`ControlId`] - Ordinal state, kind and address of a control
//! - [`HeatMode`], [`HeatState`], [`TemperatureUnit`], [`TemperatureRange`] - Spa heating values
//! - [`HvacMode`], [`HvacAction`] - Their display-layer counterparts

mod control;
mod heat;
mod mac;

pub use control::{ControlId, ControlKind, ControlState};
pub use heat::{HeatMode, HeatState, HvacAction, HvacMode, TemperatureRange, TemperatureUnit};
pub use mac::MacAddress;
