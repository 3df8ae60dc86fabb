// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spa state management types.
//!
//! [`SpaState`] holds what the spa last reported at session level, while
//! [`SpaUpdate`] represents individual decoded changes that are applied to
//! it by the session's ingestion path.
//!
//! # Examples
//!
//! ```
//! use balboa_entities::state::{SpaState, SpaUpdate};
//! use balboa_entities::types::HeatState;
//!
//! let mut state = SpaState::new();
//! state.apply(&SpaUpdate::HeatState(HeatState::Heating));
//!
//! assert_eq!(state.heat_state(), Some(HeatState::Heating));
//! ```

mod spa_state;
mod spa_update;

pub use spa_state::{FilterCycle, SpaConfiguration, SpaState};
pub use spa_update::{FilterCycleId, SpaUpdate};
