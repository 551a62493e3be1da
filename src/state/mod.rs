// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state types.
//!
//! [`LightState`] is the local mirror of the controller's four channels, and
//! [`StateChange`] describes a single applied update.
//!
//! # Examples
//!
//! ```
//! use ws281x_bridge::state::LightState;
//! use ws281x_bridge::types::Saturation;
//! use ws281x_bridge::ChannelValue;
//!
//! let mut state = LightState::new();
//! let change = state
//!     .apply(ChannelValue::Saturation(Saturation::new(50).unwrap()))
//!     .unwrap();
//!
//! assert_eq!(change.to_string(), "saturation: 0% -> 50%");
//! ```

mod light_state;
mod state_change;

pub use light_state::LightState;
pub use state_change::StateChange;
