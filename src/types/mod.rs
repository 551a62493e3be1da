// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time, so an out-of-range value can never reach the cache or the wire.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off
//! - [`Brightness`] - Brightness level (0-100%)
//! - [`Hue`] - Hue angle (0-359 degrees)
//! - [`Saturation`] - Saturation (0-100%)

mod brightness;
mod color;
mod power;

pub use brightness::Brightness;
pub use color::{Hue, Saturation};
pub use power::PowerState;
