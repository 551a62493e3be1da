// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached light state.

use crate::channel::{Channel, ChannelValue};
use crate::types::{Brightness, Hue, PowerState, Saturation};

use super::StateChange;

/// Locally mirrored state of the LED strip.
///
/// The controller is the source of truth; this is a cache of unknown
/// freshness. Every field starts at its documented default (off, 0, 0°, 0%)
/// and is only ever overwritten with a concrete value, never reset.
///
/// # Examples
///
/// ```
/// use ws281x_bridge::state::LightState;
/// use ws281x_bridge::types::{Brightness, PowerState};
/// use ws281x_bridge::ChannelValue;
///
/// let mut state = LightState::new();
/// assert_eq!(state.brightness(), Brightness::MIN);
///
/// let change = state.apply(ChannelValue::Power(PowerState::On));
/// assert!(change.is_some());
/// assert!(state.is_on());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LightState {
    power: PowerState,
    brightness: Brightness,
    hue: Hue,
    saturation: Saturation,
}

impl LightState {
    /// Creates a state holding the startup defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Returns `true` if the light is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power.is_on()
    }

    /// Returns the brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Returns the hue.
    #[must_use]
    pub fn hue(&self) -> Hue {
        self.hue
    }

    /// Returns the saturation.
    #[must_use]
    pub fn saturation(&self) -> Saturation {
        self.saturation
    }

    /// Returns the cached value for `channel`.
    #[must_use]
    pub fn value(&self, channel: Channel) -> ChannelValue {
        match channel {
            Channel::Power => ChannelValue::Power(self.power),
            Channel::Brightness => ChannelValue::Brightness(self.brightness),
            Channel::Hue => ChannelValue::Hue(self.hue),
            Channel::Saturation => ChannelValue::Saturation(self.saturation),
        }
    }

    /// Stores `value` in its channel.
    ///
    /// Returns the resulting change, or `None` if the channel already held
    /// that value.
    pub fn apply(&mut self, value: ChannelValue) -> Option<StateChange> {
        let previous = self.value(value.channel());
        if previous == value {
            return None;
        }

        match value {
            ChannelValue::Power(state) => self.power = state,
            ChannelValue::Brightness(bri) => self.brightness = bri,
            ChannelValue::Hue(hue) => self.hue = hue,
            ChannelValue::Saturation(sat) => self.saturation = sat,
        }

        Some(StateChange::new(previous, value))
    }
}
