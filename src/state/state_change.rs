// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.

use crate::channel::{Channel, ChannelValue};

/// A change applied to one channel of a [`LightState`](super::LightState).
///
/// Both values always belong to the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    previous: ChannelValue,
    current: ChannelValue,
}

impl StateChange {
    pub(crate) fn new(previous: ChannelValue, current: ChannelValue) -> Self {
        debug_assert_eq!(previous.channel(), current.channel());
        Self { previous, current }
    }

    /// Returns the channel that changed.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.current.channel()
    }

    /// Returns the value held before the change.
    #[must_use]
    pub fn previous(&self) -> ChannelValue {
        self.previous
    }

    /// Returns the value held after the change.
    #[must_use]
    pub fn current(&self) -> ChannelValue {
        self.current
    }
}

impl std::fmt::Display for StateChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} -> {}", self.channel(), self.previous, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;

    #[test]
    fn display_shows_transition() {
        let change = StateChange::new(
            ChannelValue::Power(PowerState::Off),
            ChannelValue::Power(PowerState::On),
        );
        assert_eq!(change.to_string(), "power: OFF -> ON");
    }
}
