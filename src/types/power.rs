// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of the light.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of the LED strip.
///
/// Serializes as a JSON boolean, which is also how the state travels to the
/// controller.
///
/// # Examples
///
/// ```
/// use ws281x_bridge::types::PowerState;
///
/// assert_eq!(PowerState::from(true), PowerState::On);
/// assert!(!PowerState::default().is_on());
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum PowerState {
    /// Light is off.
    #[default]
    Off,
    /// Light is on.
    On,
}

impl PowerState {
    /// Returns the upper-case string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns `true` if the light is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(value: PowerState) -> Self {
        value.is_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_state_from_str() {
        assert_eq!("ON".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
        assert_eq!("1".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("0".parse::<PowerState>().unwrap(), PowerState::Off);
        assert_eq!(" true ".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("false".parse::<PowerState>().unwrap(), PowerState::Off);
    }

    #[test]
    fn power_state_from_str_invalid() {
        let result = "toggle".parse::<PowerState>();
        assert!(matches!(
            result.unwrap_err(),
            ValueError::InvalidPowerState(_)
        ));
    }

    #[test]
    fn power_state_bool_conversions() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
        assert!(bool::from(PowerState::On));
        assert!(!bool::from(PowerState::Off));
    }

    #[test]
    fn power_state_serializes_as_bool() {
        assert_eq!(serde_json::to_string(&PowerState::On).unwrap(), "true");
        let off: PowerState = serde_json::from_str("false").unwrap();
        assert_eq!(off, PowerState::Off);
    }

    #[test]
    fn power_state_defaults_to_off() {
        assert_eq!(PowerState::default(), PowerState::Off);
    }
}
