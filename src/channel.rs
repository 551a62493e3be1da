// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light channels and their values.
//!
//! A [`Channel`] is one of the four independent light-control dimensions
//! exposed to the host. A [`ChannelValue`] pairs a channel with a validated
//! value of that channel's type, and knows how to travel to and from JSON.

use std::fmt;

use serde_json::Value;

use crate::error::ParseError;
use crate::types::{Brightness, Hue, PowerState, Saturation};

/// One of the four independent light-control dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// On/off.
    Power,
    /// Brightness (HSV value component).
    Brightness,
    /// Hue.
    Hue,
    /// Saturation.
    Saturation,
}

impl Channel {
    /// All channels, in a stable order.
    pub const ALL: [Self; 4] = [Self::Power, Self::Brightness, Self::Hue, Self::Saturation];

    /// Returns the lower-case channel name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Brightness => "brightness",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
        }
    }

    /// Returns the position of this channel in [`Channel::ALL`].
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Power => 0,
            Self::Brightness => 1,
            Self::Hue => 2,
            Self::Saturation => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated value for a specific channel.
///
/// # Examples
///
/// ```
/// use ws281x_bridge::{Channel, ChannelValue};
/// use ws281x_bridge::types::Hue;
///
/// let value = ChannelValue::Hue(Hue::new(120).unwrap());
/// assert_eq!(value.channel(), Channel::Hue);
/// assert_eq!(value.to_json(), serde_json::json!(120));
///
/// let decoded = ChannelValue::from_json(Channel::Hue, &serde_json::json!("120")).unwrap();
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelValue {
    /// Power state.
    Power(PowerState),
    /// Brightness level.
    Brightness(Brightness),
    /// Hue angle.
    Hue(Hue),
    /// Saturation level.
    Saturation(Saturation),
}

impl ChannelValue {
    /// Returns the channel this value belongs to.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Power(_) => Channel::Power,
            Self::Brightness(_) => Channel::Brightness,
            Self::Hue(_) => Channel::Hue,
            Self::Saturation(_) => Channel::Saturation,
        }
    }

    /// Returns the raw JSON representation sent to the controller.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Power(state) => Value::Bool(state.is_on()),
            Self::Brightness(bri) => Value::from(bri.value()),
            Self::Hue(hue) => Value::from(hue.degrees()),
            Self::Saturation(sat) => Value::from(sat.value()),
        }
    }

    /// Decodes a JSON scalar into a value for `channel`.
    ///
    /// Power accepts booleans, numbers (non-zero is on) and the strings
    /// `ON`/`OFF`/`TRUE`/`FALSE`/`1`/`0`. Numeric channels accept integers,
    /// floats (rounded) and numeric strings. A hue of exactly 360 is the same
    /// angle as 0 and is normalized.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the scalar has the wrong type or
    /// is out of range for the channel.
    pub fn from_json(channel: Channel, value: &Value) -> Result<Self, ParseError> {
        match channel {
            Channel::Power => decode_power(value).map(Self::Power),
            Channel::Brightness => {
                let raw = decode_integer(channel, value)?;
                let raw = narrow_u8(channel, raw)?;
                Brightness::new(raw)
                    .map(Self::Brightness)
                    .map_err(|e| invalid(channel, &e))
            }
            Channel::Hue => {
                let raw = decode_integer(channel, value)?;
                match u16::try_from(raw) {
                    Ok(degrees) if degrees <= Hue::FULL_TURN => {
                        Ok(Self::Hue(Hue::wrapping(degrees)))
                    }
                    _ => Err(out_of_range(channel, raw, Hue::FULL_TURN.into())),
                }
            }
            Channel::Saturation => {
                let raw = decode_integer(channel, value)?;
                let raw = narrow_u8(channel, raw)?;
                Saturation::new(raw)
                    .map(Self::Saturation)
                    .map_err(|e| invalid(channel, &e))
            }
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(state) => write!(f, "{state}"),
            Self::Brightness(bri) => write!(f, "{bri}"),
            Self::Hue(hue) => write!(f, "{hue}"),
            Self::Saturation(sat) => write!(f, "{sat}"),
        }
    }
}

impl From<PowerState> for ChannelValue {
    fn from(value: PowerState) -> Self {
        Self::Power(value)
    }
}

impl From<Brightness> for ChannelValue {
    fn from(value: Brightness) -> Self {
        Self::Brightness(value)
    }
}

impl From<Hue> for ChannelValue {
    fn from(value: Hue) -> Self {
        Self::Hue(value)
    }
}

impl From<Saturation> for ChannelValue {
    fn from(value: Saturation) -> Self {
        Self::Saturation(value)
    }
}

fn invalid(channel: Channel, err: &dyn fmt::Display) -> ParseError {
    ParseError::InvalidValue {
        field: channel.to_string(),
        message: err.to_string(),
    }
}

fn decode_power(value: &Value) -> Result<PowerState, ParseError> {
    match value {
        Value::Bool(on) => Ok(PowerState::from(*on)),
        Value::Number(n) => n
            .as_f64()
            .map(|f| PowerState::from(f != 0.0))
            .ok_or_else(|| invalid(Channel::Power, &format!("unsupported number {n}"))),
        Value::String(s) => s
            .parse::<PowerState>()
            .map_err(|e| invalid(Channel::Power, &e)),
        other => Err(invalid(
            Channel::Power,
            &format!("expected boolean, got {other}"),
        )),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn decode_integer(channel: Channel, value: &Value) -> Result<u64, ParseError> {
    let float = match value {
        Value::Number(n) => {
            if let Some(int) = n.as_u64() {
                return Ok(int);
            }
            n.as_f64()
                .ok_or_else(|| invalid(channel, &format!("unsupported number {n}")))?
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(channel, &format!("not a number: {s:?}")))?,
        other => {
            return Err(invalid(channel, &format!("expected number, got {other}")));
        }
    };

    if !float.is_finite() || float < 0.0 {
        return Err(invalid(channel, &format!("{float} is not a valid level")));
    }
    // Safe: finite and non-negative; saturates at u64::MAX
    Ok(float.round() as u64)
}

fn out_of_range(channel: Channel, raw: u64, max: u64) -> ParseError {
    invalid(channel, &format!("value {raw} is out of range [0, {max}]"))
}

fn narrow_u8(channel: Channel, raw: u64) -> Result<u8, ParseError> {
    u8::try_from(raw).map_err(|_| out_of_range(channel, raw, 100))
}
