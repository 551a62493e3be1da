// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Endpoint paths and request payload shape.

use serde::Deserialize;

use crate::channel::{Channel, ChannelValue};
use crate::error::ProtocolError;

/// Per-channel endpoint paths on the controller.
///
/// Defaults match the stock controller firmware:
///
/// | Channel | Get | Set |
/// |---|---|---|
/// | Power | `/GetOn` | `/SetOn` |
/// | Brightness | `/GetVal` | `/SetVal` |
/// | Hue | `/GetHue` | `/SetHue` |
/// | Saturation | `/GetSat` | `/SetSat` |
///
/// # Examples
///
/// ```
/// use ws281x_bridge::protocol::EndpointPaths;
/// use ws281x_bridge::Channel;
///
/// let paths = EndpointPaths::default();
/// assert_eq!(paths.get_path(Channel::Brightness), "/GetVal");
/// assert_eq!(paths.set_path(Channel::Saturation), "/SetSat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointPaths {
    /// Read power state.
    pub get_on: String,
    /// Write power state.
    pub set_on: String,
    /// Read brightness.
    pub get_brightness: String,
    /// Write brightness.
    pub set_brightness: String,
    /// Read hue.
    pub get_hue: String,
    /// Write hue.
    pub set_hue: String,
    /// Read saturation.
    pub get_saturation: String,
    /// Write saturation.
    pub set_saturation: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            get_on: "/GetOn".to_string(),
            set_on: "/SetOn".to_string(),
            get_brightness: "/GetVal".to_string(),
            set_brightness: "/SetVal".to_string(),
            get_hue: "/GetHue".to_string(),
            set_hue: "/SetHue".to_string(),
            get_saturation: "/GetSat".to_string(),
            set_saturation: "/SetSat".to_string(),
        }
    }
}

impl EndpointPaths {
    /// Returns the read endpoint for `channel`.
    #[must_use]
    pub fn get_path(&self, channel: Channel) -> &str {
        match channel {
            Channel::Power => &self.get_on,
            Channel::Brightness => &self.get_brightness,
            Channel::Hue => &self.get_hue,
            Channel::Saturation => &self.get_saturation,
        }
    }

    /// Returns the write endpoint for `channel`.
    #[must_use]
    pub fn set_path(&self, channel: Channel) -> &str {
        match channel {
            Channel::Power => &self.set_on,
            Channel::Brightness => &self.set_brightness,
            Channel::Hue => &self.set_hue,
            Channel::Saturation => &self.set_saturation,
        }
    }

    /// Checks that every path is absolute.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` naming the first offending path.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        for channel in Channel::ALL {
            for path in [self.get_path(channel), self.set_path(channel)] {
                if !path.starts_with('/') {
                    return Err(ProtocolError::InvalidAddress(format!(
                        "{channel} endpoint path must start with '/': {path:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Shape of the JSON body sent to `Set*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// The bare value: `120`, `true`.
    #[default]
    Raw,
    /// The value wrapped in an object: `{"value": 120}`.
    Object,
}

impl PayloadFormat {
    /// Encodes `value` as a request body.
    #[must_use]
    pub fn encode(&self, value: &ChannelValue) -> serde_json::Value {
        match self {
            Self::Raw => value.to_json(),
            Self::Object => serde_json::json!({ "value": value.to_json() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{Hue, PowerState};

    #[test]
    fn default_paths_are_valid() {
        assert!(EndpointPaths::default().validate().is_ok());
    }

    #[test]
    fn brightness_reads_from_value_endpoint() {
        let paths = EndpointPaths::default();
        assert_eq!(paths.get_path(Channel::Brightness), "/GetVal");
        assert_ne!(paths.get_path(Channel::Brightness), paths.get_path(Channel::Hue));
    }

    #[test]
    fn relative_path_is_rejected() {
        let paths = EndpointPaths {
            set_hue: "SetHue".to_string(),
            ..EndpointPaths::default()
        };
        let err = paths.validate().unwrap_err();
        assert!(err.to_string().contains("hue"));
    }

    #[test]
    fn deserialize_partial_paths() {
        let paths: EndpointPaths = serde_json::from_str(r#"{"getOn": "/api/on"}"#).unwrap();
        assert_eq!(paths.get_path(Channel::Power), "/api/on");
        assert_eq!(paths.set_path(Channel::Power), "/SetOn");
    }

    #[test]
    fn payload_formats() {
        let hue = ChannelValue::Hue(Hue::new(120).unwrap());
        assert_eq!(PayloadFormat::Raw.encode(&hue), json!(120));
        assert_eq!(PayloadFormat::Object.encode(&hue), json!({"value": 120}));
        assert_eq!(
            PayloadFormat::Raw.encode(&ChannelValue::Power(PowerState::On)),
            json!(true)
        );
    }
}
