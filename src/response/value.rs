// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel reading response parsing.

use serde_json::{Map, Value};

use crate::channel::{Channel, ChannelValue};
use crate::error::ParseError;

/// Response from one of the controller's `Get*` endpoints.
///
/// Controllers answer with either a bare JSON scalar or an object carrying
/// the value:
/// - `75`, `true`, `"75"`, `"ON"`
/// - `{"value": 75}` (key matched case-insensitively)
/// - `{"brightness": 75}` (any object with exactly one member)
///
/// # Examples
///
/// ```
/// use ws281x_bridge::response::ValueResponse;
/// use ws281x_bridge::Channel;
///
/// let response = ValueResponse::parse(r#"{"Value": 42}"#).unwrap();
/// assert_eq!(response.scalar(), &serde_json::json!(42));
/// assert_eq!(response.decode(Channel::Saturation).unwrap().to_string(), "42%");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueResponse {
    scalar: Value,
}

impl ValueResponse {
    /// Parses a response body and extracts the carried scalar.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the body is empty, is not JSON, or is an
    /// object that does not identify a single value.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ParseError::UnexpectedFormat("empty body".to_string()));
        }

        let raw: Value = serde_json::from_str(body)?;
        let scalar = match raw {
            Value::Object(map) => Self::unwrap_object(map)?,
            Value::Array(_) => {
                return Err(ParseError::UnexpectedFormat(format!(
                    "expected scalar or object, got array: {body}"
                )));
            }
            scalar => scalar,
        };

        Ok(Self { scalar })
    }

    fn unwrap_object(mut map: Map<String, Value>) -> Result<Value, ParseError> {
        let key = map
            .keys()
            .find(|k| k.eq_ignore_ascii_case("value"))
            .cloned();
        if let Some(key) = key {
            return map
                .remove(&key)
                .ok_or_else(|| ParseError::MissingField("value".to_string()));
        }

        if map.len() == 1 {
            return map
                .into_iter()
                .next()
                .map(|(_, v)| v)
                .ok_or_else(|| ParseError::MissingField("value".to_string()));
        }

        Err(ParseError::MissingField("value".to_string()))
    }

    /// Returns the carried JSON scalar.
    #[must_use]
    pub fn scalar(&self) -> &Value {
        &self.scalar
    }

    /// Decodes the scalar as a value for `channel`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the scalar does not fit the
    /// channel's type or range.
    pub fn decode(&self, channel: Channel) -> Result<ChannelValue, ParseError> {
        ChannelValue::from_json(channel, &self.scalar)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{Brightness, PowerState};

    #[test]
    fn parse_bare_number() {
        let response = ValueResponse::parse("75").unwrap();
        assert_eq!(
            response.decode(Channel::Brightness).unwrap(),
            ChannelValue::Brightness(Brightness::new(75).unwrap())
        );
    }

    #[test]
    fn parse_bare_bool_with_whitespace() {
        let response = ValueResponse::parse(" true\n").unwrap();
        assert_eq!(
            response.decode(Channel::Power).unwrap(),
            ChannelValue::Power(PowerState::On)
        );
    }

    #[test]
    fn parse_value_object() {
        let response = ValueResponse::parse(r#"{"value": 120, "uptime": 5}"#).unwrap();
        assert_eq!(response.scalar(), &json!(120));
    }

    #[test]
    fn parse_single_member_object() {
        let response = ValueResponse::parse(r#"{"hue": 200}"#).unwrap();
        assert_eq!(response.scalar(), &json!(200));
    }

    #[test]
    fn parse_ambiguous_object_fails() {
        let err = ValueResponse::parse(r#"{"hue": 200, "sat": 10}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn parse_empty_body_fails() {
        assert!(matches!(
            ValueResponse::parse("  ").unwrap_err(),
            ParseError::UnexpectedFormat(_)
        ));
    }

    #[test]
    fn parse_malformed_json_fails() {
        assert!(matches!(
            ValueResponse::parse("{not json").unwrap_err(),
            ParseError::Json(_)
        ));
    }

    #[test]
    fn parse_array_fails() {
        assert!(matches!(
            ValueResponse::parse("[1, 2]").unwrap_err(),
            ParseError::UnexpectedFormat(_)
        ));
    }
}
