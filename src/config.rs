// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory configuration as found in a host's JSON config file.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;
use crate::health::DeviceHealth;
use crate::protocol::{EndpointPaths, HttpConfig, PayloadFormat};

/// Configuration block for one LED strip accessory.
///
/// Only `host` is required. Keys are camelCase.
///
/// # Examples
///
/// ```
/// use ws281x_bridge::LightConfig;
///
/// let config: LightConfig = serde_json::from_str(r#"{
///     "name": "Desk Strip",
///     "host": "192.168.1.60",
///     "port": 5000,
///     "timeoutMs": 2000,
///     "paths": { "getBrightness": "/GetVal" }
/// }"#).unwrap();
///
/// let http = config.http_config().unwrap();
/// assert_eq!(http.base_url(), "http://192.168.1.60:5000");
/// assert_eq!(http.timeout().as_millis(), 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightConfig {
    /// Display name of the accessory.
    #[serde(default = "default_name")]
    pub name: String,
    /// Controller host name or IP address; a scheme prefix is accepted.
    pub host: String,
    /// Controller port. Defaults to 80, or 443 with `https`.
    #[serde(default)]
    pub port: Option<u16>,
    /// Use HTTPS instead of HTTP.
    #[serde(default)]
    pub https: bool,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Shape of POST bodies.
    #[serde(default)]
    pub payload: PayloadFormat,
    /// Endpoint path overrides.
    #[serde(default)]
    pub paths: EndpointPaths,
    /// Consecutive failures before the accessory reports "not responding".
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

fn default_name() -> String {
    "LED Strip".to_string()
}

fn default_timeout_ms() -> u64 {
    u64::try_from(HttpConfig::DEFAULT_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
}

fn default_failure_threshold() -> u32 {
    DeviceHealth::DEFAULT_FAILURE_THRESHOLD
}

impl LightConfig {
    /// Converts this block into an [`HttpConfig`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if the host is empty, the
    /// timeout is zero, or a path does not start with `/`.
    pub fn http_config(&self) -> Result<HttpConfig, Error> {
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "timeoutMs must be greater than zero".to_string(),
            ));
        }
        self.paths
            .validate()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;

        let mut config = HttpConfig::new(self.host.trim())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_paths(self.paths.clone())
            .with_payload_format(self.payload);
        if self.https {
            config = config.with_https();
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }

        if config.host().is_empty() {
            return Err(Error::InvalidConfiguration("host is required".to_string()));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: LightConfig = serde_json::from_str(r#"{"host": "ledstrip.local"}"#).unwrap();

        assert_eq!(config.name, "LED Strip");
        assert_eq!(config.port, None);
        assert!(!config.https);
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.payload, PayloadFormat::Raw);
        assert_eq!(config.paths, EndpointPaths::default());
        assert_eq!(config.failure_threshold, 3);
    }

    #[test]
    fn missing_host_is_rejected() {
        let result: Result<LightConfig, _> = serde_json::from_str(r#"{"name": "Strip"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn full_config() {
        let config: LightConfig = serde_json::from_str(
            r#"{
                "name": "Shelf",
                "host": "10.0.0.7",
                "port": 8443,
                "https": true,
                "timeoutMs": 750,
                "payload": "object",
                "paths": {"getHue": "/hue", "setHue": "/hue/set"},
                "failureThreshold": 1
            }"#,
        )
        .unwrap();

        let http = config.http_config().unwrap();
        assert_eq!(http.base_url(), "https://10.0.0.7:8443");
        assert_eq!(http.timeout(), Duration::from_millis(750));
        assert_eq!(http.payload_format(), PayloadFormat::Object);
        assert_eq!(http.paths().get_hue, "/hue");
        assert_eq!(http.paths().get_brightness, "/GetVal");
    }

    #[test]
    fn https_without_port_uses_443() {
        let config: LightConfig =
            serde_json::from_str(r#"{"host": "strip.local", "https": true}"#).unwrap();
        assert_eq!(config.http_config().unwrap().port(), 443);
    }

    #[test]
    fn host_with_scheme_is_accepted() {
        let config: LightConfig =
            serde_json::from_str(r#"{"host": " http://192.168.1.60/ "}"#).unwrap();
        assert_eq!(config.http_config().unwrap().host(), "192.168.1.60");
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        for raw in [
            r#"{"host": ""}"#,
            r#"{"host": "strip.local", "timeoutMs": 0}"#,
            r#"{"host": "strip.local", "paths": {"setOn": "SetOn"}}"#,
        ] {
            let config: LightConfig = serde_json::from_str(raw).unwrap();
            assert!(
                matches!(config.http_config(), Err(Error::InvalidConfiguration(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn unknown_payload_format_is_rejected() {
        let result: Result<LightConfig, _> =
            serde_json::from_str(r#"{"host": "strip.local", "payload": "xml"}"#);
        assert!(result.is_err());
    }
}
