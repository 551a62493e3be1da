// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for the LED controller.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::channel::{Channel, ChannelValue};
use crate::error::ProtocolError;
use crate::protocol::{ChannelResponse, EndpointPaths, PayloadFormat, Protocol};

// ============================================================================
// HttpConfig - Connection parameters for the controller
// ============================================================================

/// Configuration for the HTTP LED controller.
///
/// Every request the proxy makes is derived from this value; there is no
/// process-wide base URL.
///
/// # Examples
///
/// ```
/// use ws281x_bridge::protocol::{HttpConfig, PayloadFormat};
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = HttpConfig::new("192.168.1.60");
///
/// // With all options
/// let config = HttpConfig::new("ledstrip.local")
///     .with_port(5000)
///     .with_timeout(Duration::from_secs(2))
///     .with_payload_format(PayloadFormat::Object);
/// assert_eq!(config.base_url(), "http://ledstrip.local:5000");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    use_https: bool,
    timeout: Duration,
    paths: EndpointPaths,
    payload_format: PayloadFormat,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// A leading `http://` or `https://` is accepted and selects the scheme.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        let (host, use_https) = if let Some(rest) = host.strip_prefix("https://") {
            (rest.to_string(), true)
        } else if let Some(rest) = host.strip_prefix("http://") {
            (rest.to_string(), false)
        } else {
            (host, false)
        };
        let host = host.trim_end_matches('/').to_string();

        Self {
            host,
            port: if use_https {
                Self::DEFAULT_HTTPS_PORT
            } else {
                Self::DEFAULT_PORT
            },
            use_https,
            timeout: Self::DEFAULT_TIMEOUT,
            paths: EndpointPaths::default(),
            payload_format: PayloadFormat::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If port hasn't been explicitly set, it will be changed to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the endpoint paths.
    #[must_use]
    pub fn with_paths(mut self, paths: EndpointPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Sets the shape of `Set*` request bodies.
    #[must_use]
    pub fn with_payload_format(mut self, format: PayloadFormat) -> Self {
        self.payload_format = format;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the endpoint paths.
    #[must_use]
    pub fn paths(&self) -> &EndpointPaths {
        &self.paths
    }

    /// Returns the payload format.
    #[must_use]
    pub fn payload_format(&self) -> PayloadFormat {
        self.payload_format
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty, a path is not absolute, or the
    /// HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        self.paths.validate()?;

        let base_url = self.base_url();

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url,
            client,
            paths: self.paths,
            payload_format: self.payload_format,
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// HttpClient - reqwest-backed Protocol implementation
// ============================================================================

/// HTTP client for the LED controller.
///
/// Reads issue `GET {base_url}{get_path}`; writes issue
/// `POST {base_url}{set_path}` with a JSON body. Any status of 300 or above
/// is an error.
///
/// # Examples
///
/// ```no_run
/// use ws281x_bridge::protocol::{HttpConfig, Protocol};
/// use ws281x_bridge::Channel;
///
/// # async fn example() -> ws281x_bridge::Result<()> {
/// let client = HttpConfig::new("192.168.1.60").into_client()?;
/// let response = client.fetch(Channel::Hue).await?;
/// let hue = response.parse(Channel::Hue)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    paths: EndpointPaths,
    payload_format: PayloadFormat,
    timeout: Duration,
}

impl HttpClient {
    /// Returns the base URL of the controller.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the read URL for a channel.
    fn get_url(&self, channel: Channel) -> String {
        format!("{}{}", self.base_url, self.paths.get_path(channel))
    }

    /// Builds the write URL for a channel.
    fn set_url(&self, channel: Channel) -> String {
        format!("{}{}", self.base_url, self.paths.set_path(channel))
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            ProtocolError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ProtocolError::Http(err)
        }
    }

    fn check_status(response: &Response) -> Result<(), ProtocolError> {
        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(())
    }
}

impl Protocol for HttpClient {
    async fn fetch(&self, channel: Channel) -> Result<ChannelResponse, ProtocolError> {
        let url = self.get_url(channel);

        tracing::debug!(url = %url, %channel, "Sending HTTP read");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(&response)?;

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        tracing::debug!(body = %body, %channel, "Received HTTP response");

        Ok(ChannelResponse::new(body))
    }

    async fn push(&self, value: ChannelValue) -> Result<(), ProtocolError> {
        let channel = value.channel();
        let url = self.set_url(channel);
        let body = self.payload_format.encode(&value);

        tracing::debug!(url = %url, body = %body, "Sending HTTP write");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(&response)?;

        tracing::debug!(
            status = response.status().as_u16(),
            %channel,
            "Controller accepted write"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::new("192.168.1.60");
        assert_eq!(config.host(), "192.168.1.60");
        assert_eq!(config.port(), 80);
        assert!(!config.use_https());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.payload_format(), PayloadFormat::Raw);
        assert_eq!(config.paths(), &EndpointPaths::default());
    }

    #[test]
    fn http_config_strips_scheme() {
        let config = HttpConfig::new("https://ledstrip.local/");
        assert_eq!(config.host(), "ledstrip.local");
        assert!(config.use_https());
        assert_eq!(config.port(), 443);
        assert_eq!(config.base_url(), "https://ledstrip.local");
    }

    #[test]
    fn http_config_with_https_custom_port() {
        let config = HttpConfig::new("192.168.1.60")
            .with_port(8443)
            .with_https();
        assert!(config.use_https());
        assert_eq!(config.port(), 8443);
        assert_eq!(config.base_url(), "https://192.168.1.60:8443");
    }

    #[test]
    fn http_config_base_url_custom_port() {
        let config = HttpConfig::new("localhost").with_port(5000);
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn into_client_requires_host() {
        let err = HttpConfig::new("").into_client().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidAddress(_)));
    }

    #[test]
    fn into_client_rejects_relative_paths() {
        let paths = EndpointPaths {
            get_on: "GetOn".to_string(),
            ..EndpointPaths::default()
        };
        let err = HttpConfig::new("localhost")
            .with_paths(paths)
            .into_client()
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidAddress(_)));
    }

    #[test]
    fn client_urls_per_channel() {
        let client = HttpConfig::new("localhost")
            .with_port(5000)
            .into_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.get_url(Channel::Power), "http://localhost:5000/GetOn");
        assert_eq!(
            client.get_url(Channel::Brightness),
            "http://localhost:5000/GetVal"
        );
        assert_eq!(client.set_url(Channel::Hue), "http://localhost:5000/SetHue");
        assert_eq!(
            client.set_url(Channel::Saturation),
            "http://localhost:5000/SetSat"
        );
    }
}
