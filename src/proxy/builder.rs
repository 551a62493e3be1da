// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light proxy builder.

use tokio::runtime::Handle;

use crate::config::LightConfig;
use crate::error::Error;
use crate::health::DeviceHealth;
use crate::protocol::{HttpClient, Protocol};
use crate::proxy::LightProxy;
use crate::state::LightState;

/// Builder for [`LightProxy`].
///
/// Created with:
/// - `LightProxy::http("host")` - Simple host string
/// - `LightProxy::http_config(HttpConfig::new("host").with_port(5000))` - Advanced configuration
/// - `LightProxy::with_protocol(transport)` - Any [`Protocol`] implementation
///
/// Configuration errors (such as an empty host) are reported when building.
///
/// # Examples
///
/// ```no_run
/// use ws281x_bridge::LightProxy;
///
/// # async fn example() -> ws281x_bridge::Result<()> {
/// // Reads all four channels once before returning
/// let proxy = LightProxy::http("192.168.1.60").build().await?;
///
/// // Declare the controller unreachable after a single failure
/// let proxy = LightProxy::http("192.168.1.60")
///     .with_failure_threshold(1)
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LightProxyBuilder<P: Protocol = HttpClient> {
    protocol: Result<P, Error>,
    runtime: Option<Handle>,
    initial_state: LightState,
    failure_threshold: u32,
}

impl<P: Protocol> LightProxyBuilder<P> {
    pub(crate) fn new(protocol: Result<P, Error>) -> Self {
        Self {
            protocol,
            runtime: None,
            initial_state: LightState::default(),
            failure_threshold: DeviceHealth::DEFAULT_FAILURE_THRESHOLD,
        }
    }

    /// Sets the runtime that detached requests are spawned on.
    ///
    /// Needed when the proxy is built outside a tokio runtime, for instance
    /// from a host's synchronous callback thread.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Sets the values served until the first reads complete.
    #[must_use]
    pub fn with_initial_state(mut self, state: LightState) -> Self {
        self.initial_state = state;
        self
    }

    /// Sets how many consecutive failures mark the controller unreachable.
    ///
    /// Zero is treated as one.
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Returns the configured failure threshold.
    #[must_use]
    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Builds the proxy and primes its cache by reading every channel.
    ///
    /// A controller that cannot be read is not an error: the failure is
    /// logged and counted, and the proxy starts from the initial state.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport configuration is invalid
    /// - No tokio runtime is available
    pub async fn build(self) -> Result<LightProxy<P>, Error> {
        let proxy = self.build_without_probe()?;

        match proxy.refresh_all().await {
            Ok(state) => tracing::info!(?state, "LED controller state loaded"),
            Err(err) => {
                tracing::warn!(error = %err, "Could not read initial state, starting from defaults");
            }
        }

        Ok(proxy)
    }

    /// Builds the proxy without any network access.
    ///
    /// Getters serve the initial state until their first reads complete.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The transport configuration is invalid
    /// - No runtime was set and this is not called from within a tokio runtime
    pub fn build_without_probe(self) -> Result<LightProxy<P>, Error> {
        let protocol = self.protocol?;
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| Error::NoRuntime)?,
        };

        Ok(LightProxy::new(
            protocol,
            runtime,
            self.initial_state,
            self.failure_threshold,
        ))
    }
}

impl LightProxyBuilder<HttpClient> {
    /// Creates a builder from a deserialized configuration.
    ///
    /// Invalid configurations are reported by [`build`](Self::build) or
    /// [`build_without_probe`](Self::build_without_probe).
    #[must_use]
    pub fn from_config(config: &LightConfig) -> Self {
        let protocol = config
            .http_config()
            .and_then(|http| http.into_client().map_err(Error::Protocol));
        Self::new(protocol).with_failure_threshold(config.failure_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::HttpConfig;
    use crate::types::Brightness;

    #[test]
    fn builder_defaults() {
        let builder = LightProxy::http("192.168.1.60");
        assert!(builder.protocol.is_ok());
        assert!(builder.runtime.is_none());
        assert_eq!(builder.initial_state, LightState::new());
        assert_eq!(
            builder.failure_threshold(),
            DeviceHealth::DEFAULT_FAILURE_THRESHOLD
        );
    }

    #[test]
    fn builder_with_failure_threshold() {
        let builder = LightProxy::http("192.168.1.60").with_failure_threshold(5);
        assert_eq!(builder.failure_threshold(), 5);
    }

    #[test]
    fn empty_host_fails_at_build() {
        let builder = LightProxy::http_config(HttpConfig::new("http://"));
        assert!(matches!(
            builder.build_without_probe(),
            Err(Error::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn build_without_probe_serves_initial_state() {
        let mut state = LightState::new();
        state.apply(Brightness::new(30).unwrap().into());

        let proxy = LightProxy::http("192.168.1.60")
            .with_initial_state(state)
            .build_without_probe()
            .unwrap();

        assert_eq!(proxy.state().brightness().value(), 30);
        assert_eq!(proxy.pending_requests(), 0);
        assert_eq!(proxy.protocol().base_url(), "http://192.168.1.60");
    }

    #[tokio::test]
    async fn from_config_applies_threshold_and_address() {
        let config: LightConfig = serde_json::from_str(
            r#"{"host": "ledstrip.local", "port": 5000, "failureThreshold": 7}"#,
        )
        .unwrap();

        let builder = LightProxyBuilder::from_config(&config);
        assert_eq!(builder.failure_threshold(), 7);

        let proxy = builder.build_without_probe().unwrap();
        assert_eq!(proxy.protocol().base_url(), "http://ledstrip.local:5000");
        assert_eq!(proxy.health().failure_threshold(), 7);
    }

    #[test]
    fn from_invalid_config_fails_at_build() {
        let config: LightConfig = serde_json::from_str(r#"{"host": ""}"#).unwrap();
        let err = LightProxyBuilder::from_config(&config)
            .build_without_probe()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }
}
