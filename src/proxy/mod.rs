// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The light proxy: host-facing accessors over a remote LED controller.
//!
//! # Accessor contract
//!
//! The host calls getters and setters synchronously and expects them to
//! return at once. The proxy therefore never awaits network I/O inside an
//! accessor:
//!
//! - a getter returns the cached value and spawns a detached read that
//!   updates the cache for the *next* call;
//! - a setter writes the cache (optimistically) and spawns a detached write.
//!
//! Until the first read completes, getters return the defaults
//! (off, 0%, 0°, 0%). Failures of detached requests are logged and recorded
//! in [`DeviceHealth`]; they never reach the caller and never touch the
//! cache.
//!
//! ```no_run
//! use ws281x_bridge::LightProxy;
//! use ws281x_bridge::types::Hue;
//!
//! # async fn example() -> ws281x_bridge::Result<()> {
//! let proxy = LightProxy::http("192.168.1.60").build().await?;
//!
//! proxy.set_on(true);
//! proxy.set_hue(Hue::new(120)?);
//! assert_eq!(proxy.get_hue().degrees(), 120);
//! # Ok(())
//! # }
//! ```

mod builder;
mod in_flight;

pub use builder::LightProxyBuilder;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tokio::runtime::Handle;

use crate::channel::{Channel, ChannelValue};
use crate::error::{Error, Result};
use crate::health::{DeviceHealth, HealthTransition};
use crate::protocol::{HttpClient, HttpConfig, Protocol};
use crate::state::{LightState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{Brightness, Hue, PowerState, Saturation};

use in_flight::InFlight;

/// A color light bulb backed by an HTTP LED controller.
///
/// Cloning is cheap; clones share the cache, callbacks and health record.
///
/// # Creating a proxy
///
/// ```no_run
/// use std::time::Duration;
///
/// use ws281x_bridge::LightProxy;
/// use ws281x_bridge::protocol::HttpConfig;
///
/// # async fn example() -> ws281x_bridge::Result<()> {
/// // Prime the cache from the controller
/// let proxy = LightProxy::http("192.168.1.60").build().await?;
///
/// // Start from defaults without touching the network
/// let config = HttpConfig::new("ledstrip.local")
///     .with_port(5000)
///     .with_timeout(Duration::from_secs(2));
/// let proxy = LightProxy::http_config(config).build_without_probe()?;
/// # Ok(())
/// # }
/// ```
pub struct LightProxy<P: Protocol = HttpClient> {
    shared: Arc<Shared<P>>,
    runtime: Handle,
}

/// State shared between the proxy and its detached tasks.
struct Shared<P> {
    protocol: P,
    cache: RwLock<Cache>,
    refreshing: [AtomicBool; 4],
    health: RwLock<DeviceHealth>,
    callbacks: CallbackRegistry,
    in_flight: Arc<InFlight>,
}

/// The cached state plus, per channel, a write generation and writer slot.
///
/// A channel's generation moves on every host set and again when its writer
/// drains, so any reading that overlapped a write is recognizable.
#[derive(Debug, Default)]
struct Cache {
    state: LightState,
    generations: [u64; 4],
    writers: [WriteSlot; 4],
}

/// Single writer per channel: only the most recent unsent value is kept.
#[derive(Debug, Default, Clone, Copy)]
struct WriteSlot {
    queued: Option<ChannelValue>,
    active: bool,
}

/// Clears a channel's refresh flag when the read task ends.
struct RefreshSlot<'a>(&'a AtomicBool);

impl Drop for RefreshSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LightProxy<HttpClient> {
    /// Starts building a proxy for the controller at `host`.
    #[must_use]
    pub fn http(host: impl Into<String>) -> LightProxyBuilder<HttpClient> {
        Self::http_config(HttpConfig::new(host))
    }

    /// Starts building a proxy from a full HTTP configuration.
    #[must_use]
    pub fn http_config(config: HttpConfig) -> LightProxyBuilder<HttpClient> {
        LightProxyBuilder::new(config.into_client().map_err(Error::Protocol))
    }
}

impl<P: Protocol> LightProxy<P> {
    /// Starts building a proxy over any [`Protocol`] implementation.
    #[must_use]
    pub fn with_protocol(protocol: P) -> LightProxyBuilder<P> {
        LightProxyBuilder::new(Ok(protocol))
    }

    pub(crate) fn new(
        protocol: P,
        runtime: Handle,
        initial_state: LightState,
        failure_threshold: u32,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                protocol,
                cache: RwLock::new(Cache {
                    state: initial_state,
                    ..Cache::default()
                }),
                refreshing: Default::default(),
                health: RwLock::new(DeviceHealth::new(failure_threshold)),
                callbacks: CallbackRegistry::new(),
                in_flight: Arc::new(InFlight::default()),
            }),
            runtime,
        }
    }

    // ========== Generic accessors ==========

    /// Returns the cached value of `channel` and refreshes it in the
    /// background.
    pub fn get(&self, channel: Channel) -> ChannelValue {
        self.read_through(channel).value(channel)
    }

    /// Stores `value` in the cache and writes it to the controller in the
    /// background.
    ///
    /// Writes to one channel are sent one at a time. Values set while a
    /// write is in flight replace each other, and only the latest is sent
    /// next.
    pub fn set(&self, value: ChannelValue) {
        let channel = value.channel();
        let start_writer = {
            let mut cache = self.shared.cache.write();
            let generation = &mut cache.generations[channel.index()];
            *generation = generation.wrapping_add(1);
            cache.state.apply(value);

            let slot = &mut cache.writers[channel.index()];
            slot.queued = Some(value);
            !std::mem::replace(&mut slot.active, true)
        };

        tracing::debug!(%channel, %value, "Set characteristic");

        if !start_writer {
            tracing::trace!(%channel, %value, "Write already in flight, queued latest value");
            return;
        }

        let shared = Arc::clone(&self.shared);
        let guard = self.shared.in_flight.enter();
        self.runtime.spawn(async move {
            let _guard = guard;
            shared.drain_writes(channel).await;
        });
    }

    /// Returns the cached value of `channel` as JSON and refreshes it in the
    /// background.
    pub fn get_characteristic(&self, channel: Channel) -> serde_json::Value {
        self.get(channel).to_json()
    }

    /// Decodes a loosely typed host value and sets it.
    ///
    /// Hue 360 is accepted and stored as 0.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if `raw` is not a valid value for `channel`.
    /// Nothing is cached or sent in that case.
    pub fn set_characteristic(&self, channel: Channel, raw: &serde_json::Value) -> Result<()> {
        let value = ChannelValue::from_json(channel, raw)?;
        self.set(value);
        Ok(())
    }

    // ========== Power ==========

    /// Returns whether the light is on, per the cache.
    pub fn get_on(&self) -> bool {
        self.read_through(Channel::Power).is_on()
    }

    /// Turns the light on or off.
    pub fn set_on(&self, on: bool) {
        self.set(ChannelValue::Power(PowerState::from(on)));
    }

    // ========== Brightness ==========

    /// Returns the cached brightness.
    pub fn get_brightness(&self) -> Brightness {
        self.read_through(Channel::Brightness).brightness()
    }

    /// Sets the brightness.
    pub fn set_brightness(&self, brightness: Brightness) {
        self.set(ChannelValue::Brightness(brightness));
    }

    // ========== Hue ==========

    /// Returns the cached hue.
    pub fn get_hue(&self) -> Hue {
        self.read_through(Channel::Hue).hue()
    }

    /// Sets the hue.
    pub fn set_hue(&self, hue: Hue) {
        self.set(ChannelValue::Hue(hue));
    }

    // ========== Saturation ==========

    /// Returns the cached saturation.
    pub fn get_saturation(&self) -> Saturation {
        self.read_through(Channel::Saturation).saturation()
    }

    /// Sets the saturation.
    pub fn set_saturation(&self, saturation: Saturation) {
        self.set(ChannelValue::Saturation(saturation));
    }

    // ========== Awaitable operations ==========

    /// Reads `channel` from the controller and waits for the answer.
    ///
    /// The reading is applied to the cache unless a host write to the
    /// channel was pending or issued while the request was in flight.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    /// The cache is left unchanged in that case.
    pub async fn refresh(&self, channel: Channel) -> Result<ChannelValue> {
        self.shared.refresh(channel).await
    }

    /// Reads all four channels concurrently and returns the resulting
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Every channel is attempted; the first failure (in channel order) is
    /// returned. Successful channels are applied regardless.
    pub async fn refresh_all(&self) -> Result<LightState> {
        let (power, brightness, hue, saturation) = tokio::join!(
            self.refresh(Channel::Power),
            self.refresh(Channel::Brightness),
            self.refresh(Channel::Hue),
            self.refresh(Channel::Saturation),
        );
        power?;
        brightness?;
        hue?;
        saturation?;
        Ok(self.state())
    }

    /// Waits until no detached request is running.
    pub async fn wait_idle(&self) {
        self.shared.in_flight.wait_idle().await;
    }

    // ========== Introspection ==========

    /// Returns the number of detached requests still running.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.shared.in_flight.count()
    }

    /// Returns a snapshot of the cache without triggering any request.
    #[must_use]
    pub fn state(&self) -> LightState {
        self.shared.cache.read().state
    }

    /// Returns a snapshot of the controller's reachability record.
    #[must_use]
    pub fn health(&self) -> DeviceHealth {
        self.shared.health.read().clone()
    }

    /// Returns `false` once the failure threshold has been reached.
    #[must_use]
    pub fn is_responding(&self) -> bool {
        self.shared.health.read().is_responding()
    }

    /// Returns the underlying protocol.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.shared.protocol
    }

    // ========== Internals ==========

    fn read_through(&self, channel: Channel) -> LightState {
        let state = self.shared.cache.read().state;
        tracing::debug!(%channel, value = %state.value(channel), "Get characteristic");
        self.spawn_refresh(channel);
        state
    }

    fn spawn_refresh(&self, channel: Channel) {
        if self.shared.refreshing[channel.index()].swap(true, Ordering::AcqRel) {
            tracing::trace!(%channel, "Read already in flight, serving cache");
            return;
        }

        // Taken now so a set issued before the task first runs still wins.
        let generation = self.shared.generation(channel);
        let shared = Arc::clone(&self.shared);
        let guard = self.shared.in_flight.enter();
        self.runtime.spawn(async move {
            let _guard = guard;
            let _slot = RefreshSlot(&shared.refreshing[channel.index()]);
            if let Err(err) = shared.read(channel, generation).await {
                tracing::warn!(%channel, error = %err, "Background read failed, keeping cached value");
            }
        });
    }
}

impl<P: Protocol> Shared<P> {
    fn generation(&self, channel: Channel) -> u64 {
        self.cache.read().generations[channel.index()]
    }

    async fn refresh(&self, channel: Channel) -> Result<ChannelValue> {
        let generation = self.generation(channel);
        self.read(channel, generation).await
    }

    /// Reads `channel` and applies the reading if no host write overlapped
    /// it since `generation` was taken.
    async fn read(&self, channel: Channel, generation: u64) -> Result<ChannelValue> {
        let reading = match self.protocol.fetch(channel).await {
            Ok(response) => response.parse(channel).map_err(Error::Parse),
            Err(err) => Err(Error::Protocol(err)),
        };

        match reading {
            Ok(value) => {
                self.apply_reading(value, generation);
                self.record_success();
                Ok(value)
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    fn apply_reading(&self, value: ChannelValue, generation: u64) {
        let channel = value.channel();
        let change: Option<StateChange> = {
            let mut cache = self.cache.write();
            if cache.generations[channel.index()] != generation
                || cache.writers[channel.index()].active
            {
                tracing::trace!(%channel, %value, "Discarding reading that overlapped a host write");
                return;
            }
            cache.state.apply(value)
        };

        if let Some(change) = change {
            tracing::debug!(%change, "Controller state changed");
            self.callbacks.dispatch(&change);
        }
    }

    /// Sends the queued value of `channel` until the slot is empty.
    async fn drain_writes(&self, channel: Channel) {
        loop {
            let next = {
                let mut cache = self.cache.write();
                let next = cache.writers[channel.index()].queued.take();
                if next.is_none() {
                    cache.writers[channel.index()].active = false;
                    // Readings started while the slot was busy may predate the write.
                    let generation = &mut cache.generations[channel.index()];
                    *generation = generation.wrapping_add(1);
                }
                next
            };
            let Some(value) = next else {
                return;
            };

            match self.protocol.push(value).await {
                Ok(()) => self.record_success(),
                Err(err) => {
                    let err = Error::Protocol(err);
                    tracing::warn!(%channel, %value, error = %err, "Failed to write to controller");
                    self.record_failure(&err);
                }
            }
        }
    }

    fn record_success(&self) {
        let transition = self.health.write().record_success();
        if transition == Some(HealthTransition::Recovered) {
            tracing::info!("LED controller is responding again");
            let state = self.cache.read().state;
            self.callbacks.dispatch_responding(&state);
        }
    }

    fn record_failure(&self, err: &Error) {
        let message = err.to_string();
        let transition = self.health.write().record_failure(&message);
        if transition == Some(HealthTransition::Lost) {
            tracing::error!(error = %message, "LED controller is not responding");
            self.callbacks.dispatch_not_responding(&message);
        }
    }
}

impl<P: Protocol> Clone for LightProxy<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            runtime: self.runtime.clone(),
        }
    }
}

impl<P: Protocol> std::fmt::Debug for LightProxy<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightProxy")
            .field("state", &self.state())
            .field("health", &self.health())
            .field("pending_requests", &self.pending_requests())
            .field("callbacks", &self.shared.callbacks)
            .finish_non_exhaustive()
    }
}

impl<P: Protocol> Subscribable for LightProxy<P> {
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_power_changed(callback)
    }

    fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Brightness) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_brightness_changed(callback)
    }

    fn on_hue_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Hue) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_hue_changed(callback)
    }

    fn on_saturation_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Saturation) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_saturation_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn on_responding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LightState) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_responding(callback)
    }

    fn on_not_responding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_not_responding(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}
