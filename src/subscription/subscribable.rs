// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish light state changes.

use crate::state::{LightState, StateChange};
use crate::subscription::SubscriptionId;
use crate::types::{Brightness, Hue, PowerState, Saturation};

/// Trait for types that support event subscriptions.
///
/// Value callbacks fire when a background read observes that the controller
/// holds a different value than the cache. Values set by the host do not
/// trigger them; the host already knows what it set.
///
/// # Examples
///
/// ```no_run
/// use ws281x_bridge::{LightProxy, Subscribable};
///
/// # async fn example() -> ws281x_bridge::Result<()> {
/// let proxy = LightProxy::http("192.168.1.60").build().await?;
///
/// let sub_id = proxy.on_brightness_changed(|bri| {
///     println!("Strip brightness is now {bri}");
/// });
///
/// proxy.on_not_responding(|err| {
///     eprintln!("LED controller unreachable: {err}");
/// });
///
/// proxy.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to power state changes.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to brightness changes.
    fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Brightness) + Send + Sync + 'static;

    /// Subscribes to hue changes.
    fn on_hue_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Hue) + Send + Sync + 'static;

    /// Subscribes to saturation changes.
    fn on_saturation_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Saturation) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Subscribes to recovery of the controller.
    ///
    /// The callback receives the cached state at the time of recovery.
    fn on_responding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LightState) + Send + Sync + 'static;

    /// Subscribes to loss of the controller.
    ///
    /// The callback receives the error that crossed the failure threshold.
    fn on_not_responding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
