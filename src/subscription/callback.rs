// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for light state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::channel::ChannelValue;
use crate::state::{LightState, StateChange};
use crate::types::{Brightness, Hue, PowerState, Saturation};

/// Unique identifier for a subscription.
///
/// IDs are unique within a proxy's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;
type BrightnessCallback = Arc<dyn Fn(Brightness) + Send + Sync>;
type HueCallback = Arc<dyn Fn(Hue) + Send + Sync>;
type SaturationCallback = Arc<dyn Fn(Saturation) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;
type RespondingCallback = Arc<dyn Fn(&LightState) + Send + Sync>;
type NotRespondingCallback = Arc<dyn Fn(&str) + Send + Sync>;

type Slot<C> = RwLock<HashMap<SubscriptionId, C>>;

/// Registry for managing light subscription callbacks.
///
/// Thread-safe through `parking_lot::RwLock`. Callbacks are cloned out of the
/// registry before being invoked, so a callback may itself subscribe or
/// unsubscribe.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power_callbacks: Slot<PowerCallback>,
    brightness_callbacks: Slot<BrightnessCallback>,
    hue_callbacks: Slot<HueCallback>,
    saturation_callbacks: Slot<SaturationCallback>,
    state_changed_callbacks: Slot<StateChangedCallback>,
    responding_callbacks: Slot<RespondingCallback>,
    not_responding_callbacks: Slot<NotRespondingCallback>,
}

fn snapshot<C: Clone>(slot: &Slot<C>) -> Vec<C> {
    slot.read().values().cloned().collect()
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power_callbacks: RwLock::new(HashMap::new()),
            brightness_callbacks: RwLock::new(HashMap::new()),
            hue_callbacks: RwLock::new(HashMap::new()),
            saturation_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            responding_callbacks: RwLock::new(HashMap::new()),
            not_responding_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for power state changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for brightness changes.
    pub fn on_brightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Brightness) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.brightness_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for hue changes.
    pub fn on_hue_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Hue) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.hue_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for saturation changes.
    pub fn on_saturation_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Saturation) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.saturation_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for every state change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when the controller answers again after
    /// being marked not responding. Receives the current cached state.
    pub fn on_responding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LightState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.responding_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when the controller is marked not
    /// responding. Receives the last error message.
    pub fn on_not_responding<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.not_responding_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power_callbacks.write().remove(&id).is_some()
            || self.brightness_callbacks.write().remove(&id).is_some()
            || self.hue_callbacks.write().remove(&id).is_some()
            || self.saturation_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
            || self.responding_callbacks.write().remove(&id).is_some()
            || self.not_responding_callbacks.write().remove(&id).is_some()
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to the generic callbacks and to the
    /// callbacks of the changed channel.
    pub fn dispatch(&self, change: &StateChange) {
        for callback in snapshot(&self.state_changed_callbacks) {
            callback(change);
        }

        match change.current() {
            ChannelValue::Power(state) => {
                for callback in snapshot(&self.power_callbacks) {
                    callback(state);
                }
            }
            ChannelValue::Brightness(bri) => {
                for callback in snapshot(&self.brightness_callbacks) {
                    callback(bri);
                }
            }
            ChannelValue::Hue(hue) => {
                for callback in snapshot(&self.hue_callbacks) {
                    callback(hue);
                }
            }
            ChannelValue::Saturation(sat) => {
                for callback in snapshot(&self.saturation_callbacks) {
                    callback(sat);
                }
            }
        }
    }

    /// Dispatches the responding event with the current cached state.
    pub fn dispatch_responding(&self, state: &LightState) {
        for callback in snapshot(&self.responding_callbacks) {
            callback(state);
        }
    }

    /// Dispatches the not-responding event with the last error message.
    pub fn dispatch_not_responding(&self, error: &str) {
        for callback in snapshot(&self.not_responding_callbacks) {
            callback(error);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.power_callbacks.read().len()
            + self.brightness_callbacks.read().len()
            + self.hue_callbacks.read().len()
            + self.saturation_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
            + self.responding_callbacks.read().len()
            + self.not_responding_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn hue_change(from: u16, to: u16) -> StateChange {
        StateChange::new(
            ChannelValue::Hue(Hue::new(from).unwrap()),
            ChannelValue::Hue(Hue::new(to).unwrap()),
        )
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_power_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_power_changed(move |state| {
            assert_eq!(state, PowerState::On);
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(registry.callback_count(), 1);

        registry.dispatch(&StateChange::new(
            ChannelValue::Power(PowerState::Off),
            ChannelValue::Power(PowerState::On),
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_routes_by_channel() {
        let registry = CallbackRegistry::new();
        let hue_calls = Arc::new(AtomicU32::new(0));
        let sat_calls = Arc::new(AtomicU32::new(0));
        let any_calls = Arc::new(AtomicU32::new(0));

        let h = hue_calls.clone();
        registry.on_hue_changed(move |hue| {
            assert_eq!(hue.degrees(), 240);
            h.fetch_add(1, Ordering::SeqCst);
        });
        let s = sat_calls.clone();
        registry.on_saturation_changed(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });
        let a = any_calls.clone();
        registry.on_state_changed(move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&hue_change(0, 240));

        assert_eq!(hue_calls.load(Ordering::SeqCst), 1);
        assert_eq!(sat_calls.load(Ordering::SeqCst), 0);
        assert_eq!(any_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let slot = Arc::new(parking_lot::Mutex::new(None));

        let reg = registry.clone();
        let own_id = slot.clone();
        let id = registry.on_state_changed(move |_| {
            if let Some(id) = own_id.lock().take() {
                reg.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        registry.dispatch(&hue_change(0, 10));
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_reachability_callbacks() {
        let registry = CallbackRegistry::new();
        let lost = Arc::new(parking_lot::Mutex::new(String::new()));
        let recovered = Arc::new(AtomicU32::new(0));

        let l = lost.clone();
        registry.on_not_responding(move |err| *l.lock() = err.to_string());
        let r = recovered.clone();
        registry.on_responding(move |state| {
            assert!(!state.is_on());
            r.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_not_responding("connection refused");
        registry.dispatch_responding(&LightState::new());

        assert_eq!(*lost.lock(), "connection refused");
        assert_eq!(recovered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_power_changed(|_| {});
        let id2 = registry.on_power_changed(|_| {});
        assert_ne!(id1, id2);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_power_changed(|_| {});
        let debug_str = format!("{registry:?}");
        assert!(debug_str.contains("callback_count: 1"));
    }
}
