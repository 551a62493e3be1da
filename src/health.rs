// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller reachability tracking.
//!
//! Accessors never fail, so the proxy records the outcome of every
//! background request here instead. A host that wants to mark the accessory
//! as "not responding" can poll [`DeviceHealth::is_responding`] or subscribe
//! through [`Subscribable`](crate::Subscribable).

use chrono::{DateTime, Utc};

/// Outcome history of requests sent to the controller.
///
/// The controller counts as not responding once `failure_threshold`
/// consecutive requests have failed. A single success resets the count.
///
/// # Examples
///
/// ```
/// use ws281x_bridge::DeviceHealth;
///
/// let health = DeviceHealth::new(3);
/// assert!(health.is_responding());
/// assert_eq!(health.consecutive_failures(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHealth {
    failure_threshold: u32,
    consecutive_failures: u32,
    last_error: Option<String>,
    last_success: Option<DateTime<Utc>>,
    last_failure: Option<DateTime<Utc>>,
}

/// A change in reachability caused by recording an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HealthTransition {
    /// The controller answered after being marked not responding.
    Recovered,
    /// The failure threshold was just reached.
    Lost,
}

impl DeviceHealth {
    /// Default number of consecutive failures before the controller is
    /// considered not responding.
    pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

    /// Creates a fresh record. A threshold of 0 is treated as 1.
    #[must_use]
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            consecutive_failures: 0,
            last_error: None,
            last_success: None,
            last_failure: None,
        }
    }

    /// Returns `true` while fewer than `failure_threshold` consecutive
    /// requests have failed.
    #[must_use]
    pub fn is_responding(&self) -> bool {
        self.consecutive_failures < self.failure_threshold
    }

    /// Returns the number of consecutive failed requests.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns the configured failure threshold.
    #[must_use]
    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Returns the message of the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns when the controller last answered successfully.
    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    /// Returns when a request last failed.
    #[must_use]
    pub fn last_failure(&self) -> Option<DateTime<Utc>> {
        self.last_failure
    }

    pub(crate) fn record_success(&mut self) -> Option<HealthTransition> {
        let was_responding = self.is_responding();
        self.consecutive_failures = 0;
        self.last_success = Some(Utc::now());
        (!was_responding).then_some(HealthTransition::Recovered)
    }

    pub(crate) fn record_failure(&mut self, error: &str) -> Option<HealthTransition> {
        let was_responding = self.is_responding();
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.to_string());
        self.last_failure = Some(Utc::now());
        (was_responding && !self.is_responding()).then_some(HealthTransition::Lost)
    }
}

impl Default for DeviceHealth {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAILURE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_crossing_reports_lost_once() {
        let mut health = DeviceHealth::new(2);
        assert_eq!(health.record_failure("refused"), None);
        assert!(health.is_responding());
        assert_eq!(health.record_failure("refused"), Some(HealthTransition::Lost));
        assert!(!health.is_responding());
        assert_eq!(health.record_failure("refused"), None);
        assert_eq!(health.consecutive_failures(), 3);
        assert_eq!(health.last_error(), Some("refused"));
        assert!(health.last_failure().is_some());
    }

    #[test]
    fn success_recovers() {
        let mut health = DeviceHealth::new(1);
        assert_eq!(health.record_failure("timeout"), Some(HealthTransition::Lost));
        assert_eq!(health.record_success(), Some(HealthTransition::Recovered));
        assert!(health.is_responding());
        assert_eq!(health.consecutive_failures(), 0);
        assert!(health.last_success().is_some());
        // The last error is kept for diagnostics.
        assert_eq!(health.last_error(), Some("timeout"));
    }

    #[test]
    fn success_while_responding_is_not_a_transition() {
        let mut health = DeviceHealth::default();
        health.record_failure("HTTP 500");
        assert_eq!(health.record_success(), None);
    }

    #[test]
    fn zero_threshold_is_clamped() {
        let health = DeviceHealth::new(0);
        assert_eq!(health.failure_threshold(), 1);
    }
}
