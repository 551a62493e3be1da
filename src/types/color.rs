// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color components of the light.
//!
//! Hue and saturation are independent channels on the controller: the bridge
//! never converts between color models, it passes the raw HSV components
//! through.

use std::fmt;

use crate::error::ValueError;

/// Hue angle in degrees (0-359).
///
/// # Examples
///
/// ```
/// use ws281x_bridge::types::Hue;
///
/// let green = Hue::new(120).unwrap();
/// assert_eq!(green.degrees(), 120);
///
/// // 360 is a full turn and is rejected by `new`...
/// assert!(Hue::new(360).is_err());
/// // ...but wraps with `wrapping`.
/// assert_eq!(Hue::wrapping(360).degrees(), 0);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Hue(u16);

impl Hue {
    /// Exclusive upper bound of the hue range.
    pub const FULL_TURN: u16 = 360;

    /// Red (0°).
    pub const RED: Self = Self(0);

    /// Creates a new hue.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHue` if `degrees` is 360 or more.
    pub fn new(degrees: u16) -> Result<Self, ValueError> {
        if degrees >= Self::FULL_TURN {
            return Err(ValueError::InvalidHue(degrees));
        }
        Ok(Self(degrees))
    }

    /// Creates a hue, wrapping any angle into `0..360`.
    #[must_use]
    pub const fn wrapping(degrees: u16) -> Self {
        Self(degrees % Self::FULL_TURN)
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn degrees(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<u16> for Hue {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hue> for u16 {
    fn from(value: Hue) -> Self {
        value.0
    }
}

/// Color saturation as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use ws281x_bridge::types::Saturation;
///
/// let sat = Saturation::new(80).unwrap();
/// assert_eq!(sat.value(), 80);
/// assert!(Saturation::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Saturation(u8);

impl Saturation {
    /// No saturation (white).
    pub const MIN: Self = Self(0);

    /// Fully saturated color.
    pub const MAX: Self = Self(100);

    /// Creates a new saturation value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidSaturation` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::InvalidSaturation(value));
        }
        Ok(Self(value))
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Saturation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Saturation {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Saturation> for u8 {
    fn from(value: Saturation) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_valid_range() {
        assert_eq!(Hue::new(0).unwrap(), Hue::RED);
        assert_eq!(Hue::new(359).unwrap().degrees(), 359);
    }

    #[test]
    fn hue_rejects_full_turn() {
        assert_eq!(Hue::new(360).unwrap_err(), ValueError::InvalidHue(360));
        assert_eq!(Hue::new(400).unwrap_err(), ValueError::InvalidHue(400));
    }

    #[test]
    fn hue_wrapping() {
        assert_eq!(Hue::wrapping(360).degrees(), 0);
        assert_eq!(Hue::wrapping(480).degrees(), 120);
        assert_eq!(Hue::wrapping(42).degrees(), 42);
    }

    #[test]
    fn hue_display() {
        assert_eq!(Hue::new(120).unwrap().to_string(), "120°");
    }

    #[test]
    fn saturation_bounds() {
        assert_eq!(Saturation::new(100).unwrap(), Saturation::MAX);
        assert_eq!(
            Saturation::new(101).unwrap_err(),
            ValueError::InvalidSaturation(101)
        );
    }

    #[test]
    fn color_components_default_to_zero() {
        assert_eq!(Hue::default().degrees(), 0);
        assert_eq!(Saturation::default(), Saturation::MIN);
    }
}
