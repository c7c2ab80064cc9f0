//! Unit types for physical quantities.
//!
//! Positions and step distances are integer millimeters, step intervals are
//! integer microseconds. Kinematics run in floating-point meters and seconds;
//! the conversions between the two live here.

use core::ops::Mul;

use serde::Deserialize;

/// Linear velocity in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSec(pub f64);

impl MetersPerSec {
    /// Create a new MetersPerSec value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Mul<f64> for MetersPerSec {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Linear acceleration in meters per second squared.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecSquared(pub f64);

impl MetersPerSecSquared {
    /// Create a new MetersPerSecSquared value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Time between two logical steps, in microseconds. Zero means stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Micros(pub u32);

impl Micros {
    /// The stopped interval.
    pub const ZERO: Self = Self(0);

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Check for the stopped interval.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert to seconds.
    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert seconds to microseconds, rounding half up.
    ///
    /// Negative and NaN inputs give zero; values past `u32::MAX` saturate.
    #[inline]
    pub fn from_secs(secs: f64) -> Self {
        Self((secs * 1_000_000.0 + 0.5) as u32)
    }

    /// Convert seconds to microseconds, rounding up.
    ///
    /// Float noise below a picosecond is ignored so exact values stay exact.
    #[inline]
    pub fn from_secs_ceil(secs: f64) -> Self {
        Self(libm::ceil(secs * 1_000_000.0 - 1e-6) as u32)
    }
}

/// Convert millimeters to meters.
#[inline]
pub fn mm_to_m(mm: i32) -> f64 {
    mm as f64 / 1000.0
}

/// Convert meters to millimeters, truncating toward zero.
#[inline]
pub fn m_to_mm(m: f64) -> i32 {
    (m * 1000.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_rounding() {
        assert_eq!(Micros::from_secs(0.1), Micros(100_000));
        assert_eq!(Micros::from_secs(0.000_000_4), Micros(0));
        assert_eq!(Micros::from_secs(0.000_000_5), Micros(1));
        assert_eq!(Micros::from_secs(-1.0), Micros::ZERO);
        assert_eq!(Micros::from_secs(f64::NAN), Micros::ZERO);
        assert_eq!(Micros::from_secs(f64::INFINITY), Micros(u32::MAX));
    }

    #[test]
    fn test_micros_ceil() {
        assert_eq!(Micros::from_secs_ceil(0.000_100_2), Micros(101));
        assert_eq!(Micros::from_secs_ceil(0.000_1), Micros(100));
    }

    #[test]
    fn test_distance_conversion() {
        assert!((mm_to_m(1) - 0.001).abs() < 1e-12);
        assert_eq!(m_to_mm(0.0509), 50);
        assert_eq!(m_to_mm(-0.0509), -50);
    }
}
