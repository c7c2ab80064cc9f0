//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{mm_to_m, MetersPerSec, MetersPerSecSquared, Micros};

/// Microstepping mode selected through the driver's mode lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicrostepMode {
    /// Full steps.
    #[default]
    Full,
    /// Half steps.
    Half,
    /// Quarter steps.
    Quarter,
    /// Eighth steps.
    Eighth,
}

impl MicrostepMode {
    /// Logic levels of the (M1, M2) mode-select lines.
    #[inline]
    pub const fn mode_lines(self) -> (bool, bool) {
        match self {
            MicrostepMode::Full => (false, false),
            MicrostepMode::Half => (true, false),
            MicrostepMode::Quarter => (false, true),
            MicrostepMode::Eighth => (true, true),
        }
    }
}

/// Complete configuration of one linear stepper axis.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Linear travel of a single step pulse, in millimeters.
    pub distance_per_step_mm: i32,

    /// Maximum linear acceleration.
    #[serde(rename = "max_acceleration_m_per_s2")]
    pub max_acceleration: MetersPerSecSquared,

    /// Maximum linear velocity.
    #[serde(rename = "max_velocity_m_per_s")]
    pub max_velocity: MetersPerSec,

    /// Microstepping mode applied at init.
    #[serde(default)]
    pub microstep_mode: MicrostepMode,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

impl AxisConfig {
    /// Create an axis configuration with full stepping and normal direction logic.
    pub fn new(
        name: &str,
        distance_per_step_mm: i32,
        max_acceleration: MetersPerSecSquared,
        max_velocity: MetersPerSec,
    ) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            distance_per_step_mm,
            max_acceleration,
            max_velocity,
            microstep_mode: MicrostepMode::Full,
            invert_direction: false,
        }
    }

    /// Step interval when cruising at max velocity, in microseconds (not rounded).
    pub fn cruise_interval_us(&self) -> f64 {
        mm_to_m(self.distance_per_step_mm) / self.max_velocity.0 * 1_000_000.0
    }

    /// Shortest step interval the sequencer will ever schedule.
    pub fn min_step_interval(&self) -> Micros {
        Micros::from_secs_ceil(mm_to_m(self.distance_per_step_mm) / self.max_velocity.0)
    }

    /// Check this axis. See [`validate_axis`](super::validate_axis).
    pub fn validate(&self) -> crate::error::Result<()> {
        super::validate_axis(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_step_interval() {
        let config = AxisConfig::new(
            "test",
            1,
            MetersPerSecSquared(0.001),
            MetersPerSec(0.01),
        );

        // 1 mm at 10 mm/s
        assert_eq!(config.min_step_interval(), Micros(100_000));
        assert!((config.cruise_interval_us() - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_mode_lines() {
        assert_eq!(MicrostepMode::default().mode_lines(), (false, false));
        assert_eq!(MicrostepMode::Half.mode_lines(), (true, false));
        assert_eq!(MicrostepMode::Quarter.mode_lines(), (false, true));
        assert_eq!(MicrostepMode::Eighth.mode_lines(), (true, true));
    }
}
