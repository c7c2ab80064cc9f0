//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{AxisConfig, SystemConfig};

/// Shortest step interval the sequencer accepts, in microseconds.
///
/// Shorter intervals leave too little integer resolution for the
/// deceleration solver to converge on the target.
pub const MIN_STEP_INTERVAL_US: u32 = 100;

/// Validate a system configuration.
///
/// Checks every axis:
/// - Distance per step is positive
/// - Max velocity and acceleration are positive and finite
/// - The cruise step interval fits the timer resolution
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, axis) in config.axes.iter() {
        validate_axis(axis)?;
    }

    Ok(())
}

/// Validate a single axis configuration.
pub fn validate_axis(config: &AxisConfig) -> Result<()> {
    if config.distance_per_step_mm <= 0 {
        return Err(Error::Config(ConfigError::InvalidDistancePerStep(
            config.distance_per_step_mm,
        )));
    }

    let velocity = config.max_velocity.0;
    if !velocity.is_finite() || velocity <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxVelocity(velocity)));
    }

    let acceleration = config.max_acceleration.0;
    if !acceleration.is_finite() || acceleration <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxAcceleration(
            acceleration,
        )));
    }

    let interval_us = config.cruise_interval_us();
    if interval_us < MIN_STEP_INTERVAL_US as f64 || interval_us > u32::MAX as f64 {
        return Err(Error::Config(ConfigError::StepIntervalOutOfRange {
            interval_us,
            min_us: MIN_STEP_INTERVAL_US,
        }));
    }

    Ok(())
}
