//! Configuration module for waypoint-stepper.
//!
//! Provides types for loading and validating axis configurations
//! from TOML files (with `std` feature) or pre-parsed data.

mod axis;
#[cfg(feature = "std")]
mod loader;
mod system;
pub mod units;
mod validation;

pub use axis::{AxisConfig, MicrostepMode};
pub use system::SystemConfig;
pub use validation::{validate_axis, validate_config, MIN_STEP_INTERVAL_US};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{MetersPerSec, MetersPerSecSquared, Micros};
