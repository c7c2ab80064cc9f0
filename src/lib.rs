//! # waypoint-stepper
//!
//! Waypoint trajectory generation for linear stepper axes, with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Waypoint paths**: Queue target positions; the axis visits them in order
//! - **Bounded kinematics**: Never exceeds the configured velocity and acceleration
//! - **Look-ahead**: No braking at pass-through waypoints
//! - **Arrival callbacks**: Any `FnOnce(i32)`, fired once per waypoint
//! - **no_std compatible**: Fixed-capacity storage, no allocator needed
//! - **Type-state safety**: Motion cannot be commanded before the driver is initialized
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use waypoint_stepper::{StepperDriverBuilder, TickSignal, Waypoint, WaypointKey};
//!
//! static TICK: TickSignal = TickSignal::new();
//!
//! // Load configuration from TOML
//! let config = waypoint_stepper::load_config("axes.toml")?;
//!
//! let mut axis = StepperDriverBuilder::new()
//!     .from_config(&config, "door")?
//!     .step_pin(step)
//!     .dir_pin(dir)
//!     .standby_pin(standby)
//!     .mode_pins((m1, m2))
//!     .timer(alarm) // its interrupt calls TICK.notify()
//!     .build()?
//!     .init()
//!     .map_err(|(_, e)| e)?;
//!
//! axis.enqueue(Waypoint::with_callback(WaypointKey(0), 120, |x| save_position(x)))?;
//!
//! loop {
//!     axis.service(&TICK)?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod path;

mod log;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisConfig, MicrostepMode, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionPhase, StepKinematics};
pub use motor::{
    state, AlarmTimer, DelayAlarm, MotionController, SharedStepper, StepperDriver,
    StepperDriverBuilder, TickSignal,
};
pub use path::{OnArrival, Waypoint, WaypointKey};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{MetersPerSec, MetersPerSecSquared, Micros};
