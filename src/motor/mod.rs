//! Motor module for waypoint-stepper.
//!
//! Provides the hardware-free step sequencer and the pin/timer driver around it.

mod builder;
mod controller;
mod driver;
mod pins;
mod shared;
pub mod state;
mod timer;

pub use builder::StepperDriverBuilder;
pub use controller::MotionController;
pub use driver::StepperDriver;
pub use pins::ModePins;
pub use shared::SharedStepper;
pub use state::{DriverState, Ready, StateName, Unconfigured};
pub use timer::{AlarmTimer, DelayAlarm, TickSignal};
