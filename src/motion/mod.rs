//! Motion module for waypoint-stepper.
//!
//! Provides the per-step kinematic model and the phase planner.

pub mod kinematics;
mod phase;
pub mod planner;

pub use kinematics::{StepKinematics, StepTiming};
pub use phase::{Direction, MotionPhase};
pub use planner::MotionSnapshot;
