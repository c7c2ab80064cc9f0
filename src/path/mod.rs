//! Waypoint path: targets to visit in order, each with an optional arrival callback.

mod queue;
mod waypoint;

pub use queue::{PathQueue, DEFAULT_PATH_CAPACITY};
pub use waypoint::{OnArrival, Waypoint, WaypointKey};
