//! Phase planning.
//!
//! Picks the kinematic regime for the next step from the distance left to
//! the brake point of the active target.

use super::kinematics::StepKinematics;
use super::phase::{Direction, MotionPhase};

/// The parts of the motion state the planner looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSnapshot {
    /// Current absolute position in millimeters.
    pub position: i32,
    /// Direction of travel.
    pub direction: Direction,
    /// Current velocity in m/s.
    pub velocity: f64,
    /// Whether a step is currently scheduled.
    pub moving: bool,
}

/// Position at which deceleration toward `target` has to begin.
pub fn brake_point(kinematics: &StepKinematics, snapshot: &MotionSnapshot, target: i32) -> i32 {
    let margin = kinematics
        .distance_per_step()
        .saturating_add(kinematics.braking_distance(snapshot.velocity));

    match snapshot.direction {
        Direction::Forward => target.saturating_sub(margin),
        Direction::Backward => target.saturating_add(margin),
    }
}

/// Phase for approaching `target` and stopping there.
pub fn next_phase(kinematics: &StepKinematics, snapshot: &MotionSnapshot, target: i32) -> MotionPhase {
    let brake = brake_point(kinematics, snapshot, target);
    let step = kinematics.distance_per_step();
    let position = snapshot.position;

    let (before_brake, room_to_accelerate) = match snapshot.direction {
        Direction::Forward => (position < brake, position < brake.saturating_sub(step)),
        Direction::Backward => (position > brake, position > brake.saturating_add(step)),
    };

    if before_brake {
        if room_to_accelerate {
            MotionPhase::Accelerate
        } else {
            MotionPhase::Move
        }
    } else if snapshot.moving {
        MotionPhase::Decelerate
    } else {
        MotionPhase::Stop
    }
}

/// Phase for the head of the path, looking one waypoint ahead.
///
/// When the waypoint after `head` lies further along the current direction,
/// the axis passes through `head` and only brakes for the one after it.
pub fn plan(
    kinematics: &StepKinematics,
    snapshot: &MotionSnapshot,
    head: i32,
    following: Option<i32>,
) -> MotionPhase {
    match following {
        Some(next) if snapshot.direction.continues(head, next) => {
            next_phase(kinematics, snapshot, next)
        }
        _ => next_phase(kinematics, snapshot, head),
    }
}
