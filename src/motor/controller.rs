//! Hardware-free motion state machine and step sequencer.
//!
//! [`MotionController`] owns everything needed to turn a waypoint path into
//! step timings: the axis kinematics, the motion state and the path itself.
//! It never touches a pin; [`StepperDriver`](super::StepperDriver) wraps it
//! with the pin and timer protocol.

use crate::config::units::Micros;
use crate::config::AxisConfig;
use crate::error::Result;
use crate::log::{log_debug, log_error, log_trace, log_warn};
use crate::motion::{planner, Direction, MotionPhase, MotionSnapshot, StepKinematics, StepTiming};
use crate::path::{OnArrival, PathQueue, Waypoint, DEFAULT_PATH_CAPACITY};

/// Motion state and path of one axis.
///
/// Call [`advance`](Self::advance) once per logical step. Between calls the
/// controller is idle; it never reads a clock.
pub struct MotionController<C, const N: usize = DEFAULT_PATH_CAPACITY> {
    kinematics: StepKinematics,
    phase: MotionPhase,
    interval: Micros,
    velocity: f64,
    direction: Direction,
    position: i32,
    path: PathQueue<C, N>,
}

impl<C: OnArrival, const N: usize> MotionController<C, N> {
    /// Create a stopped controller at position zero.
    pub fn new(kinematics: StepKinematics) -> Self {
        Self {
            kinematics,
            phase: MotionPhase::Stop,
            interval: Micros::ZERO,
            velocity: 0.0,
            direction: Direction::Forward,
            position: 0,
            path: PathQueue::new(),
        }
    }

    /// Create a stopped controller for an axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self::new(StepKinematics::from_config(config))
    }

    /// Append a waypoint to the path.
    ///
    /// Returns `true` when the axis is stopped with nothing else queued, in
    /// which case the caller has to run [`advance`](Self::advance) once to
    /// start moving. Otherwise the running sequence picks the waypoint up.
    ///
    /// # Errors
    ///
    /// Returns `PathError::AlreadyQueued` or `PathError::QueueFull`; the path
    /// is unchanged.
    pub fn enqueue(&mut self, waypoint: Waypoint<C>) -> Result<bool> {
        let was_empty = self.path.is_empty();
        if let Err(e) = self.path.push(waypoint) {
            log_warn!("waypoint rejected, {} pending", self.path.len());
            return Err(e.into());
        }

        log_debug!("waypoint queued, {} pending", self.path.len());

        Ok(was_empty && self.interval.is_zero())
    }

    /// Overwrite the current position, e.g. after restoring it from storage.
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
    }

    /// Take back the waypoint queued last, e.g. when the start it asked for
    /// could not be scheduled.
    pub fn withdraw_last(&mut self) -> Option<Waypoint<C>> {
        self.path.pop_back()
    }

    /// Abandon the path.
    ///
    /// Pending callbacks are dropped without firing. A moving axis performs
    /// an emergency stop on its next step.
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Complete the step in flight and plan the next one.
    ///
    /// Repeats while the axis is stopped and waypoints remain, so a single
    /// call either leaves a step scheduled or an empty path behind.
    pub fn advance(&mut self) {
        let step = self.kinematics.distance_per_step();

        loop {
            if !self.interval.is_zero() {
                self.position = self.position.saturating_add(self.direction.sign() * step);
            }

            if self.path.is_empty() {
                if !self.phase.is_stop() {
                    log_error!("path exhausted while moving, emergency stop at {}", self.position);
                    self.halt();
                }
                return;
            }

            let reached = self.path.head().map(Waypoint::position) == Some(self.position);
            if reached {
                if self.path.pop_on_arrival() {
                    log_debug!("waypoint {} reached", self.position);
                } else {
                    log_debug!("last waypoint {} reached", self.position);
                }
            }

            let Some(target) = self.path.head().map(Waypoint::position) else {
                return;
            };

            if self.interval.is_zero() {
                self.direction = Direction::towards(self.position, target);
            }

            let following = self.path.following().map(Waypoint::position);
            self.phase = planner::plan(&self.kinematics, &self.snapshot(), target, following);

            let timing = self.next_timing();
            if !timing.interval.is_zero() || reached {
                self.interval = timing.interval;
                self.velocity = timing.velocity;
            } else if self.direction.continues(self.position, target) {
                // Too fast to solve the braking step yet; stretch the interval.
                self.interval = Micros(self.interval.0.saturating_add(1));
                self.velocity = self.kinematics.speed_for_interval(self.interval);
            } else {
                self.interval = Micros::ZERO;
                self.velocity = 0.0;
            }

            log_trace!(
                "pos={} phase={:?} interval={} v={}",
                self.position,
                self.phase,
                self.interval.0,
                self.velocity
            );

            if self.phase.is_stop() {
                log_debug!("stopped at {}", self.position);
                self.halt();
                self.path.pop();
            }

            if !self.interval.is_zero() {
                return;
            }
        }
    }

    fn next_timing(&self) -> StepTiming {
        match self.phase {
            MotionPhase::Accelerate => self.kinematics.next_interval_accelerating(self.velocity),
            MotionPhase::Move => self.kinematics.next_interval_linear(self.velocity),
            MotionPhase::Decelerate => self
                .kinematics
                .next_interval_decelerating(self.velocity, self.interval)
                .unwrap_or(StepTiming::STOPPED),
            MotionPhase::Stop => StepTiming::STOPPED,
        }
    }

    /// Drop to STOP without touching the path or the position.
    pub(crate) fn halt(&mut self) {
        self.phase = MotionPhase::Stop;
        self.interval = Micros::ZERO;
        self.velocity = 0.0;
    }

    fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            position: self.position,
            direction: self.direction,
            velocity: self.velocity,
            moving: !self.interval.is_zero(),
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Time until the next step, zero when stopped.
    #[inline]
    pub fn interval_us(&self) -> u32 {
        self.interval.0
    }

    /// Current velocity in m/s.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Direction of travel.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current absolute position in millimeters.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Number of waypoints still queued, including the active one.
    #[inline]
    pub fn pending(&self) -> usize {
        self.path.len()
    }

    /// Position of the active waypoint.
    #[inline]
    pub fn target(&self) -> Option<i32> {
        self.path.head().map(Waypoint::position)
    }

    /// Check whether no step is scheduled.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.interval.is_zero()
    }

    /// Kinematic model of the axis.
    #[inline]
    pub fn kinematics(&self) -> &StepKinematics {
        &self.kinematics
    }
}
