//! Per-step kinematic model.
//!
//! Every function answers one question: given the velocity reached on the
//! previous step, how long should the next step take, and what velocity does
//! that imply? Distances are integer millimeters and intervals integer
//! microseconds at the boundary; the math in between is `f64` meters and seconds.

use libm::sqrt;

use crate::config::units::{m_to_mm, mm_to_m, MetersPerSec, MetersPerSecSquared, Micros};
use crate::config::AxisConfig;

/// Interval and resulting velocity of one logical step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTiming {
    /// Time until the next step.
    pub interval: Micros,
    /// Velocity reached at the end of the step, in m/s.
    pub velocity: f64,
}

impl StepTiming {
    /// No step scheduled.
    pub const STOPPED: Self = Self {
        interval: Micros::ZERO,
        velocity: 0.0,
    };
}

/// Kinematic limits of one axis, derived once from its configuration.
#[derive(Debug, Clone)]
pub struct StepKinematics {
    /// Travel per step in millimeters.
    distance_per_step: i32,

    /// Travel per step in meters.
    distance_m: f64,

    /// Maximum acceleration in m/s².
    max_acceleration: f64,

    /// Maximum velocity in m/s.
    max_velocity: f64,

    /// Step interval when cruising at max velocity.
    cruise_interval: Micros,
}

impl StepKinematics {
    /// Build the kinematic model for an axis.
    pub fn new(
        distance_per_step_mm: i32,
        max_acceleration: MetersPerSecSquared,
        max_velocity: MetersPerSec,
    ) -> Self {
        let distance_m = mm_to_m(distance_per_step_mm);
        let mut cruise_interval = Micros::from_secs_ceil(distance_m / max_velocity.0);
        if distance_m / cruise_interval.as_secs() > max_velocity.0 {
            cruise_interval = Micros(cruise_interval.0.saturating_add(1));
        }

        Self {
            distance_per_step: distance_per_step_mm,
            distance_m,
            max_acceleration: max_acceleration.0,
            max_velocity: max_velocity.0,
            cruise_interval,
        }
    }

    /// Build the kinematic model from an axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self::new(
            config.distance_per_step_mm,
            config.max_acceleration,
            config.max_velocity,
        )
    }

    /// Travel per step in millimeters.
    #[inline]
    pub fn distance_per_step(&self) -> i32 {
        self.distance_per_step
    }

    /// Maximum acceleration in m/s².
    #[inline]
    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    /// Maximum velocity in m/s.
    #[inline]
    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    /// Shortest interval ever scheduled. Rounded up, so it never implies a
    /// velocity above the maximum.
    #[inline]
    pub fn cruise_interval(&self) -> Micros {
        self.cruise_interval
    }

    /// Average velocity when stepping once every `interval`. Zero when stopped.
    pub fn speed_for_interval(&self, interval: Micros) -> f64 {
        if interval.is_zero() {
            0.0
        } else {
            self.distance_m / interval.as_secs()
        }
    }

    /// Velocity at the end of a uniformly accelerated step of `interval_s`
    /// seconds that started at `v0`.
    pub fn accelerated_speed(&self, interval_s: f64, v0: f64) -> f64 {
        if interval_s == 0.0 {
            0.0
        } else {
            2.0 * (self.distance_m / interval_s - v0) + v0
        }
    }

    /// Next step while accelerating at the maximum rate.
    ///
    /// Solves `a·t²/2 + v0·t - d = 0` for the positive root, then clamps the
    /// result to the cruise interval if it would overshoot max velocity.
    pub fn next_interval_accelerating(&self, v0: f64) -> StepTiming {
        let a = self.max_acceleration;
        let delta = sqrt(v0 * v0 + 2.0 * a * self.distance_m);
        let interval = Micros::from_secs((delta - v0) / a);
        let velocity = self.accelerated_speed(interval.as_secs(), v0);

        if interval.is_zero() || velocity > self.max_velocity {
            return StepTiming {
                interval: self.cruise_interval,
                velocity: self.speed_for_interval(self.cruise_interval),
            };
        }

        StepTiming { interval, velocity }
    }

    /// Next step while decelerating at the maximum rate.
    ///
    /// Solves `-a·t²/2 + v0·t - d = 0`. Returns `None` while the velocity is
    /// too low for the discriminant to be solvable; the sequencer then
    /// stretches the interval itself. A result equal to `previous` is pushed
    /// one microsecond longer so deceleration always makes progress.
    pub fn next_interval_decelerating(&self, v0: f64, previous: Micros) -> Option<StepTiming> {
        let a = self.max_acceleration;
        let delta = v0 * v0 - 2.0 * a * self.distance_m;
        if delta < 0.0 {
            return None;
        }

        let mut interval = Micros::from_secs((v0 - sqrt(delta)) / a);
        let mut velocity = self.accelerated_speed(interval.as_secs(), v0);

        if interval == previous {
            interval = Micros(interval.0.saturating_add(1));
            velocity = self.speed_for_interval(interval);
        }

        Some(StepTiming { interval, velocity })
    }

    /// Next step while cruising at `v0`.
    ///
    /// Never shorter than the cruise interval. Cruising from rest is
    /// meaningless, so a zero velocity starts accelerating instead.
    pub fn next_interval_linear(&self, v0: f64) -> StepTiming {
        if v0 <= 0.0 {
            return self.next_interval_accelerating(0.0);
        }

        let interval = Micros::from_secs(self.distance_m / v0).max(self.cruise_interval);
        StepTiming {
            interval,
            velocity: self.speed_for_interval(interval),
        }
    }

    /// Distance needed to stop from `v0`, plus one step of margin, in millimeters.
    pub fn braking_distance(&self, v0: f64) -> i32 {
        m_to_mm(v0 * v0 / (2.0 * self.max_acceleration)).saturating_add(self.distance_per_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 mm steps, 1 mm/s² and 10 mm/s.
    fn slow_axis() -> StepKinematics {
        StepKinematics::new(1, MetersPerSecSquared(0.001), MetersPerSec(0.01))
    }

    #[test]
    fn test_speed_for_interval() {
        let kin = slow_axis();
        assert_eq!(kin.speed_for_interval(Micros::ZERO), 0.0);
        assert!((kin.speed_for_interval(Micros(100_000)) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_first_step_from_rest() {
        let kin = slow_axis();
        let timing = kin.next_interval_accelerating(0.0);

        // t = sqrt(2d/a) = sqrt(2) s
        assert_eq!(timing.interval, Micros(1_414_214));
        assert!(timing.velocity > 0.0);
        assert!(timing.velocity <= kin.max_velocity());
    }

    #[test]
    fn test_acceleration_clamps_to_max_velocity() {
        let kin = slow_axis();
        let timing = kin.next_interval_accelerating(0.0099);

        assert_eq!(timing.interval, kin.cruise_interval());
        assert!(timing.velocity <= kin.max_velocity());
    }

    #[test]
    fn test_acceleration_from_zero_never_exceeds_max_velocity() {
        let kin = slow_axis();
        let mut velocity = 0.0;

        for _ in 0..200 {
            let before = velocity;
            let timing = kin.next_interval_accelerating(velocity);
            velocity = timing.velocity;
            assert!(velocity <= kin.max_velocity());
            assert!(velocity >= before);
        }
        assert_eq!(velocity, kin.max_velocity());
    }

    /// Realized acceleration is the closest one microsecond of resolution allows.
    #[test]
    fn test_acceleration_is_best_approximation() {
        let kin = slow_axis();
        let a = kin.max_acceleration();
        let mut timing = StepTiming::STOPPED;

        loop {
            let before = timing.velocity;
            timing = kin.next_interval_accelerating(before);
            if timing.velocity == before {
                break;
            }

            let secs = timing.interval.as_secs();
            let acc = (timing.velocity - before) / secs;
            let neighbour = if acc > a {
                timing.interval.0 + 1
            } else if timing.velocity != kin.max_velocity() {
                timing.interval.0 - 1
            } else {
                break;
            };
            let t2 = Micros(neighbour).as_secs();
            let acc2 = (kin.accelerated_speed(t2, before) - before) / t2;
            if acc2 != 0.0 {
                assert!((acc - a).abs() < (a - acc2).abs());
            }
        }
    }

    #[test]
    fn test_deceleration_is_best_approximation() {
        let kin = slow_axis();
        let a = kin.max_acceleration();
        let mut interval = Micros::from_secs(0.100564);
        let mut velocity = kin.speed_for_interval(interval);

        while let Some(timing) = kin.next_interval_decelerating(velocity, interval) {
            let before = velocity;
            interval = timing.interval;
            velocity = timing.velocity;
            assert!(velocity < kin.max_velocity());

            let dcc = -(velocity - before) / interval.as_secs();
            let neighbour = if dcc > a { interval.0 - 1 } else { interval.0 + 1 };
            let t2 = Micros(neighbour).as_secs();
            let dcc2 = -(kin.accelerated_speed(t2, before) - before) / t2;
            if dcc2 != 0.0 {
                assert!((dcc - a).abs() < (a - dcc2).abs());
            }
        }
    }

    #[test]
    fn test_deceleration_never_repeats_interval() {
        let kin = slow_axis();
        let mut interval = kin.cruise_interval();
        let mut velocity = kin.max_velocity();

        while let Some(timing) = kin.next_interval_decelerating(velocity, interval) {
            assert!(timing.interval > interval);
            interval = timing.interval;
            velocity = timing.velocity;
        }
    }

    #[test]
    fn test_deceleration_unsolvable_at_low_speed() {
        let kin = slow_axis();
        // v² < 2ad
        assert!(kin.next_interval_decelerating(0.001, Micros(1_000_000)).is_none());
    }

    #[test]
    fn test_linear_is_idempotent() {
        let kin = slow_axis();
        let mut interval = Micros::from_secs(0.11);

        while interval > kin.cruise_interval() {
            let velocity = kin.speed_for_interval(interval);
            let first = kin.next_interval_linear(velocity);
            assert_eq!(first.interval, interval);

            let second = kin.next_interval_linear(first.velocity);
            assert_eq!(second.interval, interval);

            interval = Micros(interval.0 - 97);
        }
    }

    #[test]
    fn test_linear_from_rest_accelerates() {
        let kin = slow_axis();
        assert_eq!(kin.next_interval_linear(0.0), kin.next_interval_accelerating(0.0));
    }

    #[test]
    fn test_braking_distance() {
        let kin = slow_axis();
        assert_eq!(kin.braking_distance(0.0), 1);
        // 0.01² / 0.002 = 0.05 m
        assert_eq!(kin.braking_distance(0.01), 51);
    }
}
