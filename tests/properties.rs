//! Property tests over the axis configuration space.

use std::cell::Cell;

use proptest::prelude::*;

use waypoint_stepper::config::validate_axis;
use waypoint_stepper::{
    AxisConfig, MetersPerSec, MetersPerSecSquared, MotionController, MotionPhase, StepKinematics,
    Waypoint, WaypointKey,
};

/// Valid axes: the cruise step interval fits the timer resolution.
fn axis() -> impl Strategy<Value = AxisConfig> {
    (1i32..=5, 0.0005f64..0.5, 0.002f64..0.5)
        .prop_map(|(step, acc, vel)| {
            AxisConfig::new("prop", step, MetersPerSecSquared(acc), MetersPerSec(vel))
        })
        .prop_filter("cruise interval below timer resolution", |c| {
            validate_axis(c).is_ok()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn acceleration_never_exceeds_max_velocity(config in axis()) {
        let kin = StepKinematics::from_config(&config);
        let mut velocity = 0.0;

        for _ in 0..5_000 {
            let timing = kin.next_interval_accelerating(velocity);
            prop_assert!(timing.velocity <= kin.max_velocity());
            prop_assert!(!timing.interval.is_zero());
            if timing.velocity == velocity {
                break;
            }
            velocity = timing.velocity;
        }
    }

    #[test]
    fn deceleration_intervals_never_repeat(config in axis()) {
        let kin = StepKinematics::from_config(&config);
        let mut interval = kin.cruise_interval();
        let mut velocity = kin.speed_for_interval(interval);

        while let Some(timing) = kin.next_interval_decelerating(velocity, interval) {
            prop_assert!(timing.interval > interval);
            interval = timing.interval;
            velocity = timing.velocity;
        }
    }

    #[test]
    fn single_waypoint_run_settles_at_target(
        config in axis(),
        steps in 3i32..1_500,
        backward in any::<bool>(),
    ) {
        let step = config.distance_per_step_mm;
        let target = if backward { -steps * step } else { steps * step };

        let hits = Cell::new(0);
        let record: &dyn Fn(i32) = &|_| hits.set(hits.get() + 1);
        let mut controller: MotionController<&dyn Fn(i32)> = MotionController::from_config(&config);
        let max_velocity = controller.kinematics().max_velocity();

        prop_assert!(controller
            .enqueue(Waypoint::with_callback(WaypointKey(0), target, record))
            .unwrap());

        controller.advance();
        let mut advances = 0;
        let mut last_interval = 0;
        while !controller.is_stopped() {
            prop_assert!(controller.velocity() <= max_velocity);
            if controller.phase() == MotionPhase::Decelerate {
                prop_assert!(controller.interval_us() != last_interval);
            }
            last_interval = controller.interval_us();

            controller.advance();
            advances += 1;
            prop_assert!(advances < 100_000, "axis never stopped");
        }

        prop_assert_eq!(controller.pending(), 0);
        prop_assert_eq!(controller.velocity(), 0.0);
        prop_assert!((controller.position() - target).abs() <= 2 * step);
        prop_assert_eq!(hits.get(), 1);
    }
}
