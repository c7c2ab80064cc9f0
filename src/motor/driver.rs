//! Stepper driver.
//!
//! Generic over embedded-hal 1.0 pin types and an [`AlarmTimer`], with
//! type-state safety for initialization.

use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::MicrostepMode;
use crate::error::{Error, MotorError, Result};
use crate::log::{log_debug, log_error};
use crate::motion::{Direction, MotionPhase};
use crate::path::{OnArrival, Waypoint, DEFAULT_PATH_CAPACITY};

use super::controller::MotionController;
use super::pins::{drive, ModePins};
use super::state::{DriverState, Ready, StateName, Unconfigured};
use super::timer::{AlarmTimer, DelayAlarm, TickSignal};

/// Stepper driver with type-state safety.
///
/// Generic over:
/// - `STEP`, `DIR`, `STBY`: step, direction and standby outputs
/// - `MODE`: microstep mode-select lines, see [`ModePins`]
/// - `T`: one-shot alarm pacing the steps
/// - `C`: waypoint arrival callback type
/// - `N`: path capacity
/// - `STATE`: type-state marker
pub struct StepperDriver<
    STEP,
    DIR,
    STBY,
    MODE,
    T,
    C,
    const N: usize = DEFAULT_PATH_CAPACITY,
    STATE = Ready,
> where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
    STATE: DriverState,
{
    /// STEP output, toggled once per tick while moving.
    step_pin: STEP,

    /// DIR output (high = forward, unless inverted).
    dir_pin: DIR,

    /// Standby output, high while a step is scheduled.
    standby_pin: STBY,

    /// Microstep mode-select lines.
    mode_pins: MODE,

    /// Alarm pacing the ticks.
    timer: T,

    /// Motion state and path.
    controller: MotionController<C, N>,

    /// Axis name for logging/debugging.
    name: heapless::String<32>,

    /// Microstep mode applied at init.
    microstep_mode: MicrostepMode,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Direction currently on the DIR line (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// STEP line level; a logical step spans two ticks.
    half_step: bool,

    /// Type-state marker.
    _state: PhantomData<STATE>,
}

impl<STEP, DIR, STBY, MODE, T, C, const N: usize, STATE> StepperDriver<STEP, DIR, STBY, MODE, T, C, N, STATE>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
    C: OnArrival,
    STATE: DriverState + StateName,
{
    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the current state name.
    #[inline]
    pub fn state_name(&self) -> &'static str {
        STATE::name()
    }

    /// Get the microstep mode.
    #[inline]
    pub fn microstep_mode(&self) -> MicrostepMode {
        self.microstep_mode
    }

    /// Motion state and path.
    #[inline]
    pub fn controller(&self) -> &MotionController<C, N> {
        &self.controller
    }

    /// Current absolute position in millimeters.
    #[inline]
    pub fn position(&self) -> i32 {
        self.controller.position()
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.controller.phase()
    }

    /// Check whether no step is scheduled.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.controller.is_stopped()
    }

    /// Overwrite the current position, e.g. after restoring it from storage.
    pub fn set_position(&mut self, position: i32) {
        self.controller.set_position(position);
    }

    /// Release the pins and the timer.
    pub fn release(self) -> (STEP, DIR, STBY, MODE, T) {
        (
            self.step_pin,
            self.dir_pin,
            self.standby_pin,
            self.mode_pins,
            self.timer,
        )
    }
}

impl<STEP, DIR, STBY, MODE, T, C, const N: usize> StepperDriver<STEP, DIR, STBY, MODE, T, C, N, Unconfigured>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
    C: OnArrival,
{
    /// Create an uninitialized driver.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        standby_pin: STBY,
        mode_pins: MODE,
        timer: T,
        controller: MotionController<C, N>,
        name: heapless::String<32>,
        microstep_mode: MicrostepMode,
        invert_direction: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            standby_pin,
            mode_pins,
            timer,
            controller,
            name,
            microstep_mode,
            invert_direction,
            current_direction: None,
            half_step: false,
            _state: PhantomData,
        }
    }

    /// Drive every line to a known level and start the timer.
    ///
    /// STEP goes low, DIR is set for forward travel, the mode lines select
    /// the configured microstep mode and the chip enters standby.
    ///
    /// # Errors
    ///
    /// Returns the driver unchanged in type with `MotorError::PinError`,
    /// `MotorError::UnsupportedMicrostep` or `MotorError::TimerNotReady`.
    pub fn init(
        mut self,
    ) -> core::result::Result<StepperDriver<STEP, DIR, STBY, MODE, T, C, N, Ready>, (Self, Error)> {
        if let Err(e) = self.configure_lines() {
            log_error!("{}: line setup failed", self.name.as_str());
            return Err((self, e.into()));
        }

        if self.timer.start().is_err() {
            log_error!("{}: timer not ready", self.name.as_str());
            return Err((self, MotorError::TimerNotReady.into()));
        }

        log_debug!("{}: driver initialized", self.name.as_str());

        Ok(StepperDriver {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            standby_pin: self.standby_pin,
            mode_pins: self.mode_pins,
            timer: self.timer,
            controller: self.controller,
            name: self.name,
            microstep_mode: self.microstep_mode,
            invert_direction: self.invert_direction,
            current_direction: self.current_direction,
            half_step: false,
            _state: PhantomData,
        })
    }

    fn configure_lines(&mut self) -> core::result::Result<(), MotorError> {
        drive(&mut self.step_pin, false)?;
        drive(&mut self.dir_pin, !self.invert_direction)?;
        self.current_direction = Some(Direction::Forward);
        self.mode_pins.apply(self.microstep_mode)?;
        drive(&mut self.standby_pin, false)
    }
}

impl<STEP, DIR, STBY, MODE, T, C, const N: usize> StepperDriver<STEP, DIR, STBY, MODE, T, C, N, Ready>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
    C: OnArrival,
{
    /// Append a waypoint, starting the timer if the axis was idle.
    ///
    /// # Errors
    ///
    /// `PathError::AlreadyQueued` / `PathError::QueueFull` leave the path
    /// unchanged. `MotorError::TimerError` if the start could not be
    /// scheduled; the waypoint is taken back out of the path, so the same
    /// call can simply be retried.
    pub fn enqueue(&mut self, waypoint: Waypoint<C>) -> Result<()> {
        if self.controller.enqueue(waypoint)? && self.timer.schedule_now().is_err() {
            self.controller.withdraw_last();
            log_error!("{}: start not scheduled, waypoint withdrawn", self.name.as_str());
            return Err(MotorError::TimerError.into());
        }
        Ok(())
    }

    /// Restart a path left pending by a failed tick.
    ///
    /// Returns whether the timer was kicked. Does nothing while moving or
    /// when the path is empty.
    pub fn resume(&mut self) -> Result<bool> {
        if !self.controller.is_stopped() || self.controller.pending() == 0 {
            return Ok(false);
        }
        self.timer
            .schedule_now()
            .map_err(|_| MotorError::TimerError)?;
        Ok(true)
    }

    /// Abandon the path. A moving axis performs an emergency stop on its next step.
    pub fn clear_path(&mut self) {
        self.controller.clear_path();
    }

    /// Handle one alarm expiry.
    ///
    /// Each tick toggles STEP, so a logical step spans two ticks and the
    /// controller advances on every rising edge. DIR carries the direction
    /// of the step being completed at its rising edge; a reversal is written
    /// on the following falling edge. The alarm is re-armed for the current
    /// interval while moving; once stopped, STEP and standby go low and the
    /// alarm is left idle until the next [`enqueue`](Self::enqueue).
    ///
    /// The tick that stops the axis raises and lowers STEP within the same
    /// call, so the last pulse is only two pin writes wide. Driver chips with
    /// a longer minimum STEP high time need the pin writes slowed down by
    /// the `OutputPin` implementation.
    ///
    /// Must not be called from interrupt context; see [`service`](Self::service).
    ///
    /// # Errors
    ///
    /// `MotorError::PinError` or `MotorError::TimerError`. The axis is then
    /// halted with STEP and standby driven low (best effort) and the path
    /// kept; [`resume`](Self::resume) restarts it.
    pub fn on_tick(&mut self) -> Result<()> {
        let stepped = if self.controller.is_stopped() {
            self.controller.advance();
            Ok(())
        } else {
            self.toggle_step()
        };

        if let Err(e) = stepped.and_then(|()| self.reschedule()) {
            self.fault();
            return Err(e.into());
        }
        Ok(())
    }

    /// Run one pending tick, if the alarm interrupt signalled one.
    ///
    /// Returns whether a tick was run.
    pub fn service(&mut self, signal: &TickSignal) -> Result<bool> {
        if !signal.take() {
            return Ok(false);
        }
        self.on_tick()?;
        Ok(true)
    }

    fn toggle_step(&mut self) -> core::result::Result<(), MotorError> {
        if self.half_step {
            drive(&mut self.step_pin, false)?;
            self.half_step = false;
            return self.write_direction(self.controller.direction());
        }

        // The edge below is the step `advance` counts.
        let stepping = self.controller.direction();
        self.controller.advance();
        self.write_direction(stepping)?;
        drive(&mut self.step_pin, true)?;
        self.half_step = true;
        Ok(())
    }

    fn write_direction(&mut self, direction: Direction) -> core::result::Result<(), MotorError> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        drive(&mut self.dir_pin, direction.is_forward() != self.invert_direction)?;
        self.current_direction = Some(direction);
        Ok(())
    }

    fn reschedule(&mut self) -> core::result::Result<(), MotorError> {
        let interval_us = self.controller.interval_us();
        if interval_us > 0 {
            drive(&mut self.standby_pin, true)?;
            return self
                .timer
                .arm(interval_us)
                .map_err(|_| MotorError::TimerError);
        }

        if self.half_step {
            drive(&mut self.step_pin, false)?;
            self.half_step = false;
        }
        drive(&mut self.standby_pin, false)?;
        log_debug!("{}: timer loop stopped at {}", self.name.as_str(), self.controller.position());
        Ok(())
    }

    fn fault(&mut self) {
        log_error!("{}: tick failed, halted at {}", self.name.as_str(), self.controller.position());
        self.controller.halt();
        self.half_step = false;
        let _ = drive(&mut self.step_pin, false);
        let _ = drive(&mut self.standby_pin, false);
    }
}

impl<STEP, DIR, STBY, MODE, D, C, const N: usize> StepperDriver<STEP, DIR, STBY, MODE, DelayAlarm<D>, C, N, Ready>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    D: DelayNs,
    C: OnArrival,
{
    /// Block, ticking on the delay alarm, until the axis comes to rest.
    ///
    /// Returns the number of ticks run.
    pub fn run_until_idle(&mut self) -> Result<usize> {
        let mut ticks = 0;
        while self.timer.wait() {
            self.on_tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::{MetersPerSec, MetersPerSecSquared};
    use crate::config::AxisConfig;
    use crate::motor::StepperDriverBuilder;
    use crate::path::WaypointKey;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    fn axis() -> AxisConfig {
        AxisConfig::new("x", 1, MetersPerSecSquared(0.001), MetersPerSec(0.01))
    }

    type TestDriver = StepperDriver<PinMock, PinMock, PinMock, (), DelayAlarm<NoopDelay>, fn(i32), 4, Unconfigured>;

    #[test]
    fn test_init_sets_known_levels() {
        let mut step = PinMock::new(&[Transaction::set(State::Low)]);
        let mut dir = PinMock::new(&[Transaction::set(State::High)]);
        let mut standby = PinMock::new(&[Transaction::set(State::Low)]);

        let driver: TestDriver = StepperDriverBuilder::new()
            .axis(&axis())
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .standby_pin(standby.clone())
            .mode_pins(())
            .timer(DelayAlarm::new(NoopDelay::new()))
            .build()
            .unwrap();
        assert_eq!(driver.state_name(), "Unconfigured");

        let driver = driver.init().map_err(|(_, e)| e).unwrap();
        assert_eq!(driver.state_name(), "Ready");
        assert!(driver.is_stopped());

        step.done();
        dir.done();
        standby.done();
    }

    #[test]
    fn test_init_rejects_unwired_mode() {
        let mut step = PinMock::new(&[Transaction::set(State::Low)]);
        let mut dir = PinMock::new(&[Transaction::set(State::High)]);
        let mut standby = PinMock::new(&[]);
        let mut m1 = PinMock::new(&[]);

        let mut config = axis();
        config.microstep_mode = MicrostepMode::Quarter;

        let driver: StepperDriver<_, _, _, (PinMock,), DelayAlarm<NoopDelay>, fn(i32), 4, Unconfigured> =
            StepperDriverBuilder::new()
                .axis(&config)
                .step_pin(step.clone())
                .dir_pin(dir.clone())
                .standby_pin(standby.clone())
                .mode_pins((m1.clone(),))
                .timer(DelayAlarm::new(NoopDelay::new()))
                .build()
                .unwrap();

        let Err((driver, error)) = driver.init() else {
            panic!("init should fail");
        };
        assert_eq!(
            error,
            Error::Motor(MotorError::UnsupportedMicrostep(MicrostepMode::Quarter))
        );
        assert_eq!(driver.state_name(), "Unconfigured");

        step.done();
        dir.done();
        standby.done();
        m1.done();
    }

    #[test]
    fn test_enqueue_rejects_queued_key() {
        let mut step = PinMock::new(&[Transaction::set(State::Low)]);
        let mut dir = PinMock::new(&[Transaction::set(State::High)]);
        let mut standby = PinMock::new(&[Transaction::set(State::Low)]);

        let driver: TestDriver = StepperDriverBuilder::new()
            .axis(&axis())
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .standby_pin(standby.clone())
            .mode_pins(())
            .timer(DelayAlarm::new(NoopDelay::new()))
            .build()
            .unwrap();
        let mut driver = driver.init().map_err(|(_, e)| e).unwrap();

        driver.enqueue(Waypoint::new(WaypointKey(1), 10)).unwrap();
        assert_eq!(
            driver.enqueue(Waypoint::new(WaypointKey(1), 20)),
            Err(Error::Path(crate::error::PathError::AlreadyQueued(WaypointKey(1))))
        );
        assert_eq!(driver.controller().pending(), 1);

        step.done();
        dir.done();
        standby.done();
    }
}
