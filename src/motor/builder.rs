//! Builder pattern for StepperDriver.

use embedded_hal::digital::OutputPin;

use crate::config::{validate_axis, AxisConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::path::{OnArrival, DEFAULT_PATH_CAPACITY};

use super::controller::MotionController;
use super::driver::StepperDriver;
use super::pins::ModePins;
use super::state::Unconfigured;
use super::timer::AlarmTimer;

/// Builder for creating StepperDriver instances.
pub struct StepperDriverBuilder<STEP, DIR, STBY, MODE, T, C, const N: usize = DEFAULT_PATH_CAPACITY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    standby_pin: Option<STBY>,
    mode_pins: Option<MODE>,
    timer: Option<T>,
    axis: Option<AxisConfig>,
    _callback: core::marker::PhantomData<C>,
}

impl<STEP, DIR, STBY, MODE, T, C, const N: usize> Default for StepperDriverBuilder<STEP, DIR, STBY, MODE, T, C, N>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
    C: OnArrival,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, STBY, MODE, T, C, const N: usize> StepperDriverBuilder<STEP, DIR, STBY, MODE, T, C, N>
where
    STEP: OutputPin,
    DIR: OutputPin,
    STBY: OutputPin,
    MODE: ModePins,
    T: AlarmTimer,
    C: OnArrival,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            standby_pin: None,
            mode_pins: None,
            timer: None,
            axis: None,
            _callback: core::marker::PhantomData,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the standby/enable pin.
    pub fn standby_pin(mut self, pin: STBY) -> Self {
        self.standby_pin = Some(pin);
        self
    }

    /// Set the microstep mode-select lines; `()` when strapped in hardware.
    pub fn mode_pins(mut self, pins: MODE) -> Self {
        self.mode_pins = Some(pins);
        self
    }

    /// Set the alarm timer.
    pub fn timer(mut self, timer: T) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Configure from an AxisConfig.
    pub fn axis(mut self, config: &AxisConfig) -> Self {
        self.axis = Some(config.clone());
        self
    }

    /// Configure from SystemConfig by axis name.
    pub fn from_config(self, config: &SystemConfig, axis_name: &str) -> Result<Self> {
        let axis = config.require_axis(axis_name)?;
        Ok(self.axis(axis))
    }

    /// Build the StepperDriver.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the axis
    /// configuration is invalid.
    pub fn build(self) -> Result<StepperDriver<STEP, DIR, STBY, MODE, T, C, N, Unconfigured>> {
        let step_pin = self.step_pin.ok_or(missing("step_pin"))?;
        let dir_pin = self.dir_pin.ok_or(missing("dir_pin"))?;
        let standby_pin = self.standby_pin.ok_or(missing("standby_pin"))?;
        let mode_pins = self.mode_pins.ok_or(missing("mode_pins"))?;
        let timer = self.timer.ok_or(missing("timer"))?;
        let axis = self.axis.ok_or(missing("axis"))?;

        validate_axis(&axis)?;

        Ok(StepperDriver::new(
            step_pin,
            dir_pin,
            standby_pin,
            mode_pins,
            timer,
            MotionController::from_config(&axis),
            axis.name.clone(),
            axis.microstep_mode,
            axis.invert_direction,
        ))
    }
}

fn missing(field: &'static str) -> Error {
    Error::Config(ConfigError::MissingField(field))
}
