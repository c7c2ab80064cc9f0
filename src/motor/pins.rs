//! Output line helpers.

use embedded_hal::digital::{OutputPin, PinState};

use crate::config::MicrostepMode;
use crate::error::MotorError;

/// Drive `pin` to `high`, mapping any HAL error to [`MotorError::PinError`].
#[inline]
pub(crate) fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), MotorError> {
    pin.set_state(PinState::from(high))
        .map_err(|_| MotorError::PinError)
}

/// Microstep mode-select lines of a driver chip.
///
/// Implemented for `()` (mode strapped in hardware), `(M1,)` and `(M1, M2)`.
pub trait ModePins {
    /// Put the lines in the pattern for `mode`.
    ///
    /// # Errors
    ///
    /// `MotorError::UnsupportedMicrostep` when the mode needs a line that is
    /// not wired, `MotorError::PinError` when a write fails.
    fn apply(&mut self, mode: MicrostepMode) -> Result<(), MotorError>;
}

impl ModePins for () {
    fn apply(&mut self, _mode: MicrostepMode) -> Result<(), MotorError> {
        Ok(())
    }
}

impl<M1: OutputPin> ModePins for (M1,) {
    fn apply(&mut self, mode: MicrostepMode) -> Result<(), MotorError> {
        let (m1, m2) = mode.mode_lines();
        if m2 {
            return Err(MotorError::UnsupportedMicrostep(mode));
        }
        drive(&mut self.0, m1)
    }
}

impl<M1: OutputPin, M2: OutputPin> ModePins for (M1, M2) {
    fn apply(&mut self, mode: MicrostepMode) -> Result<(), MotorError> {
        let (m1, m2) = mode.mode_lines();
        drive(&mut self.0, m1)?;
        drive(&mut self.1, m2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_two_mode_lines() {
        let m1 = PinMock::new(&[Transaction::set(State::Low)]);
        let m2 = PinMock::new(&[Transaction::set(State::High)]);
        let mut lines = (m1, m2);

        lines.apply(MicrostepMode::Quarter).unwrap();

        lines.0.done();
        lines.1.done();
    }

    #[test]
    fn test_single_line_rejects_quarter() {
        let m1 = PinMock::new(&[Transaction::set(State::High)]);
        let mut lines = (m1,);

        assert_eq!(
            lines.apply(MicrostepMode::Eighth),
            Err(MotorError::UnsupportedMicrostep(MicrostepMode::Eighth))
        );
        lines.apply(MicrostepMode::Half).unwrap();

        lines.0.done();
    }

    #[test]
    fn test_strapped_mode() {
        assert!(().apply(MicrostepMode::Eighth).is_ok());
    }
}
