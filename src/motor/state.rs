//! Driver type-state markers.
//!
//! A driver starts [`Unconfigured`]; only `init()` turns it [`Ready`], so
//! motion cannot be commanded before the lines and the timer are set up.

/// Pins and timer not yet initialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

/// Lines driven to known levels, timer running.
#[derive(Debug, Clone, Copy)]
pub struct Ready;

/// Trait for driver states.
pub trait DriverState: private::Sealed {}

impl DriverState for Unconfigured {}
impl DriverState for Ready {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Unconfigured {}
    impl Sealed for super::Ready {}
}

/// State name for display/debugging.
pub trait StateName {
    /// Get the state name as a static string.
    fn name() -> &'static str;
}

impl StateName for Unconfigured {
    fn name() -> &'static str {
        "Unconfigured"
    }
}

impl StateName for Ready {
    fn name() -> &'static str {
        "Ready"
    }
}
