//! Error types for waypoint-stepper.
//!
//! Provides unified error handling across configuration, driver hardware and path queueing.

use core::fmt;

use crate::config::MicrostepMode;
use crate::path::WaypointKey;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all waypoint-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Driver hardware error
    Motor(MotorError),
    /// Path queue error
    Path(PathError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Invalid distance per step (must be > 0)
    InvalidDistancePerStep(i32),
    /// Invalid max velocity (must be finite and > 0)
    InvalidMaxVelocity(f64),
    /// Invalid max acceleration (must be finite and > 0)
    InvalidMaxAcceleration(f64),
    /// Step interval at max velocity does not fit the timer resolution
    StepIntervalOutOfRange {
        /// Step interval at max velocity, in microseconds
        interval_us: f64,
        /// Shortest supported interval, in microseconds
        min_us: u32,
    },
    /// Required builder field was not set
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Driver hardware errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// GPIO pin operation failed
    PinError,
    /// Alarm timer could not be started
    TimerNotReady,
    /// Alarm timer rejected a request
    TimerError,
    /// Mode-select lines cannot express this microstep mode
    UnsupportedMicrostep(MicrostepMode),
}

/// Path queue errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// Waypoint with this key is already part of the pending path
    AlreadyQueued(WaypointKey),
    /// No room left in the path queue
    QueueFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Path(e) => write!(f, "Path error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::InvalidDistancePerStep(v) => {
                write!(f, "Invalid distance per step: {} mm. Must be > 0", v)
            }
            ConfigError::InvalidMaxVelocity(v) => write!(f, "Invalid max velocity: {}. Must be > 0", v),
            ConfigError::InvalidMaxAcceleration(v) => {
                write!(f, "Invalid max acceleration: {}. Must be > 0", v)
            }
            ConfigError::StepIntervalOutOfRange { interval_us, min_us } => write!(
                f,
                "Step interval {} us at max velocity is outside [{}, {}] us",
                interval_us,
                min_us,
                u32::MAX
            ),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {}", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::TimerNotReady => write!(f, "Alarm timer not ready"),
            MotorError::TimerError => write!(f, "Alarm timer operation failed"),
            MotorError::UnsupportedMicrostep(mode) => {
                write!(f, "Microstep mode {:?} needs more mode-select lines", mode)
            }
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::AlreadyQueued(key) => {
                write!(f, "Waypoint {} is already queued", key.value())
            }
            PathError::QueueFull => write!(f, "Path queue is full"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::Path(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for PathError {}
