//! Alarm timer contract and interrupt hand-off.
//!
//! The step sequence is paced by a one-shot alarm. Its interrupt handler only
//! calls [`TickSignal::notify`]; all motion state changes happen later, when
//! the application services the signal outside interrupt context.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

/// One-shot microsecond alarm driving a single axis.
///
/// Alarms are only ever armed forward, never cancelled. When an alarm
/// expires the implementation is expected to notify the axis' [`TickSignal`]
/// (or, for blocking implementations, to report the expiry from its own wait).
pub trait AlarmTimer {
    /// Error type of the underlying counter.
    type Error: core::fmt::Debug;

    /// Start the free-running counter. Called once from driver init.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Fire once, `interval_us` microseconds from now.
    fn arm(&mut self, interval_us: u32) -> Result<(), Self::Error>;

    /// Fire as soon as possible, used to start motion from standstill.
    fn schedule_now(&mut self) -> Result<(), Self::Error>;
}

/// Single-slot "work pending" flag between an alarm interrupt and the task
/// that advances the axis.
///
/// Several notifications before a service collapse into one.
#[derive(Debug, Default)]
pub struct TickSignal {
    pending: AtomicBool,
}

impl TickSignal {
    /// Create a signal with no work pending.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Mark work as pending. Safe to call from an interrupt handler.
    #[inline]
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending flag, returning whether it was set.
    #[inline]
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Check for pending work without consuming it.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Blocking [`AlarmTimer`] built on an embedded-hal delay.
///
/// For hosts without a hardware alarm: [`arm`](AlarmTimer::arm) only records
/// the interval, and [`wait`](Self::wait) sleeps it out.
#[derive(Debug)]
pub struct DelayAlarm<D> {
    delay: D,
    pending: Option<u32>,
}

impl<D: DelayNs> DelayAlarm<D> {
    /// Wrap a delay provider.
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Block until the armed alarm expires.
    ///
    /// Returns `false` immediately when nothing is armed.
    pub fn wait(&mut self) -> bool {
        match self.pending.take() {
            Some(0) => true,
            Some(interval_us) => {
                self.delay.delay_us(interval_us);
                true
            }
            None => false,
        }
    }

    /// Check whether an alarm is armed.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the delay provider.
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> AlarmTimer for DelayAlarm<D> {
    type Error = core::convert::Infallible;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.pending = None;
        Ok(())
    }

    fn arm(&mut self, interval_us: u32) -> Result<(), Self::Error> {
        self.pending = Some(interval_us);
        Ok(())
    }

    fn schedule_now(&mut self) -> Result<(), Self::Error> {
        self.pending = Some(0);
        Ok(())
    }
}
