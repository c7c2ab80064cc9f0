//! Cross-context access to a driver.

use core::cell::RefCell;

use critical_section::Mutex;

/// A driver (or controller) shared between a command context and the task
/// servicing its ticks.
///
/// Every access runs inside a critical section, so an `enqueue()` can never
/// interleave with an `advance()` popping the same path.
///
/// ```rust,ignore
/// static AXIS: SharedStepper<Option<Driver>> = SharedStepper::new(None);
///
/// // alarm interrupt
/// TICK.notify();
///
/// // work task
/// AXIS.lock(|axis| axis.as_mut().map(|d| d.service(&TICK)));
/// ```
pub struct SharedStepper<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> SharedStepper<T> {
    /// Wrap `value`.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access.
    ///
    /// Calls must not nest.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Take the value back out.
    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}
