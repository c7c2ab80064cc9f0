//! Waypoints and arrival callbacks.

use core::fmt;

/// Caller-chosen identity of a waypoint.
///
/// A key can be queued at most once at a time, which is what keeps a path
/// free of cycles when callers reuse the same waypoint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaypointKey(pub u16);

impl WaypointKey {
    /// Create a new key.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

/// Notification fired once when the axis reaches a waypoint.
///
/// Implemented for every `FnOnce(i32)`, so plain functions, closures and
/// boxed closures all work. The argument is the reached position in millimeters.
pub trait OnArrival {
    /// Consume the notification.
    fn on_arrival(self, position: i32);
}

impl<F> OnArrival for F
where
    F: FnOnce(i32),
{
    #[inline]
    fn on_arrival(self, position: i32) {
        self(position)
    }
}

/// A target position plus an optional one-shot arrival callback.
pub struct Waypoint<C = fn(i32)> {
    key: WaypointKey,
    position: i32,
    callback: Option<C>,
}

impl<C: OnArrival> Waypoint<C> {
    /// Waypoint without a callback.
    #[inline]
    pub fn new(key: WaypointKey, position: i32) -> Self {
        Self {
            key,
            position,
            callback: None,
        }
    }

    /// Waypoint that fires `callback` on arrival.
    #[inline]
    pub fn with_callback(key: WaypointKey, position: i32, callback: C) -> Self {
        Self {
            key,
            position,
            callback: Some(callback),
        }
    }

    /// Identity of this waypoint.
    #[inline]
    pub fn key(&self) -> WaypointKey {
        self.key
    }

    /// Target position in millimeters.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Whether the arrival callback is still pending.
    #[inline]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Fire the callback, if it has not fired yet.
    pub(crate) fn notify(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback.on_arrival(self.position);
        }
    }
}

impl<C> fmt::Debug for Waypoint<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waypoint")
            .field("key", &self.key)
            .field("position", &self.position)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
