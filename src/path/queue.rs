//! Bounded waypoint queue.

use heapless::Deque;

use crate::error::PathError;

use super::waypoint::{OnArrival, Waypoint, WaypointKey};

/// Default number of waypoints a path can hold.
pub const DEFAULT_PATH_CAPACITY: usize = 8;

/// Ordered queue of waypoints still to be visited.
///
/// Insertion order is visit order. Each key appears at most once.
pub struct PathQueue<C, const N: usize = DEFAULT_PATH_CAPACITY> {
    waypoints: Deque<Waypoint<C>, N>,
}

impl<C: OnArrival, const N: usize> Default for PathQueue<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: OnArrival, const N: usize> PathQueue<C, N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            waypoints: Deque::new(),
        }
    }

    /// Append a waypoint at the tail.
    ///
    /// # Errors
    ///
    /// - `PathError::AlreadyQueued` if a waypoint with the same key is pending
    /// - `PathError::QueueFull` if there is no room left
    ///
    /// The queue is unchanged on error.
    pub fn push(&mut self, waypoint: Waypoint<C>) -> Result<(), PathError> {
        let key = waypoint.key();
        if self.contains(key) {
            return Err(PathError::AlreadyQueued(key));
        }

        self.waypoints
            .push_back(waypoint)
            .map_err(|_| PathError::QueueFull)
    }

    /// Waypoint currently being pursued.
    #[inline]
    pub fn head(&self) -> Option<&Waypoint<C>> {
        self.waypoints.front()
    }

    /// Waypoint after the head, used for look-ahead.
    #[inline]
    pub fn following(&self) -> Option<&Waypoint<C>> {
        self.waypoints.iter().nth(1)
    }

    /// Handle arrival at the head waypoint.
    ///
    /// Fires the head's callback, then advances to the next waypoint if there
    /// is one. The last waypoint stays in place until the axis stops; its
    /// callback will not fire again.
    ///
    /// Returns `true` if the head advanced.
    pub fn pop_on_arrival(&mut self) -> bool {
        let Some(head) = self.waypoints.front_mut() else {
            return false;
        };
        head.notify();

        if self.waypoints.len() > 1 {
            self.waypoints.pop_front();
            true
        } else {
            false
        }
    }

    /// Drop the head waypoint without notifying it.
    #[inline]
    pub fn pop(&mut self) -> Option<Waypoint<C>> {
        self.waypoints.pop_front()
    }

    /// Take back the waypoint most recently pushed, without notifying it.
    #[inline]
    pub fn pop_back(&mut self) -> Option<Waypoint<C>> {
        self.waypoints.pop_back()
    }

    /// Whether a waypoint with `key` is pending.
    pub fn contains(&self, key: WaypointKey) -> bool {
        self.waypoints.iter().any(|w| w.key() == key)
    }

    /// Target positions in visit order.
    pub fn positions(&self) -> impl Iterator<Item = i32> + '_ {
        self.waypoints.iter().map(|w| w.position())
    }

    /// Number of pending waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Check if no waypoints are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Check if the queue is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.waypoints.is_full()
    }

    /// Drop all pending waypoints without notifying them.
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
}
