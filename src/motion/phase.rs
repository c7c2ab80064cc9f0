//! Motion phase and direction of travel.

/// Direction of travel along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward increasing positions.
    #[default]
    Forward,
    /// Toward decreasing positions.
    Backward,
}

impl Direction {
    /// Direction needed to travel from `from` to `to`.
    ///
    /// A zero-length move counts as backward.
    #[inline]
    pub fn towards(from: i32, to: i32) -> Self {
        if to > from {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// Check for forward travel.
    #[inline]
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }

    /// Whether going from `from` to `to` continues in this direction.
    #[inline]
    pub fn continues(self, from: i32, to: i32) -> bool {
        match self {
            Direction::Forward => from < to,
            Direction::Backward => from > to,
        }
    }
}

/// Kinematic regime of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Idle: no step scheduled.
    #[default]
    Stop,
    /// Speeding up toward max velocity.
    Accelerate,
    /// Cruising at the current velocity.
    Move,
    /// Slowing down toward a stop or a turn.
    Decelerate,
}

impl MotionPhase {
    /// Check for the idle phase.
    #[inline]
    pub fn is_stop(self) -> bool {
        self == MotionPhase::Stop
    }
}
