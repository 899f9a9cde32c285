//! Millisecond clock abstraction and rollover-safe deadlines.
//!
//! The link only needs a free-running millisecond counter. Such counters are
//! usually 32 bits wide and wrap after ~49.7 days, so deadlines are compared
//! through [`Deadline::expired`], which stays correct across the wrap as long as
//! the deadline is less than `2^31` ms away.

/// A monotonic millisecond counter.
///
/// Implement this for the board's system timer. The value may wrap around.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&mut self) -> u32;
}

/// A point in time on a wrapping millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: u32,
}

impl Deadline {
    /// A deadline `timeout_ms` after `now`.
    pub fn after(now: u32, timeout_ms: u32) -> Self {
        Self {
            at: now.wrapping_add(timeout_ms),
        }
    }

    /// A deadline that has already passed at `now`.
    pub fn elapsed_at(now: u32) -> Self {
        Self { at: now }
    }

    /// Returns `true` once `now` has reached or passed the deadline.
    pub fn expired(&self, now: u32) -> bool {
        (now.wrapping_sub(self.at) as i32) >= 0
    }

    /// The raw tick value of the deadline.
    pub fn at(&self) -> u32 {
        self.at
    }
}

/// A [`Clock`] backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Creates a clock whose zero is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&mut self) -> u32 {
        // Truncation is intended, deadlines handle the wrap.
        self.origin.elapsed().as_millis() as u32
    }
}
