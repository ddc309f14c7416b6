/// Decides whether the current period may be settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodClock {
    start: i64,
    length: i64,
}

impl PeriodClock {
    /// Create a clock for the period starting at `start` and lasting `length` seconds.
    pub fn new(start: i64, length: i64) -> Self {
        Self { start, length }
    }

    /// Start of the period.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Length of the period in seconds.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Timestamp at which the period ends.
    pub fn ends_at(&self) -> i64 {
        self.start.saturating_add(self.length)
    }

    /// Returns whether the period has elapsed at `now`.
    pub fn has_elapsed(&self, now: i64) -> bool {
        now >= self.ends_at()
    }

    /// Seconds left until the period ends, zero once elapsed.
    pub fn remaining(&self, now: i64) -> i64 {
        self.ends_at().saturating_sub(now).max(0)
    }

    /// Fails with [`PeriodNotEnded`](crate::Error::PeriodNotEnded) unless the period has elapsed.
    pub fn ensure_elapsed(&self, now: i64) -> crate::Result<()> {
        if self.has_elapsed(now) {
            Ok(())
        } else {
            Err(crate::Error::PeriodNotEnded {
                ends_at: self.ends_at(),
            })
        }
    }
}
