//! Periodic drivers for the frame tick and the spawn timer
//!
//! Both are plain interval timers polled by whatever owns the clock. A
//! [`Ticket`] ties a scheduled callback to one Playing session so it can be
//! rejected once that session is over.

/// Proof that a callback was scheduled for a particular Playing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
}

/// Fires once per period while running
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_ms: f64,
    running: bool,
}

impl IntervalTimer {
    /// Start a timer whose first firing is one period after `now_ms`
    pub fn start(period_ms: f64, now_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(f64::EPSILON),
            next_due_ms: now_ms + period_ms,
            running: true,
        }
    }

    /// Returns true (at most once per call) if a firing is due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if !self.running || now_ms.is_nan() || now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms += self.period_ms;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}
