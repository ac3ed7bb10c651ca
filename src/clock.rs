use std::time::{Duration, Instant};

/// Fixed-period scheduler owned by the host, one per open game view.
///
/// Dropping the ticker is the cancellation: nothing fires once the view that
/// polls it is gone.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Instant::now())
    }

    pub fn starting_at(period: Duration, now: Instant) -> Self {
        Self {
            period,
            last_tick: now,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next tick is due, zero if already due
    pub fn timeout(&self) -> Duration {
        self.timeout_at(Instant::now())
    }

    pub fn timeout_at(&self, now: Instant) -> Duration {
        self.period
            .checked_sub(now.saturating_duration_since(self.last_tick))
            .unwrap_or(Duration::ZERO)
    }

    /// Returns true at most once per period; missed periods are not replayed
    pub fn poll(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.period {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// Poll on every pass of the host loop, running or not, so the deadline
    /// keeps moving while a game is paused or over. True only when a period
    /// elapsed and `running` holds.
    pub fn advance(&mut self, now: Instant, running: bool) -> bool {
        self.poll(now) && running
    }

    /// Start a fresh period, e.g. on resume so no catch-up tick fires
    pub fn restart(&mut self, now: Instant) {
        self.last_tick = now;
    }
}
