use std::time::{Duration, Instant};

/// Fires once after a quiet period following the last trigger
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_event: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register an event, restarting the quiet period
    pub fn trigger(&mut self) {
        self.last_event = Some(Instant::now());
    }

    /// True exactly once when the quiet period has elapsed
    pub fn should_execute(&mut self) -> bool {
        match self.last_event {
            Some(last) if last.elapsed() >= self.delay => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }

    /// Fire now if anything is pending, skipping the rest of the wait
    pub fn flush(&mut self) -> bool {
        self.last_event.take().is_some()
    }

    /// Time left before a pending action fires
    pub fn time_remaining(&self) -> Option<Duration> {
        self.last_event
            .map(|last| self.delay.saturating_sub(last.elapsed()))
    }

    /// Drop any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }
}
