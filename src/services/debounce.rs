use std::time::{Duration, Instant};

/// Coalesces repeated requests into one action after a quiet period.
///
/// Every `request` pushes the deadline out to `now + delay`; `fire` reports
/// true once the deadline has passed and disarms.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm and report whether anything was pending.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
