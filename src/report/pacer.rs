use std::thread;
use std::time::Duration;

/// Delay used when a live run does not pick one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Backpressure stage between the harness and the viewers.
///
/// Every live frame passes through `wait`, which holds the training thread
/// for a fixed delay. Because the harness only starts the next epoch once
/// the observer returns, training can never outrun the animation rate. The
/// delay is unconditional and cannot be interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Pacer {
        Pacer { delay }
    }

    /// A pacer that never blocks; for tests and headless runs.
    pub fn unthrottled() -> Pacer {
        Pacer { delay: Duration::ZERO }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Pacer::new(DEFAULT_DELAY)
    }
}
