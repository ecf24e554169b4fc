use std::time::{Duration, Instant};

/// Time source for pacing and fixed waits.
///
/// The capture loop and readiness waits only ever read time and sleep through this trait, so a
/// run can be replayed against a simulated clock.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
    /// Block the calling thread for `d`.
    fn sleep(&self, d: Duration);
}

/// Wall clock backed by [`Instant::now`] and [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}
