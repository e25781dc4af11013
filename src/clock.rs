use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Test clock that only moves when advanced
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Countdown reading produced by one refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    pub elapsed: f64,
    pub remaining: f64,
    /// Fraction of the test completed, in [0, 1]
    pub progress: f64,
}

impl ClockReading {
    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Elapsed/remaining bookkeeping against a fixed test duration
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    test_duration: f64,
}

impl SessionClock {
    pub fn new(test_duration: Duration) -> Self {
        Self {
            test_duration: test_duration.as_secs_f64(),
        }
    }

    pub fn test_duration(&self) -> f64 {
        self.test_duration
    }

    pub fn read(&self, started_at: Instant, now: Instant) -> ClockReading {
        let elapsed = now.saturating_duration_since(started_at).as_secs_f64();
        let remaining = (self.test_duration - elapsed).max(0.0);
        let progress = if self.test_duration > 0.0 {
            (elapsed / self.test_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        ClockReading {
            elapsed,
            remaining,
            progress,
        }
    }
}
