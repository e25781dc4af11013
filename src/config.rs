use std::time::Duration;

/// Samples produced per second. The breath-segment window converts a
/// segment duration into a sample count through this rate.
pub const SAMPLE_RATE_HZ: f64 = 1.0;

/// Fixed constants of a test session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub test_duration: Duration,
    pub refresh_interval: Duration,
    pub sample_interval: Duration,
    pub seed: SeedValues,
    pub noise: NoiseLevels,
    pub thresholds: Thresholds,
}

/// Values of the first sample of every run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedValues {
    pub acetone: f64,
    pub error: f64,
    pub co2: f64,
}

/// Standard deviation of the per-sample random walk step, per channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseLevels {
    pub acetone: f64,
    pub error: f64,
    pub co2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Alarm above this acetone level (ppm)
    pub acetone_high: f64,
    /// Breathing is active above this acetone level (ppm)
    pub breath_active: f64,
    /// Consecutive low samples tolerated before a no-breath warning
    pub no_breath_limit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            test_duration: Duration::from_secs(60),
            refresh_interval: Duration::from_millis(10),
            sample_interval: Duration::from_secs_f64(1.0 / SAMPLE_RATE_HZ),
            seed: SeedValues::default(),
            noise: NoiseLevels::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Default for SeedValues {
    fn default() -> Self {
        Self {
            acetone: 0.5,
            error: 0.1,
            co2: 0.4,
        }
    }
}

impl Default for NoiseLevels {
    fn default() -> Self {
        Self {
            acetone: 0.01,
            error: 0.005,
            co2: 0.005,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            acetone_high: 1.5,
            breath_active: 0.2,
            no_breath_limit: 5,
        }
    }
}

impl SessionConfig {
    pub fn test_duration_secs(&self) -> f64 {
        self.test_duration.as_secs_f64()
    }

    pub fn with_test_duration(mut self, duration: Duration) -> Self {
        self.test_duration = duration;
        self
    }
}
