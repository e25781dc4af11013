use std::time::Instant;

use crate::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Stopped,
}

impl SessionStatus {
    /// Idle and Stopped both start a fresh run
    pub fn is_fresh(&self) -> bool {
        matches!(self, SessionStatus::Idle | SessionStatus::Stopped)
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    pub started_at: Option<Instant>,
    pub paused_at: Option<Instant>,
    pub remaining: f64,
    pub progress: f64,
    pub samples: Vec<Sample>,
    /// Bumped on every fresh start so samples from an earlier run are ignored
    pub run_id: u64,
}

impl SessionState {
    pub fn new(test_duration: f64) -> Self {
        Self {
            status: SessionStatus::Idle,
            started_at: None,
            paused_at: None,
            remaining: test_duration,
            progress: 0.0,
            samples: Vec::new(),
            run_id: 0,
        }
    }

    pub fn last_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }
}
