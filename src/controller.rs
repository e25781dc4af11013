use std::time::Instant;

use crate::clock::{Clock, ClockReading, SessionClock};
use crate::config::SessionConfig;
use crate::monitor::BreathMonitor;
use crate::notification::Notification;
use crate::presenter::Presenter;
use crate::sample::Sample;
use crate::session::{SessionState, SessionStatus};

/// What the sample worker should do after a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSchedule {
    pub run_id: u64,
    pub started_at: Instant,
    pub previous: Option<Sample>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Started(RunSchedule),
    Resumed(RunSchedule),
    Paused,
    Stopped,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Inactive,
    Progress(ClockReading),
    Completed(Notification),
}

/// A sample tagged with the run that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMsg {
    pub run_id: u64,
    pub sample: Sample,
}

/// Owns the session state; every mutation goes through here
pub struct RunController<C: Clock> {
    clock: C,
    config: SessionConfig,
    session_clock: SessionClock,
    state: SessionState,
    monitor: BreathMonitor,
    presenter: Presenter,
}

impl<C: Clock> RunController<C> {
    pub fn new(config: SessionConfig, clock: C) -> Self {
        let session_clock = SessionClock::new(config.test_duration);
        Self {
            clock,
            state: SessionState::new(session_clock.test_duration()),
            monitor: BreathMonitor::new(config.thresholds),
            presenter: Presenter::new(),
            session_clock,
            config,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn monitor(&self) -> &BreathMonitor {
        &self.monitor
    }

    /// Seconds of running time so far, excluding pauses
    pub fn elapsed(&self) -> f64 {
        let Some(started_at) = self.state.started_at else {
            return 0.0;
        };
        let until = match self.state.status {
            SessionStatus::Paused => self.state.paused_at.unwrap_or_else(|| self.clock.now()),
            _ => self.clock.now(),
        };
        until.saturating_duration_since(started_at).as_secs_f64()
    }

    pub fn start(&mut self) -> Transition {
        if self.state.status == SessionStatus::Running || self.state.remaining <= 0.0 {
            log::debug!("start ignored in {} state", self.state.status);
            return Transition::Ignored;
        }

        let now = self.clock.now();
        match self.state.status {
            SessionStatus::Paused => {
                let paused_at = self.state.paused_at.take().unwrap_or(now);
                let started_at = self.state.started_at.unwrap_or(now) + (now - paused_at);
                self.state.started_at = Some(started_at);
                self.state.status = SessionStatus::Running;
                log::info!(
                    "run {} resumed after {:.2}s pause",
                    self.state.run_id,
                    (now - paused_at).as_secs_f64()
                );
                Transition::Resumed(self.schedule(started_at))
            }
            _ => {
                self.state.run_id += 1;
                self.state.started_at = Some(now);
                self.state.paused_at = None;
                self.state.samples.clear();
                self.state.status = SessionStatus::Running;
                log::info!(
                    "run {} started for {:.0}s",
                    self.state.run_id,
                    self.session_clock.test_duration()
                );
                Transition::Started(self.schedule(now))
            }
        }
    }

    pub fn pause(&mut self) -> Transition {
        if self.state.status != SessionStatus::Running {
            log::debug!("pause ignored in {} state", self.state.status);
            return Transition::Ignored;
        }
        self.state.paused_at = Some(self.clock.now());
        self.state.status = SessionStatus::Paused;
        log::info!(
            "run {} paused at {:.2}s with {} samples",
            self.state.run_id,
            self.elapsed(),
            self.state.samples.len()
        );
        Transition::Paused
    }

    pub fn stop(&mut self) -> Transition {
        if self.state.status != SessionStatus::Stopped {
            log::info!(
                "run {} stopped from {} with {} samples",
                self.state.run_id,
                self.state.status,
                self.state.samples.len()
            );
        }
        self.state.status = SessionStatus::Stopped;
        self.state.started_at = None;
        self.state.paused_at = None;
        self.state.samples.clear();
        self.state.remaining = self.session_clock.test_duration();
        self.state.progress = 0.0;
        self.monitor.reset();
        self.presenter.clear();
        Transition::Stopped
    }

    /// Countdown refresh. Completes the run once, the first time the
    /// remaining time reaches zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status != SessionStatus::Running {
            return TickOutcome::Inactive;
        }
        let Some(started_at) = self.state.started_at else {
            return TickOutcome::Inactive;
        };

        let reading = self.session_clock.read(started_at, self.clock.now());
        self.state.remaining = reading.remaining;
        self.state.progress = reading.progress;

        if reading.is_finished() {
            TickOutcome::Completed(self.complete())
        } else {
            TickOutcome::Progress(reading)
        }
    }

    fn complete(&mut self) -> Notification {
        self.stop();
        let done = Notification::TestComplete {
            duration_secs: self.session_clock.test_duration(),
        };
        log::info!("{done}");
        done
    }

    /// Applies one generated sample: checks, bookkeeping, append, render.
    /// A sample arriving after the deadline completes the run instead of
    /// being stored; the returned `TestComplete` is the only report of it.
    pub fn ingest(&mut self, msg: SampleMsg) -> Vec<Notification> {
        if self.state.status != SessionStatus::Running {
            log::debug!(
                "dropping sample at t={:.2}s, session is {}",
                msg.sample.time,
                self.state.status
            );
            return Vec::new();
        }
        if let Some(started_at) = self.state.started_at {
            if self.session_clock.read(started_at, self.clock.now()).is_finished() {
                log::debug!("sample at t={:.2}s arrived after the deadline", msg.sample.time);
                return vec![self.complete()];
            }
        }
        if msg.run_id != self.state.run_id {
            log::debug!("dropping sample from stale run {}", msg.run_id);
            return Vec::new();
        }
        if let Some(last) = self.state.last_sample() {
            if msg.sample.time < last.time {
                log::warn!(
                    "dropping out-of-order sample t={:.2}s after t={:.2}s",
                    msg.sample.time,
                    last.time
                );
                return Vec::new();
            }
        }

        let notifications = self.monitor.observe(&self.state.samples, &msg.sample);
        self.state.samples.push(msg.sample);
        self.presenter.render(&self.state.samples);
        notifications
    }

    fn schedule(&self, started_at: Instant) -> RunSchedule {
        RunSchedule {
            run_id: self.state.run_id,
            started_at,
            previous: self.state.last_sample().copied(),
        }
    }
}
