use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::controller::{RunSchedule, SampleMsg, Transition};
use crate::error::{BreathError, Result};
use crate::generator::{NoiseSource, SampleGenerator};
use crate::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkerCommand {
    Resume(RunSchedule),
    Suspend,
    Reset,
    Shutdown,
}

/// Background producer that emits one sample per interval while resumed.
/// It never touches session state: samples go out through `emit` and the
/// owner of the state decides what to do with them.
///
/// A resume that carries a previous sample only waits out what is left of
/// that sample's interval, so pausing and resuming quickly never produces
/// two samples closer together than `sample_interval`.
pub struct SampleWorker {
    commands: Sender<WorkerCommand>,
    handle: Option<JoinHandle<()>>,
}

impl SampleWorker {
    /// `emit` returns false once nobody is listening, which ends the thread.
    pub fn spawn<N, C, F>(config: &SessionConfig, noise: N, clock: C, mut emit: F) -> Self
    where
        N: NoiseSource,
        C: Clock,
        F: FnMut(SampleMsg) -> bool + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<WorkerCommand>();
        let interval = config.sample_interval;
        let mut generator = SampleGenerator::new(config.seed, noise);

        let handle = thread::spawn(move || {
            let mut active: Option<RunSchedule> = None;
            let mut previous: Option<Sample> = None;
            let mut next_due = Instant::now();

            let mut produce = |schedule: &RunSchedule, previous: &mut Option<Sample>| -> bool {
                let elapsed = clock
                    .now()
                    .saturating_duration_since(schedule.started_at)
                    .as_secs_f64();
                let sample = generator.generate_next(previous.as_ref(), elapsed);
                *previous = Some(sample);
                emit(SampleMsg {
                    run_id: schedule.run_id,
                    sample,
                })
            };

            loop {
                let next = match active {
                    Some(_) => rx.recv_timeout(next_due.saturating_duration_since(Instant::now())),
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };

                let keep_going = match next {
                    Ok(WorkerCommand::Resume(schedule)) => {
                        previous = schedule.previous;
                        active = Some(schedule);
                        let wait = first_wait(&schedule, clock.now(), interval);
                        log::debug!(
                            "worker resumed for run {}, first sample in {:?}",
                            schedule.run_id,
                            wait
                        );
                        if wait.is_zero() {
                            next_due = Instant::now() + interval;
                            produce(&schedule, &mut previous)
                        } else {
                            next_due = Instant::now() + wait;
                            true
                        }
                    }
                    Ok(WorkerCommand::Suspend) => {
                        active = None;
                        true
                    }
                    Ok(WorkerCommand::Reset) => {
                        active = None;
                        previous = None;
                        true
                    }
                    Ok(WorkerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => false,
                    Err(RecvTimeoutError::Timeout) => match active {
                        Some(schedule) => {
                            next_due = Instant::now() + interval;
                            produce(&schedule, &mut previous)
                        }
                        None => true,
                    },
                };

                if !keep_going {
                    log::debug!("sample worker exiting");
                    break;
                }
            }
        });

        Self {
            commands: tx,
            handle: Some(handle),
        }
    }

    pub fn send(&self, cmd: WorkerCommand) -> Result<()> {
        self.commands
            .send(cmd)
            .map_err(|_| BreathError::WorkerDisconnected)
    }

    /// Forwards a controller transition to the worker
    pub fn apply(&self, transition: &Transition) -> Result<()> {
        match transition {
            Transition::Started(schedule) | Transition::Resumed(schedule) => {
                self.send(WorkerCommand::Resume(*schedule))
            }
            Transition::Paused => self.send(WorkerCommand::Suspend),
            Transition::Stopped => self.send(WorkerCommand::Reset),
            Transition::Ignored => Ok(()),
        }
    }
}

/// Time left before the first sample of a resumed run. A fresh run has no
/// previous sample and emits its seed right away.
fn first_wait(schedule: &RunSchedule, now: Instant, interval: Duration) -> Duration {
    let Some(prev) = schedule.previous else {
        return Duration::ZERO;
    };
    let run_time = now.saturating_duration_since(schedule.started_at).as_secs_f64();
    match Duration::try_from_secs_f64(run_time - prev.time) {
        Ok(gap) => interval.saturating_sub(gap),
        Err(_) => Duration::ZERO,
    }
}

impl Drop for SampleWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::generator::ZeroNoise;
    use std::sync::mpsc::Receiver;
    use std::time::Duration;

    const TEST_RECV_TIMEOUT: Duration = Duration::from_secs(2);

    fn fast_config() -> SessionConfig {
        SessionConfig {
            sample_interval: Duration::from_millis(5),
            ..SessionConfig::default()
        }
    }

    fn spawn(clock: ManualClock) -> (SampleWorker, Receiver<SampleMsg>) {
        let (tx, rx) = mpsc::channel();
        let worker = SampleWorker::spawn(&fast_config(), ZeroNoise, clock, move |m| {
            tx.send(m).is_ok()
        });
        (worker, rx)
    }

    fn schedule(clock: &ManualClock, run_id: u64, previous: Option<Sample>) -> RunSchedule {
        RunSchedule {
            run_id,
            started_at: clock.now(),
            previous,
        }
    }

    #[test]
    fn resume_emits_seed_sample_immediately() {
        let clock = ManualClock::new();
        let (worker, rx) = spawn(clock.clone());
        worker
            .send(WorkerCommand::Resume(schedule(&clock, 1, None)))
            .unwrap();

        let first = rx.recv_timeout(TEST_RECV_TIMEOUT).unwrap();
        assert_eq!(first.run_id, 1);
        assert_eq!(first.sample, Sample::new(0.0, 0.5, 0.1, 0.4));
    }

    #[test]
    fn samples_keep_coming_until_suspended() {
        let clock = ManualClock::new();
        let (worker, rx) = spawn(clock.clone());
        let sched = schedule(&clock, 3, None);
        worker.send(WorkerCommand::Resume(sched)).unwrap();
        rx.recv_timeout(TEST_RECV_TIMEOUT).unwrap();

        clock.advance_secs(1.0);
        // samples produced before the advance may still be queued
        let second = rx
            .iter()
            .take(1000)
            .find(|m| m.sample.time > 0.0)
            .expect("a sample after the clock advanced");
        assert_eq!(second.run_id, 3);
        assert_eq!(second.sample.time, 1.0);
        assert_eq!(second.sample.acetone, 0.5);

        worker.send(WorkerCommand::Suspend).unwrap();
        // drain anything already in flight, then expect silence
        while rx.recv_timeout(Duration::from_millis(50)).is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn resume_continues_from_the_given_previous_sample() {
        let clock = ManualClock::new();
        let (worker, rx) = spawn(clock.clone());
        let prev = Sample::new(4.0, 0.9, 0.2, 0.3);
        clock.advance_secs(5.0);
        let sched = RunSchedule {
            run_id: 1,
            started_at: clock.now() - Duration::from_secs(5),
            previous: Some(prev),
        };
        worker.send(WorkerCommand::Resume(sched)).unwrap();

        let next = rx.recv_timeout(TEST_RECV_TIMEOUT).unwrap();
        assert_eq!(next.sample.time, 5.0);
        assert_eq!(next.sample.acetone, 0.9);
        assert_eq!(next.sample.co2, 0.3);
    }

    #[test]
    fn resume_waits_out_the_rest_of_the_interval() {
        let clock = ManualClock::new();
        let config = SessionConfig {
            sample_interval: Duration::from_millis(300),
            ..SessionConfig::default()
        };
        let (tx, rx) = mpsc::channel();
        let worker = SampleWorker::spawn(&config, ZeroNoise, clock.clone(), move |m| {
            tx.send(m).is_ok()
        });
        // paused right after a sample: nothing is owed yet
        clock.advance_secs(5.0);
        let sched = RunSchedule {
            run_id: 1,
            started_at: clock.now() - Duration::from_secs(5),
            previous: Some(Sample::new(5.0, 0.9, 0.2, 0.3)),
        };
        worker.send(WorkerCommand::Resume(sched)).unwrap();

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        let next = rx.recv_timeout(TEST_RECV_TIMEOUT).unwrap();
        assert_eq!(next.sample.acetone, 0.9);
    }

    #[test]
    fn first_wait_covers_fresh_partial_and_overdue_runs() {
        let clock = ManualClock::new();
        let interval = Duration::from_secs(1);
        clock.advance_secs(10.0);
        let at = |previous| RunSchedule {
            run_id: 1,
            started_at: clock.now() - Duration::from_secs(10),
            previous,
        };

        assert_eq!(first_wait(&at(None), clock.now(), interval), Duration::ZERO);
        assert_eq!(
            first_wait(&at(Some(Sample::new(9.75, 0.5, 0.1, 0.4))), clock.now(), interval),
            Duration::from_millis(750)
        );
        assert_eq!(
            first_wait(&at(Some(Sample::new(7.0, 0.5, 0.1, 0.4))), clock.now(), interval),
            Duration::ZERO
        );
    }

    #[test]
    fn apply_ignored_sends_nothing() {
        let clock = ManualClock::new();
        let (worker, rx) = spawn(clock);
        worker.apply(&Transition::Ignored).unwrap();
        worker.apply(&Transition::Stopped).unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn worker_exits_when_receiver_is_gone() {
        let clock = ManualClock::new();
        let (worker, rx) = spawn(clock.clone());
        drop(rx);
        worker
            .send(WorkerCommand::Resume(schedule(&clock, 1, None)))
            .unwrap();
        // the thread ends on the failed emit; dropping joins it without hanging
        drop(worker);
    }
}
