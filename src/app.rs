use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::controller::{RunController, TickOutcome, Transition};
use crate::error::Result;
use crate::notification::{Notification, Severity};
use crate::runtime::AppEvent;
use crate::worker::SampleWorker;

/// How many notifications the panel keeps
const NOTIFICATION_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Stop,
    Quit,
}

/// Key bindings: (s)tart, (p)ause, (r)eset, (q)uit / esc / ctrl+c
pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('s') | KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Command::Pause),
        KeyCode::Char('r') => Some(Command::Stop),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct LoggedNotification {
    pub at: DateTime<Local>,
    pub notification: Notification,
}

/// Application shell: routes commands to the controller and transitions to
/// the worker, and keeps the notification history for the view.
pub struct App<C: Clock> {
    pub controller: RunController<C>,
    worker: SampleWorker,
    notifications: VecDeque<LoggedNotification>,
    should_quit: bool,
}

impl<C: Clock> App<C> {
    pub fn new(config: SessionConfig, clock: C, worker: SampleWorker) -> Self {
        Self {
            controller: RunController::new(config, clock),
            worker,
            notifications: VecDeque::new(),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Newest first
    pub fn notifications(&self) -> impl Iterator<Item = &LoggedNotification> {
        self.notifications.iter().rev()
    }

    pub fn latest_notification(&self) -> Option<&LoggedNotification> {
        self.notifications.back()
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Transition> {
        let transition = match cmd {
            Command::Start => self.controller.start(),
            Command::Pause => self.controller.pause(),
            Command::Stop => {
                let t = self.controller.stop();
                self.notifications.clear();
                t
            }
            Command::Quit => {
                self.should_quit = true;
                return Ok(Transition::Ignored);
            }
        };
        self.worker.apply(&transition)?;
        Ok(transition)
    }

    /// Applies one event. Returns true when the screen needs a redraw.
    pub fn handle(&mut self, event: AppEvent) -> Result<bool> {
        match event {
            AppEvent::Tick => match self.controller.tick() {
                TickOutcome::Inactive => Ok(false),
                TickOutcome::Progress(_) => Ok(true),
                TickOutcome::Completed(done) => {
                    self.worker.apply(&Transition::Stopped)?;
                    self.notify(done);
                    Ok(true)
                }
            },
            AppEvent::Sample(msg) => {
                for n in self.controller.ingest(msg) {
                    if matches!(n, Notification::TestComplete { .. }) {
                        self.worker.apply(&Transition::Stopped)?;
                    }
                    self.notify(n);
                }
                Ok(true)
            }
            AppEvent::Key(key) => match command_for(key) {
                Some(cmd) => {
                    self.execute(cmd)?;
                    Ok(true)
                }
                None => Ok(false),
            },
            AppEvent::Resize => Ok(true),
        }
    }

    fn notify(&mut self, notification: Notification) {
        match notification.severity() {
            Severity::Info => log::info!("{}: {notification}", notification.title()),
            Severity::Warning => log::warn!("{}: {notification}", notification.title()),
        }
        if self.notifications.len() == NOTIFICATION_HISTORY {
            self.notifications.pop_front();
        }
        self.notifications.push_back(LoggedNotification {
            at: Local::now(),
            notification,
        });
    }
}
