use breathscope::{
    app::App,
    app_dirs::AppDirs,
    clock::SystemClock,
    config::SessionConfig,
    generator::GaussianNoise,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    worker::SampleWorker,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

/// real-time breath acetone analysis demo with a live chart
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Simulates a 60-second breath test: synthetic acetone and CO2 readings arrive once per second and are tabulated, charted, and checked for breathing segments and alarm levels."
)]
pub struct Cli {
    /// seed for the noise generator, for a reproducible run
    #[clap(long)]
    seed: Option<u64>,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    logging::init(&log_path)?;
    log::info!("breathscope {} starting", env!("CARGO_PKG_VERSION"));

    let config = SessionConfig::default();
    let noise = GaussianNoise::new(config.noise, cli.seed)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.refresh_interval),
    );
    let samples = runner.sender();
    let worker = SampleWorker::spawn(&config, noise, SystemClock, move |msg| {
        samples.send(AppEvent::Sample(msg)).is_ok()
    });
    let mut app = App::new(config, SystemClock, worker);

    let result = start_tui(&mut terminal, &runner, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("exiting on error: {e}");
    }
    log::info!("breathscope exiting");
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
    app: &mut App<SystemClock>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        if app.handle(runner.step())? {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["breathscope"]);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_seed() {
        let cli = Cli::parse_from(["breathscope", "--seed", "42"]);
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn test_cli_log_file() {
        let cli = Cli::parse_from(["breathscope", "--log-file", "/tmp/run.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/run.log")));
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["breathscope", "--duration", "30"]).is_err());
    }
}
