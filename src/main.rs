//! midnight - countdown to local midnight with a next-day notice
//!
//! Renders into an in-memory page shown by a terminal UI or a plain line
//! writer, or dumped once as text, JSON or HTML.

mod clock;
mod config;
mod core;
mod frontend;
mod widgets;

use crate::clock::{Clock, FixedClock, OffsetClock, SystemClock};
use crate::core::{AppCore, PageFeatures};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser as ClapParser, Subcommand};
use frontend::{Frontend, FrontendEvent};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(ClapParser)]
#[command(name = "midnight")]
#[command(about = "Countdown to local midnight with a next-day notice", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Frontend to use
    #[arg(short, long, default_value = "tui")]
    frontend: FrontendType,

    /// Custom data directory (default: ~/.midnight)
    /// Can also be set via MIDNIGHT_DIR environment variable
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Start the clock at this local time (RFC 3339 or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_name = "TIME", global = true)]
    at: Option<String>,

    /// Leave the countdown element off the page
    #[arg(long, global = true)]
    no_countdown: bool,

    /// Leave the notice element off the page
    #[arg(long, global = true)]
    no_notice: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FrontendType {
    Tui,
    Line,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the countdown and the notice once and exit
    Once {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the page as a standalone HTML document
    Snapshot {
        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title
        #[arg(long, default_value = "midnight")]
        title: String,
    },
    /// Write the default config.toml to the data directory if missing
    InitConfig {
        /// Rewrite the existing config with every field filled in
        #[arg(long)]
        rewrite: bool,
    },
}

impl Cli {
    fn features(&self) -> PageFeatures {
        PageFeatures {
            countdown: !self.no_countdown,
            notice: !self.no_notice,
        }
    }

    fn start_time(&self) -> Result<Option<DateTime<Local>>> {
        self.at.as_deref().map(clock::parse_local_time).transpose()
    }

    /// Live clock: real time, shifted when `--at` is given
    fn live_clock(&self) -> Result<Rc<dyn Clock>> {
        Ok(match self.start_time()? {
            Some(start) => {
                let clock = OffsetClock::starting_at(start);
                tracing::info!("Clock offset {}s from system time", clock.offset().num_seconds());
                Rc::new(clock)
            }
            None => Rc::new(SystemClock),
        })
    }

    /// Frozen clock for one-shot output
    fn snapshot_clock(&self) -> Result<Rc<dyn Clock>> {
        let now = self.start_time()?.unwrap_or_else(Local::now);
        Ok(Rc::new(FixedClock::new(now)))
    }
}

fn init_logging() -> Result<()> {
    // Log to a file (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    // TUI apps can't log to stdout
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create data directory {:?}", parent))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context(format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    init_logging()?;
    if let Some(data_dir) = &cli.data_dir {
        tracing::info!("Using custom data directory: {:?}", data_dir);
    }

    if let Some(Commands::InitConfig { rewrite }) = cli.command {
        if rewrite {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => config::Config::config_path()?,
            };
            config::Config::rewrite(&path)?;
            println!("Rewrote config at {}", path.display());
            return Ok(());
        }
        let (path, written) = config::Config::extract_defaults()?;
        if written {
            println!("Wrote default config to {}", path.display());
        } else {
            println!("Config already exists at {}", path.display());
        }
        return Ok(());
    }

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        config::Config::load_from_path(config_path)?
    } else {
        config::Config::load()?
    };

    match &cli.command {
        Some(Commands::Once { json }) => run_once(&cli, config, *json),
        Some(Commands::Snapshot { output, title }) => {
            run_snapshot(&cli, config, output.as_ref(), title)
        }
        Some(Commands::InitConfig { .. }) => Ok(()),
        None => {
            let app = AppCore::with_features(config, cli.live_clock()?, cli.features());
            match cli.frontend {
                FrontendType::Tui => run_tui(app),
                FrontendType::Line => run_line(app),
            }
        }
    }
}

fn run_once(cli: &Cli, config: config::Config, json: bool) -> Result<()> {
    let clock = cli.snapshot_clock()?;
    let mut app = AppCore::with_features(config, clock.clone(), cli.features());
    app.on_load(Instant::now());

    if json {
        let value = serde_json::json!({
            "countdown": app.countdown_text(),
            "notice": app.notice_markup(),
            "remaining_seconds": app.remaining_seconds(),
            "next_day": widgets::notice::next_day_label(&clock.now()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(text) = app.countdown_text() {
        println!("{}", text);
    }
    if let Some(markup) = app.notice_markup() {
        println!("{}", markup);
    }
    Ok(())
}

fn run_snapshot(
    cli: &Cli,
    config: config::Config,
    output: Option<&PathBuf>,
    title: &str,
) -> Result<()> {
    let mut app = AppCore::with_features(config, cli.snapshot_clock()?, cli.features());
    app.on_load(Instant::now());
    let html = app.page.to_html(title);

    match output {
        Some(path) => {
            std::fs::write(path, html).context(format!("Failed to write snapshot {:?}", path))?;
            tracing::info!("Snapshot written to {:?}", path);
            println!("Wrote {}", path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

/// Apply one frontend event to the core
fn handle_frontend_event(app: &mut AppCore, event: &FrontendEvent) {
    if event.is_quit() {
        app.quit();
        return;
    }
    if let FrontendEvent::Resize { width, height } = event {
        tracing::debug!("Resized to {}x{}", width, height);
        app.needs_render = true;
    }
}

/// Run TUI frontend
fn run_tui(mut app: AppCore) -> Result<()> {
    use frontend::TuiFrontend;

    let max_poll = Duration::from_millis(app.config.ui.poll_timeout_ms.max(1));
    let mut frontend = TuiFrontend::new(app.config.ui.clone())?;
    let (width, height) = frontend.size();
    tracing::info!("TUI started at {}x{}", width, height);
    app.on_load(Instant::now());

    // Main event loop
    while app.running {
        // Don't sleep through a due tick
        if let Some(wait) = app.until_next_tick(Instant::now()) {
            frontend.set_poll_timeout(wait.clamp(Duration::from_millis(1), max_poll));
        }

        // Poll for frontend events (keyboard, resize)
        for event in frontend.poll_events()? {
            handle_frontend_event(&mut app, &event);
        }

        app.tick(Instant::now());

        if app.needs_render {
            frontend.render(&app)?;
            app.needs_render = false;
        }
    }

    frontend.cleanup()?;
    Ok(())
}

/// Run plain line frontend
fn run_line(app: AppCore) -> Result<()> {
    // Use tokio runtime for the interval timer and Ctrl+C handling
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_line(app))
}

async fn async_run_line(mut app: AppCore) -> Result<()> {
    use frontend::LineFrontend;
    use tokio::time::MissedTickBehavior;

    let mut frontend = LineFrontend::stdout();
    let (width, _) = frontend.size();
    tracing::info!("Line output started ({} columns)", width);
    app.on_load(Instant::now());
    frontend.render(&app)?;
    app.needs_render = false;

    // Without a countdown element there is nothing to repeat
    if app.countdown_text().is_none() {
        return frontend.cleanup();
    }

    let period = Duration::from_millis(app.config.countdown.tick_interval_ms.max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; on_load already rendered it
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while app.running {
        tokio::select! {
            _ = interval.tick() => {
                if app.refresh_countdown() {
                    frontend.render(&app)?;
                    app.needs_render = false;
                }
            }
            _ = &mut ctrl_c => {
                handle_frontend_event(&mut app, &FrontendEvent::quit());
            }
        }
    }

    frontend.cleanup()
}
