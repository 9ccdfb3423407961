use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use driftwatch::app::{write_export, App};
use driftwatch::monitor::{self, MonitorClient, OverlapPolicy};
use driftwatch::{events, ui, DriftApi, HttpApi, Profile, ReplayApi, Settings};

#[derive(Parser, Debug)]
#[command(name = "driftwatch")]
#[command(about = "Terminal dashboard for a behavioral drift analytics service")]
struct Args {
    /// Backend base URL
    #[arg(short, long, conflicts_with = "replay")]
    url: Option<String>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard profile
    #[arg(short, long, value_enum)]
    profile: Option<Profile>,

    /// Polling interval while monitoring (e.g., "2s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Per-request timeout (e.g., "10s")
    #[arg(short, long)]
    timeout: Option<String>,

    /// What to do when a poll fires while an analysis is still running
    #[arg(long, value_enum)]
    overlap: Option<OverlapPolicy>,

    /// Log file (the terminal is owned by the dashboard)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Serve analyses from a recorded session file instead of a backend
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Capture one analysis to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of loaded settings.
    fn apply(self, mut settings: Settings) -> (Settings, Option<PathBuf>) {
        if let Some(url) = self.url {
            settings.url = url;
        }
        if let Some(profile) = self.profile {
            settings.profile = profile;
        }
        if let Some(interval) = self.interval {
            settings.interval = interval;
        }
        if let Some(timeout) = self.timeout {
            settings.timeout = timeout;
        }
        if let Some(overlap) = self.overlap {
            settings.overlap = overlap;
        }
        if let Some(log_file) = self.log_file {
            settings.log_file = log_file;
        }
        if self.replay.is_some() {
            settings.replay = self.replay;
        }
        (settings, self.export)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    let (settings, export) = args.apply(settings);
    settings.validate()?;

    init_logging(&settings.log_file)?;

    let rt = Runtime::new()?;
    let api = build_api(&settings)?;
    info!(backend = %api.description(), profile = ?settings.profile, "Starting driftwatch");

    // Handle export mode (non-interactive)
    if let Some(export_path) = export {
        return export_to_file(&rt, api.as_ref(), settings.profile, &export_path);
    }

    let monitor = MonitorClient::new(api, settings.monitor_options()?, rt.handle().clone());
    let mut app = App::new(monitor, settings.profile);

    // Seed the chart before the first frame so no poll can land ahead of it
    if settings.profile.preloads_history() {
        match rt.block_on(app.monitor().load_history()) {
            Ok(points) => app.seed_history(&points),
            Err(e) => warn!(error = %e, "Failed to load history, starting with an empty chart"),
        }
    }

    run_tui(app)
}

/// Send logs to a file; the terminal belongs to the dashboard.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn build_api(settings: &Settings) -> Result<Arc<dyn DriftApi>> {
    if let Some(ref path) = settings.replay {
        return Ok(Arc::new(ReplayApi::load(path)?));
    }

    let api = HttpApi::builder()
        .base_url(settings.url.clone())
        .timeout(settings.request_timeout()?)
        .build()?;
    Ok(Arc::new(api))
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        analyses = app.monitor().analyze_requests(),
        skipped_ticks = app.monitor().skipped_ticks(),
        "Shutting down"
    );

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.process_outcomes();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short timeout so outcomes are picked up promptly
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    let content_height = ui::content_height(terminal.size()?.height);
                    events::handle_mouse_event(app, mouse, ui::CONTENT_START_ROW, content_height)
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Capture the dashboard after one analysis and write it as JSON
fn export_to_file(rt: &Runtime, api: &dyn DriftApi, profile: Profile, path: &Path) -> Result<()> {
    let dashboard = rt
        .block_on(monitor::capture(api, profile))
        .context("Analysis failed")?;

    write_export(path, &dashboard, None)?;

    println!("Exported dashboard state to: {}", path.display());
    Ok(())
}
