//! Application state and user interaction logic.

use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::HistoryPoint;
use crate::data::{render, wall_clock_label, Dashboard, Profile};
use crate::monitor::{MonitorClient, Outcome};
use crate::ui::Theme;

/// How long a transient status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// Alert detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Stat tiles, drift chart and the latest alerts.
    Overview,
    /// Full alert list.
    Alerts,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Alerts,
            View::Alerts => View::Overview,
        }
    }

    /// Cycle to the previous view (two views, so same as `next`).
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Alerts => "Alerts",
        }
    }
}

/// Overall system status shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    /// No baseline yet.
    Standby,
    Operational,
    Monitoring,
}

impl SystemStatus {
    pub fn label(self) -> &'static str {
        match self {
            SystemStatus::Standby => "STANDBY",
            SystemStatus::Operational => "OPERATIONAL",
            SystemStatus::Monitoring => "MONITORING",
        }
    }
}

/// State of the "establish baseline" trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineControl {
    /// Never requested.
    Ready,
    /// Request in flight.
    Establishing,
    /// Baseline established; trigger stays disabled.
    Established,
    /// Last request failed; trigger enabled again.
    Retry,
}

impl BaselineControl {
    pub fn enabled(self) -> bool {
        matches!(self, BaselineControl::Ready | BaselineControl::Retry)
    }

    pub fn label(self) -> &'static str {
        match self {
            BaselineControl::Ready => "Establish Baseline",
            BaselineControl::Establishing => "Establishing Baseline...",
            BaselineControl::Established => "Baseline Ready",
            BaselineControl::Retry => "Retry Initialization",
        }
    }
}

/// Enabled/disabled state of the dashboard's triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub status: SystemStatus,
    pub baseline: BaselineControl,
    pub analyze_enabled: bool,
    pub monitoring: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            status: SystemStatus::Standby,
            baseline: BaselineControl::Ready,
            analyze_enabled: false,
            monitoring: false,
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    monitor: MonitorClient,
    pub dashboard: Dashboard,
    pub controls: Controls,
    /// Last request failure, cleared by the next success.
    pub last_error: Option<String>,

    // Navigation state
    pub selected_alert_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App driving the given monitor client.
    pub fn new(monitor: MonitorClient, profile: Profile) -> Self {
        Self::with_theme(monitor, profile, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(monitor: MonitorClient, profile: Profile, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            monitor,
            dashboard: Dashboard::new(profile),
            controls: Controls::default(),
            last_error: None,
            selected_alert_index: 0,
            theme,
            status_message: None,
        }
    }

    pub fn monitor(&self) -> &MonitorClient {
        &self.monitor
    }

    pub fn profile(&self) -> Profile {
        self.dashboard.profile
    }

    /// Returns a description of the backend.
    pub fn source_description(&self) -> &str {
        self.monitor.description()
    }

    /// Label for the analyze trigger.
    pub fn analyze_label(&self) -> &'static str {
        if self.monitor.in_flight() > 0 {
            "Analyzing..."
        } else {
            "Run Drift Analysis"
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Seed the chart with prior points before any polling starts.
    pub fn seed_history(&mut self, points: &[HistoryPoint]) {
        self.dashboard.seed_history(points);
    }

    /// Request a baseline, if the trigger is enabled.
    pub fn initialize(&mut self) {
        if !self.controls.baseline.enabled() {
            return;
        }
        self.controls.baseline = BaselineControl::Establishing;
        self.monitor.initialize();
    }

    /// Run a single analysis, if the trigger is enabled.
    pub fn analyze(&mut self) {
        if !self.controls.analyze_enabled {
            let reason = if self.controls.monitoring {
                "Analysis runs automatically while monitoring"
            } else {
                "Establish a baseline first (i)"
            };
            self.set_status_message(reason.to_string());
            return;
        }
        self.monitor.analyze_once();
    }

    /// Flip automatic monitoring on or off.
    pub fn toggle_monitoring(&mut self) {
        let enable = !self.controls.monitoring;
        self.monitor.toggle_monitoring(enable);
        self.controls.monitoring = enable;
        if enable {
            self.controls.analyze_enabled = false;
            self.controls.status = SystemStatus::Monitoring;
        } else {
            self.controls.analyze_enabled = true;
            self.controls.status = SystemStatus::Operational;
        }
    }

    /// Apply every completed request outcome.
    ///
    /// Returns the number of outcomes applied.
    pub fn process_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.monitor.poll_outcome() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Initialized(Ok(baseline)) => {
                info!(samples = ?baseline.samples, "Baseline established");
                self.controls.baseline = BaselineControl::Established;
                if !self.controls.monitoring {
                    self.controls.status = SystemStatus::Operational;
                    self.controls.analyze_enabled = true;
                }
                self.last_error = None;
                let message = match baseline.samples {
                    Some(n) => format!("Behavioral baseline established ({} samples)", n),
                    None => "Behavioral baseline established".to_string(),
                };
                self.set_status_message(message);
            }
            Outcome::Initialized(Err(e)) => {
                warn!(error = %e, transient = e.is_transient(), "Baseline request failed");
                self.controls.baseline = BaselineControl::Retry;
                self.last_error = Some(format!("Initialization failed: {}", e));
            }
            Outcome::Analyzed { trigger, result } => match result {
                Ok(result) => {
                    let patch = render(&result, self.dashboard.profile, &wall_clock_label());
                    self.dashboard.apply(patch);
                    self.last_error = None;
                    self.clamp_selection();
                }
                Err(e) => {
                    warn!(error = %e, ?trigger, transient = e.is_transient(), "Analysis failed");
                    self.last_error = Some(format!("Analysis failed: {}", e));
                }
            },
        }
    }

    fn clamp_selection(&mut self) {
        let max = self.dashboard.alerts.len().saturating_sub(1);
        self.selected_alert_index = self.selected_alert_index.min(max);
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one alert.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one alert.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n alerts.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.dashboard.alerts.len().saturating_sub(1);
        self.selected_alert_index = (self.selected_alert_index + n).min(max);
    }

    /// Move selection up by n alerts.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_alert_index = self.selected_alert_index.saturating_sub(n);
    }

    /// Jump to the newest alert.
    pub fn select_first(&mut self) {
        self.selected_alert_index = 0;
    }

    /// Jump to the oldest alert.
    pub fn select_last(&mut self) {
        self.selected_alert_index = self.dashboard.alerts.len().saturating_sub(1);
    }

    /// Open the detail overlay for the selected alert.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Alerts && !self.dashboard.alerts.is_empty() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        self.current_view = View::Overview;
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        write_export(path, &self.dashboard, Some(&self.controls))
    }
}

/// Write dashboard state (and trigger state, if any) as pretty JSON.
pub fn write_export(
    path: &std::path::Path,
    dashboard: &Dashboard,
    controls: Option<&Controls>,
) -> Result<()> {
    use std::io::Write;

    let mut export = serde_json::Map::new();
    export.insert("exported_at".to_string(), serde_json::json!(wall_clock_label()));
    if let Some(controls) = controls {
        export.insert("controls".to_string(), serde_json::to_value(controls)?);
    }
    export.insert("dashboard".to_string(), serde_json::to_value(dashboard)?);

    let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}
