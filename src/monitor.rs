//! Monitor client: baseline, on-demand analysis and periodic polling.
//!
//! Requests run as tasks on a tokio runtime and report back through an
//! unbounded channel. The UI loop drains that channel with
//! [`MonitorClient::poll_outcome`] and applies each outcome to completion
//! before looking at the next, so dashboard updates never interleave.
//!
//! ```text
//!            toggle_monitoring(true)
//!   ┌──────┐ ──────────────────────▶ ┌─────────┐
//!   │ Idle │                          │ Polling │──▶ analyze every period
//!   └──────┘ ◀────────────────────── └─────────┘
//!            toggle_monitoring(false)
//! ```
//!
//! Stopping the poller cancels the ticker only. Requests already in flight
//! still complete and their outcomes are still delivered.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{AnalysisResult, Baseline, DriftApi, HistoryPoint};
use crate::data::{render, wall_clock_label, Dashboard, Profile};
use crate::error::ApiError;

/// Default polling period.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(2);

/// What to do when a scheduled tick fires while an analysis is still running.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Start another request anyway; whichever finishes last wins.
    #[default]
    Concurrent,
    /// Skip the tick.
    Skip,
}

/// Who asked for an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user, or the immediate run when polling starts.
    Manual,
    /// The polling ticker.
    Scheduled,
}

/// Completion of a background request.
#[derive(Debug)]
pub enum Outcome {
    Initialized(Result<Baseline, ApiError>),
    Analyzed {
        trigger: Trigger,
        result: Result<AnalysisResult, ApiError>,
    },
}

/// Whether periodic polling is running.
pub enum MonitorState {
    Idle,
    Polling { ticker: JoinHandle<()> },
}

impl MonitorState {
    pub fn is_active(&self) -> bool {
        matches!(self, MonitorState::Polling { .. })
    }
}

impl fmt::Debug for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorState::Idle => f.write_str("Idle"),
            MonitorState::Polling { .. } => f.write_str("Polling"),
        }
    }
}

/// Polling options.
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    pub period: Duration,
    pub overlap: OverlapPolicy,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            overlap: OverlapPolicy::default(),
        }
    }
}

/// Counters shared between the client and its request tasks.
#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    analyze_requests: AtomicU64,
    skipped_ticks: AtomicU64,
}

/// Owns the polling state and issues requests against a [`DriftApi`].
#[derive(Debug)]
pub struct MonitorClient {
    api: Arc<dyn DriftApi>,
    runtime: Handle,
    options: MonitorOptions,
    state: MonitorState,
    counters: Arc<Counters>,
    tx: mpsc::UnboundedSender<Outcome>,
    rx: mpsc::UnboundedReceiver<Outcome>,
}

impl MonitorClient {
    /// Create a client whose requests run on `runtime`.
    pub fn new(api: Arc<dyn DriftApi>, options: MonitorOptions, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            runtime,
            options: MonitorOptions {
                period: options.period.max(Duration::from_millis(1)),
                ..options
            },
            state: MonitorState::Idle,
            counters: Arc::new(Counters::default()),
            tx,
            rx,
        }
    }

    /// Returns a description of the backend.
    pub fn description(&self) -> &str {
        self.api.description()
    }

    pub fn options(&self) -> MonitorOptions {
        self.options
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        self.state.is_active()
    }

    /// Number of analyze requests currently running.
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Total analyze requests issued so far.
    pub fn analyze_requests(&self) -> u64 {
        self.counters.analyze_requests.load(Ordering::SeqCst)
    }

    /// Ticks dropped by [`OverlapPolicy::Skip`].
    pub fn skipped_ticks(&self) -> u64 {
        self.counters.skipped_ticks.load(Ordering::SeqCst)
    }

    /// Ask the backend for a baseline. The result arrives as
    /// [`Outcome::Initialized`]. There is no automatic retry.
    pub fn initialize(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        info!(backend = %api.description(), "Establishing baseline");
        self.runtime.spawn(async move {
            let result = api.initialize().await;
            let _ = tx.send(Outcome::Initialized(result));
        });
    }

    /// Run one analysis in the background.
    pub fn analyze_once(&self) {
        spawn_analyze(
            &self.runtime,
            self.api.clone(),
            self.tx.clone(),
            self.counters.clone(),
            Trigger::Manual,
        );
    }

    /// Start or stop periodic polling.
    ///
    /// Starting runs one analysis immediately and then one per period.
    /// Returns `false` if already in the requested state.
    pub fn toggle_monitoring(&mut self, enabled: bool) -> bool {
        match (self.state.is_active(), enabled) {
            (false, true) => {
                self.analyze_once();
                let ticker = self.spawn_ticker();
                self.state = MonitorState::Polling { ticker };
                info!(period = ?self.options.period, overlap = ?self.options.overlap, "Monitoring started");
                true
            }
            (true, false) => {
                self.stop_ticker();
                info!("Monitoring stopped");
                true
            }
            _ => false,
        }
    }

    /// Fetch prior chart points. Awaited directly so callers can seed the
    /// chart before any polling starts.
    pub async fn load_history(&self) -> Result<Vec<HistoryPoint>, ApiError> {
        let points = self.api.history().await?;
        info!(points = points.len(), "Loaded drift history");
        Ok(points)
    }

    /// Take the next completed outcome, if any. Never blocks.
    pub fn poll_outcome(&mut self) -> Option<Outcome> {
        self.rx.try_recv().ok()
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let counters = self.counters.clone();
        let MonitorOptions { period, overlap } = self.options;

        self.runtime.spawn(async move {
            // The immediate run has already been issued; first tick is one period out.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let handle = Handle::current();

            loop {
                ticker.tick().await;
                if overlap == OverlapPolicy::Skip && counters.in_flight.load(Ordering::SeqCst) > 0 {
                    counters.skipped_ticks.fetch_add(1, Ordering::SeqCst);
                    debug!("Previous analysis still running, skipping tick");
                    continue;
                }
                spawn_analyze(&handle, api.clone(), tx.clone(), counters.clone(), Trigger::Scheduled);
            }
        })
    }

    fn stop_ticker(&mut self) {
        if let MonitorState::Polling { ticker } = std::mem::replace(&mut self.state, MonitorState::Idle) {
            ticker.abort();
        }
    }
}

impl Drop for MonitorClient {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

fn spawn_analyze(
    runtime: &Handle,
    api: Arc<dyn DriftApi>,
    tx: mpsc::UnboundedSender<Outcome>,
    counters: Arc<Counters>,
    trigger: Trigger,
) {
    counters.in_flight.fetch_add(1, Ordering::SeqCst);
    counters.analyze_requests.fetch_add(1, Ordering::SeqCst);
    runtime.spawn(async move {
        let result = api.analyze().await;
        counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        let _ = tx.send(Outcome::Analyzed { trigger, result });
    });
}

/// One-shot capture used by the non-interactive export: preload history
/// (if the profile wants it), analyze once and return the resulting state.
pub async fn capture(api: &dyn DriftApi, profile: Profile) -> Result<Dashboard, ApiError> {
    let mut dashboard = Dashboard::new(profile);

    if profile.preloads_history() {
        match api.history().await {
            Ok(points) => dashboard.seed_history(&points),
            Err(e) => warn!(error = %e, "Failed to load history"),
        }
    }

    let result = api.analyze().await?;
    dashboard.apply(render(&result, profile, &wall_clock_label()));
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    /// Counts calls; analyses wait on `gate` when it is set.
    #[derive(Debug, Default)]
    struct FakeApi {
        analyze_calls: AtomicUsize,
        history_calls: AtomicUsize,
        gate: Option<Semaphore>,
        fail: bool,
    }

    impl FakeApi {
        fn gated() -> Self {
            Self {
                gate: Some(Semaphore::new(0)),
                ..Default::default()
            }
        }

        fn release(&self, n: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(n);
            }
        }

        fn calls(&self) -> usize {
            self.analyze_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DriftApi for FakeApi {
        async fn initialize(&self) -> Result<Baseline, ApiError> {
            if self.fail {
                return Err(ApiError::Connection("refused".into()));
            }
            Ok(Baseline::default())
        }

        async fn analyze(&self) -> Result<AnalysisResult, ApiError> {
            let n = self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            if self.fail {
                return Err(ApiError::Status(500));
            }
            Ok(AnalysisResult {
                average_drift: n as f64,
                total_analyzed: 1,
                ..Default::default()
            })
        }

        async fn history(&self) -> Result<Vec<HistoryPoint>, ApiError> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![HistoryPoint {
                timestamp: "2024-01-01 00:00:00".into(),
                drift_score: 0.5,
            }])
        }

        fn description(&self) -> &str {
            "fake"
        }
    }

    fn client(api: Arc<FakeApi>, overlap: OverlapPolicy) -> MonitorClient {
        let options = MonitorOptions {
            period: Duration::from_secs(2),
            overlap,
        };
        MonitorClient::new(api, options, Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_on_off_before_tick_runs_once() {
        let api = Arc::new(FakeApi::default());
        let mut monitor = client(api.clone(), OverlapPolicy::Concurrent);

        assert!(monitor.toggle_monitoring(true));
        assert!(monitor.toggle_monitoring(false));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(api.calls(), 1);
        assert_eq!(monitor.analyze_requests(), 1);
        assert!(!monitor.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_schedules_every_period() {
        let api = Arc::new(FakeApi::default());
        let mut monitor = client(api.clone(), OverlapPolicy::Concurrent);

        monitor.toggle_monitoring(true);
        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(api.calls(), 3);

        monitor.toggle_monitoring(false);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(api.calls(), 3);

        let mut outcomes = 0;
        while let Some(outcome) = monitor.poll_outcome() {
            assert!(matches!(outcome, Outcome::Analyzed { result: Ok(_), .. }));
            outcomes += 1;
        }
        assert_eq!(outcomes, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_is_idempotent() {
        let api = Arc::new(FakeApi::default());
        let mut monitor = client(api.clone(), OverlapPolicy::Concurrent);

        assert!(!monitor.toggle_monitoring(false));
        assert!(monitor.toggle_monitoring(true));
        assert!(!monitor.toggle_monitoring(true));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_policy_overlaps_requests() {
        let api = Arc::new(FakeApi::gated());
        let mut monitor = client(api.clone(), OverlapPolicy::Concurrent);

        monitor.toggle_monitoring(true);
        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(api.calls(), 3);
        assert_eq!(monitor.in_flight(), 3);
        assert_eq!(monitor.skipped_ticks(), 0);

        monitor.toggle_monitoring(false);
        api.release(3);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_policy_drops_ticks_while_in_flight() {
        let api = Arc::new(FakeApi::gated());
        let mut monitor = client(api.clone(), OverlapPolicy::Skip);

        monitor.toggle_monitoring(true);
        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(api.calls(), 1);
        assert_eq!(monitor.skipped_ticks(), 2);

        // Once the slow request finishes, the next tick goes through.
        api.release(1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.calls(), 2);
        monitor.toggle_monitoring(false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_delivered_after_stop() {
        let api = Arc::new(FakeApi::gated());
        let mut monitor = client(api.clone(), OverlapPolicy::Concurrent);

        monitor.toggle_monitoring(true);
        monitor.toggle_monitoring(false);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(monitor.poll_outcome().is_none());

        api.release(1);
        tokio::time::sleep(Duration::from_millis(10)).await;
        match monitor.poll_outcome() {
            Some(Outcome::Analyzed { trigger, result }) => {
                assert_eq!(trigger, Trigger::Manual);
                assert!(result.is_ok());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_initialize_failure_reported() {
        let api = Arc::new(FakeApi {
            fail: true,
            ..Default::default()
        });
        let mut monitor = client(api, OverlapPolicy::Concurrent);

        monitor.initialize();
        tokio::time::sleep(Duration::from_millis(50)).await;
        match monitor.poll_outcome() {
            Some(Outcome::Initialized(Err(ApiError::Connection(_)))) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_history() {
        let api = Arc::new(FakeApi::default());
        let monitor = client(api.clone(), OverlapPolicy::Concurrent);
        let points = monitor.load_history().await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(api.history_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_capture_extended_seeds_history() {
        let api = FakeApi::default();
        let dashboard = capture(&api, Profile::Extended).await.unwrap();
        assert_eq!(dashboard.chart.len(), 2);
        assert_eq!(dashboard.chart.iter().next().unwrap().label, "00:00:00");
        assert_eq!(dashboard.updates, 1);
    }

    #[tokio::test]
    async fn test_capture_classic_skips_history() {
        let api = FakeApi::default();
        let dashboard = capture(&api, Profile::Classic).await.unwrap();
        assert_eq!(dashboard.chart.len(), 1);
        assert_eq!(api.history_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_capture_propagates_analyze_error() {
        let api = FakeApi {
            fail: true,
            ..Default::default()
        };
        assert!(matches!(capture(&api, Profile::Classic).await, Err(ApiError::Status(500))));
    }
}
