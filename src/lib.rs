// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # driftwatch
//!
//! A terminal dashboard for a behavioral drift analytics service.
//!
//! The backend scores recent user activity against a learned baseline and
//! reports a drift score, threat counts, an intent forecast and the raw log
//! entries behind them. This crate polls that service, turns each response
//! into display state and draws it in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (render) │    │ (draw)  │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐    ┌──────────┐                                │
//! │  │ monitor │───▶│   api    │◀── HttpApi | ReplayApi         │
//! │  │ (poll)  │    │(DriftApi)│                                │
//! │  └─────────┘    └──────────┘                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`api`]**: The [`DriftApi`] trait with an HTTP client and a replay
//!   implementation
//! - **[`monitor`]**: Baseline, on-demand analysis and the periodic poller
//! - **[`data`]**: Pure rendering from an [`AnalysisResult`] to a [`UiPatch`],
//!   and the [`Dashboard`] state patches are applied to
//! - **[`app`]**: Application state, trigger affordances and navigation
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered [`Settings`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a local backend
//! driftwatch
//!
//! # Classic profile against a remote backend, polling every 5 seconds
//! driftwatch --url http://10.0.0.5:5000 --profile classic --interval 5s
//!
//! # Replay a recorded session
//! driftwatch --replay incident.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use driftwatch::{render, AnalysisResult, Dashboard, Profile};
//!
//! let result = AnalysisResult {
//!     average_drift: 0.31,
//!     total_analyzed: 20,
//!     threat_count: 3,
//!     forecast_prob: 25.0,
//!     ..Default::default()
//! };
//!
//! let mut dashboard = Dashboard::new(Profile::Extended);
//! dashboard.apply(render(&result, Profile::Extended, "12:00:00"));
//! assert_eq!(dashboard.forecast.unwrap().label, "WARNING");
//! ```
//!
//! ### Driving the monitor directly
//!
//! ```no_run
//! use std::sync::Arc;
//! use driftwatch::{HttpApi, MonitorClient, MonitorOptions};
//!
//! # tokio_test::block_on(async {
//! let api = HttpApi::builder().build().unwrap();
//! let mut monitor =
//!     MonitorClient::new(Arc::new(api), MonitorOptions::default(), tokio::runtime::Handle::current());
//! monitor.toggle_monitoring(true);
//! while let Some(outcome) = monitor.poll_outcome() {
//!     println!("{:?}", outcome);
//! }
//! # });
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod monitor;
pub mod ui;

// Re-export main types for convenience
pub use api::{
    AnalysisResult, Baseline, DriftApi, HistoryPoint, HttpApi, HttpApiBuilder, LogEntry,
    ReplayApi, ReplaySession,
};
pub use app::{App, Controls, SystemStatus, View};
pub use config::Settings;
pub use data::{render, Alert, AlertList, ChartBuffer, Dashboard, Forecast, Profile, Tone, UiPatch};
pub use error::ApiError;
pub use monitor::{MonitorClient, MonitorOptions, OverlapPolicy, Outcome, Trigger};
