//! Backend API abstraction.
//!
//! The dashboard talks to the drift analytics service through the
//! [`DriftApi`] trait, so the monitor loop does not care whether results
//! come over HTTP ([`HttpApi`]) or from a recorded session ([`ReplayApi`]).

mod http;
mod replay;
mod types;

pub use http::{HttpApi, HttpApiBuilder, DEFAULT_BASE_URL};
pub use replay::{ReplayApi, ReplaySession};
pub use types::{AnalysisResult, Baseline, HistoryPoint, LogEntry};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::ApiError;

/// Trait for the three calls the dashboard makes against the backend.
///
/// # Example
///
/// ```no_run
/// use driftwatch::{DriftApi, HttpApi};
///
/// # tokio_test::block_on(async {
/// let api = HttpApi::builder().base_url("http://127.0.0.1:5000").build().unwrap();
/// let result = api.analyze().await.unwrap();
/// println!("average drift {:.4}", result.average_drift);
/// # });
/// ```
#[async_trait]
pub trait DriftApi: Send + Sync + Debug {
    /// Ask the backend to establish its behavioral baseline.
    async fn initialize(&self) -> Result<Baseline, ApiError>;

    /// Fetch a fresh analysis of recent events.
    async fn analyze(&self) -> Result<AnalysisResult, ApiError>;

    /// Fetch prior chart points, oldest first.
    async fn history(&self) -> Result<Vec<HistoryPoint>, ApiError>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}
