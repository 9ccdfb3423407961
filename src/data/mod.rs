//! Dashboard data models and rendering logic.
//!
//! This module turns backend analysis results into display state without
//! depending on any particular presentation layer.
//!
//! ## Submodules
//!
//! - [`alerts`]: Alert records and the capped alert list
//! - [`chart`]: Bounded FIFO buffer behind the drift chart
//! - [`dashboard`]: The [`Dashboard`] state that patches are applied to
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "2s", "500ms")
//! - [`render`]: Pure [`render`](render::render) from an analysis to a [`UiPatch`]
//! - [`risk`]: Profiles and tier classification
//!
//! ## Data Flow
//!
//! ```text
//! AnalysisResult (raw JSON)
//!        │
//!        ▼
//! render(result, profile, wall-clock label)
//!        │
//!        ▼
//! UiPatch ──▶ Dashboard::apply() ──▶ ChartBuffer / AlertList / tiles
//! ```

pub mod alerts;
pub mod chart;
pub mod dashboard;
pub mod duration;
pub mod render;
pub mod risk;

pub use alerts::{Alert, AlertList, MAX_ALERTS};
pub use chart::{ChartBuffer, ChartPoint};
pub use dashboard::Dashboard;
pub use render::{history_label, render, wall_clock_label, UiPatch};
pub use risk::{Forecast, IntentBadge, Profile, ThreatLevel, ThreatReading, Tone, Trend};
