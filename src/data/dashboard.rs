//! Dashboard state: the stat tiles, drift chart and alert list.

use std::time::Instant;

use serde::Serialize;

use super::alerts::AlertList;
use super::chart::{ChartBuffer, ChartPoint};
use super::render::{history_label, UiPatch};
use super::risk::{Forecast, Profile, ThreatReading};
use crate::api::HistoryPoint;

/// Everything the dashboard displays, independent of how it is drawn.
///
/// Only [`Dashboard::apply`] and [`Dashboard::seed_history`] mutate it, so a
/// patch is always committed whole.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub profile: Profile,
    /// Latest batch average, `None` until the first analysis lands.
    pub drift_score: Option<f64>,
    /// Running total of analyzed events.
    pub events_total: u64,
    pub forecast: Option<Forecast>,
    pub threat: Option<ThreatReading>,
    pub chart: ChartBuffer,
    pub alerts: AlertList,
    /// Number of analyses applied.
    pub updates: u64,
    #[serde(skip)]
    pub last_updated: Option<Instant>,
}

impl Dashboard {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            drift_score: None,
            events_total: 0,
            forecast: None,
            threat: None,
            chart: ChartBuffer::new(profile.chart_capacity()),
            alerts: AlertList::default(),
            updates: 0,
            last_updated: None,
        }
    }

    /// Commit one rendered analysis.
    pub fn apply(&mut self, patch: UiPatch) {
        self.drift_score = Some(patch.drift_score);
        self.events_total = self.events_total.saturating_add(patch.events_delta);
        self.forecast = Some(patch.forecast);
        self.threat = Some(patch.threat);
        self.chart.push(patch.chart_point);
        for alert in patch.alerts {
            self.alerts.prepend(alert);
        }
        self.updates += 1;
        self.last_updated = Some(Instant::now());
    }

    /// Seed the chart with prior points, in the order given.
    pub fn seed_history(&mut self, points: &[HistoryPoint]) {
        for point in points {
            self.chart
                .push(ChartPoint::new(history_label(&point.timestamp), point.drift_score));
        }
    }

    /// Drift tile text.
    pub fn drift_display(&self) -> String {
        self.drift_score.map(|d| format!("{:.4}", d)).unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalysisResult, LogEntry};
    use crate::data::render::render;

    fn analysis(drift: f64, total: u64, threats: u64) -> AnalysisResult {
        AnalysisResult {
            average_drift: drift,
            total_analyzed: total,
            threat_count: threats,
            forecast_prob: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_accumulates_events() {
        let mut dashboard = Dashboard::new(Profile::Extended);
        dashboard.apply(render(&analysis(0.1, 10, 0), Profile::Extended, "a"));
        dashboard.apply(render(&analysis(0.2, 5, 1), Profile::Extended, "b"));

        assert_eq!(dashboard.events_total, 15);
        assert_eq!(dashboard.drift_display(), "0.2000");
        assert_eq!(dashboard.updates, 2);
        assert_eq!(dashboard.chart.len(), 2);
        assert!(dashboard.last_updated.is_some());
    }

    #[test]
    fn test_chart_bounded_by_profile() {
        let mut dashboard = Dashboard::new(Profile::Classic);
        for i in 0..25 {
            dashboard.apply(render(&analysis(i as f64, 1, 0), Profile::Classic, &format!("t{}", i)));
        }
        assert_eq!(dashboard.chart.len(), 20);
        assert_eq!(dashboard.chart.iter().next().unwrap().label, "t5");
    }

    #[test]
    fn test_alerts_last_of_batch_on_top() {
        let mut result = analysis(0.5, 3, 2);
        result.logs = vec![
            LogEntry {
                is_threat: true,
                drift_score: 0.9,
                action_type: "first".to_string(),
                ..Default::default()
            },
            LogEntry {
                is_threat: true,
                drift_score: 0.8,
                action_type: "second".to_string(),
                ..Default::default()
            },
        ];

        let mut dashboard = Dashboard::new(Profile::Extended);
        dashboard.apply(render(&result, Profile::Extended, "t"));
        assert_eq!(dashboard.alerts.get(0).unwrap().headline, "second");
        assert_eq!(dashboard.alerts.get(1).unwrap().headline, "first");
    }

    #[test]
    fn test_seed_history_preserves_order() {
        let points = vec![
            HistoryPoint {
                timestamp: "2024-01-01 10:00:02".to_string(),
                drift_score: 0.3,
            },
            HistoryPoint {
                timestamp: "2024-01-01 10:00:01".to_string(),
                drift_score: 0.1,
            },
            HistoryPoint {
                timestamp: "2024-01-01 10:00:01".to_string(),
                drift_score: 0.1,
            },
        ];

        let mut dashboard = Dashboard::new(Profile::Extended);
        dashboard.seed_history(&points);

        let labels: Vec<&str> = dashboard.chart.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["10:00:02", "10:00:01", "10:00:01"]);
        assert_eq!(dashboard.updates, 0);
    }

    #[test]
    fn test_empty_dashboard_display() {
        let dashboard = Dashboard::new(Profile::Extended);
        assert_eq!(dashboard.drift_display(), "-");
        assert!(dashboard.forecast.is_none());
        assert_eq!(dashboard.chart.capacity(), 100);
    }
}
