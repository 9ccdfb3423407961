//! Pure translation of an analysis result into dashboard updates.
//!
//! [`render`] never touches any display state: it returns a [`UiPatch`] that
//! [`Dashboard::apply`](super::Dashboard::apply) commits in one step.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use super::alerts::{qualifying_alerts, Alert};
use super::chart::ChartPoint;
use super::risk::{Forecast, Profile, ThreatReading};
use crate::api::AnalysisResult;

/// Everything one analysis changes on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiPatch {
    pub drift_score: f64,
    /// Added to the running count of analyzed events.
    pub events_delta: u64,
    pub forecast: Forecast,
    pub threat: ThreatReading,
    pub chart_point: ChartPoint,
    /// New alerts in batch order; each is prepended, so the last ends on top.
    pub alerts: Vec<Alert>,
}

/// Build the patch for one analysis, stamped with `label` (wall-clock time).
pub fn render(result: &AnalysisResult, profile: Profile, label: &str) -> UiPatch {
    UiPatch {
        drift_score: result.average_drift,
        events_delta: result.total_analyzed,
        forecast: Forecast::classify(result.forecast_prob, result.drift_slope, profile),
        threat: ThreatReading::from_counts(result.threat_count, result.total_analyzed),
        chart_point: ChartPoint::new(label, result.average_drift),
        alerts: qualifying_alerts(&result.logs, profile, label),
    }
}

/// Current local time as `HH:MM:SS`.
pub fn wall_clock_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Chart label for a server timestamp.
///
/// Timestamps the backend writes (`YYYY-MM-DD HH:MM:SS`, optionally with
/// fractional seconds or a `T` separator) and RFC 3339 strings become
/// `HH:MM:SS`; anything else is shown as-is.
pub fn history_label(timestamp: &str) -> String {
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let ts = timestamp.trim();
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(ts, format) {
            return parsed.format("%H:%M:%S").to_string();
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return parsed.with_timezone(&Local).format("%H:%M:%S").to_string();
    }

    timestamp.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LogEntry;
    use crate::data::risk::{ThreatLevel, Tone};

    fn result() -> AnalysisResult {
        AnalysisResult {
            average_drift: 0.23456,
            total_analyzed: 20,
            threat_count: 3,
            forecast_prob: 25.0,
            drift_slope: 0.01,
            logs: vec![
                LogEntry {
                    is_threat: true,
                    drift_score: 0.9,
                    action_type: "FILE_DELETE".to_string(),
                    ..Default::default()
                },
                LogEntry {
                    is_threat: false,
                    drift_score: 0.2,
                    action_type: "LOGIN".to_string(),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn test_render_extended() {
        let patch = render(&result(), Profile::Extended, "10:15:00");

        assert_eq!(patch.drift_score, 0.23456);
        assert_eq!(patch.events_delta, 20);
        assert_eq!(patch.forecast.label, "WARNING");
        assert_eq!(patch.forecast.description, "Trend: Escalating");
        assert_eq!(patch.threat.level, ThreatLevel::Medium);
        assert_eq!(patch.chart_point, ChartPoint::new("10:15:00", 0.23456));
        assert_eq!(patch.alerts.len(), 1);
        assert_eq!(patch.alerts[0].severity, Tone::Critical);
    }

    #[test]
    fn test_render_classic() {
        let patch = render(&result(), Profile::Classic, "10:15:00");
        assert_eq!(patch.forecast.label, "HIGH RISK");
        assert_eq!(patch.alerts.len(), 1);
        assert_eq!(patch.alerts[0].headline, "HIGH DRIFT DETECTED");
    }

    #[test]
    fn test_render_is_pure() {
        let input = result();
        let a = render(&input, Profile::Extended, "t");
        let b = render(&input, Profile::Extended, "t");
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_empty_batch() {
        let patch = render(&AnalysisResult::default(), Profile::Extended, "t");
        assert_eq!(patch.threat.percent, 0.0);
        assert!(patch.alerts.is_empty());
        assert_eq!(patch.forecast.label, "NORMAL");
    }

    #[test]
    fn test_history_label_formats() {
        assert_eq!(history_label("2024-03-01 14:05:09"), "14:05:09");
        assert_eq!(history_label("2024-03-01 14:05:09.123456"), "14:05:09");
        assert_eq!(history_label("2024-03-01T14:05:09"), "14:05:09");
        assert_eq!(history_label("yesterday"), "yesterday");
    }

    #[test]
    fn test_wall_clock_label_shape() {
        let label = wall_clock_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.as_bytes()[2], b':');
        assert_eq!(label.as_bytes()[5], b':');
    }
}
