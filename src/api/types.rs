//! Wire types for the drift analytics API.
//!
//! These match the JSON produced by the backend's `/api/initialize`,
//! `/api/analyze` and `/api/history` endpoints.

use serde::{Deserialize, Serialize};

/// Result of one `/api/analyze` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Mean drift score across the analyzed batch.
    pub average_drift: f64,
    /// Number of events in the batch.
    pub total_analyzed: u64,
    /// Number of events flagged as threats.
    pub threat_count: u64,
    /// Backend-estimated likelihood (percent) of an escalating threat.
    pub forecast_prob: f64,
    /// Slope of recent drift scores. Older backends omit it.
    #[serde(default)]
    pub drift_slope: f64,
    /// Per-event records, highest drift first.
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// A single analyzed event.
///
/// Only `is_threat` and `drift_score` are guaranteed; the backend adds the
/// remaining fields when it has them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub is_threat: bool,
    pub drift_score: f64,
    #[serde(default)]
    pub login_time: f64,
    #[serde(default)]
    pub cmd_complexity: f64,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub resource_access_count: u64,
    #[serde(default)]
    pub intent_prediction: String,
}

/// One prior chart point from `/api/history`.
///
/// Some backends return raw baseline event records here, with extra fields
/// and no score. Those still seed a labelled point, at zero drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Server timestamp, usually `YYYY-MM-DD HH:MM:SS`.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub drift_score: f64,
}

/// Acknowledgement returned by `/api/initialize`.
///
/// The endpoint may return any JSON; the known fields are picked out when
/// present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Baseline {
    pub status: Option<String>,
    pub samples: Option<u64>,
}

impl Baseline {
    /// Extract the known fields from an arbitrary JSON value.
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self {
            status: value.get("status").and_then(|v| v.as_str()).map(str::to_string),
            samples: value.get("samples").and_then(|v| v.as_u64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_analysis() {
        let json = r#"{
            "threat_count": 2,
            "average_drift": 0.3125,
            "forecast_prob": 42.5,
            "drift_slope": 0.01,
            "total_analyzed": 8,
            "logs": [
                {
                    "is_threat": true,
                    "drift_score": 0.81,
                    "login_time": 3,
                    "cmd_complexity": 0.77,
                    "action_type": "START:powershell.exe",
                    "user_id": "alice",
                    "resource_access_count": 14,
                    "intent_prediction": "Privilege Escalation",
                    "timestamp": "2024-01-01 03:00:00",
                    "hour": 3
                }
            ]
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.total_analyzed, 8);
        assert_eq!(result.threat_count, 2);
        assert_eq!(result.logs.len(), 1);

        let log = &result.logs[0];
        assert!(log.is_threat);
        assert_eq!(log.login_time, 3.0);
        assert_eq!(log.user_id.as_deref(), Some("alice"));
        assert_eq!(log.resource_access_count, 14);
    }

    #[test]
    fn test_deserialize_classic_analysis() {
        // Classic backend: no slope, sparse log entries, null user.
        let json = r#"{
            "threat_count": 0,
            "average_drift": 0.0,
            "forecast_prob": 0.0,
            "total_analyzed": 0,
            "logs": [{"is_threat": false, "drift_score": 0.1, "user_id": null}]
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.drift_slope, 0.0);
        assert_eq!(result.logs[0].user_id, None);
        assert_eq!(result.logs[0].action_type, "");
    }

    #[test]
    fn test_history_accepts_raw_event_records() {
        let json = r#"[
            {"timestamp": "2024-01-01 09:00:00", "user_id": "alice", "action_type": "LOGIN",
             "hour": 9, "day_of_week": 0, "resource_access_count": 2},
            {"timestamp": "2024-01-01 09:00:05", "drift_score": 0.35}
        ]"#;

        let points: Vec<HistoryPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, "2024-01-01 09:00:00");
        assert_eq!(points[0].drift_score, 0.0);
        assert_eq!(points[1].drift_score, 0.35);
    }

    #[test]
    fn test_baseline_from_value() {
        let value = serde_json::json!({"status": "Baseline established", "samples": 420});
        let baseline = Baseline::from_value(&value);
        assert_eq!(baseline.status.as_deref(), Some("Baseline established"));
        assert_eq!(baseline.samples, Some(420));

        let empty = Baseline::from_value(&serde_json::json!({}));
        assert_eq!(empty, Baseline::default());

        let odd = Baseline::from_value(&serde_json::json!([1, 2, 3]));
        assert_eq!(odd, Baseline::default());
    }
}
