//! Alert records and the capped, newest-first alert list.

use std::collections::VecDeque;

use serde::Serialize;

use super::risk::{drift_tone, IntentBadge, Profile, Tone};
use crate::api::LogEntry;

/// Maximum number of alerts kept on screen.
pub const MAX_ALERTS: usize = 20;

/// A flagged event, as displayed in the alert list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub headline: String,
    pub badge: Option<IntentBadge>,
    pub user: String,
    /// Wall-clock time at which the dashboard received the event.
    pub observed_at: String,
    pub drift_score: f64,
    pub severity: Tone,
    pub resource_access_count: u64,
    pub login_time: f64,
    pub cmd_complexity: f64,
    pub intent_prediction: String,
}

impl Alert {
    pub fn from_log(log: &LogEntry, profile: Profile, observed_at: &str) -> Self {
        let (headline, badge, severity) = match profile {
            Profile::Classic => ("HIGH DRIFT DETECTED".to_string(), None, Tone::Critical),
            Profile::Extended => {
                let headline = if log.action_type.is_empty() {
                    "Unknown action".to_string()
                } else {
                    log.action_type.replacen("START:", "APP:", 1)
                };
                (
                    headline,
                    Some(IntentBadge::from_prediction(&log.intent_prediction)),
                    drift_tone(log.drift_score),
                )
            }
        };

        Self {
            headline,
            badge,
            user: log.user_id.clone().unwrap_or_else(|| "System".to_string()),
            observed_at: observed_at.to_string(),
            drift_score: log.drift_score,
            severity,
            resource_access_count: log.resource_access_count,
            login_time: log.login_time,
            cmd_complexity: log.cmd_complexity,
            intent_prediction: log.intent_prediction.clone(),
        }
    }
}

/// Select the alerts a batch of log entries produces, in batch order.
pub fn qualifying_alerts(logs: &[LogEntry], profile: Profile, observed_at: &str) -> Vec<Alert> {
    let window = profile.alert_scan_limit().unwrap_or(logs.len()).min(logs.len());
    logs[..window]
        .iter()
        .filter(|log| profile.qualifies(log))
        .map(|log| Alert::from_log(log, profile, observed_at))
        .collect()
}

/// Newest-first list of alerts, capped at a fixed size.
#[derive(Debug, Clone, Serialize)]
pub struct AlertList {
    items: VecDeque<Alert>,
    cap: usize,
}

impl Default for AlertList {
    fn default() -> Self {
        Self::new(MAX_ALERTS)
    }
}

impl AlertList {
    pub fn new(cap: usize) -> Self {
        Self {
            items: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Put an alert on top, dropping the oldest beyond the cap.
    pub fn prepend(&mut self, alert: Alert) {
        self.items.push_front(alert);
        self.items.truncate(self.cap);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Alert> {
        self.items.get(index)
    }

    /// Alerts, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.items.iter()
    }

    /// Number of critical alerts currently listed.
    pub fn critical_count(&self) -> usize {
        self.items.iter().filter(|a| a.severity == Tone::Critical).count()
    }
}
