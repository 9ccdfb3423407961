//! Risk classification: dashboard profiles, forecast tiers, threat tiers.
//!
//! All boundaries are strict `>` comparisons, so a value sitting exactly on
//! a boundary falls into the lower tier.

use serde::{Deserialize, Serialize};

use crate::api::LogEntry;

/// Forecast slope above which drift is reported as escalating.
const SLOPE_EPSILON: f64 = 0.005;

/// Alert entries above this drift score are shown as critical.
const CRITICAL_DRIFT: f64 = 0.7;

/// Dashboard behavior preset.
///
/// `Classic` matches the first generation of the drift service (short chart,
/// only confirmed threats become alerts). `Extended` adds trend reporting,
/// history preload and high-drift alerts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Classic,
    #[default]
    Extended,
}

impl Profile {
    /// Maximum number of points kept in the drift chart.
    pub fn chart_capacity(self) -> usize {
        match self {
            Profile::Classic => 20,
            Profile::Extended => 100,
        }
    }

    /// `(warning, critical)` forecast probability boundaries, in percent.
    pub fn forecast_bounds(self) -> (f64, f64) {
        match self {
            Profile::Classic => (10.0, 20.0),
            Profile::Extended => (20.0, 50.0),
        }
    }

    /// Whether prior chart points are fetched at startup.
    pub fn preloads_history(self) -> bool {
        matches!(self, Profile::Extended)
    }

    /// How many log entries of each batch are considered for alerts.
    pub fn alert_scan_limit(self) -> Option<usize> {
        match self {
            Profile::Classic => None,
            Profile::Extended => Some(3),
        }
    }

    /// Whether a log entry is worth an alert.
    pub fn qualifies(self, log: &LogEntry) -> bool {
        match self {
            Profile::Classic => log.is_threat,
            Profile::Extended => log.is_threat || log.drift_score > 0.4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Profile::Classic => "classic",
            Profile::Extended => "extended",
        }
    }
}

/// Severity tone shared by every tile, bar and alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Normal,
    Warning,
    Critical,
}

/// Direction of recent drift, from the backend's slope estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Escalating,
    Subsiding,
    Stable,
}

impl Trend {
    pub fn from_slope(slope: f64) -> Self {
        if slope > SLOPE_EPSILON {
            Trend::Escalating
        } else if slope < -SLOPE_EPSILON {
            Trend::Subsiding
        } else {
            Trend::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Escalating => "Escalating",
            Trend::Subsiding => "Subsiding",
            Trend::Stable => "Stable",
        }
    }
}

/// Classified intent forecast, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub label: &'static str,
    pub tone: Tone,
    pub description: String,
    pub probability: f64,
    pub trend: Option<Trend>,
}

impl Forecast {
    /// Classify a forecast probability (percent) under the given profile.
    pub fn classify(probability: f64, slope: f64, profile: Profile) -> Self {
        let (warn, crit) = profile.forecast_bounds();
        let tone = if probability > crit {
            Tone::Critical
        } else if probability > warn {
            Tone::Warning
        } else {
            Tone::Normal
        };

        match profile {
            Profile::Classic => {
                let (label, description) = match tone {
                    Tone::Critical => ("HIGH RISK", "Prediction: Imminent Threat"),
                    Tone::Warning => ("CAUTION", "Prediction: Increasing Drift"),
                    Tone::Normal => ("NORMAL", "Prediction: No Threat"),
                };
                Self {
                    label,
                    tone,
                    description: description.to_string(),
                    probability,
                    trend: None,
                }
            }
            Profile::Extended => {
                let trend = Trend::from_slope(slope);
                let (label, description) = match tone {
                    Tone::Critical => ("CRITICAL", format!("Trend: {} (High Risk)", trend.label())),
                    Tone::Warning => ("WARNING", format!("Trend: {}", trend.label())),
                    Tone::Normal => ("NORMAL", format!("Trend: {}", trend.label())),
                };
                Self {
                    label,
                    tone,
                    description,
                    probability,
                    trend: Some(trend),
                }
            }
        }
    }
}

/// Share of analyzed events flagged as threats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn classify(percent: f64) -> Self {
        if percent > 15.0 {
            ThreatLevel::High
        } else if percent > 5.0 {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ThreatLevel::Low => Tone::Normal,
            ThreatLevel::Medium => Tone::Warning,
            ThreatLevel::High => Tone::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MED",
            ThreatLevel::High => "HIGH",
        }
    }
}

/// Threat probability reading for the progress tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThreatReading {
    pub percent: f64,
    pub level: ThreatLevel,
}

impl ThreatReading {
    /// Percentage of threats in a batch; an empty batch reads as 0%.
    pub fn from_counts(threat_count: u64, total_analyzed: u64) -> Self {
        let percent = if total_analyzed == 0 {
            0.0
        } else {
            threat_count as f64 * 100.0 / total_analyzed as f64
        };
        Self {
            percent,
            level: ThreatLevel::classify(percent),
        }
    }

    /// Progress bar fill in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn display(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Badge shown next to an alert, from the backend's intent prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntentBadge {
    Exfiltration,
    PrivilegeEscalation,
    BotActivity,
    Anomaly,
}

impl IntentBadge {
    pub fn from_prediction(prediction: &str) -> Self {
        match prediction {
            "Data Exfiltration" => IntentBadge::Exfiltration,
            "Privilege Escalation" => IntentBadge::PrivilegeEscalation,
            "Automated Attack / Bot" => IntentBadge::BotActivity,
            _ => IntentBadge::Anomaly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntentBadge::Exfiltration => "Exfiltration",
            IntentBadge::PrivilegeEscalation => "Priv Escalation",
            IntentBadge::BotActivity => "Bot Activity",
            IntentBadge::Anomaly => "Anomaly",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            IntentBadge::Exfiltration | IntentBadge::PrivilegeEscalation => Tone::Critical,
            IntentBadge::BotActivity => Tone::Warning,
            IntentBadge::Anomaly => Tone::Normal,
        }
    }
}

/// Tone for an alert's drift score.
pub fn drift_tone(drift_score: f64) -> Tone {
    if drift_score > CRITICAL_DRIFT {
        Tone::Critical
    } else {
        Tone::Warning
    }
}
