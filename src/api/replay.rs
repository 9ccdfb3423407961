//! Replay of a recorded session.
//!
//! Serves analyses from a JSON file instead of a live backend. Useful for
//! demos and for looking at a captured incident offline.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnalysisResult, Baseline, DriftApi, HistoryPoint};
use crate::error::ApiError;

/// Contents of a replay file.
///
/// ```json
/// { "history": [{"timestamp": "2024-01-01 10:00:00", "drift_score": 0.2}],
///   "analyses": [{"average_drift": 0.2, "total_analyzed": 4, "threat_count": 0,
///                 "forecast_prob": 3.0, "logs": []}] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaySession {
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
    #[serde(default)]
    pub analyses: Vec<AnalysisResult>,
}

/// A [`DriftApi`] that cycles through recorded analyses.
///
/// Each `analyze()` returns the next recorded result, wrapping around at the
/// end. A session without analyses answers like an idle backend: an empty
/// result with nothing analyzed.
#[derive(Debug)]
pub struct ReplayApi {
    session: ReplaySession,
    cursor: AtomicUsize,
    description: String,
}

impl ReplayApi {
    /// Create a replay API from an in-memory session.
    pub fn new(session: ReplaySession, source_description: &str) -> Self {
        Self {
            session,
            cursor: AtomicUsize::new(0),
            description: format!("replay: {}", source_description),
        }
    }

    /// Load a session from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Read error: {}", path.display()))?;
        let session: ReplaySession = serde_json::from_str(&content)
            .with_context(|| format!("Parse error: {}", path.display()))?;
        Ok(Self::new(session, &path.display().to_string()))
    }
}

#[async_trait]
impl DriftApi for ReplayApi {
    async fn initialize(&self) -> Result<Baseline, ApiError> {
        Ok(Baseline {
            status: Some("Replay baseline".to_string()),
            samples: Some(self.session.analyses.len() as u64),
        })
    }

    async fn analyze(&self) -> Result<AnalysisResult, ApiError> {
        if self.session.analyses.is_empty() {
            return Ok(AnalysisResult::default());
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.session.analyses.len();
        Ok(self.session.analyses[index].clone())
    }

    async fn history(&self) -> Result<Vec<HistoryPoint>, ApiError> {
        Ok(self.session.history.clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn analysis(drift: f64) -> AnalysisResult {
        AnalysisResult {
            average_drift: drift,
            total_analyzed: 1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_replay_cycles_analyses() {
        let session = ReplaySession {
            history: Vec::new(),
            analyses: vec![analysis(0.1), analysis(0.2)],
        };
        let api = ReplayApi::new(session, "test");

        assert_eq!(api.analyze().await.unwrap().average_drift, 0.1);
        assert_eq!(api.analyze().await.unwrap().average_drift, 0.2);
        assert_eq!(api.analyze().await.unwrap().average_drift, 0.1);
        assert_eq!(api.description(), "replay: test");
    }

    #[tokio::test]
    async fn test_replay_empty_session() {
        let api = ReplayApi::new(ReplaySession::default(), "empty");
        let result = api.analyze().await.unwrap();
        assert_eq!(result.total_analyzed, 0);
        assert!(api.history().await.unwrap().is_empty());
        assert_eq!(api.initialize().await.unwrap().samples, Some(0));
    }

    #[tokio::test]
    async fn test_replay_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"history": [{{"timestamp": "2024-01-01 10:00:00", "drift_score": 0.25}}],
                "analyses": [{{"average_drift": 0.5, "total_analyzed": 3,
                               "threat_count": 1, "forecast_prob": 12.0}}]}}"#
        )
        .unwrap();

        let api = ReplayApi::load(file.path()).unwrap();
        let history = api.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].drift_score, 0.25);
        assert_eq!(api.analyze().await.unwrap().threat_count, 1);
    }

    #[test]
    fn test_replay_load_missing_file() {
        let err = ReplayApi::load("/nonexistent/session.json").unwrap_err();
        assert!(err.to_string().contains("Read error"));
    }

    #[test]
    fn test_replay_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();
        let err = ReplayApi::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parse error"));
    }
}
