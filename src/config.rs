//! Settings loading.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional settings file (format picked from its extension),
//! 3. `DRIFTWATCH_*` environment variables (e.g. `DRIFTWATCH_URL`).
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! url = "http://10.0.0.5:5000"
//! profile = "classic"
//! interval = "5s"
//! overlap = "skip"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, Map};
use serde::Deserialize;

use crate::api::DEFAULT_BASE_URL;
use crate::data::duration::parse_duration;
use crate::data::Profile;
use crate::monitor::{MonitorOptions, OverlapPolicy};

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL.
    pub url: String,
    pub profile: Profile,
    /// Polling period, as a duration string.
    pub interval: String,
    /// Per-request timeout, as a duration string.
    pub timeout: String,
    pub overlap: OverlapPolicy,
    pub log_file: PathBuf,
    /// Serve analyses from a recorded session instead of `url`.
    pub replay: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            profile: Profile::default(),
            interval: "2s".to_string(),
            timeout: "10s".to_string(),
            overlap: OverlapPolicy::default(),
            log_file: PathBuf::from("driftwatch.log"),
            replay: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    ///
    /// Values are not validated here: command-line flags may still replace
    /// them, so call [`Settings::validate`] once they are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading `DRIFTWATCH_*` variables from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("DRIFTWATCH").source(env))
            .build()
            .context("Failed to load settings")?;

        config.try_deserialize().context("Invalid settings")
    }

    /// Check that the duration strings parse.
    pub fn validate(&self) -> Result<()> {
        self.poll_interval()?;
        self.request_timeout()?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Result<Duration> {
        let interval = parse_duration(&self.interval)
            .with_context(|| format!("Invalid interval '{}'", self.interval))?;
        if interval.is_zero() {
            bail!("Polling interval must be greater than zero");
        }
        Ok(interval)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout).with_context(|| format!("Invalid timeout '{}'", self.timeout))
    }

    pub fn monitor_options(&self) -> Result<MonitorOptions> {
        Ok(MonitorOptions {
            period: self.poll_interval()?,
            overlap: self.overlap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.url, "http://127.0.0.1:5000");
        assert_eq!(settings.profile, Profile::Extended);
        assert_eq!(settings.poll_interval().unwrap(), Duration::from_secs(2));
        assert_eq!(settings.request_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(settings.overlap, OverlapPolicy::Concurrent);
    }

    #[test]
    fn test_load_toml_file() {
        let file = settings_file(
            ".toml",
            r#"
url = "http://drift.internal:8080"
profile = "classic"
interval = "500ms"
overlap = "skip"
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.url, "http://drift.internal:8080");
        assert_eq!(settings.profile, Profile::Classic);
        assert_eq!(settings.poll_interval().unwrap(), Duration::from_millis(500));
        assert_eq!(settings.overlap, OverlapPolicy::Skip);
        // Unset keys keep their defaults.
        assert_eq!(settings.timeout, "10s");
        assert!(settings.replay.is_none());
    }

    #[test]
    fn test_bad_interval_fails_validation() {
        let file = settings_file(".toml", "interval = \"whenever\"\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = settings_file(".toml", "url = \"http://from-file:5000\"\n");
        let mut env = Map::new();
        env.insert("DRIFTWATCH_URL".to_string(), "http://from-env:5000".to_string());

        let settings = Settings::load_with_env(Some(file.path()), Some(env)).unwrap();
        assert_eq!(settings.url, "http://from-env:5000");
    }

    #[test]
    fn test_bad_env_interval_replaced_by_flag() {
        let mut env = Map::new();
        env.insert("DRIFTWATCH_INTERVAL".to_string(), "whenever".to_string());

        let mut settings = Settings::load_with_env(None, Some(env)).unwrap();
        assert_eq!(settings.interval, "whenever");
        assert!(settings.validate().is_err());

        // What `-i 2s` does on top of the loaded settings
        settings.interval = "2s".to_string();
        settings.validate().unwrap();
        assert_eq!(settings.poll_interval().unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let settings = Settings {
            interval: "0s".to_string(),
            ..Default::default()
        };
        assert!(settings.poll_interval().is_err());
    }

    #[test]
    fn test_monitor_options() {
        let settings = Settings {
            interval: "3s".to_string(),
            overlap: OverlapPolicy::Skip,
            ..Default::default()
        };
        let options = settings.monitor_options().unwrap();
        assert_eq!(options.period, Duration::from_secs(3));
        assert_eq!(options.overlap, OverlapPolicy::Skip);
    }
}
