//! Calculator configuration: artifact locations, decision threshold, server and logging.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Serialized scaler and classifier
    pub artifacts: ArtifactsConfig,
    /// Decision threshold
    pub risk: RiskConfig,
    /// HTTP form surface
    pub server: ServerConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Fitted standard scaler (JSON export)
    pub scaler_path: PathBuf,
    /// Fitted classifier (JSON export)
    pub model_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability at or above this is high risk (0.0–1.0).
    /// Fixed per model variant: 0.202 (GBM), 0.2391, 0.482.
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, e.g. "127.0.0.1:8501"
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig::default(),
            risk: RiskConfig::default(),
            server: ServerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from("artifacts/scaler.json"),
            model_path: PathBuf::from("artifacts/gbm_model.json"),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self { threshold: 0.202 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl AppConfig {
    /// Load from JSON file if present; default when absent. A file that
    /// exists but cannot be read or decoded is an error for the caller to report.
    pub fn load(path: &std::path::Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str::<AppConfig>(&data)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let t = self.risk.threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(Error::Config(format!("risk.threshold {} must be within [0, 1]", t)));
        }
        if self.server.bind.trim().is_empty() {
            return Err(Error::Config("server.bind is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "risk": { "threshold": 0.482 } }"#).unwrap();
        let c = AppConfig::load(&path).unwrap();
        assert_eq!(c.risk.threshold, 0.482);
        assert_eq!(c.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn absent_file_is_default() {
        let c = AppConfig::load(std::path::Path::new("no/such/config.json")).unwrap();
        assert_eq!(c.risk.threshold, 0.202);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(Error::Json(_))));

        std::fs::write(&path, r#"{ "risk": { "threshold": "high" } }"#).unwrap();
        assert!(matches!(AppConfig::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let mut c = AppConfig::default();
        assert!(c.validate().is_ok());
        c.risk.threshold = 1.2;
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }
}
