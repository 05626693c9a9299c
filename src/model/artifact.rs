//! Artifact loading: read once at startup, fail fast on anything unusable.

use super::gbm::{GradientBoostingArtifact, GradientBoostingClassifier};
use super::logistic::{LogisticArtifact, LogisticRegression};
use super::scaler::{StandardScaler, StandardScalerArtifact};
use super::{Classifier, Scaler};
use crate::config::ArtifactsConfig;
use crate::error::ArtifactError;
use crate::schema::FeatureSchema;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerArtifact {
    StandardScaler(StandardScalerArtifact),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierArtifact {
    GradientBoosting(GradientBoostingArtifact),
    LogisticRegression(LogisticArtifact),
}

/// Hex SHA-256 of artifact bytes, logged so a deployment can be traced to its export.
pub fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn decode<T: for<'de> Deserialize<'de>>(path: &Path, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path) -> impl FnOnce(String) -> ArtifactError + '_ {
    move |reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

pub fn load_scaler(path: &Path) -> Result<Arc<dyn Scaler>, ArtifactError> {
    let bytes = read(path)?;
    let scaler = match decode::<ScalerArtifact>(path, &bytes)? {
        ScalerArtifact::StandardScaler(a) => StandardScaler::from_artifact(a).map_err(invalid(path))?,
    };
    info!(
        path = %path.display(),
        sha256 = %fingerprint(&bytes),
        features = scaler.feature_names().len(),
        "scaler loaded"
    );
    Ok(Arc::new(scaler))
}

pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>, ArtifactError> {
    let bytes = read(path)?;
    let classifier: Arc<dyn Classifier> = match decode::<ClassifierArtifact>(path, &bytes)? {
        ClassifierArtifact::GradientBoosting(a) => {
            let m = GradientBoostingClassifier::from_artifact(a).map_err(invalid(path))?;
            info!(trees = m.n_trees(), "gradient boosting ensemble decoded");
            Arc::new(m)
        }
        ClassifierArtifact::LogisticRegression(a) => {
            Arc::new(LogisticRegression::from_artifact(a).map_err(invalid(path))?)
        }
    };
    info!(
        path = %path.display(),
        sha256 = %fingerprint(&bytes),
        kind = classifier.kind(),
        "classifier loaded"
    );
    Ok(classifier)
}

/// Scaler and classifier, verified against the schema's feature order.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub scaler: Arc<dyn Scaler>,
    pub classifier: Arc<dyn Classifier>,
}

impl ModelArtifacts {
    pub fn load(config: &ArtifactsConfig, schema: &FeatureSchema) -> Result<Self, ArtifactError> {
        let scaler = load_scaler(&config.scaler_path)?;
        let classifier = load_classifier(&config.model_path)?;
        Self::new(scaler, classifier, schema)
    }

    pub fn new(
        scaler: Arc<dyn Scaler>,
        classifier: Arc<dyn Classifier>,
        schema: &FeatureSchema,
    ) -> Result<Self, ArtifactError> {
        check_alignment("scaler", scaler.feature_names(), schema)?;
        check_alignment("classifier", classifier.feature_names(), schema)?;
        Ok(Self { scaler, classifier })
    }
}

fn check_alignment(artifact: &'static str, names: &[String], schema: &FeatureSchema) -> Result<(), ArtifactError> {
    let expected = schema.keys();
    if names.len() != expected.len() || names.iter().zip(&expected).any(|(a, b)| a != b) {
        return Err(ArtifactError::SchemaMismatch {
            artifact,
            expected: expected.iter().map(|k| k.to_string()).collect(),
            found: names.to_vec(),
        });
    }
    Ok(())
}
