//! Scoring pipeline: record → ordered vector → scaler → classifier → p(death).

use super::FeatureVector;
use crate::error::ScoringError;
use crate::model::ModelArtifacts;
use crate::schema::{FeatureSchema, PatientRecord};
use std::sync::Arc;
use tracing::debug;

pub struct ScoringPipeline {
    schema: Arc<FeatureSchema>,
    artifacts: ModelArtifacts,
}

impl ScoringPipeline {
    pub fn new(schema: Arc<FeatureSchema>, artifacts: ModelArtifacts) -> Self {
        Self { schema, artifacts }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model_kind(&self) -> &'static str {
        self.artifacts.classifier.kind()
    }

    /// Positive-class (death) probability in [0, 1]. Deterministic for a fixed
    /// record and fixed artifacts.
    pub fn score(&self, record: &PatientRecord) -> Result<f64, ScoringError> {
        let features = FeatureVector::project(&self.schema, record)?;
        let scaled = self.artifacts.scaler.transform(features.view())?;
        let [_, positive] = self.artifacts.classifier.predict_proba(scaled.view())?;
        if !(0.0..=1.0).contains(&positive) {
            return Err(ScoringError::InvalidProbability(positive));
        }
        debug!(probability = positive, "record scored");
        Ok(positive)
    }
}
