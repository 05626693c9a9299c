//! Startup wiring (config → artifacts → pipeline + engine) and per-request evaluation.

use crate::config::AppConfig;
use crate::error::{Error, Result, ScoringError, ValidationError};
use crate::features::ScoringPipeline;
use crate::logging::StructuredLogger;
use crate::model::ModelArtifacts;
use crate::risk::{RiskAssessment, RiskEngine, RiskLevel};
use crate::schema::{FeatureSchema, PatientRecord, RawValue};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Read-only after construction; shared by every request.
pub struct Calculator {
    schema: Arc<FeatureSchema>,
    pipeline: ScoringPipeline,
    engine: RiskEngine,
}

impl Calculator {
    /// Load and verify artifacts. Any failure here is fatal for the process.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let schema = Arc::new(FeatureSchema::aortic_dissection());
        let artifacts = ModelArtifacts::load(&config.artifacts, &schema)?;
        Ok(Self::new(schema, artifacts, config))
    }

    pub fn new(schema: Arc<FeatureSchema>, artifacts: ModelArtifacts, config: &AppConfig) -> Self {
        let pipeline = ScoringPipeline::new(schema.clone(), artifacts);
        let engine = RiskEngine::new(config.risk.clone(), schema.clone());
        info!(
            model = pipeline.model_kind(),
            threshold = engine.config().threshold,
            features = schema.len(),
            "calculator ready"
        );
        Self {
            schema,
            pipeline,
            engine,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn threshold(&self) -> f64 {
        self.engine.config().threshold
    }

    pub fn model_kind(&self) -> &'static str {
        self.pipeline.model_kind()
    }

    pub fn record_from_form(&self, fields: &HashMap<String, String>) -> Result<PatientRecord, ValidationError> {
        PatientRecord::from_form(&self.schema, fields)
    }

    pub fn record_from_json(&self, body: HashMap<String, RawValue>) -> Result<PatientRecord, ValidationError> {
        PatientRecord::from_values(&self.schema, body)
    }

    /// Score and interpret one record. Errors leave the calculator usable.
    pub fn evaluate(&self, record: &PatientRecord) -> Result<RiskAssessment, ScoringError> {
        let probability = self.pipeline.score(record).map_err(|e| {
            warn!(error = %e, "scoring failed");
            e
        })?;
        let assessment = self.engine.assess(probability, record);
        info!(
            assessment_id = %assessment.id,
            probability = assessment.probability,
            level = ?assessment.level,
            abnormal = assessment.abnormal().count(),
            alerts = assessment.alerts.len(),
            "risk assessed"
        );
        if assessment.level == RiskLevel::High && !assessment.alerts.is_empty() {
            warn!(assessment_id = %assessment.id, "high risk with critical imaging findings");
        }
        Ok(assessment)
    }

    /// One-shot mode: score the JSON record at `path` and write the full
    /// assessment (or `{"error": ...}`) as one JSON line to `out`.
    pub fn assess_file(&self, path: &Path, out: &mut impl Write) -> Result<RiskAssessment> {
        let outcome = self
            .read_record(path)
            .and_then(|record| Ok(self.evaluate(&record)?));
        match &outcome {
            Ok(assessment) => StructuredLogger::emit_json(assessment, out),
            Err(e) => StructuredLogger::emit_json(&json!({ "error": e.to_string() }), out),
        }
        outcome
    }

    fn read_record(&self, path: &Path) -> Result<PatientRecord> {
        let data = std::fs::read_to_string(path)?;
        let body: HashMap<String, RawValue> = serde_json::from_str(&data)?;
        Ok(self.record_from_json(body)?)
    }
}
