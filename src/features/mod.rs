//! Model input vectors and the scoring pipeline.

mod pipeline;

pub use pipeline::ScoringPipeline;

use crate::error::ScoringError;
use crate::schema::{FeatureSchema, PatientRecord};
use ndarray::ArrayView1;
use serde::Serialize;

/// Record values laid out in training column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub names: Vec<&'static str>,
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Project a record by feature key. Never relies on the record's own ordering.
    pub fn project(schema: &FeatureSchema, record: &PatientRecord) -> Result<Self, ScoringError> {
        let names = schema.keys();
        let values = names
            .iter()
            .map(|k| record.get(k).ok_or_else(|| ScoringError::MissingFeature(k.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { names, values })
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }
}
