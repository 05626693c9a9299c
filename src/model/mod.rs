//! Fitted model artifacts: feature scaler and probabilistic classifier.
//!
//! Both are exported from the training environment as JSON, loaded once at
//! startup and shared read-only. Every artifact declares its `feature_names`
//! in training order so alignment with the schema is checked by name.

mod artifact;
mod gbm;
mod logistic;
mod scaler;

pub use artifact::{fingerprint, load_classifier, load_scaler, ModelArtifacts};
pub use gbm::{GradientBoostingClassifier, Tree, TreeNode};
pub use logistic::LogisticRegression;
pub use scaler::StandardScaler;

use crate::error::ScoringError;
use ndarray::{Array1, ArrayView1};

/// Fitted feature normalization applied before inference
pub trait Scaler: Send + Sync {
    fn feature_names(&self) -> &[String];

    fn transform(&self, features: ArrayView1<'_, f64>) -> Result<Array1<f64>, ScoringError>;
}

/// Fitted binary classifier
pub trait Classifier: Send + Sync {
    fn feature_names(&self) -> &[String];

    /// Class probabilities `[negative, positive]` for one scaled sample.
    /// The positive class is death within one year.
    fn predict_proba(&self, scaled: ArrayView1<'_, f64>) -> Result<[f64; 2], ScoringError>;

    /// Short model family name for logs and the summary panel
    fn kind(&self) -> &'static str;
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn check_dim(stage: &'static str, expected: usize, got: usize) -> Result<(), ScoringError> {
    if expected != got {
        return Err(ScoringError::ShapeMismatch { stage, expected, got });
    }
    Ok(())
}
