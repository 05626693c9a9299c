//! Linear model variant: `p(death) = sigmoid(coef · x + intercept)`.

use super::{check_dim, sigmoid, Classifier};
use crate::error::ScoringError;
use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct LogisticArtifact {
    pub feature_names: Vec<String>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    feature_names: Vec<String>,
    coef: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(feature_names: Vec<String>, coef: Vec<f64>, intercept: f64) -> Result<Self, String> {
        if coef.len() != feature_names.len() {
            return Err(format!(
                "{} feature names but {} coefficients",
                feature_names.len(),
                coef.len()
            ));
        }
        if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
            return Err("non-finite coefficient".into());
        }
        Ok(Self {
            feature_names,
            coef: Array1::from(coef),
            intercept,
        })
    }

    pub(crate) fn from_artifact(a: LogisticArtifact) -> Result<Self, String> {
        Self::new(a.feature_names, a.coef, a.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, scaled: ArrayView1<'_, f64>) -> Result<[f64; 2], ScoringError> {
        check_dim("classifier", self.coef.len(), scaled.len())?;
        let p = sigmoid(self.coef.dot(&scaled) + self.intercept);
        Ok([1.0 - p, p])
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}
