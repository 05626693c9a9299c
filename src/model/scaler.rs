//! Z-score standardization: `(x - mean) / scale` per feature.

use super::{check_dim, Scaler};
use crate::error::ScoringError;
use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct StandardScalerArtifact {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct StandardScaler {
    feature_names: Vec<String>,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(feature_names: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let n = feature_names.len();
        if mean.len() != n || scale.len() != n {
            return Err(format!(
                "{} feature names but {} means and {} scales",
                n,
                mean.len(),
                scale.len()
            ));
        }
        if let Some(i) = mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("non-finite mean for {}", feature_names[i]));
        }
        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s <= 0.0) {
            return Err(format!("scale for {} must be positive", feature_names[i]));
        }
        Ok(Self {
            feature_names,
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    pub(crate) fn from_artifact(a: StandardScalerArtifact) -> Result<Self, String> {
        Self::new(a.feature_names, a.mean, a.scale)
    }
}

impl Scaler for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn transform(&self, features: ArrayView1<'_, f64>) -> Result<Array1<f64>, ScoringError> {
        check_dim("scaler", self.mean.len(), features.len())?;
        Ok((&features - &self.mean) / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn standardizes_each_column() {
        let s = StandardScaler::new(names(2), vec![10.0, 0.5], vec![2.0, 0.5]).unwrap();
        let out = s.transform(array![14.0, 0.0].view()).unwrap();
        assert_eq!(out, array![2.0, -1.0]);
    }

    #[test]
    fn rejects_wrong_width() {
        let s = StandardScaler::new(names(2), vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(
            s.transform(array![1.0, 2.0, 3.0].view()),
            Err(ScoringError::ShapeMismatch {
                stage: "scaler",
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn zero_scale_is_invalid() {
        assert!(StandardScaler::new(names(1), vec![0.0], vec![0.0]).is_err());
        assert!(StandardScaler::new(names(2), vec![0.0], vec![1.0, 1.0]).is_err());
    }
}
