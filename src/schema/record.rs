//! Patient record: one validated raw value per schema feature.

use super::{Feature, FeatureDomain, FeatureSchema};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw submitted value before validation. Form fields arrive as text,
/// JSON bodies may carry numbers or booleans.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Immutable mapping from feature key to value, conforming to the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    values: BTreeMap<String, f64>,
}

impl PatientRecord {
    /// Validate raw values against the schema. Every schema feature must be
    /// present and no unknown key is accepted.
    pub fn from_values<K, I>(schema: &FeatureSchema, raw: I) -> Result<Self, ValidationError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, RawValue)>,
    {
        let mut submitted: BTreeMap<String, RawValue> = BTreeMap::new();
        for (key, value) in raw {
            let key = key.as_ref();
            if schema.get(key).is_none() {
                return Err(ValidationError::UnknownFeature(key.to_string()));
            }
            submitted.insert(key.to_string(), value);
        }

        let mut values = BTreeMap::new();
        for feature in schema.features() {
            let raw = submitted
                .remove(feature.key)
                .ok_or_else(|| ValidationError::Missing(feature.key.to_string()))?;
            values.insert(feature.key.to_string(), coerce(feature, raw)?);
        }
        Ok(Self { values })
    }

    /// Form submission: every field is text.
    pub fn from_form<'a, I>(schema: &FeatureSchema, fields: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        Self::from_values(
            schema,
            fields
                .into_iter()
                .map(|(k, v)| (k.as_str(), RawValue::Text(v.clone()))),
        )
    }

    /// Record holding every feature's form default
    pub fn defaults(schema: &FeatureSchema) -> Self {
        let values = schema
            .features()
            .iter()
            .map(|f| (f.key.to_string(), f.domain.default_value()))
            .collect();
        Self { values }
    }

    /// Copy of this record with one value replaced (validated).
    pub fn with(&self, schema: &FeatureSchema, key: &str, value: impl Into<RawValue>) -> Result<Self, ValidationError> {
        let feature = schema
            .get(key)
            .ok_or_else(|| ValidationError::UnknownFeature(key.to_string()))?;
        let mut values = self.values.clone();
        values.insert(key.to_string(), coerce(feature, value.into())?);
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Binary feature answered Yes
    pub fn is_yes(&self, key: &str) -> bool {
        self.get(key) == Some(1.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn coerce(feature: &Feature, raw: RawValue) -> Result<f64, ValidationError> {
    match feature.domain {
        FeatureDomain::Binary { .. } => coerce_binary(feature, raw),
        FeatureDomain::Numeric { min, max, .. } => {
            let value = match raw {
                RawValue::Number(n) => n,
                RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| ValidationError::NotANumber {
                    feature: feature.key.to_string(),
                    value: s.clone(),
                })?,
                RawValue::Bool(b) => {
                    return Err(ValidationError::NotANumber {
                        feature: feature.key.to_string(),
                        value: b.to_string(),
                    })
                }
            };
            if !value.is_finite() || value < min || value > max {
                return Err(ValidationError::OutOfRange {
                    feature: feature.key.to_string(),
                    value,
                    min,
                    max,
                });
            }
            Ok(value)
        }
    }
}

fn coerce_binary(feature: &Feature, raw: RawValue) -> Result<f64, ValidationError> {
    let not_binary = |value: String| ValidationError::NotBinary {
        feature: feature.key.to_string(),
        value,
    };
    match raw {
        RawValue::Bool(b) => Ok(f64::from(u8::from(b))),
        RawValue::Number(n) if n == 0.0 || n == 1.0 => Ok(n),
        RawValue::Number(n) => Err(not_binary(n.to_string())),
        RawValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "1" => Ok(1.0),
            "no" | "0" => Ok(0.0),
            _ => Err(not_binary(s)),
        },
    }
}
