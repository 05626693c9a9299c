//! Compares the model probability with the fixed threshold and maps each
//! ranged feature to its canned advisory.

use crate::config::RiskConfig;
use crate::schema::{Deviation, FeatureSchema, PatientRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    /// Inclusive: a probability equal to the threshold is high risk.
    pub fn from_probability(probability: f64, config: &RiskConfig) -> Self {
        if probability >= config.threshold {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

/// Lab or vital sign compared against its reference interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub feature: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub low: f64,
    pub high: f64,
    pub deviation: Deviation,
    /// None when the value is within range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
}

/// Imaging finding present on this record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalFinding {
    pub feature: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub actions: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub id: Uuid,
    pub probability: f64,
    pub level: RiskLevel,
    pub threshold: f64,
    pub advisories: Vec<Advisory>,
    pub alerts: Vec<CriticalFinding>,
    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    /// Advisories outside their reference range
    pub fn abnormal(&self) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(|a| a.deviation != Deviation::Normal)
    }
}

pub struct RiskEngine {
    config: RiskConfig,
    schema: Arc<FeatureSchema>,
}

impl RiskEngine {
    pub fn new(config: RiskConfig, schema: Arc<FeatureSchema>) -> Self {
        Self { config, schema }
    }

    pub fn assess(&self, probability: f64, record: &PatientRecord) -> RiskAssessment {
        let level = RiskLevel::from_probability(probability, &self.config);

        let advisories = self
            .schema
            .features()
            .iter()
            .filter_map(|f| {
                let range = f.normal_range?;
                let value = record.get(f.key)?;
                let deviation = range.classify(value);
                Some(Advisory {
                    feature: f.key,
                    label: f.label,
                    value,
                    low: range.low,
                    high: range.high,
                    deviation,
                    recommendation: range.advice(deviation),
                })
            })
            .collect();

        let alerts = self
            .schema
            .features()
            .iter()
            .filter(|f| record.is_yes(f.key))
            .filter_map(|f| {
                f.critical_alert.map(|a| CriticalFinding {
                    feature: f.key,
                    title: a.title,
                    heading: a.heading,
                    actions: a.actions,
                })
            })
            .collect();

        RiskAssessment {
            id: Uuid::new_v4(),
            probability,
            level,
            threshold: self.config.threshold,
            advisories,
            alerts,
            assessed_at: Utc::now(),
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}
