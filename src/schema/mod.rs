//! Feature schema: the ordered, named model inputs with their value domains,
//! reference ranges and display labels.
//!
//! Feature order is the training column order. Records are projected into a
//! vector by key, never by insertion order.

mod record;

pub use record::{PatientRecord, RawValue};

use serde::Serialize;

/// Value domain of one feature, as offered by the input form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureDomain {
    /// Continuous/integer value within `[min, max]`
    Numeric {
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    },
    /// No/Yes category, encoded 0/1
    Binary { default: bool },
}

impl FeatureDomain {
    pub fn default_value(&self) -> f64 {
        match *self {
            FeatureDomain::Numeric { default, .. } => default,
            FeatureDomain::Binary { default } => f64::from(u8::from(default)),
        }
    }
}

/// Where a value falls relative to a reference interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    BelowNormal,
    Normal,
    AboveNormal,
}

/// Clinical reference interval with the recommendation shown outside it.
/// Used for advisory text only, never for prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalRange {
    pub low: f64,
    pub high: f64,
    pub below_advice: &'static str,
    pub above_advice: &'static str,
}

impl NormalRange {
    /// Inclusive on both ends: `low <= value <= high` is normal.
    pub fn classify(&self, value: f64) -> Deviation {
        if value < self.low {
            Deviation::BelowNormal
        } else if value > self.high {
            Deviation::AboveNormal
        } else {
            Deviation::Normal
        }
    }

    pub fn advice(&self, deviation: Deviation) -> Option<&'static str> {
        match deviation {
            Deviation::BelowNormal => Some(self.below_advice),
            Deviation::AboveNormal => Some(self.above_advice),
            Deviation::Normal => None,
        }
    }
}

/// Imaging finding that demands immediate action when present (binary Yes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalAlert {
    pub title: &'static str,
    pub heading: &'static str,
    pub actions: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Training column name
    pub key: &'static str,
    /// Display label with units
    pub label: &'static str,
    pub domain: FeatureDomain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<NormalRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_alert: Option<CriticalAlert>,
}

impl Feature {
    pub fn numeric(key: &'static str, label: &'static str, min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            key,
            label,
            domain: FeatureDomain::Numeric {
                min,
                max,
                default,
                step,
            },
            normal_range: None,
            critical_alert: None,
        }
    }

    pub fn binary(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            domain: FeatureDomain::Binary { default: false },
            normal_range: None,
            critical_alert: None,
        }
    }

    pub fn with_range(mut self, low: f64, high: f64, below_advice: &'static str, above_advice: &'static str) -> Self {
        self.normal_range = Some(NormalRange {
            low,
            high,
            below_advice,
            above_advice,
        });
        self
    }

    pub fn with_alert(mut self, alert: CriticalAlert) -> Self {
        self.critical_alert = Some(alert);
        self
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.domain, FeatureDomain::Binary { .. })
    }
}

/// Ordered list of model inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    features: Vec<Feature>,
}

impl FeatureSchema {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Acute aortic dissection 1-year mortality model inputs, in training order.
    pub fn aortic_dissection() -> Self {
        Self::new(vec![
            Feature::binary("CT-lesion involving ascending aorta", "CT: Ascending Aorta Lesion").with_alert(
                CriticalAlert {
                    title: "Ascending Aorta Involvement",
                    heading: "Immediate Actions",
                    actions: &[
                        "Call cardiothoracic surgery",
                        "Prepare OR",
                        "Monitor for rupture signs",
                    ],
                },
            ),
            Feature::numeric("NEU", "Neutrophil (10⁹/L)", 0.0, 30.0, 5.0, 0.1)
                .with_range(2.0, 7.5, "Infection screening", "Sepsis protocol"),
            Feature::numeric("Age", "Age (years)", 18.0, 100.0, 60.0, 1.0),
            Feature::binary("CT-peritoneal effusion", "CT: Peritoneal Effusion"),
            Feature::numeric("AST", "AST (U/L)", 0.0, 500.0, 30.0, 1.0)
                .with_range(8.0, 40.0, "Repeat LFTs", "Hepatology consult"),
            Feature::numeric("CREA", "Creatinine (μmol/L)", 30.0, 1000.0, 80.0, 1.0)
                .with_range(64.0, 104.0, "Renal ultrasound", "Nephrology consult"),
            Feature::binary("Escape beat", "ECG: Escape Beat"),
            Feature::numeric("DBP", "Diastolic BP (mmHg)", 30.0, 150.0, 75.0, 1.0)
                .with_range(60.0, 80.0, "Volume assessment", "BP management"),
            Feature::binary("CT-intramural hematoma", "CT: Intramural Hematoma").with_alert(CriticalAlert {
                title: "Intramural Hematoma",
                heading: "Priority Measures",
                actions: &[
                    "Serial CT monitoring",
                    "Strict BP control (SBP <120 mmHg)",
                    "Assess organ perfusion",
                ],
            }),
        ])
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Feature keys in training order
    pub fn keys(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.key).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key == key)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::aortic_dissection()
    }
}
