//! AAD Risk — acute aortic dissection 1-year mortality risk calculator.
//!
//! Modular structure:
//! - [`schema`] — Ordered model inputs, reference ranges, patient records
//! - [`model`] — Scaler and classifier artifacts (JSON exports) and their loader
//! - [`features`] — Record → ordered vector → probability scoring pipeline
//! - [`risk`] — Threshold decision and clinical decision support text
//! - [`calculator`] — Startup wiring and per-request evaluation
//! - [`server`] — Calculator page and JSON endpoint
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod schema;
pub mod model;
pub mod features;
pub mod risk;
pub mod calculator;
pub mod server;
pub mod logging;

pub use config::AppConfig;
pub use error::{ArtifactError, Error, ScoringError, ValidationError};
pub use schema::{FeatureSchema, PatientRecord};
pub use features::{FeatureVector, ScoringPipeline};
pub use model::ModelArtifacts;
pub use risk::{RiskAssessment, RiskEngine, RiskLevel};
pub use calculator::Calculator;
pub use logging::StructuredLogger;
