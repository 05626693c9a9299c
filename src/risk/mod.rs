//! Risk interpretation: threshold decision plus clinical decision support text.

mod engine;

pub use engine::{Advisory, CriticalFinding, RiskAssessment, RiskEngine, RiskLevel};
