//! Error types for artifact loading, input validation and scoring.

use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. Any of these halts the process before serving.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("{artifact} feature order does not match schema: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        artifact: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Rejected patient input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing value for {0}")]
    Missing(String),

    #[error("unknown feature {0}")]
    UnknownFeature(String),

    #[error("{feature}: {value} is not a number")]
    NotANumber { feature: String, value: String },

    #[error("{feature}: {value} out of range [{min}, {max}]")]
    OutOfRange {
        feature: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{feature}: expected Yes or No, got {value}")]
    NotBinary { feature: String, value: String },
}

/// Per-request inference failures; surfaced to the user, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("record has no value for feature {0}")]
    MissingFeature(String),

    #[error("{stage} expected {expected} features, got {got}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("classifier returned invalid probability {0}")]
    InvalidProbability(f64),
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
