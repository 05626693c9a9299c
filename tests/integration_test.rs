//! Integration test: config load, artifact load, scoring, risk interpretation.

use aad_risk::{
    config::{AppConfig, ArtifactsConfig},
    model::{load_classifier, ModelArtifacts},
    risk::RiskLevel,
    schema::{Deviation, FeatureSchema, PatientRecord},
    ArtifactError, Calculator, Error,
};
use std::path::{Path, PathBuf};

const NAMES: [&str; 9] = [
    "CT-lesion involving ascending aorta",
    "NEU",
    "Age",
    "CT-peritoneal effusion",
    "AST",
    "CREA",
    "Escape beat",
    "DBP",
    "CT-intramural hematoma",
];

fn shipped_config() -> AppConfig {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut c = AppConfig::default();
    c.artifacts = ArtifactsConfig {
        scaler_path: root.join("artifacts/scaler.json"),
        model_path: root.join("artifacts/gbm_model.json"),
    };
    c
}

/// Identity scaler plus a logistic model, written to a temp dir
fn write_logistic(dir: &Path, names: &[&str], coef: &[f64], intercept: f64) -> ArtifactsConfig {
    let n = names.len();
    let scaler = serde_json::json!({
        "kind": "standard_scaler",
        "feature_names": names,
        "mean": vec![0.0; n],
        "scale": vec![1.0; n],
    });
    let model = serde_json::json!({
        "kind": "logistic_regression",
        "feature_names": names,
        "coef": coef,
        "intercept": intercept,
    });
    let scaler_path = dir.join("scaler.json");
    let model_path = dir.join("model.json");
    std::fs::write(&scaler_path, scaler.to_string()).unwrap();
    std::fs::write(&model_path, model.to_string()).unwrap();
    ArtifactsConfig {
        scaler_path,
        model_path,
    }
}

#[test]
fn config_load_default() {
    let c = AppConfig::load(Path::new("nonexistent.json")).unwrap();
    assert_eq!(c.risk.threshold, 0.202);
    assert_eq!(c.artifacts.model_path, PathBuf::from("artifacts/gbm_model.json"));
}

#[test]
fn shipped_artifacts_score_default_and_critical_patients() {
    let calc = Calculator::from_config(&shipped_config()).unwrap();
    assert_eq!(calc.model_kind(), "gradient_boosting");
    let schema = calc.schema().clone();

    let baseline = PatientRecord::defaults(&schema);
    let a = calc.evaluate(&baseline).unwrap();
    assert!((a.probability - 0.0522).abs() < 1e-3, "{}", a.probability);
    assert_eq!(a.level, RiskLevel::Low);

    let critical = baseline
        .with(&schema, "CT-lesion involving ascending aorta", "Yes")
        .and_then(|r| r.with(&schema, "CT-intramural hematoma", "Yes"))
        .and_then(|r| r.with(&schema, "CREA", 300.0))
        .unwrap();
    let a = calc.evaluate(&critical).unwrap();
    assert!((a.probability - 0.4875).abs() < 1e-3, "{}", a.probability);
    assert_eq!(a.level, RiskLevel::High);
    assert_eq!(a.alerts.len(), 2);
    let crea = a.advisories.iter().find(|x| x.feature == "CREA").unwrap();
    assert_eq!(crea.deviation, Deviation::AboveNormal);
    assert_eq!(crea.recommendation, Some("Nephrology consult"));
}

#[test]
fn scoring_is_deterministic() {
    let calc = Calculator::from_config(&shipped_config()).unwrap();
    let record = PatientRecord::defaults(calc.schema())
        .with(calc.schema(), "Age", 83.0)
        .unwrap();
    let first = calc.evaluate(&record).unwrap().probability;
    for _ in 0..10 {
        assert_eq!(calc.evaluate(&record).unwrap().probability, first);
    }
}

#[test]
fn probability_stays_in_unit_interval() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.artifacts = write_logistic(dir.path(), &NAMES, &[50.0; 9], 10.0);
    let calc = Calculator::from_config(&config).unwrap();
    let schema = calc.schema().clone();
    let extreme = PatientRecord::defaults(&schema)
        .with(&schema, "CREA", 1000.0)
        .and_then(|r| r.with(&schema, "AST", 500.0))
        .unwrap();
    let p = calc.evaluate(&extreme).unwrap().probability;
    assert!((0.0..=1.0).contains(&p));
    assert_eq!(calc.evaluate(&extreme).unwrap().level, RiskLevel::High);
}

#[test]
fn probability_at_threshold_is_high() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    // all-zero weights: p = sigmoid(0) = 0.5 exactly
    config.artifacts = write_logistic(dir.path(), &NAMES, &[0.0; 9], 0.0);
    config.risk.threshold = 0.5;
    let calc = Calculator::from_config(&config).unwrap();
    let a = calc.evaluate(&PatientRecord::defaults(calc.schema())).unwrap();
    assert_eq!(a.probability, 0.5);
    assert_eq!(a.level, RiskLevel::High);
}

#[test]
fn missing_artifact_is_a_startup_error() {
    let mut config = shipped_config();
    config.artifacts.model_path = PathBuf::from("nonexistent_model.json");
    match Calculator::from_config(&config) {
        Err(Error::Artifact(ArtifactError::Missing(p))) => {
            assert_eq!(p, PathBuf::from("nonexistent_model.json"))
        }
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("calculator built without a model"),
    }
}

#[test]
fn corrupt_artifact_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"\x80\x04\x95 pickled bytes").unwrap();
    assert!(matches!(load_classifier(&path), Err(ArtifactError::Decode { .. })));
}

#[test]
fn reordered_feature_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut swapped = NAMES;
    swapped.swap(1, 2);
    let artifacts = write_logistic(dir.path(), &swapped, &[0.1; 9], 0.0);
    let schema = FeatureSchema::aortic_dissection();
    match ModelArtifacts::load(&artifacts, &schema) {
        Err(ArtifactError::SchemaMismatch { artifact, found, .. }) => {
            assert_eq!(artifact, "scaler");
            assert_eq!(found[1], "Age");
        }
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("misaligned artifacts accepted"),
    }
}

#[test]
fn invalid_threshold_is_a_startup_error() {
    let mut config = shipped_config();
    config.risk.threshold = -0.1;
    assert!(matches!(Calculator::from_config(&config), Err(Error::Config(_))));
}

#[test]
fn one_shot_prints_full_assessment() {
    let calc = Calculator::from_config(&shipped_config()).unwrap();
    let record = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/high_risk_patient.json");
    let mut out = Vec::new();
    let assessment = calc.assess_file(&record, &mut out).unwrap();
    assert_eq!(assessment.level, RiskLevel::High);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1);
    let v: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(v["level"], "high");
    assert_eq!(v["threshold"], 0.202);
    assert_eq!(v["id"], assessment.id.to_string());
    let crea = v["advisories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["feature"] == "CREA")
        .unwrap();
    assert_eq!(crea["recommendation"], "Nephrology consult");
    let actions: Vec<&str> = v["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|a| a["actions"].as_array().unwrap())
        .filter_map(|x| x.as_str())
        .collect();
    assert!(actions.iter().any(|a| a.starts_with("Prepare OR")), "{:?}", actions);
}

#[test]
fn one_shot_reports_invalid_record() {
    let calc = Calculator::from_config(&shipped_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("record.json");
    std::fs::write(&path, r#"{"Age": 60}"#).unwrap();

    let mut out = Vec::new();
    assert!(matches!(calc.assess_file(&path, &mut out), Err(Error::Validation(_))));
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(v["error"].as_str().unwrap().starts_with("missing value for"));
    assert!(v.get("probability").is_none());
}
