//! Request benchmark: form fields → record → assessment.

use aad_risk::config::{AppConfig, ArtifactsConfig};
use aad_risk::schema::PatientRecord;
use aad_risk::Calculator;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use std::path::Path;

fn calculator() -> Calculator {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut config = AppConfig::default();
    config.artifacts = ArtifactsConfig {
        scaler_path: root.join("artifacts/scaler.json"),
        model_path: root.join("artifacts/gbm_model.json"),
    };
    Calculator::from_config(&config).unwrap()
}

fn form_fields() -> HashMap<String, String> {
    [
        ("CT-lesion involving ascending aorta", "Yes"),
        ("NEU", "12.5"),
        ("Age", "71"),
        ("CT-peritoneal effusion", "No"),
        ("AST", "55"),
        ("CREA", "180"),
        ("Escape beat", "No"),
        ("DBP", "58"),
        ("CT-intramural hematoma", "Yes"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let calc = calculator();
    let record = PatientRecord::defaults(calc.schema());

    c.bench_function("evaluate_default_record", |b| {
        b.iter(|| calc.evaluate(black_box(&record)))
    });
}

fn bench_form_to_assessment(c: &mut Criterion) {
    let calc = calculator();
    let fields = form_fields();

    c.bench_function("form_to_assessment", |b| {
        b.iter(|| {
            let record = calc.record_from_form(black_box(&fields)).unwrap();
            black_box(calc.evaluate(&record))
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_form_to_assessment);
criterion_main!(benches);
