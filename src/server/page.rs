//! HTML rendering for the calculator page: parameter form, model summary,
//! result panel and the clinical pathway footer.

use crate::risk::{RiskAssessment, RiskLevel};
use crate::schema::{Deviation, Feature, FeatureDomain, FeatureSchema};
use std::collections::HashMap;
use std::fmt::Write;

/// What the result panel shows
pub enum Outcome<'a> {
    Empty,
    Assessed(&'a RiskAssessment),
    Invalid(&'a str),
    Failed(&'a str),
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(
    schema: &FeatureSchema,
    threshold: f64,
    submitted: Option<&HashMap<String, String>>,
    outcome: Outcome<'_>,
) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
        "<title>Aortic Dissection Mortality Predictor</title>\n<style>\n",
        "body{font-family:sans-serif;margin:0;display:flex}\n",
        "aside{width:320px;padding:16px;background:#f0f2f6;min-height:100vh}\n",
        "main{flex:1;padding:16px 32px}\n",
        ".cols{display:flex;gap:32px}.col1{flex:1}.col2{flex:2}\n",
        "label{display:block;margin-top:10px;font-size:14px}\n",
        "input,select{width:100%}\n",
        ".box{padding:10px;border-radius:5px;margin:10px 0}\n",
        "</style>\n</head>\n<body>\n"
    ));

    render_form(&mut html, schema, submitted);

    html.push_str("<main>\n<div class=\"cols\">\n<section class=\"col1\">\n");
    html.push_str(concat!(
        "<h2>Aortic Dissection Mortality Predictor</h2>\n",
        "<p><strong>Multimodal Model Integrating:</strong></p>\n",
        "<ul><li>CT Radiomics Features</li><li>Electrocardiographic Biomarkers</li>",
        "<li>Clinical Laboratory Data</li></ul>\n",
        "<p><strong>Validation Metrics:</strong></p>\n",
        "<ul><li>AUC: 0.89 (0.84-0.94)</li><li>Accuracy: 88.05%</li>",
        "<li>F1-score: 0.65</li><li>Brier Score: 0.10</li></ul>\n",
        "</section>\n<section class=\"col2\">\n"
    ));

    match outcome {
        Outcome::Empty => {}
        Outcome::Assessed(a) => render_assessment(&mut html, a),
        Outcome::Invalid(msg) => {
            let _ = writeln!(
                html,
                "<div class=\"box\" style=\"background-color:#fff3cd\">Invalid input: {}</div>",
                escape(msg)
            );
        }
        Outcome::Failed(msg) => {
            let _ = writeln!(
                html,
                "<div class=\"box\" style=\"background-color:#f8d7da\">System Error: {}</div>",
                escape(msg)
            );
        }
    }

    html.push_str("</section>\n</div>\n<hr>\n");
    render_pathway(&mut html, threshold);
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, schema: &FeatureSchema, submitted: Option<&HashMap<String, String>>) {
    html.push_str("<aside>\n<h2>Patient Parameters</h2>\n<form method=\"post\" action=\"/predict\">\n");
    let current = |f: &Feature| submitted.and_then(|s| s.get(f.key)).cloned();

    // categorical findings first, then continuous values
    let (binary, numeric): (Vec<&Feature>, Vec<&Feature>) = schema.features().iter().partition(|f| f.is_binary());
    for f in binary {
        let yes = match current(f) {
            Some(v) => v.eq_ignore_ascii_case("yes") || v == "1",
            None => f.domain.default_value() == 1.0,
        };
        let _ = writeln!(
            html,
            "<label>{label}<select name=\"{key}\"><option{no_sel}>No</option><option{yes_sel}>Yes</option></select></label>",
            label = escape(f.label),
            key = escape(f.key),
            no_sel = if yes { "" } else { " selected" },
            yes_sel = if yes { " selected" } else { "" },
        );
    }
    for f in numeric {
        if let FeatureDomain::Numeric { min, max, default, step } = f.domain {
            let value = current(f).unwrap_or_else(|| default.to_string());
            let _ = writeln!(
                html,
                "<label>{label}<input type=\"number\" name=\"{key}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\"></label>",
                label = escape(f.label),
                key = escape(f.key),
                value = escape(&value),
            );
        }
    }
    html.push_str("<p><button type=\"submit\">Predict Risk</button></p>\n</form>\n</aside>\n");
}

fn render_assessment(html: &mut String, a: &RiskAssessment) {
    let color = match a.level {
        RiskLevel::High => "red",
        RiskLevel::Low => "green",
    };
    let _ = writeln!(
        html,
        "<h3>Prediction Result: <span style=\"color:{}\">{}</span></h3>\n<h5>1-Year Mortality Probability: {:.1}%</h5>",
        color,
        a.level.label(),
        a.probability * 100.0
    );

    html.push_str("<h3>Clinical Decision Support</h3>\n");
    for adv in a.abnormal() {
        let (bg, tag, verb) = match adv.deviation {
            Deviation::BelowNormal => ("#fff3cd", "Low", "Recommended"),
            _ => ("#f8d7da", "High", "Required"),
        };
        let _ = writeln!(
            html,
            "<div class=\"box\" style=\"background-color:{}\">&#9888;&#65039; <strong>{}</strong>: {} ({})<br>{}: {}</div>",
            bg,
            escape(adv.label),
            adv.value,
            tag,
            verb,
            escape(adv.recommendation.unwrap_or_default()),
        );
    }

    for alert in &a.alerts {
        let _ = write!(
            html,
            "<div class=\"box\" style=\"background-color:#dc3545;color:white\">&#128680; <strong>{}</strong><br>{}:<ol>",
            escape(alert.title),
            escape(alert.heading)
        );
        for action in alert.actions {
            let _ = write!(html, "<li>{}</li>", escape(action));
        }
        html.push_str("</ol></div>\n");
    }
}

fn render_pathway(html: &mut String, threshold: f64) {
    let _ = writeln!(
        html,
        concat!(
            "<p><strong>Clinical Pathway Protocol</strong></p>\n<ol>\n",
            "<li><strong>High Risk Criteria</strong>:<ul><li>Probability &ge;{:.1}%</li>",
            "<li>Any aortic lesion/hematoma</li><li>Requires ICU admission</li></ul></li>\n",
            "<li><strong>Surgical Indications</strong>:<ul>",
            "<li>Ascending aorta involvement &rarr; Emergency surgery</li>",
            "<li>Rapid hematoma expansion &rarr; Endovascular repair</li></ul></li>\n",
            "<li><strong>Laboratory Alert Levels</strong>:<ul>",
            "<li>Creatinine &gt;200 &mu;mol/L &rarr; Renal consult</li>",
            "<li>AST &gt;3&times;ULN &rarr; Hepatic workup</li></ul></li>\n",
            "<li><strong>Monitoring Protocol</strong>:<ul><li>Hourly vital signs</li>",
            "<li>4-hourly neurovascular checks</li><li>Daily CT for first 72hrs</li></ul></li>\n",
            "</ol>"
        ),
        threshold * 100.0
    );
}
