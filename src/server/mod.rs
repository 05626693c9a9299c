//! HTTP surface: the calculator page and a JSON endpoint over the same pipeline.
//!
//! Each submission is scored synchronously and independently. Per-request
//! failures are rendered as messages; the server keeps serving.

pub mod page;

use crate::calculator::Calculator;
use crate::error::Error;
use crate::schema::RawValue;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use page::Outcome;
use serde_json::json;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

pub fn router(calculator: Arc<Calculator>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(predict_handler))
        .route("/api/v1/assess", post(assess_handler))
        .route("/api/v1/schema", get(schema_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(calculator)
}

/// Serve until Ctrl+C.
pub async fn serve(calculator: Arc<Calculator>, bind: &str) -> Result<(), Error> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| Error::Config(format!("server.bind {}: {}", bind, e)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "calculator listening");
    axum::serve(listener, router(calculator))
        .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// Resolves once the signal fires. If the handler cannot be installed the
/// server runs until killed.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

async fn index_handler(State(calc): State<Arc<Calculator>>) -> Html<String> {
    Html(page::render(calc.schema(), calc.threshold(), None, Outcome::Empty))
}

async fn predict_handler(
    State(calc): State<Arc<Calculator>>,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let record = match calc.record_from_form(&fields) {
        Ok(r) => r,
        Err(e) => {
            let msg = e.to_string();
            return (StatusCode::UNPROCESSABLE_ENTITY, render(&calc, &fields, Outcome::Invalid(&msg)));
        }
    };
    match calc.evaluate(&record) {
        Ok(assessment) => (StatusCode::OK, render(&calc, &fields, Outcome::Assessed(&assessment))),
        Err(e) => {
            let msg = e.to_string();
            (StatusCode::INTERNAL_SERVER_ERROR, render(&calc, &fields, Outcome::Failed(&msg)))
        }
    }
}

fn render(calc: &Calculator, fields: &HashMap<String, String>, outcome: Outcome<'_>) -> Html<String> {
    Html(page::render(calc.schema(), calc.threshold(), Some(fields), outcome))
}

async fn assess_handler(
    State(calc): State<Arc<Calculator>>,
    payload: Result<Json<HashMap<String, RawValue>>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, &rejection.body_text()),
    };
    let record = match calc.record_from_json(body) {
        Ok(r) => r,
        Err(e) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    };
    match calc.evaluate(&record) {
        Ok(assessment) => Json(assessment).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn schema_handler(State(calc): State<Arc<Calculator>>) -> impl IntoResponse {
    Json(calc.schema().clone())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn shutdown_follows_the_signal() {
        let done = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown(async { Ok(()) })).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn failed_signal_handler_keeps_serving() {
        let signal = async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal support")) };
        let done = tokio::time::timeout(Duration::from_millis(50), wait_for_shutdown(signal)).await;
        assert!(done.is_err());
    }
}
