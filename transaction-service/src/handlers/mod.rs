//! HTTP handlers for transaction-service.

pub mod gateway;
pub mod pages;
pub mod transactions;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::{services::get_metrics, AppState};

/// Liveness probe.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": state.config.service_name,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: succeeds once the database answers.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.repository.health_check().await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
}

/// Database diagnostics: tables, row count and the configured location.
pub async fn test_db(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.repository.stats().await.map_err(|e| {
        tracing::error!(error = %e, "Database test failed");
        e
    })?;

    Ok(Json(json!({
        "status": "Database working correctly",
        "tables": stats.tables,
        "transactionCount": stats.transaction_count,
        "dbUrl": state.config.database.url,
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })))
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
