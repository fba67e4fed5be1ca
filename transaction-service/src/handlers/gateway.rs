//! Gateway status-check proxy.

use axum::{extract::State, Json};
use secrecy::Secret;
use service_core::error::AppError;

use crate::{
    dtos::CheckTransactionRequest, middleware::Payload, services::gateway::StatusCheck, AppState,
};

/// Ask the gateway for a transaction's status and relay its JSON body.
///
/// Missing credentials are sent as empty strings; the gateway rejects them.
pub async fn check_transaction(
    State(state): State<AppState>,
    Payload(payload): Payload<CheckTransactionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let check = StatusCheck {
        merchant_id: payload.merchant_id.unwrap_or_default(),
        reference_number: payload.reference_number.unwrap_or_default(),
        secret_key: payload
            .secret_key
            .unwrap_or_else(|| Secret::new(String::new())),
    };

    tracing::info!(
        merchant_id = %check.merchant_id,
        reference_number = %check.reference_number,
        "Checking transaction status with gateway"
    );

    let body = state.gateway.check_transaction(&check).await?;

    Ok(Json(body))
}
