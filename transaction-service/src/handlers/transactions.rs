//! Transaction record handlers.
//!
//! Bodies are taken loosely: absent fields are stored as `NULL`. `paid` is
//! never read from the request; the repository derives it from `status`.

use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::{
        AddTransactionRequest, CapturePaymentRequest, CreateUnpaidTransactionRequest,
        StorePaymentDetailsRequest, UpdatePaymentStatusRequest, UpdateStatusResponse,
        WriteResponse,
    },
    middleware::Payload,
    models::{cents_to_major, NewTransaction, Transaction, STATUS_COMPLETED, STATUS_PENDING},
    AppState,
};

/// `GET /transactions`: every record, newest first.
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.repository.list_all().await?;

    tracing::debug!(count = transactions.len(), "Fetched transactions");

    Ok(Json(transactions))
}

/// `POST /add-transaction`: insert a record with the given status.
pub async fn add_transaction(
    State(state): State<AppState>,
    Payload(payload): Payload<AddTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let new = NewTransaction {
        merchant_id: payload.merchant_id,
        reference_number: payload.reference_number,
        status: payload.status,
        amount: payload.amount,
        name: payload.name,
    };

    if let Some(requested) = payload.paid.as_ref() {
        let requested_paid = requested.as_bool() == Some(true);
        if requested_paid != new.paid() {
            tracing::warn!(
                reference_number = ?new.reference_number,
                status = ?new.status,
                requested_paid,
                "Ignoring paid flag that disagrees with status"
            );
        }
    }

    let transaction = state.repository.insert(&new).await?;

    tracing::info!(
        id = transaction.id,
        reference_number = ?transaction.reference_number,
        paid = transaction.paid,
        "Transaction added"
    );

    Ok(Json(transaction))
}

/// `POST /create-unpaid-transaction`: record a new order as pending.
pub async fn create_unpaid_transaction(
    State(state): State<AppState>,
    Payload(payload): Payload<CreateUnpaidTransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .repository
        .create_pending(
            payload.merchant_id,
            payload.reference_number,
            payload.amount,
            payload.name,
        )
        .await?;

    tracing::info!(
        id = transaction.id,
        reference_number = ?transaction.reference_number,
        amount = ?transaction.amount,
        "Unpaid transaction created"
    );

    Ok(Json(transaction))
}

/// `POST /store-payment-details`: save an order as pending when the payment
/// button is generated. `amount` arrives in cents.
pub async fn store_payment_details(
    State(state): State<AppState>,
    Payload(payload): Payload<StorePaymentDetailsRequest>,
) -> Result<Json<WriteResponse>, AppError> {
    let new = NewTransaction {
        merchant_id: payload.merchant_id,
        reference_number: payload.order_id,
        status: Some(STATUS_PENDING.to_string()),
        amount: payload.amount.map(cents_to_major),
        name: payload.customer_name,
    };

    let transaction = state.repository.upsert_by_reference(&new).await?;

    tracing::info!(
        id = transaction.id,
        order_id = ?transaction.reference_number,
        customer_name = ?transaction.name,
        amount = ?transaction.amount,
        "Payment details stored"
    );

    Ok(Json(WriteResponse {
        success: true,
        id: transaction.id,
    }))
}

/// `POST /update-payment-status`: status callback for an existing order.
/// A missing status counts as `completed`.
pub async fn update_payment_status(
    State(state): State<AppState>,
    Payload(payload): Payload<UpdatePaymentStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let status = payload
        .status
        .unwrap_or_else(|| STATUS_COMPLETED.to_string());

    let changes = state
        .repository
        .update_status(payload.order_id.as_deref(), &status)
        .await?;

    tracing::info!(
        order_id = ?payload.order_id,
        status = %status,
        changes,
        "Payment status updated"
    );

    Ok(Json(UpdateStatusResponse {
        success: true,
        changes,
    }))
}

/// `POST /capture-payment`: gateway callback carrying the full payment.
/// Replaces any record for the same order. `amount` arrives in cents and a
/// missing amount is stored as 0.
pub async fn capture_payment(
    State(state): State<AppState>,
    Payload(payload): Payload<CapturePaymentRequest>,
) -> Result<Json<WriteResponse>, AppError> {
    let new = NewTransaction {
        merchant_id: payload.merchant_id,
        reference_number: payload.order_id,
        status: Some(
            payload
                .status
                .unwrap_or_else(|| STATUS_PENDING.to_string()),
        ),
        amount: Some(payload.amount.map(cents_to_major).unwrap_or(0.0)),
        name: payload.customer_name,
    };

    let transaction = state.repository.upsert_by_reference(&new).await?;

    tracing::info!(
        id = transaction.id,
        merchant_id = ?transaction.merchant_id,
        order_id = ?transaction.reference_number,
        customer_name = ?transaction.name,
        amount = ?transaction.amount,
        currency = ?payload.currency,
        gateway_description = ?payload.description,
        paid = transaction.paid,
        "Payment captured"
    );

    Ok(Json(WriteResponse {
        success: true,
        id: transaction.id,
    }))
}
