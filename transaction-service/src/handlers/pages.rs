//! HTML views.

use askama::Template;
use axum::{extract::State, response::IntoResponse};
use service_core::error::AppError;

use crate::{
    models::{Transaction, TRANSACTION_DESCRIPTION},
    AppState,
};

#[derive(Template)]
#[template(path = "index.html")]
pub struct LandingTemplate {}

#[derive(Template)]
#[template(path = "transactions.html")]
pub struct TransactionsTemplate {
    pub transactions: Vec<Transaction>,
    pub default_description: &'static str,
}

impl TransactionsTemplate {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            default_description: TRANSACTION_DESCRIPTION,
        }
    }
}

/// `GET /`
pub async fn landing_page() -> impl IntoResponse {
    LandingTemplate {}
}

/// `GET /all-transactions`: every record as an HTML table.
pub async fn all_transactions(
    State(state): State<AppState>,
) -> Result<TransactionsTemplate, AppError> {
    let transactions = state.repository.list_all().await?;

    Ok(TransactionsTemplate::new(transactions))
}
