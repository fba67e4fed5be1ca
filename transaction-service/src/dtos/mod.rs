//! Request and response bodies.
//!
//! Every request field is optional: absent values flow through to the store
//! as `NULL`. Numeric fields take numbers or numeric strings (form posts and
//! gateway callbacks send strings), identifiers take strings or numbers.

use secrecy::Secret;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Accepts `500`, `500.5`, `"500"`, or `null`. Unparseable text becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<NumberOrText>::deserialize(deserializer)? {
            Some(NumberOrText::Number(n)) => Some(n),
            Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}

/// Accepts `"R1"` or `12345`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<TextOrNumber>::deserialize(deserializer)? {
            Some(TextOrNumber::Text(s)) => Some(s),
            Some(TextOrNumber::Number(n)) => Some(n.to_string()),
            None => None,
        },
    )
}

/// `POST /check-transaction`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTransactionRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub secret_key: Option<Secret<String>>,
}

/// `POST /add-transaction`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Accepted for compatibility; `paid` is always derived from `status`.
    #[serde(default)]
    pub paid: Option<serde_json::Value>,
}

/// `POST /create-unpaid-transaction`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnpaidTransactionRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `POST /store-payment-details`. `amount` is in cents.
#[derive(Debug, Deserialize)]
pub struct StorePaymentDetailsRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_id: Option<String>,
}

/// `POST /update-payment-status`
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `POST /capture-payment`, the gateway callback. `amount` is in cents.
#[derive(Debug, Deserialize)]
pub struct CapturePaymentRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub merchant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub changes: u64,
}
