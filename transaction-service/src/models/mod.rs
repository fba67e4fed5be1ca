use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Label written to every record's `description` column.
pub const TRANSACTION_DESCRIPTION: &str = "E-WALLET PAYMENT";

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_SUCCESS: &str = "success";

/// Whether a gateway status text means the payment went through.
pub fn is_paid_status(status: Option<&str>) -> bool {
    matches!(status, Some(STATUS_SUCCESS) | Some(STATUS_COMPLETED))
}

/// A row of the `transactions` table.
///
/// Column and JSON names are camelCase. Everything the client supplies is
/// nullable: missing inbound fields are stored as `NULL` rather than rejected.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub merchant_id: Option<String>,
    pub reference_number: Option<String>,
    pub status: Option<String>,
    pub paid: bool,
    /// Major currency units.
    pub amount: Option<f64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub checked_at: Option<String>,
}

/// Caller-supplied fields of a write. `paid`, `description` and `checkedAt`
/// are filled in by the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTransaction {
    pub merchant_id: Option<String>,
    pub reference_number: Option<String>,
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub name: Option<String>,
}

impl NewTransaction {
    pub fn paid(&self) -> bool {
        is_paid_status(self.status.as_deref())
    }
}

/// Convert a gateway amount in cents to major units.
pub fn cents_to_major(cents: f64) -> f64 {
    cents / 100.0
}
