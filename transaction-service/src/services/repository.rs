//! SQLite-backed store for transaction records.

use crate::models::{NewTransaction, Transaction, STATUS_PENDING, TRANSACTION_DESCRIPTION};
use crate::services::metrics::record_write;
use chrono::{SecondsFormat, Utc};
use service_core::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

const TRANSACTION_COLUMNS: &str =
    "id, merchantId, referenceNumber, status, paid, amount, name, description, checkedAt";

/// Columns appended after the first release; added on startup when missing.
const ADDITIVE_COLUMNS: [(&str, &str); 3] = [
    ("amount", "REAL"),
    ("name", "TEXT"),
    ("description", "TEXT"),
];

/// Table names and row count, for the diagnostics endpoint.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub tables: Vec<String>,
    pub transaction_count: i64,
}

#[derive(Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

/// ISO-8601 UTC with millisecond precision; sorts lexically by time.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl TransactionRepository {
    /// Open (creating if needed) the SQLite database at `database_url`.
    #[instrument(skip(database_url), fields(service = "transaction-service"))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true);

        // Every connection to `:memory:` is a separate database, so pin the
        // pool to one connection that never expires.
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(Duration::from_secs(30))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::StorageError(anyhow::anyhow!("Failed to open database: {}", e))
        })?;

        info!(in_memory, "SQLite connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `transactions` table and append any missing columns.
    #[instrument(skip(self))]
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                merchantId TEXT,
                referenceNumber TEXT,
                status TEXT,
                paid INTEGER,
                amount REAL,
                name TEXT,
                description TEXT,
                checkedAt TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for (column, column_type) in ADDITIVE_COLUMNS {
            let statement = format!("ALTER TABLE transactions ADD COLUMN {column} {column_type}");
            match sqlx::query(&statement).execute(&self.pool).await {
                Ok(_) => info!(column, "Added column to transactions table"),
                Err(sqlx::Error::Database(db_err))
                    if db_err.message().contains("duplicate column name") => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!("Transactions table ready");
        Ok(())
    }

    /// Check database health with a cheap round-trip.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<StoreStats, AppError> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let transaction_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreStats {
            tables,
            transaction_count,
        })
    }

    /// Insert a new order as `pending` and unpaid.
    #[instrument(skip(self, name))]
    pub async fn create_pending(
        &self,
        merchant_id: Option<String>,
        reference_number: Option<String>,
        amount: Option<f64>,
        name: Option<String>,
    ) -> Result<Transaction, AppError> {
        let new = NewTransaction {
            merchant_id,
            reference_number,
            status: Some(STATUS_PENDING.to_string()),
            amount,
            name,
        };

        self.insert_with(&self.pool, &new, "create_pending").await
    }

    /// Insert a record with the caller's status.
    #[instrument(skip(self, new), fields(reference_number = ?new.reference_number))]
    pub async fn insert(&self, new: &NewTransaction) -> Result<Transaction, AppError> {
        self.insert_with(&self.pool, new, "insert").await
    }

    /// Replace every record sharing `reference_number` with `new`, or insert
    /// it when there is none.
    #[instrument(skip(self, new), fields(reference_number = ?new.reference_number))]
    pub async fn upsert_by_reference(&self, new: &NewTransaction) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        let replaced = sqlx::query("DELETE FROM transactions WHERE referenceNumber = ?")
            .bind(&new.reference_number)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let transaction = self.insert_with(&mut *tx, new, "upsert").await?;

        tx.commit().await?;

        info!(
            id = transaction.id,
            replaced,
            paid = transaction.paid,
            "Transaction upserted"
        );

        Ok(transaction)
    }

    /// Set `status` (and the derived `paid`) on records matching
    /// `reference_number`. Returns the number of rows changed.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        reference_number: Option<&str>,
        status: &str,
    ) -> Result<u64, AppError> {
        let probe = NewTransaction {
            status: Some(status.to_string()),
            ..Default::default()
        };
        let paid = probe.paid();

        let changes = sqlx::query(
            "UPDATE transactions SET status = ?, paid = ?, checkedAt = ? WHERE referenceNumber = ?",
        )
        .bind(status)
        .bind(paid)
        .bind(now_timestamp())
        .bind(reference_number)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if changes > 0 {
            record_write("update_status", paid);
        }

        Ok(changes)
    }

    /// All records, most recently written first.
    pub async fn list_all(&self) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY checkedAt DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Release all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("SQLite connection pool closed");
    }

    async fn insert_with<'e, E>(
        &self,
        executor: E,
        new: &NewTransaction,
        operation: &'static str,
    ) -> Result<Transaction, AppError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let paid = new.paid();

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (merchantId, referenceNumber, status, paid, amount, name, description, checkedAt)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(&new.merchant_id)
        .bind(&new.reference_number)
        .bind(&new.status)
        .bind(paid)
        .bind(new.amount)
        .bind(&new.name)
        .bind(TRANSACTION_DESCRIPTION)
        .bind(now_timestamp())
        .fetch_one(executor)
        .await?;

        record_write(operation, paid);

        Ok(transaction)
    }
}
