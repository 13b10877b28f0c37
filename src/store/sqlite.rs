//! SQLite-backed transaction store (the default backend).
//!
//! One `transactions` table holding exactly the wire columns. Date
//! lookups go through an expression index on the datetime prefix, so
//! `find_by_date` stays indexed without a separate date column.

use crate::domain::{BottleCounts, CustomerTier, Kilograms, Money, SaleDate, SaleId, Transaction};
use crate::store::{codec, StoreError, TransactionStore};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::{info, warn};

/// Store backend over a SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `db_path`, creating the file, schema and
    /// parent directory as needed.
    ///
    /// # Errors
    /// Returns an error if the pool cannot connect or migrations fail.
    pub async fn open(db_path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
            .connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await?;

        run_migrations(&pool).await?;

        info!("sqlite store ready at {}", db_path);
        Ok(SqliteStore { pool })
    }
}

/// Run the schema statements; all are idempotent.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema_sql = include_str!("schema.sql");

    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    Ok(())
}

async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    info!("SQLite journal_mode set to: {}", journal_mode);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

fn decode_row(row: &SqliteRow) -> Result<Transaction, String> {
    let datetime: String = row.get("datetime");
    let timestamp = Transaction::parse_datetime(&datetime)
        .map_err(|e| format!("invalid datetime {:?}: {}", datetime, e))?;
    let tier =
        CustomerTier::try_from(row.get::<i64, _>("customer_type")).map_err(|e| e.to_string())?;

    let qty = |column: &str| -> Result<u32, String> {
        let value: i64 = row.get(column);
        u32::try_from(value).map_err(|_| format!("negative {}: {}", column, value))
    };
    let counts = BottleCounts::new(qty("large_qty")?, qty("medium_qty")?, qty("small_qty")?);

    let price_str: String = row.get("total_price");
    let total_price = Money::from_str_canonical(&price_str)
        .map_err(|e| format!("invalid total_price {:?}: {}", price_str, e))?;
    let gas_str: String = row.get("total_gas");
    let total_gas = Kilograms::from_str_canonical(&gas_str)
        .map_err(|e| format!("invalid total_gas {:?}: {}", gas_str, e))?;

    Ok(Transaction::new(
        SaleId::new(row.get("id")),
        timestamp,
        tier,
        counts,
        total_price,
        total_gas,
    ))
}

/// Decode rows for a query path: a row that cannot be decoded is
/// skipped with a warning instead of failing the whole read.
fn decode_rows_lenient(rows: &[SqliteRow]) -> Vec<Transaction> {
    rows.iter()
        .filter_map(|row| match decode_row(row) {
            Ok(tx) => Some(tx),
            Err(reason) => {
                let id: String = row.get("id");
                warn!(id = %id, reason, "skipping corrupt transactions row");
                None
            }
        })
        .collect()
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn append(&self, tx: &Transaction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, datetime, customer_type, large_qty, medium_qty, small_qty,
                total_price, total_gas
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.id.as_str())
        .bind(tx.datetime_str())
        .bind(tx.customer_tier.as_i64())
        .bind(i64::from(tx.counts.large))
        .bind(i64::from(tx.counts.medium))
        .bind(i64::from(tx.counts.small))
        .bind(tx.total_price.to_canonical_string())
        .bind(tx.total_gas.to_canonical_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, datetime, customer_type, large_qty, medium_qty, small_qty,
                   total_price, total_gas
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some(row) => match decode_row(&row) {
                Ok(tx) => Ok(Some(tx)),
                Err(reason) => {
                    warn!(id = %id, reason, "skipping corrupt transactions row");
                    Ok(None)
                }
            },
        }
    }

    async fn find_by_date(&self, date: SaleDate) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, datetime, customer_type, large_qty, medium_qty, small_qty,
                   total_price, total_gas
            FROM transactions
            WHERE substr(datetime, 1, 10) = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows_lenient(&rows))
    }

    async fn find_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, datetime, customer_type, large_qty, medium_qty, small_qty,
                   total_price, total_gas
            FROM transactions
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows_lenient(&rows))
    }

    async fn delete_by_id(&self, id: &SaleId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn delete_by_date(&self, date: SaleDate) -> Result<u64, StoreError> {
        let mut db_tx = self.pool.begin().await?;

        // A blind delete would drop a row nobody managed to archive.
        // Verify every row for the date decodes before removing any.
        let rows = sqlx::query(
            r#"
            SELECT id, datetime, customer_type, large_qty, medium_qty, small_qty,
                   total_price, total_gas
            FROM transactions
            WHERE substr(datetime, 1, 10) = ?
            "#,
        )
        .bind(date.to_string())
        .fetch_all(&mut *db_tx)
        .await?;
        for row in &rows {
            let id: String = row.get("id");
            decode_row(row).map_err(|reason| StoreError::Corrupt {
                location: format!("transactions row {}", id),
                reason,
            })?;
        }

        let result = sqlx::query("DELETE FROM transactions WHERE substr(datetime, 1, 10) = ?")
            .bind(date.to_string())
            .execute(&mut *db_tx)
            .await?;
        db_tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn oldest_date(&self) -> Result<Option<SaleDate>, StoreError> {
        let row = sqlx::query(
            "SELECT substr(datetime, 1, 10) AS day FROM transactions ORDER BY rowid ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let day: String = row.get("day");
                let date = SaleDate::parse(&day).map_err(|e| StoreError::Corrupt {
                    location: "transactions oldest row".to_string(),
                    reason: format!("invalid datetime prefix {:?}: {}", day, e),
                })?;
                Ok(Some(date))
            }
        }
    }

    async fn dates_present(&self) -> Result<Vec<SaleDate>, StoreError> {
        let rows = sqlx::query(
            "SELECT DISTINCT substr(datetime, 1, 10) AS day FROM transactions ORDER BY day ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut dates = Vec::with_capacity(rows.len());
        for row in &rows {
            let day: String = row.get("day");
            let date = SaleDate::parse(&day).map_err(|e| StoreError::Corrupt {
                location: "transactions".to_string(),
                reason: format!("invalid datetime prefix {:?}: {}", day, e),
            })?;
            dates.push(date);
        }
        Ok(dates)
    }

    async fn rename_to_archive(&self, dest: &Path) -> Result<(), StoreError> {
        let mut db_tx = self.pool.begin().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, datetime, customer_type, large_qty, medium_qty, small_qty,
                   total_price, total_gas
            FROM transactions
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&mut *db_tx)
        .await?;

        // Export is a rewrite: a row we cannot decode must abort, not
        // silently vanish from the archive.
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let tx = decode_row(row).map_err(|reason| StoreError::Corrupt {
                location: format!("transactions row {}", id),
                reason,
            })?;
            records.push(tx);
        }

        codec::write_file_atomic(dest, &records)?;

        sqlx::query("DELETE FROM transactions")
            .execute(&mut *db_tx)
            .await?;
        db_tx.commit().await?;

        Ok(())
    }
}
