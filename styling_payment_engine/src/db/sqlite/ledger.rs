use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{InsertLedgerResult, NewLedgerEntry, PaymentLedgerEntry},
};

const LEDGER_COLUMNS: &str = "id, order_id, payment_id, signature, status, verified, form_id, form_type, created_at";

/// Appends the entry to the ledger, unless an entry with the same order id, payment id and signature already exists.
/// This is not atomic. Embed the call in a transaction if it needs to be.
pub async fn idempotent_insert(
    entry: NewLedgerEntry,
    conn: &mut SqliteConnection,
) -> Result<InsertLedgerResult, SqliteDatabaseError> {
    let result = match fetch_matching_entry(&entry, &mut *conn).await? {
        Some(existing) => {
            debug!(
                "🗃️ Ledger entry #{} already records order {} / payment {}",
                existing.id, existing.order_id, existing.payment_id
            );
            InsertLedgerResult::AlreadyExists(existing)
        },
        None => InsertLedgerResult::Inserted(insert_entry(entry, conn).await?),
    };
    Ok(result)
}

async fn insert_entry(
    entry: NewLedgerEntry,
    conn: &mut SqliteConnection,
) -> Result<PaymentLedgerEntry, SqliteDatabaseError> {
    let sql = format!(
        "INSERT INTO payment_ledger (order_id, payment_id, signature, status, verified, form_id, form_type, \
         created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {LEDGER_COLUMNS}"
    );
    let record = sqlx::query_as::<_, PaymentLedgerEntry>(&sql)
        .bind(&entry.order_id)
        .bind(&entry.payment_id)
        .bind(&entry.signature)
        .bind(entry.status)
        .bind(entry.verified)
        .bind(&entry.form_id)
        .bind(entry.form_type)
        .bind(Utc::now())
        .fetch_all(conn)
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)?;
    trace!("🗃️ Ledger entry #{} written ({})", record.id, record.status);
    Ok(record)
}

async fn fetch_matching_entry(
    entry: &NewLedgerEntry,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentLedgerEntry>, SqliteDatabaseError> {
    let sql = format!(
        "SELECT {LEDGER_COLUMNS} FROM payment_ledger WHERE order_id = $1 AND payment_id = $2 AND signature = $3"
    );
    let record = sqlx::query_as::<_, PaymentLedgerEntry>(&sql)
        .bind(&entry.order_id)
        .bind(&entry.payment_id)
        .bind(&entry.signature)
        .fetch_all(conn)
        .await?
        .pop();
    Ok(record)
}

pub async fn fetch_entries_for_order(
    order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentLedgerEntry>, SqliteDatabaseError> {
    let sql = format!("SELECT {LEDGER_COLUMNS} FROM payment_ledger WHERE order_id = $1 ORDER BY id ASC");
    let entries = sqlx::query_as::<_, PaymentLedgerEntry>(&sql).bind(order_id).fetch_all(conn).await?;
    Ok(entries)
}

pub async fn count_entries(conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payment_ledger").fetch_all(conn).await?.pop();
    Ok(count.unwrap_or_default())
}
