use log::warn;
use sqlx::SqliteConnection;

use crate::{db::sqlite::SqliteDatabaseError, db_types::FallbackVerificationRecord};

pub async fn insert_fallback(
    record: &FallbackVerificationRecord,
    conn: &mut SqliteConnection,
) -> Result<i64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO verification_fallbacks (
                order_id,
                payment_id,
                signature,
                form_id,
                form_type,
                verified,
                error,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8);
        "#,
    )
    .bind(&record.order_id)
    .bind(&record.payment_id)
    .bind(&record.signature)
    .bind(&record.form_id)
    .bind(&record.form_type)
    .bind(record.verified)
    .bind(&record.error)
    .bind(record.created_at)
    .execute(conn)
    .await?;
    let id = result.last_insert_rowid();
    warn!(
        "🗃️ Fallback record #{id} written for order {:?} / payment {:?}. Manual reconciliation required.",
        record.order_id, record.payment_id
    );
    Ok(id)
}

pub async fn fetch_fallbacks(conn: &mut SqliteConnection) -> Result<Vec<FallbackVerificationRecord>, SqliteDatabaseError> {
    let records = sqlx::query_as::<_, FallbackVerificationRecord>(
        r#"
            SELECT order_id, payment_id, signature, form_id, form_type, verified, error, created_at
            FROM verification_fallbacks
            ORDER BY id ASC;
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(records)
}
