//! Queries against the per-service booking collections.
//!
//! Table names come from [`FormType::collection`], a closed set of constants, and are never taken from user input.
use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{BookingPaymentUpdate, BookingRecord, BookingStatus, FormType, NewBookingRequest},
};

const BOOKING_COLUMNS: &str = "id, customer_name, email, phone, details, status, payment_id, order_id, \
                               payment_verified, payment_date, created_at, updated_at";

/// Generates a 24-hex-digit booking id.
pub fn new_booking_id() -> String {
    hex::encode(rand::random::<[u8; 12]>())
}

pub async fn insert_booking(
    form_type: FormType,
    request: NewBookingRequest,
    conn: &mut SqliteConnection,
) -> Result<BookingRecord, SqliteDatabaseError> {
    let id = new_booking_id();
    let details = request.details.as_ref().map(serde_json::to_string).transpose()?;
    let now = Utc::now();
    let sql = format!(
        "INSERT INTO {} (id, customer_name, email, phone, details, status, payment_verified, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8) RETURNING {BOOKING_COLUMNS}",
        form_type.collection()
    );
    let record = sqlx::query_as::<_, BookingRecord>(&sql)
        .bind(&id)
        .bind(&request.customer_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(details)
        .bind(BookingStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_all(conn)
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)?;
    debug!("🗃️ New {form_type} booking saved with id {id}");
    Ok(record)
}

pub async fn fetch_booking(
    form_type: FormType,
    form_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<BookingRecord>, SqliteDatabaseError> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM {} WHERE id = $1", form_type.collection());
    let record = sqlx::query_as::<_, BookingRecord>(&sql).bind(form_id).fetch_all(conn).await?.pop();
    Ok(record)
}

/// Writes the payment fields of `update` to the booking it refers to, and returns the updated record.
///
/// The booking is fetched first. If it does not exist, nothing is written and `None` is returned.
pub async fn apply_payment_update(
    update: &BookingPaymentUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<BookingRecord>, SqliteDatabaseError> {
    if fetch_booking(update.form_type, &update.form_id, &mut *conn).await?.is_none() {
        trace!("🗃️ No {} booking with id {} exists", update.form_type, update.form_id);
        return Ok(None);
    }
    let now = Utc::now();
    let sql = format!(
        "UPDATE {} SET status = $1, payment_id = $2, order_id = $3, payment_verified = $4, payment_date = $5, \
         updated_at = $6 WHERE id = $7",
        update.form_type.collection()
    );
    sqlx::query(&sql)
        .bind(update.status())
        .bind(&update.payment_id)
        .bind(&update.order_id)
        .bind(update.verified)
        .bind(now)
        .bind(now)
        .bind(&update.form_id)
        .execute(&mut *conn)
        .await?;
    debug!(
        "🗃️ {} booking {} is now {} (payment {})",
        update.form_type,
        update.form_id,
        update.status(),
        update.payment_id
    );
    fetch_booking(update.form_type, &update.form_id, conn).await
}
