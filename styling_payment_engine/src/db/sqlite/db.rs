use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{bookings, fallbacks, ledger, new_pool, SqliteDatabaseError};
use crate::{
    db_types::{
        BookingPaymentUpdate,
        BookingRecord,
        FallbackVerificationRecord,
        FormType,
        InsertLedgerResult,
        NewBookingRequest,
        NewLedgerEntry,
        PaymentLedgerEntry,
    },
    traits::{BookingManagement, FallbackSink, PaymentLedger, RecordedVerification, StorageError},
};

/// The SQLite backend. Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Closes every connection in the pool. Outstanding queries are allowed to finish.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("🗃️ Database connection pool closed");
    }

    pub async fn fetch_fallback_records(&self) -> Result<Vec<FallbackVerificationRecord>, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        fallbacks::fetch_fallbacks(&mut conn).await
    }

    pub async fn ledger_entry_count(&self) -> Result<i64, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        ledger::count_entries(&mut conn).await
    }

    async fn record_verification_in_tx(
        &self,
        entry: NewLedgerEntry,
        update: Option<BookingPaymentUpdate>,
    ) -> Result<RecordedVerification, SqliteDatabaseError> {
        // Dropping an uncommitted transaction rolls it back, so an early return leaves nothing behind
        let mut tx = self.pool.begin().await?;
        let result = match ledger::idempotent_insert(entry, &mut tx).await? {
            InsertLedgerResult::Inserted(entry) => {
                let booking = match &update {
                    Some(update) => bookings::apply_payment_update(update, &mut tx).await?,
                    None => None,
                };
                RecordedVerification { entry, replayed: false, booking }
            },
            InsertLedgerResult::AlreadyExists(entry) => {
                let booking = match &update {
                    Some(update) => bookings::fetch_booking(update.form_type, &update.form_id, &mut tx).await?,
                    None => None,
                };
                RecordedVerification { entry, replayed: true, booking }
            },
        };
        tx.commit().await?;
        trace!("🗃️ Verification for order {} committed", result.entry.order_id);
        Ok(result)
    }
}

impl PaymentLedger for SqliteDatabase {
    async fn record_verification(
        &self,
        entry: NewLedgerEntry,
        update: Option<BookingPaymentUpdate>,
    ) -> Result<RecordedVerification, StorageError> {
        let result = self.record_verification_in_tx(entry, update).await?;
        Ok(result)
    }

    async fn fetch_ledger_entries_for_order(&self, order_id: &str) -> Result<Vec<PaymentLedgerEntry>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let entries = ledger::fetch_entries_for_order(order_id, &mut conn).await?;
        Ok(entries)
    }
}

impl FallbackSink for SqliteDatabase {
    async fn write_fallback(&self, record: &FallbackVerificationRecord) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        fallbacks::insert_fallback(record, &mut conn).await?;
        Ok(())
    }
}

impl BookingManagement for SqliteDatabase {
    async fn insert_booking(
        &self,
        form_type: FormType,
        request: NewBookingRequest,
    ) -> Result<BookingRecord, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let record = bookings::insert_booking(form_type, request, &mut conn).await?;
        Ok(record)
    }

    async fn fetch_booking(&self, form_type: FormType, form_id: &str) -> Result<Option<BookingRecord>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let record = bookings::fetch_booking(form_type, form_id, &mut conn).await?;
        Ok(record)
    }
}
