use crate::{
    db_types::{BookingPaymentUpdate, BookingRecord, NewLedgerEntry, PaymentLedgerEntry},
    traits::StorageError,
};

/// The result of recording one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedVerification {
    /// The ledger entry for this attempt. For a replayed callback, this is the entry written the first time around.
    pub entry: PaymentLedgerEntry,
    /// True if an identical callback had already been recorded. Nothing was written in this case.
    pub replayed: bool,
    /// The booking record after the update, if a booking update was requested and the record exists.
    pub booking: Option<BookingRecord>,
}

#[allow(async_fn_in_trait)]
pub trait PaymentLedger {
    /// Appends `entry` to the payment ledger and, if `update` is given, writes the payment fields to the booking it
    /// refers to. The two writes are applied atomically.
    ///
    /// Ledger entries are keyed on `(order_id, payment_id, signature)`. If an identical entry already exists, nothing is
    /// written and the existing entry is returned with `replayed` set. This holds even when the replay names a booking
    /// that the stored entry does not: ledger entries are never updated, so that booking is left alone and has to be
    /// reconciled by hand from the ledger.
    ///
    /// A booking that does not exist is not an error: the ledger entry is still written and `booking` is `None`.
    async fn record_verification(
        &self,
        entry: NewLedgerEntry,
        update: Option<BookingPaymentUpdate>,
    ) -> Result<RecordedVerification, StorageError>;

    /// Fetches all ledger entries for the given gateway order id, oldest first.
    async fn fetch_ledger_entries_for_order(&self, order_id: &str) -> Result<Vec<PaymentLedgerEntry>, StorageError>;
}
