use mockall::mock;
use styling_payment_engine::{
    db_types::{
        BookingPaymentUpdate,
        BookingRecord,
        FallbackVerificationRecord,
        FormType,
        NewBookingRequest,
        NewLedgerEntry,
        PaymentLedgerEntry,
    },
    traits::{BookingManagement, FallbackSink, PaymentLedger, RecordedVerification, StorageError},
};

mock! {
    pub Ledger {}
    impl PaymentLedger for Ledger {
        async fn record_verification(&self, entry: NewLedgerEntry, update: Option<BookingPaymentUpdate>) -> Result<RecordedVerification, StorageError>;
        async fn fetch_ledger_entries_for_order(&self, order_id: &str) -> Result<Vec<PaymentLedgerEntry>, StorageError>;
    }
}

mock! {
    pub Sink {}
    impl FallbackSink for Sink {
        async fn write_fallback(&self, record: &FallbackVerificationRecord) -> Result<(), StorageError>;
    }
}

mock! {
    pub BookingStore {}
    impl BookingManagement for BookingStore {
        async fn insert_booking(&self, form_type: FormType, request: NewBookingRequest) -> Result<BookingRecord, StorageError>;
        async fn fetch_booking(&self, form_type: FormType, form_id: &str) -> Result<Option<BookingRecord>, StorageError>;
    }
}
