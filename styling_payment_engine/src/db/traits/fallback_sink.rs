use crate::{db_types::FallbackVerificationRecord, traits::StorageError};

#[allow(async_fn_in_trait)]
pub trait FallbackSink {
    /// Stores a verification attempt that could not be recorded in the payment ledger.
    async fn write_fallback(&self, record: &FallbackVerificationRecord) -> Result<(), StorageError>;
}
