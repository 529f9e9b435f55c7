//! # Storage contracts
//!
//! The reconciliation flow talks to storage through three traits, so that backends (and test doubles) can be swapped
//! without touching the flow itself.
//!
//! * [`PaymentLedger`] records every verification attempt and applies the resulting booking update. Both writes happen
//!   as one unit of work; an implementation must never leave a ledger entry without its booking update or vice versa.
//! * [`FallbackSink`] is the last resort for attempts that could not be recorded through the ledger.
//! * [`BookingManagement`] is the slice of the request-intake store that the payment flow needs.
mod booking_management;
mod fallback_sink;
mod payment_ledger;

pub use booking_management::BookingManagement;
pub use fallback_sink::FallbackSink;
pub use payment_ledger::{PaymentLedger, RecordedVerification};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Could not serialize record: {0}")]
    SerializationError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}
