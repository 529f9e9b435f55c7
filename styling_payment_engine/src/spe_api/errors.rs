use thiserror::Error;

use crate::traits::StorageError;

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Missing required parameters")]
    MissingParameters,
    #[error("The payment verification could not be recorded. {0}")]
    StorageFailure(String),
}

impl From<StorageError> for ReconciliationError {
    fn from(e: StorageError) -> Self {
        Self::StorageFailure(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum BookingApiError {
    #[error("Invalid service request: {0}")]
    InvalidRequest(String),
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}
