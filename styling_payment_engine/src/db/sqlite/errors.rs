use thiserror::Error;

use crate::traits::StorageError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Could not serialize booking details: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<SqliteDatabaseError> for StorageError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::SerializationError(e) => StorageError::SerializationError(e.to_string()),
            e => StorageError::DatabaseError(e.to_string()),
        }
    }
}
