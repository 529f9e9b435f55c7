mod fallback_file;

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use fallback_file::JsonLinesFallbackSink;

use crate::{
    db_types::FallbackVerificationRecord,
    traits::{FallbackSink, StorageError},
};

/// The fallback sink chosen at start-up: a table in the main database, or a file on local disk.
#[derive(Debug, Clone)]
pub enum FallbackStore {
    #[cfg(feature = "sqlite")]
    Database(sqlite::db::SqliteDatabase),
    File(JsonLinesFallbackSink),
}

impl FallbackSink for FallbackStore {
    async fn write_fallback(&self, record: &FallbackVerificationRecord) -> Result<(), StorageError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Database(db) => db.write_fallback(record).await,
            Self::File(sink) => sink.write_fallback(record).await,
        }
    }
}
