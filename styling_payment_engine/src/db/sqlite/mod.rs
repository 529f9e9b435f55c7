//! SQLite backend.
//!
//! Single-row queries are read with `fetch_all` rather than `fetch_one`/`fetch_optional`. SQLite only commits an
//! autocommit write, and releases its lock, once the statement has been stepped to completion.
pub mod db;
mod errors;

pub mod bookings;
pub mod fallbacks;
pub mod ledger;

use std::str::FromStr;

pub use errors::SqliteDatabaseError;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Opens a connection pool, creating the database file if it does not exist yet.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
