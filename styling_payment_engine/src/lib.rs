//! Styling Payment Engine
//!
//! The engine verifies payment gateway callbacks for styling service bookings and reconciles them against the booking
//! records. It knows nothing about HTTP; the server crate wraps it.
//!
//! The library is divided into these sections:
//! 1. Storage (private; the contracts are in [`traits`]). The SQLite backend keeps the six booking
//!    collections, the payment ledger and the fallback table. Fallback records can also go to a JSON-lines file.
//! 2. The public API ([`ReconciliationApi`] and [`BookingApi`]). Backends implement the storage traits in order to be
//!    used by the API.
//! 3. Helpers for checking gateway signatures ([`helpers`]) and for mapping form types to collections ([`routing`]).
//!
//! Confirmed payments are announced as [`events::PaymentConfirmedEvent`]s. Hook into them with
//! [`events::EventHooks`]; the hooks run in the background and never hold up the payment response.
mod db;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod routing;
mod spe_api;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{db::SqliteDatabase, SqliteDatabaseError};
pub use db::{traits, FallbackStore, JsonLinesFallbackSink};
pub use spe_api::{
    booking_api::BookingApi,
    errors::{BookingApiError, ReconciliationError},
    reconciliation_api::ReconciliationApi,
    reconciliation_objects::{Disposition, ReconciliationResult},
    retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES},
};
