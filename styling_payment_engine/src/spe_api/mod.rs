//! # Styling payment engine public API
//!
//! * [`reconciliation_api`] verifies payment callbacks, records them, updates bookings, and hands confirmed payments to
//!   the notification hooks.
//! * [`booking_api`] is the thin slice of request intake that the payment flow depends on: creating and fetching
//!   booking records.
//!
//! As with the storage layer, each API is created by handing it a backend that implements the traits it needs:
//!
//! ```rust,ignore
//! let db = SqliteDatabase::new_with_url("sqlite://data/styling_bookings.db", 25).await?;
//! let verifier = SignatureVerifier::new(secret)?;
//! let api = ReconciliationApi::new(db.clone(), FallbackStore::Database(db), verifier, producers);
//! let result = api.reconcile(request).await?;
//! ```
pub mod booking_api;
pub mod errors;
pub mod reconciliation_api;
pub mod reconciliation_objects;
pub mod retry;
