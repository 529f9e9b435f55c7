use serde::{Deserialize, Serialize};

use crate::db_types::{BookingRecord, FormType};

/// How a payment callback was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// The callback was written to the ledger, and the booking (if any) updated.
    Recorded,
    /// An identical callback had already been recorded. The earlier outcome is returned and nothing was written.
    Replayed,
    /// Storage was unavailable. The callback was written to the fallback sink for manual processing.
    Deferred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub verified: bool,
    pub disposition: Disposition,
    /// The collection the booking update was routed to, if any.
    pub form_type: Option<FormType>,
    /// The booking record as it stands after reconciliation, if one was found.
    pub booking: Option<BookingRecord>,
}

impl ReconciliationResult {
    pub fn deferred(verified: bool, form_type: Option<FormType>) -> Self {
        Self { verified, disposition: Disposition::Deferred, form_type, booking: None }
    }
}
