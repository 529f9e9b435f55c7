use serde::{Deserialize, Serialize};

use crate::db_types::{BookingRecord, FormType};

/// Why a notification is being sent. The email service picks its template from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPurpose {
    Payment,
}

/// Emitted once a booking has been marked as paid on the strength of a verified gateway signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmedEvent {
    pub form_type: FormType,
    pub purpose: NotificationPurpose,
    #[serde(rename = "data")]
    pub booking: BookingRecord,
}

impl PaymentConfirmedEvent {
    pub fn new(form_type: FormType, booking: BookingRecord) -> Self {
        Self { form_type, purpose: NotificationPurpose::Payment, booking }
    }
}
