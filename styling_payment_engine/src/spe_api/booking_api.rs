use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{BookingRecord, FormType, NewBookingRequest},
    spe_api::errors::BookingApiError,
    traits::BookingManagement,
};

/// Creates booking records. Payment callbacks refer to these records by their id (the `formId`).
pub struct BookingApi<B> {
    db: B,
}

impl<B: Debug> Debug for BookingApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BookingApi ({:?})", self.db)
    }
}

impl<B> BookingApi<B>
where B: BookingManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Stores a new service request. The customer's name and email are required; everything else is optional.
    pub async fn submit_request(
        &self,
        form_type: FormType,
        mut request: NewBookingRequest,
    ) -> Result<BookingRecord, BookingApiError> {
        request.customer_name = request.customer_name.trim().to_string();
        request.email = request.email.trim().to_string();
        if request.customer_name.is_empty() {
            return Err(BookingApiError::InvalidRequest("Customer name is required".into()));
        }
        if request.email.is_empty() || !request.email.contains('@') {
            return Err(BookingApiError::InvalidRequest("A valid email address is required".into()));
        }
        let booking = self.db.insert_booking(form_type, request).await?;
        info!("📝️ New {form_type} request {} received from {}", booking.id, booking.email);
        Ok(booking)
    }
}
