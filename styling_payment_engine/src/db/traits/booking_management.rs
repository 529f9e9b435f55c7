use crate::{
    db_types::{BookingRecord, FormType, NewBookingRequest},
    traits::StorageError,
};

#[allow(async_fn_in_trait)]
pub trait BookingManagement {
    /// Stores a new service request in the collection for `form_type`, with status `pending`, and returns the stored
    /// record. The record id is generated by the store.
    async fn insert_booking(
        &self,
        form_type: FormType,
        request: NewBookingRequest,
    ) -> Result<BookingRecord, StorageError>;

    async fn fetch_booking(&self, form_type: FormType, form_id: &str) -> Result<Option<BookingRecord>, StorageError>;
}
