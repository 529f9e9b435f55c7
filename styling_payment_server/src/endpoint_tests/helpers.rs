use actix_web::{http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::Utc;
use log::debug;
use serde::Serialize;
use styling_payment_engine::{
    db_types::{BookingPaymentUpdate, BookingRecord, BookingStatus, NewLedgerEntry, PaymentLedgerEntry},
    traits::RecordedVerification,
};

use crate::server::json_config;

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    call(TestRequest::get().uri(path), configure).await
}

pub async fn post_request<T, F>(path: &str, body: &T, configure: F) -> (StatusCode, String)
where
    T: Serialize,
    F: FnOnce(&mut ServiceConfig),
{
    call(TestRequest::post().uri(path).set_json(body), configure).await
}

pub async fn post_raw_request<F>(path: &str, body: &'static str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("content-type", "application/json"))
        .set_payload(body);
    call(req, configure).await
}

async fn call<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().app_data(json_config()).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn booking(id: &str) -> BookingRecord {
    let now = Utc::now();
    BookingRecord {
        id: id.to_string(),
        customer_name: "Asha".into(),
        email: "asha@example.com".into(),
        phone: Some("+91 98450 00000".into()),
        details: None,
        status: BookingStatus::Pending,
        payment_id: None,
        order_id: None,
        payment_verified: false,
        payment_date: None,
        created_at: now,
        updated_at: now,
    }
}

/// What a store holding booking `form_id` would return for this verification.
pub fn recorded(entry: NewLedgerEntry, update: Option<BookingPaymentUpdate>, form_id: &str) -> RecordedVerification {
    let entry = PaymentLedgerEntry {
        id: 1,
        order_id: entry.order_id,
        payment_id: entry.payment_id,
        signature: entry.signature,
        status: entry.status,
        verified: entry.verified,
        form_id: entry.form_id,
        form_type: entry.form_type,
        created_at: Utc::now(),
    };
    let booking = update.filter(|u| u.form_id == form_id).map(|u| {
        let mut b = booking(form_id);
        b.status = u.status();
        b.payment_id = Some(u.payment_id);
        b.order_id = Some(u.order_id);
        b.payment_verified = u.verified;
        b.payment_date = Some(Utc::now());
        b
    });
    RecordedVerification { entry, replayed: false, booking }
}
