use std::time::Duration;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::Utc;
use serde_json::{json, Value};
use spg_common::Secret;
use styling_payment_engine::{
    db_types::{BookingStatus, FormType, LedgerStatus, PaymentLedgerEntry},
    events::EventProducers,
    helpers::SignatureVerifier,
    traits::StorageError,
    ReconciliationApi,
    RetryPolicy,
};

use super::{
    helpers::{get_request, post_raw_request, post_request, recorded},
    mocks::{MockLedger, MockSink},
};
use crate::{
    data_objects::{DEFERRED_MESSAGE, UNVERIFIED_MESSAGE, VERIFIED_MESSAGE},
    routes::{LedgerForOrderRoute, VerifyPaymentRoute},
};

const SECRET: &str = "endpoint_test_secret";

fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(Secret::new(SECRET.to_string())).unwrap()
}

fn sign(order_id: &str, payment_id: &str) -> String {
    verifier().sign(order_id, payment_id)
}

fn configure(ledger: MockLedger, sink: MockSink) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = ReconciliationApi::new(ledger, sink, verifier(), EventProducers::default())
            .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(1)));
        cfg.app_data(web::Data::new(api)).service(
            web::scope("/api")
                .service(VerifyPaymentRoute::<MockLedger, MockSink>::new())
                .service(LedgerForOrderRoute::<MockLedger, MockSink>::new()),
        );
    }
}

fn no_fallback() -> MockSink {
    let mut sink = MockSink::new();
    sink.expect_write_fallback().never();
    sink
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).expect("Response was not JSON")
}

#[actix_web::test]
async fn verified_payment_marks_wedding_booking_paid() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger
        .expect_record_verification()
        .withf(|entry, update| {
            let update = update.as_ref().expect("booking update expected");
            entry.verified &&
                entry.status == LedgerStatus::Verified &&
                update.form_type == FormType::WeddingStyling &&
                update.form_id == "abc123" &&
                update.status() == BookingStatus::Paid
        })
        .times(1)
        .returning(|entry, update| Ok(recorded(entry, update, "abc123")));
    let body = json!({
        "razorpay_order_id": "O1",
        "razorpay_payment_id": "P1",
        "razorpay_signature": sign("O1", "P1"),
        "formId": "abc123",
        "formType": "wedding_styling"
    });
    let (status, body) = post_request("/api/payment/verify", &body, configure(ledger, no_fallback())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"status": "success", "verified": true, "message": VERIFIED_MESSAGE}));
}

#[actix_web::test]
async fn tampered_signature_is_recorded_as_unverified() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger
        .expect_record_verification()
        .withf(|entry, update| {
            !entry.verified &&
                entry.signature == "deadbeef" &&
                update.as_ref().map(|u| u.status()) == Some(BookingStatus::PaymentPendingVerification)
        })
        .times(1)
        .returning(|entry, update| Ok(recorded(entry, update, "abc123")));
    let body = json!({
        "razorpay_order_id": "O1",
        "razorpay_payment_id": "P1",
        "razorpay_signature": "deadbeef",
        "formId": "abc123",
        "formType": "wedding_styling"
    });
    let (status, body) = post_request("/api/payment/verify", &body, configure(ledger, no_fallback())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!({"status": "success", "verified": false, "message": UNVERIFIED_MESSAGE}));
}

#[actix_web::test]
async fn missing_payment_id_is_rejected() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger.expect_record_verification().never();
    let body = json!({ "razorpay_order_id": "O1" });
    let (status, body) = post_request("/api/payment/verify", &body, configure(ledger, no_fallback())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({"status": "failed", "message": "Missing required parameters"}));
}

#[actix_web::test]
async fn malformed_body_is_rejected() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger.expect_record_verification().never();
    let (status, body) =
        post_raw_request("/api/payment/verify", "{\"razorpay_order_id\": ", configure(ledger, no_fallback())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["status"], "failed");
}

#[actix_web::test]
async fn verified_payment_is_accepted_when_storage_is_down() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger
        .expect_record_verification()
        .times(4)
        .returning(|_, _| Err(StorageError::DatabaseError("database is locked".into())));
    let mut sink = MockSink::new();
    sink.expect_write_fallback()
        .withf(|r| r.verified && r.order_id.as_deref() == Some("O1") && r.error.contains("database is locked"))
        .times(1)
        .returning(|_| Ok(()));
    let body = json!({
        "razorpay_order_id": "O1",
        "razorpay_payment_id": "P1",
        "razorpay_signature": sign("O1", "P1"),
        "formId": "abc123"
    });
    let (status, body) = post_request("/api/payment/verify", &body, configure(ledger, sink)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json_body(&body), json!({"status": "success", "verified": true, "message": DEFERRED_MESSAGE}));
}

#[actix_web::test]
async fn unverified_payment_fails_when_storage_is_down() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger
        .expect_record_verification()
        .times(4)
        .returning(|_, _| Err(StorageError::DatabaseError("disk I/O error".into())));
    let mut sink = MockSink::new();
    sink.expect_write_fallback()
        .withf(|r| !r.verified)
        .times(1)
        .returning(|_| Err(StorageError::IoError("read-only file system".into())));
    let body = json!({ "razorpay_order_id": "O1", "razorpay_payment_id": "P1" });
    let (status, body) = post_request("/api/payment/verify", &body, configure(ledger, sink)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(&body);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("disk I/O error"));
}

#[actix_web::test]
async fn ledger_entries_for_order() {
    let _ = env_logger::try_init();
    let mut ledger = MockLedger::new();
    ledger.expect_fetch_ledger_entries_for_order().withf(|id| id == "O1").times(1).returning(|_| {
        Ok(vec![PaymentLedgerEntry {
            id: 7,
            order_id: "O1".into(),
            payment_id: "P1".into(),
            signature: "missing".into(),
            status: LedgerStatus::RequiresVerification,
            verified: false,
            form_id: Some("abc123".into()),
            form_type: Some(FormType::SoftSkills),
            created_at: Utc::now(),
        }])
    });
    let (status, body) = get_request("/api/payments/O1", configure(ledger, no_fallback())).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["paymentId"], "P1");
    assert_eq!(body[0]["status"], "requires_verification");
    assert_eq!(body[0]["formType"], "soft_skills");
}
