use actix_web::{http::StatusCode, web, web::ServiceConfig};
use serde_json::{json, Value};
use styling_payment_engine::{db_types::FormType, BookingApi};

use super::{
    helpers::{booking, post_request},
    mocks::MockBookingStore,
};
use crate::routes::SubmitRequestRoute;

fn configure(store: MockBookingStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(BookingApi::new(store)))
            .service(web::scope("/api").service(SubmitRequestRoute::<MockBookingStore>::new()));
    }
}

#[actix_web::test]
async fn new_wedding_request_is_stored() {
    let _ = env_logger::try_init();
    let mut store = MockBookingStore::new();
    store
        .expect_insert_booking()
        .withf(|form_type, req| {
            *form_type == FormType::WeddingStyling &&
                req.customer_name == "Meera Iyer" &&
                req.email == "meera@example.com" &&
                req.details.as_ref().map(|d| d["weddingDate"] == "2026-12-01").unwrap_or(false)
        })
        .times(1)
        .returning(|_, _| Ok(booking("65f1c0ffee00000000000abc")));
    let body = json!({
        "customerName": " Meera Iyer ",
        "email": "meera@example.com",
        "details": { "weddingDate": "2026-12-01", "guests": 300 }
    });
    let (status, body) = post_request("/api/requests/wedding-styling", &body, configure(store)).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"status": "success", "formId": "65f1c0ffee00000000000abc"}));
}

#[actix_web::test]
async fn unknown_form_type_is_rejected() {
    let _ = env_logger::try_init();
    let mut store = MockBookingStore::new();
    store.expect_insert_booking().never();
    let body = json!({ "customerName": "Meera", "email": "meera@example.com" });
    let (status, body) = post_request("/api/requests/bridal_party", &body, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "failed");
    assert!(body["message"].as_str().unwrap().contains("bridal_party"));
}

#[actix_web::test]
async fn request_without_a_name_is_rejected() {
    let _ = env_logger::try_init();
    let mut store = MockBookingStore::new();
    store.expect_insert_booking().never();
    let body = json!({ "customerName": "   ", "email": "meera@example.com" });
    let (status, body) = post_request("/api/requests/soft_skills", &body, configure(store)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], "Could not read request body: Customer name is required");
}
