use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;
use spg_engine::{
    db_types::{OrderId, OrderStatusType, StatusUpdate},
    gateway::{encode, sign, SignatureAlgorithm},
    CallbackApi,
};

use super::{
    helpers::{gateway_config, order, send_request, PRIVATE_KEY},
    mocks::MockBackend,
};
use crate::routes::PaymentCallbackRoute;

const REJECTED: &str = r#"{"error":"Invalid callback."}"#;

fn signed(payload: &serde_json::Value) -> (String, String) {
    let data = encode(payload).unwrap();
    let signature = sign(SignatureAlgorithm::Sha1, PRIVATE_KEY, &data);
    (data, signature)
}

fn callback_request(data: &str, signature: &str) -> TestRequest {
    TestRequest::post().uri("/payment/callback").set_form(&[("data", data), ("signature", signature)])
}

fn configure(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_order_by_id()
        .returning(|id| Ok((id == OrderId(3)).then(|| order(3, OrderStatusType::PendingPayment))));
    backend
        .expect_update_order_status()
        .withf(|id, status, raw| *id == OrderId(3) && status.is_paid() && raw == "success")
        .returning(|_, status, _| Ok(StatusUpdate::Applied { to: status.clone() }));
    cfg.app_data(web::Data::new(CallbackApi::new(backend, gateway_config().signer())))
        .service(PaymentCallbackRoute::<MockBackend>::new());
}

// Anything that gets this far would be a bug, so the status must never be touched
fn configure_untouchable(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_order_by_id()
        .returning(|id| Ok((id == OrderId(3)).then(|| order(3, OrderStatusType::PendingPayment))));
    backend.expect_update_order_status().never();
    cfg.app_data(web::Data::new(CallbackApi::new(backend, gateway_config().signer())))
        .service(PaymentCallbackRoute::<MockBackend>::new());
}

fn configure_sandbox_status(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_order_by_id()
        .returning(|id| Ok((id == OrderId(3)).then(|| order(3, OrderStatusType::PendingPayment))));
    backend
        .expect_update_order_status()
        .withf(|_, status, raw| *status == OrderStatusType::Unknown("sandbox".into()) && raw == "sandbox")
        .times(1)
        .returning(|_, status, _| Ok(StatusUpdate::Applied { to: status.clone() }));
    cfg.app_data(web::Data::new(CallbackApi::new(backend, gateway_config().signer())))
        .service(PaymentCallbackRoute::<MockBackend>::new());
}

#[actix_web::test]
async fn successful_payment() {
    let (data, signature) = signed(&json!({
        "order_id": "spg-3-AbCdEfGhIjKlMnOp",
        "status": "success",
        "amount": 220.0,
        "currency": "UAH",
        "payment_id": 1_234_567_890,
    }));
    let res = send_request(callback_request(&data, &signature), configure).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "OK");
}

#[actix_web::test]
async fn forged_signature() {
    let (data, _) = signed(&json!({ "order_id": "spg-3-AbCdEfGhIjKlMnOp", "status": "success" }));
    let forged = sign(SignatureAlgorithm::Sha1, "not_the_private_key", &data);
    let res = send_request(callback_request(&data, &forged), configure_untouchable).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, REJECTED);
}

#[actix_web::test]
async fn tampered_payload() {
    let (_, signature) = signed(&json!({ "order_id": "spg-3-AbCdEfGhIjKlMnOp", "status": "failure" }));
    let (data, _) = signed(&json!({ "order_id": "spg-3-AbCdEfGhIjKlMnOp", "status": "success" }));
    let res = send_request(callback_request(&data, &signature), configure_untouchable).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body, REJECTED);
}

#[actix_web::test]
async fn rejections_are_indistinguishable() {
    let garbage = "this is not base64 at all";
    let garbage_signature = sign(SignatureAlgorithm::Sha1, PRIVATE_KEY, garbage);
    let (bad_reference, bad_reference_signature) =
        signed(&json!({ "order_id": "order-3", "status": "success" }));
    let requests = vec![
        callback_request(garbage, &garbage_signature),
        callback_request(&bad_reference, &bad_reference_signature),
        callback_request("", ""),
        TestRequest::post().uri("/payment/callback").set_form(&[("data", bad_reference.as_str())]),
        TestRequest::post().uri("/payment/callback").set_json(json!({ "data": "x", "signature": "y" })),
    ];
    for req in requests {
        let res = send_request(req, configure_untouchable).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body, REJECTED);
    }
}

#[actix_web::test]
async fn unknown_order() {
    let (data, signature) = signed(&json!({ "order_id": "spg-4-AbCdEfGhIjKlMnOp", "status": "success" }));
    let res = send_request(callback_request(&data, &signature), configure_untouchable).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn reference_must_match_stored_reference() {
    // Right order id, wrong random suffix
    let (data, signature) = signed(&json!({ "order_id": "spg-3-ZZZZZZZZZZZZZZZZ", "status": "success" }));
    let res = send_request(callback_request(&data, &signature), configure_untouchable).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn bare_sandbox_status_is_recorded_as_unknown() {
    let (data, signature) = signed(&json!({ "order_id": "spg-3-AbCdEfGhIjKlMnOp", "status": "sandbox" }));
    let res = send_request(callback_request(&data, &signature), configure_sandbox_status).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "OK");
}
