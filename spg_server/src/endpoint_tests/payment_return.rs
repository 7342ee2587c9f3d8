use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use spg_engine::{
    db_types::{OrderId, OrderStatusType},
    ReturnApi,
};

use super::{
    helpers::{order, send_request, with_session, SESSION},
    mocks::MockBackend,
};
use crate::{
    data_objects::ReturnView,
    routes::{PaymentReturnPostRoute, PaymentReturnRoute},
};

fn configure_with(cfg: &mut ServiceConfig, status: OrderStatusType, clears: usize) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_order_by_id()
        .returning(move |id| Ok((id == OrderId(5)).then(|| order(5, status.clone()))));
    backend
        .expect_clear_cart_for_paid_order()
        .withf(|session, id| session.as_str() == SESSION && *id == OrderId(5))
        .times(clears)
        .returning(|_, _| Ok(true));
    cfg.app_data(web::Data::new(ReturnApi::new(backend)))
        .service(PaymentReturnRoute::<MockBackend>::new())
        .service(PaymentReturnPostRoute::<MockBackend>::new());
}

fn configure_paid(cfg: &mut ServiceConfig) {
    configure_with(cfg, OrderStatusType::Paid, 1);
}

fn configure_pending(cfg: &mut ServiceConfig) {
    configure_with(cfg, OrderStatusType::PendingPayment, 0);
}

fn configure_paid_without_session(cfg: &mut ServiceConfig) {
    configure_with(cfg, OrderStatusType::Paid, 0);
}

#[actix_web::test]
async fn paid_order_clears_cart() {
    let req = with_session(TestRequest::get().uri("/payment/return/5"));
    let res = send_request(req, configure_paid).await;
    assert_eq!(res.status, StatusCode::OK);
    let view: ReturnView = serde_json::from_str(&res.body).unwrap();
    assert_eq!(view.order_id, 5);
    assert_eq!(view.status, "Paid");
    assert_eq!(view.total_amount, "220.00");
    assert_eq!(view.currency, "UAH");
    assert!(view.cart_cleared);
}

#[actix_web::test]
async fn gateway_may_post_the_customer_back() {
    let req = with_session(TestRequest::post().uri("/payment/return/5"));
    let res = send_request(req, configure_paid).await;
    assert_eq!(res.status, StatusCode::OK);
    let view: ReturnView = serde_json::from_str(&res.body).unwrap();
    assert!(view.cart_cleared);
}

#[actix_web::test]
async fn pending_order_leaves_cart_alone() {
    let req = with_session(TestRequest::get().uri("/payment/return/5"));
    let res = send_request(req, configure_pending).await;
    assert_eq!(res.status, StatusCode::OK);
    let view: ReturnView = serde_json::from_str(&res.body).unwrap();
    assert_eq!(view.status, "PendingPayment");
    assert!(!view.cart_cleared);
}

#[actix_web::test]
async fn no_session_cookie() {
    let req = TestRequest::get().uri("/payment/return/5");
    let res = send_request(req, configure_paid_without_session).await;
    assert_eq!(res.status, StatusCode::OK);
    let view: ReturnView = serde_json::from_str(&res.body).unwrap();
    assert_eq!(view.status, "Paid");
    assert!(!view.cart_cleared);
}

#[actix_web::test]
async fn unknown_order() {
    let req = with_session(TestRequest::get().uri("/payment/return/6"));
    let res = send_request(req, configure_pending).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_order_id() {
    let req = with_session(TestRequest::get().uri("/payment/return/spg-5"));
    let res = send_request(req, configure_pending).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.starts_with(r#"{"error":"Could not read request path"#));
}
