use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use spg_engine::{
    db_types::{ProductId, Session, SessionId},
    StorefrontApi,
};

use super::{
    helpers::{product, send_request, session, with_session, SESSION},
    mocks::MockBackend,
};
use crate::{
    data_objects::{CartView, JsonResponse, ProductView},
    routes::{AddToCartRoute, CartRoute, ClearCartRoute, LoginRoute, ProductsRoute},
};

const NEW_SESSION: &str = "NewSessionNewSessionNewSession00";

fn register(cfg: &mut ServiceConfig, backend: MockBackend) {
    cfg.app_data(web::Data::new(StorefrontApi::new(backend)))
        .service(ProductsRoute::<MockBackend>::new())
        .service(LoginRoute::<MockBackend>::new())
        .service(AddToCartRoute::<MockBackend>::new())
        .service(CartRoute::<MockBackend>::new())
        .service(ClearCartRoute::<MockBackend>::new());
}

fn configure_catalog(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_products().returning(|| Ok((1..=3).filter_map(product).collect()));
    register(cfg, backend);
}

fn configure_new_visitor(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend.expect_fetch_session().never();
    backend.expect_create_session().times(1).returning(|| {
        Ok(Session { id: SessionId(NEW_SESSION.into()), payer: None, cart: vec![], pending_order_id: None })
    });
    register(cfg, backend);
}

fn configure_returning_visitor(cfg: &mut ServiceConfig) {
    let mut backend = MockBackend::new();
    backend
        .expect_fetch_session()
        .withf(|id| id.as_str() == SESSION)
        .returning(|_| Ok(Some(session(&[1, 3, 1], Some("alice"), None))));
    backend.expect_create_session().never();
    backend.expect_fetch_product().returning(|id| Ok(product(id.0)));
    backend
        .expect_add_to_cart()
        .withf(|id, product| id.as_str() == SESSION && *product == ProductId(2))
        .returning(|_, _| Ok(vec![ProductId(1), ProductId(3), ProductId(1), ProductId(2)]));
    backend.expect_clear_cart().returning(|_| Ok(()));
    backend
        .expect_set_payer()
        .withf(|_, payer| payer == "bob")
        .returning(|_, payer| Ok(session(&[1, 3, 1], Some(payer), None)));
    register(cfg, backend);
}

#[actix_web::test]
async fn list_products() {
    let res = send_request(TestRequest::get().uri("/products"), configure_catalog).await;
    assert_eq!(res.status, StatusCode::OK);
    let products: Vec<ProductView> = serde_json::from_str(&res.body).unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0].name, "Ramen");
    assert_eq!(products[0].price, "100.00");
    assert_eq!(products[2].name, "Pad Thai");
    assert_eq!(products[2].price, "150.00");
}

#[actix_web::test]
async fn new_visitor_gets_a_session_cookie() {
    let res = send_request(TestRequest::get().uri("/cart"), configure_new_visitor).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.session_cookie.as_deref(), Some(NEW_SESSION));
    let cart: CartView = serde_json::from_str(&res.body).unwrap();
    assert_eq!(cart.payer, "guest");
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, "0.00");
}

#[actix_web::test]
async fn cart_merges_repeated_products() {
    let req = with_session(TestRequest::get().uri("/cart"));
    let res = send_request(req, configure_returning_visitor).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.session_cookie.is_none());
    let cart: CartView = serde_json::from_str(&res.body).unwrap();
    assert_eq!(cart.payer, "alice");
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.items[0].name, "Ramen");
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.items[0].line_total, "200.00");
    assert_eq!(cart.items[1].name, "Pad Thai");
    assert_eq!(cart.total, "350.00");
}

#[actix_web::test]
async fn add_product_to_cart() {
    let req = with_session(TestRequest::post().uri("/cart/2"));
    let res = send_request(req, configure_returning_visitor).await;
    assert_eq!(res.status, StatusCode::OK);
    let cart: CartView = serde_json::from_str(&res.body).unwrap();
    assert_eq!(cart.items.len(), 3);
    assert_eq!(cart.items[2].name, "Udon");
    assert_eq!(cart.total, "470.00");
}

#[actix_web::test]
async fn clear_cart() {
    let req = with_session(TestRequest::delete().uri("/cart"));
    let res = send_request(req, configure_returning_visitor).await;
    assert_eq!(res.status, StatusCode::OK);
    let body: JsonResponse = serde_json::from_str(&res.body).unwrap();
    assert!(body.success);
}

#[actix_web::test]
async fn login_sets_payer() {
    let req = with_session(TestRequest::post().uri("/login")).set_form(&[("username", "bob")]);
    let res = send_request(req, configure_returning_visitor).await;
    assert_eq!(res.status, StatusCode::OK);
    let body: JsonResponse = serde_json::from_str(&res.body).unwrap();
    assert!(body.success);
    assert_eq!(body.message, "Logged in as bob");
}

#[actix_web::test]
async fn login_with_blank_name() {
    let req = with_session(TestRequest::post().uri("/login")).set_form(&[("username", "  ")]);
    let res = send_request(req, configure_returning_visitor).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
