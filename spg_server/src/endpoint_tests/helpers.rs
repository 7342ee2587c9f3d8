use actix_web::{
    cookie::Cookie,
    http::{header::CONTENT_TYPE, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use chrono::Utc;
use log::debug;
use spg_common::{Amount, Secret};
use spg_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, Product, ProductId, Session, SessionId},
    gateway::{GatewayConfig, GatewayReference},
};

use crate::session::SESSION_COOKIE;

// The session token the mocks know about
pub const SESSION: &str = "Xq3pLr8TzW1nV6bYc0Hs5JkD2gFa9MeU";
pub const PRIVATE_KEY: &str = "endpoint_test_private_key";

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    pub content_type: Option<String>,
    /// The value of the session cookie, if the response set one
    pub session_cookie: Option<String>,
}

pub async fn send_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> TestResponse {
    let _ = env_logger::try_init();
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("🚀️ Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let session_cookie = res.response().cookies().find(|c| c.name() == SESSION_COOKIE).map(|c| c.value().to_string());
    let content_type = res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(String::from);
    let body = test::read_body(res).await;
    TestResponse { status, body: String::from_utf8_lossy(&body).into_owned(), content_type, session_cookie }
}

pub fn with_session(req: TestRequest) -> TestRequest {
    req.cookie(Cookie::new(SESSION_COOKIE, SESSION))
}

pub fn gateway_config() -> GatewayConfig {
    GatewayConfig {
        public_key: "sandbox_i00000000001".into(),
        private_key: Secret::new(PRIVATE_KEY.to_string()),
        public_url: "https://noodles.example.com".into(),
        ..Default::default()
    }
}

pub fn product(id: i64) -> Option<Product> {
    let (name, price) = match id {
        1 => ("Ramen", 100),
        2 => ("Udon", 120),
        3 => ("Pad Thai", 150),
        _ => return None,
    };
    Some(Product { id: ProductId(id), name: name.into(), price: Amount::from_major(price), description: String::new() })
}

pub fn session(cart: &[i64], payer: Option<&str>, pending_order_id: Option<i64>) -> Session {
    Session {
        id: SessionId(SESSION.into()),
        payer: payer.map(String::from),
        cart: cart.iter().copied().map(ProductId).collect(),
        pending_order_id: pending_order_id.map(OrderId),
    }
}

pub fn reference(id: i64) -> GatewayReference {
    format!("spg-{id}-AbCdEfGhIjKlMnOp").parse().unwrap()
}

pub fn order_from(id: i64, order: NewOrder, status: OrderStatusType) -> Order {
    Order {
        id: OrderId(id),
        payer: order.payer,
        line_items: order.line_items,
        total_amount: order.total_amount,
        currency: order.currency,
        status,
        gateway_reference: reference(id),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// An order for one Ramen and one Udon, 220.00 in total
pub fn order(id: i64, status: OrderStatusType) -> Order {
    let products = [product(1), product(2)].into_iter().flatten();
    let new_order = NewOrder::from_products("alice", products, "UAH").unwrap();
    order_from(id, new_order, status)
}
