//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a few lines MUST delegate to the engine APIs. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Database access goes through `sqlx`, which is fully async, so
//! handlers only ever `.await` on it.
use actix_web::{get, http::header::ContentType, web, HttpResponse, Responder};
use log::*;
use spg_engine::{
    db_types::{OrderId, ProductId, Session},
    gateway::SignedCheckout,
    CallbackApi,
    CatalogManagement,
    CheckoutApi,
    OrderManagement,
    PaymentFlowError,
    ReturnApi,
    SessionManagement,
    StorefrontApi,
};

use crate::{
    data_objects::{CallbackForm, CartView, JsonResponse, LoginForm, ProductView, ReturnView},
    errors::ServerError,
    session::SessionCookie,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// The backend type parameter must implement every listed trait.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(products => Get "/products" impl CatalogManagement, SessionManagement);
pub async fn products<B>(api: web::Data<StorefrontApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + SessionManagement {
    trace!("💻️ Received products request");
    let products = api.products().await?;
    let products = products.into_iter().map(ProductView::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(products))
}

//----------------------------------------------   Login  ----------------------------------------------------
route!(login => Post "/login" impl CatalogManagement, SessionManagement);
/// Records the payer identity for the visitor's session. There are no passwords; the name is only used to label
/// orders.
pub async fn login<B>(
    cookie: SessionCookie,
    form: web::Form<LoginForm>,
    api: web::Data<StorefrontApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    trace!("💻️ Received login request");
    let session = api.session(cookie.id()).await?;
    let session = api.login(&session.id, &form.username).await.map_err(|e| match e {
        PaymentFlowError::ValidationError(msg) => ServerError::InvalidRequestBody(msg),
        e => e.into(),
    })?;
    let mut res = HttpResponse::Ok();
    cookie.refresh(&mut res, &session);
    Ok(res.json(JsonResponse::success(format!("Logged in as {}", session.payer_identity()))))
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(add_to_cart => Post "/cart/{product_id}" impl CatalogManagement, SessionManagement);
pub async fn add_to_cart<B>(
    cookie: SessionCookie,
    path: web::Path<i64>,
    api: web::Data<StorefrontApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let product_id = ProductId(path.into_inner());
    trace!("💻️ Received request to add product {product_id} to cart");
    let session = api.session(cookie.id()).await?;
    let cart = api.add_to_cart(&session.id, product_id).await?;
    let summary = api.cart_summary(&cart).await?;
    let mut res = HttpResponse::Ok();
    cookie.refresh(&mut res, &session);
    Ok(res.json(CartView::new(session.payer_identity(), summary)))
}

route!(cart => Get "/cart" impl CatalogManagement, SessionManagement);
pub async fn cart<B>(cookie: SessionCookie, api: web::Data<StorefrontApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + SessionManagement {
    trace!("💻️ Received cart request");
    let session = api.session(cookie.id()).await?;
    let summary = api.cart_summary(&session.cart).await?;
    let mut res = HttpResponse::Ok();
    cookie.refresh(&mut res, &session);
    Ok(res.json(CartView::new(session.payer_identity(), summary)))
}

route!(clear_cart => Delete "/cart" impl CatalogManagement, SessionManagement);
pub async fn clear_cart<B>(cookie: SessionCookie, api: web::Data<StorefrontApi<B>>) -> Result<HttpResponse, ServerError>
where B: CatalogManagement + SessionManagement {
    trace!("💻️ Received clear cart request");
    let session = api.session(cookie.id()).await?;
    api.clear_cart(&session.id).await?;
    let mut res = HttpResponse::Ok();
    cookie.refresh(&mut res, &session);
    Ok(res.json(JsonResponse::success("Cart cleared")))
}

//----------------------------------------------   Checkout  ----------------------------------------------------
route!(checkout => Post "/checkout" impl OrderManagement, CatalogManagement, SessionManagement);
/// Creates an order from the session cart and returns the form the browser must post to the gateway, as JSON.
pub async fn checkout<B>(
    cookie: SessionCookie,
    store: web::Data<StorefrontApi<B>>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + CatalogManagement + SessionManagement,
{
    trace!("💻️ Received checkout request");
    let (session, signed) = start_checkout(&cookie, &store, &api).await?;
    let mut res = HttpResponse::Ok();
    cookie.refresh(&mut res, &session);
    Ok(res.json(signed.form()))
}

route!(checkout_redirect => Post "/checkout/redirect" impl OrderManagement, CatalogManagement, SessionManagement);
/// As [`checkout`], but responds with an HTML page that submits the form to the gateway straight away.
pub async fn checkout_redirect<B>(
    cookie: SessionCookie,
    store: web::Data<StorefrontApi<B>>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + CatalogManagement + SessionManagement,
{
    trace!("💻️ Received checkout redirect request");
    let (session, signed) = start_checkout(&cookie, &store, &api).await?;
    let mut res = HttpResponse::Ok();
    cookie.refresh(&mut res, &session);
    Ok(res.insert_header(ContentType::html()).body(signed.form().to_html()))
}

async fn start_checkout<B>(
    cookie: &SessionCookie,
    store: &StorefrontApi<B>,
    api: &CheckoutApi<B>,
) -> Result<(Session, SignedCheckout), ServerError>
where
    B: OrderManagement + CatalogManagement + SessionManagement,
{
    let session = store.session(cookie.id()).await?;
    let signed = api.checkout(&session.cart, session.payer_identity()).await?;
    store.record_pending_order(&session.id, signed.order.id).await?;
    debug!("💻️ Session {} sent to the gateway for order {}", session.id, signed.order.id);
    Ok((session, signed))
}

//----------------------------------------------   Gateway  ----------------------------------------------------
route!(payment_callback => Post "/payment/callback" impl OrderManagement);
/// The gateway's server-to-server notification. Responds `OK` to every authentic notification for a known order,
/// including repeats. Every kind of malformed or forged callback gets the same 400 response.
pub async fn payment_callback<B>(
    form: Result<web::Form<CallbackForm>, actix_web::Error>,
    api: web::Data<CallbackApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement,
{
    trace!("💻️ Received payment callback");
    let form = form.map_err(|e| {
        warn!("💻️ Payment callback body could not be read. {e}");
        ServerError::InvalidCallback
    })?;
    let outcome = api.process_callback(&form.data, &form.signature).await?;
    debug!("💻️ Payment callback for order {} processed. Status: {}", outcome.order_id, outcome.update.current());
    Ok(HttpResponse::Ok().content_type("text/plain").body("OK"))
}

route!(payment_return => Get "/payment/return/{order_id}" impl OrderManagement, SessionManagement);
/// Where the customer's browser lands after paying. Reports the order status, and clears the cart once the order is
/// paid.
pub async fn payment_return<B>(
    cookie: SessionCookie,
    path: web::Path<String>,
    api: web::Data<ReturnApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + SessionManagement,
{
    order_returned(cookie, path.into_inner(), &api).await
}

// The gateway may send the browser back with a POST instead of a redirect
route!(payment_return_post => Post "/payment/return/{order_id}" impl OrderManagement, SessionManagement);
pub async fn payment_return_post<B>(
    cookie: SessionCookie,
    path: web::Path<String>,
    api: web::Data<ReturnApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderManagement + SessionManagement,
{
    order_returned(cookie, path.into_inner(), &api).await
}

async fn order_returned<B>(cookie: SessionCookie, order_id: String, api: &ReturnApi<B>) -> Result<HttpResponse, ServerError>
where B: OrderManagement + SessionManagement {
    trace!("💻️ Customer returned from the gateway for order {order_id}");
    let order_id = order_id.parse::<OrderId>().map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    let outcome = api.order_returned(order_id, cookie.id()).await?;
    Ok(HttpResponse::Ok().json(ReturnView::from(outcome)))
}
