use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use spg_engine::{CallbackApi, CheckoutApi, ReturnApi, SqliteDatabase, StorefrontApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        AddToCartRoute,
        CartRoute,
        CheckoutRedirectRoute,
        CheckoutRoute,
        ClearCartRoute,
        LoginRoute,
        PaymentCallbackRoute,
        PaymentReturnPostRoute,
        PaymentReturnRoute,
        ProductsRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Database ready at {}", db.url());
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    info!("💻️ Gateway callbacks are expected at {}", config.gateway.server_url());
    let srv = HttpServer::new(move || {
        let storefront_api = StorefrontApi::new(db.clone());
        let checkout_api = CheckoutApi::new(db.clone(), config.gateway.clone());
        let callback_api = CallbackApi::new(db.clone(), config.gateway.signer());
        let return_api = ReturnApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("spg::access_log"))
            .app_data(web::Data::new(storefront_api))
            .app_data(web::Data::new(checkout_api))
            .app_data(web::Data::new(callback_api))
            .app_data(web::Data::new(return_api))
            .service(health)
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(CartRoute::<SqliteDatabase>::new())
            .service(ClearCartRoute::<SqliteDatabase>::new())
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(CheckoutRedirectRoute::<SqliteDatabase>::new())
            .service(PaymentCallbackRoute::<SqliteDatabase>::new())
            .service(PaymentReturnRoute::<SqliteDatabase>::new())
            .service(PaymentReturnPostRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
