//! # SPG server
//! This crate hosts the HTTP surface of the storefront payment gateway. It is responsible for:
//! * Serving the catalog, login and cart to the shop front end.
//! * Turning the visitor's cart into a signed gateway checkout form.
//! * Receiving the gateway's payment notifications and applying them to orders.
//! * Reporting the order status to customers returning from the gateway.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /products`: The catalog.
//! * `POST /login`: Records the payer name (form field `username`) on the session.
//! * `POST /cart/{product_id}`, `GET /cart`, `DELETE /cart`: Cart management.
//! * `POST /checkout`: Creates an order and returns the signed gateway form as JSON.
//! * `POST /checkout/redirect`: As above, as a self-submitting HTML page.
//! * `POST /payment/callback`: The gateway's notification webhook (form fields `data` and `signature`).
//! * `GET|POST /payment/return/{order_id}`: The page customers return to after paying.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;
pub mod session;

#[cfg(test)]
mod endpoint_tests;
