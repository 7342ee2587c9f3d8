//! Storefront Payment Engine
//!
//! The payment engine lets a small storefront take card payments through an external, redirect-style payment
//! gateway. It contains the core logic only; the HTTP surface lives in `spg_server`.
//!
//! The library is divided into three main sections:
//! 1. The gateway protocol ([`mod@gateway`]): the payload codec, the request signer and the order reference format.
//!    These are pure functions with no I/O.
//! 2. Database management and control (`db`). SQLite is the supported backend. You should never need to access the
//!    database directly; use the public API instead. The data types stored in the database are defined in
//!    [`mod@db_types`] and are public.
//! 3. The payment engine public API (`payment_api`). [`CheckoutApi`] turns a cart into a signed gateway request,
//!    [`CallbackApi`] authenticates gateway notifications and drives the order status, and [`ReturnApi`] reports the
//!    outcome to the returning customer. [`StorefrontApi`] covers the catalog, login and cart collaborators.
mod db;

pub mod db_types;
pub mod gateway;
mod payment_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{CatalogManagement, OrderManagement, SessionManagement};
pub use payment_api::{
    callback_api::{CallbackApi, CallbackOutcome},
    checkout_api::CheckoutApi,
    errors::PaymentFlowError,
    return_api::{ReturnApi, ReturnOutcome},
    storefront_api::{CartSummary, StorefrontApi},
};
