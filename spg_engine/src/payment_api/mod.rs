//! # Storefront payment engine public API
//!
//! The API is modular, so that clients can pick the parts they need.
//!
//! * [`checkout_api`] builds an order from a cart and returns the signed request for the gateway.
//! * [`callback_api`] processes the gateway's asynchronous payment notifications.
//! * [`return_api`] reports an order's status to the customer coming back from the gateway, and clears their cart once
//!   the order is paid.
//! * [`storefront_api`] covers the catalog, login and cart.
//!
//! # API usage
//!
//! Every API instance is created by supplying a database backend that implements the backend traits it needs.
//!
//! ```rust,ignore
//! use spg_engine::{CallbackApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements OrderManagement
//! let api = CallbackApi::new(db, config.signer());
//! let outcome = api.process_callback(&data, &signature).await?;
//! ```
pub mod callback_api;
pub mod checkout_api;
pub mod errors;
pub mod return_api;
pub mod storefront_api;
