//! #  Database management and control.
//!
//! This module provides the interfaces that define the contracts of the storefront's database *backends*.
//!
//! ## Orders
//! An order is the record of a single checkout attempt. It carries an immutable snapshot of the cart at checkout time
//! and a payment status that only ever moves towards finality.
//!
//! ## Traits
//! * [`OrderManagement`] stores orders and applies gateway status changes to them.
//! * [`CatalogManagement`] provides read-only access to the product catalog.
//! * [`SessionManagement`] manages visitor sessions: the payer identity, the cart and the order awaiting payment.
mod catalog_management;
mod order_management;
mod session_management;

pub use catalog_management::CatalogManagement;
pub use order_management::OrderManagement;
pub use session_management::SessionManagement;
