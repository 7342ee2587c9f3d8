use std::fmt::Debug;

use log::*;
use serde::Serialize;
use spg_common::Amount;

use crate::{
    db::traits::{CatalogManagement, SessionManagement},
    db_types::{merge_products, LineItem, OrderId, Product, ProductId, Session, SessionId},
    payment_api::errors::PaymentFlowError,
};

/// The resolved contents of a cart with its running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub total: Amount,
}

/// `StorefrontApi` covers everything the shop does before checkout: the catalog, the visitor's session and login, and
/// the cart.
pub struct StorefrontApi<B> {
    db: B,
}

impl<B> Debug for StorefrontApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorefrontApi")
    }
}

impl<B> StorefrontApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> StorefrontApi<B>
where B: CatalogManagement + SessionManagement
{
    pub async fn products(&self) -> Result<Vec<Product>, PaymentFlowError> {
        self.db.fetch_products().await.map_err(PaymentFlowError::database)
    }

    /// Returns the session for `id`, or a brand-new one if `id` is absent or unknown (an expired or forged cookie,
    /// say). Check the returned id to find out which happened.
    pub async fn session(&self, id: Option<&SessionId>) -> Result<Session, PaymentFlowError> {
        if let Some(id) = id {
            if let Some(session) = self.db.fetch_session(id).await.map_err(PaymentFlowError::database)? {
                return Ok(session);
            }
            debug!("🛍️ Session {id} is unknown. Starting a new one.");
        }
        let session = self.db.create_session().await.map_err(PaymentFlowError::database)?;
        trace!("🛍️ Session {} started", session.id);
        Ok(session)
    }

    /// Records who is shopping. A blank name is rejected.
    pub async fn login(&self, id: &SessionId, username: &str) -> Result<Session, PaymentFlowError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(PaymentFlowError::ValidationError("Username cannot be empty".into()));
        }
        let session = self.db.set_payer(id, username).await.map_err(PaymentFlowError::database)?;
        info!("🛍️ {username} logged in on session {id}");
        Ok(session)
    }

    /// Adds a product to the cart. Ids are not checked here; unknown ones are skipped at checkout.
    pub async fn add_to_cart(&self, id: &SessionId, product: ProductId) -> Result<Vec<ProductId>, PaymentFlowError> {
        let cart = self.db.add_to_cart(id, product).await.map_err(PaymentFlowError::database)?;
        debug!("🛍️ Product {product} added to the cart of session {id}. {} items in cart", cart.len());
        Ok(cart)
    }

    pub async fn clear_cart(&self, id: &SessionId) -> Result<(), PaymentFlowError> {
        self.db.clear_cart(id).await.map_err(PaymentFlowError::database)?;
        debug!("🛍️ Cart of session {id} cleared");
        Ok(())
    }

    /// Resolves the cart against the catalog, merging repeats the same way checkout does.
    pub async fn cart_summary(&self, cart: &[ProductId]) -> Result<CartSummary, PaymentFlowError> {
        let mut products = Vec::with_capacity(cart.len());
        for id in cart {
            if let Some(product) = self.db.fetch_product(*id).await.map_err(PaymentFlowError::database)? {
                products.push(product);
            }
        }
        let items = merge_products(products);
        let total = items.iter().map(LineItem::line_total).sum();
        Ok(CartSummary { items, total })
    }

    /// Remembers which order the session was sent off to pay for, so that the cart can be cleared on its return.
    pub async fn record_pending_order(&self, id: &SessionId, order: OrderId) -> Result<(), PaymentFlowError> {
        self.db.set_pending_order(id, order).await.map_err(PaymentFlowError::database)
    }
}
