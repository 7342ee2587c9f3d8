use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{CatalogManagement, OrderManagement},
    db_types::{NewOrder, Order, ProductId},
    gateway::{encode, objects::PAY_ACTION, GatewayConfig, GatewayRequest, SignedCheckout},
    payment_api::errors::PaymentFlowError,
};

/// `CheckoutApi` turns a cart snapshot into a pending order and the signed request that sends the customer to the
/// gateway.
pub struct CheckoutApi<B> {
    db: B,
    config: GatewayConfig,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B, config: GatewayConfig) -> Self {
        Self { db, config }
    }

    fn gateway_request(&self, order: &Order, item_count: i64) -> GatewayRequest {
        GatewayRequest {
            public_key: self.config.public_key.clone(),
            version: self.config.api_version.clone(),
            action: PAY_ACTION.to_string(),
            amount: order.total_amount.to_string(),
            currency: order.currency.clone(),
            description: format!("Noodle order {} ({item_count} pcs)", order.id),
            order_id: order.gateway_reference.to_string(),
            result_url: self.config.result_url(order.id),
            server_url: self.config.server_url(),
            sandbox: self.config.sandbox.then(|| "1".to_string()),
        }
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement + CatalogManagement
{
    /// Creates a `PendingPayment` order from the cart and signs the gateway request for it.
    ///
    /// Product ids that are not in the catalog are skipped. Repeated ids become a single line item with a quantity.
    /// If nothing in the cart resolves, `EmptyOrderError` is returned and no order is created.
    ///
    /// The cart itself is left alone. It is only cleared once the gateway confirms payment.
    pub async fn checkout(&self, cart: &[ProductId], payer: &str) -> Result<SignedCheckout, PaymentFlowError> {
        if cart.is_empty() {
            debug!("🛒️ Checkout requested with an empty cart");
            return Err(PaymentFlowError::EmptyOrderError);
        }
        let mut products = Vec::with_capacity(cart.len());
        for id in cart {
            match self.db.fetch_product(*id).await.map_err(PaymentFlowError::database)? {
                Some(product) => products.push(product),
                None => warn!("🛒️ Product {id} is in a cart but not in the catalog. It will be skipped."),
            }
        }
        let order = NewOrder::from_products(payer, products, &self.config.currency)
            .ok_or(PaymentFlowError::EmptyOrderError)?;
        let item_count = order.item_count();
        let order = self.db.insert_order(order).await.map_err(PaymentFlowError::database)?;
        info!(
            "🛒️ Order {} created for {}: {} {} ({})",
            order.id,
            order.payer,
            order.total_amount,
            order.currency,
            order.line_items.iter().map(|li| li.to_string()).collect::<Vec<_>>().join(", ")
        );
        let request = self.gateway_request(&order, item_count);
        let data = encode(&request).map_err(|e| PaymentFlowError::EncodingError(e.to_string()))?;
        let signature = self.config.signer().sign(&data);
        trace!("🛒️ Signed gateway request for order {}: {data}", order.id);
        Ok(SignedCheckout { order, request, data, signature, checkout_url: self.config.checkout_url.clone() })
    }
}
