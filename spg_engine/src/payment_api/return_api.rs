use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{OrderManagement, SessionManagement},
    db_types::{Order, OrderId, SessionId},
    payment_api::errors::PaymentFlowError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOutcome {
    pub order: Order,
    /// True if this visit cleared the returning session's cart.
    pub cart_cleared: bool,
}

/// `ReturnApi` serves the customer arriving back from the gateway. It only ever reads the order status; the status
/// itself is driven by the gateway callbacks.
pub struct ReturnApi<B> {
    db: B,
}

impl<B> Debug for ReturnApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReturnApi")
    }
}

impl<B> ReturnApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReturnApi<B>
where B: OrderManagement + SessionManagement
{
    /// Looks up the order. If it is `Paid` and it is the order the session was sent to pay for, the session's cart
    /// is cleared. Visiting the page for someone else's order, or before the payment is confirmed, leaves the cart
    /// alone.
    pub async fn order_returned(
        &self,
        order_id: OrderId,
        session: Option<&SessionId>,
    ) -> Result<ReturnOutcome, PaymentFlowError> {
        let order = self
            .db
            .fetch_order_by_id(order_id)
            .await
            .map_err(PaymentFlowError::database)?
            .ok_or_else(|| PaymentFlowError::NotFoundError(format!("Order {order_id}")))?;
        let cart_cleared = match (order.status.is_paid(), session) {
            (true, Some(session)) => {
                self.db.clear_cart_for_paid_order(session, order_id).await.map_err(PaymentFlowError::database)?
            },
            _ => false,
        };
        debug!("🔙️ Customer returned for order {order_id} ({}). Cart cleared: {cart_cleared}", order.status);
        Ok(ReturnOutcome { order, cart_cleared })
    }
}
