use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::OrderManagement,
    db_types::{Order, OrderId, OrderStatusType, StatusUpdate},
    gateway::{decode, GatewayNotification, GatewayReference, GatewaySigner},
    payment_api::errors::PaymentFlowError,
};

/// The result of a successfully processed callback. Repeats and refused transitions are successes too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub order_id: OrderId,
    pub update: StatusUpdate,
}

/// `CallbackApi` processes the payment status notifications the gateway posts to the server URL.
///
/// Notifications can arrive more than once, out of order and concurrently. Only authenticated notifications for
/// orders we issued are acted on, and the order status only ever moves towards finality.
pub struct CallbackApi<B> {
    db: B,
    signer: GatewaySigner,
}

impl<B> Debug for CallbackApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CallbackApi")
    }
}

impl<B> CallbackApi<B> {
    pub fn new(db: B, signer: GatewaySigner) -> Self {
        Self { db, signer }
    }

    /// Checks the signature and decodes the payload. Nothing is decoded before the signature has been verified.
    pub fn authenticate(&self, data: &str, signature: &str) -> Result<GatewayNotification, PaymentFlowError> {
        if data.is_empty() || signature.is_empty() {
            return Err(PaymentFlowError::ValidationError("Missing data or signature".into()));
        }
        if !self.signer.verify(data, signature) {
            return Err(PaymentFlowError::AuthenticityError);
        }
        decode::<GatewayNotification>(data).map_err(|e| PaymentFlowError::ValidationError(e.to_string()))
    }
}

impl<B> CallbackApi<B>
where B: OrderManagement
{
    /// Processes one callback:
    /// 1. An empty `data` or `signature` is a `ValidationError`.
    /// 2. A signature that does not match `data` is an `AuthenticityError`.
    /// 3. A payload that cannot be decoded, or that carries a malformed order reference, is a `ValidationError`.
    /// 4. An order we don't know, or whose stored reference differs from the one presented, is a `NotFoundError`.
    /// 5. Otherwise the mapped status is applied if the transition is allowed. A no-op is still a success.
    pub async fn process_callback(&self, data: &str, signature: &str) -> Result<CallbackOutcome, PaymentFlowError> {
        let notification = self.authenticate(data, signature)?;
        let reference = notification
            .order_id
            .parse::<GatewayReference>()
            .map_err(|e| PaymentFlowError::ValidationError(e.to_string()))?;
        let order_id = reference.order_id().map_err(|e| PaymentFlowError::ValidationError(e.to_string()))?;
        let order = self
            .db
            .fetch_order_by_id(order_id)
            .await
            .map_err(PaymentFlowError::database)?
            .filter(|o| o.gateway_reference == reference)
            .ok_or_else(|| PaymentFlowError::NotFoundError(format!("Order with reference {reference}")))?;
        check_amount(&order, &notification);
        let status = OrderStatusType::from_gateway_status(&notification.status);
        let update = self
            .db
            .update_order_status(order_id, &status, &notification.status)
            .await
            .map_err(PaymentFlowError::database)?;
        match &update {
            StatusUpdate::Applied { to } => {
                info!("🔄️💳️ Order {order_id} is now {to} (gateway status: {})", notification.status)
            },
            StatusUpdate::Unchanged { current } => debug!(
                "🔄️💳️ Order {order_id} stays {current}. Gateway status '{}' was ignored",
                notification.status
            ),
        }
        if let Some(code) = &notification.err_code {
            warn!(
                "🔄️💳️ Gateway reported error '{code}' for order {order_id}: {}",
                notification.err_description.as_deref().unwrap_or("no description")
            );
        }
        Ok(CallbackOutcome { order_id, update })
    }
}

/// Discrepancies are logged, but do not stop the status from being applied.
fn check_amount(order: &Order, notification: &GatewayNotification) {
    if let Some(amount) = notification.amount() {
        if amount != order.total_amount {
            warn!(
                "🔄️💳️ Gateway amount {amount} does not match the total {} of order {}",
                order.total_amount, order.id
            );
        }
    }
    if let Some(currency) = &notification.currency {
        if !currency.eq_ignore_ascii_case(&order.currency) {
            warn!("🔄️💳️ Gateway currency {currency} does not match {} for order {}", order.currency, order.id);
        }
    }
}
