use crate::db_types::{NewOrder, Order, OrderId, OrderStatusType, StatusUpdate};

/// The `OrderManagement` trait defines the behaviour for storing orders and driving their payment status.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    type Error: std::error::Error;

    /// Stores a brand-new order with status `PendingPayment` and assigns its gateway reference. Both happen
    /// atomically: an order never exists without a reference.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, Self::Error>;

    async fn fetch_order_by_id(&self, id: OrderId) -> Result<Option<Order>, Self::Error>;

    /// Moves the order to `status` if, and only if, [`OrderStatusType::can_transition_to`] allows it. The check and
    /// the write are a single atomic step, so concurrent callers can never both observe the old status.
    ///
    /// `gateway_status` is the raw status string received from the gateway.
    ///
    /// A refused transition is not an error; `StatusUpdate::Unchanged` is returned with the order's current status.
    async fn update_order_status(
        &self,
        id: OrderId,
        status: &OrderStatusType,
        gateway_status: &str,
    ) -> Result<StatusUpdate, Self::Error>;
}
