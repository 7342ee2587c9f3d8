use crate::db_types::{OrderId, ProductId, Session, SessionId};

/// The `SessionManagement` trait defines the behaviour for tracking visitor sessions.
///
/// Every method that takes a `SessionId` returns an error if the session does not exist, with the exception of
/// [`SessionManagement::fetch_session`].
#[allow(async_fn_in_trait)]
pub trait SessionManagement {
    type Error: std::error::Error;

    /// Creates a new anonymous session with an empty cart.
    async fn create_session(&self) -> Result<Session, Self::Error>;

    async fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, Self::Error>;

    /// Records the payer identity for the session.
    async fn set_payer(&self, id: &SessionId, payer: &str) -> Result<Session, Self::Error>;

    /// Appends a product to the cart. The product is not checked against the catalog. Returns the updated cart.
    async fn add_to_cart(&self, id: &SessionId, product: ProductId) -> Result<Vec<ProductId>, Self::Error>;

    /// Empties the cart and forgets any pending order.
    async fn clear_cart(&self, id: &SessionId) -> Result<(), Self::Error>;

    /// Remembers that `order` was created from this session's cart.
    async fn set_pending_order(&self, id: &SessionId, order: OrderId) -> Result<(), Self::Error>;

    /// Clears the cart and the pending order marker, but only if the pending order is `order`. Returns `true` if
    /// the cart was cleared. Calling this again for the same order is harmless and returns `false`.
    async fn clear_cart_for_paid_order(&self, id: &SessionId, order: OrderId) -> Result<bool, Self::Error>;
}
