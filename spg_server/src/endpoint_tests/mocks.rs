use mockall::mock;
use spg_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, Product, ProductId, Session, SessionId, StatusUpdate},
    CatalogManagement,
    OrderManagement,
    SessionManagement,
    SqliteDatabaseError,
};

mock! {
    pub Backend {}
    impl OrderManagement for Backend {
        type Error = SqliteDatabaseError;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, SqliteDatabaseError>;
        async fn fetch_order_by_id(&self, id: OrderId) -> Result<Option<Order>, SqliteDatabaseError>;
        async fn update_order_status(&self, id: OrderId, status: &OrderStatusType, gateway_status: &str) -> Result<StatusUpdate, SqliteDatabaseError>;
    }
    impl CatalogManagement for Backend {
        type Error = SqliteDatabaseError;
        async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, SqliteDatabaseError>;
        async fn fetch_products(&self) -> Result<Vec<Product>, SqliteDatabaseError>;
    }
    impl SessionManagement for Backend {
        type Error = SqliteDatabaseError;
        async fn create_session(&self) -> Result<Session, SqliteDatabaseError>;
        async fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, SqliteDatabaseError>;
        async fn set_payer(&self, id: &SessionId, payer: &str) -> Result<Session, SqliteDatabaseError>;
        async fn add_to_cart(&self, id: &SessionId, product: ProductId) -> Result<Vec<ProductId>, SqliteDatabaseError>;
        async fn clear_cart(&self, id: &SessionId) -> Result<(), SqliteDatabaseError>;
        async fn set_pending_order(&self, id: &SessionId, order: OrderId) -> Result<(), SqliteDatabaseError>;
        async fn clear_cart_for_paid_order(&self, id: &SessionId, order: OrderId) -> Result<bool, SqliteDatabaseError>;
    }
}
