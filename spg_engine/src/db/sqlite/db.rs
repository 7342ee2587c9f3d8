//! `SqliteDatabase` is the concrete storefront backend. It implements every trait in [`crate::db::traits`].
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{catalog, db_url, new_pool, orders, run_migrations, sessions, SqliteDatabaseError};
use crate::{
    db::traits::{CatalogManagement, OrderManagement, SessionManagement},
    db_types::{NewOrder, Order, OrderId, OrderStatusType, Product, ProductId, Session, SessionId, StatusUpdate},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `SPG_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        trace!("🗃️ Created new connection pool for {url}");
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        run_migrations(&self.pool).await
    }

    pub async fn close(&mut self) -> Result<(), SqliteDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn insert_order(&self, order: NewOrder) -> Result<Order, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let id = orders::insert_order(order, &mut tx).await?;
        let order = orders::fetch_order_by_id(id, &mut tx).await?.ok_or(SqliteDatabaseError::OrderNotFound(id))?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order_by_id(&self, id: OrderId) -> Result<Option<Order>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_id(id, &mut conn).await
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: &OrderStatusType,
        gateway_status: &str,
    ) -> Result<StatusUpdate, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        if orders::update_order_status(id, status, gateway_status, &mut conn).await? {
            debug!("🗃️ Order {id} moved to {status}");
            return Ok(StatusUpdate::Applied { to: status.clone() });
        }
        let order = orders::fetch_order_by_id(id, &mut conn).await?.ok_or(SqliteDatabaseError::OrderNotFound(id))?;
        debug!("🗃️ Order {id} stays {} (gateway sent {gateway_status})", order.status);
        Ok(StatusUpdate::Unchanged { current: order.status })
    }
}

impl CatalogManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_product(id, &mut conn).await
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_products(&mut conn).await
    }
}

impl SessionManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn create_session(&self) -> Result<Session, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        sessions::create_session(&mut conn).await
    }

    async fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        sessions::fetch_session(id, &mut conn).await
    }

    async fn set_payer(&self, id: &SessionId, payer: &str) -> Result<Session, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        sessions::set_payer(id, payer, &mut conn).await?.ok_or_else(|| SqliteDatabaseError::SessionNotFound(id.to_string()))
    }

    async fn add_to_cart(&self, id: &SessionId, product: ProductId) -> Result<Vec<ProductId>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        sessions::add_to_cart(id, product, &mut conn)
            .await?
            .ok_or_else(|| SqliteDatabaseError::SessionNotFound(id.to_string()))
    }

    async fn clear_cart(&self, id: &SessionId) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        match sessions::clear_cart(id, &mut conn).await? {
            true => Ok(()),
            false => Err(SqliteDatabaseError::SessionNotFound(id.to_string())),
        }
    }

    async fn set_pending_order(&self, id: &SessionId, order: OrderId) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        match sessions::set_pending_order(id, order, &mut conn).await? {
            true => Ok(()),
            false => Err(SqliteDatabaseError::SessionNotFound(id.to_string())),
        }
    }

    async fn clear_cart_for_paid_order(&self, id: &SessionId, order: OrderId) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        let cleared = sessions::clear_cart_for_order(id, order, &mut conn).await?;
        if cleared {
            debug!("🗃️ Cart for session {id} cleared after order {order} was paid");
        }
        Ok(cleared)
    }
}
