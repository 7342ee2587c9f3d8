use crate::db_types::{Product, ProductId};

/// Read-only access to the product catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    type Error: std::error::Error;

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, Self::Error>;

    /// All products, in id order.
    async fn fetch_products(&self) -> Result<Vec<Product>, Self::Error>;
}
