use sqlx::SqliteConnection;

use super::SqliteDatabaseError;
use crate::db_types::{Product, ProductId};

pub async fn fetch_product(id: ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, SqliteDatabaseError> {
    let product = sqlx::query_as("SELECT id, name, price, description FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

pub async fn fetch_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, SqliteDatabaseError> {
    let products =
        sqlx::query_as("SELECT id, name, price, description FROM products ORDER BY id").fetch_all(conn).await?;
    Ok(products)
}
