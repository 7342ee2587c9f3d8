use log::debug;
use sqlx::{types::Json, FromRow, SqliteConnection};

use super::SqliteDatabaseError;
use crate::db_types::{OrderId, ProductId, Session, SessionId};

#[derive(Debug, FromRow)]
struct SessionRow {
    id: String,
    payer: Option<String>,
    cart: Json<Vec<ProductId>>,
    pending_order_id: Option<i64>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId(row.id),
            payer: row.payer,
            cart: row.cart.0,
            pending_order_id: row.pending_order_id.map(OrderId),
        }
    }
}

pub async fn create_session(conn: &mut SqliteConnection) -> Result<Session, SqliteDatabaseError> {
    let id = SessionId::generate();
    let row: SessionRow = sqlx::query_as(
        r#"
            INSERT INTO sessions (id) VALUES ($1)
            RETURNING id, payer, cart, pending_order_id;
        "#,
    )
    .bind(id.as_str())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ New session {id} created");
    Ok(row.into())
}

pub async fn fetch_session(id: &SessionId, conn: &mut SqliteConnection) -> Result<Option<Session>, SqliteDatabaseError> {
    let row: Option<SessionRow> = sqlx::query_as("SELECT id, payer, cart, pending_order_id FROM sessions WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Session::from))
}

pub async fn set_payer(
    id: &SessionId,
    payer: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Session>, SqliteDatabaseError> {
    let row: Option<SessionRow> = sqlx::query_as(
        r#"
            UPDATE sessions SET payer = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2
            RETURNING id, payer, cart, pending_order_id;
        "#,
    )
    .bind(payer)
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(row.map(Session::from))
}

/// Appends the product to the JSON cart array in place, so that two concurrent additions cannot overwrite each other.
pub async fn add_to_cart(
    id: &SessionId,
    product: ProductId,
    conn: &mut SqliteConnection,
) -> Result<Option<Vec<ProductId>>, SqliteDatabaseError> {
    let cart: Option<Json<Vec<ProductId>>> = sqlx::query_scalar(
        r#"
            UPDATE sessions SET cart = json_insert(cart, '$[#]', $1), updated_at = CURRENT_TIMESTAMP WHERE id = $2
            RETURNING cart;
        "#,
    )
    .bind(product)
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(cart.map(|c| c.0))
}

/// Returns `false` if the session does not exist.
pub async fn clear_cart(id: &SessionId, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE sessions SET cart = '[]', pending_order_id = NULL, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
    )
    .bind(id.as_str())
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Returns `false` if the session does not exist.
pub async fn set_pending_order(
    id: &SessionId,
    order: OrderId,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result =
        sqlx::query("UPDATE sessions SET pending_order_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
            .bind(order.value())
            .bind(id.as_str())
            .execute(conn)
            .await?;
    Ok(result.rows_affected() == 1)
}

/// Clears the cart only while `order` is still the session's pending order.
pub async fn clear_cart_for_order(
    id: &SessionId,
    order: OrderId,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            UPDATE sessions SET cart = '[]', pending_order_id = NULL, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND pending_order_id = $2;
        "#,
    )
    .bind(id.as_str())
    .bind(order.value())
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}
