use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use spg_common::Amount;
use sqlx::{types::Json, FromRow, SqliteConnection};

use super::SqliteDatabaseError;
use crate::{
    db_types::{LineItem, NewOrder, Order, OrderId, OrderStatusType},
    gateway::GatewayReference,
};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    payer: String,
    line_items: Json<Vec<LineItem>>,
    total_amount: i64,
    currency: String,
    status: String,
    gateway_status: Option<String>,
    gateway_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = SqliteDatabaseError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = OrderId(row.id);
        let reference = row
            .gateway_reference
            .ok_or_else(|| SqliteDatabaseError::ConversionError(format!("Order {id} has no gateway reference")))?;
        let gateway_reference = GatewayReference::from_str(&reference)
            .map_err(|e| SqliteDatabaseError::ConversionError(format!("Order {id}. {e}")))?;
        let status = OrderStatusType::from_db_columns(&row.status, row.gateway_status)
            .map_err(|e| SqliteDatabaseError::ConversionError(format!("Order {id}. {e}")))?;
        Ok(Self {
            id,
            payer: row.payer,
            line_items: row.line_items.0,
            total_amount: Amount::from(row.total_amount),
            currency: row.currency,
            status,
            gateway_reference,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Inserts a new order and assigns its gateway reference. The reference embeds the row id, so it can only be
/// generated after the insert. This is not atomic by itself: run it inside a transaction and pass `&mut *tx` as the
/// connection so that no order is ever visible without its reference.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<OrderId, SqliteDatabaseError> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO orders (payer, line_items, total_amount, currency)
            VALUES ($1, $2, $3, $4)
            RETURNING id;
        "#,
    )
    .bind(&order.payer)
    .bind(Json(&order.line_items))
    .bind(order.total_amount.value())
    .bind(&order.currency)
    .fetch_one(&mut *conn)
    .await?;
    let id = OrderId(id);
    let reference = GatewayReference::generate(id);
    sqlx::query("UPDATE orders SET gateway_reference = $1 WHERE id = $2")
        .bind(reference.as_str())
        .bind(id.value())
        .execute(&mut *conn)
        .await?;
    debug!("🗃️ Order {id} for {} inserted with reference {reference}", order.payer);
    Ok(id)
}

pub async fn fetch_order_by_id(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let row: Option<OrderRow> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id.value()).fetch_optional(conn).await?;
    row.map(Order::try_from).transpose()
}

/// Writes the new status if the transition is allowed, in a single statement. The `WHERE` clause mirrors
/// [`OrderStatusType::can_transition_to`]:
/// * `Paid` never changes.
/// * `PaymentFailed` only gives way to `Paid`.
/// * Writing the status an order already has is a no-op. For `Unknown`, the raw gateway status must also match.
///
/// Returns `true` if a row was updated.
pub async fn update_order_status(
    id: OrderId,
    status: &OrderStatusType,
    gateway_status: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            UPDATE orders SET status = $1, gateway_status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $3
              AND status != 'Paid'
              AND (status != 'PaymentFailed' OR $1 = 'Paid')
              AND NOT (status = $1 AND (status != 'Unknown' OR gateway_status IS $2));
        "#,
    )
    .bind(status.as_db_str())
    .bind(gateway_status)
    .bind(id.value())
    .execute(conn)
    .await?;
    let updated = result.rows_affected() == 1;
    trace!("🗃️ Status update of order {id} to {status}: {}", if updated { "applied" } else { "refused" });
    Ok(updated)
}
