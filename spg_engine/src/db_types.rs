use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use spg_common::Amount;
use sqlx::Type;
use thiserror::Error;

use crate::gateway::GatewayReference;

pub const GUEST_PAYER: &str = "guest";
const SESSION_TOKEN_LENGTH: usize = 32;

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for OrderId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|e| ConversionError(format!("Invalid order id: {s}. {e}")))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------       ProductId       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------        Product        ---------------------------------------------------------
/// A catalog entry. The catalog is read-only from the point of view of the payment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
    pub description: String,
}

//--------------------------------------        LineItem       ---------------------------------------------------------
/// A snapshot of a purchased product, taken at checkout. Later catalog edits do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Amount,
    pub quantity: i64,
}

impl LineItem {
    pub fn line_total(&self) -> Amount {
        self.unit_price * self.quantity
    }
}

impl Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.quantity, self.name)
    }
}

/// Collapses a list of products into line items. Repeated products are merged into a single line item with the
/// quantity incremented; the position of the first occurrence is kept.
pub fn merge_products<I>(products: I) -> Vec<LineItem>
where I: IntoIterator<Item = Product> {
    let mut line_items: Vec<LineItem> = Vec::new();
    for product in products {
        match line_items.iter_mut().find(|li| li.product_id == product.id) {
            Some(item) => item.quantity += 1,
            None => line_items.push(LineItem {
                product_id: product.id,
                name: product.name,
                unit_price: product.price,
                quantity: 1,
            }),
        }
    }
    line_items
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub payer: String,
    pub line_items: Vec<LineItem>,
    pub total_amount: Amount,
    pub currency: String,
}

impl NewOrder {
    /// Builds a new order from resolved catalog products, in cart order. See [`merge_products`].
    ///
    /// Returns `None` if there are no products.
    pub fn from_products<I>(payer: &str, products: I, currency: &str) -> Option<Self>
    where I: IntoIterator<Item = Product> {
        let line_items = merge_products(products);
        if line_items.is_empty() {
            return None;
        }
        let total_amount = line_items.iter().map(LineItem::line_total).sum();
        let payer = if payer.trim().is_empty() { GUEST_PAYER } else { payer };
        Some(Self { payer: payer.to_string(), line_items, total_amount, currency: currency.to_string() })
    }

    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|li| li.quantity).sum()
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The payment status of an order.
///
/// | From \ To      | Paid | PaymentFailed | Unknown |
/// |----------------|------|---------------|---------|
/// | PendingPayment | yes  | yes           | yes     |
/// | Unknown        | yes  | yes           | yes (*) |
/// | PaymentFailed  | yes  | no            | no      |
/// | Paid           | no   | no            | no      |
///
/// (*) Only when the raw gateway status differs. Moving to an identical status is always a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been created and no conclusive callback has been received.
    PendingPayment,
    /// The gateway confirmed payment. This status is final.
    Paid,
    /// The gateway reported a failure. A late success may still supersede this.
    PaymentFailed,
    /// The gateway sent a status we don't map, kept verbatim for operators.
    Unknown(String),
}

impl OrderStatusType {
    /// Maps a raw gateway status onto an order status. Matching is case-insensitive but otherwise exact, and the
    /// raw value is stored as received for unrecognised statuses. Whether a payment is a sandbox payment is decided
    /// by configuration, so a bare `sandbox` status is not a payment confirmation.
    pub fn from_gateway_status(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "success" | "sandbox-success" => Self::Paid,
            "failure" | "error" => Self::PaymentFailed,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Whether an automatic status change from `self` to `new` is permitted. The database applies the same rule
    /// inside its conditional update.
    pub fn can_transition_to(&self, new: &OrderStatusType) -> bool {
        use OrderStatusType::*;
        match (self, new) {
            (Paid, _) => false,
            (PaymentFailed, Paid) => true,
            (PaymentFailed, _) => false,
            (current, new) if current == new => false,
            _ => true,
        }
    }

    /// The value stored in the `status` column
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PendingPayment",
            Self::Paid => "Paid",
            Self::PaymentFailed => "PaymentFailed",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Reassembles a status from the `status` and `gateway_status` columns.
    pub fn from_db_columns(status: &str, gateway_status: Option<String>) -> Result<Self, ConversionError> {
        match status {
            "PendingPayment" => Ok(Self::PendingPayment),
            "Paid" => Ok(Self::Paid),
            "PaymentFailed" => Ok(Self::PaymentFailed),
            "Unknown" => Ok(Self::Unknown(gateway_status.unwrap_or_default())),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::PendingPayment => write!(f, "PendingPayment"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::PaymentFailed => write!(f, "PaymentFailed"),
            OrderStatusType::Unknown(raw) => write!(f, "Unknown({raw})"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(pub String);

//--------------------------------------         Order         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub payer: String,
    pub line_items: Vec<LineItem>,
    pub total_amount: Amount,
    pub currency: String,
    pub status: OrderStatusType,
    pub gateway_reference: GatewayReference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      StatusUpdate     ---------------------------------------------------------
/// The result of trying to apply a gateway status to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The status was written.
    Applied { to: OrderStatusType },
    /// The transition was not permitted, or was a repeat. The order is untouched.
    Unchanged { current: OrderStatusType },
}

impl StatusUpdate {
    pub fn current(&self) -> &OrderStatusType {
        match self {
            Self::Applied { to, .. } => to,
            Self::Unchanged { current } => current,
        }
    }

    pub fn was_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

//--------------------------------------        Session        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// A new random session token from the OS random number generator.
    pub fn generate() -> Self {
        let token: String = OsRng.sample_iter(&Alphanumeric).take(SESSION_TOKEN_LENGTH).map(char::from).collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Session ids are bearer tokens, so only show a prefix
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "{prefix}…")
    }
}

/// The per-visitor state held by the session collaborator: who is shopping, what is in the cart, and which order
/// (if any) they were sent off to pay for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub payer: Option<String>,
    pub cart: Vec<ProductId>,
    pub pending_order_id: Option<OrderId>,
}

impl Session {
    pub fn payer_identity(&self) -> &str {
        self.payer.as_deref().unwrap_or(GUEST_PAYER)
    }
}
