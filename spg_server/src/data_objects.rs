use std::fmt::Display;

use serde::{Deserialize, Serialize};
use spg_engine::{
    db_types::{LineItem, Product},
    CartSummary,
    ReturnOutcome,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
}

/// The form the gateway posts to the callback URL. Missing fields are read as empty, so that they are rejected the
/// same way as any other malformed callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackForm {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub description: String,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self { id: p.id.0, name: p.name, price: p.price.to_string(), description: p.description }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: String,
    pub quantity: i64,
    pub line_total: String,
}

impl From<LineItem> for CartLine {
    fn from(item: LineItem) -> Self {
        Self {
            product_id: item.product_id.0,
            line_total: item.line_total().to_string(),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
            name: item.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub payer: String,
    pub items: Vec<CartLine>,
    pub total: String,
}

impl CartView {
    pub fn new(payer: &str, summary: CartSummary) -> Self {
        Self {
            payer: payer.to_string(),
            total: summary.total.to_string(),
            items: summary.items.into_iter().map(CartLine::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnView {
    pub order_id: i64,
    pub status: String,
    pub total_amount: String,
    pub currency: String,
    pub cart_cleared: bool,
}

impl From<ReturnOutcome> for ReturnView {
    fn from(outcome: ReturnOutcome) -> Self {
        let order = outcome.order;
        Self {
            order_id: order.id.value(),
            status: order.status.to_string(),
            total_amount: order.total_amount.to_string(),
            currency: order.currency,
            cart_cleared: outcome.cart_cleared,
        }
    }
}
