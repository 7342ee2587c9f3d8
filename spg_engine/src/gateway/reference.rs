//! The gateway reference is the only thing that ties a callback back to an order. It has the form
//! `spg-{order id}-{suffix}`, where the suffix is drawn from the OS random number generator so that references for
//! neighbouring orders cannot be guessed from one another.
use std::{fmt::Display, str::FromStr};

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::db_types::OrderId;

pub const GATEWAY_REFERENCE_PREFIX: &str = "spg";
const SUFFIX_LENGTH: usize = 16;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid gateway reference: {0}")]
pub struct ReferenceError(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct GatewayReference(String);

impl GatewayReference {
    /// Generates a fresh reference for the given order.
    pub fn generate(order_id: OrderId) -> Self {
        let suffix: String = OsRng.sample_iter(&Alphanumeric).take(SUFFIX_LENGTH).map(char::from).collect();
        Self(format!("{GATEWAY_REFERENCE_PREFIX}-{}-{suffix}", order_id.value()))
    }

    /// Extracts the order id embedded in the reference.
    pub fn order_id(&self) -> Result<OrderId, ReferenceError> {
        parse_reference(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_reference(s: &str) -> Result<OrderId, ReferenceError> {
    let mut parts = s.splitn(3, '-');
    let (prefix, id, suffix) = match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(id), Some(suffix)) => (prefix, id, suffix),
        _ => return Err(ReferenceError(format!("{s} does not have three parts"))),
    };
    if prefix != GATEWAY_REFERENCE_PREFIX {
        return Err(ReferenceError(format!("{s} has an unknown prefix")));
    }
    if suffix.len() != SUFFIX_LENGTH || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ReferenceError(format!("{s} has a malformed suffix")));
    }
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReferenceError(format!("{s} has a malformed order id")));
    }
    let id = id.parse::<i64>().map_err(|e| ReferenceError(format!("{s}. {e}")))?;
    Ok(OrderId(id))
}

impl FromStr for GatewayReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_reference(s)?;
        Ok(Self(s.to_string()))
    }
}

impl Display for GatewayReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
