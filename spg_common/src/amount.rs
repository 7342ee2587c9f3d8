use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "UAH";

const MINOR_UNITS: i64 = 100;

//--------------------------------------       Amount        ---------------------------------------------------------
/// A monetary value held as an integer number of minor units (kopiykas, cents). Always rendered with exactly two
/// fraction digits, e.g. `220.00`.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Amount(i64);

op!(binary Amount, Add, add);
op!(binary Amount, Sub, sub);

impl Mul<i64> for Amount {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Value cannot be represented as an amount: {0}")]
pub struct AmountConversionError(String);

impl From<i64> for Amount {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl Amount {
    /// The amount in minor units
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Creates an amount from a whole number of major units, e.g. `Amount::from_major(100)` is `100.00`.
    pub fn from_major(units: i64) -> Self {
        Self(units * MINOR_UNITS)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_UNITS as u64;
        let minor = abs % MINOR_UNITS as u64;
        write!(f, "{sign}{major}.{minor:02}")
    }
}

impl FromStr for Amount {
    type Err = AmountConversionError;

    /// Parses `"120"`, `"120.5"` and `"120.50"`. More than two fraction digits are rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };
        let is_numeric = |v: &str| v.chars().all(|c| c.is_ascii_digit());
        if major.is_empty() || !is_numeric(major) || !is_numeric(minor) || minor.len() > 2 {
            return Err(AmountConversionError(s.to_string()));
        }
        let major = major.parse::<i64>().map_err(|e| AmountConversionError(format!("{s}. {e}")))?;
        let minor = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|e| AmountConversionError(format!("{s}. {e}")))? * 10,
            _ => minor.parse::<i64>().map_err(|e| AmountConversionError(format!("{s}. {e}")))?,
        };
        let value = major
            .checked_mul(MINOR_UNITS)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(|| AmountConversionError(format!("{s} is too large")))?;
        Ok(Self(if negative { -value } else { value }))
    }
}
