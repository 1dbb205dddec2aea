//! Price parsing, limits and lookup input.
//!
//! Lookups accept a price either as a native number or as its string
//! representation; both normalize to an exact `Decimal` before comparison.
//! Document prices go through the same string rule.

use core::str::FromStr;
use rust_decimal::Decimal;

use catalog_core::{DomainError, DomainResult};

/// A price to match against, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceQuery {
    Exact(Decimal),
    Text(String),
}

impl PriceQuery {
    /// Resolve to an exact decimal.
    ///
    /// Text follows [`parse_price`], so `" \"12.50\" "` matches `12.50`.
    pub fn normalize(&self) -> DomainResult<Decimal> {
        match self {
            PriceQuery::Exact(price) => Ok(*price),
            PriceQuery::Text(raw) => parse_price(raw),
        }
    }
}

/// Decimal places a stored price may carry.
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound on a stored price's magnitude (`NUMERIC(14, 2)`).
// 1_000_000_000_000 == 0xE8_D4A5_1000, split into 32-bit lo/mid words.
pub const PRICE_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Parse the string form of a price.
///
/// Surrounding spaces and double quotes are stripped; the rest must be an
/// optionally signed decimal, plain or scientific. Digit separators such as
/// `1_000` are rejected.
pub fn parse_price(raw: &str) -> DomainResult<Decimal> {
    let text = raw.trim_matches(|c| c == ' ' || c == '"');
    let invalid = || DomainError::validation(format!("Invalid price: '{raw}'"));

    let well_formed = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !well_formed {
        return Err(invalid());
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| invalid())
}

/// Check that a price fits the stored precision: at most two decimal places
/// (trailing zeros ignored) and magnitude below one trillion.
pub fn check_price(price: Decimal) -> DomainResult<()> {
    if price.normalize().scale() > PRICE_SCALE {
        return Err(DomainError::validation(format!(
            "Invalid price: {price} has more than {PRICE_SCALE} decimal places"
        )));
    }
    if price.abs() >= PRICE_LIMIT {
        return Err(DomainError::validation(format!(
            "Invalid price: {price} must be below {PRICE_LIMIT}"
        )));
    }
    Ok(())
}

impl From<Decimal> for PriceQuery {
    fn from(value: Decimal) -> Self {
        PriceQuery::Exact(value)
    }
}

impl From<i64> for PriceQuery {
    fn from(value: i64) -> Self {
        PriceQuery::Exact(Decimal::from(value))
    }
}

impl From<i32> for PriceQuery {
    fn from(value: i32) -> Self {
        PriceQuery::Exact(Decimal::from(value))
    }
}

impl From<u32> for PriceQuery {
    fn from(value: u32) -> Self {
        PriceQuery::Exact(Decimal::from(value))
    }
}

impl From<&str> for PriceQuery {
    fn from(value: &str) -> Self {
        PriceQuery::Text(value.to_string())
    }
}

impl From<String> for PriceQuery {
    fn from(value: String) -> Self {
        PriceQuery::Text(value)
    }
}
