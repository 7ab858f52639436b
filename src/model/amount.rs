//! Amount type for handling the monetary value of an expense.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts carry no currency; the
//! currency is a display preference held by the store and is only used when formatting.

use crate::model::Currency;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Represents the amount of an expense.
///
/// Amounts are written to JSON as numbers, which is what the remote API expects. They can be read
/// back from JSON numbers or strings.
///
/// # Examples
///
/// ```
/// # use spendlog::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,050.5").unwrap();
/// assert_eq!(amount.to_string(), "1050.50");
/// ```
///
/// Rounding is to the nearest cent, with halves rounded away from zero:
/// ```
/// # use spendlog::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("2.675").unwrap();
/// assert_eq!(amount.round2(), Amount::from_str("2.68").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Rounds to 2 decimal places, with a half cent rounded away from zero.
    pub fn round2(&self) -> Self {
        Self::new(
            self.value
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Formats the amount with the symbol of `currency`, e.g. `₨123.40`.
    pub fn display_with(&self, currency: Currency) -> String {
        format!("{}{self}", currency.symbol())
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a plain number, optionally preceded by a currency symbol and using commas as
    /// thousands separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let without_symbol = Currency::ALL
            .iter()
            .find_map(|c| trimmed.strip_prefix(c.symbol()))
            .unwrap_or(trimmed);
        let cleaned = without_symbol.trim().replace(',', "");

        let value = Decimal::from_str(&cleaned).map_err(AmountError)?;
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round2().value)
    }
}

impl Add for Amount {
    type Output = Amount;

    /// Saturates at `Decimal::MAX` or `Decimal::MIN` instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.value.saturating_add(rhs.value))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("{v} is not a valid amount")));
        }
        // The shortest round-trip representation of an f64 is what the sender wrote, e.g. 9.99.
        Amount::from_str(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
