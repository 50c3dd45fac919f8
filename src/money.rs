//! Monetary amount type backed by `rust_decimal`.
//!
//! Amounts keep whatever precision the input carried; nothing is rescaled at
//! parse time. Sums are exact, so folding amounts in any order yields the
//! same total. Addition is checked: a sum past the `Decimal` range is reported
//! instead of panicking.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why an amount field did not parse.
#[derive(Error, Debug)]
pub enum AmountError {
    /// Digit group separators such as `1_000` are not part of the grammar
    #[error("digit separator `_` is not allowed")]
    Separator,

    #[error(transparent)]
    Decimal(#[from] rust_decimal::Error),
}

/// A signed currency amount.
///
/// Displayed with two decimal places and serialized as a JSON float, which is
/// the shape downstream consumers expect.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use transaction_summary::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// assert_eq!(Amount::from_str("1.5e2").unwrap().to_string(), "150.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Largest representable amount.
    pub const MAX: Self = Amount(Decimal::MAX);

    /// Wraps a `Decimal` without touching its scale.
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Sum of `self` and `rhs`, or `None` if it leaves the `Decimal` range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Lossy conversion used for the JSON wire format.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts plain decimals (`-12.50`) and scientific notation (`1.25e2`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.contains('_') {
            return Err(AmountError::Separator);
        }

        let value = if s.contains(['e', 'E']) {
            Decimal::from_scientific(s)?
        } else {
            Decimal::from_str(s)?
        };
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}
