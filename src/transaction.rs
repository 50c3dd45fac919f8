//! Transaction records produced by the CSV parser.

use crate::error::ParseError;
use crate::money::Amount;
use csv::StringRecord;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Minimum number of fields a data row must carry: `id, type, amount, date`.
pub const MIN_FIELDS: usize = 4;

const TYPE_FIELD: usize = 1;
const AMOUNT_FIELD: usize = 2;
const DATE_FIELD: usize = 3;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    Debit,
    Credit,
}

impl TxType {
    /// Case-insensitive match against `debit` / `credit`.
    ///
    /// Anything else, including surrounding whitespace, is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "debit" => Some(TxType::Debit),
            "credit" => Some(TxType::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Debit => f.write_str("debit"),
            TxType::Credit => f.write_str("credit"),
        }
    }
}

/// A `YYYY-MM` bucket taken from the first seven characters of a date.
///
/// Only the length is checked; `2024-13` or `abcdefg` are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    /// Number of characters in a month key.
    pub const LEN: usize = 7;

    /// Extracts the month key from a date string, or `None` if it is too short.
    pub fn from_date(date: &str) -> Option<Self> {
        let key: String = date.chars().take(Self::LEN).collect();
        if key.chars().count() < Self::LEN {
            return None;
        }
        Some(MonthKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MonthKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated transaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub tx_type: TxType,
    pub amount: Amount,
    pub month: MonthKey,
}

impl TransactionRecord {
    pub fn new(tx_type: TxType, amount: Amount, month: MonthKey) -> Self {
        TransactionRecord {
            tx_type,
            amount,
            month,
        }
    }

    /// Validates one raw CSV row.
    ///
    /// Checks run in a fixed order: field count, type, amount, date. The first
    /// failing check decides the error. `line` is the 1-indexed line in the
    /// input, used for error reporting only.
    pub fn from_row(row: &StringRecord, line: u64) -> Result<Self, ParseError> {
        if row.len() < MIN_FIELDS {
            return Err(ParseError::MalformedRow {
                row: line,
                fields: row.len(),
                content: row.iter().collect::<Vec<_>>().join(","),
            });
        }

        let raw_type = &row[TYPE_FIELD];
        let tx_type = TxType::parse(raw_type).ok_or_else(|| ParseError::InvalidTransactionType {
            row: line,
            value: raw_type.to_string(),
        })?;

        let raw_amount = &row[AMOUNT_FIELD];
        let amount =
            Amount::from_str(raw_amount).map_err(|source| ParseError::InvalidAmount {
                row: line,
                value: raw_amount.to_string(),
                source,
            })?;

        let raw_date = &row[DATE_FIELD];
        let month = MonthKey::from_date(raw_date).ok_or_else(|| ParseError::InvalidDate {
            row: line,
            value: raw_date.to_string(),
        })?;

        Ok(TransactionRecord::new(tx_type, amount, month))
    }
}
