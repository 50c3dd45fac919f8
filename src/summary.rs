//! Summary statistics folded from a stream of transaction records.
//!
//! # Invariants
//!
//! - `total_balance == credit_total + debit_total` (a sum, not credit minus debit)
//! - the counts in `transactions_by_month` add up to the number of records folded
//! - the result does not depend on the order records were folded in
//!
//! The `avg_*_by_month` maps hold per-month *sums*. The field names are kept
//! because downstream consumers read them; no division is applied.
//!
//! Every addition is checked. A sum that leaves the `Decimal` range fails the
//! fold with [`OverflowError`].

use crate::error::OverflowError;
use crate::money::Amount;
use crate::transaction::{MonthKey, TransactionRecord, TxType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate totals for one transaction file.
///
/// Built once by [`Aggregator::finish`] and read-only afterwards. Serializes
/// to the flat JSON object the sinks consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryData {
    debit_total: Amount,
    credit_total: Amount,
    total_balance: Amount,
    transactions_by_month: BTreeMap<MonthKey, u64>,
    avg_credits_by_month: BTreeMap<MonthKey, Amount>,
    avg_debits_by_month: BTreeMap<MonthKey, Amount>,
}

impl SummaryData {
    /// Summary of a file with no data rows.
    pub fn empty() -> Self {
        SummaryData {
            debit_total: Amount::ZERO,
            credit_total: Amount::ZERO,
            total_balance: Amount::ZERO,
            transactions_by_month: BTreeMap::new(),
            avg_credits_by_month: BTreeMap::new(),
            avg_debits_by_month: BTreeMap::new(),
        }
    }

    pub fn debit_total(&self) -> Amount {
        self.debit_total
    }

    pub fn credit_total(&self) -> Amount {
        self.credit_total
    }

    pub fn total_balance(&self) -> Amount {
        self.total_balance
    }

    pub fn transactions_by_month(&self) -> &BTreeMap<MonthKey, u64> {
        &self.transactions_by_month
    }

    /// Per-month sum of credit amounts.
    pub fn avg_credits_by_month(&self) -> &BTreeMap<MonthKey, Amount> {
        &self.avg_credits_by_month
    }

    /// Per-month sum of debit amounts.
    pub fn avg_debits_by_month(&self) -> &BTreeMap<MonthKey, Amount> {
        &self.avg_debits_by_month
    }

    /// Number of records that went into this summary.
    pub fn transaction_count(&self) -> u64 {
        self.transactions_by_month.values().sum()
    }

    /// Checks the balance invariant.
    pub fn check_invariant(&self) -> bool {
        self.credit_total.checked_add(self.debit_total) == Some(self.total_balance)
    }
}

/// Accumulates records into a [`SummaryData`].
#[derive(Debug, Default)]
pub struct Aggregator {
    debit_total: Amount,
    credit_total: Amount,
    transactions_by_month: BTreeMap<MonthKey, u64>,
    credits_by_month: BTreeMap<MonthKey, Amount>,
    debits_by_month: BTreeMap<MonthKey, Amount>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the running totals.
    ///
    /// On overflow the aggregator is left exactly as it was before the call.
    pub fn add(&mut self, record: &TransactionRecord) -> Result<(), OverflowError> {
        let (total, by_month, total_name, month_name) = match record.tx_type {
            TxType::Debit => (
                &mut self.debit_total,
                &mut self.debits_by_month,
                "debit_total",
                "avg_debits_by_month",
            ),
            TxType::Credit => (
                &mut self.credit_total,
                &mut self.credits_by_month,
                "credit_total",
                "avg_credits_by_month",
            ),
        };

        let new_total = total
            .checked_add(record.amount)
            .ok_or(OverflowError { total: total_name })?;
        let month_sum = by_month
            .get(&record.month)
            .copied()
            .unwrap_or_default()
            .checked_add(record.amount)
            .ok_or(OverflowError { total: month_name })?;

        *total = new_total;
        by_month.insert(record.month.clone(), month_sum);
        *self
            .transactions_by_month
            .entry(record.month.clone())
            .or_insert(0) += 1;
        Ok(())
    }

    /// Derives the balance and freezes the result.
    pub fn finish(self) -> Result<SummaryData, OverflowError> {
        let total_balance = self
            .credit_total
            .checked_add(self.debit_total)
            .ok_or(OverflowError {
                total: "total_balance",
            })?;

        Ok(SummaryData {
            debit_total: self.debit_total,
            credit_total: self.credit_total,
            total_balance,
            transactions_by_month: self.transactions_by_month,
            avg_credits_by_month: self.credits_by_month,
            avg_debits_by_month: self.debits_by_month,
        })
    }
}

/// Folds a whole record sequence into a summary.
pub fn aggregate<I>(records: I) -> Result<SummaryData, OverflowError>
where
    I: IntoIterator<Item = TransactionRecord>,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.add(&record)?;
    }
    aggregator.finish()
}
