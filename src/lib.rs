//! # Transaction Summary
//!
//! Summarizes an uploaded CSV of debit/credit transactions and hands the
//! result to a persistence sink and a notification sink.
//!
//! ## Design Principles
//!
//! - **Fail fast**: the first invalid row aborts the file; no partial summary
//! - **Exact arithmetic**: amounts are `rust_decimal` values, so totals do not
//!   depend on row order
//! - **Ordered dispatch**: store first, then notify; a failed store skips notify
//! - **No hidden state**: configuration is loaded once and passed in
//!
//! ## Example
//!
//! ```
//! use transaction_summary::summarize;
//!
//! let csv = "id,type,amount,date\n1,Debit,100.00,2024-01-15\n2,Credit,50.00,2024-01-20\n";
//! let summary = summarize(csv).unwrap();
//! assert_eq!(summary.total_balance().to_string(), "150.00");
//! assert_eq!(summary.transactions_by_month().get("2024-01"), Some(&2));
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod money;
pub mod outbox;
pub mod parser;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod summary;
pub mod transaction;
pub mod trigger;

pub use config::Config;
pub use error::{
    CliError, ConfigError, DispatchTarget, InvocationError, OverflowError, ParseError,
    PipelineError, Result, SinkError, SourceError, Stage,
};
pub use ledger::LedgerSink;
pub use money::{Amount, AmountError};
pub use outbox::OutboxSink;
pub use pipeline::{summarize, BatchReport, Outcome, Pipeline};
pub use sink::Sink;
pub use source::{FsSource, Source};
pub use summary::{aggregate, Aggregator, SummaryData};
pub use transaction::{MonthKey, TransactionRecord, TxType};
pub use trigger::ObjectRef;
