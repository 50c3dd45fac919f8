//! Error types for the summary pipeline.

use crate::money::AmountError;
use crate::trigger::ObjectRef;
use std::fmt;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Errors raised while turning raw CSV text into transaction records.
///
/// Parsing is fail-fast: the first of these aborts the whole input.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Not even a header row was present
    #[error("input is empty: expected a header row")]
    EmptyInput,

    /// Row has fewer than the four required fields
    #[error("malformed row {row}: expected at least 4 fields, found {fields} in `{content}`")]
    MalformedRow {
        row: u64,
        fields: usize,
        content: String,
    },

    /// Type field is neither `debit` nor `credit`
    #[error("invalid transaction type `{value}` at row {row}")]
    InvalidTransactionType { row: u64, value: String },

    /// Amount field is not a decimal number
    #[error("invalid amount `{value}` at row {row}: {source}")]
    InvalidAmount {
        row: u64,
        value: String,
        #[source]
        source: AmountError,
    },

    /// Date field is shorter than a `YYYY-MM` month key
    #[error("invalid date `{value}` at row {row}: expected at least YYYY-MM")]
    InvalidDate { row: u64, value: String },

    /// Low-level CSV reader failure
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}

impl ParseError {
    /// Line of the offending row, when the error is tied to one.
    pub fn row(&self) -> Option<u64> {
        match self {
            ParseError::MalformedRow { row, .. }
            | ParseError::InvalidTransactionType { row, .. }
            | ParseError::InvalidAmount { row, .. }
            | ParseError::InvalidDate { row, .. } => Some(*row),
            ParseError::EmptyInput => None,
            ParseError::Csv(e) => e.position().map(|p| p.line()),
        }
    }
}

/// A running sum left the representable amount range.
///
/// `total` names the summary field whose sum overflowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("amount overflow while summing {total}")]
pub struct OverflowError {
    pub total: &'static str,
}

/// Failure to fetch an input object.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Container or key would resolve outside the source root
    #[error("refusing to read {object}: path escapes the source root")]
    InvalidPath { object: ObjectRef },

    #[error("failed to read {object}: {source}")]
    Read {
        object: ObjectRef,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by a downstream sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// The sink refused the summary
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Downstream consumer a summary is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchTarget {
    Store,
    Notify,
}

impl fmt::Display for DispatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchTarget::Store => f.write_str("store"),
            DispatchTarget::Notify => f.write_str("notify"),
        }
    }
}

/// Invocation-level error taxonomy.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input object could not be fetched
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// The input object did not parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The totals did not fit in the amount range
    #[error("aggregation failed: {0}")]
    Overflow(#[from] OverflowError),

    /// A sink failed; later sinks were not attempted
    #[error("dispatch to {target} sink failed: {source}")]
    Dispatch {
        target: DispatchTarget,
        #[source]
        source: SinkError,
    },
}

/// Stage an invocation was in when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Parsing,
    Aggregating,
    Dispatching(DispatchTarget),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetching => f.write_str("fetching"),
            Stage::Parsing => f.write_str("parsing"),
            Stage::Aggregating => f.write_str("aggregating"),
            Stage::Dispatching(target) => write!(f, "dispatching to {}", target),
        }
    }
}

/// A failed invocation, with the object and stage it failed at.
#[derive(Error, Debug)]
#[error("invocation for {object} failed while {stage}: {source}")]
pub struct InvocationError {
    pub object: ObjectRef,
    pub stage: Stage,
    #[source]
    pub source: PipelineError,
}

/// Configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {var} is set but empty")]
    Empty { var: &'static str },
}

/// Errors surfaced by the command-line entry point.
#[derive(Error, Debug)]
pub enum CliError {
    /// Missing event file argument
    #[error("Missing event file argument. Usage: transaction-summary <event.json | init>")]
    MissingArgument,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid event batch: {0}")]
    Event(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize sinks: {0}")]
    Init(#[from] SinkError),

    #[error("{failed} of {total} invocations failed")]
    InvocationsFailed { failed: usize, total: usize },
}
