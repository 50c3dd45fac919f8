//! Persistence sink: an append-only CSV ledger of summary records.
//!
//! One row per delivered summary with columns
//! `debit_total,credit_total,created_at`. Amounts are written with two
//! decimals and the date as `DD-MM-YYYY`.

use crate::error::SinkError;
use crate::sink::Sink;
use crate::summary::SummaryData;
use chrono::{Local, NaiveDate};
use csv::WriterBuilder;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Column names of the ledger file.
pub const LEDGER_HEADER: [&str; 3] = ["debit_total", "credit_total", "created_at"];

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Ledger file sink. The file must exist (see [`LedgerSink::init`]) before
/// summaries can be delivered to it.
#[derive(Debug, Clone)]
pub struct LedgerSink {
    path: PathBuf,
}

impl LedgerSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LedgerSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the ledger with its header row if it does not exist yet.
    ///
    /// Returns `true` if a new ledger was created. Calling it again is a no-op.
    pub fn init(&self) -> Result<bool, SinkError> {
        if self.path.exists() {
            debug!("Ledger {} already exists", self.path.display());
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = WriterBuilder::new().from_path(&self.path)?;
        writer.write_record(LEDGER_HEADER)?;
        writer.flush()?;

        info!("Created ledger {}", self.path.display());
        Ok(true)
    }

    /// Appends one row for `summary` dated `created_at`.
    pub fn append(&self, summary: &SummaryData, created_at: NaiveDate) -> Result<(), SinkError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer.write_record([
            summary.debit_total().to_string(),
            summary.credit_total().to_string(),
            created_at.format(DATE_FORMAT).to_string(),
        ])?;
        writer.flush()?;

        info!(
            "Stored summary in {}: debit {}, credit {}",
            self.path.display(),
            summary.debit_total(),
            summary.credit_total()
        );
        Ok(())
    }
}

impl Sink for LedgerSink {
    fn deliver(&self, summary: &SummaryData) -> Result<(), SinkError> {
        self.append(summary, Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::summary::aggregate;
    use tempfile::TempDir;

    fn sample_summary() -> SummaryData {
        let csv = "id,type,amount,date\n1,Debit,100.00,2024-01-15\n2,Credit,50.5,2024-01-20";
        aggregate(parser::parse(csv).unwrap()).unwrap()
    }

    #[test]
    fn test_init_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerSink::new(dir.path().join("db/summary_records.csv"));

        assert!(ledger.init().unwrap());
        assert!(!ledger.init().unwrap());

        let contents = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(contents, "debit_total,credit_total,created_at\n");
    }

    #[test]
    fn test_append_row() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerSink::new(dir.path().join("summary_records.csv"));
        ledger.init().unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        ledger.append(&sample_summary(), date).unwrap();
        ledger.append(&SummaryData::empty(), date).unwrap();

        let contents = fs::read_to_string(ledger.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "debit_total,credit_total,created_at",
                "100.00,50.50,07-03-2024",
                "0.00,0.00,07-03-2024",
            ]
        );
    }

    #[test]
    fn test_deliver_requires_init() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerSink::new(dir.path().join("missing.csv"));

        let err = ledger.deliver(&sample_summary()).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
