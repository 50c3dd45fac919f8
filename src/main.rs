//! Transaction Summary CLI
//!
//! Processes one batch of object-created notifications. Each in-scope object
//! is summarized, stored in the ledger and queued for notification.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- event.json > summaries.jsonl
//! cargo run -- init
//! ```
//!
//! # Environment Variables
//!
//! - `SUMMARY_SOURCE_ROOT`: directory holding one subdirectory per container (default `.`)
//! - `SUMMARY_STORE_TARGET`: ledger CSV path (default `summary_records.csv`)
//! - `SUMMARY_NOTIFY_TARGET`: outbox directory (default `outbox`)
//! - `SUMMARY_INPUT_PREFIX`: key prefix that triggers processing (default `input/`)
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use log::{error, info};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;
use transaction_summary::{
    trigger, CliError, Config, FsSource, LedgerSink, OutboxSink, Pipeline,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let arg = env::args().nth(1).ok_or(CliError::MissingArgument)?;
    let config = Config::from_env()?;

    let store = LedgerSink::new(&config.store_target);
    let notify = OutboxSink::new(&config.notify_target);
    store.init()?;
    notify.init()?;

    if arg == "init" {
        return Ok(());
    }

    let event = fs::read_to_string(&arg)?;
    let (objects, skipped) = trigger::scope(trigger::decode_batch(&event)?, &config.input_prefix);
    for object in &skipped {
        info!(
            "Skipping {}: key outside prefix `{}`",
            object, config.input_prefix
        );
    }

    let source = FsSource::new(&config.source_root);
    let pipeline = Pipeline::new(&source, &store, &notify);
    let report = pipeline.run_batch(&objects);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(summary) => {
                info!(
                    "Processed {}: {} transactions",
                    outcome.object,
                    summary.transaction_count()
                );
                let line = serde_json::to_string(summary).map_err(io::Error::from)?;
                writeln!(out, "{}", line)?;
            }
            Err(e) => error!("{}", e),
        }
    }
    out.flush()?;

    if !report.is_success() {
        return Err(CliError::InvocationsFailed {
            failed: report.failed(),
            total: report.total(),
        });
    }

    Ok(())
}
