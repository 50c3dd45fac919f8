//! Notification sink: drops each summary as a JSON message into an outbox
//! directory, where the mailer picks it up.

use crate::error::SinkError;
use crate::sink::Sink;
use crate::summary::SummaryData;
use chrono::Utc;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Outbox directory sink.
///
/// Messages are named `summary-<UTC timestamp>-<seq>.json`. The sequence
/// number keeps names unique within one process. An existing file is never
/// overwritten; a name collision fails the delivery.
#[derive(Debug)]
pub struct OutboxSink {
    dir: PathBuf,
    seq: AtomicU64,
}

impl OutboxSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutboxSink {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the outbox directory if needed.
    pub fn init(&self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn next_path(&self) -> PathBuf {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        self.dir.join(format!("summary-{}-{:04}.json", stamp, seq))
    }
}

impl Sink for OutboxSink {
    fn deliver(&self, summary: &SummaryData) -> Result<(), SinkError> {
        let payload = serde_json::to_vec_pretty(summary)?;
        let path = self.next_path();
        write_new(&path, &payload)?;

        info!("Queued summary notification {}", path.display());
        Ok(())
    }
}

/// Writes `payload` to a file that must not exist yet.
fn write_new(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(payload)
}
