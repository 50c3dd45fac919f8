//! Integration tests for the transaction-summary CLI.
//!
//! Each test builds a throwaway object store, ledger and outbox under a temp
//! directory and points the binary at them through its environment.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE: &str = "id,type,amount,date
1,Debit,100.00,2024-01-15
2,Credit,50.00,2024-01-20
3,Debit,25.00,2024-02-01
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Workspace {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn ledger(&self) -> PathBuf {
        self.path("db/summary_records.csv")
    }

    fn outbox(&self) -> PathBuf {
        self.path("outbox")
    }

    /// Uploads `text` as `uploads/<key>`.
    fn upload(&self, key: &str, text: &str) {
        let path = self.path("store/uploads").join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    /// Writes a notification batch for the given keys and returns its path.
    fn event(&self, keys: &[&str]) -> PathBuf {
        let records: Vec<String> = keys
            .iter()
            .map(|k| {
                format!(
                    r#"{{"s3":{{"bucket":{{"name":"uploads"}},"object":{{"key":"{}"}}}}}}"#,
                    k
                )
            })
            .collect();
        let path = self.path("event.json");
        fs::write(&path, format!(r#"{{"Records":[{}]}}"#, records.join(","))).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("transaction-summary").unwrap();
        cmd.env("SUMMARY_SOURCE_ROOT", self.path("store"))
            .env("SUMMARY_STORE_TARGET", self.ledger())
            .env("SUMMARY_NOTIFY_TARGET", self.outbox())
            .env("RUST_LOG", "error")
            .env_remove("SUMMARY_INPUT_PREFIX");
        cmd
    }

    fn ledger_rows(&self) -> Vec<String> {
        fs::read_to_string(self.ledger())
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    fn outbox_messages(&self) -> usize {
        count_files(&self.outbox())
    }
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_processes_single_upload() {
    let ws = Workspace::new();
    ws.upload("input/sample.csv", SAMPLE);
    let event = ws.event(&["input/sample.csv"]);

    let assert = ws.command().arg(&event).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let summary: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(summary["debit_total"], 125.0);
    assert_eq!(summary["credit_total"], 50.0);
    assert_eq!(summary["total_balance"], 175.0);
    assert_eq!(summary["transactions_by_month"]["2024-01"], 2);
    assert_eq!(summary["transactions_by_month"]["2024-02"], 1);

    let rows = ws.ledger_rows();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("125.00,50.00,"));
    assert_eq!(ws.outbox_messages(), 1);
}

#[test]
fn test_init_creates_ledger_and_outbox() {
    let ws = Workspace::new();

    ws.command().arg("init").assert().success().stdout("");

    let ledger = fs::read_to_string(ws.ledger()).unwrap();
    assert_eq!(ledger, "debit_total,credit_total,created_at\n");
    assert!(ws.outbox().is_dir());
}

#[test]
fn test_keys_outside_prefix_are_skipped() {
    let ws = Workspace::new();
    ws.upload("input/sample.csv", SAMPLE);
    ws.upload("output/email.html", "<html></html>");
    let event = ws.event(&["output/email.html", "input/sample.csv"]);

    ws.command().arg(&event).assert().success();

    assert_eq!(ws.ledger_rows().len(), 1);
    assert_eq!(ws.outbox_messages(), 1);
}

#[test]
fn test_bad_file_does_not_block_batch() {
    let ws = Workspace::new();
    ws.upload("input/bad.csv", "id,type,amount,date\n1,Cash,1.00,2024-01-01\n");
    ws.upload("input/good.csv", SAMPLE);
    let event = ws.event(&["input/bad.csv", "input/good.csv"]);

    ws.command()
        .arg(&event)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"debit_total\":125.0"))
        .stderr(predicate::str::contains("1 of 2 invocations failed"));

    assert_eq!(ws.ledger_rows().len(), 1);
    assert_eq!(ws.outbox_messages(), 1);
}

#[test]
fn test_store_failure_skips_notification() {
    let ws = Workspace::new();
    ws.upload("input/sample.csv", SAMPLE);
    let event = ws.event(&["input/sample.csv"]);
    // a directory where the ledger file should be makes every append fail
    fs::create_dir_all(ws.ledger()).unwrap();

    ws.command()
        .arg(&event)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dispatching to store"));

    assert_eq!(ws.outbox_messages(), 0);
}

#[test]
fn test_missing_upload_fails() {
    let ws = Workspace::new();
    let event = ws.event(&["input/nowhere.csv"]);

    ws.command()
        .arg(&event)
        .assert()
        .failure()
        .stderr(predicate::str::contains("source unavailable"));

    assert!(ws.ledger_rows().is_empty());
}

#[test]
fn test_malformed_event_error() {
    let ws = Workspace::new();
    let event = ws.path("event.json");
    fs::write(&event, "not json").unwrap();

    ws.command()
        .arg(&event)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid event batch"));
}

#[test]
fn test_missing_event_file_error() {
    let ws = Workspace::new();
    ws.command()
        .arg(ws.path("nonexistent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let ws = Workspace::new();
    ws.command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing event file"));
}
