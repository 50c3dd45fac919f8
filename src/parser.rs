//! Streaming CSV parser for transaction files.
//!
//! The first row is a header and is discarded unread. Every following row is
//! validated into a [`TransactionRecord`]; the first invalid row ends the
//! stream with an error.

use crate::error::ParseError;
use crate::transaction::TransactionRecord;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

/// Lazy iterator over the data rows of a transaction file.
///
/// Yields at most one `Err`; after that it is exhausted.
pub struct Records<'a> {
    rows: StringRecordsIntoIter<&'a [u8]>,
    failed: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<TransactionRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let item = match self.rows.next()? {
            Ok(row) => {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                TransactionRecord::from_row(&row, line)
            }
            Err(e) => Err(ParseError::from(e)),
        };

        self.failed = item.is_err();
        Some(item)
    }
}

/// Opens `text` for record-by-record parsing.
///
/// Consumes the header row up front. Input with no rows at all is rejected
/// with [`ParseError::EmptyInput`]; a header with no data rows is fine and
/// yields an empty stream.
pub fn records(text: &str) -> Result<Records<'_>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut header = StringRecord::new();
    if !reader.read_record(&mut header)? {
        return Err(ParseError::EmptyInput);
    }

    Ok(Records {
        rows: reader.into_records(),
        failed: false,
    })
}

/// Parses every data row, failing on the first invalid one.
pub fn parse(text: &str) -> Result<Vec<TransactionRecord>, ParseError> {
    records(text)?.collect()
}
