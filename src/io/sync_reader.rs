//! Synchronous ledger reader with iterator interface
//!
//! Provides a streaming iterator over ledger records from a CSV file.
//! Format concerns live in the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Malformed rows are yielded as `Err` items carrying their line number, so
//!   callers can log and skip them
//!
//! ```no_run
//! use rust_settlement_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("ledger.csv")).unwrap();
//! let records: Vec<_> = reader.filter_map(Result::ok).collect();
//! println!("Parsed {} ledger rows", records.len());
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerRecord, SettleError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Synchronous ledger reader
///
/// Rows are read one at a time into a reused buffer.
#[derive(Debug)]
pub struct SyncReader<R = File> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader<File> {
    /// Open a ledger file
    pub fn new(path: &Path) -> Result<Self, SettleError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SettleError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => SettleError::from(e),
        })?;

        Self::from_reader(file)
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap any reader
    ///
    /// The CSV reader trims whitespace from all fields and allows short
    /// rows, since trailing columns are optional for most row types.
    pub fn from_reader(input: R) -> Result<Self, SettleError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(input);

        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<LedgerRecord, SettleError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map_or(0, |pos| pos.line());
                let converted = self
                    .record
                    .deserialize::<CsvRecord>(Some(&self.headers))
                    .map_err(SettleError::from)
                    .and_then(convert_csv_record)
                    .map_err(|e| e.at_line(line));
                Some(converted)
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
