//! Asynchronous ledger reader with batch interface
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerRecord, SettleError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous ledger reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read the next ledger row
    ///
    /// Row errors carry the physical line the row starts on, so quoted
    /// multi-line fields are counted the same way as in `SyncReader`.
    pub async fn next_row(&mut self) -> Option<Result<LedgerRecord, SettleError>> {
        let mut rows = self.csv_reader.deserialize_with_pos::<CsvRecord>();
        let (result, position) = rows.next().await?;
        let line = position.line();

        let converted = result
            .map_err(|e| SettleError::ParseError {
                line: Some(line),
                message: e.to_string(),
            })
            .and_then(|csv_record| convert_csv_record(csv_record).map_err(|e| e.at_line(line)));
        Some(converted)
    }

    /// Read up to `batch_size` ledger records
    ///
    /// Malformed rows are logged and skipped. An empty batch means the end of
    /// the input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerRecord> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.next_row().await {
                Some(Ok(record)) => batch.push(record),
                Some(Err(e)) => tracing::warn!(error = %e, "skipping ledger row"),
                None => break,
            }
        }

        batch
    }
}
