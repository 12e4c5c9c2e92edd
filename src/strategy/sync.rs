//! Synchronous processing strategy
//!
//! Single-threaded pipeline: the `SyncReader` streams ledger rows, rows are
//! folded into per-group snapshots, and each group is settled in group id
//! order by one `SettlementEngine`.

use crate::core::engine::{GroupReport, SettlementEngine};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_reports, ProcessingStrategy, ReportOptions};
use crate::types::{GroupId, GroupSnapshot, SettleError};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// ```no_run
/// use rust_settlement_engine::strategy::{ProcessingStrategy, ReportOptions, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(ReportOptions::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("ledger.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    options: ReportOptions,
}

impl SyncProcessingStrategy {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), SettleError> {
        let engine = SettlementEngine::with_config(self.options.engine.clone());
        let reader = SyncReader::new(input_path)?;

        let mut groups: BTreeMap<GroupId, GroupSnapshot> = BTreeMap::new();
        for result in reader {
            match result {
                Ok(record) => groups
                    .entry(record.group.clone())
                    .or_insert_with(|| GroupSnapshot::new(record.group))
                    .push(record.entry),
                Err(e) => tracing::warn!(error = %e, "skipping ledger row"),
            }
        }

        tracing::info!(groups = groups.len(), mode = %self.options.mode, "ledger loaded");

        let reports: Vec<GroupReport> = groups
            .values()
            .map(|snapshot| engine.compute_report(snapshot, self.options.mode))
            .collect();

        write_reports(&reports, self.options.report, output)
    }
}
