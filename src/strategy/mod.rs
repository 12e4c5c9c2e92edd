//! Processing strategy module for ledger settlement
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! from ledger parsing through per-group settlement to report output. Different
//! implementations (synchronous, asynchronous batch) are selected at runtime
//! and produce identical output for the same input.

use crate::cli::{ReportType, StrategyType};
use crate::core::engine::{EngineConfig, GroupReport};
use crate::io::csv_format::{write_balances_csv, write_settlements_csv};
use crate::types::{SettleError, SettlementMode};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete settlement pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Settle every group in the ledger at `input_path` and write the report
    ///
    /// Fatal errors (missing file, unwritable output) are returned. Malformed
    /// rows and validation findings are logged and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), SettleError>;
}

/// What every strategy computes and prints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    pub engine: EngineConfig,
    pub mode: SettlementMode,
    pub report: ReportType,
}

/// Write group reports in the requested shape
pub(crate) fn write_reports(
    reports: &[GroupReport],
    report: ReportType,
    output: &mut dyn Write,
) -> Result<(), SettleError> {
    match report {
        ReportType::Settlements => write_settlements_csv(reports, output),
        ReportType::Balances => write_balances_csv(reports, output),
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    options: ReportOptions,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(options)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, options))
        }
    }
}
