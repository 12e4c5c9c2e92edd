//! Asynchronous batch processing strategy
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_groups)
//!     ├── AsyncReader (batch CSV reading)
//!     └── GroupBatchProcessor (one tokio task per group)
//!         └── Arc<SettlementEngine> (stateless, shared read-only)
//! ```
//!
//! Rows are read in batches and folded into per-group snapshots as they
//! arrive. A group's rows may span several batches, so settlement starts only
//! once the whole ledger is read; groups are then settled in parallel on a
//! multi-threaded runtime with `max_concurrent_groups` workers.

use crate::core::engine::SettlementEngine;
use crate::core::r#async::GroupBatchProcessor;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_reports, ProcessingStrategy, ReportOptions};
use crate::types::{GroupId, GroupSnapshot, SettleError};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of ledger rows per read batch
    pub batch_size: usize,
    /// Number of worker threads settling groups
    pub max_concurrent_groups: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_groups: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent_groups: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_groups = if max_concurrent_groups == 0 {
            tracing::warn!(
                max_concurrent_groups,
                default = default.max_concurrent_groups,
                "invalid max_concurrent_groups, using default"
            );
            default.max_concurrent_groups
        } else {
            max_concurrent_groups
        };

        Self {
            batch_size,
            max_concurrent_groups,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    options: ReportOptions,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, options: ReportOptions) -> Self {
        Self { config, options }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), SettleError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_groups)
            .build()
            .map_err(|e| SettleError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let reports = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => SettleError::FileNotFound {
                        path: input_path.display().to_string(),
                    },
                    _ => SettleError::from(e),
                })?;

            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut groups: BTreeMap<GroupId, GroupSnapshot> = BTreeMap::new();
            let mut batches = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                batches += 1;
                GroupBatchProcessor::partition_by_group(&mut groups, batch);
            }

            tracing::info!(
                groups = groups.len(),
                batches,
                mode = %self.options.mode,
                "ledger loaded"
            );

            let engine = Arc::new(SettlementEngine::with_config(self.options.engine.clone()));
            let processor = GroupBatchProcessor::new(engine, self.options.mode);
            Ok::<_, SettleError>(processor.process_groups(groups.into_values().collect()).await)
        })?;

        write_reports(&reports, self.options.report, output)
    }
}
