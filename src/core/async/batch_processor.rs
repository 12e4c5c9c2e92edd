//! Parallel per-group settlement
//!
//! This module provides the `GroupBatchProcessor`, which computes reports for
//! many independent groups concurrently.
//!
//! # Design
//!
//! Each group is a self-contained snapshot, so groups share no state: every
//! group is moved into its own tokio task and computed there. Reports are
//! collected and ordered by group id so output does not depend on scheduling.
//!
//! # Architecture
//!
//! ```text
//! GroupBatchProcessor
//!     ├── Arc<SettlementEngine>  (stateless, shared read-only)
//!     └── SettlementMode         (policy applied to every group)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::engine::{GroupReport, SettlementEngine};
use crate::types::{GroupId, GroupSnapshot, LedgerRecord, SettlementMode};

/// Computes group reports concurrently
#[derive(Debug, Clone)]
pub struct GroupBatchProcessor {
    engine: Arc<SettlementEngine>,
    mode: SettlementMode,
}

impl GroupBatchProcessor {
    pub fn new(engine: Arc<SettlementEngine>, mode: SettlementMode) -> Self {
        Self { engine, mode }
    }

    /// Fold a batch of ledger records into per-group snapshots
    ///
    /// Records keep their original order within each group, and a group that
    /// spans several batches keeps accumulating into the same snapshot.
    pub fn partition_by_group(
        groups: &mut BTreeMap<GroupId, GroupSnapshot>,
        batch: Vec<LedgerRecord>,
    ) {
        for record in batch {
            groups
                .entry(record.group.clone())
                .or_insert_with(|| GroupSnapshot::new(record.group))
                .push(record.entry);
        }
    }

    /// Compute one report per snapshot, one tokio task per group
    ///
    /// Reports come back sorted by group id. A panic inside a group task is
    /// resumed on the caller, so no group is ever dropped from the output.
    pub async fn process_groups(&self, snapshots: Vec<GroupSnapshot>) -> Vec<GroupReport> {
        let mut tasks = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let engine = Arc::clone(&self.engine);
            let mode = self.mode;
            let group_id = snapshot.group_id.clone();
            let task = tokio::spawn(async move { engine.compute_report(&snapshot, mode) });
            tasks.push((group_id, task));
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for (group_id, task) in tasks {
            match task.await {
                Ok(report) => reports.push(report),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => tracing::error!(group = %group_id, error = ?e, "group task cancelled"),
            }
        }

        reports.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        reports
    }
}
