//! Asynchronous settlement of many groups
//!
//! The engine is stateless, so concurrency needs no locking: each group's
//! snapshot is moved into its own task and the shared `SettlementEngine` is
//! only ever read.

pub mod batch_processor;

pub use batch_processor::GroupBatchProcessor;
