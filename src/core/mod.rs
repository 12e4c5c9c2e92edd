//! Core business logic module
//!
//! This module contains the balance & settlement components:
//! - `split` - Split set resolution shared by every stage
//! - `balance_accumulator` - Per-member paid/share/adjustment balances
//! - `debt_graph` - Direct-mode debt graph, payment application and netting
//! - `settlement_matcher` - Simplified-mode greedy matching
//! - `rounding` - Emission-time rounding and ordering
//! - `traits` - Settlement policy abstraction
//! - `engine` - Façade orchestrating the above
//! - `breakdown` - Per-pair debt explanation
//! - `validation` - Snapshot findings for logging
//! - `async` - Parallel settlement of independent groups

pub mod r#async;
pub mod balance_accumulator;
pub mod breakdown;
pub mod debt_graph;
pub mod engine;
pub mod rounding;
pub mod settlement_matcher;
pub mod split;
pub mod traits;
pub mod validation;

pub use balance_accumulator::{compute_balances, creditors, debtors, sort_by_net_desc, total_spent};
pub use breakdown::{pair_breakdown, PairBreakdown};
pub use debt_graph::{apply_payments, build_debt_graph, net_graph, to_settlements, DebtGraph};
pub use engine::{EngineConfig, GroupReport, SettlementEngine};
pub use r#async::GroupBatchProcessor;
pub use settlement_matcher::match_settlements;
pub use traits::{DirectPolicy, SettlementPolicy, SimplifiedPolicy};
pub use validation::validate_snapshot;
