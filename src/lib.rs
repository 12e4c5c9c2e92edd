//! Rust Settlement Engine Library
//! # Overview
//!
//! Balance & settlement engine for shared-expense groups: given a group's
//! members, expenses and direct payments, it computes what each member has
//! paid, owes and is owed, and a list of recommended transfers that would
//! bring everyone to zero.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Member, ExpenseRecord, Balance, Settlement, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Façade orchestrating every stage
//!   - [`core::balance_accumulator`] - Per-member paid/share/adjustment balances
//!   - [`core::debt_graph`] - Pairwise debts for direct mode
//!   - [`core::settlement_matcher`] - Greedy matching for simplified mode
//! - [`io`] - Ledger CSV parsing and report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Settlement Modes
//!
//! - **Direct**: every settlement corresponds to a real pairwise debt; debts
//!   are reduced by payments and netted per pair but never routed through a
//!   third member
//! - **Simplified**: debts are pooled into net balances and matched greedily,
//!   so a member may pay someone they never shared an expense with
//!
//! # Money
//!
//! Amounts are `rust_decimal::Decimal`. Shares keep full precision until a
//! settlement is emitted, at which point the amount is rounded half away from
//! zero to whole units. Anything at or below the 0.01 noise threshold is
//! treated as settled.
//!
//! ```
//! use rust_decimal::Decimal;
//! use rust_settlement_engine::{ExpenseRecord, Member, SettlementEngine, SettlementMode};
//!
//! let engine = SettlementEngine::new();
//! let members = vec![Member::new("a", "Ana"), Member::new("b", "Bruno")];
//! let expenses = vec![ExpenseRecord::new("a", Decimal::new(200, 0))];
//!
//! let settlements = engine.compute_settlements(&members, &expenses, &[], SettlementMode::Direct);
//! assert_eq!(settlements.len(), 1);
//! assert_eq!(settlements[0].amount, Decimal::new(100, 0));
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    apply_payments, build_debt_graph, compute_balances, match_settlements, net_graph,
    pair_breakdown, to_settlements, DebtGraph, EngineConfig, GroupReport, PairBreakdown,
    SettlementEngine,
};
pub use io::{write_balances_csv, write_settlements_csv};
pub use types::{
    Balance, ExpenseRecord, GroupId, GroupSnapshot, LedgerEntry, LedgerRecord, Member, MemberId,
    PaymentRecord, SettleError, Settlement, SettlementMode,
};
