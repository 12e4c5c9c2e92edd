//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `member`: Member identity types
//! - `record`: Expense, payment and ledger input records
//! - `settlement`: Derived balances, settlements and the settlement mode
//! - `error`: Error types for the settlement engine

pub mod error;
pub mod member;
pub mod record;
pub mod settlement;

pub use error::SettleError;
pub use member::{Member, MemberId};
pub use record::{ExpenseRecord, GroupId, GroupSnapshot, LedgerEntry, LedgerRecord, PaymentRecord};
pub use settlement::{Balance, Settlement, SettlementMode};
