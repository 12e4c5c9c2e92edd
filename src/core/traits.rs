//! Core traits for settlement policies
//!
//! Direct and simplified settlement are two implementations of the same seam,
//! selected at runtime from a [`SettlementMode`].

use crate::core::balance_accumulator::compute_balances;
use crate::core::debt_graph::{apply_payments, build_debt_graph, net_graph, to_settlements};
use crate::core::settlement_matcher::match_settlements;
use crate::types::{ExpenseRecord, Member, PaymentRecord, Settlement, SettlementMode};
use rust_decimal::Decimal;

/// Trait for turning an expense/payment history into transfers
///
/// Implementations must be pure: identical inputs give identical output.
/// The returned list is unsorted; the engine orders it.
pub trait SettlementPolicy: Send + Sync {
    fn settle(
        &self,
        members: &[Member],
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
        threshold: Decimal,
    ) -> Vec<Settlement>;
}

/// Pairwise settlement: debts stay tied to who paid for whom, netted per pair
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPolicy;

impl SettlementPolicy for DirectPolicy {
    fn settle(
        &self,
        members: &[Member],
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
        threshold: Decimal,
    ) -> Vec<Settlement> {
        let graph = build_debt_graph(members, expenses);
        let graph = apply_payments(graph, payments);
        let graph = net_graph(graph, members);
        tracing::trace!(edges = graph.edge_count(), "debt graph netted");
        to_settlements(&graph, threshold)
    }
}

/// Net-balance settlement: greedy largest-first matching
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifiedPolicy;

impl SettlementPolicy for SimplifiedPolicy {
    fn settle(
        &self,
        members: &[Member],
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
        threshold: Decimal,
    ) -> Vec<Settlement> {
        let balances = compute_balances(members, expenses, payments);
        match_settlements(&balances, threshold)
    }
}

/// Policy implementing a mode
pub fn policy_for(mode: SettlementMode) -> &'static dyn SettlementPolicy {
    match mode {
        SettlementMode::Direct => &DirectPolicy,
        SettlementMode::Simplified => &SimplifiedPolicy,
    }
}
