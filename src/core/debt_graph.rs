//! Debt graph for direct-mode settlement
//!
//! The graph is a directed weighted map `debtor -> creditor -> amount` built
//! from the raw expense history, independent of net balances. Each stage takes
//! the graph by value and hands back the transformed graph, so no graph is ever
//! shared between calls:
//!
//! ```text
//! build_debt_graph -> apply_payments -> net_graph -> to_settlements
//! ```
//!
//! Cells are never negative. A cell that reaches zero is removed. Cell
//! arithmetic is checked; a record that would overflow a cell is skipped as a
//! whole with a warning.

use crate::core::rounding::emit_settlement;
use crate::core::split::{resolve_split_set, share_of, MemberIndex};
use crate::types::{ExpenseRecord, Member, MemberId, PaymentRecord, SettleError, Settlement};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Directed debt graph over one member set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtGraph {
    edges: BTreeMap<MemberId, BTreeMap<MemberId, Decimal>>,
}

impl DebtGraph {
    /// Empty graph with a node per member
    pub fn with_members(members: &[Member]) -> Self {
        let edges = members
            .iter()
            .map(|member| (member.id.clone(), BTreeMap::new()))
            .collect();
        DebtGraph { edges }
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.edges.contains_key(id)
    }

    /// Amount `debtor` owes `creditor` (zero when no edge exists)
    pub fn get(&self, debtor: &MemberId, creditor: &MemberId) -> Decimal {
        self.edges
            .get(debtor)
            .and_then(|creditors| creditors.get(creditor))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Overwrite a cell; zero removes the edge
    fn set(&mut self, debtor: &MemberId, creditor: &MemberId, amount: Decimal) {
        let Some(creditors) = self.edges.get_mut(debtor) else {
            return;
        };
        if amount.is_zero() {
            creditors.remove(creditor);
        } else {
            creditors.insert(creditor.clone(), amount);
        }
    }

    fn checked_add(&self, debtor: &MemberId, creditor: &MemberId, amount: Decimal) -> Option<Decimal> {
        self.get(debtor, creditor).checked_add(amount)
    }

    /// All non-zero edges as `(debtor, creditor, amount)`, in id order
    pub fn edges(&self) -> impl Iterator<Item = (&MemberId, &MemberId, Decimal)> + '_ {
        self.edges.iter().flat_map(|(debtor, creditors)| {
            creditors
                .iter()
                .map(move |(creditor, amount)| (debtor, creditor, *amount))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }
}

/// Build the raw obligation graph from expenses
///
/// Every participant other than the payer owes the payer their share. The
/// payer's own share never becomes a self-debt.
pub fn build_debt_graph(members: &[Member], expenses: &[ExpenseRecord]) -> DebtGraph {
    let index = MemberIndex::new(members);
    let mut graph = DebtGraph::with_members(members);

    for expense in expenses {
        if !index.contains(&expense.payer_id) {
            tracing::warn!(payer = %expense.payer_id, "expense payer is not a member, skipped");
            continue;
        }

        let split = resolve_split_set(&index, expense);
        let Some(share) = share_of(expense.amount, split.len()) else {
            continue;
        };

        let payer = &expense.payer_id;
        let updated: Option<Vec<(&MemberId, Decimal)>> = split
            .into_iter()
            .filter(|participant| *participant != payer)
            .map(|participant| Some((participant, graph.checked_add(participant, payer, share)?)))
            .collect();
        let Some(updated) = updated else {
            let error = SettleError::arithmetic_overflow("debt graph", &format!("payer '{}'", payer));
            tracing::warn!(%error, "expense skipped");
            continue;
        };
        for (participant, amount) in updated {
            graph.set(participant, payer, amount);
        }
    }

    graph
}

/// Pay down `from -> to`, flipping any excess into `to -> from`
fn settle_payment(graph: &mut DebtGraph, payment: &PaymentRecord) -> Result<(), SettleError> {
    let (from, to) = (&payment.from_id, &payment.to_id);
    let overflow = || SettleError::arithmetic_overflow("debt graph", &format!("payment '{}' -> '{}'", from, to));

    let owed = graph.get(from, to);
    if owed >= payment.amount {
        let rest = owed.checked_sub(payment.amount).ok_or_else(overflow)?;
        graph.set(from, to, rest);
    } else {
        let excess = payment.amount.checked_sub(owed).ok_or_else(overflow)?;
        let flipped = graph.checked_add(to, from, excess).ok_or_else(overflow)?;
        graph.set(from, to, Decimal::ZERO);
        graph.set(to, from, flipped);
    }
    Ok(())
}

/// Apply recorded payments to the graph
///
/// A payment first pays down what `from` owes `to`. Any excess flips into
/// `to` owing `from`, so overpayment never produces a negative cell.
pub fn apply_payments(mut graph: DebtGraph, payments: &[PaymentRecord]) -> DebtGraph {
    for payment in payments {
        let (from, to) = (&payment.from_id, &payment.to_id);

        if from == to {
            tracing::warn!(member = %from, "self-payment skipped");
            continue;
        }
        if !graph.contains(from) || !graph.contains(to) {
            tracing::warn!(from = %from, to = %to, "payment references a non-member, skipped");
            continue;
        }

        if let Err(error) = settle_payment(&mut graph, payment) {
            tracing::warn!(%error, "payment skipped");
        }
    }

    graph
}

/// Collapse every mutual pair into a single directional residual
///
/// Pairs are visited once each, in member id order. Afterwards at most one
/// direction of any pair carries debt.
pub fn net_graph(mut graph: DebtGraph, members: &[Member]) -> DebtGraph {
    let mut ids: Vec<&MemberId> = members.iter().map(|member| &member.id).collect();
    ids.sort();
    ids.dedup();

    for (pos, a) in ids.iter().enumerate() {
        for b in &ids[pos + 1..] {
            let a_owes_b = graph.get(a, b);
            let b_owes_a = graph.get(b, a);
            let Some(residual) = a_owes_b.checked_sub(b_owes_a) else {
                tracing::warn!(a = %a, b = %b, "netting overflowed, pair left as is");
                continue;
            };

            if residual > Decimal::ZERO {
                graph.set(a, b, residual);
                graph.set(b, a, Decimal::ZERO);
            } else if residual < Decimal::ZERO {
                graph.set(b, a, -residual);
                graph.set(a, b, Decimal::ZERO);
            } else {
                graph.set(a, b, Decimal::ZERO);
                graph.set(b, a, Decimal::ZERO);
            }
        }
    }

    graph
}

/// Emit one settlement per edge above `threshold`
///
/// The walk follows id order; callers sort the final list.
pub fn to_settlements(graph: &DebtGraph, threshold: Decimal) -> Vec<Settlement> {
    graph
        .edges()
        .filter_map(|(debtor, creditor, amount)| emit_settlement(debtor, creditor, amount, threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rounding::DEFAULT_THRESHOLD;

    fn members(ids: &[&str]) -> Vec<Member> {
        ids.iter().map(|id| Member::new(*id, *id)).collect()
    }

    fn id(value: &str) -> MemberId {
        MemberId::new(value)
    }

    fn d(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn circular_expenses() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("a", d(300)).split_among(["a", "b", "c"]),
            ExpenseRecord::new("b", d(150)).split_among(["a", "b", "c"]),
            ExpenseRecord::new("c", d(90)).split_among(["a", "c"]),
        ]
    }

    #[test]
    fn test_build_skips_payer_share() {
        let group = members(&["a", "b"]);
        let expenses = vec![ExpenseRecord::new("a", d(200)).split_among(["a", "b"])];

        let graph = build_debt_graph(&group, &expenses);

        assert_eq!(graph.get(&id("b"), &id("a")), d(100));
        assert_eq!(graph.get(&id("a"), &id("a")), Decimal::ZERO);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_build_circular_graph() {
        let group = members(&["a", "b", "c"]);
        let graph = build_debt_graph(&group, &circular_expenses());

        assert_eq!(graph.get(&id("b"), &id("a")), d(100));
        assert_eq!(graph.get(&id("c"), &id("a")), d(100));
        assert_eq!(graph.get(&id("a"), &id("b")), d(50));
        assert_eq!(graph.get(&id("c"), &id("b")), d(50));
        assert_eq!(graph.get(&id("a"), &id("c")), d(45));
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_build_explicit_split_excludes_payer() {
        let group = members(&["a", "b", "c"]);
        let expenses = vec![ExpenseRecord::new("a", d(100)).split_among(["b", "c"])];

        let graph = build_debt_graph(&group, &expenses);

        assert_eq!(graph.get(&id("b"), &id("a")), d(50));
        assert_eq!(graph.get(&id("c"), &id("a")), d(50));
        assert_eq!(graph.get(&id("a"), &id("b")), Decimal::ZERO);
        assert_eq!(graph.get(&id("a"), &id("c")), Decimal::ZERO);
    }

    #[test]
    fn test_apply_payment_reduces_debt() {
        let group = members(&["a", "b"]);
        let graph = build_debt_graph(&group, &[ExpenseRecord::new("b", d(200))]);

        let graph = apply_payments(graph, &[PaymentRecord::new("a", "b", d(40))]);

        assert_eq!(graph.get(&id("a"), &id("b")), d(60));
        assert_eq!(graph.get(&id("b"), &id("a")), Decimal::ZERO);
    }

    #[test]
    fn test_apply_payment_overshoot_flips_direction() {
        let group = members(&["a", "b"]);
        let graph = build_debt_graph(&group, &[ExpenseRecord::new("b", d(100)).split_among(["a"])]);
        assert_eq!(graph.get(&id("a"), &id("b")), d(100));

        let graph = apply_payments(graph, &[PaymentRecord::new("a", "b", d(150))]);

        assert_eq!(graph.get(&id("a"), &id("b")), Decimal::ZERO);
        assert_eq!(graph.get(&id("b"), &id("a")), d(50));
    }

    #[test]
    fn test_apply_payment_exact_clears_edge() {
        let group = members(&["a", "b"]);
        let graph = build_debt_graph(&group, &[ExpenseRecord::new("b", d(100)).split_among(["a"])]);

        let graph = apply_payments(graph, &[PaymentRecord::new("a", "b", d(100))]);

        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_apply_payment_skips_self_and_unknown() {
        let group = members(&["a", "b"]);
        let graph = build_debt_graph(&group, &[ExpenseRecord::new("b", d(100)).split_among(["a"])]);

        let graph = apply_payments(
            graph,
            &[
                PaymentRecord::new("a", "a", d(30)),
                PaymentRecord::new("zoe", "b", d(30)),
            ],
        );

        assert_eq!(graph.get(&id("a"), &id("a")), Decimal::ZERO);
        assert_eq!(graph.get(&id("a"), &id("b")), d(100));
        assert!(!graph.contains(&id("zoe")));
    }

    #[test]
    fn test_build_skips_overflowing_expense() {
        let group = members(&["a", "b", "c"]);
        let expenses = vec![
            ExpenseRecord::new("a", Decimal::MAX).split_among(["b"]),
            ExpenseRecord::new("a", d(20)).split_among(["b", "c"]),
            ExpenseRecord::new("a", d(40)).split_among(["c"]),
        ];

        let graph = build_debt_graph(&group, &expenses);

        assert_eq!(graph.get(&id("b"), &id("a")), Decimal::MAX);
        // the second expense would overflow b's cell, so c is not charged either
        assert_eq!(graph.get(&id("c"), &id("a")), d(40));
    }

    #[test]
    fn test_apply_payment_skips_overflowing_flip() {
        let group = members(&["a", "b"]);
        let graph = build_debt_graph(&group, &[ExpenseRecord::new("a", Decimal::MAX).split_among(["b"])]);

        let graph = apply_payments(
            graph,
            &[
                PaymentRecord::new("a", "b", d(1)),
                PaymentRecord::new("b", "a", d(7)),
            ],
        );

        assert_eq!(graph.get(&id("b"), &id("a")), Decimal::MAX - d(7));
        assert_eq!(graph.get(&id("a"), &id("b")), Decimal::ZERO);
    }

    #[test]
    fn test_net_graph_collapses_pairs() {
        let group = members(&["a", "b", "c"]);
        let graph = net_graph(build_debt_graph(&group, &circular_expenses()), &group);

        assert_eq!(graph.get(&id("b"), &id("a")), d(50));
        assert_eq!(graph.get(&id("a"), &id("b")), Decimal::ZERO);
        assert_eq!(graph.get(&id("c"), &id("a")), d(55));
        assert_eq!(graph.get(&id("a"), &id("c")), Decimal::ZERO);
        assert_eq!(graph.get(&id("c"), &id("b")), d(50));
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_net_graph_equal_debts_cancel() {
        let group = members(&["a", "b"]);
        let expenses = vec![
            ExpenseRecord::new("a", d(80)).split_among(["b"]),
            ExpenseRecord::new("b", d(80)).split_among(["a"]),
        ];

        let graph = net_graph(build_debt_graph(&group, &expenses), &group);

        assert_eq!(graph.edge_count(), 0);
        assert!(to_settlements(&graph, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_to_settlements_filters_and_rounds() {
        let group = members(&["a", "b", "c"]);
        let expenses = vec![ExpenseRecord::new("a", d(100))];

        let graph = net_graph(build_debt_graph(&group, &expenses), &group);
        let settlements = to_settlements(&graph, DEFAULT_THRESHOLD);

        assert_eq!(settlements.len(), 2);
        assert!(settlements.iter().all(|s| s.amount == d(33)));
        assert!(settlements.iter().all(|s| s.to_id == id("a")));
    }
}
