//! Settlement engine façade
//!
//! This module provides the `SettlementEngine`, the only surface a caller
//! needs. It orchestrates the balance accumulator, the debt graph and the
//! settlement matcher:
//!
//! ```text
//! records ─> BalanceAccumulator ─> balances ─> SettlementMatcher ─> simplified
//! records ─> DebtGraph ─> apply_payments ─> net_graph ─────────────> direct
//! ```
//!
//! The engine holds only configuration. Every call works on its own input
//! snapshot and returns freshly allocated output, so one engine can be shared
//! freely between threads.

use crate::core::balance_accumulator;
use crate::core::breakdown::{pair_breakdown, PairBreakdown};
use crate::core::rounding::{sort_settlements, DEFAULT_THRESHOLD};
use crate::core::traits::policy_for;
use crate::core::validation::validate_snapshot;
use crate::types::{
    Balance, ExpenseRecord, GroupId, GroupSnapshot, Member, MemberId, PaymentRecord, Settlement,
    SettlementMode,
};
use rust_decimal::Decimal;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Magnitudes at or below this are treated as rounding noise
    threshold: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Create a config, falling back to the default for a negative threshold
    pub fn new(threshold: Decimal) -> Self {
        if threshold.is_sign_negative() {
            tracing::warn!(
                %threshold,
                default = %DEFAULT_THRESHOLD,
                "invalid threshold, using default"
            );
            return Self::default();
        }
        Self { threshold }
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }
}

/// Balances and settlements for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub group_id: GroupId,
    pub mode: SettlementMode,
    pub balances: Vec<Balance>,
    pub settlements: Vec<Settlement>,
}

/// Balance & settlement engine
///
/// Deterministic and pure: identical inputs produce identical output lists.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    /// Create an engine with the default 0.01 noise threshold
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        SettlementEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute per-member balances
    ///
    /// One entry per distinct member, in input order.
    pub fn compute_balances(
        &self,
        members: &[Member],
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
    ) -> Vec<Balance> {
        balance_accumulator::compute_balances(members, expenses, payments)
    }

    /// Compute the recommended transfers under `mode`
    ///
    /// Sorted by amount descending, ties by `(from, to)`. Empty members or no
    /// outstanding debt yields an empty list.
    pub fn compute_settlements(
        &self,
        members: &[Member],
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
        mode: SettlementMode,
    ) -> Vec<Settlement> {
        if members.is_empty() {
            if !expenses.is_empty() {
                tracing::warn!(
                    expenses = expenses.len(),
                    "expenses supplied without members, nothing to settle"
                );
            }
            return Vec::new();
        }

        let mut settlements =
            policy_for(mode).settle(members, expenses, payments, self.config.threshold);
        sort_settlements(&mut settlements);

        tracing::debug!(
            members = members.len(),
            expenses = expenses.len(),
            payments = payments.len(),
            %mode,
            settlements = settlements.len(),
            "settlements computed"
        );

        settlements
    }

    /// Explain the debt between one pair of members
    pub fn breakdown(
        &self,
        members: &[Member],
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
        debtor: &MemberId,
        creditor: &MemberId,
    ) -> PairBreakdown {
        pair_breakdown(members, expenses, payments, debtor, creditor)
    }

    /// Validate a group snapshot and compute its full report
    ///
    /// Validation findings are logged as warnings; they never stop the
    /// computation. Balances are ordered creditors first.
    pub fn compute_report(&self, snapshot: &GroupSnapshot, mode: SettlementMode) -> GroupReport {
        for finding in validate_snapshot(snapshot) {
            tracing::warn!(group = %snapshot.group_id, "{}", finding);
        }

        let mut balances =
            self.compute_balances(&snapshot.members, &snapshot.expenses, &snapshot.payments);
        balance_accumulator::sort_by_net_desc(&mut balances);

        let settlements = self.compute_settlements(
            &snapshot.members,
            &snapshot.expenses,
            &snapshot.payments,
            mode,
        );

        GroupReport {
            group_id: snapshot.group_id.clone(),
            mode,
            balances,
            settlements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn members(ids: &[&str]) -> Vec<Member> {
        ids.iter().map(|id| Member::new(*id, *id)).collect()
    }

    fn settlement(from: &str, to: &str, amount: i64) -> Settlement {
        Settlement {
            from_id: MemberId::new(from),
            to_id: MemberId::new(to),
            amount: d(amount),
        }
    }

    fn circular_expenses() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("a", d(300)).split_among(["a", "b", "c"]),
            ExpenseRecord::new("b", d(150)).split_among(["a", "b", "c"]),
            ExpenseRecord::new("c", d(90)).split_among(["a", "c"]),
        ]
    }

    #[rstest]
    #[case::direct(SettlementMode::Direct)]
    #[case::simplified(SettlementMode::Simplified)]
    fn test_single_shared_expense(#[case] mode: SettlementMode) {
        let engine = SettlementEngine::new();
        let group = members(&["a", "b"]);
        let expenses = vec![ExpenseRecord::new("a", d(200)).split_among(["a", "b"])];

        let balances = engine.compute_balances(&group, &expenses, &[]);
        assert_eq!(balances[0].net, d(100));
        assert_eq!(balances[1].net, d(-100));

        let settlements = engine.compute_settlements(&group, &expenses, &[], mode);
        assert_eq!(settlements, vec![settlement("b", "a", 100)]);
    }

    #[test]
    fn test_circular_debt_direct() {
        let engine = SettlementEngine::new();
        let group = members(&["a", "b", "c"]);

        let settlements =
            engine.compute_settlements(&group, &circular_expenses(), &[], SettlementMode::Direct);

        assert_eq!(
            settlements,
            vec![
                settlement("c", "a", 55),
                settlement("b", "a", 50),
                settlement("c", "b", 50),
            ]
        );
    }

    #[test]
    fn test_circular_debt_simplified() {
        let engine = SettlementEngine::new();
        let group = members(&["a", "b", "c"]);

        let settlements = engine.compute_settlements(
            &group,
            &circular_expenses(),
            &[],
            SettlementMode::Simplified,
        );

        assert_eq!(settlements, vec![settlement("c", "a", 105)]);
    }

    #[test]
    fn test_overshoot_payment_direct() {
        let engine = SettlementEngine::new();
        let group = members(&["a", "b"]);
        let expenses = vec![ExpenseRecord::new("b", d(100)).split_among(["a"])];
        let payments = vec![PaymentRecord::new("a", "b", d(150))];

        let settlements =
            engine.compute_settlements(&group, &expenses, &payments, SettlementMode::Direct);

        assert_eq!(settlements, vec![settlement("b", "a", 50)]);
    }

    #[rstest]
    #[case::direct(SettlementMode::Direct)]
    #[case::simplified(SettlementMode::Simplified)]
    fn test_empty_members_yield_nothing(#[case] mode: SettlementMode) {
        let engine = SettlementEngine::new();
        let expenses = vec![ExpenseRecord::new("a", d(100))];

        assert!(engine.compute_balances(&[], &expenses, &[]).is_empty());
        assert!(engine.compute_settlements(&[], &expenses, &[], mode).is_empty());
    }

    #[test]
    fn test_compute_report_orders_balances() {
        let engine = SettlementEngine::new();
        let mut snapshot = GroupSnapshot::new("trip");
        snapshot.members = members(&["a", "b", "c"]);
        snapshot.expenses = circular_expenses();

        let report = engine.compute_report(&snapshot, SettlementMode::Simplified);

        let order: Vec<&str> = report.balances.iter().map(|b| b.member_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(report.group_id, "trip");
        assert_eq!(report.settlements, vec![settlement("c", "a", 105)]);
    }

    #[test]
    fn test_custom_threshold_suppresses_small_debts() {
        let engine = SettlementEngine::with_config(EngineConfig::new(d(10)));
        let group = members(&["a", "b"]);
        let expenses = vec![ExpenseRecord::new("a", d(10)).split_among(["b"])];

        let settlements =
            engine.compute_settlements(&group, &expenses, &[], SettlementMode::Direct);

        assert!(settlements.is_empty());
    }

    #[test]
    fn test_negative_threshold_falls_back_to_default() {
        let config = EngineConfig::new(d(-1));
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);

        let engine = SettlementEngine::with_config(config);
        let group = members(&["a", "b", "c"]);
        let expenses = vec![ExpenseRecord::new("a", d(90)).split_among(["b", "c"])];

        let settlements =
            engine.compute_settlements(&group, &expenses, &[], SettlementMode::Simplified);
        assert_eq!(settlements, vec![settlement("b", "a", 45), settlement("c", "a", 45)]);
    }

    #[rstest]
    #[case::direct(SettlementMode::Direct)]
    #[case::simplified(SettlementMode::Simplified)]
    fn test_overflowing_expense_is_skipped(#[case] mode: SettlementMode) {
        let engine = SettlementEngine::new();
        let group = members(&["a", "b"]);
        let expenses = vec![
            ExpenseRecord::new("a", Decimal::MAX).split_among(["b"]),
            ExpenseRecord::new("a", Decimal::MAX).split_among(["b"]),
        ];

        let balances = engine.compute_balances(&group, &expenses, &[]);
        assert_eq!(balances[0].net, Decimal::MAX);
        assert_eq!(balances[1].net, -Decimal::MAX);

        let settlements = engine.compute_settlements(&group, &expenses, &[], mode);
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].from_id, MemberId::new("b"));
        assert_eq!(settlements[0].amount, Decimal::MAX);
    }
}
