//! Balance accumulation
//!
//! Folds expenses and payments into per-member `{paid, share, adjustment}`
//! triples and derives `net = paid - share + adjustment`. No rounding happens
//! here; balances stay at full decimal precision.
//!
//! Every record is applied atomically with checked arithmetic. A record that
//! would push any touched total (or its derived net) out of the decimal range
//! is rejected as a whole.

use crate::core::split::{resolve_split_set, share_of, MemberIndex};
use crate::types::{Balance, ExpenseRecord, Member, MemberId, PaymentRecord, SettleError};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Accumulates balances for one member set
///
/// Records referencing unknown members are skipped (with a warning) so that
/// `paid` and `share` always sum to the same volume.
pub struct BalanceAccumulator<'a> {
    index: MemberIndex<'a>,
    balances: Vec<Balance>,
    positions: HashMap<&'a MemberId, usize>,
}

/// Pending updates for one record, keyed by balance position
type Staged = BTreeMap<usize, Balance>;

fn checked_net(balance: &Balance) -> Option<Decimal> {
    balance.paid.checked_sub(balance.share)?.checked_add(balance.adjustment)
}

impl<'a> BalanceAccumulator<'a> {
    /// Start from zero balances for every member
    pub fn new(members: &'a [Member]) -> Self {
        let index = MemberIndex::new(members);
        let balances: Vec<Balance> = index
            .ids()
            .iter()
            .map(|id| Balance::new((*id).clone()))
            .collect();
        let positions = index
            .ids()
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, pos))
            .collect();

        BalanceAccumulator {
            index,
            balances,
            positions,
        }
    }

    /// Working copy of a member's balance for the record being applied
    fn stage<'s>(&self, staged: &'s mut Staged, id: &MemberId) -> Option<&'s mut Balance> {
        let pos = *self.positions.get(id)?;
        if !staged.contains_key(&pos) {
            staged.insert(pos, self.balances.get(pos)?.clone());
        }
        staged.get_mut(&pos)
    }

    fn commit(&mut self, staged: Staged, error: SettleError) -> Result<(), SettleError> {
        if staged.values().any(|balance| checked_net(balance).is_none()) {
            return Err(error);
        }
        for (pos, balance) in staged {
            if let Some(slot) = self.balances.get_mut(pos) {
                *slot = balance;
            }
        }
        Ok(())
    }

    /// Credit the payer and charge every member of the split set
    ///
    /// Fails with `ArithmeticOverflow`, leaving every balance untouched, when a
    /// total would leave the decimal range.
    pub fn apply_expense(&mut self, expense: &ExpenseRecord) -> Result<(), SettleError> {
        if !self.index.contains(&expense.payer_id) {
            tracing::warn!(payer = %expense.payer_id, amount = %expense.amount, "expense payer is not a member, skipped");
            return Ok(());
        }

        let split = resolve_split_set(&self.index, expense);
        let Some(share) = share_of(expense.amount, split.len()) else {
            return Ok(());
        };
        let overflow =
            || SettleError::arithmetic_overflow("expense", &format!("payer '{}'", expense.payer_id));

        let mut staged = Staged::new();
        if let Some(payer) = self.stage(&mut staged, &expense.payer_id) {
            payer.paid = payer.paid.checked_add(expense.amount).ok_or_else(overflow)?;
        }
        for participant in split {
            if let Some(balance) = self.stage(&mut staged, participant) {
                balance.share = balance.share.checked_add(share).ok_or_else(overflow)?;
            }
        }

        self.commit(staged, overflow())
    }

    /// Move `amount` of debt from the payer side to the payee side
    pub fn apply_payment(&mut self, payment: &PaymentRecord) -> Result<(), SettleError> {
        if payment.from_id == payment.to_id {
            tracing::warn!(member = %payment.from_id, "self-payment skipped");
            return Ok(());
        }
        if !self.index.contains(&payment.from_id) || !self.index.contains(&payment.to_id) {
            tracing::warn!(
                from = %payment.from_id,
                to = %payment.to_id,
                "payment references a non-member, skipped"
            );
            return Ok(());
        }
        let overflow = || {
            SettleError::arithmetic_overflow(
                "payment",
                &format!("'{}' -> '{}'", payment.from_id, payment.to_id),
            )
        };

        let mut staged = Staged::new();
        if let Some(from) = self.stage(&mut staged, &payment.from_id) {
            from.adjustment = from.adjustment.checked_add(payment.amount).ok_or_else(overflow)?;
        }
        if let Some(to) = self.stage(&mut staged, &payment.to_id) {
            to.adjustment = to.adjustment.checked_sub(payment.amount).ok_or_else(overflow)?;
        }

        self.commit(staged, overflow())
    }

    /// Finish accumulation, deriving `net` for every member (input order)
    pub fn into_balances(self) -> Vec<Balance> {
        self.balances
            .into_iter()
            .map(|mut balance| {
                // every commit checked this derivation
                balance.net = checked_net(&balance).unwrap_or_default();
                balance
            })
            .collect()
    }
}

/// Compute per-member balances from an expense and payment history
///
/// Returns one balance per distinct member, in input order. An empty member set
/// yields an empty list. Records that would overflow are skipped with a warning.
pub fn compute_balances(
    members: &[Member],
    expenses: &[ExpenseRecord],
    payments: &[PaymentRecord],
) -> Vec<Balance> {
    let mut accumulator = BalanceAccumulator::new(members);
    for expense in expenses {
        if let Err(error) = accumulator.apply_expense(expense) {
            tracing::warn!(%error, "expense skipped");
        }
    }
    for payment in payments {
        if let Err(error) = accumulator.apply_payment(payment) {
            tracing::warn!(%error, "payment skipped");
        }
    }
    accumulator.into_balances()
}

/// Sort balances creditors first (net descending), ties by member id
pub fn sort_by_net_desc(balances: &mut [Balance]) {
    balances.sort_by(|a, b| b.net.cmp(&a.net).then_with(|| a.member_id.cmp(&b.member_id)));
}

/// Members owing more than `threshold`, largest debt first
pub fn debtors(balances: &[Balance], threshold: Decimal) -> Vec<&Balance> {
    let mut owing: Vec<&Balance> = balances.iter().filter(|b| b.net < -threshold).collect();
    owing.sort_by(|a, b| a.net.cmp(&b.net).then_with(|| a.member_id.cmp(&b.member_id)));
    owing
}

/// Members owed more than `threshold`, largest credit first
pub fn creditors(balances: &[Balance], threshold: Decimal) -> Vec<&Balance> {
    let mut owed: Vec<&Balance> = balances.iter().filter(|b| b.net > threshold).collect();
    owed.sort_by_key(|b| (Reverse(b.net), b.member_id.clone()));
    owed
}

/// Total expense volume
pub fn total_spent(expenses: &[ExpenseRecord]) -> Result<Decimal, SettleError> {
    expenses.iter().try_fold(Decimal::ZERO, |total, expense| {
        total
            .checked_add(expense.amount)
            .ok_or_else(|| SettleError::arithmetic_overflow("total spent", "expense volume"))
    })
}
