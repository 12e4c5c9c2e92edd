//! Greedy settlement matching for simplified mode
//!
//! Largest debtors are paired with largest creditors until both sides are
//! exhausted. This keeps the transfer count low in the common case but is not
//! a guaranteed minimum; exact minimization is a partition search and is not
//! attempted.

use crate::core::balance_accumulator::{creditors, debtors};
use crate::core::rounding::emit_settlement;
use crate::types::{Balance, MemberId, Settlement};
use rust_decimal::Decimal;

struct Position<'a> {
    member_id: &'a MemberId,
    remaining: Decimal,
}

/// Match net balances into transfers
///
/// Only balances whose magnitude exceeds `threshold` take part. A member can
/// never appear on both sides, so no self-settlement is possible. A negative
/// threshold is treated as zero; every step then exhausts at least one side.
pub fn match_settlements(balances: &[Balance], threshold: Decimal) -> Vec<Settlement> {
    let threshold = threshold.max(Decimal::ZERO);
    let mut owing: Vec<Position<'_>> = debtors(balances, threshold)
        .into_iter()
        .map(|b| Position {
            member_id: &b.member_id,
            remaining: -b.net,
        })
        .collect();
    let mut owed: Vec<Position<'_>> = creditors(balances, threshold)
        .into_iter()
        .map(|b| Position {
            member_id: &b.member_id,
            remaining: b.net,
        })
        .collect();

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < owing.len() && j < owed.len() {
        let amount = owing[i].remaining.min(owed[j].remaining);

        if let Some(settlement) =
            emit_settlement(owing[i].member_id, owed[j].member_id, amount, threshold)
        {
            settlements.push(settlement);
        }

        owing[i].remaining -= amount;
        owed[j].remaining -= amount;

        if owing[i].remaining <= threshold {
            i += 1;
        }
        if owed[j].remaining <= threshold {
            j += 1;
        }
    }

    settlements
}
