//! Snapshot validation
//!
//! The engine never rejects input; it normalizes it. This module reports what
//! will be normalized so callers can log or surface it. Findings are returned
//! in record order.

use crate::core::split::MemberIndex;
use crate::types::{GroupSnapshot, SettleError};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Collect every validation finding for a snapshot
pub fn validate_snapshot(snapshot: &GroupSnapshot) -> Vec<SettleError> {
    let mut findings = Vec::new();

    let mut seen = HashSet::new();
    for member in &snapshot.members {
        if !seen.insert(&member.id) {
            findings.push(SettleError::duplicate_member(member.id.as_str()));
        }
    }

    if snapshot.members.is_empty() && !snapshot.expenses.is_empty() {
        findings.push(SettleError::EmptyMemberSet {
            expenses: snapshot.expenses.len(),
        });
    }

    let index = MemberIndex::new(&snapshot.members);

    for (pos, expense) in snapshot.expenses.iter().enumerate() {
        let context = match &expense.id {
            Some(id) => format!("expense '{}'", id),
            None => format!("expense #{}", pos + 1),
        };

        if expense.amount <= Decimal::ZERO {
            findings.push(SettleError::non_positive_amount(expense.amount, &context));
        }
        if !index.is_empty() && !index.contains(&expense.payer_id) {
            findings.push(SettleError::unknown_member(expense.payer_id.as_str(), &context));
        }
        for participant in &expense.participant_ids {
            if !index.is_empty() && !index.contains(participant) {
                findings.push(SettleError::unknown_member(participant.as_str(), &context));
            }
        }
    }

    for payment in &snapshot.payments {
        let context = format!("payment {}->{}", payment.from_id, payment.to_id);

        if payment.amount <= Decimal::ZERO {
            findings.push(SettleError::non_positive_amount(payment.amount, &context));
        }
        if payment.from_id == payment.to_id {
            findings.push(SettleError::self_payment(payment.from_id.as_str()));
            continue;
        }
        for endpoint in [&payment.from_id, &payment.to_id] {
            if !index.contains(endpoint) {
                findings.push(SettleError::unknown_member(endpoint.as_str(), &context));
            }
        }
    }

    findings
}
