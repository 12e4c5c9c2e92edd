//! Pair breakdown: explains what one member owes another and why
//!
//! For a `(debtor, creditor)` pair this lists every expense that moved debt
//! between the two and every payment exchanged between them. Amounts are
//! signed from the debtor's point of view:
//!
//! - an expense line is positive when it increases what the debtor owes the
//!   creditor, negative when it runs the other way
//! - a payment line is positive when the debtor paid the creditor
//!
//! `pending = expense_total - paid_total` matches the unnetted direct-mode
//! debt for the pair. A pair involving a non-member has no lines at all,
//! matching the graph, which skips such records.

use crate::core::split::{resolve_split_set, share_of, MemberIndex};
use crate::types::{ExpenseRecord, Member, MemberId, PaymentRecord, SettleError};
use rust_decimal::Decimal;

/// One expense's contribution to a pair's debt
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLine {
    pub expense_id: Option<String>,
    pub description: String,
    pub amount: Decimal,
}

/// One payment between the pair
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLine {
    pub note: Option<String>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairBreakdown {
    pub debtor: MemberId,
    pub creditor: MemberId,
    pub expenses: Vec<ExpenseLine>,
    pub payments: Vec<PaymentLine>,
    pub expense_total: Decimal,
    pub paid_total: Decimal,
    pub pending: Decimal,
}

impl PairBreakdown {
    fn empty(debtor: &MemberId, creditor: &MemberId) -> Self {
        PairBreakdown {
            debtor: debtor.clone(),
            creditor: creditor.clone(),
            expenses: Vec::new(),
            payments: Vec::new(),
            expense_total: Decimal::ZERO,
            paid_total: Decimal::ZERO,
            pending: Decimal::ZERO,
        }
    }

    fn overflow(&self) -> SettleError {
        SettleError::arithmetic_overflow(
            "breakdown",
            &format!("pair '{}' -> '{}'", self.debtor, self.creditor),
        )
    }

    fn push_expense(&mut self, line: ExpenseLine) -> Result<(), SettleError> {
        let total = self.expense_total.checked_add(line.amount);
        let pending = total.and_then(|total| total.checked_sub(self.paid_total));
        let (Some(total), Some(pending)) = (total, pending) else {
            return Err(self.overflow());
        };
        self.expense_total = total;
        self.pending = pending;
        self.expenses.push(line);
        Ok(())
    }

    fn push_payment(&mut self, line: PaymentLine) -> Result<(), SettleError> {
        let total = self.paid_total.checked_add(line.amount);
        let pending = total.and_then(|total| self.expense_total.checked_sub(total));
        let (Some(total), Some(pending)) = (total, pending) else {
            return Err(self.overflow());
        };
        self.paid_total = total;
        self.pending = pending;
        self.payments.push(line);
        Ok(())
    }
}

/// Build the breakdown for one pair
///
/// Lines that would overflow a running total are skipped with a warning.
pub fn pair_breakdown(
    members: &[Member],
    expenses: &[ExpenseRecord],
    payments: &[PaymentRecord],
    debtor: &MemberId,
    creditor: &MemberId,
) -> PairBreakdown {
    let mut breakdown = PairBreakdown::empty(debtor, creditor);
    let index = MemberIndex::new(members);
    if debtor == creditor || !index.contains(debtor) || !index.contains(creditor) {
        return breakdown;
    }

    for expense in expenses {
        let direction = if expense.payer_id == *creditor {
            Decimal::ONE
        } else if expense.payer_id == *debtor {
            Decimal::NEGATIVE_ONE
        } else {
            continue;
        };
        let counterpart = if direction.is_sign_positive() { debtor } else { creditor };

        let split = resolve_split_set(&index, expense);
        if !split.contains(&counterpart) {
            continue;
        }
        let Some(share) = share_of(expense.amount, split.len()) else {
            continue;
        };

        let line = ExpenseLine {
            expense_id: expense.id.clone(),
            description: expense.description.clone(),
            amount: share * direction,
        };
        if let Err(error) = breakdown.push_expense(line) {
            tracing::warn!(%error, "breakdown expense line skipped");
        }
    }

    for payment in payments {
        let amount = if payment.from_id == *debtor && payment.to_id == *creditor {
            payment.amount
        } else if payment.from_id == *creditor && payment.to_id == *debtor {
            -payment.amount
        } else {
            continue;
        };
        let line = PaymentLine {
            note: payment.note.clone(),
            amount,
        };
        if let Err(error) = breakdown.push_payment(line) {
            tracing::warn!(%error, "breakdown payment line skipped");
        }
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn group() -> Vec<Member> {
        vec![
            Member::new("pipi", "Pipi"),
            Member::new("carlos", "Carlos"),
            Member::new("laura", "Laura"),
        ]
    }

    #[test]
    fn test_breakdown_with_payment() {
        let expenses = vec![
            ExpenseRecord::new("pipi", d(1000))
                .split_among(["pipi", "carlos"])
                .with_id("e1")
                .with_description("Pizza"),
            ExpenseRecord::new("pipi", d(500))
                .split_among(["pipi", "carlos"])
                .with_id("e2")
                .with_description("Taxi"),
            ExpenseRecord::new("laura", d(90)).split_among(["laura", "pipi"]),
        ];
        let payments = vec![PaymentRecord::new("carlos", "pipi", d(250))];

        let breakdown = pair_breakdown(
            &group(),
            &expenses,
            &payments,
            &MemberId::new("carlos"),
            &MemberId::new("pipi"),
        );

        assert_eq!(breakdown.expenses.len(), 2);
        assert_eq!(breakdown.expenses[0].description, "Pizza");
        assert_eq!(breakdown.expenses[0].amount, d(500));
        assert_eq!(breakdown.expenses[1].expense_id.as_deref(), Some("e2"));
        assert_eq!(breakdown.expenses[1].amount, d(250));
        assert_eq!(breakdown.payments, vec![PaymentLine { note: None, amount: d(250) }]);
        assert_eq!(breakdown.expense_total, d(750));
        assert_eq!(breakdown.paid_total, d(250));
        assert_eq!(breakdown.pending, d(500));
    }

    #[test]
    fn test_breakdown_counts_reverse_direction() {
        let expenses = vec![
            ExpenseRecord::new("pipi", d(300)).split_among(["pipi", "carlos", "laura"]),
            ExpenseRecord::new("carlos", d(150)).split_among(["pipi", "carlos", "laura"]),
        ];

        let breakdown = pair_breakdown(
            &group(),
            &expenses,
            &[],
            &MemberId::new("carlos"),
            &MemberId::new("pipi"),
        );

        let amounts: Vec<Decimal> = breakdown.expenses.iter().map(|line| line.amount).collect();
        assert_eq!(amounts, vec![d(100), d(-50)]);
        assert_eq!(breakdown.pending, d(50));
    }

    #[test]
    fn test_breakdown_payment_back_is_negative() {
        let payments = vec![PaymentRecord::new("pipi", "carlos", d(40))];

        let breakdown = pair_breakdown(
            &group(),
            &[],
            &payments,
            &MemberId::new("carlos"),
            &MemberId::new("pipi"),
        );

        assert_eq!(breakdown.paid_total, d(-40));
        assert_eq!(breakdown.pending, d(40));
    }

    #[test]
    fn test_breakdown_same_member_is_empty() {
        let expenses = vec![ExpenseRecord::new("pipi", d(100))];
        let pipi = MemberId::new("pipi");

        let breakdown = pair_breakdown(&group(), &expenses, &[], &pipi, &pipi);

        assert!(breakdown.expenses.is_empty());
        assert!(breakdown.payments.is_empty());
        assert_eq!(breakdown.pending, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_ignores_non_member_pair() {
        let expenses = vec![ExpenseRecord::new("pipi", d(100)).split_among(["carlos"])];
        let payments = vec![
            PaymentRecord::new("carlos", "zoe", d(30)),
            PaymentRecord::new("zoe", "carlos", d(10)),
        ];

        let breakdown = pair_breakdown(
            &group(),
            &expenses,
            &payments,
            &MemberId::new("carlos"),
            &MemberId::new("zoe"),
        );

        assert!(breakdown.expenses.is_empty());
        assert!(breakdown.payments.is_empty());
        assert_eq!(breakdown.paid_total, Decimal::ZERO);
        assert_eq!(breakdown.pending, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_skips_overflowing_lines() {
        let expenses = vec![
            ExpenseRecord::new("pipi", Decimal::MAX).split_among(["carlos"]),
            ExpenseRecord::new("pipi", Decimal::MAX).split_among(["carlos"]),
        ];
        let payments = vec![PaymentRecord::new("pipi", "carlos", d(1))];

        let breakdown = pair_breakdown(
            &group(),
            &expenses,
            &payments,
            &MemberId::new("carlos"),
            &MemberId::new("pipi"),
        );

        assert_eq!(breakdown.expenses.len(), 1);
        assert_eq!(breakdown.expense_total, Decimal::MAX);
        assert!(breakdown.payments.is_empty());
        assert_eq!(breakdown.pending, Decimal::MAX);
    }
}
