//! Emission-time rounding policy
//!
//! Balances and graph cells stay at full decimal precision. Amounts are only
//! rounded to whole currency units when a settlement is emitted.

use crate::types::{MemberId, Settlement};
use rust_decimal::{Decimal, RoundingStrategy};

/// Default noise threshold; magnitudes at or below it are never settled
pub const DEFAULT_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round a magnitude to whole currency units, halves away from zero
pub fn to_whole_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Build a settlement from a pre-rounding magnitude
///
/// Returns `None` for self-settlements, magnitudes at or below `threshold`,
/// and magnitudes that round to zero units.
pub fn emit_settlement(
    from_id: &MemberId,
    to_id: &MemberId,
    magnitude: Decimal,
    threshold: Decimal,
) -> Option<Settlement> {
    if from_id == to_id || magnitude <= threshold {
        return None;
    }

    let amount = to_whole_units(magnitude);
    if amount < Decimal::ONE {
        tracing::trace!(from = %from_id, to = %to_id, %magnitude, "settlement rounds to zero, dropped");
        return None;
    }

    Some(Settlement {
        from_id: from_id.clone(),
        to_id: to_id.clone(),
        amount,
    })
}

/// Order settlements by amount descending, then by `(from, to)`
pub fn sort_settlements(settlements: &mut [Settlement]) {
    settlements.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.from_id.cmp(&b.from_id))
            .then_with(|| a.to_id.cmp(&b.to_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_threshold_is_one_cent() {
        assert_eq!(DEFAULT_THRESHOLD, Decimal::new(1, 2));
    }

    #[rstest]
    #[case::round_down(Decimal::new(10049, 2), Decimal::new(100, 0))]
    #[case::half_up(Decimal::new(1005, 1), Decimal::new(101, 0))]
    #[case::round_up(Decimal::new(3333, 1), Decimal::new(333, 0))]
    #[case::already_whole(Decimal::new(55, 0), Decimal::new(55, 0))]
    fn test_to_whole_units(#[case] amount: Decimal, #[case] expected: Decimal) {
        assert_eq!(to_whole_units(amount), expected);
    }

    #[rstest]
    #[case::below_threshold(Decimal::new(5, 3))]
    #[case::at_threshold(Decimal::new(1, 2))]
    #[case::rounds_to_zero(Decimal::new(4, 1))]
    fn test_emit_settlement_drops_small_amounts(#[case] magnitude: Decimal) {
        let a = MemberId::new("a");
        let b = MemberId::new("b");
        assert_eq!(emit_settlement(&a, &b, magnitude, DEFAULT_THRESHOLD), None);
    }

    #[test]
    fn test_emit_settlement_never_self() {
        let a = MemberId::new("a");
        assert_eq!(
            emit_settlement(&a, &a, Decimal::new(100, 0), DEFAULT_THRESHOLD),
            None
        );
    }

    #[test]
    fn test_emit_settlement_rounds() {
        let a = MemberId::new("a");
        let b = MemberId::new("b");
        let settlement = emit_settlement(&a, &b, Decimal::new(5001, 2), DEFAULT_THRESHOLD).unwrap();
        assert_eq!(settlement.amount, Decimal::new(50, 0));
        assert_eq!(settlement.from_id, a);
        assert_eq!(settlement.to_id, b);
    }

    #[test]
    fn test_sort_settlements_amount_then_ids() {
        let s = |from: &str, to: &str, amount: i64| Settlement {
            from_id: MemberId::new(from),
            to_id: MemberId::new(to),
            amount: Decimal::new(amount, 0),
        };
        let mut settlements = vec![s("c", "b", 50), s("b", "a", 50), s("c", "a", 55)];

        sort_settlements(&mut settlements);

        assert_eq!(settlements, vec![s("c", "a", 55), s("b", "a", 50), s("c", "b", 50)]);
    }
}
