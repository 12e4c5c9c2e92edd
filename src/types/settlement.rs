//! Derived output types: balances, settlements and the settlement policy
//!
//! None of these are stored; they are recomputed on every engine call.

use super::member::MemberId;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Per-member balance
///
/// `net = paid - share + adjustment`. Positive means the member is owed money,
/// negative means the member owes money.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub member_id: MemberId,

    /// Total amount this member put into the pot
    pub paid: Decimal,

    /// Total amount this member should have paid
    pub share: Decimal,

    /// Net effect of recorded payments (sent minus received)
    pub adjustment: Decimal,

    pub net: Decimal,
}

impl Balance {
    /// Zero balance for a member
    pub fn new(member_id: MemberId) -> Self {
        Balance {
            member_id,
            paid: Decimal::ZERO,
            share: Decimal::ZERO,
            adjustment: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }
}

/// A recommended transfer
///
/// `amount` is always a positive whole number of currency units, and
/// `from_id != to_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub from_id: MemberId,
    pub to_id: MemberId,
    pub amount: Decimal,
}

/// Settlement policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettlementMode {
    /// Debts stay tied to the original payer/participant pairs, netted per pair
    #[default]
    Direct,

    /// Debts are matched on net balances only, minimizing transfer count greedily
    Simplified,
}

impl SettlementMode {
    /// Map a group's "simplify settlements" setting onto a mode
    pub fn from_simplify_flag(simplify: bool) -> Self {
        if simplify {
            SettlementMode::Simplified
        } else {
            SettlementMode::Direct
        }
    }
}

impl fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementMode::Direct => f.write_str("direct"),
            SettlementMode::Simplified => f.write_str("simplified"),
        }
    }
}

impl FromStr for SettlementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(SettlementMode::Direct),
            "simplified" | "simplify" => Ok(SettlementMode::Simplified),
            other => Err(format!("Unknown settlement mode '{}'", other)),
        }
    }
}
