//! Input records for the settlement engine
//!
//! Expenses and payments are read-only snapshots handed to the engine per call.
//! Amounts are already expressed in one base currency by the time they get here.

use super::member::{Member, MemberId};
use rust_decimal::Decimal;

/// Group identifier used to partition a ledger file
pub type GroupId = String;

/// A shared expense
///
/// An empty `participant_ids` means "split among all current members". A
/// non-empty list means "split only among these ids"; the payer is not added
/// implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// Member who put the money in
    pub payer_id: MemberId,

    /// Total amount of the expense
    pub amount: Decimal,

    /// Members the expense is split among (empty = everyone)
    pub participant_ids: Vec<MemberId>,

    /// Source document id, if the ingestion layer kept one
    pub id: Option<String>,

    /// Free-text description ("beers at beach")
    pub description: String,
}

impl ExpenseRecord {
    /// Create an expense split among everyone
    pub fn new(payer_id: impl Into<MemberId>, amount: Decimal) -> Self {
        ExpenseRecord {
            payer_id: payer_id.into(),
            amount,
            participant_ids: Vec::new(),
            id: None,
            description: String::new(),
        }
    }

    /// Restrict the split to the given participants
    pub fn split_among<I, M>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        self.participant_ids = participants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A settlement already carried out outside the app (e.g. a bank transfer)
///
/// Reduces `from_id`'s debt to `to_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub from_id: MemberId,
    pub to_id: MemberId,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl PaymentRecord {
    pub fn new(from_id: impl Into<MemberId>, to_id: impl Into<MemberId>, amount: Decimal) -> Self {
        PaymentRecord {
            from_id: from_id.into(),
            to_id: to_id.into(),
            amount,
            note: None,
        }
    }
}

/// One consistent snapshot of a group's members, expenses and payments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSnapshot {
    pub group_id: GroupId,
    pub members: Vec<Member>,
    pub expenses: Vec<ExpenseRecord>,
    pub payments: Vec<PaymentRecord>,
}

impl GroupSnapshot {
    pub fn new(group_id: impl Into<GroupId>) -> Self {
        GroupSnapshot {
            group_id: group_id.into(),
            ..Default::default()
        }
    }

    /// Fold one ledger row into the snapshot, preserving row order
    pub fn push(&mut self, entry: LedgerEntry) {
        match entry {
            LedgerEntry::Member(member) => self.members.push(member),
            LedgerEntry::Expense(expense) => self.expenses.push(expense),
            LedgerEntry::Payment(payment) => self.payments.push(payment),
        }
    }
}

/// A single ledger row after conversion, tagged with its group
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub group: GroupId,
    pub entry: LedgerEntry,
}

/// Ledger row payload
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    Member(Member),
    Expense(ExpenseRecord),
    Payment(PaymentRecord),
}
