//! Split set resolution shared by the balance accumulator, the debt graph
//! builder and the pair breakdown.
//!
//! An expense's split set is:
//! - every member, when `participant_ids` is empty
//! - the participants that are current members, otherwise
//! - every member again, when none of the named participants is a member

use crate::types::{ExpenseRecord, Member, MemberId};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Lookup over the current member set, in input order, without duplicates
#[derive(Debug, Clone)]
pub struct MemberIndex<'a> {
    ids: Vec<&'a MemberId>,
    lookup: HashSet<&'a MemberId>,
}

impl<'a> MemberIndex<'a> {
    pub fn new(members: &'a [Member]) -> Self {
        let mut ids = Vec::with_capacity(members.len());
        let mut lookup = HashSet::with_capacity(members.len());

        for member in members {
            if lookup.insert(&member.id) {
                ids.push(&member.id);
            }
        }

        MemberIndex { ids, lookup }
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.lookup.contains(id)
    }

    /// Resolve an id to the index's own reference
    pub fn get(&self, id: &MemberId) -> Option<&'a MemberId> {
        self.lookup.get(id).copied()
    }

    /// Member ids in input order
    pub fn ids(&self) -> &[&'a MemberId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Resolve the members an expense is divided among
///
/// Unknown participant ids are dropped and repeated ids count once. Returns an
/// empty set only when the member set itself is empty.
pub fn resolve_split_set<'a>(index: &MemberIndex<'a>, expense: &ExpenseRecord) -> Vec<&'a MemberId> {
    if expense.participant_ids.is_empty() {
        return index.ids().to_vec();
    }

    let mut seen = HashSet::with_capacity(expense.participant_ids.len());
    let named: Vec<&'a MemberId> = expense
        .participant_ids
        .iter()
        .filter_map(|id| index.get(id))
        .filter(|id| seen.insert(*id))
        .collect();

    if named.is_empty() {
        tracing::debug!(
            payer = %expense.payer_id,
            "no named participant is a member, splitting among everyone"
        );
        return index.ids().to_vec();
    }

    named
}

/// Per-participant share of an expense, or `None` for an empty split set
pub fn share_of(amount: Decimal, split_size: usize) -> Option<Decimal> {
    if split_size == 0 {
        return None;
    }
    Some(amount / Decimal::from(split_size))
}
