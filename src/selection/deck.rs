//! The candidate deck.

use crate::record::{Record, RecordId, RecordPool};

/// An ordered selection of pool records.
///
/// Order only matters for presentation; energy and feasibility treat the
/// deck as a set. Records are referenced by [`RecordId`], never by content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    members: Vec<RecordId>,
}

impl Deck {
    pub fn new(members: Vec<RecordId>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[RecordId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.members.contains(&id)
    }

    /// Membership bitmap over a pool of `pool_len` records.
    pub fn mask(&self, pool_len: usize) -> Vec<bool> {
        let mut mask = vec![false; pool_len];
        for id in &self.members {
            if let Some(slot) = mask.get_mut(id.index()) {
                *slot = true;
            }
        }
        mask
    }

    /// Resolves the members against `pool`.
    pub fn records<'a>(&'a self, pool: &'a RecordPool) -> impl Iterator<Item = &'a Record> + 'a {
        self.members.iter().map(move |&id| pool.get(id))
    }

    pub(crate) fn replace_at(&mut self, position: usize, id: RecordId) {
        self.members[position] = id;
    }
}
