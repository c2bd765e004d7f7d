//! Ownership changes between ring generations.
//!
//! Used to measure how much of the keyspace a membership change remaps.
//! With consistent hashing only the slots routed through the changed node
//! should move; comparing snapshots makes that visible.

use std::collections::BTreeMap;

use crate::node::NodeId;
use crate::ring::Snapshot;

/// Slot ownership changes from one snapshot to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDiff {
    /// Slots compared.
    pub total: usize,
    /// Slots whose owner changed, including to or from empty.
    pub moved: usize,
    /// Slots each node owns in the new snapshot but not the old one.
    pub gained: BTreeMap<NodeId, usize>,
    /// Slots each node owned in the old snapshot but not the new one.
    pub lost: BTreeMap<NodeId, usize>,
}

impl SlotDiff {
    /// Compares slot owners by identifier, slot by slot.
    ///
    /// Snapshots of different sizes are compared over the shorter one.
    pub fn between<P, Q>(old: &Snapshot<P>, new: &Snapshot<Q>) -> Self {
        let mut diff = SlotDiff::default();
        for (before, after) in old.owners().zip(new.owners()) {
            diff.total += 1;
            if before == after {
                continue;
            }
            diff.moved += 1;
            if let Some(id) = before {
                *diff.lost.entry(id.clone()).or_default() += 1;
            }
            if let Some(id) = after {
                *diff.gained.entry(id.clone()).or_default() += 1;
            }
        }
        diff
    }

    /// Fraction of compared slots that changed owner.
    pub fn moved_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.moved as f64 / self.total as f64
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.moved == 0
    }
}
