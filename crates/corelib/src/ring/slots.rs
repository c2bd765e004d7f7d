//! Slot array construction: direct placement and gap resolution.
//!
//! A slot holds the index of its owner in the member table, or [`EMPTY`].

use crate::hasher::KeyHasher;
use crate::node::Member;
use crate::vnode::VnodeSlots;

/// Sentinel for a slot with no owner.
pub(crate) const EMPTY: u32 = u32::MAX;

/// Counters gathered while placing virtual nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Total virtual nodes hashed.
    pub vnodes: u64,
    /// Distinct slots hit directly by a virtual node.
    pub occupied: usize,
    /// Virtual nodes that landed on a slot already held by another node.
    pub collisions: usize,
}

/// Writes every member's virtual nodes into `slots`, last writer wins.
///
/// Member `i` is recorded as `i as u32`; callers guarantee fewer than
/// [`EMPTY`] members.
pub(crate) fn place<P>(slots: &mut [u32], members: &[Member<P>], hasher: &dyn KeyHasher) -> Placement {
    let mut stats = Placement::default();
    for (index, member) in members.iter().enumerate() {
        let owner = index as u32;
        for slot in VnodeSlots::new(&member.node.id, member.weight, hasher, slots.len()) {
            stats.vnodes += 1;
            match slots[slot] {
                EMPTY => stats.occupied += 1,
                previous if previous != owner => {
                    stats.collisions += 1;
                    tracing::trace!(
                        slot,
                        winner = %member.node.id,
                        loser = %members[previous as usize].node.id,
                        "virtual node collision"
                    );
                }
                _ => {}
            }
            slots[slot] = owner;
        }
    }
    stats
}

/// Assigns every empty slot the owner of its next occupied slot clockwise.
///
/// One backward sweep resolves everything at or below the highest occupied
/// slot. Empties above it wrap around to the lowest occupied slot, whose
/// owner is what the sweep holds when it finishes. A slot array with no
/// occupied slot is left untouched.
pub(crate) fn forward_fill(slots: &mut [u32]) {
    let mut last_seen = EMPTY;
    for slot in slots.iter_mut().rev() {
        if *slot == EMPTY {
            *slot = last_seen;
        } else {
            last_seen = *slot;
        }
    }

    if last_seen == EMPTY {
        return;
    }

    for slot in slots.iter_mut().rev() {
        if *slot != EMPTY {
            break;
        }
        *slot = last_seen;
    }
}
