//! Immutable ring snapshots.
//!
//! A snapshot is one fully built generation of the ring. [`Ring`](super::Ring)
//! publishes snapshots wholesale, so anything holding an `Arc<Snapshot<P>>`
//! sees a complete, consistent slot array for as long as it keeps it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hasher::KeyHasher;
use crate::node::{Member, Node, NodeId};
use crate::ring::slots::{self, Placement, EMPTY};

/// One fully built generation of the ring.
pub struct Snapshot<P> {
    generation: u64,
    hasher: Arc<dyn KeyHasher>,
    members: Vec<Member<P>>,
    slots: Vec<u32>,
    placement: Placement,
}

impl<P> Snapshot<P> {
    /// An all-empty ring of `hash_range` slots.
    pub(crate) fn empty(hasher: Arc<dyn KeyHasher>, hash_range: usize) -> Self {
        Self {
            generation: 0,
            hasher,
            members: Vec::new(),
            slots: vec![EMPTY; hash_range],
            placement: Placement::default(),
        }
    }

    /// Places and gap-fills `members`, which must already be validated.
    pub(crate) fn build(
        generation: u64,
        hasher: Arc<dyn KeyHasher>,
        hash_range: usize,
        members: Vec<Member<P>>,
    ) -> Self {
        let mut slots = vec![EMPTY; hash_range];
        let placement = slots::place(&mut slots, &members, hasher.as_ref());
        slots::forward_fill(&mut slots);
        Self {
            generation,
            hasher,
            members,
            slots,
            placement,
        }
    }

    /// Slot index for `key`.
    #[inline]
    pub fn slot_for(&self, key: impl AsRef<[u8]>) -> usize {
        (self.hasher.hash(key.as_ref()) % self.slots.len() as u64) as usize
    }

    /// Node owning the slot `key` hashes to.
    ///
    /// Fails with [`Error::EmptyRing`] when the ring holds no nodes.
    pub fn dispatch(&self, key: impl AsRef<[u8]>) -> Result<&Node<P>> {
        self.owner(self.slot_for(key)).ok_or(Error::EmptyRing)
    }

    /// Owner of `slot`; `None` when the ring is empty or `slot` is out of range.
    pub fn owner(&self, slot: usize) -> Option<&Node<P>> {
        match self.slots.get(slot).copied() {
            None | Some(EMPTY) => None,
            Some(index) => Some(&self.members[index as usize].node),
        }
    }

    /// Identifier of each slot's owner, in slot order.
    pub fn owners(&self) -> impl Iterator<Item = Option<&NodeId>> + '_ {
        self.slots.iter().map(move |&index| {
            (index != EMPTY).then(|| &self.members[index as usize].node.id)
        })
    }

    /// Slots owned per node, ordered by identifier.
    ///
    /// Nodes whose virtual nodes were all overwritten by collisions own
    /// nothing and are reported with zero.
    pub fn ownership(&self) -> Vec<(NodeId, usize)> {
        let mut counts = vec![0usize; self.members.len()];
        for &index in &self.slots {
            if index != EMPTY {
                counts[index as usize] += 1;
            }
        }
        let by_id: BTreeMap<&NodeId, usize> = self
            .members
            .iter()
            .zip(counts)
            .map(|(member, count)| (&member.node.id, count))
            .collect();
        by_id.into_iter().map(|(id, count)| (id.clone(), count)).collect()
    }

    /// Members this snapshot was built from, in rebuild order.
    pub fn members(&self) -> &[Member<P>] {
        &self.members
    }

    /// Nodes this snapshot was built from, in rebuild order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<P>> + '_ {
        self.members.iter().map(|member| &member.node)
    }

    /// Rebuild counter; 0 for a ring that was never rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hash_range(&self) -> usize {
        self.slots.len()
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }

    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of member weights.
    pub fn vnode_count(&self) -> u64 {
        self.placement.vnodes
    }

    /// Slots hit directly by a virtual node before gap resolution.
    pub fn occupied(&self) -> usize {
        self.placement.occupied
    }

    /// Virtual nodes that overwrote a slot held by a different node.
    pub fn collisions(&self) -> usize {
        self.placement.collisions
    }
}

impl<P> fmt::Debug for Snapshot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("hasher", &self.hasher.name())
            .field("hash_range", &self.slots.len())
            .field("nodes", &self.members.len())
            .field("vnodes", &self.placement.vnodes)
            .field("occupied", &self.placement.occupied)
            .field("collisions", &self.placement.collisions)
            .finish()
    }
}
