//! Virtual node placement.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Each node occupies `weight` positions on the ring rather than one. The
//! position of virtual node `i` is the hash of the label `"{id}#{i}"`
//! reduced modulo the slot count. A node with weight 3 therefore owns, in
//! expectation, three times as many slots as a node with weight 1.
//!
//! Labels depend only on the node's identifier and index, so a node's
//! positions do not move when other nodes join, leave or change weight.
//! That is what confines remapping to the changed node's ranges.

use std::fmt::Write;

use crate::hasher::KeyHasher;
use crate::node::NodeId;

/// Builds the hashing label of virtual node `index` of `id`.
///
/// ```rust
/// use slotring::vnode::vnode_key;
/// use slotring::NodeId;
///
/// assert_eq!(vnode_key(&NodeId::from("cache-a"), 2), "cache-a#2");
/// ```
pub fn vnode_key(id: &NodeId, index: u32) -> String {
    let mut key = String::with_capacity(id.as_str().len() + 11);
    push_vnode_key(&mut key, id, index);
    key
}

fn push_vnode_key(buf: &mut String, id: &NodeId, index: u32) {
    buf.push_str(id.as_str());
    buf.push('#');
    // Writing to a String cannot fail.
    let _ = write!(buf, "{index}");
}

/// Iterates the slot positions of a node's virtual nodes, in index order.
///
/// Reuses one label buffer for the whole node.
pub(crate) struct VnodeSlots<'a> {
    id: &'a NodeId,
    hasher: &'a dyn KeyHasher,
    hash_range: u64,
    next: u32,
    weight: u32,
    buf: String,
}

impl<'a> VnodeSlots<'a> {
    pub(crate) fn new(id: &'a NodeId, weight: u32, hasher: &'a dyn KeyHasher, hash_range: usize) -> Self {
        Self {
            id,
            hasher,
            hash_range: hash_range as u64,
            next: 0,
            weight,
            buf: String::with_capacity(id.as_str().len() + 11),
        }
    }
}

impl Iterator for VnodeSlots<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.weight {
            return None;
        }
        self.buf.clear();
        push_vnode_key(&mut self.buf, self.id, self.next);
        self.next += 1;
        Some((self.hasher.hash(self.buf.as_bytes()) % self.hash_range) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.weight - self.next) as usize;
        (remaining, Some(remaining))
    }
}
