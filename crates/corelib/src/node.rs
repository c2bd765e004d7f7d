//! Node abstractions for the slot ring.
//!
//! Nodes are supplied by the caller on every rebuild. The ring never creates
//! or destroys them; it only keeps them in the member table of the snapshot
//! it builds and hands their payload back from dispatch.

use std::fmt;
use std::sync::Arc;

/// Identifier of a node on the ring.
///
/// The identifier is hashed (as part of each virtual node key) to place the
/// node, so it must be stable across restarts for placement to be.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

/// Logical node participating in the ring.
///
/// `payload` is opaque caller data (a connection handle, an address, a shard
/// index) returned verbatim by dispatch. Keep it cheap to clone; wrap heavy
/// state in an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<P> {
    pub id: NodeId,
    pub payload: P,
}

impl<P> Node<P> {
    pub fn new(id: impl Into<NodeId>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// A node together with the weight it carries for one rebuild.
///
/// The weight is the number of virtual nodes the node occupies. It is
/// validated by [`Ring::rebuild`](crate::Ring::rebuild), not here, so a
/// membership list can be assembled freely and rejected as a whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member<P> {
    pub node: Node<P>,
    pub weight: u32,
}

impl<P> Member<P> {
    pub fn new(id: impl Into<NodeId>, payload: P, weight: u32) -> Self {
        Self {
            node: Node::new(id, payload),
            weight,
        }
    }
}

impl<P, I: Into<NodeId>> From<(I, P, u32)> for Member<P> {
    fn from((id, payload, weight): (I, P, u32)) -> Self {
        Member::new(id, payload, weight)
    }
}
