//! The slot ring: construction, rebuild and dispatch.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::config::RingConfig;
use crate::error::{ConfigError, Error, Result};
use crate::hasher::{FnHasher, HashFunction, KeyHasher};
use crate::node::{Member, Node};
use crate::ring::slots::EMPTY;
use crate::ring::snapshot::Snapshot;

/// Default number of slots.
pub const DEFAULT_HASH_RANGE: usize = 65536;

/// Weighted consistent-hashing ring over a fixed array of slots.
///
/// Every slot is bound to the node owning the nearest virtual node at or
/// after it, clockwise. Dispatch hashes the key to a slot and reads its
/// owner, so lookups are O(1); [`rebuild`](Ring::rebuild) recomputes the
/// whole array in O(hash_range).
///
/// Rebuilds construct a new [`Snapshot`] off to the side and publish it with
/// a single pointer swap. Concurrent dispatches see either the previous ring
/// or the new one, never a partially built one.
///
/// # Example
///
/// ```rust
/// use slotring::{Member, Ring};
///
/// let ring = Ring::builder().hash_range(1024).build().unwrap();
/// ring.rebuild([
///     Member::new("cache-a", "10.0.0.1:11211", 1),
///     Member::new("cache-b", "10.0.0.2:11211", 3),
/// ])
/// .unwrap();
///
/// let addr = ring.dispatch("user:42").unwrap();
/// assert_eq!(ring.dispatch("user:42").unwrap(), addr);
/// ```
pub struct Ring<P> {
    hash_range: usize,
    hasher: Arc<dyn KeyHasher>,
    current: RwLock<Arc<Snapshot<P>>>,
    /// Serializes rebuilds so generations are published in order.
    rebuild_lock: Mutex<()>,
}

impl<P> Ring<P> {
    /// Creates an empty ring with `hash_range` slots.
    pub fn new(hash_range: usize, hasher: impl KeyHasher) -> Result<Self> {
        Self::with_hasher(hash_range, Arc::new(hasher))
    }

    pub fn builder() -> RingBuilder<P> {
        RingBuilder::new()
    }

    /// Creates an empty ring from a configuration naming a built-in hash
    /// function.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.builder().build()
    }

    pub(crate) fn with_hasher(hash_range: usize, hasher: Arc<dyn KeyHasher>) -> Result<Self> {
        if hash_range == 0 || hash_range > EMPTY as usize {
            return Err(ConfigError::InvalidHashRange(hash_range).into());
        }
        let empty = Snapshot::empty(Arc::clone(&hasher), hash_range);
        Ok(Self {
            hash_range,
            hasher,
            current: RwLock::new(Arc::new(empty)),
            rebuild_lock: Mutex::new(()),
        })
    }

    /// Replaces the ring contents with `members`, the complete membership.
    ///
    /// All members are validated before anything is built: weights must be
    /// at least 1 and identifiers unique. On error the published ring is
    /// unchanged. An empty membership publishes an all-empty ring.
    ///
    /// When virtual nodes of two different members hash to the same slot,
    /// the later member in iteration order keeps it.
    pub fn rebuild<I, M>(&self, members: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Member<P>>,
    {
        let members: Vec<Member<P>> = members.into_iter().map(Into::into).collect();
        if let Err(err) = validate(&members) {
            debug!(error = %err, "rejected ring membership");
            return Err(err.into());
        }

        let _guard = self.rebuild_lock.lock();
        let generation = self.current.read().generation() + 1;
        let snapshot = Snapshot::build(generation, Arc::clone(&self.hasher), self.hash_range, members);

        debug!(
            generation,
            nodes = snapshot.node_count(),
            vnodes = snapshot.vnode_count(),
            occupied = snapshot.occupied(),
            collisions = snapshot.collisions(),
            hash_range = self.hash_range,
            "rebuilt ring"
        );
        metrics::counter!("slotring_rebuilds_total").increment(1);
        metrics::gauge!("slotring_nodes").set(snapshot.node_count() as f64);

        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(snapshot));
        // Release the old slot array outside the write lock.
        drop(previous);
        Ok(())
    }

    /// Pins the current ring generation.
    ///
    /// Use this to run many lookups against one consistent view, or to keep
    /// a generation around for [`SlotDiff`](crate::SlotDiff).
    pub fn snapshot(&self) -> Arc<Snapshot<P>> {
        Arc::clone(&self.current.read())
    }

    /// Node owning `key`.
    pub fn dispatch_node(&self, key: impl AsRef<[u8]>) -> Result<Node<P>>
    where
        P: Clone,
    {
        let snapshot = self.snapshot();
        let node = snapshot.dispatch(key).map(Node::clone);
        if node.is_err() {
            metrics::counter!("slotring_dispatch_empty_total").increment(1);
        }
        node
    }

    /// Payload of the node owning `key`.
    ///
    /// Fails with [`Error::EmptyRing`] until a rebuild with at least one
    /// node has been published.
    pub fn dispatch(&self, key: impl AsRef<[u8]>) -> Result<P>
    where
        P: Clone,
    {
        self.dispatch_node(key).map(|node| node.payload)
    }

    pub fn hash_range(&self) -> usize {
        self.hash_range
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }

    /// Generation of the published ring.
    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    pub fn node_count(&self) -> usize {
        self.current.read().node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

impl<P> fmt::Debug for Ring<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("hash_range", &self.hash_range)
            .field("hasher", &self.hasher.name())
            .field("current", &*self.current.read())
            .finish()
    }
}

fn validate<P>(members: &[Member<P>]) -> std::result::Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if member.weight == 0 {
            return Err(ConfigError::InvalidWeight {
                node: member.node.id.clone(),
                weight: member.weight,
            });
        }
        if !seen.insert(&member.node.id) {
            return Err(ConfigError::DuplicateNode(member.node.id.clone()));
        }
    }
    // Member indices share the slot encoding with the empty sentinel.
    if members.len() >= EMPTY as usize {
        return Err(ConfigError::TooManyNodes(members.len()));
    }
    Ok(())
}

/// Builder for [`Ring`].
///
/// Hash function names are checked against [`HashFunction`] when given; an
/// unknown name is reported by [`build`](RingBuilder::build).
pub struct RingBuilder<P> {
    hash_range: usize,
    hash_function: std::result::Result<HashFunction, ConfigError>,
    custom: Option<Arc<dyn KeyHasher>>,
    _payload: PhantomData<fn() -> P>,
}

impl<P> RingBuilder<P> {
    pub fn new() -> Self {
        Self {
            hash_range: DEFAULT_HASH_RANGE,
            hash_function: Ok(HashFunction::default()),
            custom: None,
            _payload: PhantomData,
        }
    }

    /// Number of slots. Defaults to 65536.
    pub fn hash_range(mut self, hash_range: usize) -> Self {
        self.hash_range = hash_range;
        self
    }

    /// Selects a named strategy. Defaults to `md5`.
    pub fn hash_function(mut self, kind: HashFunction) -> Self {
        self.hash_function = Ok(kind);
        self
    }

    /// Selects a strategy by registry name, e.g. from a config file.
    pub fn hash_function_name(mut self, name: &str) -> Self {
        self.hash_function = name.parse();
        self
    }

    /// Supplies the function behind the `custom` strategy and selects it.
    pub fn custom_hasher<F>(self, f: F) -> Self
    where
        F: Fn(&[u8]) -> u64 + Send + Sync + 'static,
    {
        self.hasher(FnHasher::new(f))
    }

    /// Supplies any [`KeyHasher`] as the `custom` strategy and selects it.
    pub fn hasher(mut self, hasher: impl KeyHasher) -> Self {
        self.custom = Some(Arc::new(hasher));
        self.hash_function = Ok(HashFunction::Custom);
        self
    }

    pub fn build(self) -> Result<Ring<P>> {
        let hasher = match self.hash_function? {
            HashFunction::Custom => self.custom.ok_or(Error::Config(ConfigError::MissingCustomHasher))?,
            kind => kind.build()?,
        };
        Ring::with_hasher(self.hash_range, hasher)
    }
}

impl<P> Default for RingBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for RingBuilder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuilder")
            .field("hash_range", &self.hash_range)
            .field("hash_function", &self.hash_function)
            .field("custom", &self.custom.as_ref().map(|h| h.name()))
            .finish()
    }
}
