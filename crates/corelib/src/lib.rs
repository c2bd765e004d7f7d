//! Weighted consistent hashing over a fixed slot array.
//!
//! This crate provides:
//! - Pluggable key hashers with a closed registry of named strategies
//! - Nodes carrying opaque caller payloads, weighted by virtual node count
//! - A slot ring with O(1) dispatch and snapshot publication on rebuild
//! - Ownership diffs between ring generations

pub mod config;
pub mod error;
pub mod hasher;
pub mod node;
pub mod ring;
pub mod topology;
pub mod vnode;

pub use config::RingConfig;
pub use error::{ConfigError, Error, Result};
pub use hasher::{FnHasher, HashFunction, KeyHasher};
pub use node::{Member, Node, NodeId};
pub use ring::{Ring, RingBuilder, Snapshot, DEFAULT_HASH_RANGE};
pub use topology::SlotDiff;
