//! Consistent hash ring implementation.
//!
//! The ring owns a fixed array of slots. A rebuild places every virtual node
//! directly into its slot, then resolves the remaining gaps so each slot is
//! owned by its nearest occupied successor. Lookups read one slot.

pub mod ring;
pub mod snapshot;
pub(crate) mod slots;

pub use ring::{Ring, RingBuilder, DEFAULT_HASH_RANGE};
pub use snapshot::Snapshot;
