//! Core hasher trait definitions.

/// A hasher maps an opaque byte string to a position in `u64` space.
///
/// The ring reduces the output modulo its slot count, so implementations
/// must be well distributed in their low bits. Hashers are stateless and
/// thread-safe, and must be deterministic across processes: the same input
/// always yields the same output.
pub trait KeyHasher: Send + Sync + 'static {
    /// Hashes `bytes` to an unsigned integer.
    fn hash(&self, bytes: &[u8]) -> u64;

    /// Returns the registry name of this hasher.
    fn name(&self) -> &'static str;
}

/// Reads the first eight bytes of a digest as a big-endian integer.
pub(crate) fn fold_be(digest: &[u8]) -> u64 {
    digest
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

/// Reads the first eight bytes of a digest as a little-endian integer.
pub(crate) fn fold_le(digest: &[u8]) -> u64 {
    digest
        .iter()
        .take(8)
        .rev()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
