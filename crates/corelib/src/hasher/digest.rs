//! Digest-based hashers.
//!
//! Slower than the non-cryptographic hashers but have excellent avalanche
//! behavior, and their output is fixed by published algorithms, so rings
//! built by different processes or languages agree on placement.

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::hasher::traits::{fold_be, fold_le, KeyHasher};

/// MD5 digest, first eight bytes big-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Md5Hasher;

impl KeyHasher for Md5Hasher {
    fn hash(&self, bytes: &[u8]) -> u64 {
        fold_be(&Md5::digest(bytes))
    }

    fn name(&self) -> &'static str {
        "md5"
    }
}

/// SHA-1 digest, first eight bytes big-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha1Hasher;

impl KeyHasher for Sha1Hasher {
    fn hash(&self, bytes: &[u8]) -> u64 {
        fold_be(&Sha1::digest(bytes))
    }

    fn name(&self) -> &'static str {
        "sha1"
    }
}

/// BLAKE3 digest, first eight bytes little-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl KeyHasher for Blake3Hasher {
    fn hash(&self, bytes: &[u8]) -> u64 {
        fold_le(blake3::hash(bytes).as_bytes())
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vector() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(Md5Hasher.hash(b""), 0xd41d_8cd9_8f00_b204);
    }

    #[test]
    fn test_sha1_known_vector() {
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        assert_eq!(Sha1Hasher.hash(b"abc"), 0xa999_3e36_4706_816a);
    }

    #[test]
    fn test_blake3_deterministic() {
        assert_eq!(Blake3Hasher.hash(b"node#0"), Blake3Hasher.hash(b"node#0"));
        assert_ne!(Blake3Hasher.hash(b"node#0"), Blake3Hasher.hash(b"node#1"));
    }
}
