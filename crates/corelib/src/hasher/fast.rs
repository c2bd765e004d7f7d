//! Non-cryptographic hashers.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;
use xxhash_rust::xxh3::xxh3_64;

use crate::hasher::traits::KeyHasher;

/// XXH3 64-bit, seed 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Hasher;

impl KeyHasher for Xxh3Hasher {
    fn hash(&self, bytes: &[u8]) -> u64 {
        xxh3_64(bytes)
    }

    fn name(&self) -> &'static str {
        "xxh3"
    }
}

/// SipHash-1-3 with an all-zero key.
///
/// The key is fixed so placement is reproducible across restarts; this gives
/// up SipHash's flooding resistance, which the ring does not rely on.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sip13Hasher;

impl KeyHasher for Sip13Hasher {
    fn hash(&self, bytes: &[u8]) -> u64 {
        let mut hasher = SipHasher13::new();
        hasher.write(bytes);
        hasher.finish()
    }

    fn name(&self) -> &'static str {
        "sip13"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh3_matches_crate() {
        assert_eq!(Xxh3Hasher.hash(b"key"), xxh3_64(b"key"));
    }

    #[test]
    fn test_sip13_deterministic() {
        let a = Sip13Hasher.hash(b"user:42");
        let b = Sip13Hasher.hash(b"user:42");
        assert_eq!(a, b);
        assert_ne!(a, Sip13Hasher.hash(b"user:43"));
    }
}
