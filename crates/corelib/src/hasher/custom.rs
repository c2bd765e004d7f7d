//! Caller-supplied hash function.

use std::fmt;
use std::sync::Arc;

use crate::hasher::traits::KeyHasher;

/// Adapts any `Fn(&[u8]) -> u64` into a [`KeyHasher`].
///
/// Determinism is the caller's responsibility; a closure that reads mutable
/// state will break dispatch stability.
#[derive(Clone)]
pub struct FnHasher {
    f: Arc<dyn Fn(&[u8]) -> u64 + Send + Sync>,
}

impl FnHasher {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> u64 + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl KeyHasher for FnHasher {
    fn hash(&self, bytes: &[u8]) -> u64 {
        (self.f)(bytes)
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl fmt::Debug for FnHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_hasher_delegates() {
        let hasher = FnHasher::new(|bytes: &[u8]| bytes.len() as u64);
        assert_eq!(hasher.hash(b"abcd"), 4);
        assert_eq!(hasher.name(), "custom");
    }
}
