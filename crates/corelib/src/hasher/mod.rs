//! Hasher abstraction for the slot ring.
//!
//! Hashers turn virtual node labels and caller keys into integers that the
//! ring reduces modulo its slot count. The set of named strategies is closed:
//! a name outside [`HashFunction`] is a configuration error, never a hint to
//! look for a callable somewhere else.

pub mod custom;
pub mod digest;
pub mod fast;
pub mod traits;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub use custom::FnHasher;
pub use digest::{Blake3Hasher, Md5Hasher, Sha1Hasher};
pub use fast::{Sip13Hasher, Xxh3Hasher};
pub use traits::KeyHasher;

/// Registry of named hash strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    #[default]
    Md5,
    Sha1,
    Xxh3,
    Sip13,
    Blake3,
    /// Caller-supplied function; must be provided alongside the selection.
    Custom,
}

impl HashFunction {
    pub const ALL: [HashFunction; 6] = [
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Xxh3,
        HashFunction::Sip13,
        HashFunction::Blake3,
        HashFunction::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashFunction::Md5 => "md5",
            HashFunction::Sha1 => "sha1",
            HashFunction::Xxh3 => "xxh3",
            HashFunction::Sip13 => "sip13",
            HashFunction::Blake3 => "blake3",
            HashFunction::Custom => "custom",
        }
    }

    /// Instantiates a built-in strategy.
    ///
    /// `Custom` has no built-in implementation and fails with
    /// [`ConfigError::MissingCustomHasher`].
    pub fn build(self) -> Result<Arc<dyn KeyHasher>> {
        let hasher: Arc<dyn KeyHasher> = match self {
            HashFunction::Md5 => Arc::new(Md5Hasher),
            HashFunction::Sha1 => Arc::new(Sha1Hasher),
            HashFunction::Xxh3 => Arc::new(Xxh3Hasher),
            HashFunction::Sip13 => Arc::new(Sip13Hasher),
            HashFunction::Blake3 => Arc::new(Blake3Hasher),
            HashFunction::Custom => return Err(ConfigError::MissingCustomHasher.into()),
        };
        Ok(hasher)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashFunction {
    type Err = ConfigError;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        HashFunction::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ConfigError::UnknownHashFunction(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_known_names() {
        for kind in HashFunction::ALL {
            assert_eq!(kind.as_str().parse::<HashFunction>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        assert_eq!(
            "md4".parse::<HashFunction>(),
            Err(ConfigError::UnknownHashFunction("md4".to_string()))
        );
        // Names are exact; no case folding.
        assert!("MD5".parse::<HashFunction>().is_err());
    }

    #[test]
    fn test_build_reports_name() {
        for kind in HashFunction::ALL {
            if kind == HashFunction::Custom {
                continue;
            }
            let hasher = kind.build().expect("built-in hasher");
            assert_eq!(hasher.name(), kind.as_str());
        }
    }

    #[test]
    fn test_build_custom_without_callable() {
        let err = HashFunction::Custom.build().err();
        assert_eq!(err, Some(Error::Config(ConfigError::MissingCustomHasher)));
    }

    #[test]
    fn test_serde_names() {
        let kind: HashFunction = serde_json::from_str("\"xxh3\"").unwrap();
        assert_eq!(kind, HashFunction::Xxh3);
        assert!(serde_json::from_str::<HashFunction>("\"crc32\"").is_err());
    }
}
