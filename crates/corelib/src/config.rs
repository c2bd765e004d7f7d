//! Ring configuration.
//!
//! Deserializable so hosts can keep ring parameters next to the rest of
//! their configuration. Validation happens in [`RingBuilder::build`], the
//! same path programmatic construction takes.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ring::{Ring, RingBuilder, DEFAULT_HASH_RANGE};

/// Construction parameters, fixed for the ring's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Number of slots.
    pub hash_range: usize,
    /// Registry name of the hash function.
    pub hash_function: String,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            hash_range: DEFAULT_HASH_RANGE,
            hash_function: "md5".to_string(),
        }
    }
}

impl RingConfig {
    /// A builder preloaded with this configuration.
    ///
    /// Chain [`RingBuilder::custom_hasher`] when `hash_function` is `custom`.
    pub fn builder<P>(&self) -> RingBuilder<P> {
        RingBuilder::new()
            .hash_range(self.hash_range)
            .hash_function_name(&self.hash_function)
    }

    /// Builds a ring from a configuration naming a built-in hash function.
    pub fn build<P>(&self) -> Result<Ring<P>> {
        self.builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    #[test]
    fn test_defaults_from_empty_object() {
        let config: RingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RingConfig::default());
        assert_eq!(config.hash_range, 65536);
        assert_eq!(config.hash_function, "md5");
    }

    #[test]
    fn test_build_from_config() {
        let config: RingConfig =
            serde_json::from_str(r#"{"hash_range": 4096, "hash_function": "sha1"}"#).unwrap();
        let ring: Ring<()> = config.build().unwrap();
        assert_eq!(ring.hash_range(), 4096);
        assert_eq!(ring.hasher_name(), "sha1");
    }

    #[test]
    fn test_unknown_hash_function_fails_at_build() {
        let config = RingConfig {
            hash_function: "mdd5".to_string(),
            ..RingConfig::default()
        };
        assert_eq!(
            config.build::<()>().unwrap_err(),
            Error::Config(ConfigError::UnknownHashFunction("mdd5".to_string()))
        );
    }

    #[test]
    fn test_custom_needs_callable() {
        let config = RingConfig {
            hash_function: "custom".to_string(),
            ..RingConfig::default()
        };
        assert!(config.build::<()>().unwrap_err().is_config());

        let ring: Ring<()> = config.builder().custom_hasher(|bytes| bytes.len() as u64).build().unwrap();
        assert_eq!(ring.hasher_name(), "custom");
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(serde_json::from_str::<RingConfig>(r#"{"hash_rnage": 10}"#).is_err());
    }
}
