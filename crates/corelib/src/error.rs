//! Error types for the ring library.

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias for the ring library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the ring library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid ring construction parameters or membership.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Dispatch against a ring that holds no nodes.
    #[error("ring is empty: no nodes available")]
    EmptyRing,
}

impl Error {
    /// True for errors caused by bad configuration or membership input.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Configuration problems, reported synchronously by the call that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Hash function name not in the registry.
    #[error("unknown hash function {0:?}")]
    UnknownHashFunction(String),
    /// `custom` selected without supplying a hasher.
    #[error("hash function \"custom\" selected but no custom hasher was supplied")]
    MissingCustomHasher,
    /// Slot count of zero, or too large to index with `u32`.
    #[error("invalid hash range {0}: must be in 1..={max}", max = u32::MAX)]
    InvalidHashRange(usize),
    /// Weight below one.
    #[error("invalid weight {weight} for node {node}: must be at least 1")]
    InvalidWeight { node: NodeId, weight: u32 },
    /// Same identifier appears twice in one membership list.
    #[error("duplicate node identifier {0}")]
    DuplicateNode(NodeId),
    /// More members than slot entries can address.
    #[error("too many nodes: {0}")]
    TooManyNodes(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::UnknownHashFunction("md4".into()).into();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "configuration error: unknown hash function \"md4\""
        );
    }

    #[test]
    fn test_empty_ring_is_not_config() {
        assert!(!Error::EmptyRing.is_config());
    }

    #[test]
    fn test_invalid_weight_message() {
        let err = ConfigError::InvalidWeight {
            node: NodeId::from("cache-1"),
            weight: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid weight 0 for node cache-1: must be at least 1"
        );
    }
}
