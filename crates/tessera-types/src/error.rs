//! Error types for chain configuration

use thiserror::Error;

/// Invalid chain configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A bound that must be positive was zero
    #[error("{0} must be greater than zero")]
    ZeroBound(&'static str),

    /// A value outside its permitted range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
