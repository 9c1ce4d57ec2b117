use relay_abi::{Address, Revert};
use serde::{Deserialize, Serialize};

/// Failures raised by the host itself rather than by a unit
///
/// They travel to the caller as [`Revert`] payloads like any other failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum HostError {
    /// Delegated execution targeted an account without code
    #[error("no code at {0}")]
    NoCode(Address),

    /// Nesting limit reached
    #[error("call depth {depth} exceeds limit {limit}")]
    CallDepthExceeded {
        /// Depth of the rejected frame
        depth: usize,
        /// Configured limit
        limit: usize,
    },

    /// Value transfer larger than the sender's balance
    #[error("insufficient balance: {available} available, {required} required")]
    InsufficientBalance {
        /// Sender balance
        available: u128,
        /// Requested transfer
        required: u128,
    },
}

impl From<HostError> for Revert {
    fn from(value: HostError) -> Self {
        Revert::from_error(&value)
    }
}

/// Event log failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// A record's chain link or digest does not match
    #[error("event log integrity violation at record {index}")]
    IntegrityViolation {
        /// Position of the first bad record
        index: usize,
    },
}

/// Host configuration failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid TOML for [`crate::HostConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but are unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}
