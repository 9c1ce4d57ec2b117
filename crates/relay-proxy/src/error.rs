//! Error types of the dispatch frontend and its administration
//!
//! Every error here travels to callers as a JSON-encoded [`Revert`] payload.
//! Failures that originate in a backend are never converted into these types;
//! they pass through as the backend produced them.

use crate::layout::LayoutError;
use relay_abi::{AbiError, Revert};
use serde::{Deserialize, Serialize};

/// Failures raised by the dispatch frontend itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ProxyError {
    /// Caller is not the current admin
    #[error("caller is not the admin")]
    Unauthorized,

    /// Backend handle is empty or holds no code
    #[error("backend must be a deployed code unit")]
    InvalidBackend,

    /// Admin handle is the empty identity
    #[error("admin must not be the zero address")]
    InvalidAdmin,

    /// Intercepted call or constructor arguments failed to decode
    #[error("malformed call data")]
    MalformedCall,
}

impl From<ProxyError> for Revert {
    fn from(value: ProxyError) -> Self {
        Revert::from_error(&value)
    }
}

/// Failures raised by the admin controller itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AdminError {
    /// Caller is not the controller's owner
    #[error("caller is not the owner")]
    Unauthorized,

    /// New owner is the empty identity
    #[error("owner must not be the zero address")]
    InvalidOwner,

    /// Arguments failed to decode
    #[error("malformed call data")]
    MalformedCall,

    /// No controller operation has this selector
    #[error("unknown selector")]
    UnknownSelector,
}

impl From<AdminError> for Revert {
    fn from(value: AdminError) -> Self {
        Revert::from_error(&value)
    }
}

/// Failures of the off-chain operator helper
#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    /// Proposed backend would reinterpret existing fields
    #[error("incompatible storage layout: {0}")]
    Layout(#[from] LayoutError),

    /// Call data could not be built
    #[error("encoding failed: {0}")]
    Abi(#[from] AbiError),

    /// The transaction was rejected on the host
    #[error("transaction failed: {0}")]
    Reverted(#[from] Revert),
}
