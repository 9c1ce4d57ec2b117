//! Failures raised by the bundled backends

use relay_abi::Revert;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum BackendError {
    /// `initialize` already ran against this storage
    #[error("already initialized")]
    AlreadyInitialized,

    /// Caller is not the recorded owner
    #[error("caller is not the owner")]
    NotOwner,

    /// A mutating operation ran before `initialize`
    #[error("not initialized")]
    NotInitialized,

    #[error("malformed call data")]
    MalformedCall,

    #[error("unknown selector")]
    UnknownSelector,
}

impl From<BackendError> for Revert {
    fn from(value: BackendError) -> Self {
        Revert::from_error(&value)
    }
}
