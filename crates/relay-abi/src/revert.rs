//! Failure payloads
//!
//! A [`Revert`] carries the exact bytes the failing unit produced. Layers that
//! only pass a failure along never look inside it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Opaque failure payload of an aborted call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Revert(Vec<u8>);

impl Revert {
    /// Wrap raw payload bytes as-is
    #[inline]
    #[must_use]
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Encode a structured error as JSON
    #[must_use]
    pub fn from_error<E: Serialize + Display>(error: &E) -> Self {
        match serde_json::to_vec(error) {
            Ok(bytes) => Self(bytes),
            Err(_) => Self(error.to_string().into_bytes()),
        }
    }

    /// Decode the payload as a structured error
    ///
    /// Returns `None` when the payload was not produced by
    /// [`Revert::from_error`] with a compatible type.
    #[must_use]
    pub fn decode<E: DeserializeOwned>(&self) -> Option<E> {
        serde_json::from_slice(&self.0).ok()
    }

    /// Payload bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the payload bytes
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// `reverted: <text>` for UTF-8 payloads, `reverted: 0x<hex>` otherwise
impl Display for Revert {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(text) => write!(f, "reverted: {text}"),
            Err(_) => write!(f, "reverted: 0x{}", hex::encode(&self.0)),
        }
    }
}

impl std::error::Error for Revert {}
