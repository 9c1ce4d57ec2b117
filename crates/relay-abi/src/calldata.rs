//! Call data encoding
//!
//! A call is a 4-byte [`Selector`] followed by the JSON encoding of the
//! argument tuple. The selector is the first four bytes of the SHA-256 digest
//! of the operation signature, e.g. `"upgradeTo(address)"`.

use crate::AbiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};

/// Operation identifier at the head of every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector([u8; 4]);

impl Selector {
    /// Byte width of a selector
    pub const LEN: usize = 4;

    /// Create a selector from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Selector of an operation signature
    #[must_use]
    pub fn from_signature(signature: &str) -> Self {
        let digest = Sha256::digest(signature.as_bytes());
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&digest[..4]);
        Self(arr)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Selector at the head of `input`, if it is long enough
    #[must_use]
    pub fn of(input: &[u8]) -> Option<Self> {
        let head = input.get(..Self::LEN)?;
        let mut arr = [0u8; 4];
        arr.copy_from_slice(head);
        Some(Self(arr))
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Encode a call to `signature` with `args`
///
/// `args` is normally a tuple; `()` encodes a call without arguments.
///
/// # Errors
/// Returns error if the arguments cannot be serialized
pub fn encode_call<A: Serialize + ?Sized>(signature: &str, args: &A) -> Result<Vec<u8>, AbiError> {
    let selector = Selector::from_signature(signature);
    let body = serde_json::to_vec(args)?;
    let mut out = Vec::with_capacity(Selector::LEN + body.len());
    out.extend_from_slice(selector.as_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Split `input` into its selector and argument bytes
///
/// # Errors
/// Returns error if `input` is shorter than a selector
pub fn split(input: &[u8]) -> Result<(Selector, &[u8]), AbiError> {
    let selector = Selector::of(input).ok_or(AbiError::MissingSelector(input.len()))?;
    Ok((selector, &input[Selector::LEN..]))
}

/// Decode the argument tuple following the selector
///
/// # Errors
/// Returns error if the selector is missing or the arguments do not decode
/// as `A`
pub fn decode_args<A: DeserializeOwned>(input: &[u8]) -> Result<A, AbiError> {
    let (_, body) = split(input)?;
    Ok(serde_json::from_slice(body)?)
}

/// Encode a return value
///
/// # Errors
/// Returns error if the value cannot be serialized
pub fn encode_return<R: Serialize + ?Sized>(value: &R) -> Result<Vec<u8>, AbiError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a return value produced by [`encode_return`]
///
/// # Errors
/// Returns error if the bytes do not decode as `R`
pub fn decode_return<R: DeserializeOwned>(output: &[u8]) -> Result<R, AbiError> {
    Ok(serde_json::from_slice(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;

    #[test]
    fn selector_is_stable_and_distinct() {
        let a = Selector::from_signature("upgradeTo(address)");
        let b = Selector::from_signature("changeAdmin(address)");
        assert_eq!(a, Selector::from_signature("upgradeTo(address)"));
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 10);
    }

    #[test]
    fn encoded_call_starts_with_selector() {
        let target = Address::from_label("backend");
        let input = encode_call("upgradeTo(address)", &(target,)).unwrap();
        assert_eq!(
            Selector::of(&input),
            Some(Selector::from_signature("upgradeTo(address)"))
        );
        let (decoded,): (Address,) = decode_args(&input).unwrap();
        assert_eq!(decoded, target);
    }

    #[test]
    fn call_without_arguments() {
        let input = encode_call("value()", &()).unwrap();
        let () = decode_args(&input).unwrap();
    }

    #[test]
    fn short_input_has_no_selector() {
        assert_eq!(Selector::of(&[1, 2, 3]), None);
        assert!(matches!(split(&[1, 2]), Err(AbiError::MissingSelector(2))));
    }

    #[test]
    fn mistyped_arguments_are_rejected() {
        let input = encode_call("setValue(uint128)", &("not a number",)).unwrap();
        let result: Result<(u128,), _> = decode_args(&input);
        assert!(matches!(result, Err(AbiError::Arguments(_))));
    }

    #[test]
    fn return_values_round_trip_through_json() {
        let out = encode_return(&42u128).unwrap();
        assert_eq!(decode_return::<u128>(&out).unwrap(), 42);
    }
}
