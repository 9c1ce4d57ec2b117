//! Storage addressing
//!
//! Every account owns a flat map from [`SlotKey`] to [`StorageValue`].
//! Declared fields occupy small sequential keys ([`SlotKey::field`]); reserved
//! metadata lives at hash-derived keys ([`SlotKey::reserved`]) that no
//! sequential index can reach.

use crate::Address;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};

/// A 32-byte storage key, ordered as a big-endian integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotKey([u8; 32]);

impl SlotKey {
    /// Create a key from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Key of the `index`-th declared field
    #[must_use]
    pub fn field(index: u64) -> Self {
        let mut arr = [0u8; 32];
        arr[24..].copy_from_slice(&index.to_be_bytes());
        Self(arr)
    }

    /// Reserved key for `tag`: `SHA-256(tag) - 1`
    ///
    /// The subtraction removes the known-preimage property of the raw digest.
    #[must_use]
    pub fn reserved(tag: &str) -> Self {
        let digest: [u8; 32] = Sha256::digest(tag.as_bytes()).into();
        Self(wrapping_decrement(digest))
    }

    /// Sequential index if this key is reachable by [`SlotKey::field`]
    #[must_use]
    pub fn field_index(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(tail))
    }
}

fn wrapping_decrement(mut bytes: [u8; 32]) -> [u8; 32] {
    for byte in bytes.iter_mut().rev() {
        let (next, borrow) = byte.overflowing_sub(1);
        *byte = next;
        if !borrow {
            break;
        }
    }
    bytes
}

impl Display for SlotKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.field_index() {
            Some(index) => write!(f, "field[{index}]"),
            None => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

/// Type of a declared storage field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Unsigned integer
    Uint,
    /// Account identity
    Address,
    /// Flag
    Bool,
    /// UTF-8 text
    Text,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Uint => "uint128",
            FieldType::Address => "address",
            FieldType::Bool => "bool",
            FieldType::Text => "string",
        };
        f.write_str(name)
    }
}

/// A typed value held in one storage slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageValue {
    /// Unsigned integer
    Uint(u128),
    /// Account identity
    Address(Address),
    /// Flag
    Bool(bool),
    /// UTF-8 text
    Text(String),
}

impl StorageValue {
    /// Type tag of this value
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            StorageValue::Uint(_) => FieldType::Uint,
            StorageValue::Address(_) => FieldType::Address,
            StorageValue::Bool(_) => FieldType::Bool,
            StorageValue::Text(_) => FieldType::Text,
        }
    }

    /// Integer payload, if any
    #[must_use]
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            StorageValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Address payload, if any
    #[must_use]
    pub fn as_address(&self) -> Option<Address> {
        match self {
            StorageValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Flag payload, if any
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StorageValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text payload, if any
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StorageValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<u128> for StorageValue {
    fn from(value: u128) -> Self {
        StorageValue::Uint(value)
    }
}

impl From<Address> for StorageValue {
    fn from(value: Address) -> Self {
        StorageValue::Address(value)
    }
}

impl From<bool> for StorageValue {
    fn from(value: bool) -> Self {
        StorageValue::Bool(value)
    }
}

impl From<String> for StorageValue {
    fn from(value: String) -> Self {
        StorageValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn field_keys_are_sequential() {
        assert_eq!(SlotKey::field(0).field_index(), Some(0));
        assert_eq!(SlotKey::field(7).field_index(), Some(7));
        assert!(SlotKey::field(1) < SlotKey::field(2));
        assert_eq!(SlotKey::field(3).to_string(), "field[3]");
    }

    #[test]
    fn reserved_key_is_digest_minus_one() {
        let cases = [
            (
                "relay.proxy.admin",
                "f62354d4acb34c6bf161be66a3f46f172dc7bab70132da979015cdbde5e95574",
            ),
            (
                "relay.proxy.implementation",
                "16c2cfe219dc8f9944282ea70c394fb950b3adfbd53befec21250c7c5f3e55db",
            ),
        ];
        for (tag, expected) in cases {
            let key = SlotKey::reserved(tag);
            assert_eq!(hex::encode(key.as_bytes()), expected, "{tag}");

            let digest: [u8; 32] = Sha256::digest(tag.as_bytes()).into();
            assert_ne!(key.as_bytes(), &digest);
        }
    }

    #[test]
    fn decrement_borrows_across_bytes() {
        let mut bytes = [0u8; 32];
        bytes[30] = 1;
        let out = wrapping_decrement(bytes);
        assert_eq!(out[30], 0);
        assert_eq!(out[31], 0xff);
    }

    #[test]
    fn reserved_keys_are_not_field_keys() {
        for tag in ["relay.proxy.implementation", "relay.proxy.admin"] {
            assert_eq!(SlotKey::reserved(tag).field_index(), None);
        }
    }

    #[test]
    fn storage_value_accessors() {
        let addr = Address::from_label("owner");
        assert_eq!(StorageValue::from(42u128).as_uint(), Some(42));
        assert_eq!(StorageValue::from(addr).as_address(), Some(addr));
        assert_eq!(StorageValue::from(true).as_bool(), Some(true));
        assert_eq!(StorageValue::from("hi".to_string()).as_text(), Some("hi"));
        assert_eq!(StorageValue::Bool(true).as_uint(), None);
        assert_eq!(StorageValue::Text(String::new()).field_type(), FieldType::Text);
    }

    proptest! {
        #[test]
        fn no_field_index_reaches_a_reserved_key(index in any::<u64>()) {
            let field = SlotKey::field(index);
            prop_assert_ne!(field, SlotKey::reserved("relay.proxy.implementation"));
            prop_assert_ne!(field, SlotKey::reserved("relay.proxy.admin"));
        }
    }
}
