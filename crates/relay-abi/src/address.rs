//! Account identities
//!
//! Provides [`Address`], the 20-byte identity of every account known to the
//! host: operators, frontends, backends and admin controllers alike.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 20-byte account identity
///
/// [`Address::ZERO`] is the empty identity. It never owns code and is never a
/// valid admin, owner or backend handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The empty identity
    pub const ZERO: Self = Self([0; 20]);

    /// Byte width of an address
    pub const LEN: usize = 20;

    /// Create an address from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Create address from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AbiError> {
        if bytes.len() != Self::LEN {
            return Err(AbiError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Address of the account created by `deployer` at `nonce`
    ///
    /// Last 20 bytes of `BLAKE3(deployer || nonce_le)`.
    #[must_use]
    pub fn derive(deployer: &Address, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&deployer.0);
        hasher.update(&nonce.to_le_bytes());
        Self::tail(hasher.finalize().as_bytes())
    }

    /// Stable identity for an externally-owned account named `label`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::tail(blake3::hash(label.as_bytes()).as_bytes())
    }

    fn tail(digest: &[u8; 32]) -> Self {
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&digest[12..]);
        Self(arr)
    }

    /// Check if this is the empty identity
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }

    /// Short string representation (first 8 hex chars)
    #[must_use]
    pub fn short(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AddressVisitor;

        impl<'de> serde::de::Visitor<'de> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 20-byte address as 0x-prefixed hex or byte array")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Address::from_slice(value).map_err(serde::de::Error::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(AddressVisitor)
        } else {
            deserializer.deserialize_bytes(AddressVisitor)
        }
    }
}

/// Errors raised while decoding identities and call data
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// Invalid byte length
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Observed length
        actual: usize,
    },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Input shorter than a selector
    #[error("call data too short for a selector: {0} bytes")]
    MissingSelector(usize),

    /// Argument encoding or decoding error
    #[error("argument codec error: {0}")]
    Arguments(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default_and_empty() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(Address::default(), Address::ZERO);
        assert!(!Address::from_label("operator").is_zero());
    }

    #[test]
    fn derive_is_deterministic_per_nonce() {
        let deployer = Address::from_label("deployer");
        assert_eq!(Address::derive(&deployer, 0), Address::derive(&deployer, 0));
        assert_ne!(Address::derive(&deployer, 0), Address::derive(&deployer, 1));
    }

    #[test]
    fn display_and_parse() {
        let addr = Address::from_label("alice");
        let s = addr.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 42);
        assert_eq!(s.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let result = "0xdeadbeef".parse::<Address>();
        assert!(matches!(
            result,
            Err(AbiError::InvalidLength { expected: 20, actual: 4 })
        ));
    }

    #[test]
    fn serde_json_uses_hex_string() {
        let addr = Address::from_label("bob");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let decoded: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn short_is_prefix_of_display() {
        let addr = Address::from_label("carol");
        assert!(addr.to_string().starts_with(&addr.short()));
    }
}
