//! Identifier types for ledger accounts, assets, and applications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BondSwapError;

/// Length of an account public key in bytes.
pub const ADDRESS_LEN: usize = 32;

/// A ledger account address (the account's 32-byte public key).
///
/// The all-zero address is the ledger's "unset" value for optional
/// address fields such as `rekey_to` and `close_remainder_to`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The zero address.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw public key bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = BondSwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| BondSwapError::InvalidAddress(format!("{s:?}: {e}")))?;
        let bytes: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            BondSwapError::InvalidAddress(format!(
                "{s:?}: expected {ADDRESS_LEN} bytes, got {}",
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = BondSwapError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

/// Identifier of a fungible ledger asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AssetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of an on-ledger application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ApplicationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::new([7u8; ADDRESS_LEN]).is_zero());
    }

    #[test]
    fn test_address_parse() {
        let text = "ab".repeat(ADDRESS_LEN);
        let address: Address = text.parse().unwrap();
        assert_eq!(address, Address::new([0xab; ADDRESS_LEN]));
        assert_eq!(address.to_string(), text);

        let prefixed: Address = format!("0x{text}").parse().unwrap();
        assert_eq!(prefixed, address);
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!(matches!(
            "abcd".parse::<Address>(),
            Err(BondSwapError::InvalidAddress(_))
        ));
        assert!("zz".repeat(ADDRESS_LEN).parse::<Address>().is_err());
        assert!("".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_json() {
        let address = Address::new([1u8; ADDRESS_LEN]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(ADDRESS_LEN)));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<Address>("\"0102\"").is_err());
    }

    #[test]
    fn test_ids_are_transparent() {
        assert_eq!(serde_json::to_string(&AssetId(42)).unwrap(), "42");
        assert_eq!(
            serde_json::from_str::<ApplicationId>("7").unwrap(),
            ApplicationId(7)
        );
    }
}
