//! Account and token identifiers.
//!
//! Both identifiers are 20-byte values rendered as `0x`-prefixed hex,
//! matching EVM-style wallet and token-contract addresses. They serialize
//! as hex strings so configuration files and event logs stay
//! human-readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an identifier from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address {input:?}: {reason}")]
pub struct ParseAddressError {
    /// The rejected input
    pub input: String,
    /// Why it was rejected
    pub reason: &'static str,
}

fn parse_bytes20(s: &str) -> Result<[u8; 20], ParseAddressError> {
    let hex_part = s.strip_prefix("0x").unwrap_or(s);
    let raw = hex::decode(hex_part).map_err(|_| ParseAddressError {
        input: s.to_string(),
        reason: "not valid hex",
    })?;
    let bytes: [u8; 20] = raw.try_into().map_err(|_| ParseAddressError {
        input: s.to_string(),
        reason: "expected 20 bytes",
    })?;
    Ok(bytes)
}

fn fmt_bytes20(bytes: &[u8; 20], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{}", hex::encode(bytes))
}

/// Account identifier for subscription owners, payout wallets, and the
/// ledger admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero sentinel address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bytes20(&self.0, f)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address(parse_bytes20(s)?))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Token contract identifier for payment and reward currencies.
///
/// [`TokenAddress::NATIVE`] (all zero) denotes the chain-native currency
/// rather than a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TokenAddress(pub [u8; 20]);

impl TokenAddress {
    /// Sentinel for the chain-native currency.
    pub const NATIVE: TokenAddress = TokenAddress([0u8; 20]);

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// True when this is the native-currency sentinel.
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "native")
        } else {
            fmt_bytes20(&self.0, f)
        }
    }
}

impl FromStr for TokenAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Self::NATIVE);
        }
        Ok(TokenAddress(parse_bytes20(s)?))
    }
}

impl Serialize for TokenAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_round_trips_through_display() {
        let addr = Address::from_bytes([0xab; 20]);
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_rejects_short_input() {
        let err = "0xabcd".parse::<Address>().unwrap_err();
        assert_eq!(err.reason, "expected 20 bytes");
    }

    #[test]
    fn native_token_renders_as_keyword() {
        assert_eq!(TokenAddress::NATIVE.to_string(), "native");
        assert_eq!("native".parse::<TokenAddress>().unwrap(), TokenAddress::NATIVE);
        assert!(TokenAddress::NATIVE.is_native());
        assert!(!TokenAddress::from_bytes([1u8; 20]).is_native());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let addr = Address::from_bytes([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
