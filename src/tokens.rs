//! Resolved token metadata
//!
//! Tokens are keyed by `(chain, symbol)`. Addresses follow the grammar of the
//! chain's family: 20-byte `0x` hex for EVM chains, 32-byte base58 for Solana.

use crate::config::{ChainId, Symbol};
use crate::{Error, Result};
use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::{Address, U256};
use base58::FromBase58;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a Solana public key in bytes
const SOLANA_PUBKEY_LEN: usize = 32;

/// Longest base58 encoding of a 32-byte key
const SOLANA_ADDRESS_MAX_LEN: usize = 44;

/// Address grammar family of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainFamily {
    Evm,
    Solana,
}

impl ChainFamily {
    /// Chains whose id starts with `solana` (`solana`, `solana_devnet`) are Solana family
    pub fn of(chain: &ChainId) -> Self {
        if chain.as_str().starts_with("solana") {
            ChainFamily::Solana
        } else {
            ChainFamily::Evm
        }
    }

    /// Parse an address according to this family's grammar
    pub fn parse_address(&self, raw: &str) -> std::result::Result<ChainAddress, String> {
        match self {
            ChainFamily::Evm => {
                let hex = raw
                    .strip_prefix("0x")
                    .ok_or_else(|| format!("EVM address {:?} must start with 0x", raw))?;
                if hex.len() != 40 {
                    return Err(format!(
                        "EVM address {:?} must be 20 bytes (40 hex digits)",
                        raw
                    ));
                }
                Address::from_str(raw)
                    .map(ChainAddress::Evm)
                    .map_err(|e| format!("invalid EVM address {:?}: {}", raw, e))
            }
            ChainFamily::Solana => {
                // base58 0.2 panics on long runs of leading '1's
                if raw.len() > SOLANA_ADDRESS_MAX_LEN {
                    return Err(format!(
                        "Solana address is {} characters, at most {} allowed",
                        raw.len(),
                        SOLANA_ADDRESS_MAX_LEN
                    ));
                }
                let bytes = raw
                    .from_base58()
                    .map_err(|e| format!("invalid base58 address {:?}: {:?}", raw, e))?;
                if bytes.len() != SOLANA_PUBKEY_LEN {
                    return Err(format!(
                        "Solana address {:?} decodes to {} bytes, expected {}",
                        raw,
                        bytes.len(),
                        SOLANA_PUBKEY_LEN
                    ));
                }
                Ok(ChainAddress::Solana(raw.to_string()))
            }
        }
    }
}

/// A validated on-chain address (token contract, mint, or wallet)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainAddress {
    Evm(Address),
    /// Base58 text, already checked to decode to 32 bytes
    Solana(String),
}

impl ChainAddress {
    pub fn family(&self) -> ChainFamily {
        match self {
            ChainAddress::Evm(_) => ChainFamily::Evm,
            ChainAddress::Solana(_) => ChainFamily::Solana,
        }
    }

    /// The EVM address, if this is one
    pub fn as_evm(&self) -> Option<Address> {
        match self {
            ChainAddress::Evm(address) => Some(*address),
            ChainAddress::Solana(_) => None,
        }
    }

    /// Compare against user input.
    ///
    /// EVM addresses compare case-insensitively; base58 is case-sensitive.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            ChainAddress::Evm(address) => Address::from_str(raw)
                .map(|other| other == *address)
                .unwrap_or(false),
            ChainAddress::Solana(address) => address == raw,
        }
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainAddress::Evm(address) => f.write_str(&address.to_checksum(None)),
            ChainAddress::Solana(address) => f.write_str(address),
        }
    }
}

impl Serialize for ChainAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token symbol (e.g., "USDC", "WETH")
    pub symbol: Symbol,
    /// Contract address or mint
    pub address: ChainAddress,
    /// Number of decimals
    pub decimals: u8,
    /// Whether this is the chain's native asset
    pub is_native: bool,
    /// Chain the token lives on
    pub chain: ChainId,
}

impl Token {
    /// Convert a human amount ("1.5") into base units (wei, lamports).
    ///
    /// Negative amounts are rejected.
    pub fn to_base_units(&self, amount: &str) -> Result<U256> {
        let parsed = parse_units(amount, self.decimals).map_err(|e| {
            Error::InvalidArgument(format!("invalid {} amount {:?}: {}", self.symbol, amount, e))
        })?;
        match parsed {
            ParseUnits::U256(value) => Ok(value),
            ParseUnits::I256(value) if !value.is_negative() => Ok(value.into_raw()),
            ParseUnits::I256(_) => Err(Error::InvalidArgument(format!(
                "{} amount {:?} is negative",
                self.symbol, amount
            ))),
        }
    }

    /// Convert base units back into a human amount
    pub fn from_base_units(&self, amount: U256) -> Result<String> {
        format_units(amount, self.decimals).map_err(|e| {
            Error::InvalidArgument(format!("cannot format {} amount: {}", self.symbol, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(id: &str) -> ChainId {
        id.parse().unwrap()
    }

    fn token(decimals: u8) -> Token {
        Token {
            symbol: "USDC".parse().unwrap(),
            address: ChainFamily::Evm
                .parse_address("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913")
                .unwrap(),
            decimals,
            is_native: false,
            chain: chain("base"),
        }
    }

    #[test]
    fn test_family_from_chain_id() {
        assert_eq!(ChainFamily::of(&chain("solana")), ChainFamily::Solana);
        assert_eq!(ChainFamily::of(&chain("solana_devnet")), ChainFamily::Solana);
        assert_eq!(ChainFamily::of(&chain("base")), ChainFamily::Evm);
        assert_eq!(ChainFamily::of(&chain("ethereum_sepolia")), ChainFamily::Evm);
    }

    #[test]
    fn test_evm_address_grammar() {
        let evm = ChainFamily::Evm;
        assert!(evm
            .parse_address("0x4200000000000000000000000000000000000006")
            .is_ok());
        // no prefix
        assert!(evm
            .parse_address("4200000000000000000000000000000000000006")
            .is_err());
        // 19 bytes
        assert!(evm
            .parse_address("0x42000000000000000000000000000000000000")
            .is_err());
        assert!(evm
            .parse_address("0xZZ00000000000000000000000000000000000006")
            .is_err());
    }

    #[test]
    fn test_solana_address_grammar() {
        let sol = ChainFamily::Solana;
        assert!(sol
            .parse_address("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")
            .is_ok());
        // '0' is not in the base58 alphabet
        assert!(sol
            .parse_address("0PjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")
            .is_err());
        // valid base58, wrong length
        assert!(sol.parse_address("abc").is_err());
        // an EVM address is not a Solana address
        assert!(sol
            .parse_address("0x4200000000000000000000000000000000000006")
            .is_err());
    }

    #[test]
    fn test_solana_overlong_address_is_an_error() {
        let sol = ChainFamily::Solana;
        let err = sol.parse_address(&"1".repeat(133)).unwrap_err();
        assert!(err.contains("at most 44"));
        assert!(sol.parse_address(&"1".repeat(45)).is_err());
    }

    #[test]
    fn test_evm_display_is_checksummed() {
        let address = ChainFamily::Evm
            .parse_address("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")
            .unwrap();
        assert_eq!(
            address.to_string(),
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
        );
    }

    #[test]
    fn test_evm_matches_ignores_case() {
        let address = ChainFamily::Evm
            .parse_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")
            .unwrap();
        assert!(address.matches("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"));
        assert!(!address.matches("0x4200000000000000000000000000000000000006"));
        assert!(!address.matches("garbage"));
    }

    #[test]
    fn test_base_unit_conversion() {
        let usdc = token(6);
        assert_eq!(usdc.to_base_units("100").unwrap(), U256::from(100_000_000u64));
        assert_eq!(usdc.to_base_units("1.5").unwrap(), U256::from(1_500_000u64));
        assert_eq!(
            usdc.from_base_units(U256::from(2_500_000u64)).unwrap(),
            "2.500000"
        );
    }

    #[test]
    fn test_invalid_amount() {
        let usdc = token(6);
        assert!(matches!(
            usdc.to_base_units("lots"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let usdc = token(6);
        for amount in ["-1", "-0.5"] {
            match usdc.to_base_units(amount) {
                Err(Error::InvalidArgument(msg)) => assert!(msg.contains("negative")),
                other => panic!("unexpected result for {amount}: {other:?}"),
            }
        }
        assert_eq!(usdc.to_base_units("0").unwrap(), U256::ZERO);
    }
}
