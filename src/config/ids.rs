//! Validated identifiers for chains, venues and token symbols
//!
//! Map keys in the configuration are plain strings; they are turned into these
//! types once, during validation, so lookups never have to re-check them.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Separator between the two symbols of a pair string (`WETH_USDC`).
pub const PAIR_SEPARATOR: char = '_';

fn is_valid_key(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    name.bytes()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == b'_')
}

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                if is_valid_key(s) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(format!(
                        "invalid {} {:?}: use lowercase letters, digits and '_'",
                        $what, s
                    ))
                }
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

key_type!(
    /// Chain identifier, e.g. `ethereum`, `base`, `solana`
    ChainId,
    "chain id"
);

key_type!(
    /// Trading venue name, e.g. `uniswap_v3`, `jupiter`
    VenueName,
    "venue name"
);

/// Token symbol as written in the configuration (`WETH`, `USDC.e`)
///
/// Case is preserved and significant. Symbols may not contain the pair separator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("token symbol is empty".to_string());
        }
        if s.contains(PAIR_SEPARATOR) {
            return Err(format!(
                "token symbol {:?} contains the pair separator '{}'",
                s, PAIR_SEPARATOR
            ));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("token symbol {:?} contains whitespace", s));
        }
        Ok(Self(s.to_string()))
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
