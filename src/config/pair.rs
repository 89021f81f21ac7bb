//! Trading pair strings (`BASE_QUOTE`)

use super::ids::{Symbol, PAIR_SEPARATOR};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An ordered pair of token symbols.
///
/// Order is significant: `WETH_USDC` and `USDC_WETH` are different pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairSpec {
    pub base: Symbol,
    pub quote: Symbol,
}

impl PairSpec {
    pub fn new(base: Symbol, quote: Symbol) -> Self {
        Self { base, quote }
    }

    /// The same two tokens in the opposite order
    pub fn reversed(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }
}

impl FromStr for PairSpec {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let malformed = || Error::MalformedPair(raw.to_string());

        let mut parts = raw.split(PAIR_SEPARATOR);
        let (Some(base), Some(quote), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let base = base.parse::<Symbol>().map_err(|_| malformed())?;
        let quote = quote.parse::<Symbol>().map_err(|_| malformed())?;
        Ok(Self { base, quote })
    }
}

impl fmt::Display for PairSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, PAIR_SEPARATOR, self.quote)
    }
}

impl Serialize for PairSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
