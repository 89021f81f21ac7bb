//! The resolved configuration snapshot
//!
//! Built once at startup and never mutated afterwards. Share it behind an
//! `Arc`; any number of threads may read it without locking.

use super::ids::{ChainId, Symbol, VenueName};
use super::pair::PairSpec;
use super::secret::{self, EnvSource};
use super::{validate, RawConfig};
use crate::tokens::{ChainAddress, ChainFamily, Token};
use crate::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Gas parameters for EVM transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GasSettings {
    pub gas_limit: u64,
    /// `None` lets the chain client estimate the priority fee
    pub max_priority_fee: Option<u64>,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            gas_limit: super::DEFAULT_GAS_LIMIT,
            max_priority_fee: None,
        }
    }
}

/// Fully resolved configuration of one chain
///
/// The private key is never serialized and the RPC URL (which usually embeds a
/// provider API key) is redacted when serialized.
#[derive(Debug, Serialize)]
pub struct ChainConfig {
    pub chain: ChainId,
    pub family: ChainFamily,
    pub wallet_address: ChainAddress,
    #[serde(skip)]
    pub(crate) private_key: SecretString,
    #[serde(serialize_with = "redacted")]
    pub(crate) rpc_url: SecretString,
    pub gas_settings: GasSettings,
    pub tokens: BTreeMap<Symbol, Token>,
}

impl ChainConfig {
    pub fn private_key(&self) -> &SecretString {
        &self.private_key
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc_url.expose_secret()
    }

    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.tokens.get(symbol)
    }

    /// Reverse lookup by contract address or mint
    pub fn token_by_address(&self, address: &str) -> Option<&Token> {
        self.tokens.values().find(|t| t.address.matches(address))
    }
}

fn redacted<S: Serializer>(_: &SecretString, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}

/// Venue settings as seen from one chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VenueSettings {
    /// Slippage tolerance in basis points (0..=10000)
    pub slippage_bps: Option<u16>,
    /// Pool fee tiers (Uniswap-style, in hundredths of a bip)
    pub fee_tiers: Vec<u32>,
    pub quote_api_url: Option<Url>,
    pub swap_api_url: Option<Url>,
}

/// A venue's listing on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueChain {
    pub venue: VenueName,
    pub chain: ChainId,
    pub supported_pairs: Vec<PairSpec>,
    pub settings: VenueSettings,
}

impl VenueChain {
    /// Exact, order-sensitive membership
    pub fn supports(&self, pair: &PairSpec) -> bool {
        self.supported_pairs.contains(pair)
    }
}

#[derive(Debug)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    pub chat_id: i64,
}

/// Immutable, validated configuration
#[derive(Debug)]
pub struct ConfigSnapshot {
    pub(crate) environments: BTreeMap<String, Vec<ChainId>>,
    pub(crate) chains: BTreeMap<ChainId, ChainConfig>,
    pub(crate) venues: BTreeMap<ChainId, BTreeMap<VenueName, VenueChain>>,
    pub(crate) telegram: Option<TelegramConfig>,
    pub(crate) portfolio_chains: Option<Vec<ChainId>>,
}

impl ConfigSnapshot {
    /// Load, resolve and validate a configuration file
    pub fn load(path: impl AsRef<Path>, env: &dyn EnvSource) -> Result<Self> {
        let raw = RawConfig::load(path)?;
        Self::build(&raw, env)
    }

    /// Resolve and validate a YAML document
    pub fn from_yaml_str(content: &str, env: &dyn EnvSource) -> Result<Self> {
        let raw = RawConfig::from_yaml_str(content)?;
        Self::build(&raw, env)
    }

    /// Resolve secrets, then validate
    pub fn build(raw: &RawConfig, env: &dyn EnvSource) -> Result<Self> {
        let secrets = secret::resolve_all(raw, env)?;
        let snapshot = validate::validate(raw, secrets)?;

        tracing::info!(
            environments = snapshot.environments.len(),
            chains = snapshot.chains.len(),
            venues = snapshot.venues.values().map(BTreeMap::len).sum::<usize>(),
            "Configuration loaded"
        );
        Ok(snapshot)
    }

    /// Chains listed by a network environment, in configured order
    pub fn environment(&self, name: &str) -> Option<&[ChainId]> {
        self.environments.get(name).map(Vec::as_slice)
    }

    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    pub fn chain(&self, chain: &str) -> Option<&ChainConfig> {
        self.chains.get(chain)
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = &ChainId> {
        self.chains.keys()
    }

    /// Venues listed on a chain, by name
    pub fn venues_on(&self, chain: &str) -> impl Iterator<Item = &VenueChain> {
        self.venues.get(chain).into_iter().flat_map(BTreeMap::values)
    }

    pub fn venue(&self, chain: &str, venue: &str) -> Option<&VenueChain> {
        self.venues.get(chain).and_then(|venues| venues.get(venue))
    }

    pub fn telegram(&self) -> Option<&TelegramConfig> {
        self.telegram.as_ref()
    }

    /// Chains named by the `portfolio` section, if it names any
    pub fn portfolio_chains(&self) -> Option<&[ChainId]> {
        self.portfolio_chains.as_deref()
    }
}
