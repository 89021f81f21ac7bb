//! Trading configuration
//!
//! The configuration is a YAML document with the sections `telegram`,
//! `network_environments`, `trading_venues`, `portfolio` and `chain_config`.
//! Loading happens in three steps:
//!
//! 1. [`RawConfig`] mirrors the YAML with string keys and unresolved secrets
//! 2. [`secret`] resolves every `fromEnvVar` reference
//! 3. [`validate`] checks the tree and produces an immutable [`ConfigSnapshot`]
//!
//! [`ActiveScope`] then narrows the snapshot to one network environment.

pub mod environment;
pub mod ids;
pub mod pair;
pub mod secret;
pub mod snapshot;
pub mod validate;

use crate::{Error, Result};
use serde::de::{self, DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

pub use environment::ActiveScope;
pub use ids::{ChainId, Symbol, VenueName};
pub use pair::PairSpec;
pub use secret::{EnvSource, MapEnv, ProcessEnv, SecretRef};
pub use snapshot::{ChainConfig, ConfigSnapshot, GasSettings, TelegramConfig, VenueChain, VenueSettings};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

/// Gas limit used when a chain does not configure one
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

/// Mapping that keeps entries in document order, duplicates included.
///
/// Duplicate keys are a validation error rather than a silent overwrite,
/// so they have to survive parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T>(pub Vec<(String, T)>);

impl<T> OrderedMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(OrderedMap::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Top-level configuration document.
///
/// Sections owned by other components (LLM settings, agent prompts) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub telegram: Option<RawTelegram>,
    pub network_environments: OrderedMap<Vec<String>>,
    pub trading_venues: OrderedMap<RawVenue>,
    #[serde(default)]
    pub portfolio: Option<RawPortfolio>,
    pub chain_config: OrderedMap<RawChain>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTelegram {
    pub bot_token: SecretRef,
    pub chat_id: SecretRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPortfolio {
    #[serde(default)]
    pub chains: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawChain {
    pub wallet_address: SecretRef,
    pub private_key: SecretRef,
    pub rpc_url: SecretRef,
    #[serde(default)]
    pub gas_settings: Option<RawGasSettings>,
    pub tokens: OrderedMap<RawToken>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGasSettings {
    #[serde(default)]
    pub max_priority_fee: Option<SecretRef>,
    #[serde(default)]
    pub gas_limit: Option<SecretRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawToken {
    /// Optional; must match the map key when present
    #[serde(default)]
    pub symbol: Option<String>,
    pub address: SecretRef,
    pub decimals: SecretRef,
    /// Defaults to `false`
    #[serde(default)]
    pub is_native: Option<SecretRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawVenue {
    #[serde(default)]
    pub settings: RawVenueSettings,
    pub supported_chains: OrderedMap<RawVenueChain>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawVenueSettings {
    #[serde(default)]
    pub slippage_bps: Option<SecretRef>,
    #[serde(default)]
    pub fee_tiers: Vec<SecretRef>,
    #[serde(default)]
    pub quote_api_url: Option<SecretRef>,
    #[serde(default)]
    pub swap_api_url: Option<SecretRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawVenueChain {
    #[serde(default)]
    pub supported_pairs: Vec<String>,
    #[serde(default)]
    pub quote_api_url: Option<SecretRef>,
    #[serde(default)]
    pub swap_api_url: Option<SecretRef>,
}

impl RawConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        parse_yaml(content)
    }

    /// Read and parse a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read configuration file");
        parse_yaml(&content)
    }
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| {
        let path = match e.location() {
            Some(loc) => format!("line {}, column {}", loc.line(), loc.column()),
            None => "<document>".to_string(),
        };
        Error::shape(path, format!("YAML parse error: {e}"))
    })
}
