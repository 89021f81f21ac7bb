//! Secret references and environment variable resolution
//!
//! Any scalar value in the configuration (addresses, keys, URLs, numbers,
//! flags) may be written either literally or as an indirection to a process
//! environment variable:
//!
//! ```yaml
//! rpc_url: https://mainnet.base.org
//! private_key:
//!   fromEnvVar: BASE_PRIVATE_KEY
//! ```
//!
//! Names that other entries refer to (map keys, environment chain lists,
//! supported pairs) are always literal. References are resolved exactly once,
//! while the snapshot is being built; numbers and flags are parsed afterwards.

use super::{RawChain, RawConfig, RawVenue};
use crate::{Error, Result};
use secrecy::SecretString;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// YAML key marking an environment variable indirection
pub const FROM_ENV_VAR: &str = "fromEnvVar";

/// A configuration value that is either written inline or read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretRef {
    Literal(String),
    EnvRef(String),
}

impl SecretRef {
    /// Resolve a required value.
    ///
    /// Fails with [`Error::MissingSecret`] when the variable is unset or empty.
    pub fn resolve(&self, env: &dyn EnvSource, path: &str) -> Result<String> {
        match self.resolve_optional(env, path)? {
            Some(value) => Ok(value),
            None => match self {
                SecretRef::EnvRef(name) => Err(Error::MissingSecret(name.clone())),
                SecretRef::Literal(_) => Err(Error::shape(path, "value is empty")),
            },
        }
    }

    /// Resolve an optional value; an unset or empty variable yields `None`.
    pub fn resolve_optional(&self, env: &dyn EnvSource, path: &str) -> Result<Option<String>> {
        match self {
            SecretRef::Literal(value) if value.is_empty() => Ok(None),
            SecretRef::Literal(value) => Ok(Some(value.clone())),
            SecretRef::EnvRef(name) => {
                if !is_valid_env_name(name) {
                    return Err(Error::shape(
                        path,
                        format!("{} {:?} is not a valid variable name", FROM_ENV_VAR, name),
                    ));
                }
                let value = env.var(name).filter(|v| !v.is_empty());
                tracing::debug!(var = %name, path, found = value.is_some(), "Resolved env reference");
                Ok(value)
            }
        }
    }

    /// Name of the referenced variable, if any
    pub fn env_var(&self) -> Option<&str> {
        match self {
            SecretRef::EnvRef(name) => Some(name),
            SecretRef::Literal(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for SecretRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SecretRefVisitor;

        impl<'de> Visitor<'de> for SecretRefVisitor {
            type Value = SecretRef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a scalar value or a {{{}: NAME}} mapping", FROM_ENV_VAR)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<SecretRef, E> {
                Ok(SecretRef::Literal(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<SecretRef, E> {
                Ok(SecretRef::Literal(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<SecretRef, E> {
                Ok(SecretRef::Literal(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<SecretRef, E> {
                Ok(SecretRef::Literal(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<SecretRef, E> {
                Ok(SecretRef::Literal(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<SecretRef, E> {
                Ok(SecretRef::Literal(v.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<SecretRef, A::Error> {
                let mut name: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key != FROM_ENV_VAR {
                        return Err(de::Error::unknown_field(&key, &[FROM_ENV_VAR]));
                    }
                    if name.is_some() {
                        return Err(de::Error::duplicate_field(FROM_ENV_VAR));
                    }
                    name = Some(map.next_value()?);
                }
                name.map(SecretRef::EnvRef)
                    .ok_or_else(|| de::Error::missing_field(FROM_ENV_VAR))
            }
        }

        deserializer.deserialize_any(SecretRefVisitor)
    }
}

fn is_valid_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Source of environment variables used during resolution
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, for embedding several configurations in one process
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolved secret-bearing fields of one chain entry
pub struct ChainSecrets {
    pub wallet_address: String,
    pub private_key: SecretString,
    pub rpc_url: SecretString,
    pub gas_limit: Option<String>,
    pub max_priority_fee: Option<String>,
    /// Same order as the chain's `tokens` entries
    pub tokens: Vec<ResolvedToken>,
}

/// Resolved, still unparsed, token fields
pub struct ResolvedToken {
    pub address: String,
    pub decimals: String,
    pub is_native: Option<String>,
}

/// Resolved, still unparsed, venue settings
#[derive(Default)]
pub struct ResolvedVenueSettings {
    pub slippage_bps: Option<String>,
    pub fee_tiers: Vec<String>,
    pub quote_api_url: Option<String>,
    pub swap_api_url: Option<String>,
}

/// Per-chain endpoint overrides of a venue
#[derive(Default)]
pub struct ResolvedEndpoints {
    pub quote_api_url: Option<String>,
    pub swap_api_url: Option<String>,
}

pub struct ResolvedVenue {
    pub settings: ResolvedVenueSettings,
    /// Same order as the venue's `supported_chains` entries
    pub chains: Vec<ResolvedEndpoints>,
}

/// Resolved telegram credentials
pub struct TelegramSecrets {
    pub bot_token: SecretString,
    pub chat_id: String,
}

/// Every secret reference in a configuration, resolved
pub struct ResolvedSecrets {
    /// Keyed by the raw `chain_config` key
    pub chains: HashMap<String, ChainSecrets>,
    /// Same order as the `trading_venues` entries
    pub venues: Vec<ResolvedVenue>,
    pub telegram: Option<TelegramSecrets>,
}

fn resolve_opt(
    secret: Option<&SecretRef>,
    env: &dyn EnvSource,
    path: &str,
) -> Result<Option<String>> {
    match secret {
        Some(secret) => secret.resolve_optional(env, path),
        None => Ok(None),
    }
}

fn resolve_tokens(chain: &RawChain, env: &dyn EnvSource, chain_path: &str) -> Result<Vec<ResolvedToken>> {
    chain
        .tokens
        .iter()
        .map(|(symbol, token)| {
            let path = format!("{chain_path}.tokens.{symbol}");
            Ok(ResolvedToken {
                address: token.address.resolve(env, &format!("{path}.address"))?,
                decimals: token.decimals.resolve(env, &format!("{path}.decimals"))?,
                is_native: resolve_opt(token.is_native.as_ref(), env, &format!("{path}.is_native"))?,
            })
        })
        .collect()
}

fn resolve_venue(venue: &RawVenue, env: &dyn EnvSource, venue_path: &str) -> Result<ResolvedVenue> {
    let path = format!("{venue_path}.settings");
    let raw = &venue.settings;
    let settings = ResolvedVenueSettings {
        slippage_bps: resolve_opt(raw.slippage_bps.as_ref(), env, &format!("{path}.slippage_bps"))?,
        fee_tiers: raw
            .fee_tiers
            .iter()
            .enumerate()
            .map(|(i, tier)| tier.resolve(env, &format!("{path}.fee_tiers[{i}]")))
            .collect::<Result<_>>()?,
        quote_api_url: resolve_opt(raw.quote_api_url.as_ref(), env, &format!("{path}.quote_api_url"))?,
        swap_api_url: resolve_opt(raw.swap_api_url.as_ref(), env, &format!("{path}.swap_api_url"))?,
    };

    let chains = venue
        .supported_chains
        .iter()
        .map(|(chain, listing)| {
            let path = format!("{venue_path}.supported_chains.{chain}");
            Ok(ResolvedEndpoints {
                quote_api_url: resolve_opt(listing.quote_api_url.as_ref(), env, &format!("{path}.quote_api_url"))?,
                swap_api_url: resolve_opt(listing.swap_api_url.as_ref(), env, &format!("{path}.swap_api_url"))?,
            })
        })
        .collect::<Result<_>>()?;

    Ok(ResolvedVenue { settings, chains })
}

/// Resolve every secret reference, section by section, stopping at the first failure.
///
/// Chains outside the environment that will be activated are resolved too:
/// a configuration either resolves completely or not at all.
pub fn resolve_all(raw: &RawConfig, env: &dyn EnvSource) -> Result<ResolvedSecrets> {
    let mut chains = HashMap::with_capacity(raw.chain_config.len());

    for (key, chain) in raw.chain_config.iter() {
        if chains.contains_key(key) {
            continue;
        }
        let path = format!("chain_config.{key}");
        let gas = chain.gas_settings.clone().unwrap_or_default();

        let secrets = ChainSecrets {
            wallet_address: chain
                .wallet_address
                .resolve(env, &format!("{path}.wallet_address"))?,
            private_key: SecretString::from(
                chain.private_key.resolve(env, &format!("{path}.private_key"))?,
            ),
            rpc_url: SecretString::from(chain.rpc_url.resolve(env, &format!("{path}.rpc_url"))?),
            gas_limit: match &gas.gas_limit {
                Some(secret) => secret.resolve_optional(env, &format!("{path}.gas_settings.gas_limit"))?,
                None => None,
            },
            max_priority_fee: match &gas.max_priority_fee {
                Some(secret) => secret
                    .resolve_optional(env, &format!("{path}.gas_settings.max_priority_fee"))?,
                None => None,
            },
            tokens: resolve_tokens(chain, env, &path)?,
        };
        chains.insert(key.to_string(), secrets);
    }

    let venues = raw
        .trading_venues
        .iter()
        .map(|(key, venue)| resolve_venue(venue, env, &format!("trading_venues.{key}")))
        .collect::<Result<Vec<_>>>()?;

    let telegram = match &raw.telegram {
        Some(telegram) => Some(TelegramSecrets {
            bot_token: SecretString::from(telegram.bot_token.resolve(env, "telegram.bot_token")?),
            chat_id: telegram.chat_id.resolve(env, "telegram.chat_id")?,
        }),
        None => None,
    };

    tracing::debug!(
        chains = chains.len(),
        venues = venues.len(),
        telegram = telegram.is_some(),
        "Resolved secrets"
    );
    Ok(ResolvedSecrets {
        chains,
        venues,
        telegram,
    })
}
