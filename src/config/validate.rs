//! Configuration validation
//!
//! Checks run in a fixed order: shape, type/range, references, duplicates.
//! Every problem found is logged; the first one in check order is returned.

use super::ids::{ChainId, Symbol, VenueName};
use super::pair::PairSpec;
use super::secret::{ChainSecrets, ResolvedSecrets, ResolvedToken, ResolvedVenue, ResolvedVenueSettings, TelegramSecrets};
use super::snapshot::{ChainConfig, ConfigSnapshot, GasSettings, TelegramConfig, VenueChain, VenueSettings};
use super::{OrderedMap, RawConfig, RawToken, DEFAULT_GAS_LIMIT};
use crate::tokens::{ChainFamily, Token};
use crate::{Error, Result};
use secrecy::ExposeSecret;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use url::Url;

/// Upper bound for slippage: 100%
pub const MAX_SLIPPAGE_BPS: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Check {
    Shape,
    Range,
    Reference,
    Duplicate,
}

#[derive(Debug, Default)]
struct ValidationContext {
    problems: Vec<(Check, Error)>,
}

impl ValidationContext {
    fn shape(&mut self, path: &str, reason: impl Into<String>) {
        self.problems.push((Check::Shape, Error::shape(path, reason)));
    }

    fn range(&mut self, path: &str, reason: impl Into<String>) {
        self.problems.push((
            Check::Range,
            Error::ConfigShape {
                path: path.to_string(),
                reason: reason.into(),
            },
        ));
    }

    fn reference(&mut self, path: &str, reason: impl Into<String>) {
        self.problems.push((
            Check::Reference,
            Error::ReferentialIntegrity {
                path: path.to_string(),
                reason: reason.into(),
            },
        ));
    }

    fn duplicate(&mut self, path: &str, key: impl Into<String>) {
        self.problems.push((
            Check::Duplicate,
            Error::DuplicateEntry {
                path: path.to_string(),
                key: key.into(),
            },
        ));
    }

    fn duplicate_keys<T>(&mut self, map: &OrderedMap<T>, path: &str) {
        let mut seen = HashSet::new();
        for key in map.keys() {
            if !seen.insert(key) {
                self.duplicate(path, key);
            }
        }
    }

    fn finish(mut self) -> Result<()> {
        // stable: keeps document order within a check
        self.problems.sort_by_key(|(check, _)| *check);
        for (check, error) in &self.problems {
            tracing::warn!(?check, error = %error, "Configuration problem");
        }
        match self.problems.into_iter().next() {
            Some((_, first)) => Err(first),
            None => Ok(()),
        }
    }
}

/// Chains that parsed to a valid id, with the token symbols that parsed.
/// Reference checks run against this even when other fields of a chain are broken.
type Declared = BTreeMap<ChainId, BTreeSet<Symbol>>;

/// Validate a raw configuration against its resolved secrets
pub fn validate(raw: &RawConfig, secrets: ResolvedSecrets) -> Result<ConfigSnapshot> {
    let mut ctx = ValidationContext::default();
    let ResolvedSecrets {
        chains: mut chain_secrets,
        venues: venue_secrets,
        telegram,
    } = secrets;

    let mut declared = Declared::new();
    let mut chains = BTreeMap::new();

    ctx.duplicate_keys(&raw.chain_config, "chain_config");
    for (key, raw_chain) in raw.chain_config.iter() {
        let path = format!("chain_config.{key}");
        let chain_id: ChainId = match key.parse() {
            Ok(id) => id,
            Err(reason) => {
                ctx.shape(&path, reason);
                continue;
            }
        };
        if declared.contains_key(&chain_id) {
            continue;
        }

        let Some(secrets) = chain_secrets.remove(key) else {
            continue;
        };

        let family = ChainFamily::of(&chain_id);
        let tokens = validate_tokens(&chain_id, family, &raw_chain.tokens, &secrets.tokens, &path, &mut ctx);
        declared.insert(chain_id.clone(), tokens.keys().cloned().collect());

        if let Some(chain) = validate_chain(chain_id.clone(), family, secrets, tokens, &path, &mut ctx) {
            chains.insert(chain_id, chain);
        }
    }

    let environments = validate_environments(raw, &declared, &mut ctx);
    let venues = validate_venues(raw, &venue_secrets, &declared, &mut ctx);
    let portfolio_chains = validate_portfolio(raw, &declared, &mut ctx);
    let telegram = telegram.and_then(|t| validate_telegram(t, &mut ctx));

    ctx.finish()?;

    Ok(ConfigSnapshot {
        environments,
        chains,
        venues,
        telegram,
        portfolio_chains,
    })
}

fn validate_tokens(
    chain: &ChainId,
    family: ChainFamily,
    raw_tokens: &OrderedMap<RawToken>,
    resolved: &[ResolvedToken],
    chain_path: &str,
    ctx: &mut ValidationContext,
) -> BTreeMap<Symbol, Token> {
    let tokens_path = format!("{chain_path}.tokens");
    ctx.duplicate_keys(raw_tokens, &tokens_path);

    let mut tokens = BTreeMap::new();
    for ((key, raw), values) in raw_tokens.iter().zip(resolved) {
        let path = format!("{tokens_path}.{key}");
        let symbol: Symbol = match key.parse() {
            Ok(symbol) => symbol,
            Err(reason) => {
                ctx.shape(&path, reason);
                continue;
            }
        };
        if let Some(declared) = &raw.symbol {
            if declared != key {
                ctx.shape(
                    &format!("{path}.symbol"),
                    format!("symbol {declared:?} does not match its key {key:?}"),
                );
            }
        }

        let decimals = match values.decimals.trim().parse::<u8>() {
            Ok(decimals) => Some(decimals),
            Err(_) => {
                ctx.range(
                    &format!("{path}.decimals"),
                    format!("must be an integer in 0..=255, got {:?}", values.decimals),
                );
                None
            }
        };
        let is_native = match values.is_native.as_deref().map(str::trim) {
            None => false,
            Some(flag) => flag.parse::<bool>().unwrap_or_else(|_| {
                ctx.range(
                    &format!("{path}.is_native"),
                    format!("must be true or false, got {flag:?}"),
                );
                false
            }),
        };
        let address = match family.parse_address(values.address.trim()) {
            Ok(address) => Some(address),
            Err(reason) => {
                ctx.range(&format!("{path}.address"), reason);
                None
            }
        };

        if tokens.contains_key(&symbol) {
            continue;
        }
        if let (Some(decimals), Some(address)) = (decimals, address) {
            tokens.insert(
                symbol.clone(),
                Token {
                    symbol,
                    address,
                    decimals,
                    is_native,
                    chain: chain.clone(),
                },
            );
        }
    }
    tokens
}

fn validate_chain(
    chain: ChainId,
    family: ChainFamily,
    secrets: ChainSecrets,
    tokens: BTreeMap<Symbol, Token>,
    path: &str,
    ctx: &mut ValidationContext,
) -> Option<ChainConfig> {
    let wallet_address = match family.parse_address(&secrets.wallet_address) {
        Ok(address) => Some(address),
        Err(reason) => {
            ctx.range(&format!("{path}.wallet_address"), reason);
            None
        }
    };

    // the URL may embed an API key; keep it out of the message
    if Url::parse(secrets.rpc_url.expose_secret()).is_err() {
        ctx.range(&format!("{path}.rpc_url"), "not a valid URL");
    }

    if secrets.private_key.expose_secret().trim().is_empty() {
        ctx.shape(&format!("{path}.private_key"), "value is blank");
    }

    let gas_limit = match secrets.gas_limit.as_deref() {
        None => {
            tracing::debug!(chain = %chain, gas_limit = DEFAULT_GAS_LIMIT, "Using default gas limit");
            DEFAULT_GAS_LIMIT
        }
        Some(raw) => match raw.parse::<u64>() {
            Ok(limit) if limit > 0 => limit,
            _ => {
                ctx.range(
                    &format!("{path}.gas_settings.gas_limit"),
                    format!("must be a positive integer, got {raw:?}"),
                );
                DEFAULT_GAS_LIMIT
            }
        },
    };
    let max_priority_fee = match secrets.max_priority_fee.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<u64>() {
            Ok(fee) => Some(fee),
            Err(_) => {
                ctx.range(
                    &format!("{path}.gas_settings.max_priority_fee"),
                    format!("must be a non-negative integer (wei), got {raw:?}"),
                );
                None
            }
        },
    };

    Some(ChainConfig {
        chain,
        family,
        wallet_address: wallet_address?,
        private_key: secrets.private_key,
        rpc_url: secrets.rpc_url,
        gas_settings: GasSettings {
            gas_limit,
            max_priority_fee,
        },
        tokens,
    })
}

/// Resolve a list of chain references, reporting unknown chains and duplicates
fn validate_chain_list(
    list: &[String],
    path: &str,
    declared: &Declared,
    ctx: &mut ValidationContext,
) -> Vec<ChainId> {
    let mut chains: Vec<ChainId> = Vec::with_capacity(list.len());
    for (i, raw) in list.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        let chain: ChainId = match raw.parse() {
            Ok(id) => id,
            Err(reason) => {
                ctx.shape(&item_path, reason);
                continue;
            }
        };
        if !declared.contains_key(&chain) {
            ctx.reference(
                &item_path,
                format!("chain {chain} has no chain_config entry"),
            );
        }
        if chains.contains(&chain) {
            ctx.duplicate(path, chain.as_str());
        } else {
            chains.push(chain);
        }
    }
    chains
}

fn validate_environments(
    raw: &RawConfig,
    declared: &Declared,
    ctx: &mut ValidationContext,
) -> BTreeMap<String, Vec<ChainId>> {
    ctx.duplicate_keys(&raw.network_environments, "network_environments");

    let mut environments = BTreeMap::new();
    for (name, list) in raw.network_environments.iter() {
        let path = format!("network_environments.{name}");
        if name.trim().is_empty() {
            ctx.shape(&path, "environment name is empty");
            continue;
        }
        if list.is_empty() {
            ctx.shape(&path, "environment lists no chains");
        }
        let chains = validate_chain_list(list, &path, declared, ctx);
        environments.entry(name.to_string()).or_insert(chains);
    }
    environments
}

fn validate_venue_settings(
    raw: &ResolvedVenueSettings,
    path: &str,
    ctx: &mut ValidationContext,
) -> VenueSettings {
    let slippage_bps = raw.slippage_bps.as_deref().and_then(|bps| {
        match bps.trim().parse::<i64>() {
            Ok(value) if (0..=MAX_SLIPPAGE_BPS).contains(&value) => u16::try_from(value).ok(),
            _ => {
                ctx.range(
                    &format!("{path}.slippage_bps"),
                    format!("must be an integer in 0..={MAX_SLIPPAGE_BPS}, got {bps:?}"),
                );
                None
            }
        }
    });

    let mut fee_tiers = Vec::with_capacity(raw.fee_tiers.len());
    for (i, tier) in raw.fee_tiers.iter().enumerate() {
        match tier.trim().parse::<u32>() {
            Ok(value) if value > 0 => fee_tiers.push(value),
            _ => ctx.range(
                &format!("{path}.fee_tiers[{i}]"),
                format!("must be a positive integer, got {tier:?}"),
            ),
        }
    }

    VenueSettings {
        slippage_bps,
        fee_tiers,
        quote_api_url: parse_url(raw.quote_api_url.as_deref(), &format!("{path}.quote_api_url"), ctx),
        swap_api_url: parse_url(raw.swap_api_url.as_deref(), &format!("{path}.swap_api_url"), ctx),
    }
}

fn parse_url(raw: Option<&str>, path: &str, ctx: &mut ValidationContext) -> Option<Url> {
    let raw = raw?;
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            // may come from the environment with an API key embedded; keep it out of the message
            ctx.range(path, format!("not a valid URL: {e}"));
            None
        }
    }
}

fn validate_venues(
    raw: &RawConfig,
    resolved: &[ResolvedVenue],
    declared: &Declared,
    ctx: &mut ValidationContext,
) -> BTreeMap<ChainId, BTreeMap<VenueName, VenueChain>> {
    ctx.duplicate_keys(&raw.trading_venues, "trading_venues");

    let mut venues: BTreeMap<ChainId, BTreeMap<VenueName, VenueChain>> = BTreeMap::new();
    let mut seen_venues = HashSet::new();

    for ((key, raw_venue), resolved_venue) in raw.trading_venues.iter().zip(resolved) {
        let path = format!("trading_venues.{key}");
        let venue: VenueName = match key.parse() {
            Ok(name) => name,
            Err(reason) => {
                ctx.shape(&path, reason);
                continue;
            }
        };
        if !seen_venues.insert(venue.clone()) {
            continue;
        }

        let settings = validate_venue_settings(&resolved_venue.settings, &format!("{path}.settings"), ctx);
        let chains_path = format!("{path}.supported_chains");
        ctx.duplicate_keys(&raw_venue.supported_chains, &chains_path);

        for ((chain_key, listing), endpoints) in raw_venue.supported_chains.iter().zip(&resolved_venue.chains) {
            let chain_path = format!("{chains_path}.{chain_key}");
            let chain: ChainId = match chain_key.parse() {
                Ok(id) => id,
                Err(reason) => {
                    ctx.shape(&chain_path, reason);
                    continue;
                }
            };
            let Some(symbols) = declared.get(&chain) else {
                ctx.reference(&chain_path, format!("chain {chain} has no chain_config entry"));
                continue;
            };

            let mut chain_settings = settings.clone();
            if let Some(url) = parse_url(endpoints.quote_api_url.as_deref(), &format!("{chain_path}.quote_api_url"), ctx) {
                chain_settings.quote_api_url = Some(url);
            }
            if let Some(url) = parse_url(endpoints.swap_api_url.as_deref(), &format!("{chain_path}.swap_api_url"), ctx) {
                chain_settings.swap_api_url = Some(url);
            }

            let pairs_path = format!("{chain_path}.supported_pairs");
            let mut pairs: Vec<PairSpec> = Vec::with_capacity(listing.supported_pairs.len());
            for (i, raw_pair) in listing.supported_pairs.iter().enumerate() {
                let pair_path = format!("{pairs_path}[{i}]");
                let pair: PairSpec = match raw_pair.parse() {
                    Ok(pair) => pair,
                    Err(e) => {
                        ctx.shape(&pair_path, e.to_string());
                        continue;
                    }
                };
                for symbol in [&pair.base, &pair.quote] {
                    if !symbols.contains(symbol) {
                        ctx.reference(
                            &pair_path,
                            format!("token {symbol} is not defined in chain_config.{chain}.tokens"),
                        );
                    }
                }
                if pairs.contains(&pair) {
                    ctx.duplicate(&pairs_path, pair.to_string());
                } else {
                    pairs.push(pair);
                }
            }

            venues.entry(chain.clone()).or_default().entry(venue.clone()).or_insert(VenueChain {
                venue: venue.clone(),
                chain,
                supported_pairs: pairs,
                settings: chain_settings,
            });
        }
    }
    venues
}

fn validate_portfolio(
    raw: &RawConfig,
    declared: &Declared,
    ctx: &mut ValidationContext,
) -> Option<Vec<ChainId>> {
    let portfolio = raw.portfolio.as_ref()?;
    if portfolio.chains.is_empty() {
        return None;
    }
    Some(validate_chain_list(&portfolio.chains, "portfolio.chains", declared, ctx))
}

fn validate_telegram(secrets: TelegramSecrets, ctx: &mut ValidationContext) -> Option<TelegramConfig> {
    match secrets.chat_id.trim().parse::<i64>() {
        Ok(chat_id) => Some(TelegramConfig {
            bot_token: secrets.bot_token,
            chat_id,
        }),
        Err(_) => {
            ctx.range("telegram.chat_id", "must be an integer chat id");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::{resolve_all, MapEnv};
    use crate::test_support::{fixture_env, fixture_snapshot, FIXTURE_YAML};

    fn build_with(yaml: &str, env: &MapEnv) -> Result<ConfigSnapshot> {
        let raw = RawConfig::from_yaml_str(yaml)?;
        let secrets = resolve_all(&raw, env)?;
        validate(&raw, secrets)
    }

    fn build(yaml: &str) -> Result<ConfigSnapshot> {
        build_with(yaml, &fixture_env())
    }

    fn edited(from: &str, to: &str) -> String {
        assert!(FIXTURE_YAML.contains(from), "fixture does not contain {from:?}");
        FIXTURE_YAML.replacen(from, to, 1)
    }

    #[test]
    fn fixture_is_valid() {
        build(FIXTURE_YAML).unwrap();
    }

    #[test]
    fn pair_with_unknown_token_is_referential_error() {
        let yaml = edited("[VIRTUAL_WETH, WETH_USDC]", "[VIRTUAL_WETH, PEPE_USDC]");
        match build(&yaml) {
            Err(Error::ReferentialIntegrity { path, reason }) => {
                assert_eq!(path, "trading_venues.uniswap_v3.supported_chains.base.supported_pairs[1]");
                assert!(reason.contains("PEPE"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn environment_with_unknown_chain_is_referential_error() {
        let yaml = edited("production: [ethereum, base, solana]", "production: [ethereum, base, arbitrum]");
        match build(&yaml) {
            Err(Error::ReferentialIntegrity { path, .. }) => {
                assert_eq!(path, "network_environments.production[2]")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn venue_on_unknown_chain_is_referential_error() {
        let yaml = edited("      ethereum_sepolia:\n        supported_pairs: [WETH_USDC]", "      optimism:\n        supported_pairs: [WETH_USDC]");
        assert!(matches!(build(&yaml), Err(Error::ReferentialIntegrity { .. })));
    }

    #[test]
    fn duplicate_chain_in_environment_is_rejected() {
        let yaml = edited("production: [ethereum, base, solana]", "production: [ethereum, base, base]");
        match build(&yaml) {
            Err(Error::DuplicateEntry { path, key }) => {
                assert_eq!(path, "network_environments.production");
                assert_eq!(key, "base");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_token_symbol_is_rejected() {
        let yaml = edited(
            "      VIRTUAL:\n",
            "      USDC:\n        address: \"0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913\"\n        decimals: 6\n      VIRTUAL:\n",
        );
        match build(&yaml) {
            Err(Error::DuplicateEntry { path, key }) => {
                assert_eq!(path, "chain_config.base.tokens");
                assert_eq!(key, "USDC");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let yaml = edited("[VIRTUAL_WETH, WETH_USDC]", "[VIRTUAL_WETH, WETH_USDC, VIRTUAL_WETH]");
        assert!(matches!(build(&yaml), Err(Error::DuplicateEntry { .. })));
    }

    #[test]
    fn negative_decimals_rejected() {
        let yaml = edited("decimals: 5", "decimals: -5");
        match build(&yaml) {
            Err(Error::ConfigShape { path, .. }) => {
                assert_eq!(path, "chain_config.solana.tokens.GIGA.decimals")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn decimals_above_255_rejected() {
        let yaml = edited("decimals: 5", "decimals: 256");
        assert!(matches!(build(&yaml), Err(Error::ConfigShape { .. })));
    }

    #[test]
    fn slippage_out_of_range_rejected() {
        let yaml = edited("slippage_bps: 50", "slippage_bps: 10001");
        match build(&yaml) {
            Err(Error::ConfigShape { path, .. }) => {
                assert_eq!(path, "trading_venues.uniswap_v3.settings.slippage_bps")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_positive_fee_tier_rejected() {
        let yaml = edited("fee_tiers: [100, 500, 3000, 10000]", "fee_tiers: [100, 0, 3000]");
        match build(&yaml) {
            Err(Error::ConfigShape { path, .. }) => {
                assert_eq!(path, "trading_venues.uniswap_v3.settings.fee_tiers[1]")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn wrong_address_family_rejected() {
        // an EVM address on a Solana chain
        let yaml = edited(
            "63LfDmNb3MQ8mw9MtZ2To9bEA2M71kZUUGq5tiJxcqj9",
            "0x4200000000000000000000000000000000000006",
        );
        match build(&yaml) {
            Err(Error::ConfigShape { path, .. }) => {
                assert_eq!(path, "chain_config.solana.tokens.GIGA.address")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_wallet_address_rejected() {
        let raw = RawConfig::from_yaml_str(FIXTURE_YAML).unwrap();
        let env = fixture_env().with("BASE_WALLET_ADDRESS", "not-an-address");
        let secrets = resolve_all(&raw, &env).unwrap();
        match validate(&raw, secrets) {
            Err(Error::ConfigShape { path, .. }) => assert_eq!(path, "chain_config.base.wallet_address"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_rpc_url_does_not_leak_value() {
        let raw = RawConfig::from_yaml_str(FIXTURE_YAML).unwrap();
        let env = fixture_env().with("BASE_RPC_URL", "secret-key-without-scheme");
        let secrets = resolve_all(&raw, &env).unwrap();
        let err = validate(&raw, secrets).unwrap_err();
        assert!(matches!(err, Error::ConfigShape { ref path, .. } if path == "chain_config.base.rpc_url"));
        assert!(!err.to_string().contains("secret-key-without-scheme"));
    }

    #[test]
    fn malformed_pair_in_config_is_shape_error() {
        let yaml = edited("[VIRTUAL_WETH, WETH_USDC]", "[VIRTUAL_WETH_USDC]");
        assert!(matches!(build(&yaml), Err(Error::ConfigShape { .. })));
    }

    #[test]
    fn empty_environment_rejected() {
        let yaml = edited("test: [ethereum_sepolia]", "test: []");
        assert!(matches!(build(&yaml), Err(Error::ConfigShape { .. })));
    }

    #[test]
    fn shape_errors_reported_before_references() {
        // both a bad decimals value (range) and a dangling pair (reference)
        let yaml = edited("decimals: 5", "decimals: -1")
            .replacen("[VIRTUAL_WETH, WETH_USDC]", "[VIRTUAL_WETH, PEPE_USDC]", 1);
        assert!(matches!(build(&yaml), Err(Error::ConfigShape { .. })));
    }

    #[test]
    fn mismatched_symbol_field_rejected() {
        let yaml = edited("      VIRTUAL:\n", "      VIRTUAL:\n        symbol: VIRTUALS\n");
        match build(&yaml) {
            Err(Error::ConfigShape { path, .. }) => {
                assert_eq!(path, "chain_config.base.tokens.VIRTUAL.symbol")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn portfolio_with_unknown_chain_rejected() {
        let yaml = edited("chains: [ethereum, base, solana]", "chains: [ethereum, polygon]");
        match build(&yaml) {
            Err(Error::ReferentialIntegrity { path, .. }) => assert_eq!(path, "portfolio.chains[1]"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_chain_config_key_is_rejected() {
        let yaml = format!(
            "{FIXTURE_YAML}\n  base:\n    wallet_address: \"0x742d35Cc6634C0532925a3b844Bc454e4438f44e\"\n    private_key: {{ fromEnvVar: BASE_PRIVATE_KEY }}\n    rpc_url: https://mainnet.base.org\n    tokens: {{}}\n"
        );
        match build(&yaml) {
            Err(Error::DuplicateEntry { path, key }) => {
                assert_eq!(path, "chain_config");
                assert_eq!(key, "base");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn duplicate_venue_key_is_rejected() {
        let yaml = edited(
            "  uniswap_v2:\n",
            "  uniswap_v3:\n    supported_chains:\n      base:\n        supported_pairs: [WETH_USDC]\n  uniswap_v2:\n",
        );
        match build(&yaml) {
            Err(Error::DuplicateEntry { path, key }) => {
                assert_eq!(path, "trading_venues");
                assert_eq!(key, "uniswap_v3");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    fn env_backed_yaml() -> String {
        edited(
            "quote_api_url: https://quote-api.jup.ag/v6/quote",
            "quote_api_url: { fromEnvVar: JUPITER_QUOTE_URL }",
        )
        .replacen(
            "address: \"0x0b3e328455c4059EEb9e3f84b5543F74E24e7E1b\"",
            "address: { fromEnvVar: BASE_VIRTUAL_ADDRESS }",
            1,
        )
        .replacen("decimals: 5", "decimals: { fromEnvVar: GIGA_DECIMALS }", 1)
        .replacen("slippage_bps: 50", "slippage_bps: { fromEnvVar: UNISWAP_SLIPPAGE_BPS }", 1)
    }

    fn env_backed_env() -> MapEnv {
        fixture_env()
            .with("JUPITER_QUOTE_URL", "https://quote.example.com/v6/quote?api-key=abc")
            .with("BASE_VIRTUAL_ADDRESS", "0x0b3e328455c4059eeb9e3f84b5543f74e24e7e1b")
            .with("GIGA_DECIMALS", "5")
            .with("UNISWAP_SLIPPAGE_BPS", "75")
    }

    #[test]
    fn venue_and_token_values_resolve_from_env() {
        let snapshot = build_with(&env_backed_yaml(), &env_backed_env()).unwrap();

        let jupiter = snapshot.venue("solana", "jupiter").unwrap();
        assert_eq!(
            jupiter.settings.quote_api_url.as_ref().map(Url::as_str),
            Some("https://quote.example.com/v6/quote?api-key=abc")
        );
        assert_eq!(
            snapshot.venue("base", "uniswap_v3").unwrap().settings.slippage_bps,
            Some(75)
        );

        let expected = fixture_snapshot();
        let virtual_token = snapshot.chain("base").unwrap().token("VIRTUAL").unwrap();
        assert_eq!(
            virtual_token.address,
            expected.chain("base").unwrap().token("VIRTUAL").unwrap().address
        );
        assert_eq!(snapshot.chain("solana").unwrap().token("GIGA").unwrap().decimals, 5);
    }

    #[test]
    fn missing_token_address_variable_names_it() {
        let mut env = env_backed_env();
        env.remove("BASE_VIRTUAL_ADDRESS");
        match build_with(&env_backed_yaml(), &env) {
            Err(Error::MissingSecret(name)) => assert_eq!(name, "BASE_VIRTUAL_ADDRESS"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unset_optional_venue_url_is_omitted() {
        let mut env = env_backed_env();
        env.remove("JUPITER_QUOTE_URL");
        let snapshot = build_with(&env_backed_yaml(), &env).unwrap();
        assert!(snapshot
            .venue("solana", "jupiter")
            .unwrap()
            .settings
            .quote_api_url
            .is_none());
    }

    #[test]
    fn invalid_env_venue_url_does_not_leak_value() {
        let env = env_backed_env().with("JUPITER_QUOTE_URL", "quote-host/v6?api-key=abc123");
        let err = build_with(&env_backed_yaml(), &env).unwrap_err();
        assert!(matches!(err, Error::ConfigShape { ref path, .. }
            if path == "trading_venues.jupiter.supported_chains.solana.quote_api_url"));
        assert!(!err.to_string().contains("abc123"));
    }

    #[test]
    fn non_numeric_env_decimals_rejected() {
        let env = env_backed_env().with("GIGA_DECIMALS", "five");
        match build_with(&env_backed_yaml(), &env) {
            Err(Error::ConfigShape { path, .. }) => {
                assert_eq!(path, "chain_config.solana.tokens.GIGA.decimals")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
