//! Venue and token lookups
//!
//! The query surface used by trading tools. Everything here is synchronous and
//! I/O free: it reads the immutable snapshot through the active scope.

use crate::config::{ActiveScope, ChainConfig, ChainId, ConfigSnapshot, PairSpec, VenueChain, VenueSettings};
use crate::tokens::{ChainAddress, Token};
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;

/// Both tokens of a pair plus the settings of the venue trading it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPair {
    pub token_a: Token,
    pub token_b: Token,
    pub settings: VenueSettings,
}

/// A wallet contributing to portfolio balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletInfo {
    pub chain: ChainId,
    pub address: ChainAddress,
}

/// Read-only lookups over a snapshot narrowed to one scope
///
/// Cheap to clone; clones share the snapshot.
#[derive(Debug, Clone)]
pub struct Lookup {
    snapshot: Arc<ConfigSnapshot>,
    scope: ActiveScope,
}

impl Lookup {
    pub fn new(snapshot: Arc<ConfigSnapshot>, scope: ActiveScope) -> Self {
        Self { snapshot, scope }
    }

    /// Activate `env_name` and build a lookup over it
    pub fn for_environment(snapshot: Arc<ConfigSnapshot>, env_name: &str) -> Result<Self> {
        let scope = ActiveScope::activate(env_name, &snapshot)?;
        Ok(Self::new(snapshot, scope))
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    pub fn scope(&self) -> &ActiveScope {
        &self.scope
    }

    /// Resolved configuration of an active chain
    pub fn chain(&self, chain: &str) -> Result<&ChainConfig> {
        let config = self
            .snapshot
            .chain(chain)
            .ok_or_else(|| Error::UnknownChain(chain.to_string()))?;
        if !self.scope.contains_chain(chain) {
            return Err(Error::ChainNotActive(chain.to_string()));
        }
        Ok(config)
    }

    /// Token metadata by `(chain, symbol)`
    pub fn token(&self, chain: &str, symbol: &str) -> Result<&Token> {
        self.chain(chain)?
            .token(symbol)
            .ok_or_else(|| Error::UnknownToken {
                chain: chain.to_string(),
                symbol: symbol.to_string(),
            })
    }

    /// Reverse lookup by address; `None` when no configured token has it
    pub fn token_by_address(&self, chain: &str, address: &str) -> Result<Option<&Token>> {
        Ok(self.chain(chain)?.token_by_address(address))
    }

    /// A venue's listing on an active chain
    pub fn venue(&self, chain: &str, venue: &str) -> Result<&VenueChain> {
        self.chain(chain)?;
        self.snapshot
            .venue(chain, venue)
            .ok_or_else(|| Error::UnknownVenue {
                chain: chain.to_string(),
                venue: venue.to_string(),
            })
    }

    /// Venues listed on an active chain
    pub fn venues_for_chain(&self, chain: &str) -> Result<Vec<&VenueChain>> {
        self.chain(chain)?;
        Ok(self.snapshot.venues_on(chain).collect())
    }

    /// Resolve a pair string (`BASE_QUOTE`) on a venue.
    ///
    /// Token existence is checked before venue support, so callers can tell
    /// [`Error::UnknownToken`] (no such token on the chain) apart from
    /// [`Error::UnsupportedPair`] (tokens exist, this venue does not list the pair).
    /// Order matters: a venue listing `WETH_USDC` does not support `USDC_WETH`.
    pub fn pair(&self, chain: &str, venue: &str, pair: &str) -> Result<ResolvedPair> {
        let spec: PairSpec = pair.parse()?;
        let listing = self.venue(chain, venue)?;
        let token_a = self.token(chain, spec.base.as_str())?;
        let token_b = self.token(chain, spec.quote.as_str())?;

        if !listing.supports(&spec) {
            tracing::debug!(chain, venue, pair, "Pair not listed by venue");
            return Err(Error::UnsupportedPair {
                chain: chain.to_string(),
                venue: venue.to_string(),
                pair: pair.to_string(),
            });
        }

        Ok(ResolvedPair {
            token_a: token_a.clone(),
            token_b: token_b.clone(),
            settings: listing.settings.clone(),
        })
    }

    /// Wallets whose balances make up the portfolio.
    ///
    /// Uses the `portfolio.chains` list when configured, otherwise every active
    /// chain; either way only active chains are returned.
    pub fn wallets(&self) -> Vec<WalletInfo> {
        let chains: &[ChainId] = self
            .snapshot
            .portfolio_chains()
            .unwrap_or_else(|| self.scope.chains());

        chains
            .iter()
            .filter(|chain| self.scope.contains_chain(chain.as_str()))
            .filter_map(|chain| self.snapshot.chain(chain.as_str()))
            .map(|config| WalletInfo {
                chain: config.chain.clone(),
                address: config.wallet_address.clone(),
            })
            .collect()
    }
}
