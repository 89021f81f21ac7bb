//! Network environment selection
//!
//! A network environment (`production`, `test`) names the chains that are live
//! for a run. Activating one narrows the snapshot to those chains and to the
//! venue listings on them.

use super::ids::{ChainId, VenueName};
use super::snapshot::ConfigSnapshot;
use crate::{Error, Result};
use serde::Serialize;

/// The chains and venue listings live for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveScope {
    /// `None` when every configured chain is active
    environment: Option<String>,
    chains: Vec<ChainId>,
    venues: Vec<(ChainId, VenueName)>,
}

impl ActiveScope {
    /// Activate a named network environment
    pub fn activate(env_name: &str, snapshot: &ConfigSnapshot) -> Result<Self> {
        let chains = snapshot
            .environment(env_name)
            .ok_or_else(|| Error::UnknownEnvironment(env_name.to_string()))?
            .to_vec();

        let scope = Self::over(Some(env_name.to_string()), chains, snapshot);
        tracing::info!(
            environment = env_name,
            chains = ?scope.chains.iter().map(ChainId::as_str).collect::<Vec<_>>(),
            venues = scope.venues.len(),
            "Activated network environment"
        );
        Ok(scope)
    }

    /// Activate every configured chain, regardless of environments
    pub fn all(snapshot: &ConfigSnapshot) -> Self {
        let chains = snapshot.chain_ids().cloned().collect();
        let scope = Self::over(None, chains, snapshot);
        tracing::info!(chains = scope.chains.len(), "Activated all configured chains");
        scope
    }

    fn over(environment: Option<String>, chains: Vec<ChainId>, snapshot: &ConfigSnapshot) -> Self {
        let venues = chains
            .iter()
            .flat_map(|chain| {
                snapshot
                    .venues_on(chain.as_str())
                    .map(|listing| (listing.chain.clone(), listing.venue.clone()))
            })
            .collect();
        Self {
            environment,
            chains,
            venues,
        }
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Active chains in configured order
    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    /// Active `(chain, venue)` listings
    pub fn venues(&self) -> &[(ChainId, VenueName)] {
        &self.venues
    }

    pub fn contains_chain(&self, chain: &str) -> bool {
        self.chains.iter().any(|c| c.as_str() == chain)
    }
}
