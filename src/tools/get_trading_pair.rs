//! Trading pair resolution tool

use super::{parse_args, Tool, TOOL_GET_TRADING_PAIR};
use crate::lookup::Lookup;
use crate::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
#[serde(deny_unknown_fields)]
pub struct GetTradingPairInput {
    /// Chain id, e.g. `base`
    pub chain: String,
    /// Venue name, e.g. `uniswap_v3`
    pub venue: String,
    /// Pair as `BASE_QUOTE`, e.g. `VIRTUAL_WETH`. Order matters.
    pub pair: String,
}

/// Resolves both tokens of a pair and the venue settings for trading it
pub struct GetTradingPairTool {
    lookup: Lookup,
}

impl GetTradingPairTool {
    pub fn new(lookup: Lookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for GetTradingPairTool {
    fn name(&self) -> &'static str {
        TOOL_GET_TRADING_PAIR
    }

    fn description(&self) -> &'static str {
        "Resolve a trading pair (BASE_QUOTE) on a venue to both token addresses \
         and decimals plus the venue's fee tiers, slippage and API endpoints. \
         Fails if the venue does not list the pair in that order."
    }

    fn input_schema(&self) -> Value {
        schemars::schema_for!(GetTradingPairInput).to_value()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: GetTradingPairInput = parse_args(self.name(), args)?;
        let resolved = self.lookup.pair(&args.chain, &args.venue, &args.pair)?;

        Ok(json!({
            "chain": args.chain,
            "venue": args.venue,
            "pair": args.pair,
            "token_a": resolved.token_a,
            "token_b": resolved.token_b,
            "settings": resolved.settings,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_snapshot;
    use crate::Error;
    use std::sync::Arc;

    fn tool() -> GetTradingPairTool {
        let lookup = Lookup::for_environment(Arc::new(fixture_snapshot()), "production").unwrap();
        GetTradingPairTool::new(lookup)
    }

    #[tokio::test]
    async fn test_resolves_pair() {
        let result = tool()
            .execute(json!({"chain": "base", "venue": "uniswap_v3", "pair": "VIRTUAL_WETH"}))
            .await
            .unwrap();
        assert_eq!(result["token_a"]["symbol"], "VIRTUAL");
        assert_eq!(result["token_b"]["symbol"], "WETH");
        assert_eq!(result["token_b"]["decimals"], 18);
        assert_eq!(
            result["token_b"]["address"],
            "0x4200000000000000000000000000000000000006"
        );
        assert_eq!(result["settings"]["fee_tiers"], json!([100, 500, 3000, 10000]));
        assert_eq!(result["settings"]["slippage_bps"], 50);
    }

    #[tokio::test]
    async fn test_solana_venue_carries_api_url() {
        let result = tool()
            .execute(json!({"chain": "solana", "venue": "jupiter", "pair": "GIGA_SOL"}))
            .await
            .unwrap();
        assert_eq!(result["token_a"]["decimals"], 5);
        assert_eq!(
            result["settings"]["quote_api_url"],
            "https://quote-api.jup.ag/v6/quote"
        );
    }

    #[tokio::test]
    async fn test_reversed_pair_is_rejected() {
        let err = tool()
            .execute(json!({"chain": "base", "venue": "uniswap_v3", "pair": "WETH_VIRTUAL"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPair { .. }));
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let err = tool()
            .execute(json!({"chain": "base", "venue": "uniswap_v3", "pair": "WETH_USDC", "amount": "1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
