//! Token address lookup tool

use super::{parse_args, Tool, TOOL_GET_TOKEN_ADDRESS};
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
pub struct GetTokenAddressInput {
    /// Token symbol as configured, e.g. `WETH`
    pub token_symbol: String,
    /// Chain id, e.g. `base`
    pub chain: String,
}

/// Resolves a token symbol to its contract address (or mint) and decimals
pub struct GetTokenAddressTool {
    lookup: Lookup,
}

impl GetTokenAddressTool {
    pub fn new(lookup: Lookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for GetTokenAddressTool {
    fn name(&self) -> &'static str {
        TOOL_GET_TOKEN_ADDRESS
    }

    fn description(&self) -> &'static str {
        "Get the contract address, decimals and native flag of a token on a chain. \
         Use the returned decimals to convert human amounts to base units."
    }

    fn input_schema(&self) -> Value {
        schemars::schema_for!(GetTokenAddressInput).to_value()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: GetTokenAddressInput = parse_args(self.name(), args)?;
        let token = self.lookup.token(&args.chain, &args.token_symbol)?;

        Ok(json!({
            "chain": token.chain,
            "token_symbol": token.symbol,
            "address": token.address,
            "decimals": token.decimals,
            "is_native": token.is_native,
        }))
    }
}
