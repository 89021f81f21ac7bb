//! Venue listing tool

use super::{parse_args, Tool, TOOL_LIST_TRADING_VENUES};
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
pub struct ListTradingVenuesInput {
    /// Chain id, e.g. `ethereum`
    pub chain: String,
}

/// Lists the venues configured on a chain with the pairs each supports
pub struct ListTradingVenuesTool {
    lookup: Lookup,
}

impl ListTradingVenuesTool {
    pub fn new(lookup: Lookup) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl Tool for ListTradingVenuesTool {
    fn name(&self) -> &'static str {
        TOOL_LIST_TRADING_VENUES
    }

    fn description(&self) -> &'static str {
        "List the trading venues available on a chain and the pairs each one supports."
    }

    fn input_schema(&self) -> Value {
        schemars::schema_for!(ListTradingVenuesInput).to_value()
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: ListTradingVenuesInput = parse_args(self.name(), args)?;
        let venues: Vec<Value> = self
            .lookup
            .venues_for_chain(&args.chain)?
            .into_iter()
            .map(|listing| {
                json!({
                    "venue": listing.venue,
                    "supported_pairs": listing.supported_pairs,
                })
            })
            .collect();

        Ok(json!({
            "chain": args.chain,
            "venues": venues,
        }))
    }
}
