//! Tool implementations for trading agents
//!
//! Each tool takes a JSON object, answers it from a [`Lookup`] and returns
//! JSON. Agent runtimes discover tools through [`ToolRegistry`] and feed
//! `input_schema()` to the model.

mod get_token_address;
mod get_trading_pair;
mod list_trading_venues;

use crate::lookup::Lookup;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use get_token_address::{GetTokenAddressInput, GetTokenAddressTool};
pub use get_trading_pair::{GetTradingPairInput, GetTradingPairTool};
pub use list_trading_venues::{ListTradingVenuesInput, ListTradingVenuesTool};

pub const TOOL_GET_TOKEN_ADDRESS: &str = "get_token_address";
pub const TOOL_GET_TRADING_PAIR: &str = "get_trading_pair";
pub const TOOL_LIST_TRADING_VENUES: &str = "list_trading_venues";

/// A JSON-in, JSON-out operation exposed to agents
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema of the accepted arguments
    fn input_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Decode tool arguments, reporting failures as [`Error::InvalidArgument`]
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args)
        .map_err(|e| Error::InvalidArgument(format!("{}: {}", tool, e)))
}

/// Every tool, keyed by name
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry with all lookup tools sharing one `Lookup`
    pub fn new(lookup: Lookup) -> Self {
        Self {
            tools: vec![
                Box::new(GetTokenAddressTool::new(lookup.clone())),
                Box::new(GetTradingPairTool::new(lookup.clone())),
                Box::new(ListTradingVenuesTool::new(lookup)),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(Box::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|tool| tool.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(Box::as_ref)
    }

    /// Run a tool by name
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown tool: {}", name)))?;

        tracing::debug!(tool = name, "Executing tool");
        let result = tool.execute(args).await;
        if let Err(e) = &result {
            tracing::debug!(tool = name, error = %e, "Tool returned an error");
        }
        result
    }
}
