//! Trading Configuration
//!
//! Resolves a multi-chain trading configuration into an immutable snapshot:
//! - Secrets referenced as `{fromEnvVar: NAME}` are read from the environment once
//! - The document is validated (shape, ranges, references, duplicates)
//! - A network environment (`production`, `test`) selects the active chains
//! - Token and venue lookups answer from the active scope
//!
//! # Security Model
//!
//! - Private keys and RPC URLs are held as `SecretString`
//! - Secrets never appear in `Debug` output, logs or serialized views
//! - Missing secrets abort construction; there are no fallback values

pub mod config;
pub mod lookup;
pub mod tokens;
pub mod tools;

mod error;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{ActiveScope, ConfigSnapshot, DEFAULT_CONFIG_PATH};
pub use error::{Error, Result};
pub use lookup::{Lookup, ResolvedPair, WalletInfo};
pub use tokens::{ChainAddress, ChainFamily, Token};
