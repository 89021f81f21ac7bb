//! Shared fixtures for unit tests

use crate::config::{ConfigSnapshot, MapEnv};

/// Same document as the shipped sample configuration
pub const FIXTURE_YAML: &str = include_str!("../config/default.yaml");

pub const EVM_WALLET: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
pub const EVM_PRIVATE_KEY: &str =
    "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
pub const SOLANA_WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// Every variable the fixture references, except the optional sepolia gas limit
pub fn fixture_env() -> MapEnv {
    MapEnv::new()
        .with("ETHEREUM_RPC_URL", "https://eth-mainnet.g.alchemy.com/v2/eth-secret-key")
        .with("ETHEREUM_WALLET_ADDRESS", EVM_WALLET)
        .with("ETHEREUM_PRIVATE_KEY", EVM_PRIVATE_KEY)
        .with("ETHEREUM_SEPOLIA_RPC_URL", "https://eth-sepolia.g.alchemy.com/v2/sepolia-secret-key")
        .with("ETHEREUM_SEPOLIA_WALLET_ADDRESS", EVM_WALLET)
        .with("ETHEREUM_SEPOLIA_PRIVATE_KEY", EVM_PRIVATE_KEY)
        .with("BASE_RPC_URL", "https://base-mainnet.g.alchemy.com/v2/base-secret-key")
        .with("BASE_WALLET_ADDRESS", EVM_WALLET)
        .with("BASE_PRIVATE_KEY", EVM_PRIVATE_KEY)
        .with("SOLANA_RPC_URL", "https://api.mainnet-beta.solana.com")
        .with("SOLANA_WALLET_ADDRESS", SOLANA_WALLET)
        .with("SOLANA_PRIVATE_KEY", "4wBqpZM9xaSheZzJSMawUHDgZ7miWfSsxmfVF5jJpYP")
        .with("TELEGRAM_BOT_TOKEN", "telegram-token")
        .with("TELEGRAM_CHAT_ID", "-100123456")
}

pub fn fixture_snapshot() -> ConfigSnapshot {
    ConfigSnapshot::from_yaml_str(FIXTURE_YAML, &fixture_env()).expect("fixture config is valid")
}
