//! Trading configuration CLI
//!
//! Loads and validates the trading configuration, then answers token, pair and
//! venue queries against the selected network environment.

use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use trading_config::config::ProcessEnv;
use trading_config::tools::ToolRegistry;
use trading_config::{ActiveScope, ConfigSnapshot, Error, Lookup, Result, DEFAULT_CONFIG_PATH};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "trading-config")]
#[command(about = "Resolve and query multi-chain trading configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Network environment to activate
    #[arg(short, long, global = true, default_value = "production")]
    env: String,

    /// Activate every configured chain instead of one environment
    #[arg(long, global = true, conflicts_with = "env")]
    all_chains: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and the selected environment
    Validate,

    /// Look up a token by symbol or address
    #[command(group(ArgGroup::new("key").required(true).args(["symbol", "address"])))]
    Token {
        /// Chain id (ethereum, base, solana, ...)
        #[arg(long)]
        chain: String,

        /// Token symbol
        symbol: Option<String>,

        /// Contract address or mint
        #[arg(long)]
        address: Option<String>,

        /// Human-readable amount to convert to base units
        #[arg(long)]
        amount: Option<String>,
    },

    /// Resolve a trading pair on a venue
    Pair {
        #[arg(long)]
        chain: String,

        #[arg(long)]
        venue: String,

        /// Pair as BASE_QUOTE
        pair: String,
    },

    /// List venues on a chain
    Venues {
        #[arg(long)]
        chain: String,
    },

    /// List portfolio wallets
    Wallets,

    /// Show the active configuration with secrets redacted
    Show,

    /// Invoke an agent tool with JSON arguments
    Tool {
        /// Tool name; omit to list available tools
        name: Option<String>,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let snapshot = Arc::new(ConfigSnapshot::load(&cli.config, &ProcessEnv)?);
    let scope = if cli.all_chains {
        ActiveScope::all(&snapshot)
    } else {
        ActiveScope::activate(&cli.env, &snapshot)?
    };
    let lookup = Lookup::new(snapshot, scope);

    match cli.command {
        Commands::Validate => {
            println!(
                "Configuration OK: {} active chains, {} active venue listings",
                lookup.scope().chains().len(),
                lookup.scope().venues().len()
            );
        }
        Commands::Token {
            chain,
            symbol,
            address,
            amount,
        } => {
            run_token(&lookup, &chain, symbol, address, amount)?;
        }
        Commands::Pair { chain, venue, pair } => {
            print_json(&lookup.pair(&chain, &venue, &pair)?)?;
        }
        Commands::Venues { chain } => {
            print_json(&lookup.venues_for_chain(&chain)?)?;
        }
        Commands::Wallets => {
            print_json(&lookup.wallets())?;
        }
        Commands::Show => {
            run_show(&lookup)?;
        }
        Commands::Tool { name, args } => {
            run_tool(lookup, name, args).await?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_token(
    lookup: &Lookup,
    chain: &str,
    symbol: Option<String>,
    address: Option<String>,
    amount: Option<String>,
) -> Result<()> {
    let token = match (symbol, address) {
        (Some(symbol), _) => lookup.token(chain, &symbol)?,
        (None, Some(address)) => lookup
            .token_by_address(chain, &address)?
            .ok_or_else(|| Error::InvalidArgument(format!("No token at {} on {}", address, chain)))?,
        (None, None) => {
            return Err(Error::InvalidArgument(
                "Either a symbol or --address is required".to_string(),
            ))
        }
    };

    match amount {
        Some(amount) => {
            let base_units = token.to_base_units(&amount)?;
            print_json(&json!({
                "token": token,
                "amount": amount,
                "base_units": base_units.to_string(),
            }))
        }
        None => print_json(token),
    }
}

fn run_show(lookup: &Lookup) -> Result<()> {
    let snapshot = lookup.snapshot();
    let chains: Vec<_> = lookup
        .scope()
        .chains()
        .iter()
        .filter_map(|chain| snapshot.chain(chain.as_str()))
        .collect();
    let venues: Vec<_> = lookup
        .scope()
        .venues()
        .iter()
        .filter_map(|(chain, venue)| snapshot.venue(chain.as_str(), venue.as_str()))
        .collect();

    print_json(&json!({
        "environment": lookup.scope().environment(),
        "chains": chains,
        "venues": venues,
        "telegram": snapshot.telegram().map(|t| json!({ "chat_id": t.chat_id })),
    }))
}

async fn run_tool(lookup: Lookup, name: Option<String>, args: String) -> Result<()> {
    let registry = ToolRegistry::new(lookup);

    let Some(name) = name else {
        for tool in registry.iter() {
            println!("{:<24} {}", tool.name(), tool.description());
        }
        return Ok(());
    };

    let args: serde_json::Value = serde_json::from_str(&args)?;
    let result = registry.call(&name, args).await?;
    print_json(&result)
}
