//! Error types for configuration loading and lookups

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing secret: environment variable {0} is not set or empty")]
    MissingSecret(String),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigShape { path: String, reason: String },

    #[error("Dangling reference at {path}: {reason}")]
    ReferentialIntegrity { path: String, reason: String },

    #[error("Duplicate entry at {path}: {key}")]
    DuplicateEntry { path: String, key: String },

    #[error("Unknown network environment: {0}")]
    UnknownEnvironment(String),

    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Chain {0} is not active in the selected network environment")]
    ChainNotActive(String),

    #[error("Unknown trading venue {venue} on chain {chain}")]
    UnknownVenue { chain: String, venue: String },

    #[error("Unknown token {symbol} on chain {chain}")]
    UnknownToken { chain: String, symbol: String },

    #[error("Pair {pair} is not supported by {venue} on chain {chain}")]
    UnsupportedPair {
        chain: String,
        venue: String,
        pair: String,
    },

    #[error("Malformed pair {0:?}: expected two symbols joined by '_'")]
    MalformedPair(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn shape(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ConfigShape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Lookup errors a caller can report and move on from.
    ///
    /// Everything else is raised while building the snapshot and must abort startup.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownChain(_)
                | Error::ChainNotActive(_)
                | Error::UnknownVenue { .. }
                | Error::UnknownToken { .. }
                | Error::UnsupportedPair { .. }
                | Error::MalformedPair(_)
                | Error::InvalidArgument(_)
                | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
