//! Configuration
//!
//! Settings shared by every `storefront` subcommand. Values come from flags or
//! the environment; a `.env` file is loaded first when present.

use std::path::PathBuf;

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code is not a known ISO currency.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Storefront settings
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Directory the cart and wishlist are stored in
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = "./.storefront", global = true)]
    pub data_dir: PathBuf,

    /// Base directory of the catalog fixtures
    #[arg(long, env = "STOREFRONT_FIXTURES", default_value = "./fixtures", global = true)]
    pub fixtures: PathBuf,

    /// Fixture set to load the catalog from
    #[arg(long, env = "STOREFRONT_FIXTURE_SET", default_value = "default", global = true)]
    pub fixture_set: String,

    /// ISO currency code for prices
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "NGN", global = true)]
    pub currency: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not recognised.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_uppercase();

        iso::find(&code).ok_or(ConfigError::UnknownCurrency(code))
    }
}
