#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Configuration for the pingbot XMPP bot.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pingbot_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("logging in as {}", resolved.config.account.jid);
//! ```
//!
//! # Lookup order
//!
//! 1. The explicit path, if one is given (it must exist)
//! 2. `./config.toml`
//! 3. `config.toml` in the user's config directory
//!
//! The first file found is used; files are not merged. `PINGBOT_*`
//! environment variables then fill fields the file left out.
//!
//! This crate has no dependencies on other pingbot crates. Conversion to
//! domain types happens in the CLI.

/// Environment variable fallbacks.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, MAX_CONFIG_FILE_SIZE, SearchPaths};
pub use types::*;

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The validated configuration.
    pub config: Config,
    /// The file it was read from, if any.
    pub source: Option<PathBuf>,
    /// Number of fields filled from the environment.
    pub env_applied: usize,
}

impl Config {
    /// Load configuration using the standard lookup order.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the explicit file is missing, any file
    /// is malformed, or the result fails validation.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit)
    }

    /// Load configuration from a single file, without environment fallbacks.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
