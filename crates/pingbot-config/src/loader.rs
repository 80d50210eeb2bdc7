//! Config file discovery and loading.
//!
//! `load()` works as follows:
//! 1. Pick the first existing file from [`SearchPaths`]
//! 2. Parse it into a TOML tree (an empty tree if there is none)
//! 3. Apply env var fallbacks for unset fields
//! 4. Deserialize the tree into a [`Config`]
//! 5. Validate

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::ResolvedConfig;
use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// File name looked up in each search directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum config file size (64 KiB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Directories searched when no explicit path is given.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    /// Usually the current directory.
    pub working_dir: Option<PathBuf>,
    /// The per-user config directory.
    pub user_dir: Option<PathBuf>,
}

impl SearchPaths {
    /// The current directory and the platform's config directory for pingbot.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            working_dir: std::env::current_dir().ok(),
            user_dir: directories::ProjectDirs::from("", "", "pingbot")
                .map(|d| d.config_dir().to_path_buf()),
        }
    }

    fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        [&self.working_dir, &self.user_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
    }
}

/// Load configuration from the standard locations and the process
/// environment.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the explicit file is missing, a file is
/// malformed, or the result fails validation.
pub fn load(explicit: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    load_from(explicit, &SearchPaths::standard(), &collect_env_vars())
}

/// Load configuration with explicit search paths and environment.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_from<S: BuildHasher>(
    explicit: Option<&Path>,
    search: &SearchPaths,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    let (mut tree, source) = if let Some(path) = explicit {
        let tree = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })?;
        (tree, Some(path.to_path_buf()))
    } else {
        discover(search)?
    };

    match &source {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => info!("no config file found, using defaults and environment"),
    }

    let env_applied = apply_env_fallbacks(&mut tree, env_vars);
    let config = into_config(tree, source.as_deref())?;

    Ok(ResolvedConfig {
        config,
        source,
        env_applied,
    })
}

/// Load configuration from a single file, without environment fallbacks.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let tree = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    })?;
    into_config(tree, Some(path))
}

fn discover(search: &SearchPaths) -> ConfigResult<(toml::Value, Option<PathBuf>)> {
    for path in search.candidates() {
        if let Some(tree) = try_load_file(&path)? {
            return Ok((tree, Some(path)));
        }
    }
    Ok((toml::Value::Table(toml::map::Map::new()), None))
}

fn into_config(tree: toml::Value, source: Option<&Path>) -> ConfigResult<Config> {
    let config = tree.try_into::<Config>().map_err(|e| ConfigError::ParseError {
        path: source.map_or_else(|| "<environment>".to_owned(), |p| p.display().to_string()),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Read and parse a config file. Returns `None` if the file does not exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    // Checked after reading so the size cannot change in between.
    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len(),
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}
