//! Environment variable fallbacks.
//!
//! Env vars are a fallback, not an override: they only fill fields the
//! config file did not set.

use std::collections::HashMap;

use tracing::debug;

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `PINGBOT_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "PINGBOT_JID",
        field_path: "account.jid",
    },
    EnvMapping {
        var_name: "PINGBOT_PASSWORD",
        field_path: "account.password",
    },
    EnvMapping {
        var_name: "PINGBOT_LOG_LEVEL",
        field_path: "logging.level",
    },
];

/// Fill fields missing from `tree` with their environment values.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    tree: &mut toml::Value,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if has_field(tree, mapping.field_path) {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );
            set_field(tree, mapping.field_path, val);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

fn has_field(root: &toml::Value, path: &str) -> bool {
    path.split('.')
        .try_fold(root, |current, segment| current.get(segment))
        .is_some()
}

/// Set a string field, creating intermediate tables as needed.
fn set_field(root: &mut toml::Value, path: &str, val: &str) {
    let mut segments = path.split('.').peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        if segments.peek().is_none() {
            table.insert(segment.to_owned(), toml::Value::String(val.to_owned()));
            return;
        }
        current = table
            .entry(segment)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
}
