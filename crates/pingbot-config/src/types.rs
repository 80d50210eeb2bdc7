use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Every section defaults to usable values except the account credentials,
/// which must come from the file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// XMPP account the bot logs in with.
    pub account: AccountSection,
    /// Diagnostic command settings.
    pub command: CommandSection,
    /// Logging level, format, destination and directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// AccountSection
// ---------------------------------------------------------------------------

/// The `[account]` section.
///
/// Unknown keys are rejected so a stale setting is never silently ignored.
/// There is no TLS switch: the server certificate is always verified.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountSection {
    /// Account address. Any resource is replaced with `bot`.
    pub jid: String,
    /// Account password.
    pub password: String,
    /// Seconds allowed for connecting and authenticating.
    pub connect_timeout_secs: u64,
}

impl Default for AccountSection {
    fn default() -> Self {
        Self {
            jid: String::new(),
            password: String::new(),
            connect_timeout_secs: 30,
        }
    }
}

impl AccountSection {
    /// The connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl std::fmt::Debug for AccountSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSection")
            .field("jid", &self.jid)
            .field("has_password", &!self.password.is_empty())
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CommandSection
// ---------------------------------------------------------------------------

/// The `[command]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSection {
    /// Seconds before a diagnostic process is killed.
    pub timeout_secs: u64,
    /// Echo requests per `ping` command.
    pub ping_count: u32,
}

impl Default for CommandSection {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            ping_count: 5,
        }
    }
}

impl CommandSection {
    /// The process timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// The `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Base level ("trace", "debug", "info", "warn", "error").
    pub level: String,
    /// Line format ("pretty", "compact", "json", "full").
    pub format: String,
    /// Extra filter directives, e.g. `pingbot_xmpp=trace`.
    pub directives: Vec<String>,
    /// Destination ("stderr", "stdout", "file").
    pub target: String,
    /// Directory for rolling log files when `target` is "file".
    pub directory: PathBuf,
    /// File rollover ("daily", "hourly", "never").
    pub rotation: String,
    /// Include source file and line in each event.
    pub file_info: bool,
    /// Colored output on terminals. Files are never colored.
    pub ansi: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
            target: "stderr".to_owned(),
            directory: PathBuf::from("logs"),
            rotation: "daily".to_owned(),
            file_info: false,
            ansi: true,
        }
    }
}
