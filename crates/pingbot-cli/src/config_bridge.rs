//! Bridge from `pingbot_config::Config` to domain types.

use pingbot_config::Config;
use pingbot_core::{Address, AddressError, CommandProcessor, Credential, SessionParams, SystemRunner};
use pingbot_telemetry::{FileRotation, LogConfig, LogFormat, LogTarget};
use pingbot_xmpp::XmppConnector;

/// Directive added by `--debug` so every raw stanza is logged.
pub const STANZA_TRACE_DIRECTIVE: &str = "pingbot_xmpp=trace";

/// Convert config to a [`LogConfig`]. `debug` forces the debug level and
/// stanza tracing.
#[must_use]
pub fn to_log_config(cfg: &Config, debug: bool) -> LogConfig {
    let logging = &cfg.logging;
    let format = logging.format.parse().unwrap_or(LogFormat::Pretty);
    let level = if debug { "debug" } else { &logging.level };

    let mut log_config = LogConfig::new(level).with_format(format);

    log_config = match logging.target.as_str() {
        "file" => {
            let rotation = logging.rotation.parse().unwrap_or(FileRotation::Daily);
            log_config.with_file_logging(&logging.directory, rotation)
        },
        "stdout" => log_config.with_target(LogTarget::Stdout),
        _ => log_config.with_target(LogTarget::Stderr),
    };
    if logging.file_info {
        log_config = log_config.with_file_info();
    }
    if !logging.ansi {
        log_config = log_config.without_ansi();
    }

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }
    if debug {
        log_config = log_config.with_directive(STANZA_TRACE_DIRECTIVE);
    }

    log_config
}

/// Convert config to [`SessionParams`] for the bot's own address.
///
/// # Errors
///
/// Returns an [`AddressError`] if `account.jid` is not a valid address.
pub fn to_session_params(cfg: &Config) -> Result<SessionParams, AddressError> {
    let address = Address::bot_address(&cfg.account.jid)?;
    Ok(SessionParams::new(
        address,
        Credential::new(cfg.account.password.clone()),
    ))
}

/// Build the XMPP connector from the `[account]` section.
#[must_use]
pub fn to_connector(cfg: &Config) -> XmppConnector {
    XmppConnector::new().with_connect_timeout(cfg.account.connect_timeout())
}

/// Build the command processor from the `[command]` section.
#[must_use]
pub fn to_processor(cfg: &Config) -> CommandProcessor<SystemRunner> {
    CommandProcessor::new(SystemRunner::new(cfg.command.timeout()))
        .with_count(cfg.command.ping_count)
}
