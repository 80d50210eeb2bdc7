//! Pingbot Telemetry - logging setup for the pingbot XMPP bot.
//!
//! This crate provides:
//! - [`LogConfig`] describing level, format, target and per-module directives
//! - [`setup_logging`], which installs a global `tracing` subscriber
//!
//! # Example
//!
//! ```rust,no_run
//! use pingbot_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), pingbot_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("pingbot_xmpp=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{FileRotation, LogConfig, LogFormat, LogTarget, setup_logging};
