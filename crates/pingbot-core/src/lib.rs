//! Pingbot Core - session lifecycle and event dispatch for the pingbot XMPP bot.
//!
//! This crate provides:
//! - A typed stanza model ([`Stanza`], [`Message`], [`Presence`], [`Query`])
//! - Connection status labelling and logging ([`ConnectionStatus`])
//! - The reply builder and the `ping` command processor
//! - The session loop that supervises one [`Session`] until it ends
//!
//! The protocol itself lives behind the [`Connector`] and [`Transport`]
//! traits; `pingbot-xmpp` provides the production implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use pingbot_core::{CommandProcessor, SessionParams, SystemRunner, bot};
//!
//! let processor = CommandProcessor::new(SystemRunner::default());
//! let exit = bot::run(&connector, params, &processor).await?;
//! tracing::info!(?exit, "session ended");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod address;
pub mod bot;
pub mod command;
pub mod error;
pub mod reply;
pub mod runner;
pub mod session;
pub mod stanza;
pub mod status;

pub use address::{Address, BOT_RESOURCE};
pub use bot::LoopExit;
pub use command::{CommandProcessor, PING_COUNT, PING_PROGRAM, parse_ping_target};
pub use error::{AddressError, ExecError, SessionError, SessionResult};
pub use reply::{REPLY_LANG, build_reply};
pub use runner::{CommandOutput, DEFAULT_TIMEOUT, ProcessRunner, SystemRunner};
pub use session::{
    Connector, Credential, OutboundQueue, STANZA_QUEUE_CAPACITY, STATUS_CHANNEL_CAPACITY, Session,
    SessionParams, TlsPolicy, Transport,
};
pub use stanza::{Message, MessageType, Presence, Query, Stanza, next_id};
pub use status::{ConnectionStatus, log_status};
