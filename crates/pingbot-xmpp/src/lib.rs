//! Pingbot XMPP - the `tokio-xmpp` transport behind the pingbot session loop.
//!
//! [`XmppConnector`] implements [`pingbot_core::Connector`]; [`codec`]
//! converts wire elements to and from [`pingbot_core::Stanza`].
//!
//! Raw stanzas are logged at `trace` level under this crate's target, so
//! `pingbot_xmpp=trace` shows the protocol exchange.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
pub mod connector;
pub mod error;

pub use connector::{CONNECT_TIMEOUT, XmppConnector};
pub use error::{XmppError, XmppResult};
