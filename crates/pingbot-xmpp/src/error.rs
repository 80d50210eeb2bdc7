//! Error types for the XMPP transport.

use pingbot_core::AddressError;
use thiserror::Error;

/// Errors converting between wire elements and stanzas.
#[derive(Debug, Error)]
pub enum XmppError {
    /// The element is not a message, presence or iq.
    #[error("unsupported stanza <{name}>")]
    UnknownStanza {
        /// Element name.
        name: String,
    },

    /// An addressing attribute does not hold a valid address.
    #[error("invalid '{attr}' attribute: {source}")]
    BadAddress {
        /// Attribute name (`from` or `to`).
        attr: &'static str,
        /// Parse failure.
        #[source]
        source: AddressError,
    },
}

/// Result type for XMPP transport operations.
pub type XmppResult<T> = Result<T, XmppError>;
