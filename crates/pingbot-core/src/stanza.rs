//! Typed stanza model.
//!
//! Inbound events are a closed sum type so the session loop dispatches them
//! with an exhaustive `match`: a new stanza kind cannot be added without the
//! loop deciding what to do with it.

use std::fmt;

use uuid::Uuid;

use crate::address::Address;

/// One discrete unit of the XMPP event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stanza {
    /// A `<message/>`.
    Message(Message),
    /// A `<presence/>`.
    Presence(Presence),
    /// An `<iq/>` query.
    Query(Query),
}

impl Stanza {
    /// Sender of the stanza, if the stream carried one.
    #[must_use]
    pub fn sender(&self) -> Option<&Address> {
        match self {
            Self::Message(m) => m.from.as_ref(),
            Self::Presence(p) => p.from.as_ref(),
            Self::Query(q) => q.from.as_ref(),
        }
    }

    /// Short name of the stanza kind, for logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Presence(_) => "presence",
            Self::Query(_) => "iq",
        }
    }
}

impl From<Message> for Stanza {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Presence> for Stanza {
    fn from(presence: Presence) -> Self {
        Self::Presence(presence)
    }
}

impl From<Query> for Stanza {
    fn from(query: Query) -> Self {
        Self::Query(query)
    }
}

/// The `type` attribute of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// One-to-one chat.
    Chat,
    /// Error reply.
    Error,
    /// Multi-user chat.
    Groupchat,
    /// Alert/notification.
    Headline,
    /// Standalone message (the protocol default).
    #[default]
    Normal,
}

impl MessageType {
    /// Wire form of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Error => "error",
            Self::Groupchat => "groupchat",
            Self::Headline => "headline",
            Self::Normal => "normal",
        }
    }

    /// Parse the wire form. Unknown values fall back to [`MessageType::Normal`],
    /// as the protocol requires.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "chat" => Self::Chat,
            "error" => Self::Error,
            "groupchat" => Self::Groupchat,
            "headline" => Self::Headline,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Sender.
    pub from: Option<Address>,
    /// Recipient.
    pub to: Option<Address>,
    /// Stanza id.
    pub id: Option<String>,
    /// Message type.
    pub kind: MessageType,
    /// `xml:lang` of the message.
    pub lang: Option<String>,
    /// Text body. Absent for chat-state notifications and the like.
    pub body: Option<String>,
    /// Opaque thread correlation token.
    pub thread: Option<String>,
}

/// A presence update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presence {
    /// Sender.
    pub from: Option<Address>,
    /// Recipient.
    pub to: Option<Address>,
    /// Stanza id.
    pub id: Option<String>,
    /// Raw `type` attribute (`None` means available).
    pub kind: Option<String>,
}

impl Presence {
    /// An untyped, unaddressed presence: "available" broadcast.
    #[must_use]
    pub fn available() -> Self {
        Self::default()
    }
}

/// An info/query request or response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Sender.
    pub from: Option<Address>,
    /// Recipient.
    pub to: Option<Address>,
    /// Stanza id.
    pub id: Option<String>,
    /// Raw `type` attribute (`get`, `set`, `result`, `error`).
    pub kind: Option<String>,
}

/// Generate a fresh stanza id.
///
/// Ids are random v4 UUIDs, so they never repeat within a process.
#[must_use]
pub fn next_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_round_trips_known_values() {
        for kind in [
            MessageType::Chat,
            MessageType::Error,
            MessageType::Groupchat,
            MessageType::Headline,
            MessageType::Normal,
        ] {
            assert_eq!(MessageType::parse(kind.as_str()), kind);
        }
    }

    #[test]
    fn message_type_unknown_is_normal() {
        assert_eq!(MessageType::parse("bogus"), MessageType::Normal);
        assert_eq!(MessageType::parse(""), MessageType::Normal);
    }

    #[test]
    fn next_id_is_unique_and_non_empty() {
        let a = next_id();
        let b = next_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn stanza_accessors() {
        let from = Address::parse("alice@example.com/phone").unwrap();
        let stanza = Stanza::from(Presence {
            from: Some(from.clone()),
            id: Some("p1".to_string()),
            ..Presence::default()
        });
        assert_eq!(stanza.sender(), Some(&from));
        assert_eq!(stanza.kind_name(), "presence");
    }
}
