//! Test fixtures for common types.

use pingbot_core::{Address, Message, MessageType, Presence, Query};

/// Full address of the remote user in most tests.
pub const ALICE: &str = "alice@example.com/phone";

/// Full address the bot binds as in most tests.
pub const BOT: &str = "bot@example.com/bot";

/// Parse a fixture address.
///
/// # Panics
///
/// Panics if `jid` is not a valid address.
#[must_use]
pub fn test_address(jid: &str) -> Address {
    Address::parse(jid).expect("fixture address must parse")
}

/// A chat message from [`ALICE`] to [`BOT`] with the given body.
#[must_use]
pub fn alice_message(body: &str) -> Message {
    Message {
        from: Some(test_address(ALICE)),
        to: Some(test_address(BOT)),
        id: Some("alice-1".to_string()),
        kind: MessageType::Chat,
        lang: None,
        body: Some(body.to_string()),
        thread: None,
    }
}

/// Same as [`alice_message`], inside a conversation thread.
#[must_use]
pub fn alice_message_in_thread(body: &str, thread: &str) -> Message {
    Message {
        thread: Some(thread.to_string()),
        ..alice_message(body)
    }
}

/// An available presence from [`ALICE`].
#[must_use]
pub fn alice_presence() -> Presence {
    Presence {
        from: Some(test_address(ALICE)),
        to: Some(test_address(BOT)),
        id: Some("alice-p1".to_string()),
        kind: None,
    }
}

/// A `get` query from the server.
#[must_use]
pub fn server_query() -> Query {
    Query {
        from: Some(test_address("example.com")),
        to: Some(test_address(BOT)),
        id: Some("iq-1".to_string()),
        kind: Some("get".to_string()),
    }
}
