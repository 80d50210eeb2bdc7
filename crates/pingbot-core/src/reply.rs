//! Reply construction.

use crate::stanza::{Message, MessageType, next_id};

/// Language tag stamped on every reply.
pub const REPLY_LANG: &str = "en";

/// Build a chat reply to `inbound` carrying `body`.
///
/// Sender and recipient are swapped, the thread token is carried over when
/// present, and the reply gets a fresh id.
pub fn build_reply(inbound: &Message, body: impl Into<String>) -> Message {
    Message {
        from: inbound.to.clone(),
        to: inbound.from.clone(),
        id: Some(next_id()),
        kind: MessageType::Chat,
        lang: Some(REPLY_LANG.to_owned()),
        body: Some(body.into()),
        thread: inbound.thread.clone(),
    }
}
