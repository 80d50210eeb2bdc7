//! Conversion between `minidom` elements and [`Stanza`] values.
//!
//! Only the fields the bot reads or writes are carried; everything else on
//! an inbound element is ignored.

use minidom::Element;
use pingbot_core::{Address, Message, MessageType, Presence, Query, Stanza};

use crate::error::{XmppError, XmppResult};

/// Namespace of client stanzas.
pub const NS_CLIENT: &str = "jabber:client";

/// Attribute carrying the message language.
const LANG_ATTR: &str = "xml:lang";

/// Decode an inbound element.
///
/// # Errors
///
/// Returns [`XmppError::UnknownStanza`] for anything but message, presence
/// and iq, and [`XmppError::BadAddress`] if `from` or `to` is malformed.
pub fn decode(elem: &Element) -> XmppResult<Stanza> {
    let from = address_attr(elem, "from")?;
    let to = address_attr(elem, "to")?;
    let id = elem.attr("id").map(str::to_owned);
    let kind = elem.attr("type").map(str::to_owned);

    match elem.name() {
        "message" => Ok(Stanza::Message(Message {
            from,
            to,
            id,
            kind: kind.as_deref().map(MessageType::parse).unwrap_or_default(),
            lang: elem.attr(LANG_ATTR).map(str::to_owned),
            body: child_text(elem, "body"),
            thread: child_text(elem, "thread"),
        })),
        "presence" => Ok(Stanza::Presence(Presence { from, to, id, kind })),
        "iq" => Ok(Stanza::Query(Query { from, to, id, kind })),
        other => Err(XmppError::UnknownStanza {
            name: other.to_owned(),
        }),
    }
}

/// Encode an outbound stanza.
#[must_use]
pub fn encode(stanza: &Stanza) -> Element {
    match stanza {
        Stanza::Message(m) => {
            let mut builder = Element::builder("message", NS_CLIENT)
                .attr("from", m.from.as_ref().map(ToString::to_string))
                .attr("to", m.to.as_ref().map(ToString::to_string))
                .attr("id", m.id.clone())
                .attr("type", m.kind.as_str())
                .attr(LANG_ATTR, m.lang.clone());
            if let Some(body) = &m.body {
                builder = builder.append(text_child("body", body));
            }
            if let Some(thread) = &m.thread {
                builder = builder.append(text_child("thread", thread));
            }
            builder.build()
        },
        Stanza::Presence(p) => header("presence", p.from.as_ref(), p.to.as_ref(), p.id.as_ref())
            .attr("type", p.kind.clone())
            .build(),
        Stanza::Query(q) => header("iq", q.from.as_ref(), q.to.as_ref(), q.id.as_ref())
            .attr("type", q.kind.clone())
            .build(),
    }
}

fn header(
    name: &str,
    from: Option<&Address>,
    to: Option<&Address>,
    id: Option<&String>,
) -> minidom::element::ElementBuilder {
    Element::builder(name, NS_CLIENT)
        .attr("from", from.map(ToString::to_string))
        .attr("to", to.map(ToString::to_string))
        .attr("id", id.cloned())
}

fn text_child(name: &str, text: &str) -> Element {
    Element::builder(name, NS_CLIENT).append(text).build()
}

fn child_text(elem: &Element, name: &str) -> Option<String> {
    elem.get_child(name, NS_CLIENT).map(Element::text)
}

fn address_attr(elem: &Element, attr: &'static str) -> XmppResult<Option<Address>> {
    elem.attr(attr)
        .map(Address::parse)
        .transpose()
        .map_err(|source| XmppError::BadAddress { attr, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(body: &str) -> Element {
        Element::builder("message", NS_CLIENT)
            .attr("from", "alice@example.com/phone")
            .attr("to", "bot@example.com/bot")
            .attr("id", "m1")
            .attr("type", "chat")
            .append(text_child("body", body))
            .build()
    }

    #[test]
    fn decodes_chat_message() {
        let Stanza::Message(m) = decode(&chat("ping example.com")).unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(m.from.unwrap().to_string(), "alice@example.com/phone");
        assert_eq!(m.to.unwrap().to_string(), "bot@example.com/bot");
        assert_eq!(m.id.as_deref(), Some("m1"));
        assert_eq!(m.kind, MessageType::Chat);
        assert_eq!(m.body.as_deref(), Some("ping example.com"));
        assert!(m.thread.is_none());
    }

    #[test]
    fn message_without_type_is_normal() {
        let elem = Element::builder("message", NS_CLIENT)
            .attr("from", "alice@example.com")
            .build();
        let Stanza::Message(m) = decode(&elem).unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(m.kind, MessageType::Normal);
        assert!(m.body.is_none());
    }

    #[test]
    fn decodes_thread() {
        let elem = Element::builder("message", NS_CLIENT)
            .attr("type", "chat")
            .append(text_child("body", "hi"))
            .append(text_child("thread", "t-1"))
            .build();
        let Stanza::Message(m) = decode(&elem).unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(m.thread.as_deref(), Some("t-1"));
    }

    #[test]
    fn decodes_presence_and_iq() {
        let presence = Element::builder("presence", NS_CLIENT)
            .attr("from", "alice@example.com/phone")
            .attr("type", "unavailable")
            .build();
        let iq = Element::builder("iq", NS_CLIENT)
            .attr("from", "example.com")
            .attr("id", "q1")
            .attr("type", "get")
            .build();

        assert!(matches!(
            decode(&presence).unwrap(),
            Stanza::Presence(Presence { kind: Some(ref k), .. }) if k == "unavailable"
        ));
        assert!(matches!(
            decode(&iq).unwrap(),
            Stanza::Query(Query { kind: Some(ref k), .. }) if k == "get"
        ));
    }

    #[test]
    fn unknown_element_is_rejected() {
        let elem = Element::builder("r", "urn:xmpp:sm:3").build();
        assert!(matches!(
            decode(&elem),
            Err(XmppError::UnknownStanza { ref name }) if name == "r"
        ));
    }

    #[test]
    fn malformed_address_is_rejected() {
        let elem = Element::builder("message", NS_CLIENT)
            .attr("from", "@")
            .build();
        assert!(matches!(
            decode(&elem),
            Err(XmppError::BadAddress { attr: "from", .. })
        ));
    }

    #[test]
    fn encodes_reply() {
        let reply = Message {
            from: Some(Address::parse("bot@example.com/bot").unwrap()),
            to: Some(Address::parse("alice@example.com/phone").unwrap()),
            id: Some("r1".to_owned()),
            kind: MessageType::Chat,
            lang: Some("en".to_owned()),
            body: Some("5 packets transmitted".to_owned()),
            thread: Some("t-1".to_owned()),
        };
        let elem = encode(&Stanza::Message(reply));

        assert_eq!(elem.name(), "message");
        assert_eq!(elem.ns(), NS_CLIENT);
        assert_eq!(elem.attr("from"), Some("bot@example.com/bot"));
        assert_eq!(elem.attr("to"), Some("alice@example.com/phone"));
        assert_eq!(elem.attr("id"), Some("r1"));
        assert_eq!(elem.attr("type"), Some("chat"));
        assert_eq!(elem.attr(LANG_ATTR), Some("en"));
        assert_eq!(child_text(&elem, "body").as_deref(), Some("5 packets transmitted"));
        assert_eq!(child_text(&elem, "thread").as_deref(), Some("t-1"));
    }

    #[test]
    fn available_presence_has_no_type() {
        let elem = encode(&Stanza::Presence(Presence::available()));
        assert_eq!(elem.name(), "presence");
        assert!(elem.attr("type").is_none());
        assert!(elem.attr("to").is_none());
    }

    #[test]
    fn empty_body_is_still_sent() {
        let elem = encode(&Stanza::Message(Message {
            kind: MessageType::Chat,
            body: Some(String::new()),
            ..Message::default()
        }));
        assert!(elem.get_child("body", NS_CLIENT).is_some());
    }
}
