//! XMPP addresses.
//!
//! [`Address`] wraps a parsed JID and exposes the two forms the bot cares
//! about: the *bare* form (`user@domain`) and the *full* form
//! (`user@domain/resource`).

use std::fmt;
use std::str::FromStr;

use jid::Jid;

use crate::error::AddressError;

/// Resource the bot always binds under.
pub const BOT_RESOURCE: &str = "bot";

/// A JID, bare or full.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(Jid);

impl Address {
    /// Parse an address from its string form.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        Jid::new(input)
            .map(Self)
            .map_err(|source| AddressError::Invalid {
                input: input.to_owned(),
                source,
            })
    }

    /// The address without its resource part.
    #[must_use]
    pub fn bare(&self) -> Self {
        Self(Jid::from(self.0.to_bare()))
    }

    /// The bare form of this address with `resource` attached.
    pub fn with_resource(&self, resource: &str) -> Result<Self, AddressError> {
        let bare = self.0.to_bare();
        bare.with_resource_str(resource)
            .map(|full| Self(Jid::from(full)))
            .map_err(|source| AddressError::Resource {
                bare: bare.to_string(),
                resource: resource.to_owned(),
                source,
            })
    }

    /// The address the bot connects as: the configured account's bare form
    /// plus [`BOT_RESOURCE`], whatever resource the account string carried.
    pub fn bot_address(account: &str) -> Result<Self, AddressError> {
        Self::parse(account)?.with_resource(BOT_RESOURCE)
    }

    /// The resource part, if this is a full address.
    #[must_use]
    pub fn resource(&self) -> Option<String> {
        self.0.resource().map(|r| r.to_string())
    }

    /// Borrow the underlying JID.
    #[must_use]
    pub fn as_jid(&self) -> &Jid {
        &self.0
    }
}

impl From<Jid> for Address {
    fn from(jid: Jid) -> Self {
        Self(jid)
    }
}

impl From<Address> for Jid {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_address() {
        let addr = Address::parse("alice@example.com/phone").unwrap();
        assert_eq!(addr.to_string(), "alice@example.com/phone");
        assert_eq!(addr.resource().as_deref(), Some("phone"));
    }

    #[test]
    fn bare_strips_resource() {
        let addr = Address::parse("alice@example.com/phone").unwrap();
        assert_eq!(addr.bare().to_string(), "alice@example.com");
        assert!(addr.bare().resource().is_none());
    }

    #[test]
    fn bare_of_bare_is_identity() {
        let addr = Address::parse("alice@example.com").unwrap();
        assert_eq!(addr.bare(), addr);
    }

    #[test]
    fn bot_address_replaces_configured_resource() {
        let addr = Address::bot_address("bot@example.com/laptop").unwrap();
        assert_eq!(addr.to_string(), "bot@example.com/bot");
    }

    #[test]
    fn bot_address_from_bare_account() {
        let addr = Address::bot_address("bot@example.com").unwrap();
        assert_eq!(addr.to_string(), "bot@example.com/bot");
        assert_eq!(addr.resource().as_deref(), Some(BOT_RESOURCE));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Address::parse("").is_err());
        assert!(Address::parse("@example.com").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: Address = "carol@example.org/desk".parse().unwrap();
        assert_eq!(parsed, Address::parse("carol@example.org/desk").unwrap());
    }
}
