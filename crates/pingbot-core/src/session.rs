//! The session handle and the traits the transport implements.
//!
//! A [`Session`] owns one transport connection. The session loop reads its
//! two receive-only channels; the command processor writes to its bounded
//! outbound queue. The transport is released exactly once, either by an
//! explicit [`Session::close`] or when the session is dropped.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::address::Address;
use crate::error::SessionResult;
use crate::stanza::{Presence, Stanza};
use crate::status::ConnectionStatus;

/// Default depth of the status channel.
pub const STATUS_CHANNEL_CAPACITY: usize = 10;

/// Default depth of the inbound and outbound stanza queues.
pub const STANZA_QUEUE_CAPACITY: usize = 64;

/// The account password. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Expose the secret to the transport.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Certificate verification policy for the TLS layer.
///
/// Only full verification is offered; the transport has no way to skip it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Verify the server certificate chain and hostname.
    #[default]
    Verify,
}

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionParams {
    /// Full address to bind as.
    pub address: Address,
    /// Account password.
    pub credential: Credential,
    /// TLS verification policy.
    pub tls: TlsPolicy,
    /// Presence broadcast once the session is online.
    pub initial_presence: Presence,
    /// Depth of the status channel.
    pub status_capacity: usize,
}

impl SessionParams {
    /// Parameters with the default TLS policy, an available presence and a
    /// status channel of [`STATUS_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new(address: Address, credential: Credential) -> Self {
        Self {
            address,
            credential,
            tls: TlsPolicy::default(),
            initial_presence: Presence::available(),
            status_capacity: STATUS_CHANNEL_CAPACITY,
        }
    }
}

/// Opens sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish an authenticated session.
    async fn connect(&self, params: SessionParams) -> SessionResult<Session>;
}

/// The live connection behind a [`Session`].
pub trait Transport: Send {
    /// Release the connection. Must tolerate being called more than once.
    fn close(&mut self);
}

/// Send side of the outbound stanza queue.
///
/// Cheap to clone; every clone feeds the same transport.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    tx: mpsc::Sender<Stanza>,
}

impl OutboundQueue {
    /// Wrap a channel sender.
    #[must_use]
    pub fn new(tx: mpsc::Sender<Stanza>) -> Self {
        Self { tx }
    }

    /// Enqueue a stanza, waiting for room if the queue is full.
    ///
    /// Returns `false` when the transport has gone away.
    pub async fn send(&self, stanza: impl Into<Stanza>) -> bool {
        let stanza = stanza.into();
        let kind = stanza.kind_name();
        if self.tx.send(stanza).await.is_ok() {
            true
        } else {
            warn!(kind, "outbound queue closed, dropping stanza");
            false
        }
    }
}

/// One connection to the server.
pub struct Session {
    address: Address,
    outbound: OutboundQueue,
    inbound: mpsc::Receiver<Stanza>,
    status: mpsc::Receiver<ConnectionStatus>,
    transport: Box<dyn Transport>,
    closed: bool,
}

impl Session {
    /// Assemble a session from its channels and transport.
    #[must_use]
    pub fn new(
        address: Address,
        outbound: mpsc::Sender<Stanza>,
        inbound: mpsc::Receiver<Stanza>,
        status: mpsc::Receiver<ConnectionStatus>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            address,
            outbound: OutboundQueue::new(outbound),
            inbound,
            status,
            transport,
            closed: false,
        }
    }

    /// Address the session is bound as.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Handle to the outbound queue.
    #[must_use]
    pub fn outbound(&self) -> OutboundQueue {
        self.outbound.clone()
    }

    /// Both receive channels, borrowed together for multiplexed waiting.
    pub(crate) fn receivers(
        &mut self,
    ) -> (
        &mut mpsc::Receiver<ConnectionStatus>,
        &mut mpsc::Receiver<Stanza>,
    ) {
        (&mut self.status, &mut self.inbound)
    }

    /// Whether [`Session::close`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the transport. Later calls do nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        debug!(address = %self.address, "closing session");
        self.transport.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
