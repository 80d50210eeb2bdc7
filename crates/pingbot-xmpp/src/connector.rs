//! [`Connector`] implementation on top of `tokio-xmpp`.
//!
//! `connect` drives the client until it is online (or fails), then hands the
//! stream to a background relay that shuttles stanzas between the socket and
//! the session's channels:
//!
//! ```text
//!   socket ──Event::Stanza──▶ decode ──▶ inbound  ──▶ session loop
//!   socket ◀──send_stanza─── encode ◀── outbound ◀── OutboundQueue
//!          status ◀── Running / Error / Shutdown
//! ```
//!
//! The relay holds at most one decoded stanza while the inbound queue is
//! full and stops reading the socket until it is delivered. Outbound
//! stanzas and the stop signal are served throughout, so a session loop
//! blocked on a full outbound queue never waits on the relay.
//!
//! `tokio-xmpp` does not report the intermediate negotiation steps, so only
//! `Unconnected`, `Running`, `Error` and `Shutdown` are ever published.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::{Stream, StreamExt};
use minidom::Element;
use pingbot_core::{
    ConnectionStatus, Connector, STANZA_QUEUE_CAPACITY, Session, SessionError, SessionParams,
    SessionResult, Stanza, Transport,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_xmpp::{AsyncClient as Client, Event};
use tracing::{debug, info, trace, warn};

use crate::codec;

/// How long `connect` waits for the session to come online.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Opens XMPP client sessions over STARTTLS with certificate verification.
///
/// Clones share the set of running relays, so [`XmppConnector::finish`] on
/// any clone waits for every session opened through the others.
#[derive(Debug, Clone)]
pub struct XmppConnector {
    connect_timeout: Duration,
    relays: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl XmppConnector {
    /// A connector using [`CONNECT_TIMEOUT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            relays: Arc::default(),
        }
    }

    /// Override the time allowed for connecting and authenticating.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Wait up to `grace` for every relay to end its stream.
    ///
    /// Closing a session only signals its relay; call this before the
    /// runtime shuts down so the closing `</stream:stream>` reaches the
    /// server. Returns `false` if some relay was still running when the
    /// grace period ran out. Those relays are left detached.
    pub async fn finish(&self, grace: Duration) -> bool {
        let relays = {
            let mut relays = self.relays.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *relays)
        };
        if relays.is_empty() {
            return true;
        }

        let pending = relays.len();
        if tokio::time::timeout(grace, futures::future::join_all(relays))
            .await
            .is_ok()
        {
            debug!(relays = pending, "transport finished");
            true
        } else {
            warn!(
                relays = pending,
                grace_ms = grace.as_millis(),
                "transport did not finish in time"
            );
            false
        }
    }

    fn track(&self, relay: JoinHandle<()>) {
        let mut relays = self.relays.lock().unwrap_or_else(PoisonError::into_inner);
        relays.retain(|r| !r.is_finished());
        relays.push(relay);
    }
}

impl Default for XmppConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for XmppConnector {
    async fn connect(&self, params: SessionParams) -> SessionResult<Session> {
        debug!(jid = %params.address, tls = ?params.tls, "connecting");

        let (status_tx, status_rx) = mpsc::channel(params.status_capacity.max(1));
        publish(&status_tx, ConnectionStatus::Unconnected);

        let mut client = Client::new(
            params.address.as_jid().clone(),
            params.credential.expose().to_owned(),
        );
        client.set_reconnect(false);

        let bound = tokio::time::timeout(self.connect_timeout, wait_online(&mut client))
            .await
            .map_err(|_| {
                SessionError::Connect(format!(
                    "not online after {}s",
                    self.connect_timeout.as_secs()
                ))
            })??;
        info!(jid = %bound, "online");

        let presence = codec::encode(&Stanza::Presence(params.initial_presence.clone()));
        trace!(stanza = ?presence, "send");
        client
            .send_stanza(presence)
            .await
            .map_err(|e| SessionError::Connect(format!("initial presence: {e}")))?;
        publish(&status_tx, ConnectionStatus::Running);

        let (out_tx, out_rx) = mpsc::channel(STANZA_QUEUE_CAPACITY);
        let (in_tx, in_rx) = mpsc::channel(STANZA_QUEUE_CAPACITY);
        let (stop_tx, stop_rx) = oneshot::channel();

        self.track(tokio::spawn(relay(
            client,
            Outlet {
                send: |client, elem| {
                    Box::pin(async move {
                        client.send_stanza(elem).await.map_err(|e| e.to_string())
                    })
                },
                end: |client| {
                    Box::pin(async move { client.send_end().await.map_err(|e| e.to_string()) })
                },
            },
            Channels {
                outbound: out_rx,
                inbound: in_tx,
                status: status_tx,
                stop: stop_rx,
            },
        )));

        Ok(Session::new(
            params.address,
            out_tx,
            in_rx,
            status_rx,
            Box::new(XmppTransport {
                stop: Some(stop_tx),
            }),
        ))
    }
}

/// Handle on the background relay. Closing asks it to end the stream.
#[derive(Debug)]
struct XmppTransport {
    stop: Option<oneshot::Sender<()>>,
}

impl Transport for XmppTransport {
    fn close(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The relay may already be gone after a disconnect.
            let _ = stop.send(());
        }
    }
}

/// Write side of a wire: how the relay sends a stanza and ends the stream.
struct Outlet<W> {
    send: for<'a> fn(&'a mut W, Element) -> BoxFuture<'a, Result<(), String>>,
    end: for<'a> fn(&'a mut W) -> BoxFuture<'a, Result<(), String>>,
}

/// The session side of a relay.
struct Channels {
    outbound: mpsc::Receiver<Stanza>,
    inbound: mpsc::Sender<Stanza>,
    status: mpsc::Sender<ConnectionStatus>,
    stop: oneshot::Receiver<()>,
}

/// What the relay does with one wire event.
#[derive(Debug)]
enum Step {
    Deliver(Stanza),
    Skip,
    Stop,
}

/// Shuttle stanzas until stopped, disconnected or abandoned by the session.
async fn relay<W>(mut wire: W, outlet: Outlet<W>, mut channels: Channels)
where
    W: Stream<Item = Event> + Unpin,
{
    let mut pending: Option<Stanza> = None;
    loop {
        tokio::select! {
            biased;

            _ = &mut channels.stop => {
                debug!("closing stream");
                if let Err(e) = (outlet.end)(&mut wire).await {
                    debug!(error = %e, "error while ending stream");
                }
                publish(&channels.status, ConnectionStatus::Shutdown);
                break;
            },
            Some(stanza) = channels.outbound.recv() => {
                let elem = codec::encode(&stanza);
                trace!(stanza = ?elem, "send");
                if let Err(e) = (outlet.send)(&mut wire, elem).await {
                    warn!(error = %e, kind = stanza.kind_name(), "failed to send stanza");
                }
            },
            permit = channels.inbound.reserve(), if pending.is_some() => {
                let Ok(permit) = permit else {
                    debug!("session gone, stopping transport");
                    break;
                };
                if let Some(stanza) = pending.take() {
                    permit.send(stanza);
                }
            },
            event = wire.next(), if pending.is_none() => {
                match step(event, &channels.status) {
                    Step::Deliver(stanza) => pending = Some(stanza),
                    Step::Skip => {},
                    Step::Stop => break,
                }
            },
        }
    }
}

/// Poll the client until it is bound, mapping failures to session errors.
async fn wait_online<S>(client: &mut S) -> SessionResult<jid::Jid>
where
    S: Stream<Item = Event> + Unpin,
{
    while let Some(event) = client.next().await {
        match event {
            Event::Online { bound_jid, .. } => return Ok(bound_jid),
            Event::Disconnected(tokio_xmpp::Error::Auth(e)) => {
                return Err(SessionError::Auth(e.to_string()));
            },
            Event::Disconnected(e) => return Err(SessionError::Connect(e.to_string())),
            Event::Stanza(elem) => {
                debug!(stanza = ?elem, "stanza before session was online, dropping");
            },
        }
    }
    Err(SessionError::Connect(
        "stream ended before the session was online".to_owned(),
    ))
}

/// Classify one client event, publishing any status change it implies.
fn step(event: Option<Event>, status: &mpsc::Sender<ConnectionStatus>) -> Step {
    match event {
        Some(Event::Stanza(elem)) => {
            trace!(stanza = ?elem, "recv");
            match codec::decode(&elem) {
                Ok(stanza) => Step::Deliver(stanza),
                Err(e) => {
                    debug!(error = %e, "dropping stanza");
                    Step::Skip
                },
            }
        },
        Some(Event::Online { bound_jid, .. }) => {
            info!(jid = %bound_jid, "online");
            publish(status, ConnectionStatus::Running);
            Step::Skip
        },
        Some(Event::Disconnected(e)) => {
            warn!(error = %e, "disconnected");
            publish(status, ConnectionStatus::Error);
            Step::Stop
        },
        None => {
            info!("stream ended");
            publish(status, ConnectionStatus::Shutdown);
            Step::Stop
        },
    }
}

/// Publish a status without waiting; a full channel drops it.
fn publish(status: &mpsc::Sender<ConnectionStatus>, value: ConnectionStatus) {
    if let Err(e) = status.try_send(value) {
        debug!(status = %value, error = %e, "status not delivered");
    }
}
