//! The session loop.
//!
//! ```text
//!  Starting ──connect ok──▶ Running ──fatal status / inbound closed──▶ Terminated
//!     │                        │
//!  connect err            status ─▶ log_status
//!     ▼                   stanza ─▶ Message  ─▶ CommandProcessor
//!  Err(SessionError)               Presence ─▶ log
//!                                  Query    ─▶ log
//! ```
//!
//! Messages are handled one at a time: the command is awaited inside the
//! loop, so no other stanza is processed while the diagnostic runs.

use tracing::{debug, info};

use crate::command::CommandProcessor;
use crate::error::SessionResult;
use crate::runner::ProcessRunner;
use crate::session::{Connector, OutboundQueue, Session, SessionParams};
use crate::stanza::Stanza;
use crate::status::{ConnectionStatus, log_status};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The transport reported a status the session cannot survive.
    FatalStatus(ConnectionStatus),
    /// The inbound stanza channel closed.
    InboundClosed,
}

/// Open a session with `connector` and drive it until it ends.
///
/// # Errors
///
/// Returns the connector's error if the session cannot be opened. Nothing is
/// retried.
pub async fn run<C, R>(
    connector: &C,
    params: SessionParams,
    processor: &CommandProcessor<R>,
) -> SessionResult<LoopExit>
where
    C: Connector + ?Sized,
    R: ProcessRunner,
{
    info!(address = %params.address, "connecting");
    let session = connector.connect(params).await?;
    info!(address = %session.address(), "session established");
    Ok(drive(session, processor).await)
}

/// Drive an open session until a fatal status arrives or the inbound channel
/// closes, then close it.
///
/// The session is consumed; it is closed on return and, should this future
/// be dropped early, by its `Drop` impl.
pub async fn drive<R: ProcessRunner>(
    mut session: Session,
    processor: &CommandProcessor<R>,
) -> LoopExit {
    let outbound = session.outbound();
    let mut status_open = true;

    let exit = loop {
        let (status_rx, inbound_rx) = session.receivers();
        tokio::select! {
            status = status_rx.recv(), if status_open => {
                match status {
                    Some(status) => {
                        log_status(status);
                        if status.is_fatal() {
                            break LoopExit::FatalStatus(status);
                        }
                    },
                    None => {
                        debug!("status channel closed");
                        status_open = false;
                    },
                }
            }
            stanza = inbound_rx.recv() => {
                let Some(stanza) = stanza else {
                    info!("inbound channel closed");
                    break LoopExit::InboundClosed;
                };
                dispatch(stanza, processor, &outbound).await;
            }
        }
    };

    session.close();
    info!(?exit, "session terminated");
    exit
}

async fn dispatch<R: ProcessRunner>(
    stanza: Stanza,
    processor: &CommandProcessor<R>,
    outbound: &OutboundQueue,
) {
    let from = stanza
        .sender()
        .map_or_else(|| "<server>".to_owned(), |a| a.bare().to_string());

    match stanza {
        Stanza::Message(msg) => {
            info!(from = %from, "msg from {from}");
            processor.process(&msg, outbound).await;
        },
        Stanza::Presence(_) => {
            info!(from = %from, "presence from {from}");
        },
        Stanza::Query(_) => {
            info!(from = %from, "iq from {from}");
        },
    }
}
