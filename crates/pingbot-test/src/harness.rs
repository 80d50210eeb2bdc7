//! Test harness helpers.

use pingbot_core::{Address, ConnectionStatus, STATUS_CHANNEL_CAPACITY, Session, Stanza};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::fixtures::{BOT, test_address};
use crate::mocks::{CloseCounter, MockTransport};

/// Set up logging for tests.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// A [`Session`] backed by in-memory channels.
///
/// The test keeps the far end of every channel: it feeds `inbound` and
/// `status`, reads what the bot sent from `outbound`, and checks how many
/// times the transport was closed through `closes`.
#[derive(Debug)]
pub struct SessionHarness {
    /// The session to hand to the code under test.
    pub session: Session,
    /// Feeds stanzas to the session.
    pub inbound: mpsc::Sender<Stanza>,
    /// Feeds statuses to the session.
    pub status: mpsc::Sender<ConnectionStatus>,
    /// Receives stanzas the session sent.
    pub outbound: mpsc::Receiver<Stanza>,
    /// Close counter of the mock transport.
    pub closes: CloseCounter,
}

impl SessionHarness {
    /// A harness for a session bound as [`BOT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_address(test_address(BOT))
    }

    /// A harness for a session bound as `address`.
    #[must_use]
    pub fn with_address(address: Address) -> Self {
        let (out_tx, out_rx) = mpsc::channel(16);
        let (in_tx, in_rx) = mpsc::channel(16);
        let (st_tx, st_rx) = mpsc::channel(STATUS_CHANNEL_CAPACITY);
        let transport = MockTransport::new();
        let closes = transport.counter();

        Self {
            session: Session::new(address, out_tx, in_rx, st_rx, Box::new(transport)),
            inbound: in_tx,
            status: st_tx,
            outbound: out_rx,
            closes,
        }
    }
}

impl Default for SessionHarness {
    fn default() -> Self {
        Self::new()
    }
}
