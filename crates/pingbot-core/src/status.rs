//! Connection status values and the single place they are logged.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{error, info};

/// Lifecycle status reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    /// No connection yet.
    Unconnected,
    /// TCP connected.
    ConnectedTransport,
    /// TLS established.
    ConnectedSecure,
    /// SASL succeeded.
    Authenticated,
    /// Resource bound.
    Bound,
    /// Initial presence sent; stanzas flow.
    Running,
    /// Stream closed in an orderly way.
    Shutdown,
    /// Stream failed.
    Error,
}

impl ConnectionStatus {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unconnected => "StatusUnconnected",
            Self::ConnectedTransport => "StatusConnected",
            Self::ConnectedSecure => "StatusConnectedTLS",
            Self::Authenticated => "StatusAuthenticated",
            Self::Bound => "StatusBound",
            Self::Running => "StatusRunning",
            Self::Shutdown => "StatusShutdown",
            Self::Error => "StatusError",
        }
    }

    /// Whether the session cannot continue after this status.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Shutdown | Self::Error)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Log one status transition.
pub fn log_status(status: ConnectionStatus) {
    if status == ConnectionStatus::Error {
        error!(status = status.label(), "connection status {status}");
    } else {
        info!(status = status.label(), "connection status {status}");
    }
}

/// Log every status received on `rx` until the channel closes.
///
/// For consumers other than the session loop, which logs through
/// [`log_status`] directly.
pub async fn observe(mut rx: mpsc::Receiver<ConnectionStatus>) -> usize {
    let mut seen = 0usize;
    while let Some(status) = rx.recv().await {
        log_status(status);
        seen = seen.saturating_add(1);
    }
    seen
}
