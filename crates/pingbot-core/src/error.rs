//! Error types for the pingbot core.

use std::time::Duration;

use thiserror::Error;

/// An address string could not be parsed as a JID.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The input is not a valid JID.
    #[error("invalid address '{input}': {source}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Underlying parser error.
        #[source]
        source: jid::Error,
    },

    /// The resource part could not be attached to the bare address.
    #[error("invalid resource '{resource}' for {bare}: {source}")]
    Resource {
        /// Bare address the resource was attached to.
        bare: String,
        /// The rejected resource.
        resource: String,
        /// Underlying parser error.
        #[source]
        source: jid::Error,
    },
}

/// Errors produced while opening or running a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server rejected the credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The session parameters are unusable.
    #[error("invalid session parameters: {0}")]
    InvalidParams(String),

    /// The bot address could not be built.
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Convenience alias.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failure modes of an external process invocation.
///
/// These never abort command handling; they are reported alongside whatever
/// text the process produced.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("{program} exited with status {code:?}")]
    ExitStatus {
        /// Program name.
        program: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },

    /// The program did not finish in time and was killed.
    #[error("{program} timed out after {}s", timeout.as_secs())]
    Timeout {
        /// Program name.
        program: String,
        /// The limit that was exceeded.
        timeout: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_connect() {
        let err = SessionError::Connect("refused".to_string());
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn error_display_auth() {
        let err = SessionError::Auth("not-authorized".to_string());
        assert_eq!(err.to_string(), "authentication failed: not-authorized");
    }

    #[test]
    fn error_display_exit_status() {
        let err = ExecError::ExitStatus {
            program: "ping".to_string(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "ping exited with status Some(2)");
    }

    #[test]
    fn error_display_timeout() {
        let err = ExecError::Timeout {
            program: "ping".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "ping timed out after 30s");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SessionError>();
        assert_send_sync::<ExecError>();
    }
}
