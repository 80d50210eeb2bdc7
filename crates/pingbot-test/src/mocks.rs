//! Mock implementations for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pingbot_core::{
    CommandOutput, Connector, ExecError, ProcessRunner, Session, SessionError, SessionParams,
    SessionResult, Transport,
};

/// Shared count of [`Transport::close`] calls.
#[derive(Debug, Clone, Default)]
pub struct CloseCounter(Arc<AtomicUsize>);

impl CloseCounter {
    /// How many times the transport was closed.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Transport that only counts how often it is closed.
///
/// Deliberately not idempotent itself, so tests can verify that
/// [`Session`] closes it exactly once.
#[derive(Debug, Default)]
pub struct MockTransport {
    closes: CloseCounter,
}

impl MockTransport {
    /// A fresh transport with a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle to the close counter.
    #[must_use]
    pub fn counter(&self) -> CloseCounter {
        self.closes.clone()
    }
}

impl Transport for MockTransport {
    fn close(&mut self) {
        self.closes.bump();
    }
}

/// Connector handing out one prepared session, or failing.
#[derive(Debug)]
pub struct MockConnector {
    session: Mutex<Option<Session>>,
    failure: Option<String>,
    attempts: AtomicUsize,
    last_params: Mutex<Option<SessionParams>>,
}

impl MockConnector {
    /// A connector whose first `connect` returns `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            failure: None,
            attempts: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    /// A connector that always fails with [`SessionError::Connect`].
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(None),
            failure: Some(reason.into()),
            attempts: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        }
    }

    /// Number of `connect` calls so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Parameters of the most recent `connect` call.
    #[must_use]
    pub fn last_params(&self) -> Option<SessionParams> {
        self.last_params.lock().ok().and_then(|g| g.clone())
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, params: SessionParams) -> SessionResult<Session> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_params.lock() {
            *guard = Some(params);
        }
        if let Some(reason) = &self.failure {
            return Err(SessionError::Connect(reason.clone()));
        }
        self.session
            .lock()
            .ok()
            .and_then(|mut g| g.take())
            .ok_or_else(|| SessionError::Connect("mock session already used".to_string()))
    }
}

/// Process runner returning a canned result and recording every call.
#[derive(Debug)]
pub struct StubRunner {
    text: String,
    fail: bool,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubRunner {
    /// A runner that succeeds with `text`.
    #[must_use]
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runner that fails, leaving `text` behind.
    #[must_use]
    pub fn failing(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(program, args)` pair run so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of runs so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|g| g.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ProcessRunner for StubRunner {
    async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push((program.to_owned(), args.to_vec()));
        }
        if self.fail {
            CommandOutput::failed(
                self.text.clone(),
                ExecError::Spawn {
                    program: program.to_owned(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "stubbed failure"),
                },
            )
        } else {
            CommandOutput::ok(self.text.clone())
        }
    }
}
