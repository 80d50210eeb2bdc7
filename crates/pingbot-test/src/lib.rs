//! Pingbot Test - shared test utilities for the pingbot workspace.
//!
//! This crate provides mock transports, connectors and process runners, plus
//! fixtures and a session harness, for use as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pingbot_test::{SessionHarness, StubRunner, alice_message};
//! use pingbot_core::{CommandProcessor, bot};
//!
//! #[tokio::test]
//! async fn replies_to_ping() {
//!     let harness = SessionHarness::new();
//!     let processor = CommandProcessor::new(StubRunner::ok("pong"));
//!     harness.inbound.send(alice_message("ping example.com").into()).await.unwrap();
//!     drop(harness.inbound);
//!     bot::drive(harness.session, &processor).await;
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
