//! Session loop behaviour against in-memory sessions.

use std::time::Duration;

use pingbot_core::{
    CommandProcessor, ConnectionStatus, Credential, LoopExit, SessionError, SessionParams, bot,
};
use pingbot_test::{
    MockConnector, SessionHarness, StubRunner, alice_message, alice_presence, server_query,
    setup_test_logging, test_address,
};

const LIMIT: Duration = Duration::from_secs(5);

fn params() -> SessionParams {
    SessionParams::new(test_address("bot@example.com/bot"), Credential::new("secret"))
}

#[tokio::test]
async fn fatal_status_terminates_and_closes_once() {
    setup_test_logging("debug");
    let SessionHarness {
        session,
        inbound,
        status,
        closes,
        ..
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    status.send(ConnectionStatus::Running).await.unwrap();
    status.send(ConnectionStatus::Error).await.unwrap();

    let exit = tokio::time::timeout(LIMIT, bot::drive(session, &processor))
        .await
        .expect("loop should stop on a fatal status");

    assert_eq!(exit, LoopExit::FatalStatus(ConnectionStatus::Error));
    assert_eq!(closes.get(), 1);
    assert_eq!(processor.runner().call_count(), 0);
    // The session, and with it the status receiver, is gone.
    assert!(status.send(ConnectionStatus::Running).await.is_err());
    drop(inbound);
}

#[tokio::test]
async fn shutdown_status_is_fatal() {
    let SessionHarness {
        session,
        inbound: _inbound,
        status,
        closes,
        ..
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    status.send(ConnectionStatus::Shutdown).await.unwrap();

    let exit = tokio::time::timeout(LIMIT, bot::drive(session, &processor))
        .await
        .unwrap();
    assert_eq!(exit, LoopExit::FatalStatus(ConnectionStatus::Shutdown));
    assert_eq!(closes.get(), 1);
}

#[tokio::test]
async fn closed_inbound_terminates_and_closes_once() {
    let SessionHarness {
        session,
        inbound,
        status: _status,
        closes,
        ..
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    drop(inbound);

    let exit = tokio::time::timeout(LIMIT, bot::drive(session, &processor))
        .await
        .unwrap();
    assert_eq!(exit, LoopExit::InboundClosed);
    assert_eq!(closes.get(), 1);
}

#[tokio::test]
async fn closed_status_channel_does_not_end_the_loop() {
    let SessionHarness {
        session,
        inbound,
        status,
        mut outbound,
        closes,
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("pong"));

    drop(status);
    inbound
        .send(alice_message("ping example.com").into())
        .await
        .unwrap();
    drop(inbound);

    let exit = tokio::time::timeout(LIMIT, bot::drive(session, &processor))
        .await
        .unwrap();
    assert_eq!(exit, LoopExit::InboundClosed);
    assert!(outbound.try_recv().is_ok());
    assert_eq!(closes.get(), 1);
}

#[tokio::test]
async fn presence_and_query_never_reach_the_command() {
    let SessionHarness {
        session,
        inbound,
        status: _status,
        mut outbound,
        closes,
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    inbound.send(alice_presence().into()).await.unwrap();
    inbound.send(server_query().into()).await.unwrap();
    drop(inbound);

    let exit = tokio::time::timeout(LIMIT, bot::drive(session, &processor))
        .await
        .unwrap();
    assert_eq!(exit, LoopExit::InboundClosed);
    assert_eq!(processor.runner().call_count(), 0);
    assert!(outbound.try_recv().is_err());
    assert_eq!(closes.get(), 1);
}

#[tokio::test]
async fn non_command_messages_get_no_reply() {
    let SessionHarness {
        session,
        inbound,
        status: _status,
        mut outbound,
        ..
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    inbound.send(alice_message("hello").into()).await.unwrap();
    inbound.send(alice_message("").into()).await.unwrap();
    inbound.send(alice_message("pingpong").into()).await.unwrap();
    drop(inbound);

    bot::drive(session, &processor).await;
    assert_eq!(processor.runner().call_count(), 0);
    assert!(outbound.try_recv().is_err());
}

#[tokio::test]
async fn messages_are_answered_in_arrival_order() {
    let SessionHarness {
        session,
        inbound,
        status: _status,
        mut outbound,
        ..
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("pong"));

    inbound.send(alice_message("ping one.example").into()).await.unwrap();
    inbound.send(alice_message("ping two.example").into()).await.unwrap();
    drop(inbound);

    bot::drive(session, &processor).await;

    let targets: Vec<String> = processor
        .runner()
        .calls()
        .into_iter()
        .filter_map(|(_, args)| args.last().cloned())
        .collect();
    assert_eq!(targets, vec!["one.example", "two.example"]);
    assert!(outbound.try_recv().is_ok());
    assert!(outbound.try_recv().is_ok());
    assert!(outbound.try_recv().is_err());
}

#[tokio::test]
async fn dropping_the_loop_still_closes_the_session() {
    let SessionHarness {
        session,
        inbound: _inbound,
        status: _status,
        closes,
        ..
    } = SessionHarness::new();
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    // Nothing ever arrives, so the loop only ends by being cancelled.
    let result =
        tokio::time::timeout(Duration::from_millis(50), bot::drive(session, &processor)).await;
    assert!(result.is_err());
    assert_eq!(closes.get(), 1);
}

#[tokio::test]
async fn connect_failure_is_returned_without_retry() {
    let connector = MockConnector::failing("connection refused");
    let processor = CommandProcessor::new(StubRunner::ok("unused"));

    let result = bot::run(&connector, params(), &processor).await;

    assert!(matches!(result, Err(SessionError::Connect(ref m)) if m == "connection refused"));
    assert_eq!(connector.attempts(), 1);
}

#[tokio::test]
async fn run_passes_params_to_the_connector() {
    let SessionHarness {
        session,
        inbound,
        status: _status,
        closes,
        ..
    } = SessionHarness::new();
    let connector = MockConnector::with_session(session);
    let processor = CommandProcessor::new(StubRunner::ok("unused"));
    drop(inbound);

    let exit = bot::run(&connector, params(), &processor).await.unwrap();

    assert_eq!(exit, LoopExit::InboundClosed);
    assert_eq!(closes.get(), 1);
    let seen = connector.last_params().unwrap();
    assert_eq!(seen.address.to_string(), "bot@example.com/bot");
    assert_eq!(seen.status_capacity, 10);
}
