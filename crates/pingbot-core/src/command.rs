//! The `ping <target>` command.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::reply::build_reply;
use crate::runner::ProcessRunner;
use crate::session::OutboundQueue;
use crate::stanza::Message;

/// Echo requests sent per command.
pub const PING_COUNT: u32 = 5;

/// Diagnostic program invoked for the command.
pub const PING_PROGRAM: &str = "ping";

/// Extract the ping target from a message body.
///
/// The body is lower-cased first, so `PING host` and `ping host` are the
/// same command. The keyword must be followed by whitespace and a
/// non-blank target; `pingpong` is not a command.
#[must_use]
pub fn parse_ping_target(body: &str) -> Option<String> {
    static PING: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"ping\s+(\S.*)").expect("invalid regex"));

    let normalized = body.to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    let captures = PING.captures(&normalized)?;
    let target = captures.get(1)?.as_str().trim();
    if target.is_empty() {
        None
    } else {
        Some(target.to_owned())
    }
}

/// Recognizes the command in inbound messages and answers it.
#[derive(Debug)]
pub struct CommandProcessor<R> {
    runner: R,
    count: u32,
}

impl<R: ProcessRunner> CommandProcessor<R> {
    /// A processor sending [`PING_COUNT`] echo requests per command.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            count: PING_COUNT,
        }
    }

    /// Override the number of echo requests.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Borrow the runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Arguments passed to the diagnostic program for `target`.
    ///
    /// The target is one argv entry, after `--` so it can never be read as
    /// an option.
    #[must_use]
    pub fn ping_args(&self, target: &str) -> Vec<String> {
        vec![
            "-c".to_owned(),
            self.count.to_string(),
            "--".to_owned(),
            target.to_owned(),
        ]
    }

    /// Handle one inbound message. Returns `true` if a reply was enqueued.
    ///
    /// Failures of the diagnostic program are not errors here: whatever text
    /// it produced, possibly none, becomes the reply.
    pub async fn process(&self, msg: &Message, outbound: &OutboundQueue) -> bool {
        let Some(target) = msg.body.as_deref().and_then(parse_ping_target) else {
            return false;
        };

        let sender = msg
            .from
            .as_ref()
            .map_or_else(|| "<unknown>".to_owned(), |a| a.bare().to_string());
        info!(host = %target, from = %sender, "ping {target} for {sender}");

        let output = self
            .runner
            .run(PING_PROGRAM, &self.ping_args(&target))
            .await;
        if let Some(e) = &output.error {
            debug!(error = %e, host = %target, "ping did not succeed, replying with its output");
        }

        outbound.send(build_reply(msg, output.text)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::address::Address;
    use crate::error::ExecError;
    use crate::runner::CommandOutput;
    use crate::stanza::{MessageType, Stanza};

    /// Runner returning a canned result and recording its calls.
    struct Canned {
        text: &'static str,
        fail: bool,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl Canned {
        fn new(text: &'static str, fail: bool) -> Self {
            Self {
                text,
                fail,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for Canned {
        async fn run(&self, program: &str, args: &[String]) -> CommandOutput {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_owned(), args.to_vec()));
            if self.fail {
                CommandOutput::failed(
                    self.text,
                    ExecError::ExitStatus {
                        program: program.to_owned(),
                        code: Some(2),
                    },
                )
            } else {
                CommandOutput::ok(self.text)
            }
        }
    }

    fn message(body: Option<&str>) -> Message {
        Message {
            from: Some(Address::parse("alice@example.com/phone").unwrap()),
            to: Some(Address::parse("bot@example.com/bot").unwrap()),
            id: Some("m1".to_string()),
            kind: MessageType::Chat,
            lang: None,
            body: body.map(str::to_string),
            thread: None,
        }
    }

    #[test]
    fn parse_lowercase() {
        assert_eq!(parse_ping_target("ping 8.8.8.8").as_deref(), Some("8.8.8.8"));
    }

    #[test]
    fn parse_mixed_case() {
        assert_eq!(parse_ping_target("PING 8.8.8.8").as_deref(), Some("8.8.8.8"));
        assert_eq!(
            parse_ping_target("PiNg Example.COM").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn parse_requires_whitespace() {
        assert!(parse_ping_target("pingpong").is_none());
        assert!(parse_ping_target("ping").is_none());
    }

    #[test]
    fn parse_requires_target() {
        assert!(parse_ping_target("ping    ").is_none());
        assert!(parse_ping_target("").is_none());
    }

    #[test]
    fn parse_trims_target() {
        assert_eq!(
            parse_ping_target("ping \t localhost  ").as_deref(),
            Some("localhost")
        );
    }

    #[test]
    fn parse_keyword_may_appear_mid_sentence() {
        assert_eq!(
            parse_ping_target("please ping example.org").as_deref(),
            Some("example.org")
        );
    }

    #[test]
    fn parse_keeps_metacharacters_in_one_token() {
        assert_eq!(
            parse_ping_target("ping host; rm -rf /").as_deref(),
            Some("host; rm -rf /")
        );
    }

    #[test]
    fn args_put_target_after_separator() {
        let p = CommandProcessor::new(Canned::new("", false));
        assert_eq!(p.ping_args("-f"), vec!["-c", "5", "--", "-f"]);
    }

    #[tokio::test]
    async fn successful_run_enqueues_output() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = OutboundQueue::new(tx);
        let p = CommandProcessor::new(Canned::new("ok", false));

        assert!(p.process(&message(Some("ping localhost")), &queue).await);

        let Some(Stanza::Message(reply)) = rx.recv().await else {
            panic!("expected a message reply");
        };
        assert_eq!(reply.body.as_deref(), Some("ok"));
        assert!(rx.try_recv().is_err());
        assert_eq!(
            p.runner().calls(),
            vec![(
                "ping".to_string(),
                vec![
                    "-c".to_string(),
                    "5".to_string(),
                    "--".to_string(),
                    "localhost".to_string()
                ]
            )]
        );
    }

    #[tokio::test]
    async fn failed_run_still_replies() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = OutboundQueue::new(tx);
        let p = CommandProcessor::new(Canned::new("", true));

        assert!(p.process(&message(Some("ping localhost")), &queue).await);

        let Some(Stanza::Message(reply)) = rx.recv().await else {
            panic!("expected a message reply");
        };
        assert_eq!(reply.body.as_deref(), Some(""));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_body_is_ignored() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = OutboundQueue::new(tx);
        let p = CommandProcessor::new(Canned::new("ok", false));

        assert!(!p.process(&message(Some("")), &queue).await);
        assert!(!p.process(&message(None), &queue).await);
        assert!(rx.try_recv().is_err());
        assert!(p.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn non_command_is_ignored() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = OutboundQueue::new(tx);
        let p = CommandProcessor::new(Canned::new("ok", false));

        assert!(!p.process(&message(Some("pingpong")), &queue).await);
        assert!(!p.process(&message(Some("hello there")), &queue).await);
        assert!(rx.try_recv().is_err());
        assert!(p.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn custom_count_is_used() {
        let (tx, _rx) = mpsc::channel(4);
        let queue = OutboundQueue::new(tx);
        let p = CommandProcessor::new(Canned::new("ok", false)).with_count(2);

        p.process(&message(Some("ping localhost")), &queue).await;
        assert_eq!(p.runner().calls()[0].1[1], "2");
    }
}
