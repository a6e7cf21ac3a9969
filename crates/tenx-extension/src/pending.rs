//! One-shot pairing of an issued command with its result.
//!
//! ```text
//!   extension                          host
//!   ─────────                          ────
//!   PendingCmd::new(cmd) ─┬─ ResultSink ──► send_cmd(cmd, sink)
//!                         │                      │
//!   pending.wait(..) ◄────┴──── oneshot ◄── sink.fulfill(result)
//! ```
//!
//! [`ResultSink::fulfill`] consumes the sink, so a second delivery for the
//! same command cannot be written. A sink dropped unfulfilled wakes the
//! waiter with [`ExtensionError::ResultDropped`] instead of leaving it
//! hanging.

use crate::ExtensionError;
use std::time::Duration;
use tenx_msg::{Cmd, CmdResult};
use tenx_types::{CmdId, ExtensionId};
use tokio::sync::oneshot;

/// Host-side half: delivers the single result of one command.
#[derive(Debug)]
pub struct ResultSink {
    cmd_id: CmdId,
    cmd_name: String,
    tx: oneshot::Sender<CmdResult>,
}

impl ResultSink {
    /// Returns the id of the command this sink answers.
    #[must_use]
    pub fn cmd_id(&self) -> CmdId {
        self.cmd_id
    }

    /// Returns the name of the command this sink answers.
    #[must_use]
    pub fn cmd_name(&self) -> &str {
        &self.cmd_name
    }

    /// Delivers the result.
    ///
    /// Returns `false` if the waiter is already gone (timed out or
    /// dropped); the result is discarded in that case.
    pub fn fulfill(self, result: CmdResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

/// Extension-side half: waits for the single result of one command.
#[derive(Debug)]
pub struct PendingCmd {
    cmd_id: CmdId,
    cmd_name: String,
    issuer: ExtensionId,
    rx: oneshot::Receiver<CmdResult>,
}

impl PendingCmd {
    /// Creates the waiter/sink pair for `cmd` issued by `issuer`.
    #[must_use]
    pub fn new(cmd: &Cmd, issuer: &ExtensionId) -> (Self, ResultSink) {
        let (tx, rx) = oneshot::channel();
        let cmd_name = cmd.name().unwrap_or_default().to_string();
        let sink = ResultSink {
            cmd_id: cmd.id(),
            cmd_name: cmd_name.clone(),
            tx,
        };
        let pending = Self {
            cmd_id: cmd.id(),
            cmd_name,
            issuer: issuer.clone(),
            rx,
        };
        (pending, sink)
    }

    /// Returns the id of the awaited command.
    #[must_use]
    pub fn cmd_id(&self) -> CmdId {
        self.cmd_id
    }

    /// Returns the name of the awaited command.
    #[must_use]
    pub fn cmd_name(&self) -> &str {
        &self.cmd_name
    }

    /// Returns the extension that issued the command.
    #[must_use]
    pub fn issuer(&self) -> &ExtensionId {
        &self.issuer
    }

    /// Waits for the result, optionally bounded by `deadline`.
    ///
    /// `None` waits forever.
    ///
    /// # Errors
    ///
    /// - [`ExtensionError::Timeout`] when `deadline` elapses first
    /// - [`ExtensionError::ResultDropped`] when the sink is dropped unfulfilled
    pub async fn wait(self, deadline: Option<Duration>) -> Result<CmdResult, ExtensionError> {
        let Self { cmd_name, rx, .. } = self;

        let received = match deadline {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => {
                    return Err(ExtensionError::Timeout {
                        cmd: cmd_name,
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
            None => rx.await,
        };

        received.map_err(|_| ExtensionError::ResultDropped { cmd: cmd_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> ExtensionId {
        ExtensionId::builtin("test")
    }

    #[tokio::test]
    async fn fulfilled_result_is_received() {
        let cmd = Cmd::new("stop");
        let (pending, sink) = PendingCmd::new(&cmd, &issuer());
        assert_eq!(sink.cmd_id(), cmd.id());
        assert_eq!(pending.cmd_name(), "stop");

        assert!(sink.fulfill(CmdResult::ok(&cmd)));
        let result = pending.wait(None).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(result.cmd_id(), cmd.id());
    }

    #[tokio::test]
    async fn fulfilled_from_another_task() {
        let cmd = Cmd::new("stop");
        let (pending, sink) = PendingCmd::new(&cmd, &issuer());
        let reply = CmdResult::error(&cmd, "nope");
        tokio::spawn(async move {
            sink.fulfill(reply);
        });

        let result = pending.wait(Some(Duration::from_secs(5))).await.unwrap();
        assert!(!result.is_ok());
        assert_eq!(result.detail(), Some("nope"));
    }

    #[tokio::test]
    async fn dropped_sink_resolves_waiter() {
        let cmd = Cmd::new("stop");
        let (pending, sink) = PendingCmd::new(&cmd, &issuer());
        drop(sink);

        let err = pending.wait(None).await.unwrap_err();
        assert_eq!(err, ExtensionError::ResultDropped { cmd: "stop".into() });
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapses() {
        let cmd = Cmd::new("stop");
        let (pending, _sink) = PendingCmd::new(&cmd, &issuer());

        let err = pending
            .wait(Some(Duration::from_millis(250)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExtensionError::Timeout {
                cmd: "stop".into(),
                timeout_ms: 250
            }
        );
    }

    #[tokio::test]
    async fn fulfill_after_waiter_gone_reports_false() {
        let cmd = Cmd::new("stop");
        let (pending, sink) = PendingCmd::new(&cmd, &issuer());
        drop(pending);
        assert!(!sink.fulfill(CmdResult::ok(&cmd)));
    }
}
