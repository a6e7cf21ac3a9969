//! Graceful-stop handshake.
//!
//! An extension that must not be torn down before a peer confirms it
//! stopped delegates its `on_stop`/`on_deinit` hooks to a
//! [`StopCoordinator`].
//!
//! # Stop sequence
//!
//! ```text
//!  host                StopCoordinator (spawned task)            peer
//!   │  on_stop ──────►  begin_stop (Active → StopPending)
//!   │                   issue "stop" ───────────────────────────► │
//!   │                   wait (optional deadline)                  │
//!   │                   ◄──────────────────────────── CmdResult ──┘
//!   │                   Ok  → mark_stopped, then on_stop_done(Ok)
//!   │  ◄─────────────── else → Fatal,       then on_stop_done(Err)
//! ```
//!
//! The hook returns as soon as the task is spawned. The command is always
//! issued before the wait starts, and `on_stop_done(Ok)` is only reported
//! after an `Ok` result has been observed and recorded.
//!
//! # Deinit
//!
//! [`on_deinit_requested`](StopCoordinator::on_deinit_requested) checks
//! that the handshake completed. Its `on_deinit_done` report is sent from
//! a drop guard, so it fires exactly once on every exit path.

use crate::{issue_cmd, ExtensionError, LifecycleCell, LifecycleState, SharedEnv};
use std::sync::Arc;
use std::time::Duration;
use tenx_msg::{Cmd, LogLevel};
use tenx_types::{ErrorCode, ExtensionId};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Default name of the command sent on stop.
pub const DEFAULT_STOP_CMD: &str = "stop";

/// Default bound on the wait for the stop result.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for a [`StopCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSettings {
    /// Name of the outbound command.
    pub cmd_name: String,
    /// Bound on the wait; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for StopSettings {
    fn default() -> Self {
        Self {
            cmd_name: DEFAULT_STOP_CMD.to_string(),
            timeout: Some(DEFAULT_STOP_TIMEOUT),
        }
    }
}

/// Runs the stop handshake and guards deinit for one extension instance.
///
/// Cloning is cheap and clones share state.
#[derive(Debug, Clone)]
pub struct StopCoordinator {
    issuer: ExtensionId,
    settings: StopSettings,
    state: Arc<LifecycleCell>,
}

impl StopCoordinator {
    /// Creates a coordinator in [`LifecycleState::Active`].
    #[must_use]
    pub fn new(issuer: ExtensionId, settings: StopSettings) -> Self {
        Self {
            issuer,
            settings,
            state: Arc::new(LifecycleCell::new()),
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Returns `true` once a stop result has been observed as success.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    /// Returns the settings in use.
    #[must_use]
    pub fn settings(&self) -> &StopSettings {
        &self.settings
    }

    /// Starts the stop handshake on a new tokio task and returns at once.
    ///
    /// Each call issues its own command and reports its own
    /// `on_stop_done`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn on_stop_requested(&self, env: SharedEnv) -> JoinHandle<Result<(), ExtensionError>> {
        let this = self.clone();
        tokio::spawn(async move { this.run_stop(env).await })
    }

    /// Runs the stop handshake on the current task.
    ///
    /// Reports the outcome through `env.on_stop_done` and also returns it.
    ///
    /// # Errors
    ///
    /// - [`ExtensionError::InvalidTransition`] if the instance is already
    ///   terminal; the state is left as it is
    /// - [`ExtensionError::StopFailed`] on a non-`Ok` result
    /// - [`ExtensionError::Timeout`] / [`ExtensionError::ResultDropped`] when no result arrives
    pub async fn run_stop(&self, env: SharedEnv) -> Result<(), ExtensionError> {
        env.log(LogLevel::Debug, "onStop");

        let outcome = self.handshake(&env).await;
        if let Err(ref e) = outcome {
            match self.state.fail_stop() {
                Ok(_) => {
                    error!(extension = %self.issuer, code = e.code(), "stop handshake failed");
                    env.log(LogLevel::Fatal, &format!("stop failed: {e}"));
                }
                Err(_) => {
                    // No pending stop to fail: a terminal state or a stop
                    // another request already confirmed.
                    warn!(
                        extension = %self.issuer,
                        code = e.code(),
                        state = %self.state.get(),
                        "stop request failed, state kept"
                    );
                }
            }
        }

        env.on_stop_done(outcome.clone());
        outcome
    }

    async fn handshake(&self, env: &SharedEnv) -> Result<(), ExtensionError> {
        let prev = self.state.begin_stop()?;
        debug!(extension = %self.issuer, from = %prev, "stop pending");

        let pending = issue_cmd(env.as_ref(), &self.issuer, Cmd::new(&self.settings.cmd_name));
        let result = pending.wait(self.settings.timeout).await?;

        if !result.is_ok() {
            return Err(ExtensionError::StopFailed {
                cmd: self.settings.cmd_name.clone(),
                status: result.status(),
                detail: result.detail().map(str::to_string),
            });
        }

        self.state.mark_stopped()?;
        debug!(extension = %self.issuer, "stopped");
        Ok(())
    }

    /// Checks the handshake completed and reports deinit.
    ///
    /// `on_deinit_done` is reported exactly once, whatever happens here.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::NotStopped`] if the instance was not `Stopped`;
    /// the instance is `Fatal` afterwards.
    pub fn on_deinit_requested(&self, env: &SharedEnv) -> Result<(), ExtensionError> {
        let mut done = DeinitDone::new(Arc::clone(env));

        env.log(LogLevel::Debug, "onDeinit");
        let outcome = self.state.finish_deinit();
        if let Err(ref e) = outcome {
            error!(extension = %self.issuer, code = e.code(), "deinit before stop completed");
            env.log(LogLevel::Fatal, &e.to_string());
        }

        done.outcome = Some(outcome.clone());
        outcome
    }
}

/// Reports `on_deinit_done` when dropped.
///
/// If the outcome was never set (the hook unwound early) the report is
/// [`ExtensionError::Interrupted`].
struct DeinitDone {
    env: SharedEnv,
    outcome: Option<Result<(), ExtensionError>>,
}

impl DeinitDone {
    fn new(env: SharedEnv) -> Self {
        Self { env, outcome: None }
    }
}

impl Drop for DeinitDone {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or(Err(ExtensionError::Interrupted { phase: "deinit" }));
        self.env.on_deinit_done(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HostSignal, MockEnv, Reply};
    use tenx_msg::StatusCode;

    fn coordinator() -> StopCoordinator {
        StopCoordinator::new(ExtensionId::builtin("stopper"), StopSettings::default())
    }

    #[tokio::test]
    async fn happy_path() {
        let env = MockEnv::new();
        let coord = coordinator();

        coord.run_stop(env.shared()).await.unwrap();

        assert!(coord.is_stopped());
        assert_eq!(env.sent_cmds(), vec!["stop".to_string()]);
        assert_eq!(env.stop_done(), vec![Ok(())]);
    }

    #[tokio::test]
    async fn failure_result_is_fatal() {
        let env = MockEnv::with_default_reply(Reply::Error("refused".into()));
        let coord = coordinator();

        let err = coord.run_stop(env.shared()).await.unwrap_err();

        assert_eq!(
            err,
            ExtensionError::StopFailed {
                cmd: "stop".into(),
                status: StatusCode::Error,
                detail: Some("refused".into()),
            }
        );
        assert!(!coord.is_stopped());
        assert_eq!(coord.state(), LifecycleState::Fatal);
        assert_eq!(env.stop_done(), vec![Err(err)]);
    }

    #[tokio::test]
    async fn dropped_result_is_fatal() {
        let env = MockEnv::with_default_reply(Reply::Drop);
        let coord = coordinator();

        let err = coord.run_stop(env.shared()).await.unwrap_err();
        assert_eq!(err, ExtensionError::ResultDropped { cmd: "stop".into() });
        assert_eq!(coord.state(), LifecycleState::Fatal);
    }

    #[tokio::test(start_paused = true)]
    async fn held_result_times_out() {
        let env = MockEnv::with_default_reply(Reply::Hold);
        let coord = StopCoordinator::new(
            ExtensionId::builtin("stopper"),
            StopSettings {
                cmd_name: "stop".into(),
                timeout: Some(Duration::from_millis(100)),
            },
        );

        let err = coord.run_stop(env.shared()).await.unwrap_err();
        assert_eq!(err.code(), "EXTENSION_TIMEOUT");
        assert_eq!(coord.state(), LifecycleState::Fatal);
    }

    #[tokio::test]
    async fn custom_cmd_name_is_used() {
        let env = MockEnv::new();
        let coord = StopCoordinator::new(
            ExtensionId::builtin("stopper"),
            StopSettings {
                cmd_name: "prepare_to_stop".into(),
                timeout: None,
            },
        );

        coord.run_stop(env.shared()).await.unwrap();
        assert_eq!(env.sent_cmds(), vec!["prepare_to_stop".to_string()]);
    }

    #[tokio::test]
    async fn stop_after_fatal_issues_nothing() {
        let env = MockEnv::new();
        let coord = coordinator();
        coord.on_deinit_requested(&env.shared()).unwrap_err();

        let err = coord.run_stop(env.shared()).await.unwrap_err();
        assert!(matches!(err, ExtensionError::InvalidTransition { .. }));
        assert!(env.sent_cmds().is_empty());
        assert_eq!(env.stop_done().len(), 1);
    }

    #[tokio::test]
    async fn stray_stop_after_deinit_keeps_deinitialized() {
        let env = MockEnv::new();
        let coord = coordinator();
        coord.run_stop(env.shared()).await.unwrap();
        coord.on_deinit_requested(&env.shared()).unwrap();

        let err = coord.run_stop(env.shared()).await.unwrap_err();

        assert!(matches!(err, ExtensionError::InvalidTransition { .. }));
        assert_eq!(coord.state(), LifecycleState::Deinitialized);
        assert_eq!(env.sent_cmds().len(), 1);
        assert!(!env
            .logs()
            .iter()
            .any(|(level, _)| *level == LogLevel::Fatal));
    }

    #[tokio::test]
    async fn failed_request_after_confirmed_stop_keeps_stopped() {
        let env = MockEnv::new();
        let coord = coordinator();
        coord.run_stop(env.shared()).await.unwrap();

        env.set_reply("stop", Reply::Error("late refusal".into()));
        let err = coord.run_stop(env.shared()).await.unwrap_err();
        assert!(matches!(err, ExtensionError::StopFailed { .. }));
        assert!(coord.is_stopped());

        coord.on_deinit_requested(&env.shared()).unwrap();
        assert_eq!(coord.state(), LifecycleState::Deinitialized);
        assert_eq!(env.stop_done(), vec![Ok(()), Err(err)]);
        assert_eq!(env.deinit_done(), vec![Ok(())]);
    }

    #[tokio::test]
    async fn deinit_after_stop_completes() {
        let env = MockEnv::new();
        let coord = coordinator();
        coord.run_stop(env.shared()).await.unwrap();

        coord.on_deinit_requested(&env.shared()).unwrap();

        assert_eq!(coord.state(), LifecycleState::Deinitialized);
        assert_eq!(env.deinit_done(), vec![Ok(())]);
    }

    #[test]
    fn premature_deinit_reports_once() {
        let env = MockEnv::new();
        let coord = coordinator();

        let err = coord.on_deinit_requested(&env.shared()).unwrap_err();

        assert_eq!(
            err,
            ExtensionError::NotStopped {
                state: LifecycleState::Active
            }
        );
        assert_eq!(env.deinit_done(), vec![Err(err)]);
        assert_eq!(coord.state(), LifecycleState::Fatal);
        assert!(env
            .logs()
            .iter()
            .any(|(level, _)| *level == LogLevel::Fatal));
    }

    #[test]
    fn deinit_guard_reports_interrupted_when_unset() {
        let env = MockEnv::new();
        drop(DeinitDone::new(env.shared()));
        assert_eq!(
            env.deinit_done(),
            vec![Err(ExtensionError::Interrupted { phase: "deinit" })]
        );
    }

    #[tokio::test]
    async fn signals_are_ordered() {
        let env = MockEnv::new();
        let coord = coordinator();
        coord.run_stop(env.shared()).await.unwrap();

        let signals = env.signals();
        let sent = signals
            .iter()
            .position(|s| matches!(s, HostSignal::CmdSent { .. }))
            .unwrap();
        let done = signals
            .iter()
            .position(|s| matches!(s, HostSignal::StopDone(_)))
            .unwrap();
        assert!(sent < done);
    }
}
