//! Host port: what an extension can call on its host.
//!
//! The host hands every hook a [`SharedEnv`]. Extensions clone it into
//! spawned tasks; the host must accept calls from any thread.
//!
//! # Contract
//!
//! | Call | Host guarantee |
//! |------|----------------|
//! | `on_*_done` | advances the lifecycle; one call per phase |
//! | [`send_cmd`](TenEnv::send_cmd) | returns immediately; fulfills `sink` exactly once |
//! | [`return_result`](TenEnv::return_result) | routes the result to whoever sent the command |
//! | [`log`](TenEnv::log) | fire-and-forget |

use crate::{ExtensionError, PendingCmd, ResultSink};
use std::sync::Arc;
use tenx_msg::{Cmd, CmdResult, LogLevel};
use tenx_types::ExtensionId;

/// Calls an extension makes into its host.
pub trait TenEnv: Send + Sync {
    /// Acknowledges `on_configure`.
    fn on_configure_done(&self);

    /// Acknowledges `on_init`.
    fn on_init_done(&self);

    /// Acknowledges `on_start`.
    fn on_start_done(&self);

    /// Reports the outcome of `on_stop`.
    ///
    /// `Err` means the extension could not stop cleanly. The host decides
    /// whether that ends the process.
    fn on_stop_done(&self, outcome: Result<(), ExtensionError>);

    /// Reports the outcome of `on_deinit`. Always called, even on failure.
    fn on_deinit_done(&self, outcome: Result<(), ExtensionError>);

    /// Enqueues an outbound command.
    ///
    /// Must not block. The host fulfills `sink` exactly once, with an
    /// error status if it cannot deliver the command.
    fn send_cmd(&self, cmd: Cmd, sink: ResultSink);

    /// Returns the result for an inbound command.
    fn return_result(&self, result: CmdResult);

    /// Writes a diagnostic line.
    fn log(&self, level: LogLevel, message: &str);
}

/// Shared handle to the host port.
pub type SharedEnv = Arc<dyn TenEnv>;

/// Issues `cmd` through `env` and returns the waiter for its result.
///
/// The command is handed to the host before this returns, so any wait on
/// the returned [`PendingCmd`] starts strictly after the issue.
pub fn issue_cmd(env: &dyn TenEnv, issuer: &ExtensionId, cmd: Cmd) -> PendingCmd {
    let (pending, sink) = PendingCmd::new(&cmd, issuer);
    tracing::trace!(
        extension = %issuer,
        cmd = %pending.cmd_name(),
        cmd_id = %pending.cmd_id(),
        "issuing command"
    );
    env.send_cmd(cmd, sink);
    pending
}
