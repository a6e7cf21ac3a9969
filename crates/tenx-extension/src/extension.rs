//! The [`Extension`] trait.
//!
//! The host drives every extension through the same hooks, in order:
//!
//! ```text
//! on_configure → on_init → on_start → (messages…) → on_stop → on_deinit
//! ```
//!
//! Each lifecycle hook must eventually be acknowledged through the
//! matching `on_*_done` call on the [`TenEnv`](crate::TenEnv). The
//! acknowledgement may come from a spawned task after the hook returns;
//! hooks themselves must never block the host's dispatch thread.
//!
//! Every hook has a default that acknowledges immediately, so an
//! extension only overrides what it cares about.
//!
//! # Example
//!
//! ```
//! use tenx_extension::{Extension, SharedEnv};
//! use tenx_msg::{Cmd, CmdResult, LogLevel};
//! use tenx_types::ExtensionId;
//!
//! struct Echo {
//!     id: ExtensionId,
//! }
//!
//! impl Extension for Echo {
//!     fn id(&self) -> &ExtensionId {
//!         &self.id
//!     }
//!
//!     fn on_cmd(&self, env: SharedEnv, cmd: Cmd) {
//!         env.log(LogLevel::Debug, "on_cmd");
//!         env.return_result(CmdResult::ok(&cmd));
//!     }
//! }
//! ```

use crate::SharedEnv;
use tenx_msg::{AudioFrame, Cmd, CmdResult, Data, VideoFrame};
use tenx_types::ExtensionId;

/// A unit of user logic driven by the host.
///
/// Hooks take `&self`: the host may call a message hook while a spawned
/// task of the same instance is still running, so mutable state lives
/// behind atomics or locks inside the implementation.
pub trait Extension: Send + Sync {
    /// Returns this instance's id.
    fn id(&self) -> &ExtensionId;

    /// Configuration phase.
    fn on_configure(&self, env: SharedEnv) {
        env.on_configure_done();
    }

    /// Initialization phase.
    fn on_init(&self, env: SharedEnv) {
        env.on_init_done();
    }

    /// Start phase.
    fn on_start(&self, env: SharedEnv) {
        env.on_start_done();
    }

    /// Stop phase. Must be followed by exactly one `on_stop_done`.
    fn on_stop(&self, env: SharedEnv) {
        env.on_stop_done(Ok(()));
    }

    /// Deinit phase. Must be followed by exactly one `on_deinit_done`,
    /// on every exit path.
    fn on_deinit(&self, env: SharedEnv) {
        env.on_deinit_done(Ok(()));
    }

    /// Inbound command. May return zero or one result.
    ///
    /// The default answers with an error result.
    fn on_cmd(&self, env: SharedEnv, cmd: Cmd) {
        let name = cmd.name().unwrap_or("<unnamed>").to_string();
        env.return_result(CmdResult::error(
            &cmd,
            format!("command not supported: {name}"),
        ));
    }

    /// Inbound data. No reply.
    fn on_data(&self, _env: SharedEnv, _data: Data) {}

    /// Inbound audio frame. No reply.
    fn on_audio_frame(&self, _env: SharedEnv, _frame: AudioFrame) {}

    /// Inbound video frame. No reply.
    fn on_video_frame(&self, _env: SharedEnv, _frame: VideoFrame) {}
}
