//! Extension SDK for tenx.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Extension SDK Layer                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  tenx-types     : ID types, ErrorCode                       │
//! │  tenx-msg       : Cmd, CmdResult, Data, frames              │
//! │  tenx-extension : Extension trait, TenEnv, StopCoordinator ◄│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Pieces
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Extension`] | hooks the host calls |
//! | [`TenEnv`] / [`SharedEnv`] | calls the extension makes into the host |
//! | [`PendingCmd`] / [`ResultSink`] | one-shot pairing of a command and its result |
//! | [`LifecycleCell`] | atomic per-instance lifecycle state |
//! | [`StopCoordinator`] | send `stop`, await its result, then report stop-done |
//! | [`ExtensionAddon`] | name + factory an extension module publishes |
//! | [`testing`] | [`MockEnv`](testing::MockEnv) for unit tests |
//!
//! # Failure reporting
//!
//! Nothing in this crate terminates the process. A failed stop handshake
//! or a premature deinit is reported to the host as an
//! [`ExtensionError`] through `on_stop_done` / `on_deinit_done`.

mod addon;
mod env;
mod error;
mod extension;
mod lifecycle;
mod pending;
mod stop;
pub mod testing;

pub use addon::{ExtensionAddon, ExtensionFactory};
pub use env::{issue_cmd, SharedEnv, TenEnv};
pub use error::ExtensionError;
pub use extension::Extension;
pub use lifecycle::{LifecycleCell, LifecycleState};
pub use pending::{PendingCmd, ResultSink};
pub use stop::{StopCoordinator, StopSettings, DEFAULT_STOP_CMD, DEFAULT_STOP_TIMEOUT};
