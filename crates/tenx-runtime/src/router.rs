//! Outbound command routing for the in-process driver.
//!
//! Whatever an extension sends through
//! [`TenEnv::send_cmd`](tenx_extension::TenEnv::send_cmd) lands in a
//! [`CmdRouter`]. [`ScriptedRouter`] stands in for the downstream peer
//! with a canned reply per command name.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tenx_extension::ResultSink;
use tenx_msg::{Cmd, CmdResult};
use tracing::debug;

/// Destination for outbound commands.
///
/// Implementations must fulfill or drop every sink; they must not block.
pub trait CmdRouter: Send + Sync {
    fn route(&self, cmd: Cmd, sink: ResultSink);
}

impl<F> CmdRouter for F
where
    F: Fn(Cmd, ResultSink) + Send + Sync,
{
    fn route(&self, cmd: Cmd, sink: ResultSink) {
        self(cmd, sink);
    }
}

/// Canned answer for a routed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMode {
    /// Answer `Ok`.
    Ok,
    /// Answer `Error` with this detail.
    Error(String),
    /// Drop the sink without answering.
    Drop,
    /// Keep the sink unanswered until the router is dropped.
    Hold,
}

impl FromStr for ReplyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(Self::Ok),
            "error" => Ok(Self::Error("rejected by peer".into())),
            "drop" => Ok(Self::Drop),
            "hold" => Ok(Self::Hold),
            other => Err(format!(
                "unknown reply mode '{other}' (expected ok, error, drop or hold)"
            )),
        }
    }
}

impl fmt::Display for ReplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Error(_) => f.write_str("error"),
            Self::Drop => f.write_str("drop"),
            Self::Hold => f.write_str("hold"),
        }
    }
}

/// Router that answers from a per-name script.
pub struct ScriptedRouter {
    default: ReplyMode,
    by_name: HashMap<String, ReplyMode>,
    held: Mutex<Vec<ResultSink>>,
    routed: Mutex<Vec<String>>,
}

impl ScriptedRouter {
    /// Creates a router answering every command with `default`.
    #[must_use]
    pub fn new(default: ReplyMode) -> Self {
        Self {
            default,
            by_name: HashMap::new(),
            held: Mutex::new(Vec::new()),
            routed: Mutex::new(Vec::new()),
        }
    }

    /// Overrides the reply for commands named `name`.
    #[must_use]
    pub fn with_reply(mut self, name: impl Into<String>, mode: ReplyMode) -> Self {
        self.by_name.insert(name.into(), mode);
        self
    }

    /// Names of every routed command, in order.
    #[must_use]
    pub fn routed(&self) -> Vec<String> {
        self.routed.lock().clone()
    }

    /// Number of sinks held unanswered.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.held.lock().len()
    }
}

impl CmdRouter for ScriptedRouter {
    fn route(&self, cmd: Cmd, sink: ResultSink) {
        let name = sink.cmd_name().to_string();
        let mode = self.by_name.get(&name).unwrap_or(&self.default);
        debug!(cmd = %name, cmd_id = %cmd.id(), reply = %mode, "routing command");
        self.routed.lock().push(name);

        match mode {
            ReplyMode::Ok => {
                sink.fulfill(CmdResult::ok(&cmd));
            }
            ReplyMode::Error(detail) => {
                sink.fulfill(CmdResult::error(&cmd, detail.clone()));
            }
            ReplyMode::Drop => drop(sink),
            ReplyMode::Hold => self.held.lock().push(sink),
        }
    }
}
