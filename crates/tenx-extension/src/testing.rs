//! Test doubles for extension code.
//!
//! [`MockEnv`] implements [`TenEnv`] without a host. It records every
//! host-facing call as a [`HostSignal`] and answers outbound commands
//! according to a scripted [`Reply`].
//!
//! # Example
//!
//! ```
//! use tenx_extension::testing::{MockEnv, Reply};
//! use tenx_extension::{StopCoordinator, StopSettings};
//! use tenx_types::ExtensionId;
//!
//! # tokio_test_block(async {
//! let env = MockEnv::with_default_reply(Reply::Ok);
//! let coord = StopCoordinator::new(ExtensionId::builtin("a"), StopSettings::default());
//!
//! coord.run_stop(env.shared()).await.unwrap();
//! assert_eq!(env.stop_done(), vec![Ok(())]);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

use crate::{ExtensionError, ResultSink, SharedEnv, TenEnv};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tenx_msg::{Cmd, CmdResult, LogLevel, StatusCode};
use tenx_types::CmdId;
use tokio::sync::Notify;

/// One host-facing call made by an extension.
#[derive(Debug, Clone, PartialEq)]
pub enum HostSignal {
    ConfigureDone,
    InitDone,
    StartDone,
    StopDone(Result<(), ExtensionError>),
    DeinitDone(Result<(), ExtensionError>),
    CmdSent { cmd_id: CmdId, name: String },
    ResultReturned(CmdResult),
    Log { level: LogLevel, message: String },
}

/// How [`MockEnv`] answers an outbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Fulfill at once with [`StatusCode::Ok`].
    Ok,
    /// Fulfill at once with [`StatusCode::Error`] and this detail.
    Error(String),
    /// Drop the sink without fulfilling it.
    Drop,
    /// Keep the sink until [`MockEnv::release_held`].
    Hold,
}

/// Recording, scriptable [`TenEnv`].
pub struct MockEnv {
    signals: Mutex<Vec<HostSignal>>,
    default_reply: Reply,
    replies: Mutex<HashMap<String, Reply>>,
    held: Mutex<Vec<(Cmd, ResultSink)>>,
    changed: Notify,
}

impl MockEnv {
    /// Creates an env that answers every command with [`Reply::Ok`].
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_default_reply(Reply::Ok)
    }

    /// Creates an env that answers every command with `reply`.
    #[must_use]
    pub fn with_default_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            signals: Mutex::new(Vec::new()),
            default_reply: reply,
            replies: Mutex::new(HashMap::new()),
            held: Mutex::new(Vec::new()),
            changed: Notify::new(),
        })
    }

    /// Overrides the reply for commands named `cmd_name`.
    pub fn set_reply(&self, cmd_name: impl Into<String>, reply: Reply) {
        self.replies.lock().insert(cmd_name.into(), reply);
    }

    /// Returns this env as a [`SharedEnv`].
    #[must_use]
    pub fn shared(self: &Arc<Self>) -> SharedEnv {
        Arc::clone(self) as SharedEnv
    }

    /// Returns a snapshot of every recorded signal, in order.
    #[must_use]
    pub fn signals(&self) -> Vec<HostSignal> {
        self.signals.lock().clone()
    }

    /// Returns every `on_stop_done` outcome, in order.
    #[must_use]
    pub fn stop_done(&self) -> Vec<Result<(), ExtensionError>> {
        self.collect(|s| match s {
            HostSignal::StopDone(r) => Some(r.clone()),
            _ => None,
        })
    }

    /// Returns every `on_deinit_done` outcome, in order.
    #[must_use]
    pub fn deinit_done(&self) -> Vec<Result<(), ExtensionError>> {
        self.collect(|s| match s {
            HostSignal::DeinitDone(r) => Some(r.clone()),
            _ => None,
        })
    }

    /// Returns the names of all outbound commands, in order.
    #[must_use]
    pub fn sent_cmds(&self) -> Vec<String> {
        self.collect(|s| match s {
            HostSignal::CmdSent { name, .. } => Some(name.clone()),
            _ => None,
        })
    }

    /// Returns every result returned for an inbound command.
    #[must_use]
    pub fn returned_results(&self) -> Vec<CmdResult> {
        self.collect(|s| match s {
            HostSignal::ResultReturned(r) => Some(r.clone()),
            _ => None,
        })
    }

    /// Returns every log line.
    #[must_use]
    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.collect(|s| match s {
            HostSignal::Log { level, message } => Some((*level, message.clone())),
            _ => None,
        })
    }

    /// Returns the number of sinks currently held by [`Reply::Hold`].
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.held.lock().len()
    }

    /// Fulfills every held sink with `status`. Returns how many were held.
    pub fn release_held(&self, status: StatusCode) -> usize {
        let held: Vec<_> = std::mem::take(&mut *self.held.lock());
        let count = held.len();
        for (cmd, sink) in held {
            sink.fulfill(CmdResult::new(status, &cmd));
        }
        count
    }

    /// Waits until `pred` holds over the recorded signals.
    ///
    /// Returns `false` if `timeout` elapses first.
    pub async fn wait_until(
        &self,
        timeout: Duration,
        pred: impl Fn(&[HostSignal]) -> bool,
    ) -> bool {
        let wait = async {
            loop {
                let changed = self.changed.notified();
                if pred(self.signals.lock().as_slice()) {
                    return;
                }
                changed.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }

    fn collect<T>(&self, pick: impl Fn(&HostSignal) -> Option<T>) -> Vec<T> {
        self.signals.lock().iter().filter_map(pick).collect()
    }

    fn record(&self, signal: HostSignal) {
        self.signals.lock().push(signal);
        self.changed.notify_waiters();
    }
}

impl TenEnv for MockEnv {
    fn on_configure_done(&self) {
        self.record(HostSignal::ConfigureDone);
    }

    fn on_init_done(&self) {
        self.record(HostSignal::InitDone);
    }

    fn on_start_done(&self) {
        self.record(HostSignal::StartDone);
    }

    fn on_stop_done(&self, outcome: Result<(), ExtensionError>) {
        self.record(HostSignal::StopDone(outcome));
    }

    fn on_deinit_done(&self, outcome: Result<(), ExtensionError>) {
        self.record(HostSignal::DeinitDone(outcome));
    }

    fn send_cmd(&self, cmd: Cmd, sink: ResultSink) {
        let name = cmd.name().unwrap_or_default().to_string();
        self.record(HostSignal::CmdSent {
            cmd_id: cmd.id(),
            name: name.clone(),
        });

        let reply = self
            .replies
            .lock()
            .get(&name)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            Reply::Ok => {
                sink.fulfill(CmdResult::ok(&cmd));
            }
            Reply::Error(detail) => {
                sink.fulfill(CmdResult::error(&cmd, detail));
            }
            Reply::Drop => drop(sink),
            Reply::Hold => {
                self.held.lock().push((cmd, sink));
                self.changed.notify_waiters();
            }
        }
    }

    fn return_result(&self, result: CmdResult) {
        self.record(HostSignal::ResultReturned(result));
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.record(HostSignal::Log {
            level,
            message: message.to_string(),
        });
    }
}
