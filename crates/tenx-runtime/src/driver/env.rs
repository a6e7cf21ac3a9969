//! [`TenEnv`] backed by a channel to the driver.

use crate::router::CmdRouter;
use std::sync::Arc;
use tenx_extension::{ExtensionError, ResultSink, TenEnv};
use tenx_msg::{Cmd, CmdResult, LogLevel};
use tenx_types::ExtensionId;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

/// Something the extension told its host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ConfigureDone,
    InitDone,
    StartDone,
    StopDone(Result<(), ExtensionError>),
    DeinitDone(Result<(), ExtensionError>),
    Result(CmdResult),
}

/// Host port handed to the driven extension.
///
/// Completion calls and returned results become [`HostEvent`]s on an
/// unbounded channel, so no call blocks. Outbound commands go to the
/// router; log lines go to `tracing`.
pub(crate) struct ChannelEnv {
    extension: ExtensionId,
    events: mpsc::UnboundedSender<HostEvent>,
    router: Arc<dyn CmdRouter>,
}

impl ChannelEnv {
    pub(crate) fn new(
        extension: ExtensionId,
        events: mpsc::UnboundedSender<HostEvent>,
        router: Arc<dyn CmdRouter>,
    ) -> Self {
        Self {
            extension,
            events,
            router,
        }
    }

    fn emit(&self, event: HostEvent) {
        if self.events.send(event).is_err() {
            trace!(extension = %self.extension, "driver gone, host event discarded");
        }
    }
}

impl TenEnv for ChannelEnv {
    fn on_configure_done(&self) {
        self.emit(HostEvent::ConfigureDone);
    }

    fn on_init_done(&self) {
        self.emit(HostEvent::InitDone);
    }

    fn on_start_done(&self) {
        self.emit(HostEvent::StartDone);
    }

    fn on_stop_done(&self, outcome: Result<(), ExtensionError>) {
        self.emit(HostEvent::StopDone(outcome));
    }

    fn on_deinit_done(&self, outcome: Result<(), ExtensionError>) {
        self.emit(HostEvent::DeinitDone(outcome));
    }

    fn send_cmd(&self, cmd: Cmd, sink: ResultSink) {
        self.router.route(cmd, sink);
    }

    fn return_result(&self, result: CmdResult) {
        self.emit(HostEvent::Result(result));
    }

    fn log(&self, level: LogLevel, message: &str) {
        let ext = &self.extension;
        match level {
            LogLevel::Verbose => trace!(extension = %ext, "{message}"),
            LogLevel::Debug => debug!(extension = %ext, "{message}"),
            LogLevel::Info => info!(extension = %ext, "{message}"),
            LogLevel::Warn => warn!(extension = %ext, "{message}"),
            LogLevel::Error | LogLevel::Fatal => {
                error!(extension = %ext, severity = %level, "{message}");
            }
        }
    }
}
