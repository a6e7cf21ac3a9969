//! In-process lifecycle driver.
//!
//! [`LifecycleDriver`] plays the host for a single extension: it calls
//! each hook, then waits for the matching acknowledgement with a bound.
//!
//! ```text
//!            LifecycleDriver
//!   ┌──────────────────────────────┐
//!   │ on_configure/on_init/...  ───┼──► Extension
//!   │                              │        │
//!   │ events ◄── mpsc ◄── ChannelEnv ◄──────┘  on_*_done / return_result
//!   │                         │    │
//!   └─────────────────────────┼────┘
//!                             └──► CmdRouter   send_cmd
//! ```
//!
//! It is a harness for tests and the demo CLI, not a host runtime:
//! one extension, no graph, no message envelopes.

mod env;
mod error;

pub use env::HostEvent;
pub use error::DriverError;

use crate::config::DriverConfig;
use crate::router::CmdRouter;
use env::ChannelEnv;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tenx_extension::{Extension, ExtensionError, SharedEnv};
use tenx_msg::{AudioFrame, Cmd, CmdResult, Data, VideoFrame};
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

/// A lifecycle phase the host drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Configure,
    Init,
    Start,
    Stop,
    Deinit,
}

impl Phase {
    /// Every phase, in the order the host runs them.
    pub const ALL: [Phase; 5] = [
        Phase::Configure,
        Phase::Init,
        Phase::Start,
        Phase::Stop,
        Phase::Deinit,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Init => "init",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Deinit => "deinit",
        }
    }

    /// Returns the outcome if `event` acknowledges this phase.
    fn ack(self, event: &HostEvent) -> Option<Result<(), ExtensionError>> {
        match (self, event) {
            (Self::Configure, HostEvent::ConfigureDone)
            | (Self::Init, HostEvent::InitDone)
            | (Self::Start, HostEvent::StartDone) => Some(Ok(())),
            (Self::Stop, HostEvent::StopDone(outcome))
            | (Self::Deinit, HostEvent::DeinitDone(outcome)) => Some(outcome.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one extension through its lifecycle.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tenx_runtime::config::DriverConfig;
/// use tenx_runtime::driver::LifecycleDriver;
/// use tenx_runtime::extensions::BridgeExtension;
/// use tenx_runtime::router::{ReplyMode, ScriptedRouter};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let router = Arc::new(ScriptedRouter::new(ReplyMode::Ok));
/// let mut driver = LifecycleDriver::new(
///     Box::new(BridgeExtension::new("b")),
///     router,
///     &DriverConfig::default(),
/// );
///
/// driver.start().await.unwrap();
/// driver.stop().await.unwrap();
/// driver.deinit().await.unwrap();
/// # });
/// ```
pub struct LifecycleDriver {
    extension: Arc<dyn Extension>,
    env: SharedEnv,
    events: mpsc::UnboundedReceiver<HostEvent>,
    /// Acknowledgements that arrived while waiting for something else.
    backlog: VecDeque<HostEvent>,
    /// Results that did not answer the command being waited on.
    stray_results: Vec<CmdResult>,
    phase_timeout: Duration,
    cmd_timeout: Duration,
}

impl LifecycleDriver {
    /// Creates a driver; outbound commands from the extension go to `router`.
    #[must_use]
    pub fn new(
        extension: Box<dyn Extension>,
        router: Arc<dyn CmdRouter>,
        config: &DriverConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let env: SharedEnv = Arc::new(ChannelEnv::new(extension.id().clone(), tx, router));
        Self {
            extension: Arc::from(extension),
            env,
            events: rx,
            backlog: VecDeque::new(),
            stray_results: Vec::new(),
            phase_timeout: config.phase_timeout(),
            cmd_timeout: config.cmd_timeout(),
        }
    }

    /// Returns the driven extension.
    #[must_use]
    pub fn extension(&self) -> &dyn Extension {
        self.extension.as_ref()
    }

    /// Results returned for commands nobody was waiting on.
    #[must_use]
    pub fn stray_results(&self) -> &[CmdResult] {
        &self.stray_results
    }

    /// Runs configure, init and start.
    ///
    /// # Errors
    ///
    /// The first phase that fails or is not acknowledged in time.
    pub async fn start(&mut self) -> Result<(), DriverError> {
        for phase in [Phase::Configure, Phase::Init, Phase::Start] {
            self.run_phase(phase).await?;
        }
        Ok(())
    }

    /// Runs stop.
    ///
    /// # Errors
    ///
    /// [`DriverError::ExtensionFailed`] when the extension reports a failed
    /// stop, [`DriverError::PhaseTimeout`] when it reports nothing.
    pub async fn stop(&mut self) -> Result<(), DriverError> {
        self.run_phase(Phase::Stop).await
    }

    /// Runs deinit.
    ///
    /// # Errors
    ///
    /// See [`stop`](Self::stop).
    pub async fn deinit(&mut self) -> Result<(), DriverError> {
        self.run_phase(Phase::Deinit).await
    }

    /// Calls the hook for `phase` and waits for its acknowledgement.
    ///
    /// # Errors
    ///
    /// See [`stop`](Self::stop).
    pub async fn run_phase(&mut self, phase: Phase) -> Result<(), DriverError> {
        let id = self.extension.id().clone();
        let env = Arc::clone(&self.env);
        debug!(extension = %id, %phase, "entering phase");

        match phase {
            Phase::Configure => self.extension.on_configure(env),
            Phase::Init => self.extension.on_init(env),
            Phase::Start => self.extension.on_start(env),
            Phase::Stop => self.extension.on_stop(env),
            Phase::Deinit => self.extension.on_deinit(env),
        }

        match self.await_ack(phase).await? {
            Ok(()) => {
                info!(extension = %id, %phase, "phase done");
                Ok(())
            }
            Err(source) => {
                warn!(extension = %id, %phase, error = %source, "phase failed");
                Err(DriverError::ExtensionFailed { phase, source })
            }
        }
    }

    /// Delivers `cmd` and waits up to the command timeout for its result.
    ///
    /// Returns `Ok(None)` when the extension produced no result in time;
    /// a command may legitimately have none.
    ///
    /// # Errors
    ///
    /// [`DriverError::Disconnected`] if the event channel closed.
    pub async fn dispatch_cmd(&mut self, cmd: Cmd) -> Result<Option<CmdResult>, DriverError> {
        let cmd_id = cmd.id();
        self.extension.on_cmd(Arc::clone(&self.env), cmd);

        if let Some(pos) = self.stray_results.iter().position(|r| r.cmd_id() == cmd_id) {
            return Ok(Some(self.stray_results.remove(pos)));
        }

        let deadline = Instant::now() + self.cmd_timeout;
        loop {
            match timeout_at(deadline, self.events.recv()).await {
                Ok(Some(HostEvent::Result(result))) if result.cmd_id() == cmd_id => {
                    return Ok(Some(result));
                }
                Ok(Some(event)) => self.stash(event),
                Ok(None) => return Err(DriverError::Disconnected),
                Err(_) => {
                    debug!(cmd_id = %cmd_id, "no result within command timeout");
                    return Ok(None);
                }
            }
        }
    }

    /// Delivers `data`. Data never gets a reply.
    pub fn dispatch_data(&self, data: Data) {
        self.extension.on_data(Arc::clone(&self.env), data);
    }

    pub fn dispatch_audio_frame(&self, frame: AudioFrame) {
        self.extension.on_audio_frame(Arc::clone(&self.env), frame);
    }

    pub fn dispatch_video_frame(&self, frame: VideoFrame) {
        self.extension.on_video_frame(Arc::clone(&self.env), frame);
    }

    async fn await_ack(&mut self, phase: Phase) -> Result<Result<(), ExtensionError>, DriverError> {
        if let Some(pos) = self.backlog.iter().position(|e| phase.ack(e).is_some()) {
            if let Some(outcome) = self.backlog.remove(pos).and_then(|e| phase.ack(&e)) {
                return Ok(outcome);
            }
        }

        let deadline = Instant::now() + self.phase_timeout;
        loop {
            let event = match timeout_at(deadline, self.events.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) => return Err(DriverError::Disconnected),
                Err(_) => {
                    return Err(DriverError::PhaseTimeout {
                        phase,
                        timeout_ms: u64::try_from(self.phase_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    })
                }
            };
            if let Some(outcome) = phase.ack(&event) {
                return Ok(outcome);
            }
            self.stash(event);
        }
    }

    fn stash(&mut self, event: HostEvent) {
        match event {
            HostEvent::Result(result) => self.stray_results.push(result),
            other => {
                debug!(event = ?other, "host event arrived out of turn");
                self.backlog.push_back(other);
            }
        }
    }
}
