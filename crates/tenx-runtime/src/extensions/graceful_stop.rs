//! GracefulStopExtension - waits for a peer to confirm `stop`.
//!
//! ```text
//! on_stop   → StopCoordinator::on_stop_requested (spawned)
//! on_deinit → StopCoordinator::on_deinit_requested
//! on_cmd    → spawned: log, forward "start" and relay its result
//! ```
//!
//! Hooks that spawn must be called from inside a tokio runtime.

use tenx_extension::{
    issue_cmd, Extension, ExtensionAddon, LifecycleState, SharedEnv, StopCoordinator,
    StopSettings,
};
use tenx_msg::{Cmd, CmdResult, LogLevel};
use tenx_types::ExtensionId;
use tracing::debug;

/// Descriptor for [`GracefulStopExtension`] with default [`StopSettings`].
pub const GRACEFUL_STOP_ADDON: ExtensionAddon = ExtensionAddon::new("graceful_stop", create);

fn create(instance: &str) -> Box<dyn Extension> {
    Box::new(GracefulStopExtension::new(instance))
}

/// Name of the inbound command that is forwarded downstream.
const START_CMD: &str = "start";

/// Extension whose stop completes only after its `stop` command succeeds.
///
/// A failed, dropped or timed-out `stop` is reported as
/// `on_stop_done(Err(..))`, and a later deinit reports
/// `on_deinit_done(Err(NotStopped))`.
pub struct GracefulStopExtension {
    id: ExtensionId,
    stop: StopCoordinator,
}

impl GracefulStopExtension {
    /// Creates an instance with default stop settings.
    #[must_use]
    pub fn new(instance: &str) -> Self {
        Self::with_settings(instance, StopSettings::default())
    }

    #[must_use]
    pub fn with_settings(instance: &str, settings: StopSettings) -> Self {
        let id = ExtensionId::new(GRACEFUL_STOP_ADDON.name(), instance);
        Self {
            stop: StopCoordinator::new(id.clone(), settings),
            id,
        }
    }

    /// Returns `true` once the peer confirmed `stop`.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.stop.state()
    }
}

impl Extension for GracefulStopExtension {
    fn id(&self) -> &ExtensionId {
        &self.id
    }

    fn on_stop(&self, env: SharedEnv) {
        // The coordinator reports stop-done itself; the handle is not needed.
        drop(self.stop.on_stop_requested(env));
    }

    fn on_deinit(&self, env: SharedEnv) {
        if let Err(e) = self.stop.on_deinit_requested(&env) {
            debug!(extension = %self.id, error = %e, "deinit reported failure");
        }
    }

    fn on_cmd(&self, env: SharedEnv, cmd: Cmd) {
        let id = self.id.clone();
        let timeout = self.stop.settings().timeout;

        tokio::spawn(async move {
            let name = match cmd.name() {
                Ok(name) => name.to_string(),
                Err(e) => {
                    env.log(LogLevel::Warn, &format!("unreadable command: {e}"));
                    return;
                }
            };
            env.log(LogLevel::Info, &format!("receive command: {name}"));

            if name != START_CMD {
                return;
            }

            let pending = issue_cmd(env.as_ref(), &id, cmd.fork());
            let answer = match pending.wait(timeout).await {
                Ok(result) => result.answering(&cmd),
                Err(e) => CmdResult::error(&cmd, e.to_string()),
            };
            env.return_result(answer);
        });
    }
}
