//! BridgeExtension - pass-through extension that logs what it sees.
//!
//! Every lifecycle hook is acknowledged at once. Commands are answered
//! with an `Ok` result carrying the command's properties. Data is
//! inspected but never answered.

use serde_json::Value;
use tenx_extension::{Extension, ExtensionAddon, SharedEnv};
use tenx_msg::{AudioFrame, Cmd, CmdResult, Data, LogLevel, VideoFrame};
use tenx_types::ExtensionId;

/// Descriptor for [`BridgeExtension`].
pub const BRIDGE_ADDON: ExtensionAddon = ExtensionAddon::new("bridge", create);

fn create(instance: &str) -> Box<dyn Extension> {
    Box::new(BridgeExtension::new(instance))
}

/// Pass-through extension.
///
/// # Example
///
/// ```
/// use tenx_runtime::extensions::BridgeExtension;
/// use tenx_extension::Extension;
///
/// let ext = BridgeExtension::new("b0");
/// assert_eq!(ext.id().fqn(), "bridge::b0");
/// ```
pub struct BridgeExtension {
    id: ExtensionId,
}

impl BridgeExtension {
    #[must_use]
    pub fn new(instance: &str) -> Self {
        Self {
            id: ExtensionId::new(BRIDGE_ADDON.name(), instance),
        }
    }
}

impl Extension for BridgeExtension {
    fn id(&self) -> &ExtensionId {
        &self.id
    }

    fn on_configure(&self, env: SharedEnv) {
        env.log(LogLevel::Debug, "[bridge] on_configure called");
        env.on_configure_done();
    }

    fn on_init(&self, env: SharedEnv) {
        env.log(LogLevel::Debug, "[bridge] on_init called");
        env.on_init_done();
    }

    fn on_start(&self, env: SharedEnv) {
        env.log(LogLevel::Debug, "on_start");
        env.on_start_done();
    }

    fn on_stop(&self, env: SharedEnv) {
        env.log(LogLevel::Debug, "on_stop");
        env.on_stop_done(Ok(()));
    }

    fn on_deinit(&self, env: SharedEnv) {
        env.log(LogLevel::Debug, "[bridge] on_deinit called");
        env.on_deinit_done(Ok(()));
    }

    fn on_cmd(&self, env: SharedEnv, cmd: Cmd) {
        env.log(LogLevel::Debug, "on_cmd");
        let payload = cmd.property("").cloned().unwrap_or(Value::Null);
        env.return_result(CmdResult::ok(&cmd).with_payload(payload));
    }

    fn on_data(&self, env: SharedEnv, data: Data) {
        let name = match data.name() {
            Ok(name) => name,
            Err(e) => {
                env.log(LogLevel::Warn, &format!("[bridge] on_data name error: {e}"));
                return;
            }
        };
        match data.properties_json("") {
            Ok(json) => env.log(
                LogLevel::Debug,
                &format!("[bridge] on_data name: {name} properties: {json}"),
            ),
            Err(e) => env.log(
                LogLevel::Warn,
                &format!("[bridge] on_data properties error: {e}"),
            ),
        }
    }

    fn on_audio_frame(&self, env: SharedEnv, frame: AudioFrame) {
        env.log(
            LogLevel::Debug,
            &format!("[bridge] on_audio_frame called: {frame}"),
        );
    }

    fn on_video_frame(&self, env: SharedEnv, frame: VideoFrame) {
        env.log(
            LogLevel::Debug,
            &format!("[bridge] on_video_frame called: {frame}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenx_extension::testing::{HostSignal, MockEnv};
    use tenx_msg::{PixelFormat, StatusCode};

    #[test]
    fn lifecycle_is_acknowledged() {
        let ext = BridgeExtension::new("b");
        let env = MockEnv::new();

        ext.on_configure(env.shared());
        ext.on_init(env.shared());
        ext.on_start(env.shared());
        ext.on_stop(env.shared());
        ext.on_deinit(env.shared());

        assert_eq!(env.stop_done(), vec![Ok(())]);
        assert_eq!(env.deinit_done(), vec![Ok(())]);
        let acks: Vec<_> = env
            .signals()
            .into_iter()
            .filter(|s| !matches!(s, HostSignal::Log { .. }))
            .collect();
        assert_eq!(acks.len(), 5);
        assert!(env.sent_cmds().is_empty());
    }

    #[test]
    fn cmd_echoes_properties() {
        let ext = BridgeExtension::new("b");
        let env = MockEnv::new();
        let cmd = Cmd::new("greet").with_property("who", json!("world"));

        ext.on_cmd(env.shared(), cmd.clone());

        let results = env.returned_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status(), StatusCode::Ok);
        assert_eq!(results[0].cmd_id(), cmd.id());
        assert_eq!(results[0].payload(), &json!({"who": "world"}));
    }

    #[test]
    fn data_is_logged_with_properties() {
        let ext = BridgeExtension::new("b");
        let env = MockEnv::new();

        ext.on_data(
            env.shared(),
            Data::new("asr").with_property("text", json!("hi")),
        );

        let logs = env.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, LogLevel::Debug);
        assert!(logs[0].1.contains("name: asr"));
        assert!(logs[0].1.contains(r#""text":"hi""#));
        assert!(env.returned_results().is_empty());
    }

    #[test]
    fn unnamed_data_warns_and_returns() {
        let ext = BridgeExtension::new("b");
        let env = MockEnv::new();

        ext.on_data(env.shared(), Data::new(""));

        let logs = env.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, LogLevel::Warn);
        assert!(env.returned_results().is_empty());
    }

    #[test]
    fn frames_are_logged() {
        let ext = BridgeExtension::new("b");
        let env = MockEnv::new();

        ext.on_audio_frame(
            env.shared(),
            AudioFrame {
                name: "pcm".into(),
                sample_rate: 16_000,
                channels: 1,
                bytes_per_sample: 2,
                samples_per_channel: 160,
                timestamp_ms: 0,
                buf: vec![0; 320],
            },
        );
        ext.on_video_frame(
            env.shared(),
            VideoFrame {
                name: "cam".into(),
                width: 2,
                height: 2,
                pixel_format: PixelFormat::Rgba,
                timestamp_ms: 40,
                is_eof: false,
                buf: vec![0; 16],
            },
        );

        let logs = env.logs();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].1.contains("pcm"));
        assert!(logs[1].1.contains("cam"));
    }

    #[test]
    fn addon_builds_bridge() {
        let ext = BRIDGE_ADDON.create("x");
        assert_eq!(ext.id().fqn(), "bridge::x");
    }
}
