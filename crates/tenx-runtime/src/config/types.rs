//! Configuration types.
//!
//! [`RuntimeConfig`] is the resolved configuration; every field has a
//! compile-time default. [`ConfigLayer`] is what one config file says:
//! every field is optional, and only the fields a file sets are applied.

use serde::Deserialize;
use std::time::Duration;
use tenx_extension::{StopSettings, DEFAULT_STOP_CMD, DEFAULT_STOP_TIMEOUT};

/// Unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use tenx_runtime::config::RuntimeConfig;
///
/// let config = RuntimeConfig::default();
/// assert_eq!(config.stop.cmd_name, "stop");
/// assert_eq!(config.log_level(), "info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Forces debug-level logging regardless of `log.level`.
    pub debug: bool,

    /// Logging configuration.
    pub log: LogConfig,

    /// Graceful-stop configuration.
    pub stop: StopConfig,

    /// In-process driver configuration.
    pub driver: DriverConfig,
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the level used to build the log filter.
    #[must_use]
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log.level
        }
    }

    /// Builds the settings a [`StopCoordinator`](tenx_extension::StopCoordinator) runs with.
    #[must_use]
    pub fn stop_settings(&self) -> StopSettings {
        StopSettings {
            cmd_name: self.stop.cmd_name.clone(),
            timeout: self.stop.timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"tenx_runtime=debug"`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// Graceful-stop configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopConfig {
    /// Name of the command sent on stop.
    pub cmd_name: String,

    /// Bound on the wait for the stop result. `0` waits forever.
    pub timeout_ms: u64,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            cmd_name: DEFAULT_STOP_CMD.into(),
            timeout_ms: u64::try_from(DEFAULT_STOP_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl StopConfig {
    /// Returns the wait bound, `None` when unbounded.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// In-process driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// How long each lifecycle phase may take to be acknowledged.
    pub phase_timeout_ms: u64,

    /// How long a dispatched command may take to produce its result.
    pub cmd_timeout_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            phase_timeout_ms: 10_000,
            cmd_timeout_ms: 5_000,
        }
    }
}

impl DriverConfig {
    #[must_use]
    pub fn phase_timeout(&self) -> Duration {
        Duration::from_millis(self.phase_timeout_ms)
    }

    #[must_use]
    pub fn cmd_timeout(&self) -> Duration {
        Duration::from_millis(self.cmd_timeout_ms)
    }
}

/// One config file's worth of settings.
///
/// A field that is present wins over the layers below it, even when it
/// equals the default. A field that is absent leaves them alone.
///
/// # Example
///
/// ```
/// use tenx_runtime::config::{ConfigLayer, RuntimeConfig};
///
/// let mut config = RuntimeConfig::default();
/// ConfigLayer::from_toml("[stop]\ntimeout_ms = 0").unwrap().apply(&mut config);
/// ConfigLayer::from_toml("[stop]\ntimeout_ms = 5000").unwrap().apply(&mut config);
/// assert_eq!(config.stop.timeout_ms, 5000);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigLayer {
    pub debug: Option<bool>,
    pub log: LogLayer,
    pub stop: StopLayer,
    pub driver: DriverLayer,
}

/// `[log]` section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogLayer {
    pub level: Option<String>,
}

/// `[stop]` section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StopLayer {
    pub cmd_name: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// `[driver]` section of a [`ConfigLayer`].
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverLayer {
    pub phase_timeout_ms: Option<u64>,
    pub cmd_timeout_ms: Option<u64>,
}

impl ConfigLayer {
    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Applies every field this layer sets to `config`.
    pub fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
        if let Some(ref level) = self.log.level {
            config.log.level.clone_from(level);
        }
        if let Some(ref name) = self.stop.cmd_name {
            config.stop.cmd_name.clone_from(name);
        }
        if let Some(ms) = self.stop.timeout_ms {
            config.stop.timeout_ms = ms;
        }
        if let Some(ms) = self.driver.phase_timeout_ms {
            config.driver.phase_timeout_ms = ms;
        }
        if let Some(ms) = self.driver.cmd_timeout_ms {
            config.driver.cmd_timeout_ms = ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stop_coordinator() {
        let config = RuntimeConfig::default();
        assert_eq!(config.stop_settings(), StopSettings::default());
        assert_eq!(config.stop.timeout_ms, 5_000);
        assert_eq!(config.driver.phase_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn zero_timeout_is_unbounded() {
        let stop = StopConfig {
            timeout_ms: 0,
            ..StopConfig::default()
        };
        assert_eq!(stop.timeout(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let layer = ConfigLayer::from_toml(
            r#"
[stop]
cmd_name = "halt"
"#,
        )
        .unwrap();

        let mut config = RuntimeConfig::default();
        layer.apply(&mut config);

        assert_eq!(config.stop.cmd_name, "halt");
        assert_eq!(config.stop.timeout_ms, 5_000);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn empty_layer_changes_nothing() {
        let mut config = RuntimeConfig::default();
        config.log.level = "warn".into();
        config.stop.timeout_ms = 100;
        let before = config.clone();

        ConfigLayer::default().apply(&mut config);

        assert_eq!(config, before);
    }

    #[test]
    fn explicit_default_value_overrides_lower_layer() {
        let mut config = RuntimeConfig::default();
        ConfigLayer::from_toml("debug = true\n[stop]\ntimeout_ms = 0")
            .unwrap()
            .apply(&mut config);
        assert_eq!(config.stop.timeout(), None);

        ConfigLayer::from_toml("debug = false\n[stop]\ntimeout_ms = 5000")
            .unwrap()
            .apply(&mut config);

        assert!(!config.debug);
        assert_eq!(config.stop.timeout_ms, 5_000);
        assert_eq!(config.stop_settings(), StopSettings::default());
    }

    #[test]
    fn debug_forces_log_level() {
        let mut config = RuntimeConfig::default();
        config.log.level = "warn".into();
        assert_eq!(config.log_level(), "warn");

        config.debug = true;
        assert_eq!(config.log_level(), "debug");
    }
}
