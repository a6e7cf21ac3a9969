//! Layered runtime configuration.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────┐
//! │  1. Environment Variables (TENX_*)      │
//! ├─────────────────────────────────────────┤
//! │  2. Project Config (.tenx/config.toml)  │
//! ├─────────────────────────────────────────┤
//! │  3. Global Config (~/.tenx/config.toml) │
//! ├─────────────────────────────────────────┤
//! │  4. Default Values                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `TENX_DEBUG` | `debug` | bool |
//! | `TENX_LOG_LEVEL` | `log.level` | String |
//! | `TENX_STOP_CMD` | `stop.cmd_name` | String |
//! | `TENX_STOP_TIMEOUT_MS` | `stop.timeout_ms` | u64 |
//! | `TENX_PHASE_TIMEOUT_MS` | `driver.phase_timeout_ms` | u64 |
//!
//! # Example Configuration
//!
//! ```toml
//! # <project>/.tenx/config.toml
//! debug = false
//!
//! [log]
//! level = "info"
//!
//! [stop]
//! cmd_name = "stop"
//! timeout_ms = 5000   # 0 waits forever
//!
//! [driver]
//! phase_timeout_ms = 10000
//! cmd_timeout_ms = 5000
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{
    ConfigLayer, DriverConfig, DriverLayer, LogConfig, LogLayer, RuntimeConfig, StopConfig,
    StopLayer,
};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".tenx")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".tenx";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
