//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.tenx/config.toml`)
//! 3. Project config (`.tenx/config.toml`)
//! 4. Environment variables (`TENX_*`)
//!
//! Each layer overrides the previous. A file only overrides the keys it
//! sets, so a project file can put back a default the global file changed.

use super::{
    default_config_path, ConfigError, ConfigLayer, RuntimeConfig, PROJECT_CONFIG_DIR,
    PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

macro_rules! parse_env_u64 {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = val
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_env_var($var, "expected integer"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use tenx_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), tenx_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to `~/.tenx/config.toml`).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.tenx/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be parsed,
    /// or an environment variable holds an unparseable value.
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let mut config = RuntimeConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_layer) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                global_layer.apply(&mut config);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_layer) = load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    project_layer.apply(&mut config);
                }
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }
}

/// Loads a config file, returning `None` if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let layer = ConfigLayer::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(layer))
}

fn apply_env_vars(config: &mut RuntimeConfig) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "TENX_DEBUG");
    parse_env_u64!(config.stop.timeout_ms, "TENX_STOP_TIMEOUT_MS");
    parse_env_u64!(config.driver.phase_timeout_ms, "TENX_PHASE_TIMEOUT_MS");

    if let Ok(val) = std::env::var("TENX_LOG_LEVEL") {
        config.log.level = val;
    }
    if let Ok(val) = std::env::var("TENX_STOP_CMD") {
        if val.is_empty() {
            return Err(ConfigError::invalid_env_var(
                "TENX_STOP_CMD",
                "command name must not be empty",
            ));
        }
        config.stop.cmd_name = val;
    }

    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_defaults_only() {
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn load_global_config() {
        let temp = TempDir::new().unwrap();
        let config_path = create_config_file(
            temp.path(),
            r#"
[stop]
cmd_name = "halt"
timeout_ms = 250
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&config_path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config.stop.cmd_name, "halt");
        assert_eq!(config.stop.timeout_ms, 250);
    }

    #[test]
    fn load_project_overrides_global() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();

        let tenx_dir = project_temp.path().join(".tenx");
        std::fs::create_dir_all(&tenx_dir).unwrap();

        let global_path = create_config_file(
            global_temp.path(),
            r#"
debug = true

[stop]
cmd_name = "global-stop"
"#,
        );

        create_config_file(
            &tenx_dir,
            r#"
[stop]
cmd_name = "project-stop"
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        assert!(config.debug);
        assert_eq!(config.stop.cmd_name, "project-stop");
    }

    #[test]
    fn missing_config_files_ok() {
        let config = ConfigLoader::new()
            .with_global_config("/nonexistent/path/config.toml")
            .with_project_root("/nonexistent/project")
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), "[stop\ncmd_name = ");

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn project_restores_default_overridden_by_global() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();
        let tenx_dir = project_temp.path().join(".tenx");
        std::fs::create_dir_all(&tenx_dir).unwrap();

        let global_path = create_config_file(
            global_temp.path(),
            r#"
[stop]
timeout_ms = 0

[log]
level = "trace"
"#,
        );
        create_config_file(
            &tenx_dir,
            r#"
[stop]
timeout_ms = 5000
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config.stop.timeout_ms, 5_000);
        assert!(config.stop.timeout().is_some());
        assert_eq!(config.log.level, "trace");
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));

        assert_eq!(parse_bool("invalid"), None);
    }

    #[test]
    fn env_var_override() {
        // Only test in this crate that touches TENX_* vars.
        std::env::set_var("TENX_STOP_CMD", "env-stop");
        std::env::set_var("TENX_STOP_TIMEOUT_MS", "1500");
        std::env::set_var("TENX_DEBUG", "yes");

        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .load();

        std::env::set_var("TENX_STOP_TIMEOUT_MS", "soon");
        let bad = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .load();

        std::env::remove_var("TENX_STOP_CMD");
        std::env::remove_var("TENX_STOP_TIMEOUT_MS");
        std::env::remove_var("TENX_DEBUG");

        let config = config.unwrap();
        assert_eq!(config.stop.cmd_name, "env-stop");
        assert_eq!(config.stop.timeout_ms, 1500);
        assert!(config.debug);
        assert!(matches!(bad, Err(ConfigError::InvalidEnvVar { .. })));
    }
}
