//! tenx - run a builtin extension through its lifecycle.
//!
//! The binary plays the host for a single extension instance: it drives
//! configure, init and start, dispatches the requested messages, then
//! stops and deinits. Outbound commands are answered by a scripted peer.
//!
//! # Configuration
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TENX_*`)
//! 3. Project config (`.tenx/config.toml` under `-C`, default current dir)
//! 4. Global config (`~/.tenx/config.toml`)
//! 5. Default values
//!
//! # Exit status
//!
//! `0` when every phase completed, `1` when any phase reported a failure
//! (for example a refused `stop` or a deinit before stop).

mod scenario;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use scenario::Scenario;
use std::path::PathBuf;
use std::sync::Arc;
use tenx_runtime::{
    builtin_addons, instantiate, ConfigLoader, LifecycleDriver, ReplyMode, RuntimeConfig,
    ScriptedRouter,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Run a builtin tenx extension through its lifecycle
#[derive(Parser, Debug)]
#[command(name = "tenx")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Builtin addon to instantiate
    #[arg(short, long, default_value = "graceful_stop")]
    extension: String,

    /// Instance name
    #[arg(long, default_value = "main")]
    instance: String,

    /// How the peer answers the stop command: ok, error, drop or hold
    #[arg(long, default_value = "ok")]
    stop_reply: ReplyMode,

    /// Override the stop command name (also: TENX_STOP_CMD)
    #[arg(long)]
    stop_cmd: Option<String>,

    /// Override the stop wait in milliseconds, 0 waits forever (also: TENX_STOP_TIMEOUT_MS)
    #[arg(long)]
    stop_timeout_ms: Option<u64>,

    /// Go from start straight to deinit
    #[arg(long)]
    skip_stop: bool,

    /// Dispatch a command after start (repeatable)
    #[arg(long = "send-cmd", value_name = "NAME")]
    send_cmd: Vec<String>,

    /// Dispatch a data message after start (repeatable)
    #[arg(long = "send-data", value_name = "NAME")]
    send_data: Vec<String>,

    /// List builtin addons and exit
    #[arg(long)]
    list: bool,
}

impl Args {
    fn project_root(&self) -> PathBuf {
        self.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        })
    }

    /// Loads file/env config and applies CLI overrides on top.
    fn resolve_config(&self) -> Result<RuntimeConfig> {
        let mut config = ConfigLoader::new()
            .with_project_root(self.project_root())
            .load()
            .map_err(|e| anyhow!("Config error: {e}"))?;

        if self.debug {
            config.debug = true;
        }
        if let Some(ref name) = self.stop_cmd {
            if name.is_empty() {
                bail!("--stop-cmd must not be empty");
            }
            config.stop.cmd_name.clone_from(name);
        }
        if let Some(ms) = self.stop_timeout_ms {
            config.stop.timeout_ms = ms;
        }

        Ok(config)
    }

    fn scenario(&self) -> Scenario {
        Scenario {
            cmds: self.send_cmd.clone(),
            data: self.send_data.clone(),
            skip_stop: self.skip_stop,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    // --debug > RUST_LOG > config log level
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(filter))
        .init();

    if args.list {
        for addon in builtin_addons() {
            println!("{}", addon.name());
        }
        return Ok(());
    }

    let extension = instantiate(&args.extension, &args.instance, &config).ok_or_else(|| {
        let known: Vec<_> = builtin_addons().iter().map(|a| a.name()).collect();
        anyhow!(
            "unknown extension '{}' (available: {})",
            args.extension,
            known.join(", ")
        )
    })?;

    println!("tenx v{}", env!("CARGO_PKG_VERSION"));
    println!("extension: {}", extension.id().fqn());
    info!(
        stop_cmd = %config.stop.cmd_name,
        stop_timeout_ms = config.stop.timeout_ms,
        stop_reply = %args.stop_reply,
        "Driving extension"
    );

    let router = Arc::new(
        ScriptedRouter::new(ReplyMode::Ok)
            .with_reply(&config.stop.cmd_name, args.stop_reply.clone()),
    );
    let mut driver = LifecycleDriver::new(extension, router, &config.driver);

    let report = scenario::run(&mut driver, &args.scenario()).await;
    print!("{report}");

    if let Some(e) = report.failure() {
        bail!("lifecycle failed: {e}");
    }
    println!("lifecycle complete");
    Ok(())
}
