//! Runtime side of tenx: builtin extensions and a driver to run them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       tenx-runtime                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  extensions : bridge, graceful_stop                         │
//! │  addons     : builtin descriptor lookup                     │
//! │  config     : layered TOML + TENX_* env                     │
//! │  driver     : LifecycleDriver, HostEvent, DriverError       │
//! │  router     : CmdRouter, ScriptedRouter                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Extensions only see the [`TenEnv`](tenx_extension::TenEnv) port, so
//! everything here is replaceable by a real host.

pub mod addons;
pub mod config;
pub mod driver;
pub mod extensions;
pub mod router;

pub use addons::{builtin_addons, find_addon, instantiate};
pub use config::{ConfigError, ConfigLoader, RuntimeConfig};
pub use driver::{DriverError, HostEvent, LifecycleDriver, Phase};
pub use router::{CmdRouter, ReplyMode, ScriptedRouter};
