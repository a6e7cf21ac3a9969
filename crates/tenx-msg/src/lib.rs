//! Message types for tenx.
//!
//! Everything an extension exchanges with its host is one of:
//!
//! | Type | Direction | Reply |
//! |------|-----------|-------|
//! | [`Cmd`] | both | exactly one [`CmdResult`] |
//! | [`Data`] | host → extension | none |
//! | [`AudioFrame`] / [`VideoFrame`] | host → extension | none |
//!
//! Plus the [`LogLevel`] used by the host's diagnostic sink.
//!
//! Commands and data carry a JSON property tree. Property getters take a
//! dotted path (`"a.b.0"`); the empty path addresses the whole tree.
//!
//! # Example
//!
//! ```
//! use tenx_msg::{Cmd, CmdResult, StatusCode};
//! use serde_json::json;
//!
//! let cmd = Cmd::new("start").with_property("graph", json!({"name": "demo"}));
//! assert_eq!(cmd.name().unwrap(), "start");
//! assert_eq!(cmd.property("graph.name").unwrap(), &json!("demo"));
//!
//! let result = CmdResult::ok(&cmd);
//! assert_eq!(result.status(), StatusCode::Ok);
//! assert_eq!(result.cmd_id(), cmd.id());
//! ```

mod cmd;
mod data;
mod error;
mod frame;
mod level;
mod property;

pub use cmd::{Cmd, CmdResult, StatusCode};
pub use data::Data;
pub use error::MsgError;
pub use frame::{AudioFrame, PixelFormat, VideoFrame};
pub use level::LogLevel;
