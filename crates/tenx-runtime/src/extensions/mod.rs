//! Builtin extensions.
//!
//! - [`BridgeExtension`] - logs every callback and acknowledges every phase
//! - [`GracefulStopExtension`] - holds stop-done until a peer confirms `stop`

mod bridge;
mod graceful_stop;

pub use bridge::{BridgeExtension, BRIDGE_ADDON};
pub use graceful_stop::{GracefulStopExtension, GRACEFUL_STOP_ADDON};
