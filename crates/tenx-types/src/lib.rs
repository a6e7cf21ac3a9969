//! Core types for tenx.
//!
//! This crate is the bottom layer of the extension SDK:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Extension SDK Layer                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  tenx-types     : ID types, ErrorCode            ◄── HERE   │
//! │  tenx-msg       : Cmd, CmdResult, Data, frames              │
//! │  tenx-extension : Extension trait, TenEnv, StopCoordinator  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifiers
//!
//! - [`ExtensionId`]: identity of an extension instance
//! - [`CmdId`]: identity of a single issued command, used to pair a
//!   command with its one result
//!
//! # Errors
//!
//! All tenx error enums implement [`ErrorCode`] so that hosts can react
//! to machine-readable codes instead of parsing messages.

mod error;
mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{CmdId, ExtensionId};
