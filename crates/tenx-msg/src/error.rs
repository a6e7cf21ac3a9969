//! Message layer errors.
//!
//! Raised when an inbound message is missing a field or a property
//! cannot be read. Extensions treat these as recoverable noise: they log
//! a warning and return normally.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`MsgError::MissingName`] | `MSG_MISSING_NAME` | No |
//! | [`MsgError::PropertyNotFound`] | `MSG_PROPERTY_NOT_FOUND` | No |
//! | [`MsgError::Serialize`] | `MSG_SERIALIZE` | No |

use tenx_types::ErrorCode;
use thiserror::Error;

/// Message layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MsgError {
    /// The message carries no name.
    #[error("message has no name")]
    MissingName,

    /// No property exists at the given path.
    #[error("property not found: '{0}'")]
    PropertyNotFound(String),

    /// The property tree could not be serialized.
    #[error("failed to serialize properties: {0}")]
    Serialize(String),
}

impl ErrorCode for MsgError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingName => "MSG_MISSING_NAME",
            Self::PropertyNotFound(_) => "MSG_PROPERTY_NOT_FOUND",
            Self::Serialize(_) => "MSG_SERIALIZE",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
