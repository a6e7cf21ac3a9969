//! Driver errors.

use crate::driver::Phase;
use tenx_extension::ExtensionError;
use tenx_types::ErrorCode;
use thiserror::Error;

/// Failure while driving an extension through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The extension never acknowledged a phase.
    #[error("{phase} not acknowledged within {timeout_ms}ms")]
    PhaseTimeout { phase: Phase, timeout_ms: u64 },

    /// The extension acknowledged a phase with an error.
    #[error("{phase} failed: {source}")]
    ExtensionFailed {
        phase: Phase,
        #[source]
        source: ExtensionError,
    },

    /// Every host handle was dropped.
    #[error("host channel closed")]
    Disconnected,
}

impl DriverError {
    /// Returns the extension error behind this failure, if any.
    #[must_use]
    pub fn extension_error(&self) -> Option<&ExtensionError> {
        match self {
            Self::ExtensionFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ErrorCode for DriverError {
    fn code(&self) -> &'static str {
        match self {
            Self::PhaseTimeout { .. } => "DRIVER_PHASE_TIMEOUT",
            Self::ExtensionFailed { .. } => "DRIVER_EXTENSION_FAILED",
            Self::Disconnected => "DRIVER_DISCONNECTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::PhaseTimeout { .. })
    }
}
