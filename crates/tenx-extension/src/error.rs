//! Extension layer errors.
//!
//! These are reported to the host through the lifecycle completion calls
//! ([`TenEnv::on_stop_done`](crate::TenEnv::on_stop_done) and
//! [`TenEnv::on_deinit_done`](crate::TenEnv::on_deinit_done)) instead of
//! terminating the process. The host decides what a failure means.
//!
//! None is recoverable: every failed stop leaves the instance `Fatal`,
//! and there is no retry.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`StopFailed`](ExtensionError::StopFailed) | `EXTENSION_STOP_FAILED` | No |
//! | [`Timeout`](ExtensionError::Timeout) | `EXTENSION_TIMEOUT` | No |
//! | [`ResultDropped`](ExtensionError::ResultDropped) | `EXTENSION_RESULT_DROPPED` | No |
//! | [`NotStopped`](ExtensionError::NotStopped) | `EXTENSION_NOT_STOPPED` | No |
//! | [`InvalidTransition`](ExtensionError::InvalidTransition) | `EXTENSION_INVALID_TRANSITION` | No |
//! | [`Interrupted`](ExtensionError::Interrupted) | `EXTENSION_INTERRUPTED` | No |

use crate::LifecycleState;
use tenx_msg::StatusCode;
use tenx_types::ErrorCode;
use thiserror::Error;

/// Extension layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    /// A command came back with a non-`Ok` status.
    #[error("{cmd} failed with status {status}{}", detail_suffix(.detail))]
    StopFailed {
        cmd: String,
        status: StatusCode,
        detail: Option<String>,
    },

    /// No result arrived before the deadline.
    #[error("no result for {cmd} within {timeout_ms}ms")]
    Timeout { cmd: String, timeout_ms: u64 },

    /// The host dropped the result sink without delivering a result.
    #[error("host dropped the result for {cmd} without delivering it")]
    ResultDropped { cmd: String },

    /// Deinit was requested before the stop handshake completed.
    #[error("deinit requested while {state}; stop handshake never completed")]
    NotStopped { state: LifecycleState },

    /// A lifecycle transition is not allowed from the current state.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    /// A lifecycle hook exited before reaching its outcome.
    #[error("{phase} exited before completing")]
    Interrupted { phase: &'static str },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ErrorCode for ExtensionError {
    fn code(&self) -> &'static str {
        match self {
            Self::StopFailed { .. } => "EXTENSION_STOP_FAILED",
            Self::Timeout { .. } => "EXTENSION_TIMEOUT",
            Self::ResultDropped { .. } => "EXTENSION_RESULT_DROPPED",
            Self::NotStopped { .. } => "EXTENSION_NOT_STOPPED",
            Self::InvalidTransition { .. } => "EXTENSION_INVALID_TRANSITION",
            Self::Interrupted { .. } => "EXTENSION_INTERRUPTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenx_types::assert_error_codes;

    fn all_variants() -> Vec<ExtensionError> {
        vec![
            ExtensionError::StopFailed {
                cmd: "stop".into(),
                status: StatusCode::Error,
                detail: None,
            },
            ExtensionError::Timeout {
                cmd: "stop".into(),
                timeout_ms: 10,
            },
            ExtensionError::ResultDropped { cmd: "stop".into() },
            ExtensionError::NotStopped {
                state: LifecycleState::Active,
            },
            ExtensionError::InvalidTransition {
                from: LifecycleState::Fatal,
                to: LifecycleState::StopPending,
            },
            ExtensionError::Interrupted { phase: "deinit" },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "EXTENSION_");
    }

    #[test]
    fn nothing_is_recoverable() {
        for err in all_variants() {
            assert!(!err.is_recoverable(), "{}", err.code());
        }
    }

    #[test]
    fn stop_failed_display_with_detail() {
        let err = ExtensionError::StopFailed {
            cmd: "stop".into(),
            status: StatusCode::Error,
            detail: Some("peer busy".into()),
        };
        assert_eq!(err.to_string(), "stop failed with status error: peer busy");
    }

    #[test]
    fn stop_failed_display_without_detail() {
        let err = ExtensionError::StopFailed {
            cmd: "stop".into(),
            status: StatusCode::Error,
            detail: None,
        };
        assert_eq!(err.to_string(), "stop failed with status error");
    }

    #[test]
    fn not_stopped_names_state() {
        let err = ExtensionError::NotStopped {
            state: LifecycleState::StopPending,
        };
        assert!(err.to_string().contains("stop_pending"));
    }
}
