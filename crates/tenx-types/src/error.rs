//! Unified error interface for tenx.
//!
//! Every tenx error enum implements [`ErrorCode`]. A host that receives
//! a failed lifecycle report can branch on the code without parsing the
//! message.
//!
//! # Example
//!
//! ```
//! use tenx_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum StopError {
//!     Timeout,
//!     Rejected,
//! }
//!
//! impl ErrorCode for StopError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Timeout => "STOP_TIMEOUT",
//!             Self::Rejected => "STOP_REJECTED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(StopError::Timeout.code(), "STOP_TIMEOUT");
//! assert!(!StopError::Rejected.is_recoverable());
//! ```

/// Machine-readable error code interface.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE
/// - Prefixed with the owning crate's domain (`MSG_`, `EXTENSION_`, `DRIVER_`)
/// - Stable once published
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying (or a corrective action) may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows tenx conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use tenx_types::{assert_error_code, ErrorCode};
///
/// struct E;
/// impl ErrorCode for E {
///     fn code(&self) -> &'static str { "MY_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&E, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in `errors`. Use with a list of all variants.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
