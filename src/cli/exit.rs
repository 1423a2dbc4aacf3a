//! Semantic exit codes for the `bestbasis` binary.
//!
//! Exit codes follow common conventions and are in the valid range (0-125).
//! Codes 126-255 are reserved by shells for special purposes.

use crate::error::{ErrorCategory, ErrorKind};

/// Semantic exit codes for the CLI.
///
/// These follow common conventions and provide machine-readable status.
/// All codes are in the valid range (0-125).
pub struct ExitCode;

impl ExitCode {
    /// Success - a basis was found and reported.
    pub const SUCCESS: i32 = 0;

    /// User error - bad arguments, bad configuration, malformed data.
    pub const USER_ERROR: i32 = 1;

    /// Runtime error - reading or writing a file failed.
    pub const RUNTIME_ERROR: i32 = 2;

    /// Internal error - bug in the tool itself.
    pub const INTERNAL_ERROR: i32 = 3;

    /// The dataset had no records.
    pub const EMPTY_DATASET: i32 = 4;

    /// The representation loop hit its iteration cap; the basis is still
    /// reported.
    pub const NOT_CONVERGED: i32 = 5;

    /// Get human-readable description of an exit code.
    #[must_use]
    pub const fn description(code: i32) -> &'static str {
        match code {
            0 => "success",
            1 => "user error (invalid input/arguments)",
            2 => "runtime error",
            3 => "internal error (bug)",
            4 => "empty dataset",
            5 => "search did not converge",
            _ => "unknown",
        }
    }

    /// Exit code for a library error of the given kind.
    #[must_use]
    pub const fn for_kind(kind: ErrorKind) -> i32 {
        match kind {
            ErrorKind::EmptyDataset => Self::EMPTY_DATASET,
            _ => match kind.category() {
                ErrorCategory::Data | ErrorCategory::Usage => Self::USER_ERROR,
                ErrorCategory::Io => Self::RUNTIME_ERROR,
                ErrorCategory::Internal => Self::INTERNAL_ERROR,
            },
        }
    }

    /// Check if an exit code indicates success (code 0).
    #[must_use]
    pub const fn is_success(code: i32) -> bool {
        code == Self::SUCCESS
    }

    /// Check if an exit code indicates any kind of failure (non-zero).
    #[must_use]
    pub const fn is_failure(code: i32) -> bool {
        code != Self::SUCCESS
    }
}
