//! Structured error messages for the CLI.
//!
//! Follows RFC 9457 (Problem Details) style for machine-readable errors
//! with human-friendly formatting.

use super::exit::ExitCode;
use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Structured error following RFC 9457 (Problem Details) style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliError {
    /// Error type identifier (machine-readable).
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable title.
    pub title: String,

    /// Detailed explanation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,

    /// Suggested action for recovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Additional context (varies by error type).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,

    /// Exit code for this error.
    pub exit_code: i32,
}

impl CliError {
    /// Create a new CLI error.
    #[must_use]
    pub fn new(error_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            title: title.into(),
            detail: String::new(),
            suggestion: None,
            context: HashMap::new(),
            exit_code: ExitCode::RUNTIME_ERROR,
        }
    }

    /// Add detailed explanation.
    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Add a suggested recovery action.
    #[must_use]
    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add context field.
    #[must_use]
    pub fn context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Set exit code.
    #[must_use]
    pub const fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Format for human output.
    ///
    /// When `color` is true, includes ANSI escape codes for terminal coloring.
    #[must_use]
    pub fn human_format(&self, color: bool) -> String {
        let mut out = String::new();

        if color {
            out.push_str("\x1b[1;31m"); // Bold red
        }
        out.push_str("Error: ");
        out.push_str(&self.title);
        if color {
            out.push_str("\x1b[0m");
        }
        out.push('\n');

        if !self.detail.is_empty() {
            out.push_str(&self.detail);
            out.push('\n');
        }

        if let Some(ref suggestion) = self.suggestion {
            out.push('\n');
            if color {
                out.push_str("\x1b[33m"); // Yellow
            }
            out.push_str("Suggestion: ");
            out.push_str(suggestion);
            if color {
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }

        if !self.context.is_empty() {
            out.push('\n');
            if color {
                out.push_str("\x1b[2m"); // Dim
            }
            out.push_str("Context:\n");
            let mut keys: Vec<&String> = self.context.keys().collect();
            keys.sort();
            for k in keys {
                use std::fmt::Write;
                let _ = writeln!(out, "  {k}: {}", self.context[k]);
            }
            if color {
                out.push_str("\x1b[0m");
            }
        }

        out
    }

    /// Format as JSON.
    #[must_use]
    pub fn json_format(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.title.clone())
    }

    /// Format as pretty JSON.
    #[must_use]
    pub fn json_pretty_format(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.title.clone())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_type, self.title)
    }
}

impl std::error::Error for CliError {}

impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        let (error_type, title) = match err.kind() {
            ErrorKind::EmptyDataset => ("empty_dataset", "Dataset has no records"),
            ErrorKind::InvalidDataset => ("invalid_dataset", "Invalid dataset"),
            ErrorKind::Io => ("io_error", "I/O error"),
            ErrorKind::Config => ("config_error", "Invalid configuration"),
            ErrorKind::InvalidInput => ("invalid_input", "Invalid input"),
            ErrorKind::Internal => ("internal_error", "Internal error"),
        };
        Self::new(error_type, title)
            .detail(err.message().unwrap_or_default())
            .exit_code(ExitCode::for_kind(err.kind()))
    }
}

/// Standard error constructors.
pub mod errors {
    use super::{CliError, ExitCode, Path};
    use std::io;

    /// Invalid argument error.
    #[must_use]
    pub fn invalid_argument(arg: &str, reason: &str) -> CliError {
        CliError::new("invalid_argument", format!("Invalid argument: {arg}"))
            .detail(reason)
            .exit_code(ExitCode::USER_ERROR)
    }

    /// File not found error.
    #[must_use]
    pub fn file_not_found(path: &str) -> CliError {
        CliError::new("file_not_found", "File not found")
            .detail(format!("The file '{path}' does not exist"))
            .suggestion("Check the path and try again")
            .context("path", path)
            .exit_code(ExitCode::USER_ERROR)
    }

    /// Permission denied error.
    #[must_use]
    pub fn permission_denied(path: &str) -> CliError {
        CliError::new("permission_denied", "Permission denied")
            .detail(format!("Cannot access '{path}'"))
            .suggestion("Check file permissions or run with appropriate privileges")
            .context("path", path)
            .exit_code(ExitCode::USER_ERROR)
    }

    /// Maps an I/O failure on `path` to the matching error.
    #[must_use]
    pub fn io_error(path: &Path, err: &io::Error) -> CliError {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => file_not_found(&shown),
            io::ErrorKind::PermissionDenied => permission_denied(&shown),
            _ => CliError::new("io_error", "I/O error")
                .detail(err.to_string())
                .context("path", shown)
                .exit_code(ExitCode::RUNTIME_ERROR),
        }
    }

    /// Dataset without records.
    #[must_use]
    pub fn empty_dataset(path: &Path) -> CliError {
        CliError::new("empty_dataset", "Dataset has no records")
            .detail(format!("'{}' contains no data lines", path.display()))
            .context("path", path.display().to_string())
            .exit_code(ExitCode::EMPTY_DATASET)
    }

    /// Configuration that failed to load or validate.
    #[must_use]
    pub fn config_error(details: &str) -> CliError {
        CliError::new("config_error", "Invalid configuration")
            .detail(details)
            .suggestion("Check the config file, BESTBASIS_* variables and flags")
            .exit_code(ExitCode::USER_ERROR)
    }

    /// Representation loop hit its cap.
    #[must_use]
    pub fn not_converged(representations: usize) -> CliError {
        CliError::new("not_converged", "Search did not converge")
            .detail(format!(
                "The representation loop stopped after {representations} representations"
            ))
            .suggestion("Raise --max-representations or --batch-size")
            .context("representations", representations)
            .exit_code(ExitCode::NOT_CONVERGED)
    }

    /// Internal error (bug).
    #[must_use]
    pub fn internal(details: &str) -> CliError {
        CliError::new("internal_error", "Internal error")
            .detail(details)
            .exit_code(ExitCode::INTERNAL_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, Error, ErrorKind, ExitCode, errors};
    use std::path::Path;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn error_serializes_to_json() {
        init_test("error_serializes_to_json");
        let error = CliError::new("test_error", "Test Error")
            .detail("Something went wrong")
            .suggestion("Try again")
            .context("file", "data.dat")
            .exit_code(1);

        let json = error.json_format();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        crate::assert_with_log!(
            parsed["type"] == "test_error",
            "type",
            "test_error",
            parsed["type"].clone()
        );
        crate::assert_with_log!(
            parsed["context"]["file"] == "data.dat",
            "context file",
            "data.dat",
            parsed["context"]["file"].clone()
        );
        crate::assert_with_log!(
            parsed["exit_code"] == 1,
            "exit_code",
            1,
            parsed["exit_code"].clone()
        );
        crate::test_complete!("error_serializes_to_json");
    }

    #[test]
    fn error_human_format_includes_all_parts() {
        init_test("error_human_format_includes_all_parts");
        let error = CliError::new("test_error", "Test Error")
            .detail("Details here")
            .suggestion("Try this")
            .context("b", 2)
            .context("a", 1);

        let human = error.human_format(false);
        assert!(human.contains("Error: Test Error"));
        assert!(human.contains("Details here"));
        assert!(human.contains("Suggestion: Try this"));
        let a = human.find("  a: 1");
        let b = human.find("  b: 2");
        crate::assert_with_log!(a < b, "context sorted", "a before b", (a, b));
        assert!(!human.contains("\x1b["));
        assert!(error.human_format(true).contains("\x1b["));
        crate::test_complete!("error_human_format_includes_all_parts");
    }

    #[test]
    fn library_errors_convert() {
        init_test("library_errors_convert");
        let cli: CliError = Error::empty_dataset().into();
        assert_eq!(cli.error_type, "empty_dataset");
        assert_eq!(cli.exit_code, ExitCode::EMPTY_DATASET);

        let cli: CliError = Error::new(ErrorKind::Io).with_message("disk gone").into();
        assert_eq!(cli.exit_code, ExitCode::RUNTIME_ERROR);
        assert_eq!(cli.detail, "disk gone");

        let cli: CliError = Error::internal("frozen column moved").into();
        assert_eq!(cli.exit_code, ExitCode::INTERNAL_ERROR);
        crate::test_complete!("library_errors_convert");
    }

    #[test]
    fn standard_errors_have_correct_exit_codes() {
        init_test("standard_errors_have_correct_exit_codes");
        assert_eq!(
            errors::invalid_argument("-n", "bad").exit_code,
            ExitCode::USER_ERROR
        );
        assert_eq!(
            errors::config_error("k_max must be > 0").exit_code,
            ExitCode::USER_ERROR
        );
        assert_eq!(
            errors::empty_dataset(Path::new("x.dat")).exit_code,
            ExitCode::EMPTY_DATASET
        );
        assert_eq!(errors::not_converged(50).exit_code, ExitCode::NOT_CONVERGED);
        assert_eq!(errors::internal("bug").exit_code, ExitCode::INTERNAL_ERROR);

        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = errors::io_error(Path::new("absent.dat"), &missing);
        assert_eq!(err.error_type, "file_not_found");
        assert_eq!(err.exit_code, ExitCode::USER_ERROR);
        let other = std::io::Error::other("boom");
        let err = errors::io_error(Path::new("out.dat"), &other);
        assert_eq!(err.exit_code, ExitCode::RUNTIME_ERROR);
        crate::test_complete!("standard_errors_have_correct_exit_codes");
    }

    #[test]
    fn error_deserializes_from_json() {
        init_test("error_deserializes_from_json");
        let json = r#"{"type":"not_converged","title":"Search did not converge","exit_code":5}"#;
        let error: CliError = serde_json::from_str(json).unwrap();
        assert_eq!(error.error_type, "not_converged");
        assert_eq!(error.exit_code, ExitCode::NOT_CONVERGED);
        crate::test_complete!("error_deserializes_from_json");
    }
}
