//! Error types and error handling strategy for bestbasis.
//!
//! Error handling follows these principles:
//!
//! - Errors are explicit and typed (no stringly-typed errors)
//! - Expected search outcomes are values, not errors: an empty basis, a
//!   basis that cannot be inverted and a representation loop that hit its
//!   iteration cap are all reported through return types
//! - Broken internal invariants panic
//!
//! Each subsystem defines its own `thiserror` enum (`DatasetError`,
//! `InversionError`, `SearchError`, ...) which converts into the crate-wide
//! [`Error`] at API boundaries.

use std::fmt;
use std::sync::Arc;

/// The kind of error that occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The dataset contained no records.
    EmptyDataset,
    /// The dataset could not be interpreted (bad width, inconsistent states).
    InvalidDataset,
    /// Reading or writing a file failed.
    Io,
    /// Configuration could not be loaded or failed validation.
    Config,
    /// A caller passed arguments the operation cannot handle.
    InvalidInput,
    /// Internal error (bug).
    Internal,
}

impl ErrorKind {
    /// Returns the error category for this kind.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyDataset | Self::InvalidDataset => ErrorCategory::Data,
            Self::Io => ErrorCategory::Io,
            Self::Config | Self::InvalidInput => ErrorCategory::Usage,
            Self::Internal => ErrorCategory::Internal,
        }
    }

    /// Returns true if the failure is caused by the caller's input rather
    /// than the environment or a bug.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Data | ErrorCategory::Usage
        )
    }
}

/// High-level error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Dataset content problems.
    Data,
    /// Filesystem failures.
    Io,
    /// Configuration and argument problems.
    Usage,
    /// Bugs.
    Internal,
}

/// The main error type for bestbasis operations.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Adds a source error to the chain.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Returns the error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Creates an empty-dataset error.
    #[must_use]
    pub fn empty_dataset() -> Self {
        Self::new(ErrorKind::EmptyDataset).with_message("no data")
    }

    /// Creates an invalid-input error.
    #[must_use]
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput).with_message(detail)
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal).with_message(detail)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io)
            .with_message(err.to_string())
            .with_source(err)
    }
}

/// A specialized Result type for bestbasis operations.
pub type Result<T> = std::result::Result<T, Error>;
