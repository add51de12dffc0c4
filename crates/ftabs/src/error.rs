#![forbid(unsafe_code)]

//! Unified error model and recovery mapping.
//!
//! Each layer keeps its own typed error; this enum wraps them so callers can
//! use one `Result` and still ask what to do next through
//! [`Error::recovery`].

use std::fmt;

use ftabs_core::{EditError, MarkupError};
use ftabs_runtime::ConfigError;

/// Top-level error type for ftabs.
#[derive(Debug)]
pub enum Error {
    /// A transaction was rejected by the schema.
    Edit(EditError),
    /// Markup could not be parsed into a document.
    Markup(MarkupError),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type for ftabs APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the caller should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Discard the rejected edit; the document is unchanged.
    DropEdit,
    /// Keep the current document and ignore the failed load.
    KeepDocument,
    /// Fall back to default configuration.
    UseDefaults,
    /// The error is unrecoverable; shut down.
    Shutdown,
}

impl Error {
    /// Recovery action for this error.
    #[must_use]
    pub fn recovery(&self) -> RecoveryAction {
        match self {
            Self::Edit(_) => RecoveryAction::DropEdit,
            Self::Markup(_) => RecoveryAction::KeepDocument,
            Self::Config(_) => RecoveryAction::UseDefaults,
            Self::Io(_) => RecoveryAction::Shutdown,
        }
    }

    /// Error type label for tracing fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Edit(_) => "edit",
            Self::Markup(_) => "markup",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// Whether the error is recoverable (does not require shutdown).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery(), RecoveryAction::Shutdown)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit(err) => write!(f, "edit rejected: {err}"),
            Self::Markup(err) => write!(f, "markup: {err}"),
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Edit(err) => Some(err),
            Self::Markup(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<EditError> for Error {
    fn from(err: EditError) -> Self {
        Self::Edit(err)
    }
}

impl From<MarkupError> for Error {
    fn from(err: MarkupError) -> Self {
        Self::Markup(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DropEdit => write!(f, "drop_edit"),
            Self::KeepDocument => write!(f, "keep_document"),
            Self::UseDefaults => write!(f, "use_defaults"),
            Self::Shutdown => write!(f, "shutdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use ftabs_core::Path;

    use super::*;

    #[test]
    fn edit_errors_drop_the_edit() {
        let err = Error::from(EditError::PathNotFound(Path::from(vec![3])));
        assert_eq!(err.recovery(), RecoveryAction::DropEdit);
        assert_eq!(err.error_type(), "edit");
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("/3"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn markup_errors_keep_the_document() {
        let err = Error::from(MarkupError::UnknownElement("blink".into()));
        assert_eq!(err.recovery(), RecoveryAction::KeepDocument);
        assert!(err.to_string().contains("blink"));
    }

    #[test]
    fn config_errors_fall_back_to_defaults() {
        let err = Error::from(ConfigError::Validation(vec!["bad".into()]));
        assert_eq!(err.recovery(), RecoveryAction::UseDefaults);
        assert_eq!(err.error_type(), "config");
    }

    #[test]
    fn io_is_fatal() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.recovery(), RecoveryAction::Shutdown);
        assert!(!err.is_recoverable());
        assert_eq!(RecoveryAction::Shutdown.to_string(), "shutdown");
    }
}
