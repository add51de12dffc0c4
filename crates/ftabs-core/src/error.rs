#![forbid(unsafe_code)]

//! Substrate errors.

use thiserror::Error;

use crate::path::Path;

/// A transaction or node construction was rejected.
///
/// Rejection is always total: the document is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no node at path {0}")]
    PathNotFound(Path),

    #[error("index {index} out of bounds for {len} children at {parent}")]
    IndexOutOfBounds {
        parent: Path,
        index: usize,
        len: usize,
    },

    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    #[error("node kind '{kind}' has no attribute '{attr}'")]
    UnknownAttr { kind: String, attr: String },

    #[error("attribute '{attr}' on '{kind}' expects a {expected} value")]
    AttrType {
        kind: String,
        attr: String,
        expected: &'static str,
    },

    #[error("content of '{kind}' at {path} violates rule {rule}")]
    SchemaViolation {
        kind: String,
        path: Path,
        rule: String,
    },
}

/// Markup could not be mapped to a document.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup syntax: {0}")]
    Syntax(#[from] roxmltree::Error),

    #[error("no node kind matches <{0}>")]
    UnknownElement(String),

    #[error("text is not allowed inside '{0}'")]
    UnexpectedText(String),

    #[error(transparent)]
    Edit(#[from] EditError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = EditError::IndexOutOfBounds {
            parent: Path::from(vec![0]),
            index: 9,
            len: 4,
        };
        assert_eq!(err.to_string(), "index 9 out of bounds for 4 children at /0");

        let err = EditError::SchemaViolation {
            kind: "tab_group".into(),
            path: Path::from(vec![1]),
            rule: "(tab_selector tab_label tab_panel)+ tab_create".into(),
        };
        assert!(err.to_string().contains("tab_group"));
        assert!(err.to_string().contains("/1"));
    }

    #[test]
    fn markup_wraps_edit_errors() {
        let err: MarkupError = EditError::UnknownKind("blink".into()).into();
        assert_eq!(err.to_string(), "unknown node kind 'blink'");
    }
}
