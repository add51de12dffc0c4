#![forbid(unsafe_code)]

//! Scripted edits: `insert-group`, `create:G`, `select:G:T`,
//! `rename:G:T:TITLE`, `delete:G:T`.
//!
//! `G` is the zero-based index of a group in document order and `T` the
//! zero-based tab ordinal inside it.

use std::fmt;
use std::str::FromStr;

use ftabs::{Path, TabEditor};
use tracing::info;

use crate::error::{DemoError, Result};

/// One scripted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOp {
    InsertGroup,
    Create { group: usize },
    Select { group: usize, tab: usize },
    Rename { group: usize, tab: usize, title: String },
    Delete { group: usize, tab: usize },
}

fn index(field: &str, what: &str, op: &str) -> std::result::Result<usize, String> {
    field
        .parse()
        .map_err(|_| format!("{op}: {what} must be a number, got {field:?}"))
}

impl FromStr for ScriptOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');
        let name = parts.next().unwrap_or_default();
        let mut next = |what: &str| {
            parts
                .next()
                .ok_or_else(|| format!("{name}: missing {what}"))
        };
        let op = match name {
            "insert-group" => Self::InsertGroup,
            "create" => Self::Create {
                group: index(next("group")?, "group", name)?,
            },
            "select" => Self::Select {
                group: index(next("group")?, "group", name)?,
                tab: index(next("tab")?, "tab", name)?,
            },
            "rename" => Self::Rename {
                group: index(next("group")?, "group", name)?,
                tab: index(next("tab")?, "tab", name)?,
                title: next("title")?.to_owned(),
            },
            "delete" => Self::Delete {
                group: index(next("group")?, "group", name)?,
                tab: index(next("tab")?, "tab", name)?,
            },
            other => return Err(format!("unknown op {other:?}")),
        };
        if parts.next().is_some() && !matches!(op, Self::Rename { .. }) {
            return Err(format!("{name}: too many fields in {s:?}"));
        }
        Ok(op)
    }
}

impl fmt::Display for ScriptOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertGroup => write!(f, "insert-group"),
            Self::Create { group } => write!(f, "create:{group}"),
            Self::Select { group, tab } => write!(f, "select:{group}:{tab}"),
            Self::Rename { group, tab, title } => write!(f, "rename:{group}:{tab}:{title}"),
            Self::Delete { group, tab } => write!(f, "delete:{group}:{tab}"),
        }
    }
}

fn group_path(editor: &TabEditor, group: usize) -> Result<Path> {
    editor
        .groups()
        .into_iter()
        .nth(group)
        .map(|summary| summary.path)
        .ok_or_else(|| DemoError::invalid(format!("no tab group #{group}")))
}

/// Apply one op. Returns whether the document changed.
///
/// # Errors
///
/// Fails when the group index does not resolve or the edit is rejected.
pub fn apply(editor: &mut TabEditor, op: &ScriptOp) -> Result<bool> {
    let changed = match op {
        ScriptOp::InsertGroup => {
            editor.insert_tab_group()?;
            true
        }
        ScriptOp::Create { group } => {
            let path = group_path(editor, *group)?;
            editor.create_tab(&path)?
        }
        ScriptOp::Select { group, tab } => {
            let path = group_path(editor, *group)?;
            editor.select_tab(&path, *tab)?
        }
        ScriptOp::Rename { group, tab, title } => {
            let path = group_path(editor, *group)?;
            editor.rename_tab(&path, *tab, title)?
        }
        ScriptOp::Delete { group, tab } => {
            let path = group_path(editor, *group)?;
            editor.delete_tab(&path, *tab)?
        }
    };
    info!(op = %op, changed, "script op applied");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_op() {
        assert_eq!("insert-group".parse(), Ok(ScriptOp::InsertGroup));
        assert_eq!("create:1".parse(), Ok(ScriptOp::Create { group: 1 }));
        assert_eq!(
            "select:0:2".parse(),
            Ok(ScriptOp::Select { group: 0, tab: 2 })
        );
        assert_eq!(
            "rename:0:1:Notes: draft".parse(),
            Ok(ScriptOp::Rename {
                group: 0,
                tab: 1,
                title: "Notes: draft".into()
            })
        );
        assert_eq!(
            "delete:2:0".parse(),
            Ok(ScriptOp::Delete { group: 2, tab: 0 })
        );
    }

    #[test]
    fn rejects_malformed_ops() {
        assert!("explode".parse::<ScriptOp>().is_err());
        assert!("select:0".parse::<ScriptOp>().is_err());
        assert!("select:a:0".parse::<ScriptOp>().is_err());
        assert!("delete:0:0:0".parse::<ScriptOp>().is_err());
    }

    #[test]
    fn display_parses_back() {
        let op = ScriptOp::Rename {
            group: 3,
            tab: 1,
            title: "x".into(),
        };
        assert_eq!(op.to_string().parse(), Ok(op));
    }

    #[test]
    fn missing_group_is_a_usage_error() {
        let mut editor = TabEditor::default();
        let err = apply(&mut editor, &ScriptOp::Create { group: 0 }).expect_err("no group");
        assert_eq!(err.exit_code(), 2);
        assert!(apply(&mut editor, &ScriptOp::InsertGroup).expect("insert"));
        assert!(apply(&mut editor, &ScriptOp::Create { group: 0 }).expect("create"));
        assert_eq!(editor.groups()[0].tabs.len(), 2);
    }
}
