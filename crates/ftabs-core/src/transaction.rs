#![forbid(unsafe_code)]

//! Transactions: ordered batches of structural steps applied atomically.
//!
//! Builders never touch a document; they only record steps. Paths in each
//! step are resolved against the tree as left by the preceding steps, so a
//! builder that mixes attribute writes with deletions should emit the writes
//! first.
//!
//! # Invariants
//!
//! - A transaction is all-or-nothing: see [`crate::Document::apply`].
//! - Inserted nodes receive schema defaults for every attribute they omit.

use std::fmt;

use crate::document::node_at_mut;
use crate::error::EditError;
use crate::node::{AttrValue, Node};
use crate::path::Path;
use crate::schema::Schema;

/// Who produced a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditSource {
    /// Direct user action routed through a view.
    #[default]
    User,
    /// Follow-up repair issued by a view's deferred materialization.
    Repair,
    /// Issued by application code.
    Programmatic,
}

/// One structural change.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Set an attribute on the node at `path`.
    SetAttr {
        path: Path,
        name: String,
        value: AttrValue,
    },
    /// Insert `nodes` as children of `parent` starting at `index`.
    Insert {
        parent: Path,
        index: usize,
        nodes: Vec<Node>,
    },
    /// Remove children `start..end` of `parent`.
    Delete {
        parent: Path,
        start: usize,
        end: usize,
    },
}

impl Step {
    /// Apply to a working tree.
    ///
    /// # Errors
    ///
    /// Fails when a path does not resolve, an index is out of range, or an
    /// attribute is undeclared or ill-typed. Content rules are checked by the
    /// caller once all steps have run.
    pub(crate) fn apply_to(&self, schema: &Schema, root: &mut Node) -> Result<(), EditError> {
        match self {
            Self::SetAttr { path, name, value } => {
                let node =
                    node_at_mut(root, path).ok_or_else(|| EditError::PathNotFound(path.clone()))?;
                schema.check_attr(node.kind(), name, value)?;
                node.set_attr(name, value.clone());
            }
            Self::Insert {
                parent,
                index,
                nodes,
            } => {
                let target = node_at_mut(root, parent)
                    .ok_or_else(|| EditError::PathNotFound(parent.clone()))?;
                let len = target.child_count();
                if *index > len {
                    return Err(EditError::IndexOutOfBounds {
                        parent: parent.clone(),
                        index: *index,
                        len,
                    });
                }
                let filled = nodes.iter().map(|node| {
                    let mut node = node.clone();
                    fill_defaults(schema, &mut node);
                    node
                });
                target.children_mut().splice(*index..*index, filled);
            }
            Self::Delete { parent, start, end } => {
                let target = node_at_mut(root, parent)
                    .ok_or_else(|| EditError::PathNotFound(parent.clone()))?;
                let len = target.child_count();
                if start > end || *end > len {
                    return Err(EditError::IndexOutOfBounds {
                        parent: parent.clone(),
                        index: *end,
                        len,
                    });
                }
                target.children_mut().drain(*start..*end);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetAttr { path, name, value } => write!(f, "set {path}.{name} = {value:?}"),
            Self::Insert {
                parent,
                index,
                nodes,
            } => write!(f, "insert {} node(s) at {parent}[{index}]", nodes.len()),
            Self::Delete { parent, start, end } => write!(f, "delete {parent}[{start}..{end}]"),
        }
    }
}

pub(crate) fn fill_defaults(schema: &Schema, node: &mut Node) {
    if let Some(spec) = schema.spec(node.kind()) {
        let attrs = node.attrs_mut();
        for declared in &spec.attrs {
            attrs
                .entry(declared.name.to_owned())
                .or_insert_with(|| declared.default.clone());
        }
    }
    for child in node.children_mut() {
        fill_defaults(schema, child);
    }
}

/// An ordered, atomic batch of steps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transaction {
    description: String,
    source: EditSource,
    steps: Vec<Step>,
}

impl Transaction {
    /// An empty transaction.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            source: EditSource::User,
            steps: Vec::new(),
        }
    }

    /// Set the source (builder).
    #[must_use]
    pub fn with_source(mut self, source: EditSource) -> Self {
        self.source = source;
        self
    }

    /// Human-readable description for logs.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Who produced this transaction.
    #[must_use]
    pub fn source(&self) -> EditSource {
        self.source
    }

    /// Recorded steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no steps were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Record a step.
    pub fn push(&mut self, step: Step) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Record an attribute write.
    pub fn set_attr(
        &mut self,
        path: Path,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> &mut Self {
        self.push(Step::SetAttr {
            path,
            name: name.into(),
            value: value.into(),
        })
    }

    /// Record an insertion.
    pub fn insert(&mut self, parent: Path, index: usize, nodes: Vec<Node>) -> &mut Self {
        self.push(Step::Insert {
            parent,
            index,
            nodes,
        })
    }

    /// Record a deletion of `start..end` under `parent`.
    pub fn delete(&mut self, parent: Path, start: usize, end: usize) -> &mut Self {
        self.push(Step::Delete { parent, start, end })
    }

    /// Append every step of `other`.
    pub fn append(&mut self, other: Transaction) -> &mut Self {
        self.steps.extend(other.steps);
        self
    }

    /// `Some(self)` when at least one step was recorded.
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrSpec, BLOCK_GROUP, ContentRule, DOC, NodeSpec, PARAGRAPH};

    fn schema() -> Schema {
        Schema::base()
            .node(
                NodeSpec::new("box")
                    .group(BLOCK_GROUP)
                    .content(ContentRule::Group {
                        group: BLOCK_GROUP,
                        min: 0,
                    })
                    .attr(AttrSpec::string("label", "untitled"))
                    .attr(AttrSpec::boolean("open", false)),
            )
            .build()
    }

    #[test]
    fn builders_record_in_order() {
        let mut tx = Transaction::new("edit").with_source(EditSource::Repair);
        tx.set_attr(Path::from(vec![0]), "label", "a")
            .insert(Path::root(), 1, vec![Node::new(PARAGRAPH)])
            .delete(Path::root(), 0, 1);
        assert_eq!(tx.len(), 3);
        assert_eq!(tx.source(), EditSource::Repair);
        assert_eq!(tx.description(), "edit");
        assert_eq!(tx.steps()[2].to_string(), "delete /[0..1]");
        assert!(Transaction::new("empty").non_empty().is_none());
    }

    #[test]
    fn insert_fills_defaults_recursively() {
        let schema = schema();
        let mut root = Node::new(DOC);
        let step = Step::Insert {
            parent: Path::root(),
            index: 0,
            nodes: vec![Node::new("box").with_child(Node::new("box").with_attr("open", true))],
        };
        step.apply_to(&schema, &mut root).expect("insert");
        let outer = &root.children()[0];
        assert_eq!(outer.str_attr("label"), "untitled");
        assert_eq!(outer.attr("open"), Some(&AttrValue::Bool(false)));
        assert!(outer.children()[0].bool_attr("open"));
    }

    #[test]
    fn steps_reject_bad_targets() {
        let schema = schema();
        let mut root = Node::new(DOC).with_child(Node::new("box"));

        let bad_path = Step::SetAttr {
            path: Path::from(vec![3]),
            name: "label".into(),
            value: "x".into(),
        };
        assert!(matches!(
            bad_path.apply_to(&schema, &mut root),
            Err(EditError::PathNotFound(_))
        ));

        let bad_attr = Step::SetAttr {
            path: Path::from(vec![0]),
            name: "open".into(),
            value: "yes".into(),
        };
        assert!(matches!(
            bad_attr.apply_to(&schema, &mut root),
            Err(EditError::AttrType { .. })
        ));

        let bad_range = Step::Delete {
            parent: Path::root(),
            start: 0,
            end: 2,
        };
        assert!(matches!(
            bad_range.apply_to(&schema, &mut root),
            Err(EditError::IndexOutOfBounds { len: 1, .. })
        ));

        let bad_index = Step::Insert {
            parent: Path::root(),
            index: 5,
            nodes: vec![],
        };
        assert!(bad_index.apply_to(&schema, &mut root).is_err());
    }
}
