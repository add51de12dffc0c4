#![forbid(unsafe_code)]

//! Child-range selections.
//!
//! The substrate only models the coarse selection the tab engine cares
//! about: a contiguous range of children under one parent. A caret is an
//! empty range.

use std::fmt;

use crate::document::Document;
use crate::path::Path;

/// Children `from..to` of the node at `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub parent: Path,
    pub from: usize,
    pub to: usize,
}

impl Selection {
    /// A collapsed selection before child `index` of `parent`.
    #[must_use]
    pub fn caret(parent: Path, index: usize) -> Self {
        Self {
            parent,
            from: index,
            to: index,
        }
    }

    /// A caret inside the node at `path`, before its first child.
    #[must_use]
    pub fn inside(path: Path) -> Self {
        Self::caret(path, 0)
    }

    /// Every child of the node at `parent`.
    #[must_use]
    pub fn all_children(doc: &Document, parent: Path) -> Option<Self> {
        let count = doc.node_at(&parent)?.child_count();
        Some(Self {
            parent,
            from: 0,
            to: count,
        })
    }

    /// The whole document content.
    #[must_use]
    pub fn all(doc: &Document) -> Self {
        Self {
            parent: Path::root(),
            from: 0,
            to: doc.root().child_count(),
        }
    }

    #[must_use]
    pub fn is_caret(&self) -> bool {
        self.from == self.to
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the selection still resolves in `doc`.
    #[must_use]
    pub fn is_valid_in(&self, doc: &Document) -> bool {
        self.from <= self.to
            && doc
                .node_at(&self.parent)
                .is_some_and(|node| self.to <= node.child_count())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.parent, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::node::Node;
    use crate::schema::{DOC, PARAGRAPH, Schema};

    fn doc() -> Document {
        let root = Node::new(DOC)
            .with_child(Node::new(PARAGRAPH).with_child(Node::text("a")))
            .with_child(Node::new(PARAGRAPH));
        Document::from_root(Rc::new(Schema::base().build()), root).expect("valid")
    }

    #[test]
    fn caret_and_ranges() {
        let doc = doc();
        let caret = Selection::caret(Path::root(), 1);
        assert!(caret.is_caret());
        assert!(caret.is_valid_in(&doc));

        let all = Selection::all(&doc);
        assert_eq!(all.len(), 2);
        assert_eq!(all.to_string(), "/[0..2]");

        let inner = Selection::all_children(&doc, Path::from(vec![0])).expect("paragraph");
        assert_eq!(inner.len(), 1);
        assert!(Selection::all_children(&doc, Path::from(vec![7])).is_none());
    }

    #[test]
    fn stale_selection_is_invalid() {
        let doc = doc();
        let stale = Selection {
            parent: Path::root(),
            from: 1,
            to: 4,
        };
        assert!(!stale.is_valid_in(&doc));
        assert!(!Selection::inside(Path::from(vec![9])).is_valid_in(&doc));
    }
}
