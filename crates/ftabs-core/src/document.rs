#![forbid(unsafe_code)]

//! The document: a validated tree with node identity and path resolution.
//!
//! # Invariants
//!
//! 1. The tree always satisfies the schema; [`Document::apply`] either commits
//!    a fully valid result or leaves the document untouched.
//! 2. Every node carries a unique, assigned [`NodeId`]. Nodes arriving without
//!    an id, or with an id already present elsewhere in the tree, receive a
//!    fresh one.
//! 3. `version` increments by exactly 1 per committed, non-empty transaction.

use std::ops::Range;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};
use tracing::{debug, trace};
use web_time::Instant;

use crate::error::EditError;
use crate::node::{Node, NodeId};
use crate::path::Path;
use crate::schema::{DOC, NodeFlags, Schema};
use crate::slice::Slice;
use crate::transaction::{Transaction, fill_defaults};

/// A schema-validated document tree.
#[derive(Debug, Clone)]
pub struct Document {
    schema: Rc<Schema>,
    root: Node,
    next_id: u64,
    index: AHashMap<NodeId, Path>,
    version: u64,
}

impl Document {
    /// An empty document.
    #[must_use]
    pub fn new(schema: Rc<Schema>) -> Self {
        let mut doc = Self {
            schema,
            root: Node::new(DOC),
            next_id: 1,
            index: AHashMap::new(),
            version: 0,
        };
        doc.reindex();
        doc
    }

    /// A document over an existing root node.
    ///
    /// # Errors
    ///
    /// Fails when the root is not a `doc` node or the tree violates the schema.
    pub fn from_root(schema: Rc<Schema>, mut root: Node) -> Result<Self, EditError> {
        if !root.is(DOC) {
            return Err(EditError::SchemaViolation {
                kind: root.kind().to_owned(),
                path: Path::root(),
                rule: format!("root must be '{DOC}'"),
            });
        }
        fill_defaults(&schema, &mut root);
        schema.check_tree(&root, &Path::root())?;
        let mut doc = Self {
            schema,
            root,
            next_id: 1,
            index: AHashMap::new(),
            version: 0,
        };
        doc.reindex();
        Ok(doc)
    }

    /// The schema this document validates against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Shared handle to the schema.
    #[must_use]
    pub fn schema_rc(&self) -> &Rc<Schema> {
        &self.schema
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of committed transactions.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total number of nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    /// Node at `path`.
    #[must_use]
    pub fn node_at(&self, path: &Path) -> Option<&Node> {
        node_at(&self.root, path)
    }

    /// Current path of a node.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> Option<&Path> {
        self.index.get(&id)
    }

    /// Node and path by id.
    #[must_use]
    pub fn node_by_id(&self, id: NodeId) -> Option<(&Path, &Node)> {
        let path = self.index.get(&id)?;
        self.node_at(path).map(|node| (path, node))
    }

    /// Parent of the node at `path`.
    #[must_use]
    pub fn parent_of(&self, path: &Path) -> Option<&Node> {
        path.parent().and_then(|parent| self.node_at(&parent))
    }

    /// Pre-order walk over every node with its path.
    pub fn walk(&self, mut visit: impl FnMut(&Path, &Node)) {
        fn go(node: &Node, path: &mut Vec<usize>, visit: &mut dyn FnMut(&Path, &Node)) {
            visit(&Path::from(path.as_slice()), node);
            for (idx, child) in node.children().iter().enumerate() {
                path.push(idx);
                go(child, path, visit);
                path.pop();
            }
        }
        go(&self.root, &mut Vec::new(), &mut visit);
    }

    /// Apply a transaction atomically.
    ///
    /// Steps run in order against a working copy; the copy is validated
    /// against the schema and only then replaces the tree.
    ///
    /// # Errors
    ///
    /// Returns the first step failure or schema violation. The document is
    /// unchanged on error.
    pub fn apply(&mut self, tx: &Transaction) -> Result<(), EditError> {
        if tx.is_empty() {
            return Ok(());
        }
        let start = Instant::now();
        let mut working = self.root.clone();
        for step in tx.steps() {
            step.apply_to(&self.schema, &mut working)?;
        }
        self.schema.check_tree(&working, &Path::root())?;

        self.root = working;
        self.version += 1;
        self.reindex();
        debug!(
            description = tx.description(),
            source = ?tx.source(),
            steps = tx.len(),
            version = self.version,
            duration_us = start.elapsed().as_micros() as u64,
            "transaction applied"
        );
        Ok(())
    }

    /// Copy a child range of the node at `parent`.
    ///
    /// Copies carry no ids, and nodes whose kind is not
    /// [`NodeFlags::SELECTABLE`] have their attributes reset to defaults.
    ///
    /// # Errors
    ///
    /// Fails when `parent` does not resolve or the range is out of bounds.
    pub fn copy_slice(&self, parent: &Path, range: Range<usize>) -> Result<Slice, EditError> {
        let node = self
            .node_at(parent)
            .ok_or_else(|| EditError::PathNotFound(parent.clone()))?;
        if range.start > range.end || range.end > node.child_count() {
            return Err(EditError::IndexOutOfBounds {
                parent: parent.clone(),
                index: range.end,
                len: node.child_count(),
            });
        }
        let nodes = node.children()[range]
            .iter()
            .map(|child| self.copy_node(child))
            .collect();
        Ok(Slice::new(nodes))
    }

    fn copy_node(&self, node: &Node) -> Node {
        let mut copy = node.clone();
        copy.clear_ids();
        self.strip_unselectable(&mut copy);
        copy
    }

    fn strip_unselectable(&self, node: &mut Node) {
        if !node.is_text() && !self.schema.has_flag(node.kind(), NodeFlags::SELECTABLE) {
            *node.attrs_mut() = self.schema.default_attrs(node.kind());
        }
        for child in node.children_mut() {
            self.strip_unselectable(child);
        }
    }

    /// Assign missing or duplicated ids and rebuild the id → path index.
    fn reindex(&mut self) {
        let mut index = AHashMap::with_capacity(self.index.len().max(16));
        let mut seen = AHashSet::with_capacity(self.index.len().max(16));
        let mut next_id = self.next_id;
        let mut assigned = 0usize;

        fn go(
            node: &mut Node,
            path: &mut Vec<usize>,
            index: &mut AHashMap<NodeId, Path>,
            seen: &mut AHashSet<NodeId>,
            next_id: &mut u64,
            assigned: &mut usize,
        ) {
            if !node.id().is_assigned() || !seen.insert(node.id()) {
                let id = NodeId::new(*next_id);
                *next_id += 1;
                *assigned += 1;
                node.set_id(id);
                seen.insert(id);
            }
            index.insert(node.id(), Path::from(path.as_slice()));
            for (idx, child) in node.children_mut().iter_mut().enumerate() {
                path.push(idx);
                go(child, path, index, seen, next_id, assigned);
                path.pop();
            }
        }

        go(
            &mut self.root,
            &mut Vec::new(),
            &mut index,
            &mut seen,
            &mut next_id,
            &mut assigned,
        );
        self.index = index;
        self.next_id = next_id;
        trace!(nodes = self.index.len(), assigned, "document reindexed");
    }
}

/// Resolve `path` below `root`.
#[must_use]
pub fn node_at<'a>(root: &'a Node, path: &Path) -> Option<&'a Node> {
    path.segments()
        .iter()
        .try_fold(root, |node, &idx| node.child_at(idx))
}

/// Resolve `path` below `root` mutably.
pub(crate) fn node_at_mut<'a>(root: &'a mut Node, path: &Path) -> Option<&'a mut Node> {
    let mut node = root;
    for &idx in path.segments() {
        node = node.children_mut().get_mut(idx)?;
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AttrValue;
    use crate::schema::{AttrSpec, BLOCK_GROUP, ContentRule, NodeSpec, PARAGRAPH};

    fn schema() -> Rc<Schema> {
        Rc::new(
            Schema::base()
                .node(
                    NodeSpec::new("card")
                        .group(BLOCK_GROUP)
                        .content(ContentRule::Group {
                            group: BLOCK_GROUP,
                            min: 1,
                        })
                        .attr(AttrSpec::string("name", "card"))
                        .flags(NodeFlags::SELECTABLE),
                )
                .node(
                    NodeSpec::new("marker")
                        .group(BLOCK_GROUP)
                        .attr(AttrSpec::string("tag", "none")),
                )
                .build(),
        )
    }

    fn sample(schema: &Rc<Schema>) -> Document {
        let root = Node::new(DOC)
            .with_child(Node::new(PARAGRAPH).with_child(Node::text("a")))
            .with_child(
                Node::new("card")
                    .with_attr("name", "x")
                    .with_child(Node::new("marker").with_attr("tag", "t1"))
                    .with_child(Node::new(PARAGRAPH)),
            );
        Document::from_root(Rc::clone(schema), root).expect("valid")
    }

    #[test]
    fn ids_are_assigned_and_indexed() {
        let schema = schema();
        let doc = sample(&schema);
        assert_eq!(doc.node_count(), 6);
        let mut ids = Vec::new();
        doc.walk(|path, node| {
            assert!(node.id().is_assigned());
            assert_eq!(doc.path_of(node.id()), Some(path));
            ids.push(node.id());
        });
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn resolves_paths() {
        let schema = schema();
        let doc = sample(&schema);
        let marker = doc.node_at(&Path::from(vec![1, 0])).expect("marker");
        assert_eq!(marker.str_attr("tag"), "t1");
        assert_eq!(
            doc.parent_of(&Path::from(vec![1, 0])).map(Node::kind),
            Some("card")
        );
        assert!(doc.node_at(&Path::from(vec![4])).is_none());
        let (path, node) = doc.node_by_id(marker.id()).expect("by id");
        assert_eq!(path, &Path::from(vec![1, 0]));
        assert_eq!(node.kind(), "marker");
    }

    #[test]
    fn rejects_non_doc_root() {
        let err = Document::from_root(schema(), Node::new(PARAGRAPH)).expect_err("not a doc");
        assert!(matches!(err, EditError::SchemaViolation { .. }));
    }

    #[test]
    fn apply_is_atomic() {
        let schema = schema();
        let mut doc = sample(&schema);
        let before = doc.root().clone();

        let mut tx = Transaction::new("bad");
        tx.set_attr(Path::from(vec![1]), "name", AttrValue::from("renamed"))
            .delete(Path::from(vec![1]), 0, 2);
        let err = doc.apply(&tx).expect_err("card would be empty");
        assert!(matches!(err, EditError::SchemaViolation { .. }));
        assert_eq!(doc.root(), &before);
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn apply_commits_and_bumps_version() {
        let schema = schema();
        let mut doc = sample(&schema);
        let card_id = doc.node_at(&Path::from(vec![1])).expect("card").id();

        let mut tx = Transaction::new("insert before card");
        tx.insert(Path::root(), 0, vec![Node::new(PARAGRAPH)]);
        doc.apply(&tx).expect("valid");

        assert_eq!(doc.version(), 1);
        assert_eq!(doc.path_of(card_id), Some(&Path::from(vec![2])));
        let fresh = doc.node_at(&Path::from(vec![0])).expect("inserted");
        assert!(fresh.id().is_assigned());
    }

    #[test]
    fn duplicated_ids_are_reassigned() {
        let schema = schema();
        let mut doc = sample(&schema);
        let original = doc.node_at(&Path::from(vec![0])).expect("para").clone();

        let mut tx = Transaction::new("paste clone");
        tx.insert(Path::root(), 2, vec![original.clone()]);
        doc.apply(&tx).expect("valid");

        let pasted = doc.node_at(&Path::from(vec![2])).expect("pasted");
        assert_ne!(pasted.id(), original.id());
        assert_eq!(doc.path_of(original.id()), Some(&Path::from(vec![0])));
    }

    #[test]
    fn copy_resets_unselectable_attrs() {
        let schema = schema();
        let doc = sample(&schema);
        let slice = doc
            .copy_slice(&Path::from(vec![1]), 0..2)
            .expect("copy marker and paragraph");
        let marker = &slice.nodes()[0];
        assert_eq!(marker.str_attr("tag"), "none");
        assert!(!marker.id().is_assigned());

        let card = doc.copy_slice(&Path::root(), 1..2).expect("copy card");
        assert_eq!(card.nodes()[0].str_attr("name"), "x");
        assert_eq!(card.nodes()[0].children()[0].str_attr("tag"), "none");
    }

    #[test]
    fn copy_out_of_bounds() {
        let schema = schema();
        let doc = sample(&schema);
        assert!(matches!(
            doc.copy_slice(&Path::root(), 1..5),
            Err(EditError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            doc.copy_slice(&Path::from(vec![9]), 0..0),
            Err(EditError::PathNotFound(_))
        ));
    }
}
