#![forbid(unsafe_code)]

//! Copied document fragments.

use crate::node::Node;

/// A detached run of sibling nodes produced by
/// [`crate::Document::copy_slice`].
///
/// Nodes in a slice carry no ids; inserting them assigns fresh ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Slice {
    nodes: Vec<Node>,
}

impl Slice {
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Take the nodes, e.g. for a paste insertion.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
