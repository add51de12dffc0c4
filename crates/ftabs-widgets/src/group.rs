#![forbid(unsafe_code)]

//! Structural navigation inside a tab group.
//!
//! A container's children are `S L P S L P … C`; triplet `k` occupies
//! children `3k..3k+3` and the create affordance is always last.

use ftabs_core::{Document, Node, Path};

use crate::kind::{ATTR_ACTIVE, TAB_GROUP, TAB_SELECTOR, TabKind};

/// Child indices of one triplet within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet {
    /// Ordinal of the triplet in its container.
    pub ordinal: usize,
}

impl Triplet {
    /// The triplet containing child `index`.
    #[must_use]
    pub const fn containing(index: usize) -> Self {
        Self {
            ordinal: index / 3,
        }
    }

    #[must_use]
    pub const fn selector(self) -> usize {
        self.ordinal * 3
    }

    #[must_use]
    pub const fn label(self) -> usize {
        self.ordinal * 3 + 1
    }

    #[must_use]
    pub const fn panel(self) -> usize {
        self.ordinal * 3 + 2
    }

    /// Child range `selector..=panel` as a half-open range.
    #[must_use]
    pub const fn span(self) -> (usize, usize) {
        (self.selector(), self.selector() + 3)
    }
}

/// Number of triplets in a container.
#[must_use]
pub fn triplet_count(container: &Node) -> usize {
    container.child_count().saturating_sub(1) / 3
}

/// Selector nodes of a container with their child indices.
pub fn selectors(container: &Node) -> impl Iterator<Item = (usize, &Node)> {
    container
        .children()
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is(TAB_SELECTOR))
}

/// Number of active selectors in a container.
#[must_use]
pub fn active_count(container: &Node) -> usize {
    selectors(container)
        .filter(|(_, sel)| sel.bool_attr(ATTR_ACTIVE))
        .count()
}

/// A tab node together with its container.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub kind: TabKind,
    pub node: &'a Node,
    pub container: &'a Node,
    /// Child index of `node` in `container`.
    pub index: usize,
}

/// Resolve `path` to a tab node directly inside a tab group.
#[must_use]
pub fn locate<'a>(doc: &'a Document, path: &Path) -> Option<Located<'a>> {
    let node = doc.node_at(path)?;
    let kind = TabKind::of(node)?;
    let container = doc.parent_of(path)?;
    if !container.is(TAB_GROUP) {
        return None;
    }
    Some(Located {
        kind,
        node,
        container,
        index: path.last_index()?,
    })
}

/// Every tab group in the document, in document order.
#[must_use]
pub fn groups(doc: &Document) -> Vec<Path> {
    let mut out = Vec::new();
    doc.walk(|path, node| {
        if node.is(TAB_GROUP) {
            out.push(path.clone());
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplet_indices() {
        let t = Triplet::containing(4);
        assert_eq!(t.ordinal, 1);
        assert_eq!((t.selector(), t.label(), t.panel()), (3, 4, 5));
        assert_eq!(t.span(), (3, 6));
        assert_eq!(Triplet::containing(2).ordinal, 0);
    }

    #[test]
    fn counts() {
        let group = Node::new(TAB_GROUP).with_children(vec![
            Node::new(TAB_SELECTOR).with_attr(ATTR_ACTIVE, true),
            Node::new("tab_label"),
            Node::new("tab_panel"),
            Node::new(TAB_SELECTOR),
            Node::new("tab_label"),
            Node::new("tab_panel"),
            Node::new("tab_create"),
        ]);
        assert_eq!(triplet_count(&group), 2);
        assert_eq!(active_count(&group), 1);
        assert_eq!(
            selectors(&group).map(|(i, _)| i).collect::<Vec<_>>(),
            vec![0, 3]
        );
    }
}
