#![forbid(unsafe_code)]

//! Tab mutation commands.
//!
//! Every command is a pure transaction builder over `&Document`. An invalid
//! target yields `None` plus a debug event; nothing here panics or touches
//! the document. The host applies the returned transaction atomically.

use ftabs_core::{
    BLOCK_GROUP, ContentRule, Document, Node, PARAGRAPH, Path, Selection, Transaction,
};
use tracing::debug;

use crate::active::append_select;
use crate::config::TabsConfig;
use crate::group::{Triplet, locate, triplet_count};
use crate::ident::derive_id;
use crate::kind::{
    ATTR_ACTIVE, ATTR_FOR, ATTR_ID, ATTR_PARENT, ATTR_TITLE, TAB_CREATE, TAB_GROUP, TAB_LABEL, TAB_PANEL,
    TAB_SELECTOR, TabKind,
};

/// A fresh `(selector, label, panel)` triplet carrying identifier `id`.
#[must_use]
pub fn new_triplet(config: &TabsConfig, id: &str) -> [Node; 3] {
    [
        Node::new(TAB_SELECTOR).with_attr(ATTR_ID, id),
        Node::new(TAB_LABEL)
            .with_attr(ATTR_TITLE, config.default_title.as_str())
            .with_attr(ATTR_FOR, id),
        Node::new(TAB_PANEL)
            .with_attr(ATTR_PARENT, id)
            .with_child(Node::new(PARAGRAPH)),
    ]
}

/// A complete group with one tab, for insertion at `group_path`.
#[must_use]
pub fn new_group(config: &TabsConfig, group_path: &Path) -> Node {
    let id = derive_id(&config.id_prefix, &group_path.child(0));
    let mut children: Vec<Node> = new_triplet(config, &id).into();
    children.push(Node::new(TAB_CREATE));
    Node::new(TAB_GROUP).with_children(children)
}

/// Insert a new tab immediately before the create affordance at
/// `create_path`. Identifiers are derived in the same transaction; the new
/// tab is not activated.
#[must_use]
pub fn create_tab(doc: &Document, create_path: &Path, config: &TabsConfig) -> Option<Transaction> {
    let Some(located) = locate(doc, create_path).filter(|l| l.kind == TabKind::Create) else {
        debug!(path = %create_path, "tabs.create ignored: not a create affordance");
        return None;
    };
    let container = create_path.parent()?;
    let selector_path = container.child(located.index);
    let id = derive_id(&config.id_prefix, &selector_path);
    debug!(message = "tabs.create", id = %id, ordinal = located.index / 3);

    let mut tx = Transaction::new("create tab");
    tx.insert(container, located.index, new_triplet(config, &id).into());
    Some(tx)
}

/// Make the selector at `selector_path` the only active tab.
#[must_use]
pub fn select_tab(doc: &Document, selector_path: &Path) -> Option<Transaction> {
    crate::active::select(doc, selector_path)
}

/// Set the title of the label at `label_path` and mirror it onto the panel.
///
/// Returns `None` when the title is unchanged.
#[must_use]
pub fn rename_tab(doc: &Document, label_path: &Path, title: &str) -> Option<Transaction> {
    let Some(located) = locate(doc, label_path).filter(|l| l.kind == TabKind::Label) else {
        debug!(path = %label_path, "tabs.rename ignored: not a label");
        return None;
    };
    if located.node.str_attr(ATTR_TITLE) == title {
        return None;
    }
    let mut tx = Transaction::new("rename tab");
    tx.set_attr(label_path.clone(), ATTR_TITLE, title);
    let panel_path = label_path.sibling(located.index + 1)?;
    if located
        .container
        .child_at(located.index + 1)
        .is_some_and(|n| n.is(TAB_PANEL))
    {
        tx.set_attr(panel_path, ATTR_TITLE, title);
    }
    debug!(message = "tabs.rename", path = %label_path, title);
    Some(tx)
}

/// Pick the child span to delete for the node at `index`.
///
/// The span whose members all carry the node's identifier wins; when those
/// references are stale or missing, the structural triplet is used.
fn delete_span(container: &Node, index: usize, kind: TabKind) -> Triplet {
    let structural = Triplet::containing(index);
    let identifier = kind
        .reference_attr()
        .map(|attr| container.children()[index].str_attr(attr))
        .unwrap_or_default();
    if identifier.is_empty() {
        return structural;
    }
    let matches: Vec<usize> = container.children()[..container.child_count() - 1]
        .iter()
        .enumerate()
        .filter(|(_, child)| {
            TabKind::of(child)
                .and_then(TabKind::reference_attr)
                .is_some_and(|attr| child.str_attr(attr) == identifier)
        })
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [first, second, third]
            if first % 3 == 0
                && *second == first + 1
                && *third == first + 2
                && (*first..=*third).contains(&index) =>
        {
            Triplet::containing(*first)
        }
        _ => structural,
    }
}

/// Delete the tab containing the node at `path`.
///
/// When it is the container's only tab, the whole container is removed.
/// With `reseed_after_delete`, deleting the active tab activates the first
/// remaining one in the same transaction.
#[must_use]
pub fn delete_tab(doc: &Document, path: &Path, config: &TabsConfig) -> Option<Transaction> {
    let Some(located) = locate(doc, path).filter(|l| l.kind.is_triplet_member()) else {
        debug!(path = %path, "tabs.delete ignored: not a tab member");
        return None;
    };
    let container_path = path.parent()?;
    let container = located.container;
    let mut tx = Transaction::new("delete tab");

    if triplet_count(container) <= 1 {
        let outer = container_path.parent()?;
        let index = container_path.last_index()?;
        debug!(message = "tabs.delete", path = %container_path, whole_group = true);
        tx.delete(outer, index, index + 1);
        return Some(tx);
    }

    let span = delete_span(container, located.index, located.kind);
    let (start, end) = span.span();
    let removed_active = container
        .child_at(span.selector())
        .is_some_and(|s| s.bool_attr(ATTR_ACTIVE));
    if removed_active && config.reseed_after_delete {
        let heir = if span.ordinal == 0 { 3 } else { 0 };
        append_select(&mut tx, &container_path, container, heir);
    }
    debug!(
        message = "tabs.delete",
        path = %container_path,
        ordinal = span.ordinal,
        reseed = removed_active && config.reseed_after_delete
    );
    tx.delete(container_path, start, end);
    Some(tx)
}

/// Insert a new tab group after the block holding `selection`, or at the end
/// of the document when the selection does not resolve.
#[must_use]
pub fn insert_tab_group(
    doc: &Document,
    selection: &Selection,
    config: &TabsConfig,
) -> Option<Transaction> {
    let (parent, index) = insertion_point(doc, selection);
    let group_path = parent.child(index);
    debug!(message = "tabs.insert_group", path = %group_path);
    let mut tx = Transaction::new("insert tab group");
    tx.insert(parent, index, vec![new_group(config, &group_path)]);
    Some(tx)
}

fn accepts_blocks(doc: &Document, path: &Path) -> bool {
    doc.node_at(path)
        .and_then(|node| doc.schema().spec(node.kind()))
        .is_some_and(|spec| matches!(spec.content, ContentRule::Group { group, .. } if group == BLOCK_GROUP))
}

fn insertion_point(doc: &Document, selection: &Selection) -> (Path, usize) {
    let end_of_doc = (Path::root(), doc.root().child_count());
    if !selection.is_valid_in(doc) {
        return end_of_doc;
    }
    if accepts_blocks(doc, &selection.parent) {
        return (selection.parent.clone(), selection.to);
    }
    // Caret inside a block: insert after the nearest enclosing block whose
    // parent takes blocks.
    let mut block = selection.parent.clone();
    while let Some(parent) = block.parent() {
        if accepts_blocks(doc, &parent) {
            let index = block.last_index().map_or(0, |i| i + 1);
            return (parent, index);
        }
        block = parent;
    }
    end_of_doc
}

/// Clamp a select-all request to the panel holding the selection.
#[must_use]
pub fn select_all_in_panel(doc: &Document, selection: &Selection) -> Option<Selection> {
    if !selection.is_valid_in(doc) {
        return None;
    }
    let panel = std::iter::once(selection.parent.clone())
        .chain(selection.parent.ancestors())
        .find(|path| doc.node_at(path).is_some_and(|n| n.is(TAB_PANEL)))?;
    debug!(message = "tabs.select_all", panel = %panel);
    Selection::all_children(doc, panel)
}
