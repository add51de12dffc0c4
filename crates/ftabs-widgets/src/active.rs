#![forbid(unsafe_code)]

//! The "exactly one active tab" invariant.
//!
//! Every write here sets `active` and `checked` together, so the persisted
//! markup flag never drifts from the editor-state flag.

use ftabs_core::{Document, Node, Path, Transaction};
use tracing::debug;

use crate::group::{active_count, selectors};
use crate::kind::{ATTR_ACTIVE, ATTR_CHECKED, TAB_GROUP, TAB_SELECTOR};

/// Record `active = checked = value` on the selector at `path`.
pub fn write_active(tx: &mut Transaction, path: Path, value: bool) {
    tx.set_attr(path.clone(), ATTR_ACTIVE, value)
        .set_attr(path, ATTR_CHECKED, value);
}

fn needs_write(selector: &Node, want: bool) -> bool {
    selector.bool_attr(ATTR_ACTIVE) != want || selector.bool_attr(ATTR_CHECKED) != want
}

/// Seed the first selector of an inactive container.
///
/// Returns a transaction only when the selector at `selector_path` is its
/// container's first child and no selector in the container is active.
#[must_use]
pub fn seed(doc: &Document, selector_path: &Path) -> Option<Transaction> {
    if selector_path.last_index()? != 0 {
        return None;
    }
    let container = doc.parent_of(selector_path)?;
    if !container.is(TAB_GROUP) || !doc.node_at(selector_path)?.is(TAB_SELECTOR) {
        return None;
    }
    if active_count(container) > 0 {
        return None;
    }
    debug!(message = "tabs.seed", path = %selector_path);
    let mut tx = Transaction::new("seed active tab");
    write_active(&mut tx, selector_path.clone(), true);
    Some(tx)
}

/// Make the selector at `selector_path` the only active one in its
/// container.
///
/// Returns `None` when it already is, or when the path is not a selector in
/// a tab group.
#[must_use]
pub fn select(doc: &Document, selector_path: &Path) -> Option<Transaction> {
    let container_path = selector_path.parent()?;
    let chosen = selector_path.last_index()?;
    let container = doc.node_at(&container_path)?;
    if !container.is(TAB_GROUP) || !container.child_at(chosen)?.is(TAB_SELECTOR) {
        debug!(path = %selector_path, "tabs.select ignored: not a selector");
        return None;
    }
    let mut tx = Transaction::new("select tab");
    append_select(&mut tx, &container_path, container, chosen);
    if tx.is_empty() {
        return None;
    }
    debug!(message = "tabs.switch", reason = "select", to = chosen, path = %container_path);
    Some(tx)
}

/// Record the writes that leave only child `chosen` active.
pub(crate) fn append_select(
    tx: &mut Transaction,
    container_path: &Path,
    container: &Node,
    chosen: usize,
) {
    for (index, selector) in selectors(container) {
        let want = index == chosen;
        if needs_write(selector, want) {
            write_active(tx, container_path.child(index), want);
        }
    }
}
