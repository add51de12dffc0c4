#![forbid(unsafe_code)]

//! Identifier derivation and the selector/label/panel back-reference sync.
//!
//! A selector's identifier is a pure function of its path, so two selectors
//! can only collide if they occupy the same position. It is never cached:
//! whenever a selector may have moved, [`sync_ids`] recomputes it and, if
//! any of the three copies is stale, rewrites all three in one transaction.

use std::fmt::Write as _;

use ftabs_core::{Document, Path, Transaction};
use tracing::debug;

use crate::config::TabsConfig;
use crate::kind::{ATTR_FOR, ATTR_ID, ATTR_PARENT, TAB_LABEL, TAB_PANEL, TAB_SELECTOR};

/// `<prefix>_<i0>_<i1>_…` for `path`.
#[must_use]
pub fn derive_id(prefix: &str, path: &Path) -> String {
    let mut id = String::with_capacity(prefix.len() + path.depth() * 3);
    id.push_str(prefix);
    for segment in path.segments() {
        let _ = write!(id, "_{segment}");
    }
    id
}

/// Radio group key for the container at `container_path`.
#[must_use]
pub fn group_key(prefix: &str, container_path: &Path) -> String {
    derive_id(prefix, container_path)
}

/// Record the 3-way identifier write for the triplet whose selector is at
/// `selector_path`.
pub fn write_ids(tx: &mut Transaction, selector_path: &Path, id: &str) {
    let Some(container) = selector_path.parent() else {
        return;
    };
    let Some(index) = selector_path.last_index() else {
        return;
    };
    tx.set_attr(selector_path.clone(), ATTR_ID, id)
        .set_attr(container.child(index + 1), ATTR_FOR, id)
        .set_attr(container.child(index + 2), ATTR_PARENT, id);
}

/// Re-derive the identifier of the selector at `selector_path`.
///
/// Returns `None` when all three copies already match, or when the path
/// does not resolve to a selector followed by its label and panel.
#[must_use]
pub fn sync_ids(doc: &Document, selector_path: &Path, config: &TabsConfig) -> Option<Transaction> {
    let container = selector_path.parent()?;
    let index = selector_path.last_index()?;
    let selector = doc.node_at(selector_path)?;
    let label = doc.node_at(&container.child(index + 1))?;
    let panel = doc.node_at(&container.child(index + 2))?;
    if !selector.is(TAB_SELECTOR) || !label.is(TAB_LABEL) || !panel.is(TAB_PANEL) {
        debug!(path = %selector_path, "ident.sync skipped: not a triplet");
        return None;
    }

    let id = derive_id(&config.id_prefix, selector_path);
    if selector.str_attr(ATTR_ID) == id
        && label.str_attr(ATTR_FOR) == id
        && panel.str_attr(ATTR_PARENT) == id
    {
        return None;
    }
    debug!(
        message = "ident.sync",
        from = selector.str_attr(ATTR_ID),
        to = %id,
        path = %selector_path
    );
    let mut tx = Transaction::new("sync tab ids");
    write_ids(&mut tx, selector_path, &id);
    Some(tx)
}
