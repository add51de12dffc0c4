#![forbid(unsafe_code)]

//! [`TabEditor`]: an editor host preloaded with the tab extension.
//!
//! Every method that edits settles the host afterwards (drains deferred
//! repairs), so callers always observe consistent identifiers and exactly
//! one active tab per group. Use [`TabEditor::host_mut`] for step-by-step
//! control.

use ftabs_core::{Document, EditSource, Node, Path, Step, Transaction, to_markup};
use ftabs_runtime::{EditorView, Snapshot, Subscription};
use ftabs_widgets::group::{groups, selectors};
use ftabs_widgets::kind::{ATTR_ACTIVE, ATTR_ID, ATTR_TITLE};
use ftabs_widgets::{TabsExtension, commands};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;

/// One tab as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    pub id: String,
    pub title: String,
    pub active: bool,
}

/// One group and its tabs, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub path: Path,
    pub tabs: Vec<TabSummary>,
}

/// Tab-aware editor.
#[derive(Debug)]
pub struct TabEditor {
    host: EditorView<TabsExtension>,
}

impl TabEditor {
    /// An editor over an empty document.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let Config { host, tabs } = config;
        Self {
            host: EditorView::new(TabsExtension::new(tabs), host),
        }
    }

    /// An editor over a document parsed from markup.
    ///
    /// # Errors
    ///
    /// Returns the parse or schema error.
    pub fn with_markup(config: Config, source: &str) -> Result<Self> {
        let mut editor = Self::new(config);
        editor.load_markup(source)?;
        Ok(editor)
    }

    /// Replace the document with parsed markup and settle it.
    ///
    /// # Errors
    ///
    /// Returns the parse or schema error; the current document stays.
    pub fn load_markup(&mut self, source: &str) -> Result<()> {
        self.host.load_markup(source)?;
        self.settle();
        Ok(())
    }

    #[must_use]
    pub fn host(&self) -> &EditorView<TabsExtension> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut EditorView<TabsExtension> {
        &mut self.host
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.host.document()
    }

    /// Serialized document content.
    #[must_use]
    pub fn to_markup(&self) -> String {
        to_markup(self.host.document())
    }

    /// Subscribe to document snapshots.
    pub fn subscribe(&self, callback: impl Fn(&Snapshot) + 'static) -> Subscription {
        self.host.subscribe(callback)
    }

    /// Drain deferred repairs. Returns the number of tasks run.
    pub fn settle(&mut self) -> usize {
        self.host.run_pending()
    }

    /// Insert a new tab group at the current selection and return its path.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the group does not fit at the
    /// insertion point.
    pub fn insert_tab_group(&mut self) -> Result<Path> {
        let doc = self.host.document();
        let Some(tx) =
            commands::insert_tab_group(doc, self.host.selection(), self.host.extension().config())
        else {
            return Ok(Path::root());
        };
        let path = match tx.steps().first() {
            Some(Step::Insert { parent, index, .. }) => parent.child(*index),
            _ => Path::root(),
        };
        self.commit(tx)?;
        info!(message = "tabs.group_inserted", path = %path);
        Ok(path)
    }

    /// Append a tab to the group at `group`. Returns `false` when `group`
    /// is not a tab group.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a rejected edit.
    pub fn create_tab(&mut self, group: &Path) -> Result<bool> {
        let Some(container) = self.group_node(group) else {
            return Ok(false);
        };
        let create = group.child(container.child_count().saturating_sub(1));
        let tx = commands::create_tab(self.host.document(), &create, self.host.extension().config());
        self.commit_some(tx)
    }

    /// Make tab `ordinal` of `group` the active one.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a rejected edit.
    pub fn select_tab(&mut self, group: &Path, ordinal: usize) -> Result<bool> {
        let Some(index) = tab_child(ordinal, 0) else {
            return Ok(false);
        };
        let tx = commands::select_tab(self.host.document(), &group.child(index));
        self.commit_some(tx)
    }

    /// Rename tab `ordinal` of `group`.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a rejected edit.
    pub fn rename_tab(&mut self, group: &Path, ordinal: usize, title: &str) -> Result<bool> {
        let Some(index) = tab_child(ordinal, 1) else {
            return Ok(false);
        };
        let tx = commands::rename_tab(self.host.document(), &group.child(index), title);
        self.commit_some(tx)
    }

    /// Delete tab `ordinal` of `group`; deleting the last tab removes the
    /// group.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a rejected edit.
    pub fn delete_tab(&mut self, group: &Path, ordinal: usize) -> Result<bool> {
        let Some(index) = tab_child(ordinal, 1) else {
            return Ok(false);
        };
        let tx = commands::delete_tab(
            self.host.document(),
            &group.child(index),
            self.host.extension().config(),
        );
        self.commit_some(tx)
    }

    /// Every tab group with its tabs, in document order.
    #[must_use]
    pub fn groups(&self) -> Vec<GroupSummary> {
        let doc = self.host.document();
        groups(doc)
            .into_iter()
            .filter_map(|path| {
                let group = doc.node_at(&path)?;
                let tabs = selectors(group)
                    .map(|(index, selector)| TabSummary {
                        id: selector.str_attr(ATTR_ID).to_owned(),
                        title: group
                            .child_at(index + 1)
                            .map(|label| label.str_attr(ATTR_TITLE).to_owned())
                            .unwrap_or_default(),
                        active: selector.bool_attr(ATTR_ACTIVE),
                    })
                    .collect();
                Some(GroupSummary { path, tabs })
            })
            .collect()
    }

    fn group_node(&self, group: &Path) -> Option<&Node> {
        self.host
            .document()
            .node_at(group)
            .filter(|n| n.is(ftabs_widgets::kind::TAB_GROUP))
    }

    fn commit_some(&mut self, tx: Option<Transaction>) -> Result<bool> {
        match tx {
            Some(tx) => self.commit(tx).map(|()| true),
            None => Ok(false),
        }
    }

    fn commit(&mut self, tx: Transaction) -> Result<()> {
        let tx = tx.with_source(EditSource::Programmatic);
        self.host.dispatch(&tx)?;
        let repairs = self.settle();
        debug!(description = tx.description(), repairs, "editor commit settled");
        Ok(())
    }
}

impl Default for TabEditor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Child index of the node at `offset` within tab `ordinal`'s triple.
/// `None` when the ordinal cannot name a child.
fn tab_child(ordinal: usize, offset: usize) -> Option<usize> {
    ordinal.checked_mul(3)?.checked_add(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programmatic_scenario() {
        let mut editor = TabEditor::default();
        let group = editor.insert_tab_group().expect("insert");
        assert_eq!(group, Path::from(vec![0]));
        assert!(editor.create_tab(&group).expect("create"));
        assert!(editor.select_tab(&group, 1).expect("select"));
        assert!(!editor.select_tab(&group, 1).expect("idempotent"));
        assert!(editor.rename_tab(&group, 1, "Notes").expect("rename"));
        assert!(editor.delete_tab(&group, 0).expect("delete"));

        let summary = editor.groups();
        assert_eq!(summary.len(), 1);
        assert_eq!(
            summary[0].tabs,
            vec![TabSummary {
                id: "tab_0_0".into(),
                title: "Notes".into(),
                active: true,
            }]
        );
    }

    #[test]
    fn invalid_targets_are_no_ops() {
        let mut editor = TabEditor::default();
        assert!(!editor.create_tab(&Path::from(vec![0])).expect("no group"));
        assert!(!editor.select_tab(&Path::from(vec![0]), 0).expect("no group"));
        assert!(!editor.delete_tab(&Path::from(vec![4]), 2).expect("no group"));
        assert_eq!(editor.document().root().child_count(), 0);

        let group = editor.insert_tab_group().expect("insert");
        let before = editor.to_markup();
        let huge = usize::MAX / 3 + 1;
        assert!(!editor.select_tab(&group, huge).expect("huge ordinal"));
        assert!(!editor.rename_tab(&group, huge, "x").expect("huge ordinal"));
        assert!(!editor.delete_tab(&group, usize::MAX).expect("huge ordinal"));
        assert_eq!(editor.to_markup(), before);
    }
}
