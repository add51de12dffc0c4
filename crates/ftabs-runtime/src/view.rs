#![forbid(unsafe_code)]

//! Node views and the extension seam.
//!
//! An [`Extension`] contributes node kinds to the schema and constructs a
//! [`NodeView`] for each node it wants to bind. The host owns the views,
//! keyed by [`NodeId`], and drives them through a fixed lifecycle:
//!
//! 1. **construct** when a bound node first appears, then a deferred
//!    `materialize`;
//! 2. **update** after every committed transaction that leaves the node in
//!    place; returning `true` schedules another deferred `materialize`;
//! 3. **destroy** (drop) when the node disappears.
//!
//! Views never mutate the document. Everything they want changed comes back
//! as a [`Transaction`] for the host to apply.

use ftabs_core::{Document, Node, NodeId, Path, SchemaBuilder, Selection, Transaction};

use crate::dispatcher::PointerDispatcher;

/// What a view sees while constructing, updating, or handling input.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub doc: &'a Document,
    pub id: NodeId,
    pub path: &'a Path,
    pub editable: bool,
    pub pointer: &'a PointerDispatcher,
}

impl ViewContext<'_> {
    /// The bound node, resolved from the current path.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        self.doc.node_at(self.path)
    }
}

/// Input routed to a single view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewInput {
    /// Primary activation (radio press, create button press).
    Activate,
    /// Overflow-menu toggle press.
    ToggleMenu,
    /// Press inside the open menu body; no action.
    MenuPress,
    /// A text field was committed with this value.
    Commit(String),
    /// Delete trigger press.
    Delete,
}

/// A live binding between one node and its presentation.
pub trait NodeView {
    /// Refresh from `node` after a committed transaction.
    ///
    /// Returns `true` when the view needs a deferred `materialize`, e.g.
    /// because its structural position changed.
    fn update(&mut self, node: &Node, ctx: &ViewContext<'_>) -> bool;

    /// Deferred repair step; may return a follow-up transaction.
    fn materialize(&mut self, ctx: &ViewContext<'_>) -> Option<Transaction>;

    /// React to routed input.
    fn handle(&mut self, input: &ViewInput, ctx: &ViewContext<'_>) -> Option<Transaction>;

    /// Called right before the view is dropped.
    fn destroy(&mut self) {}
}

/// Node kinds plus the views that bind them.
pub trait Extension {
    type View: NodeView;

    /// Register node kinds.
    fn extend_schema(&self, schema: SchemaBuilder) -> SchemaBuilder;

    /// Construct a view for `node`, or `None` if this kind is not bound.
    fn create_view(&self, node: &Node, ctx: &ViewContext<'_>) -> Option<Self::View>;

    /// Override the select-all request for the given selection.
    fn select_all(&self, _doc: &Document, _selection: &Selection) -> Option<Selection> {
        None
    }
}
