#![forbid(unsafe_code)]

//! The editor host: owns the document and the live views bound to it.
//!
//! # Edit cycle
//!
//! ```text
//! input ─▶ view.handle ─▶ Transaction ─▶ dispatch ─▶ Document::apply
//!                                                  │
//!                      ┌───────────────────────────┘
//!                      ▼
//!                  reconcile ─▶ construct / update / destroy views
//!                      │
//!                      ▼
//!              deferred queue ─▶ run_pending ─▶ view.materialize ─▶ dispatch
//! ```
//!
//! # Invariants
//!
//! 1. After every committed transaction, exactly the nodes the extension
//!    binds have a view, keyed by their [`NodeId`].
//! 2. A view-issued transaction that fails validation is dropped with a
//!    warning; the document is unchanged.
//! 3. `materialize` never runs synchronously inside `dispatch`; it runs on
//!    the next [`EditorView::run_pending`].

use std::fmt;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};
use ftabs_core::{
    Document, EditError, EditSource, MarkupError, NodeId, Path, Schema, Selection, Transaction,
    from_markup,
};
use tracing::{debug, debug_span, trace, warn};

use crate::config::HostConfig;
use crate::dispatcher::{HitPart, HitTarget, PointerDispatcher, PointerEvent};
use crate::observable::{Observable, Subscription};
use crate::queue::TaskQueue;
use crate::view::{Extension, NodeView, ViewContext, ViewInput};

/// A published document state.
///
/// Equality compares revisions only.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Host-level change counter; bumps on every commit or document swap.
    pub revision: u64,
    pub doc: Rc<Document>,
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision
    }
}

/// Hosts a [`Document`] and the views an [`Extension`] binds to it.
pub struct EditorView<E: Extension + 'static> {
    extension: E,
    config: HostConfig,
    doc: Rc<Document>,
    views: AHashMap<NodeId, E::View>,
    tasks: TaskQueue<NodeId, EditorView<E>>,
    pointer: PointerDispatcher,
    selection: Selection,
    revision: u64,
    snapshots: Observable<Snapshot>,
}

impl<E: Extension + 'static> fmt::Debug for EditorView<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorView")
            .field("config", &self.config)
            .field("revision", &self.revision)
            .field("nodes", &self.doc.node_count())
            .field("views", &self.views.len())
            .field("pending", &self.tasks.len())
            .field("pointer", &self.pointer)
            .finish()
    }
}

impl<E: Extension + 'static> EditorView<E> {
    /// A host over an empty document.
    #[must_use]
    pub fn new(extension: E, config: HostConfig) -> Self {
        let schema = Rc::new(extension.extend_schema(Schema::base()).build());
        let doc = Rc::new(Document::new(schema));
        let mut host = Self {
            extension,
            config,
            snapshots: Observable::new(Snapshot {
                revision: 0,
                doc: Rc::clone(&doc),
            }),
            doc,
            views: AHashMap::new(),
            tasks: TaskQueue::new(),
            pointer: PointerDispatcher::new(),
            selection: Selection::default(),
            revision: 0,
        };
        host.reconcile();
        host
    }

    /// A host over a document parsed from markup.
    ///
    /// # Errors
    ///
    /// Returns the parse or schema error.
    pub fn with_markup(extension: E, config: HostConfig, source: &str) -> Result<Self, MarkupError> {
        let mut host = Self::new(extension, config);
        host.load_markup(source)?;
        Ok(host)
    }

    /// Replace the document with one parsed from markup.
    ///
    /// # Errors
    ///
    /// Returns the parse or schema error; the current document stays.
    pub fn load_markup(&mut self, source: &str) -> Result<(), MarkupError> {
        let doc = from_markup(Rc::clone(self.doc.schema_rc()), source)?;
        self.replace_document(doc);
        Ok(())
    }

    /// Replace the document. Every existing view is destroyed and views for
    /// the new document are constructed with deferred materialization.
    pub fn replace_document(&mut self, doc: Document) {
        for (_, mut view) in self.views.drain() {
            view.destroy();
        }
        self.tasks.clear();
        self.doc = Rc::new(doc);
        self.selection = Selection::default();
        self.revision += 1;
        self.reconcile();
        self.publish();
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn schema(&self) -> &Rc<Schema> {
        self.doc.schema_rc()
    }

    #[must_use]
    pub fn extension(&self) -> &E {
        &self.extension
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[must_use]
    pub fn editable(&self) -> bool {
        self.config.editable
    }

    /// Toggle editability; every view is updated with the new flag.
    pub fn set_editable(&mut self, editable: bool) {
        if self.config.editable == editable {
            return;
        }
        self.config.editable = editable;
        debug!(editable, "host editability changed");
        self.reconcile();
    }

    /// The capture-phase pointer registry views listen on.
    #[must_use]
    pub fn pointer(&self) -> &PointerDispatcher {
        &self.pointer
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Current published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.get()
    }

    /// Subscribe to document snapshots. Dropping the guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&Snapshot) + 'static) -> Subscription {
        self.snapshots.subscribe(callback)
    }

    /// View bound to `id`.
    #[must_use]
    pub fn view(&self, id: NodeId) -> Option<&E::View> {
        self.views.get(&id)
    }

    /// Every live view with its node id (unordered).
    pub fn views(&self) -> impl Iterator<Item = (NodeId, &E::View)> {
        self.views.iter().map(|(id, view)| (*id, view))
    }

    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Number of deferred tasks waiting for [`Self::run_pending`].
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Whether a deferred materialization is pending for `id`.
    #[must_use]
    pub fn is_pending(&self, id: NodeId) -> bool {
        self.tasks.is_pending(&id)
    }

    /// Apply a transaction, reconcile views, and publish a snapshot.
    ///
    /// # Errors
    ///
    /// Returns the validation error; the document is unchanged.
    pub fn dispatch(&mut self, tx: &Transaction) -> Result<(), EditError> {
        if tx.is_empty() {
            return Ok(());
        }
        let _span = debug_span!(
            "ftabs.dispatch",
            description = tx.description(),
            steps = tx.len()
        )
        .entered();
        Rc::make_mut(&mut self.doc).apply(tx)?;
        self.revision += 1;
        if !self.selection.is_valid_in(&self.doc) {
            self.selection = Selection::default();
        }
        self.reconcile();
        self.publish();
        Ok(())
    }

    /// Drain deferred tasks, at most `max_drain_rounds` rounds. Returns the
    /// number of tasks run.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        for _ in 0..self.config.max_drain_rounds {
            let round = self.tasks.take_round();
            if round.is_empty() {
                break;
            }
            for task in round {
                task(self);
                ran += 1;
            }
        }
        if !self.tasks.is_empty() {
            warn!(
                pending = self.tasks.len(),
                rounds = self.config.max_drain_rounds,
                "deferred queue not drained"
            );
        }
        ran
    }

    /// Route a pointer press: capture listeners first, then the target view.
    ///
    /// Returns `true` when the press committed a transaction.
    pub fn pointer_down(&mut self, target: HitTarget) -> bool {
        self.pointer.dispatch(&PointerEvent { target });
        let Some(id) = target.node else {
            return false;
        };
        let input = match target.part {
            HitPart::Control => ViewInput::Activate,
            HitPart::MenuToggle => ViewInput::ToggleMenu,
            HitPart::MenuBody | HitPart::TitleField => ViewInput::MenuPress,
            HitPart::DeleteButton => ViewInput::Delete,
            HitPart::Content => return false,
        };
        self.route(id, &input)
    }

    /// Commit a text field value on the view bound to `id`.
    pub fn text_commit(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        self.route(id, &ViewInput::Commit(text.into()))
    }

    /// Handle a select-all request against the current selection.
    pub fn select_all(&mut self) -> Selection {
        let selection = self
            .extension
            .select_all(&self.doc, &self.selection)
            .unwrap_or_else(|| Selection::all(&self.doc));
        trace!(%selection, "select all");
        self.selection = selection.clone();
        selection
    }

    fn route(&mut self, id: NodeId, input: &ViewInput) -> bool {
        let doc = Rc::clone(&self.doc);
        let Some(path) = doc.path_of(id) else {
            return false;
        };
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        let ctx = ViewContext {
            doc: &doc,
            id,
            path,
            editable: self.config.editable,
            pointer: &self.pointer,
        };
        let Some(tx) = view.handle(input, &ctx) else {
            return false;
        };
        drop(doc);
        self.dispatch_from_view(&tx)
    }

    fn dispatch_from_view(&mut self, tx: &Transaction) -> bool {
        match self.dispatch(tx) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    description = tx.description(),
                    source = ?tx.source(),
                    error = %err,
                    "view transaction rejected"
                );
                false
            }
        }
    }

    fn schedule_materialize(&mut self, id: NodeId) {
        self.tasks
            .schedule_keyed(id, move |host: &mut Self| host.materialize(id));
    }

    fn materialize(&mut self, id: NodeId) {
        let doc = Rc::clone(&self.doc);
        let Some(path) = doc.path_of(id) else {
            trace!(node = %id, "materialize skipped: node gone");
            return;
        };
        let Some(view) = self.views.get_mut(&id) else {
            return;
        };
        let ctx = ViewContext {
            doc: &doc,
            id,
            path,
            editable: self.config.editable,
            pointer: &self.pointer,
        };
        let Some(tx) = view.materialize(&ctx) else {
            return;
        };
        drop(doc);
        let tx = tx.with_source(EditSource::Repair);
        self.dispatch_from_view(&tx);
    }

    fn reconcile(&mut self) {
        let doc = Rc::clone(&self.doc);
        let _span = debug_span!("ftabs.reconcile", version = doc.version()).entered();
        let mut seen = AHashSet::with_capacity(self.views.len());
        let mut to_materialize = Vec::new();
        let mut created = 0usize;
        let editable = self.config.editable;
        let views = &mut self.views;
        let extension = &self.extension;
        let pointer = &self.pointer;

        doc.walk(|path: &Path, node| {
            let id = node.id();
            let ctx = ViewContext {
                doc: &doc,
                id,
                path,
                editable,
                pointer,
            };
            if let Some(view) = views.get_mut(&id) {
                seen.insert(id);
                if view.update(node, &ctx) {
                    to_materialize.push(id);
                }
            } else if let Some(view) = extension.create_view(node, &ctx) {
                seen.insert(id);
                views.insert(id, view);
                created += 1;
                to_materialize.push(id);
            }
        });

        let stale: Vec<NodeId> = views
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        for id in &stale {
            if let Some(mut view) = views.remove(id) {
                view.destroy();
            }
        }
        debug!(
            created,
            destroyed = stale.len(),
            live = views.len(),
            scheduled = to_materialize.len(),
            "views reconciled"
        );
        for id in to_materialize {
            self.schedule_materialize(id);
        }
    }

    fn publish(&self) {
        self.snapshots.set(Snapshot {
            revision: self.revision,
            doc: Rc::clone(&self.doc),
        });
    }
}
