#![forbid(unsafe_code)]

use std::cell::Cell;
use std::rc::Rc;

use ftabs_core::{Node, NodeId, Path, Transaction};
use ftabs_runtime::{HitPart, ListenerGuard, PointerDispatcher, ViewContext, ViewInput};
use tracing::{debug, trace};

use crate::commands::{delete_tab, rename_tab};
use crate::config::TabsConfig;
use crate::kind::{ATTR_FOR, ATTR_TITLE, TAB_PANEL};
use crate::text::display_title;

/// Presses on these parts of the owning label keep its menu open.
const MENU_PARTS: &[HitPart] = &[
    HitPart::MenuToggle,
    HitPart::MenuBody,
    HitPart::TitleField,
    HitPart::DeleteButton,
];

/// Overflow menu of an editable label.
///
/// Holds the outside-press listener; dropping the menu unregisters it.
#[derive(Debug)]
pub struct LabelMenu {
    open: Rc<Cell<bool>>,
    field_value: String,
    _outside: ListenerGuard,
}

impl LabelMenu {
    fn new(owner: NodeId, pointer: &PointerDispatcher) -> Self {
        let open = Rc::new(Cell::new(false));
        let outside = pointer.listen_capture({
            let open = Rc::clone(&open);
            move |event| {
                if open.get() && !event.target.is_within(owner, MENU_PARTS) {
                    trace!(label = %owner, "menu closed by outside press");
                    open.set(false);
                }
            }
        });
        Self {
            open,
            field_value: String::new(),
            _outside: outside,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Current text field value; cleared on every update.
    #[must_use]
    pub fn field_value(&self) -> &str {
        &self.field_value
    }

    fn toggle(&self) {
        self.open.set(!self.open.get());
    }

    fn close(&self) {
        self.open.set(false);
    }
}

/// Title of one tab, with a rename/delete menu when editable.
#[derive(Debug)]
pub struct LabelBinding {
    config: Rc<TabsConfig>,
    id: NodeId,
    path: Path,
    for_id: String,
    title: String,
    display_title: String,
    menu: Option<LabelMenu>,
}

impl LabelBinding {
    #[must_use]
    pub fn new(node: &Node, ctx: &ViewContext<'_>, config: Rc<TabsConfig>) -> Self {
        let mut binding = Self {
            config,
            id: ctx.id,
            path: ctx.path.clone(),
            for_id: String::new(),
            title: String::new(),
            display_title: String::new(),
            menu: None,
        };
        binding.refresh(node);
        binding.sync_menu(ctx);
        binding
    }

    fn refresh(&mut self, node: &Node) {
        node.str_attr(ATTR_FOR).clone_into(&mut self.for_id);
        let title = node.str_attr(ATTR_TITLE);
        if title != self.title {
            title.clone_into(&mut self.title);
            self.display_title = display_title(title, self.config.max_title_width);
        }
    }

    fn sync_menu(&mut self, ctx: &ViewContext<'_>) {
        match (&self.menu, ctx.editable) {
            (None, true) => self.menu = Some(LabelMenu::new(self.id, ctx.pointer)),
            (Some(_), false) => self.menu = None,
            _ => {}
        }
    }

    /// Selector identifier this label points at.
    #[must_use]
    pub fn for_id(&self) -> &str {
        &self.for_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title truncated to the configured display width.
    #[must_use]
    pub fn display_title(&self) -> &str {
        &self.display_title
    }

    /// The overflow menu; present only while the host is editable.
    #[must_use]
    pub fn menu(&self) -> Option<&LabelMenu> {
        self.menu.as_ref()
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(LabelMenu::is_open)
    }

    pub(crate) fn teardown(&mut self) {
        self.menu = None;
    }

    pub(crate) fn update(&mut self, node: &Node, ctx: &ViewContext<'_>) -> bool {
        let moved = *ctx.path != self.path;
        if moved {
            self.path = ctx.path.clone();
        }
        self.refresh(node);
        self.sync_menu(ctx);
        if let Some(menu) = &mut self.menu {
            menu.field_value.clear();
        }
        moved
    }

    /// Copy a non-empty panel title back onto the label.
    pub(crate) fn materialize(&mut self, ctx: &ViewContext<'_>) -> Option<Transaction> {
        let label = ctx.node()?;
        let panel_path = ctx.path.sibling(ctx.path.last_index()? + 1)?;
        let panel = ctx.doc.node_at(&panel_path).filter(|n| n.is(TAB_PANEL))?;
        let recovered = panel.str_attr(ATTR_TITLE);
        if recovered.is_empty() || recovered == label.str_attr(ATTR_TITLE) {
            return None;
        }
        debug!(message = "tabs.title_recovered", path = %ctx.path, title = recovered);
        let mut tx = Transaction::new("recover tab title");
        tx.set_attr(ctx.path.clone(), ATTR_TITLE, recovered);
        Some(tx)
    }

    pub(crate) fn handle(&mut self, input: &ViewInput, ctx: &ViewContext<'_>) -> Option<Transaction> {
        let menu = self.menu.as_ref()?;
        match input {
            ViewInput::ToggleMenu => {
                menu.toggle();
                None
            }
            ViewInput::Commit(title) => {
                menu.close();
                rename_tab(ctx.doc, ctx.path, title)
            }
            ViewInput::Delete => {
                menu.close();
                delete_tab(ctx.doc, ctx.path, &self.config)
            }
            ViewInput::Activate | ViewInput::MenuPress => None,
        }
    }
}
