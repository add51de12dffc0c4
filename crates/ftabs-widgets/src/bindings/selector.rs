#![forbid(unsafe_code)]

use std::rc::Rc;

use ftabs_core::{Node, Path, Transaction};
use ftabs_runtime::{ViewContext, ViewInput};
use tracing::trace;

use crate::active::seed;
use crate::commands::select_tab;
use crate::config::TabsConfig;
use crate::ident::{group_key, sync_ids};
use crate::kind::{ATTR_ACTIVE, ATTR_CHECKED, ATTR_ID};

/// Radio-style selector of one tab.
#[derive(Debug)]
pub struct SelectorBinding {
    config: Rc<TabsConfig>,
    path: Path,
    dom_id: String,
    group: String,
    checked: bool,
    active: bool,
    /// Set until the first materialize; only that one may seed.
    fresh: bool,
}

impl SelectorBinding {
    #[must_use]
    pub fn new(node: &Node, ctx: &ViewContext<'_>, config: Rc<TabsConfig>) -> Self {
        let mut binding = Self {
            config,
            path: ctx.path.clone(),
            dom_id: String::new(),
            group: String::new(),
            checked: false,
            active: false,
            fresh: true,
        };
        binding.refresh(node);
        binding
    }

    fn refresh(&mut self, node: &Node) {
        node.str_attr(ATTR_ID).clone_into(&mut self.dom_id);
        let container = self.path.parent().unwrap_or_default();
        self.group = group_key(&self.config.group_prefix, &container);
        self.checked = node.bool_attr(ATTR_CHECKED);
        self.active = node.bool_attr(ATTR_ACTIVE);
    }

    /// Identifier rendered on the control.
    #[must_use]
    pub fn dom_id(&self) -> &str {
        &self.dom_id
    }

    /// Radio group key shared by the selectors of one container.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked
    }

    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn update(&mut self, node: &Node, ctx: &ViewContext<'_>) -> bool {
        let moved = *ctx.path != self.path;
        if moved {
            trace!(from = %self.path, to = %ctx.path, "selector moved");
            self.path = ctx.path.clone();
        }
        self.refresh(node);
        moved || sync_ids(ctx.doc, ctx.path, &self.config).is_some()
    }

    pub(crate) fn materialize(&mut self, ctx: &ViewContext<'_>) -> Option<Transaction> {
        let mut tx = Transaction::new("materialize tab selector");
        if let Some(sync) = sync_ids(ctx.doc, ctx.path, &self.config) {
            tx.append(sync);
        }
        if std::mem::take(&mut self.fresh) {
            if let Some(seeded) = seed(ctx.doc, ctx.path) {
                tx.append(seeded);
            }
        }
        tx.non_empty()
    }

    pub(crate) fn handle(&mut self, input: &ViewInput, ctx: &ViewContext<'_>) -> Option<Transaction> {
        match input {
            ViewInput::Activate => select_tab(ctx.doc, ctx.path),
            _ => None,
        }
    }
}
