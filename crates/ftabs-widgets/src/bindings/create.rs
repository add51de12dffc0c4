#![forbid(unsafe_code)]

use std::rc::Rc;

use ftabs_core::{Node, Transaction};
use ftabs_runtime::{ViewContext, ViewInput};

use crate::commands::create_tab;
use crate::config::TabsConfig;

/// The `+` button at the end of a group.
#[derive(Debug)]
pub struct CreateBinding {
    config: Rc<TabsConfig>,
    visible: bool,
}

impl CreateBinding {
    #[must_use]
    pub fn new(ctx: &ViewContext<'_>, config: Rc<TabsConfig>) -> Self {
        Self {
            config,
            visible: ctx.editable,
        }
    }

    /// Shown only while the host is editable.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn update(&mut self, _node: &Node, ctx: &ViewContext<'_>) -> bool {
        self.visible = ctx.editable;
        false
    }

    pub(crate) fn handle(&mut self, input: &ViewInput, ctx: &ViewContext<'_>) -> Option<Transaction> {
        match input {
            ViewInput::Activate if self.visible => create_tab(ctx.doc, ctx.path, &self.config),
            _ => None,
        }
    }
}
