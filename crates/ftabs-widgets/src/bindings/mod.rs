#![forbid(unsafe_code)]

//! View bindings for the three interactive tab kinds.
//!
//! Panels and groups are plain content and get no binding. Each binding
//! keeps the path it last saw; a changed path means the node moved and
//! needs a deferred `materialize` to re-derive anything positional.

mod create;
mod label;
mod selector;

use ftabs_core::{Node, Transaction};
use ftabs_runtime::{NodeView, ViewContext, ViewInput};

pub use create::CreateBinding;
pub use label::{LabelBinding, LabelMenu};
pub use selector::SelectorBinding;

/// A live binding for one tab node.
#[derive(Debug)]
pub enum TabView {
    Selector(SelectorBinding),
    Label(LabelBinding),
    Create(CreateBinding),
}

impl TabView {
    #[must_use]
    pub fn as_selector(&self) -> Option<&SelectorBinding> {
        match self {
            Self::Selector(binding) => Some(binding),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label(&self) -> Option<&LabelBinding> {
        match self {
            Self::Label(binding) => Some(binding),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_create(&self) -> Option<&CreateBinding> {
        match self {
            Self::Create(binding) => Some(binding),
            _ => None,
        }
    }
}

impl NodeView for TabView {
    fn update(&mut self, node: &Node, ctx: &ViewContext<'_>) -> bool {
        match self {
            Self::Selector(binding) => binding.update(node, ctx),
            Self::Label(binding) => binding.update(node, ctx),
            Self::Create(binding) => binding.update(node, ctx),
        }
    }

    fn materialize(&mut self, ctx: &ViewContext<'_>) -> Option<Transaction> {
        match self {
            Self::Selector(binding) => binding.materialize(ctx),
            Self::Label(binding) => binding.materialize(ctx),
            Self::Create(_) => None,
        }
    }

    fn handle(&mut self, input: &ViewInput, ctx: &ViewContext<'_>) -> Option<Transaction> {
        match self {
            Self::Selector(binding) => binding.handle(input, ctx),
            Self::Label(binding) => binding.handle(input, ctx),
            Self::Create(binding) => binding.handle(input, ctx),
        }
    }

    fn destroy(&mut self) {
        if let Self::Label(binding) = self {
            binding.teardown();
        }
    }
}
