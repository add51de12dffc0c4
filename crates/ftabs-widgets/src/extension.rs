#![forbid(unsafe_code)]

//! The tab group extension plugged into [`ftabs_runtime::EditorView`].

use std::rc::Rc;

use ftabs_core::{Document, Node, SchemaBuilder, Selection};
use ftabs_runtime::{Extension, ViewContext};

use crate::bindings::{CreateBinding, LabelBinding, SelectorBinding, TabView};
use crate::commands::select_all_in_panel;
use crate::config::TabsConfig;
use crate::kind::TabKind;
use crate::schema::register;

/// Registers the tab kinds and binds selectors, labels and create buttons.
#[derive(Debug, Clone, Default)]
pub struct TabsExtension {
    config: Rc<TabsConfig>,
}

impl TabsExtension {
    #[must_use]
    pub fn new(config: TabsConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TabsConfig {
        &self.config
    }
}

impl Extension for TabsExtension {
    type View = TabView;

    fn extend_schema(&self, schema: SchemaBuilder) -> SchemaBuilder {
        register(schema, &self.config)
    }

    fn create_view(&self, node: &Node, ctx: &ViewContext<'_>) -> Option<TabView> {
        let config = Rc::clone(&self.config);
        match TabKind::of(node)? {
            TabKind::Selector => Some(TabView::Selector(SelectorBinding::new(node, ctx, config))),
            TabKind::Label => Some(TabView::Label(LabelBinding::new(node, ctx, config))),
            TabKind::Create => Some(TabView::Create(CreateBinding::new(ctx, config))),
            TabKind::Group | TabKind::Panel => None,
        }
    }

    fn select_all(&self, doc: &Document, selection: &Selection) -> Option<Selection> {
        select_all_in_panel(doc, selection)
    }
}
