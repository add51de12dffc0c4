#![forbid(unsafe_code)]

//! Tab node specs, the container grammar, and the markup mapping.
//!
//! | kind          | atom | selectable | isolating | defining |
//! |---------------|------|------------|-----------|----------|
//! | tab_group     |      | yes        | yes       | yes      |
//! | tab_selector  | yes  |            |           | yes      |
//! | tab_label     | yes  |            | yes       | yes      |
//! | tab_panel     |      | yes        | yes       | yes      |
//! | tab_create    | yes  |            |           | yes      |
//!
//! Non-selectable kinds lose their attributes when copied, which is why a
//! label's title is mirrored onto its panel.

use ftabs_core::{
    AttrSpec, AttrValue, Attrs, BLOCK_GROUP, ContentRule, Element, MarkupRule, Node, NodeFlags,
    NodeSpec, Schema, SchemaBuilder,
};

use crate::config::TabsConfig;
use crate::kind::{
    ATTR_ACTIVE, ATTR_CHECKED, ATTR_FOR, ATTR_ID, ATTR_PARENT, ATTR_TITLE, TAB_CREATE, TAB_GROUP,
    TAB_LABEL, TAB_PANEL, TAB_SELECTOR,
};

/// Human-readable container grammar.
pub const TAB_GROUP_GRAMMAR: &str = "(tab_selector tab_label tab_panel)+ tab_create";

/// Radio `name` written to static markup.
pub const MARKUP_RADIO_NAME: &str = "tabs";

/// Whether `children` satisfy [`TAB_GROUP_GRAMMAR`].
#[must_use]
pub fn is_valid_group_content(children: &[Node]) -> bool {
    let Some((last, body)) = children.split_last() else {
        return false;
    };
    last.is(TAB_CREATE)
        && !body.is_empty()
        && body.len() % 3 == 0
        && body.chunks_exact(3).all(|triplet| {
            triplet[0].is(TAB_SELECTOR) && triplet[1].is(TAB_LABEL) && triplet[2].is(TAB_PANEL)
        })
}

fn validate_group(_schema: &Schema, children: &[Node]) -> bool {
    is_valid_group_content(children)
}

/// Register the tab kinds on `builder`.
#[must_use]
pub fn register(builder: SchemaBuilder, config: &TabsConfig) -> SchemaBuilder {
    static GROUP: GroupMarkup = GroupMarkup;
    static SELECTOR: SelectorMarkup = SelectorMarkup;
    static LABEL: LabelMarkup = LabelMarkup;
    static PANEL: PanelMarkup = PanelMarkup;
    static CREATE: CreateMarkup = CreateMarkup;

    builder
        .node(
            NodeSpec::new(TAB_GROUP)
                .group(BLOCK_GROUP)
                .content(ContentRule::Custom {
                    description: TAB_GROUP_GRAMMAR,
                    validate: validate_group,
                })
                .flags(NodeFlags::SELECTABLE | NodeFlags::ISOLATING | NodeFlags::DEFINING)
                .markup(&GROUP),
        )
        .node(
            NodeSpec::new(TAB_SELECTOR)
                .attr(AttrSpec::string(ATTR_ID, ""))
                .attr(AttrSpec::boolean(ATTR_ACTIVE, false))
                .attr(AttrSpec::boolean(ATTR_CHECKED, false))
                .flags(NodeFlags::ATOM | NodeFlags::DEFINING)
                .markup(&SELECTOR),
        )
        .node(
            NodeSpec::new(TAB_LABEL)
                .attr(AttrSpec::string(ATTR_TITLE, &config.default_title))
                .attr(AttrSpec::string(ATTR_FOR, ""))
                .flags(NodeFlags::ATOM | NodeFlags::ISOLATING | NodeFlags::DEFINING)
                .markup(&LABEL),
        )
        .node(
            NodeSpec::new(TAB_PANEL)
                .content(ContentRule::Group {
                    group: BLOCK_GROUP,
                    min: 1,
                })
                .attr(AttrSpec::string(ATTR_PARENT, ""))
                .attr(AttrSpec::string(ATTR_TITLE, ""))
                .flags(NodeFlags::SELECTABLE | NodeFlags::ISOLATING | NodeFlags::DEFINING)
                .markup(&PANEL),
        )
        .node(
            NodeSpec::new(TAB_CREATE)
                .flags(NodeFlags::ATOM | NodeFlags::DEFINING)
                .markup(&CREATE),
        )
}

/// A schema with the base kinds plus the tab kinds.
#[must_use]
pub fn tab_schema(config: &TabsConfig) -> Schema {
    register(Schema::base(), config).build()
}

/// `<div class="tabs">`
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupMarkup;

impl MarkupRule for GroupMarkup {
    fn to_element(&self, _node: &Node) -> Element {
        Element::new("div").attr("class", "tabs")
    }

    fn parse(&self, element: &Element) -> Option<Attrs> {
        (element.tag == "div" && element.has_class("tabs")).then(Attrs::new)
    }
}

/// `<input class="radiotab" type="radio" …/>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorMarkup;

impl MarkupRule for SelectorMarkup {
    fn to_element(&self, node: &Node) -> Element {
        Element::new("input")
            .attr("class", "radiotab")
            .attr("type", "radio")
            .attr("name", MARKUP_RADIO_NAME)
            .attr(ATTR_ID, node.str_attr(ATTR_ID))
            .marker(ATTR_ACTIVE, node.bool_attr(ATTR_ACTIVE))
            .marker(ATTR_CHECKED, node.bool_attr(ATTR_CHECKED))
    }

    fn parse(&self, element: &Element) -> Option<Attrs> {
        if element.tag != "input" || !element.has_class("radiotab") {
            return None;
        }
        let mut attrs = Attrs::new();
        if let Some(id) = element.get(ATTR_ID) {
            attrs.insert(ATTR_ID.to_owned(), AttrValue::from(id));
        }
        attrs.insert(
            ATTR_ACTIVE.to_owned(),
            AttrValue::Bool(element.has(ATTR_ACTIVE)),
        );
        attrs.insert(
            ATTR_CHECKED.to_owned(),
            AttrValue::Bool(element.has(ATTR_CHECKED)),
        );
        Some(attrs)
    }

    fn has_content(&self) -> bool {
        false
    }
}

/// `<label class="label" for="…">title</label>`
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelMarkup;

impl MarkupRule for LabelMarkup {
    fn to_element(&self, node: &Node) -> Element {
        Element::new("label")
            .attr("class", "label")
            .attr(ATTR_FOR, node.str_attr(ATTR_FOR))
            .text(node.str_attr(ATTR_TITLE))
    }

    fn parse(&self, element: &Element) -> Option<Attrs> {
        if element.tag != "label" || !element.has_class("label") {
            return None;
        }
        let mut attrs = Attrs::new();
        if let Some(target) = element.get(ATTR_FOR) {
            attrs.insert(ATTR_FOR.to_owned(), AttrValue::from(target));
        }
        attrs.insert(ATTR_TITLE.to_owned(), AttrValue::from(element.text_content()));
        Some(attrs)
    }

    fn has_content(&self) -> bool {
        false
    }
}

/// `<div class="panel" parent="…" title="…">`
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelMarkup;

impl MarkupRule for PanelMarkup {
    fn to_element(&self, node: &Node) -> Element {
        let element = Element::new("div")
            .attr("class", "panel")
            .attr(ATTR_PARENT, node.str_attr(ATTR_PARENT));
        match node.str_attr(ATTR_TITLE) {
            "" => element,
            title => element.attr(ATTR_TITLE, title),
        }
    }

    fn parse(&self, element: &Element) -> Option<Attrs> {
        if element.tag != "div" || !element.has_class("panel") {
            return None;
        }
        let mut attrs = Attrs::new();
        for name in [ATTR_PARENT, ATTR_TITLE] {
            if let Some(value) = element.get(name) {
                attrs.insert(name.to_owned(), AttrValue::from(value));
            }
        }
        Some(attrs)
    }
}

/// `<button class="tab-create" style="display: none">+</button>`
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateMarkup;

impl MarkupRule for CreateMarkup {
    fn to_element(&self, _node: &Node) -> Element {
        Element::new("button")
            .attr("class", "tab-create")
            .attr("style", "display: none")
            .text("+")
    }

    fn parse(&self, element: &Element) -> Option<Attrs> {
        (element.tag == "button" && element.has_class("tab-create")).then(Attrs::new)
    }

    fn has_content(&self) -> bool {
        false
    }
}
