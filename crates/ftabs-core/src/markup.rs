#![forbid(unsafe_code)]

//! Mapping between documents and tag + attribute markup.
//!
//! Each node kind that appears in markup registers a [`MarkupRule`] on its
//! [`crate::NodeSpec`]. Serialization walks the tree and asks each rule for
//! its element; parsing reads the markup with `roxmltree` and hands every
//! element to the rules in registration order until one claims it.
//!
//! Output is well-formed XML (void elements are self-closed, boolean markers
//! are written as `name=""`), so serialized documents always parse back.

use std::fmt::Write as _;
use std::rc::Rc;

use tracing::debug;

use crate::document::Document;
use crate::error::MarkupError;
use crate::node::{Attrs, Node};
use crate::schema::{ContentRule, DOC, Schema};

const VOID_ELEMENTS: &[&str] = &["input", "br", "hr", "img"];

/// A markup item: element or text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element(Element),
    Text(String),
}

/// A markup element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    /// Element with no attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Append an attribute (builder).
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a boolean marker when `present` (builder).
    #[must_use]
    pub fn marker(self, name: impl Into<String>, present: bool) -> Self {
        if present { self.attr(name, "") } else { self }
    }

    /// Append a text child (builder).
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Markup::Text(text.into()));
        self
    }

    /// Attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present (boolean marker check).
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether the `class` attribute contains `class` as a token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Markup::Text(text) => out.push_str(text),
                Markup::Element(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }
}

/// Markup mapping for one node kind.
pub trait MarkupRule: Sync {
    /// Element for `node`. Node children are appended by the serializer
    /// when [`MarkupRule::has_content`] is true.
    fn to_element(&self, node: &Node) -> Element;

    /// Attributes for a matching element, `None` if the element is not this
    /// kind. Omitted attributes receive schema defaults.
    fn parse(&self, element: &Element) -> Option<Attrs>;

    /// Whether element children map to node children.
    fn has_content(&self) -> bool {
        true
    }
}

/// `<p>` for paragraphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphMarkup;

impl MarkupRule for ParagraphMarkup {
    fn to_element(&self, _node: &Node) -> Element {
        Element::new("p")
    }

    fn parse(&self, element: &Element) -> Option<Attrs> {
        (element.tag == "p").then(Attrs::new)
    }
}

/// Serialize the document's content (the root itself has no markup).
#[must_use]
pub fn to_markup(doc: &Document) -> String {
    let mut out = String::new();
    for child in doc.root().children() {
        if let Some(markup) = node_to_markup(doc.schema(), child) {
            write_markup(&markup, &mut out);
        }
    }
    out
}

/// Markup for a single node, `None` for kinds without a mapping.
#[must_use]
pub fn node_to_markup(schema: &Schema, node: &Node) -> Option<Markup> {
    if let Some(text) = node.text_value() {
        return Some(Markup::Text(text.to_owned()));
    }
    let rule = schema.spec(node.kind())?.markup?;
    let mut element = rule.to_element(node);
    if rule.has_content() {
        element
            .children
            .extend(node.children().iter().filter_map(|c| node_to_markup(schema, c)));
    }
    Some(Markup::Element(element))
}

/// Write markup as text.
pub fn write_markup(markup: &Markup, out: &mut String) {
    match markup {
        Markup::Text(text) => {
            let _ = write!(out, "{}", v_htmlescape::escape(text));
        }
        Markup::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                let _ = write!(out, " {name}=\"{}\"", v_htmlescape::escape(value));
            }
            if el.children.is_empty() && VOID_ELEMENTS.contains(&el.tag.as_str()) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in &el.children {
                write_markup(child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}

/// Parse markup into a new document over `schema`.
///
/// # Errors
///
/// Fails on malformed markup, elements no rule claims, stray text, and
/// documents that violate the schema.
pub fn from_markup(schema: Rc<Schema>, source: &str) -> Result<Document, MarkupError> {
    let wrapped = format!("<root>{source}</root>");
    let xml = roxmltree::Document::parse(&wrapped)?;
    let root = element_from_xml(xml.root_element());
    let children = parse_children(&schema, &root.children, DOC)?;
    let doc = Document::from_root(schema, Node::new(DOC).with_children(children))?;
    debug!(
        nodes = doc.node_count(),
        bytes = source.len(),
        "markup parsed"
    );
    Ok(doc)
}

fn element_from_xml(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    element.attrs = node
        .attributes()
        .map(|attr| (attr.name().to_owned(), attr.value().to_owned()))
        .collect();
    for child in node.children() {
        if child.is_element() {
            element.children.push(Markup::Element(element_from_xml(child)));
        } else if let Some(text) = child.text().filter(|_| child.is_text()) {
            element.children.push(Markup::Text(text.to_owned()));
        }
    }
    element
}

fn parse_children(
    schema: &Schema,
    items: &[Markup],
    parent_kind: &str,
) -> Result<Vec<Node>, MarkupError> {
    let accepts_text = schema
        .spec(parent_kind)
        .is_some_and(|spec| matches!(spec.content, ContentRule::Text));
    let mut nodes = Vec::new();
    for item in items {
        match item {
            Markup::Text(text) if accepts_text => {
                if !text.is_empty() {
                    nodes.push(Node::text(text.clone()));
                }
            }
            Markup::Text(text) => {
                if !text.trim().is_empty() {
                    return Err(MarkupError::UnexpectedText(parent_kind.to_owned()));
                }
            }
            Markup::Element(el) => nodes.push(parse_element(schema, el)?),
        }
    }
    Ok(nodes)
}

fn parse_element(schema: &Schema, el: &Element) -> Result<Node, MarkupError> {
    for spec in schema.specs() {
        let Some(rule) = spec.markup else { continue };
        let Some(attrs) = rule.parse(el) else {
            continue;
        };
        let children = if rule.has_content() {
            parse_children(schema, &el.children, spec.name)?
        } else {
            Vec::new()
        };
        return Ok(schema.node(spec.name, attrs, children)?);
    }
    Err(MarkupError::UnknownElement(el.tag.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PARAGRAPH;

    fn schema() -> Rc<Schema> {
        Rc::new(Schema::base().build())
    }

    #[test]
    fn element_helpers() {
        let el = Element::new("div")
            .attr("class", "tabs wide")
            .marker("active", true)
            .marker("checked", false)
            .text("a");
        assert!(el.has_class("tabs"));
        assert!(el.has_class("wide"));
        assert!(!el.has_class("tab"));
        assert!(el.has("active"));
        assert!(!el.has("checked"));
        assert_eq!(el.text_content(), "a");
    }

    #[test]
    fn paragraphs_round_trip() {
        let doc = from_markup(schema(), "<p>one &amp; two</p><p></p>").expect("parse");
        assert_eq!(doc.root().child_count(), 2);
        assert_eq!(doc.root().children()[0].text_content(), "one & two");
        assert!(doc.root().children()[1].is(PARAGRAPH));

        let out = to_markup(&doc);
        assert_eq!(out, "<p>one &amp; two</p><p></p>");
        let again = from_markup(schema(), &out).expect("reparse");
        assert_eq!(to_markup(&again), out);
    }

    #[test]
    fn void_elements_self_close() {
        let mut out = String::new();
        write_markup(
            &Markup::Element(Element::new("input").attr("id", "a\"b")),
            &mut out,
        );
        assert_eq!(out, "<input id=\"a&quot;b\"/>");
    }

    #[test]
    fn unknown_elements_rejected() {
        let err = from_markup(schema(), "<blink>x</blink>").expect_err("unknown");
        assert!(matches!(err, MarkupError::UnknownElement(tag) if tag == "blink"));
    }

    #[test]
    fn stray_text_rejected_but_whitespace_ignored() {
        assert!(from_markup(schema(), "  <p>a</p>\n ").is_ok());
        let err = from_markup(schema(), "loose <p>a</p>").expect_err("text at doc level");
        assert!(matches!(err, MarkupError::UnexpectedText(_)));
    }

    #[test]
    fn malformed_markup_is_a_syntax_error() {
        let err = from_markup(schema(), "<p>").expect_err("unclosed");
        assert!(matches!(err, MarkupError::Syntax(_)));
    }
}
