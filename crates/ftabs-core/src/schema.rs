#![forbid(unsafe_code)]

//! Node specifications and the schema that validates document shape.
//!
//! Every node kind is registered as a [`NodeSpec`]: its attributes and their
//! defaults, the [`ContentRule`] its children must satisfy, behavior flags,
//! and an optional markup mapping. The schema is the single authority on
//! shape; transactions are validated against it before they are committed.

use std::fmt;

use ahash::AHashMap;
use bitflags::bitflags;

use crate::error::EditError;
use crate::markup::{MarkupRule, ParagraphMarkup};
use crate::node::{AttrValue, Attrs, Node};
use crate::path::Path;

/// Root node kind.
pub const DOC: &str = "doc";
/// Paragraph node kind.
pub const PARAGRAPH: &str = "paragraph";
/// Text leaf kind.
pub const TEXT: &str = "text";
/// Group name for block-level nodes.
pub const BLOCK_GROUP: &str = "block";

bitflags! {
    /// Behavior flags of a node kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Leaf treated as a single unit by editing.
        const ATOM = 1 << 0;
        /// Can be the target of a node selection; non-selectable nodes lose
        /// their attributes when copied.
        const SELECTABLE = 1 << 1;
        /// Editing operations do not cross this node's boundary.
        const ISOLATING = 1 << 2;
        /// Kept as the wrapper when content is replaced inside it.
        const DEFINING = 1 << 3;
    }
}

/// Declared attribute with its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub default: AttrValue,
}

impl AttrSpec {
    /// String attribute with a default.
    #[must_use]
    pub fn string(name: &'static str, default: &str) -> Self {
        Self {
            name,
            default: AttrValue::from(default),
        }
    }

    /// Boolean attribute with a default.
    #[must_use]
    pub fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            name,
            default: AttrValue::Bool(default),
        }
    }
}

/// Validator for kinds whose content grammar is not expressible as a group.
pub type ContentValidator = fn(&Schema, &[Node]) -> bool;

/// What children a node kind accepts.
#[derive(Clone, Copy)]
pub enum ContentRule {
    /// No children.
    Empty,
    /// Zero or more text leaves.
    Text,
    /// At least `min` children, all members of `group`.
    Group { group: &'static str, min: usize },
    /// Arbitrary grammar checked by a validator function.
    Custom {
        description: &'static str,
        validate: ContentValidator,
    },
}

impl ContentRule {
    fn accepts(&self, schema: &Schema, children: &[Node]) -> bool {
        match self {
            Self::Empty => children.is_empty(),
            Self::Text => children.iter().all(Node::is_text),
            Self::Group { group, min } => {
                children.len() >= *min
                    && children
                        .iter()
                        .all(|child| schema.in_group(child.kind(), group))
            }
            Self::Custom { validate, .. } => validate(schema, children),
        }
    }
}

impl fmt::Display for ContentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Text => f.write_str("text*"),
            Self::Group { group, min: 0 } => write!(f, "{group}*"),
            Self::Group { group, min: 1 } => write!(f, "{group}+"),
            Self::Group { group, min } => write!(f, "{group}{{{min},}}"),
            Self::Custom { description, .. } => f.write_str(description),
        }
    }
}

impl fmt::Debug for ContentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentRule({self})")
    }
}

/// Specification of one node kind.
#[derive(Clone)]
pub struct NodeSpec {
    pub name: &'static str,
    pub group: Option<&'static str>,
    pub content: ContentRule,
    pub attrs: Vec<AttrSpec>,
    pub flags: NodeFlags,
    pub markup: Option<&'static dyn MarkupRule>,
}

impl NodeSpec {
    /// A spec with no group, no attributes, and empty content.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            group: None,
            content: ContentRule::Empty,
            attrs: Vec::new(),
            flags: NodeFlags::empty(),
            markup: None,
        }
    }

    /// Set the group (builder).
    #[must_use]
    pub fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    /// Set the content rule (builder).
    #[must_use]
    pub fn content(mut self, content: ContentRule) -> Self {
        self.content = content;
        self
    }

    /// Declare an attribute (builder).
    #[must_use]
    pub fn attr(mut self, attr: AttrSpec) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Set flags (builder).
    #[must_use]
    pub fn flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the markup mapping (builder).
    #[must_use]
    pub fn markup(mut self, rule: &'static dyn MarkupRule) -> Self {
        self.markup = Some(rule);
        self
    }

    /// Declared attribute by name.
    #[must_use]
    pub fn attr_spec(&self, name: &str) -> Option<&AttrSpec> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    /// Attribute map holding every declared default.
    #[must_use]
    pub fn default_attrs(&self) -> Attrs {
        self.attrs
            .iter()
            .map(|attr| (attr.name.to_owned(), attr.default.clone()))
            .collect()
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("content", &self.content)
            .field("attrs", &self.attrs)
            .field("flags", &self.flags)
            .field("markup", &self.markup.is_some())
            .finish()
    }
}

/// Registered node kinds.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    specs: Vec<NodeSpec>,
    by_name: AHashMap<&'static str, usize>,
}

/// Builder for a [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    specs: Vec<NodeSpec>,
}

impl SchemaBuilder {
    /// Register a node kind. A later spec with the same name replaces the
    /// earlier one.
    #[must_use]
    pub fn node(mut self, spec: NodeSpec) -> Self {
        if let Some(existing) = self.specs.iter_mut().find(|s| s.name == spec.name) {
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
        self
    }

    /// Finish the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        let by_name = self
            .specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| (spec.name, idx))
            .collect();
        Schema {
            specs: self.specs,
            by_name,
        }
    }
}

impl Schema {
    /// An empty builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// A builder preloaded with `doc`, `paragraph`, and `text`.
    #[must_use]
    pub fn base() -> SchemaBuilder {
        static PARAGRAPH_MARKUP: ParagraphMarkup = ParagraphMarkup;
        SchemaBuilder::default()
            .node(NodeSpec::new(DOC).content(ContentRule::Group {
                group: BLOCK_GROUP,
                min: 0,
            }))
            .node(
                NodeSpec::new(PARAGRAPH)
                    .group(BLOCK_GROUP)
                    .content(ContentRule::Text)
                    .flags(NodeFlags::SELECTABLE)
                    .markup(&PARAGRAPH_MARKUP),
            )
            .node(NodeSpec::new(TEXT))
    }

    /// Spec for a kind.
    #[must_use]
    pub fn spec(&self, kind: &str) -> Option<&NodeSpec> {
        self.by_name.get(kind).map(|&idx| &self.specs[idx])
    }

    /// All specs in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &NodeSpec> {
        self.specs.iter()
    }

    /// Whether `kind` is registered and belongs to `group`.
    #[must_use]
    pub fn in_group(&self, kind: &str, group: &str) -> bool {
        self.spec(kind).and_then(|spec| spec.group) == Some(group)
    }

    /// Whether `kind` is registered with the given flag.
    #[must_use]
    pub fn has_flag(&self, kind: &str, flag: NodeFlags) -> bool {
        self.spec(kind).is_some_and(|spec| spec.flags.contains(flag))
    }

    /// Build a node of `kind`, filling defaults for omitted attributes.
    ///
    /// # Errors
    ///
    /// Fails when the kind is unknown, an attribute is undeclared or
    /// ill-typed, or the children violate the content rule.
    pub fn node<I, K>(&self, kind: &str, attrs: I, children: Vec<Node>) -> Result<Node, EditError>
    where
        I: IntoIterator<Item = (K, AttrValue)>,
        K: Into<String>,
    {
        let spec = self
            .spec(kind)
            .ok_or_else(|| EditError::UnknownKind(kind.to_owned()))?;
        let mut merged = spec.default_attrs();
        for (name, value) in attrs {
            let name = name.into();
            self.check_attr(kind, &name, &value)?;
            merged.insert(name, value);
        }
        let node = Node::new(kind).with_attrs(merged).with_children(children);
        self.check_tree(&node, &Path::root())?;
        Ok(node)
    }

    /// Default attributes for a kind (empty when unknown).
    #[must_use]
    pub fn default_attrs(&self, kind: &str) -> Attrs {
        self.spec(kind).map(NodeSpec::default_attrs).unwrap_or_default()
    }

    /// Check that `name = value` is a declared, well-typed attribute of `kind`.
    ///
    /// # Errors
    ///
    /// Returns the specific rejection reason.
    pub fn check_attr(&self, kind: &str, name: &str, value: &AttrValue) -> Result<(), EditError> {
        let spec = self
            .spec(kind)
            .ok_or_else(|| EditError::UnknownKind(kind.to_owned()))?;
        let declared = spec.attr_spec(name).ok_or_else(|| EditError::UnknownAttr {
            kind: kind.to_owned(),
            attr: name.to_owned(),
        })?;
        if !declared.default.same_type(value) {
            return Err(EditError::AttrType {
                kind: kind.to_owned(),
                attr: name.to_owned(),
                expected: declared.default.type_name(),
            });
        }
        Ok(())
    }

    /// Validate `node` and its whole subtree. `path` is used for error
    /// reporting only.
    ///
    /// # Errors
    ///
    /// Returns the first violation found in pre-order.
    pub fn check_tree(&self, node: &Node, path: &Path) -> Result<(), EditError> {
        let spec = self
            .spec(node.kind())
            .ok_or_else(|| EditError::UnknownKind(node.kind().to_owned()))?;
        for (name, value) in node.attrs() {
            self.check_attr(node.kind(), name, value)?;
        }
        if node.is_text() && node.text_value().is_none() {
            return Err(EditError::SchemaViolation {
                kind: node.kind().to_owned(),
                path: path.clone(),
                rule: "text leaf without text".into(),
            });
        }
        if !spec.content.accepts(self, node.children()) {
            return Err(EditError::SchemaViolation {
                kind: node.kind().to_owned(),
                path: path.clone(),
                rule: spec.content.to_string(),
            });
        }
        for (idx, child) in node.children().iter().enumerate() {
            self.check_tree(child, &path.child(idx))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::base()
            .node(
                NodeSpec::new("note")
                    .group(BLOCK_GROUP)
                    .content(ContentRule::Group {
                        group: BLOCK_GROUP,
                        min: 1,
                    })
                    .attr(AttrSpec::string("label", "untitled"))
                    .attr(AttrSpec::boolean("pinned", false)),
            )
            .build()
    }

    #[test]
    fn node_fills_defaults() {
        let schema = schema();
        let para = schema
            .node(PARAGRAPH, Vec::<(String, AttrValue)>::new(), vec![])
            .expect("paragraph");
        let note = schema
            .node("note", [("pinned", AttrValue::Bool(true))], vec![para])
            .expect("note");
        assert_eq!(note.str_attr("label"), "untitled");
        assert!(note.bool_attr("pinned"));
    }

    #[test]
    fn rejects_unknown_and_ill_typed_attrs() {
        let schema = schema();
        assert!(matches!(
            schema.check_attr("note", "color", &AttrValue::from("red")),
            Err(EditError::UnknownAttr { .. })
        ));
        assert!(matches!(
            schema.check_attr("note", "pinned", &AttrValue::from("yes")),
            Err(EditError::AttrType {
                expected: "boolean",
                ..
            })
        ));
        assert!(matches!(
            schema.check_attr("blink", "x", &AttrValue::from("y")),
            Err(EditError::UnknownKind(_))
        ));
    }

    #[test]
    fn content_rules_enforced() {
        let schema = schema();
        let empty_note = Node::new("note").with_attrs(schema.default_attrs("note"));
        let err = schema
            .check_tree(&empty_note, &Path::from(vec![3]))
            .expect_err("note needs a block");
        assert!(err.to_string().contains("block+"));

        let bad_para = Node::new(PARAGRAPH).with_child(Node::new(PARAGRAPH));
        assert!(schema.check_tree(&bad_para, &Path::root()).is_err());

        let doc = Node::new(DOC);
        assert!(schema.check_tree(&doc, &Path::root()).is_ok());
    }

    #[test]
    fn later_spec_replaces_earlier() {
        let schema = Schema::base()
            .node(NodeSpec::new(PARAGRAPH).content(ContentRule::Empty))
            .build();
        assert!(!schema.in_group(PARAGRAPH, BLOCK_GROUP));
        assert_eq!(schema.specs().count(), 3);
    }

    #[test]
    fn rule_display() {
        assert_eq!(ContentRule::Empty.to_string(), "empty");
        assert_eq!(
            ContentRule::Group {
                group: "block",
                min: 0
            }
            .to_string(),
            "block*"
        );
    }
}
