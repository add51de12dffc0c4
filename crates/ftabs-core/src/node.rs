#![forbid(unsafe_code)]

//! Document nodes and attribute values.
//!
//! A [`Node`] is a plain owned tree value. Identity is carried separately by
//! [`NodeId`], which the owning [`crate::Document`] assigns; a freshly built
//! node is unassigned until it lands in a document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::TEXT;

/// Document-scoped node identity.
///
/// Ids are never serialized and never reused within one document. Copies of
/// a node that are pasted back in receive fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(u64);

impl NodeId {
    /// Marker for nodes that have not been inserted into a document yet.
    pub const UNASSIGNED: Self = Self(0);

    /// Create a node id from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether a document has assigned this id.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean marker (rendered as a present/absent markup attribute).
    Bool(bool),
    /// String value.
    Str(String),
}

impl AttrValue {
    /// String payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    /// Boolean payload, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Str(_) => None,
        }
    }

    /// Whether both values carry the same variant.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Name of the value type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Attribute map, ordered for deterministic serialization.
pub type Attrs = BTreeMap<String, AttrValue>;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(skip)]
    id: NodeId,
    kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Node {
    /// Create an empty node of the given kind.
    ///
    /// Attributes the schema declares but this node omits are filled in with
    /// their defaults when the node is validated through
    /// [`crate::Schema::node`] or inserted by a transaction.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: NodeId::UNASSIGNED,
            kind: kind.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(TEXT)
        }
    }

    /// Set an attribute (builder).
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Replace all attributes (builder).
    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Append a child (builder).
    #[must_use]
    pub fn with_child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// Replace all children (builder).
    #[must_use]
    pub fn with_children(mut self, nodes: Vec<Node>) -> Self {
        self.children = nodes;
        self
    }

    /// Document-assigned identity.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Node kind name, as registered on the schema.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether this node is of the given kind.
    #[must_use]
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Whether this is a text leaf.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == TEXT
    }

    /// All attributes.
    #[must_use]
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Raw attribute lookup.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    /// String attribute, or `""` when missing or not a string.
    #[must_use]
    pub fn str_attr(&self, name: &str) -> &str {
        self.attrs
            .get(name)
            .and_then(AttrValue::as_str)
            .unwrap_or("")
    }

    /// Boolean attribute, or `false` when missing or not a boolean.
    #[must_use]
    pub fn bool_attr(&self, name: &str) -> bool {
        self.attrs
            .get(name)
            .and_then(AttrValue::as_bool)
            .unwrap_or(false)
    }

    /// Child nodes.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child at `index`.
    #[must_use]
    pub fn child_at(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Text of a text leaf.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Concatenated text of every text leaf below (and including) this node.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_owned(), value);
    }

    pub(crate) fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Clear ids on this subtree so the next document assigns fresh ones.
    pub(crate) fn clear_ids(&mut self) {
        self.id = NodeId::UNASSIGNED;
        for child in &mut self.children {
            child.clear_ids();
        }
    }
}
