#![forbid(unsafe_code)]

//! Core: the document substrate that tab groups live in.
//!
//! # Role in ftabs
//! `ftabs-core` is the model layer. It owns the document tree, the schema that
//! constrains it, and the transaction primitive every edit goes through.
//!
//! # Primary responsibilities
//! - **Schema / NodeSpec**: typed node kinds, attribute defaults, content rules.
//! - **Document**: the tree, node identity, and path resolution.
//! - **Transaction**: an atomic batch of steps, validated before it lands.
//! - **Markup**: mapping between nodes and tag + attribute markup.
//! - **Selection / Slice**: child-range selections and copy semantics.
//!
//! # How it fits in the system
//! `ftabs-runtime` hosts a [`Document`] and applies transactions to it;
//! `ftabs-widgets` registers the tab node kinds on a [`Schema`] and builds
//! transactions against a `&Document`.

pub mod document;
pub mod error;
pub mod markup;
pub mod node;
pub mod path;
pub mod schema;
pub mod selection;
pub mod slice;
pub mod transaction;

pub use document::Document;
pub use error::{EditError, MarkupError};
pub use markup::{Element, Markup, MarkupRule, from_markup, to_markup};
pub use node::{AttrValue, Attrs, Node, NodeId};
pub use path::Path;
pub use schema::{
    AttrSpec, BLOCK_GROUP, ContentRule, DOC, NodeFlags, NodeSpec, PARAGRAPH, Schema,
    SchemaBuilder, TEXT,
};
pub use selection::Selection;
pub use slice::Slice;
pub use transaction::{EditSource, Step, Transaction};
