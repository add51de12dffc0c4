#![forbid(unsafe_code)]

//! Tab groups for ftabs documents.
//!
//! A tab group is a block whose children follow
//! `(tab_selector tab_label tab_panel)+ tab_create`. This crate registers
//! those kinds, keeps each selector's identifier in step with its position,
//! keeps exactly one selector active per group, and binds selectors, labels
//! and create buttons to live views through [`TabsExtension`].

pub mod active;
pub mod bindings;
pub mod commands;
pub mod config;
pub mod extension;
pub mod group;
pub mod ident;
pub mod kind;
pub mod schema;
pub mod text;

pub use bindings::{CreateBinding, LabelBinding, LabelMenu, SelectorBinding, TabView};
pub use commands::{
    create_tab, delete_tab, insert_tab_group, rename_tab, select_all_in_panel, select_tab,
};
pub use config::TabsConfig;
pub use extension::TabsExtension;
pub use kind::TabKind;
pub use schema::{TAB_GROUP_GRAMMAR, tab_schema};
