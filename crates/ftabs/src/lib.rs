#![forbid(unsafe_code)]

//! ftabs public facade crate.
//!
//! Re-exports the document substrate, the view host and the tab widgets,
//! and adds [`TabEditor`], a unified [`Error`] and a combined [`Config`].
//!
//! ```no_run
//! use ftabs::prelude::*;
//!
//! let mut editor = TabEditor::new(Config::default());
//! let group = editor.insert_tab_group()?;
//! editor.create_tab(&group)?;
//! editor.rename_tab(&group, 1, "Notes")?;
//! println!("{}", editor.to_markup());
//! # Ok::<(), ftabs::Error>(())
//! ```

pub mod config;
pub mod editor;
pub mod error;

pub use config::Config;
pub use editor::{GroupSummary, TabEditor, TabSummary};
pub use error::{Error, RecoveryAction, Result};

// --- Core re-exports -------------------------------------------------------

pub use ftabs_core::{
    Document, EditError, EditSource, MarkupError, Node, NodeId, Path, Schema, Selection, Slice,
    Step, Transaction, from_markup, to_markup,
};

// --- Runtime re-exports ----------------------------------------------------

pub use ftabs_runtime::logging::{self, LogFormat};
pub use ftabs_runtime::{
    ConfigError, EditorView, HitPart, HitTarget, HostConfig, Snapshot, Subscription,
};

// --- Widget re-exports -----------------------------------------------------

pub use ftabs_widgets::{TabKind, TabView, TabsConfig, TabsExtension};

pub mod prelude {
    pub use crate::{
        Config, Document, Error, GroupSummary, HitPart, HitTarget, HostConfig, Path, Result,
        Selection, TabEditor, TabSummary, TabsConfig, Transaction,
    };

    pub use crate::{core, runtime, widgets};
}

pub use ftabs_core as core;
pub use ftabs_runtime as runtime;
pub use ftabs_widgets as widgets;
