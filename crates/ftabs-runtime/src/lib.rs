#![forbid(unsafe_code)]

//! Runtime: the view host that keeps live bindings in step with the document.
//!
//! # Role in ftabs
//! `ftabs-runtime` sits between the document substrate (`ftabs-core`) and
//! the tab widgets (`ftabs-widgets`). It applies transactions, constructs and
//! tears down node views, runs deferred repairs one tick later, and routes
//! pointer and text input.
//!
//! # Primary responsibilities
//! - **EditorView**: owns the document and the view registry.
//! - **TaskQueue**: keyed, coalescing deferred work.
//! - **PointerDispatcher**: capture-phase listeners with RAII guards.
//! - **Observable**: versioned snapshots with weak subscribers.
//! - **HostConfig / logging**: ambient configuration and tracing setup.

pub mod config;
pub mod dispatcher;
pub mod editor;
pub mod logging;
pub mod observable;
pub mod queue;
pub mod view;

pub use config::{ConfigError, HostConfig};
pub use dispatcher::{HitPart, HitTarget, ListenerGuard, PointerDispatcher, PointerEvent};
pub use editor::{EditorView, Snapshot};
pub use observable::{Observable, Subscription};
pub use queue::TaskQueue;
pub use view::{Extension, NodeView, ViewContext, ViewInput};
