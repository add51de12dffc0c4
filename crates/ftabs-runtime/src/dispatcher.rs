#![forbid(unsafe_code)]

//! Capture-phase pointer listeners.
//!
//! Views that must react to pointer presses *anywhere* (e.g. to dismiss an
//! open menu on an outside press) register a capture listener here. The host
//! runs every live capture listener before routing the press to its target
//! view. Registration returns a [`ListenerGuard`]; dropping the guard is the
//! only way to unregister, so a view's listeners die with the view.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ftabs_core::NodeId;
use tracing::trace;

/// Which part of a bound node a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitPart {
    /// The node's primary control (radio input, create button).
    Control,
    /// An overflow-menu toggle.
    MenuToggle,
    /// Inside an open menu, outside any specific control.
    MenuBody,
    /// A text field inside a menu.
    TitleField,
    /// A delete trigger inside a menu.
    DeleteButton,
    /// Editable content.
    Content,
}

/// Where a pointer press landed. `node == None` means outside any bound node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitTarget {
    pub node: Option<NodeId>,
    pub part: HitPart,
}

impl HitTarget {
    /// A press on `part` of `node`.
    #[must_use]
    pub const fn on(node: NodeId, part: HitPart) -> Self {
        Self {
            node: Some(node),
            part,
        }
    }

    /// A press outside every bound node.
    #[must_use]
    pub const fn outside() -> Self {
        Self {
            node: None,
            part: HitPart::Content,
        }
    }

    /// Whether the press landed on `node` at one of `parts`.
    #[must_use]
    pub fn is_within(&self, node: NodeId, parts: &[HitPart]) -> bool {
        self.node == Some(node) && parts.contains(&self.part)
    }
}

/// A pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: HitTarget,
}

type ListenerRc = Rc<dyn Fn(&PointerEvent)>;
type ListenerWeak = Weak<dyn Fn(&PointerEvent)>;

/// Shared registry of capture-phase pointer listeners.
///
/// Cloning shares the registry.
#[derive(Clone, Default)]
pub struct PointerDispatcher {
    listeners: Rc<RefCell<Vec<ListenerWeak>>>,
}

impl fmt::Debug for PointerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capture listener. It stays live until the guard drops.
    pub fn listen_capture(&self, listener: impl Fn(&PointerEvent) + 'static) -> ListenerGuard {
        let strong: ListenerRc = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::downgrade(&strong));
        ListenerGuard {
            _guard: Box::new(strong),
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Run every live listener for `event`, pruning dead ones.
    pub fn dispatch(&self, event: &PointerEvent) {
        let live: Vec<ListenerRc> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|w| w.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        trace!(listeners = live.len(), target = ?event.target, "pointer capture");
        for listener in &live {
            listener(event);
        }
    }
}

/// RAII guard for a capture listener.
pub struct ListenerGuard {
    _guard: Box<dyn Any>,
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn guard_controls_lifetime() {
        let dispatcher = PointerDispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let guard = dispatcher.listen_capture({
            let hits = Rc::clone(&hits);
            move |_| hits.set(hits.get() + 1)
        });
        assert_eq!(dispatcher.listener_count(), 1);

        dispatcher.dispatch(&PointerEvent {
            target: HitTarget::outside(),
        });
        assert_eq!(hits.get(), 1);

        drop(guard);
        assert_eq!(dispatcher.listener_count(), 0);
        dispatcher.dispatch(&PointerEvent {
            target: HitTarget::outside(),
        });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listeners_may_register_during_dispatch() {
        let dispatcher = PointerDispatcher::new();
        let late = Rc::new(RefCell::new(None));
        let _guard = dispatcher.listen_capture({
            let dispatcher = dispatcher.clone();
            let late = Rc::clone(&late);
            move |_| {
                if late.borrow().is_none() {
                    *late.borrow_mut() = Some(dispatcher.listen_capture(|_| {}));
                }
            }
        });
        dispatcher.dispatch(&PointerEvent {
            target: HitTarget::outside(),
        });
        assert_eq!(dispatcher.listener_count(), 2);
    }

    #[test]
    fn hit_target_containment() {
        let id = NodeId::new(3);
        let hit = HitTarget::on(id, HitPart::MenuBody);
        assert!(hit.is_within(id, &[HitPart::MenuToggle, HitPart::MenuBody]));
        assert!(!hit.is_within(NodeId::new(4), &[HitPart::MenuBody]));
        assert!(!HitTarget::outside().is_within(id, &[HitPart::Content]));
    }
}
