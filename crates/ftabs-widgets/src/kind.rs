#![forbid(unsafe_code)]

//! Tab node kinds and attribute names.

use std::fmt;

use ftabs_core::Node;

/// Container kind: `(selector label panel)+ create`.
pub const TAB_GROUP: &str = "tab_group";
/// Radio-like selector leaf.
pub const TAB_SELECTOR: &str = "tab_selector";
/// Title leaf.
pub const TAB_LABEL: &str = "tab_label";
/// Content panel.
pub const TAB_PANEL: &str = "tab_panel";
/// Trailing "add tab" affordance.
pub const TAB_CREATE: &str = "tab_create";

/// Selector identifier.
pub const ATTR_ID: &str = "id";
/// Selector editor-state flag.
pub const ATTR_ACTIVE: &str = "active";
/// Selector persisted markup flag; kept equal to `active`.
pub const ATTR_CHECKED: &str = "checked";
/// Label and panel title.
pub const ATTR_TITLE: &str = "title";
/// Label back-reference to its selector.
pub const ATTR_FOR: &str = "for";
/// Panel back-reference to its selector.
pub const ATTR_PARENT: &str = "parent";

/// One of the tab node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabKind {
    Group,
    Selector,
    Label,
    Panel,
    Create,
}

impl TabKind {
    pub const ALL: [Self; 5] = [
        Self::Group,
        Self::Selector,
        Self::Label,
        Self::Panel,
        Self::Create,
    ];

    /// Registered kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Group => TAB_GROUP,
            Self::Selector => TAB_SELECTOR,
            Self::Label => TAB_LABEL,
            Self::Panel => TAB_PANEL,
            Self::Create => TAB_CREATE,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Kind of `node`, `None` for non-tab nodes.
    #[must_use]
    pub fn of(node: &Node) -> Option<Self> {
        Self::from_name(node.kind())
    }

    /// Whether this kind is part of a selector/label/panel triplet.
    #[must_use]
    pub const fn is_triplet_member(self) -> bool {
        matches!(self, Self::Selector | Self::Label | Self::Panel)
    }

    /// Position within a triplet (selector 0, label 1, panel 2).
    #[must_use]
    pub const fn triplet_offset(self) -> Option<usize> {
        match self {
            Self::Selector => Some(0),
            Self::Label => Some(1),
            Self::Panel => Some(2),
            Self::Group | Self::Create => None,
        }
    }

    /// Attribute holding this member's copy of the triplet identifier.
    #[must_use]
    pub const fn reference_attr(self) -> Option<&'static str> {
        match self {
            Self::Selector => Some(ATTR_ID),
            Self::Label => Some(ATTR_FOR),
            Self::Panel => Some(ATTR_PARENT),
            Self::Group | Self::Create => None,
        }
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
