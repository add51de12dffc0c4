#![forbid(unsafe_code)]

//! Structural positions: child-index paths from the document root.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Child-index path from the root. The empty path is the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Path(Vec<usize>);

impl Path {
    /// The root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path from explicit segments.
    #[must_use]
    pub fn new(segments: Vec<usize>) -> Self {
        Self(segments)
    }

    /// Index segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Index of this node within its parent, `None` for the root.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Path {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(index);
        Self(segments)
    }

    /// Path of the sibling at `index` (same parent).
    #[must_use]
    pub fn sibling(&self, index: usize) -> Option<Path> {
        self.parent().map(|parent| parent.child(index))
    }

    /// Whether `self` lies at or below `ancestor`.
    #[must_use]
    pub fn starts_with(&self, ancestor: &Path) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Ancestor paths from the nearest parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (0..self.0.len()).rev().map(|len| Self(self.0[..len].to_vec()))
    }
}

impl From<Vec<usize>> for Path {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl From<&[usize]> for Path {
    fn from(segments: &[usize]) -> Self {
        Self(segments.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
