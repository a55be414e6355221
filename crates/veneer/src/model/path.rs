//! Declarative node addressing by key segments.
//!
//! A [`TreePath`] names a node without holding a reference to it: each
//! segment is matched against the `key` of a child, walking from the root
//! list to the target. Paths are how hosts express default state
//! ([`TreeDefaults`](super::TreeDefaults)) for trees whose content is loaded
//! dynamically, so resolution is a soft operation: any segment mismatch
//! yields `None` rather than an error.

use serde::{Deserialize, Serialize};

use super::node::{NodeId, TreeModel};

/// An ordered sequence of key segments addressing a node, root to target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<String>);

impl TreePath {
    /// Creates an empty path. An empty path never resolves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from key segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// The key segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TreePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

impl From<&[&str]> for TreePath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for TreePath {
    fn from(segments: [&str; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl TreeModel {
    /// Resolves a path against the current tree shape.
    ///
    /// Each segment is matched against the keys of the current sibling scope,
    /// first match wins. Returns `None` if any segment fails to match, or if
    /// the path is empty. Resolving the same path twice against an unmodified
    /// tree yields the same node.
    pub fn resolve_path(&self, path: &TreePath) -> Option<NodeId> {
        let mut segments = path.segments().iter();
        let first = segments.next()?;
        let mut current = self.child_by_key(self.roots(), first)?;
        for segment in segments {
            current = self.child_by_key(self.children_of(current), segment)?;
        }
        Some(current)
    }

    fn child_by_key(&self, siblings: &[NodeId], segment: &str) -> Option<NodeId> {
        siblings.iter().copied().find(|&id| {
            self.node(id)
                .and_then(|node| node.key())
                .is_some_and(|key| key == segment)
        })
    }
}
