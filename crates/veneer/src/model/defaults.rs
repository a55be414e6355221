//! Declarative default-state bundles.
//!
//! A [`TreeDefaults`] carries the paths a host wants expanded, selected, or
//! checked when a tree is first attached. Defaults are frequently written
//! against data that is loaded dynamically, so stale paths are expected and
//! resolution failures are silent (see
//! [`TreeView::apply_defaults`](crate::widget::TreeView::apply_defaults)).
//!
//! The bundle is serde-serializable so hosts can keep it in configuration
//! files:
//!
//! ```
//! let defaults: veneer::model::TreeDefaults = serde_json::from_str(
//!     r#"{ "expanded": [["docs"]], "checked": [["docs", "reports"]] }"#,
//! ).unwrap();
//! assert_eq!(defaults.checked.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::path::TreePath;

/// Default expanded/selected/checked paths applied when a tree attaches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefaults {
    /// Paths whose terminal node starts expanded.
    #[serde(default)]
    pub expanded: Vec<TreePath>,
    /// Paths whose terminal node joins the initial selection.
    #[serde(default)]
    pub selected: Vec<TreePath>,
    /// Paths whose terminal subtree starts checked.
    #[serde(default)]
    pub checked: Vec<TreePath>,
}

impl TreeDefaults {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a default-expanded path.
    pub fn expand(mut self, path: impl Into<TreePath>) -> Self {
        self.expanded.push(path.into());
        self
    }

    /// Adds a default-selected path.
    pub fn select(mut self, path: impl Into<TreePath>) -> Self {
        self.selected.push(path.into());
        self
    }

    /// Adds a default-checked path.
    pub fn check(mut self, path: impl Into<TreePath>) -> Self {
        self.checked.push(path.into());
        self
    }

    /// Returns whether the bundle carries no paths at all.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty() && self.selected.is_empty() && self.checked.is_empty()
    }
}
