//! Data model for the tree-widget engine.
//!
//! This module owns the hierarchical data a tree view displays:
//!
//! - [`TreeModel`] - arena of [`TreeNode`]s addressed by stable [`NodeId`]s
//! - [`CheckState`] - tri-state checked status with subtree propagation
//! - [`TreePath`] - declarative key-segment addressing
//! - [`TreeDefaults`] - default expanded/selected/checked path bundles
//! - [`SelectionModel`] - ordered, duplicate-free selection set

pub mod check;
pub mod defaults;
pub mod node;
pub mod path;
pub mod selection;

pub use check::CheckState;
pub use defaults::TreeDefaults;
pub use node::{NodeId, NodeState, TreeModel, TreeNode};
pub use path::TreePath;
pub use selection::SelectionModel;
