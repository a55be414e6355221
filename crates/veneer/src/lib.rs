//! Veneer - a themeable control behavior layer for retained-mode UI
//! frameworks.
//!
//! Veneer supplies the interaction semantics of pre-styled controls; the host
//! framework keeps ownership of templating, rendering, and raw input
//! dispatch. This crate delivers the tree-widget engine: hierarchical item
//! containment, tri-state checked-status propagation, expand/collapse state,
//! and pointer-driven drag-and-drop reparenting.
//!
//! # Architecture
//!
//! - [`model`] owns the data: [`model::TreeModel`] is an arena of
//!   [`model::TreeNode`]s addressed by stable [`model::NodeId`]s, with
//!   per-node state flags, check-state propagation, and declarative path
//!   addressing.
//! - [`widget`] owns the behavior: hit testing, drop-zone resolution, the
//!   drag state machine, and the [`widget::TreeView`] controller that ties
//!   them together.
//! - The host plugs in through the collaborator traits in
//!   [`widget::layout`]: realization, visual bounds, and drag-preview
//!   construction.
//!
//! # Example
//!
//! ```
//! use veneer::model::{TreeModel, TreeNode};
//! use veneer::widget::TreeView;
//!
//! let mut model = TreeModel::new();
//! let root = model.add_root(TreeNode::new("Documents").with_key("docs"));
//! model.add_child(root, TreeNode::new("Reports").with_key("reports")).unwrap();
//!
//! let mut view = TreeView::new(model).with_checkable(true);
//! view.node_checked.connect(|&(node, state)| {
//!     println!("{:?} -> {:?}", node, state);
//! });
//! view.expand_all();
//! ```

pub mod error;
pub mod geometry;
pub mod model;
pub mod prelude;
pub mod widget;

pub use error::{Error, Result};
pub use veneer_core::{ConnectionId, Signal};
