//! Convenience re-exports for typical Veneer usage.
//!
//! ```
//! use veneer::prelude::*;
//!
//! let mut model = TreeModel::new();
//! let root = model.add_root(TreeNode::new("Root"));
//! let _view = TreeView::new(model);
//! let _ = root;
//! ```

pub use crate::geometry::{Point, Rect, Size};
pub use crate::model::{
    CheckState, NodeId, SelectionModel, TreeDefaults, TreeModel, TreeNode, TreePath,
};
pub use crate::widget::{
    DragPreview, DragSession, DropIndicator, DropTargetInfo, DropZone, HitTestMode, LayoutHost,
    PreviewFactory, Realizer, TreeView, UniformRowLayout, VisualBounds,
};
pub use veneer_core::{ConnectionId, Signal};
