//! Interactive behavior for the tree widget.
//!
//! The widget layer turns pointer input into tree mutations:
//!
//! - [`layout`] - the collaborator traits the host framework implements
//!   (realization, visual bounds, drag previews) plus a uniform-row reference
//!   layout
//! - [`hit_test`] - pointer position to node resolution
//! - [`drop_zone`] - insert-before/into/after resolution with cycle rejection
//! - [`drag_session`] - the pointer-down/move/up drag state machine
//! - [`tree_view`] - the [`TreeView`] controller tying everything together

pub mod drag_session;
pub mod drop_zone;
pub mod layout;
pub mod tree_view;

pub use drag_session::{
    DRAG_START_THRESHOLD, DragPreview, DragSession, NullPreviewFactory, PreviewFactory,
};
pub use drop_zone::{DROP_INTO_BAND, DropIndicator, DropTargetInfo, DropZone};
pub use hit_test::HitTestMode;
pub use layout::{LayoutHost, Realizer, UniformRowLayout, VisualBounds};
pub use tree_view::{CheckedItemsDelta, NodeMoved, TreeView};
