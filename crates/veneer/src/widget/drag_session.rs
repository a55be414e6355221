//! The pointer-driven drag state machine.
//!
//! A session moves through `Idle -> Pressed -> Dragging -> (Dropped |
//! Cancelled) -> Idle`. The states are an enum, not flags, so illegal
//! combinations cannot be represented: a pointer-down while a drag is active
//! is ignored by construction, and at most one drag exists per tree view.
//!
//! A press only records the press point. The visual drag starts once the
//! pointer has moved a manhattan distance of [`DRAG_START_THRESHOLD`] from
//! it; the dragged node is the one whose own row contained the press point.
//! Every subsequent move repositions the floating preview, recomputes the
//! hover node and the drop decision, and fully replaces the previous
//! hover/drop state before returning.
//!
//! Release hands a valid decision to the controller; losing pointer capture
//! cancels with no mutation. Either way all transient state (the `dragging`
//! and `drag_over` flags, the preview, the decision) is cleared.

use crate::geometry::Point;
use crate::model::{NodeId, TreeModel};

use super::drop_zone::{self, DropIndicator, DropResolution, DropTargetInfo};
use super::hit_test::{self, HitTestMode};
use super::layout::VisualBounds;

/// Manhattan distance the pointer must travel from the press point before a
/// drag starts, in device-independent units.
pub const DRAG_START_THRESHOLD: f32 = 3.0;

/// A floating preview visual built by the host.
///
/// The engine only positions it; dropping the handle removes the visual.
pub trait DragPreview {
    /// Moves the preview to the given view-coordinate offset.
    fn set_offset(&mut self, x: f32, y: f32);
}

/// Builds floating preview visuals for dragged nodes.
pub trait PreviewFactory {
    /// Creates the preview shown under the pointer while `node` is dragged.
    fn build_preview(&mut self, model: &TreeModel, node: NodeId) -> Box<dyn DragPreview>;
}

/// A preview factory for hosts that render their own drag feedback.
pub struct NullPreviewFactory;

struct NullPreview;

impl DragPreview for NullPreview {
    fn set_offset(&mut self, _x: f32, _y: f32) {}
}

impl PreviewFactory for NullPreviewFactory {
    fn build_preview(&mut self, _model: &TreeModel, _node: NodeId) -> Box<dyn DragPreview> {
        Box::new(NullPreview)
    }
}

/// A completed, valid drop handed to the controller for mutation.
#[derive(Debug, Clone, Copy)]
pub struct CompletedDrop {
    /// The node that was dragged.
    pub node: NodeId,
    /// Where it lands.
    pub target: DropTargetInfo,
}

struct ActiveDrag {
    dragged: NodeId,
    origin: Point,
    preview: Box<dyn DragPreview>,
    hover: Option<NodeId>,
    resolution: Option<DropResolution>,
}

enum DragPhase {
    Idle,
    Pressed { origin: Point },
    Dragging(ActiveDrag),
}

/// Drag lifecycle controller for one tree view.
pub struct DragSession {
    phase: DragPhase,
    indicator_line_width: f32,
}

impl DragSession {
    /// Creates an idle session.
    pub fn new(indicator_line_width: f32) -> Self {
        Self {
            phase: DragPhase::Idle,
            indicator_line_width,
        }
    }

    /// Returns whether a visual drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// The node being dragged, if any.
    pub fn dragged_node(&self) -> Option<NodeId> {
        match &self.phase {
            DragPhase::Dragging(active) => Some(active.dragged),
            _ => None,
        }
    }

    /// The node currently hovered during the drag.
    pub fn hover_node(&self) -> Option<NodeId> {
        match &self.phase {
            DragPhase::Dragging(active) => active.hover,
            _ => None,
        }
    }

    /// The indicator line for the current drop decision, if one is valid.
    pub fn drop_indicator(&self) -> Option<DropIndicator> {
        match &self.phase {
            DragPhase::Dragging(active) => active.resolution.and_then(|r| r.indicator),
            _ => None,
        }
    }

    /// The current drop decision.
    pub fn current_drop(&self) -> Option<DropTargetInfo> {
        match &self.phase {
            DragPhase::Dragging(active) => active.resolution.map(|r| r.target),
            _ => None,
        }
    }

    /// Records a pointer press. Ignored unless the session is idle.
    pub fn on_pointer_pressed(&mut self, point: Point) {
        match self.phase {
            DragPhase::Idle => {
                self.phase = DragPhase::Pressed { origin: point };
            }
            _ => {
                tracing::trace!(
                    target: "veneer::tree::drag",
                    "pointer press ignored, session not idle"
                );
            }
        }
    }

    /// Processes a pointer move: starts the drag past the threshold, then
    /// tracks hover and the drop decision.
    pub fn on_pointer_moved(
        &mut self,
        model: &mut TreeModel,
        bounds: &dyn VisualBounds,
        previews: &mut dyn PreviewFactory,
        point: Point,
    ) {
        let pressed_origin = match &self.phase {
            DragPhase::Pressed { origin } => Some(*origin),
            _ => None,
        };
        if let Some(origin) = pressed_origin {
            if point.manhattan_distance(origin) <= DRAG_START_THRESHOLD {
                return;
            }
            let Some(dragged) =
                hit_test::node_at_point(model, bounds, origin, HitTestMode::SelfFirst)
            else {
                // Nothing draggable under the press point; the gesture is
                // spent.
                self.phase = DragPhase::Idle;
                return;
            };
            if let Some(node) = model.node_mut(dragged) {
                node.state_mut().dragging = true;
            }
            let preview = previews.build_preview(model, dragged);
            tracing::debug!(target: "veneer::tree::drag", ?dragged, "drag started");
            self.phase = DragPhase::Dragging(ActiveDrag {
                dragged,
                origin,
                preview,
                hover: None,
                resolution: None,
            });
        }

        let DragPhase::Dragging(active) = &mut self.phase else {
            return;
        };

        if let Some(base) = bounds.item_bounds(active.dragged) {
            active.preview.set_offset(
                base.left() + (point.x - active.origin.x),
                base.top() + (point.y - active.origin.y),
            );
        }

        let new_hover = hit_test::node_at_point(model, bounds, point, HitTestMode::ChildFirst);
        if active.hover != new_hover {
            if let Some(old) = active.hover {
                if let Some(node) = model.node_mut(old) {
                    node.state_mut().drag_over = false;
                }
            }
            if let Some(new) = new_hover {
                if let Some(node) = model.node_mut(new) {
                    node.state_mut().drag_over = true;
                }
            }
            active.hover = new_hover;
        }

        let offset_probe = if new_hover.is_some() {
            hit_test::node_at_offset_y(model, bounds, point)
        } else {
            None
        };

        active.resolution = drop_zone::resolve(
            model,
            bounds,
            active.dragged,
            new_hover,
            offset_probe,
            point,
            self.indicator_line_width,
        );
    }

    /// Completes the gesture on pointer release.
    ///
    /// Returns the drop for the controller to apply when the last computed
    /// decision is valid; otherwise the release is a no-op mutation. All
    /// transient drag state is cleared either way.
    pub fn on_pointer_released(&mut self, model: &mut TreeModel) -> Option<CompletedDrop> {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Dragging(active) => {
                let completed = active
                    .resolution
                    .filter(|resolution| resolution.target.is_valid)
                    .map(|resolution| CompletedDrop {
                        node: active.dragged,
                        target: resolution.target,
                    });
                Self::clear_transient_state(model, &active);
                tracing::debug!(
                    target: "veneer::tree::drag",
                    dropped = completed.is_some(),
                    "drag completed"
                );
                completed
            }
            _ => None,
        }
    }

    /// Cancels the gesture on pointer-capture loss. Never mutates the tree.
    pub fn on_capture_lost(&mut self, model: &mut TreeModel) {
        if let DragPhase::Dragging(active) = std::mem::replace(&mut self.phase, DragPhase::Idle) {
            Self::clear_transient_state(model, &active);
            tracing::debug!(target: "veneer::tree::drag", "drag cancelled");
        }
    }

    fn clear_transient_state(model: &mut TreeModel, active: &ActiveDrag) {
        if let Some(node) = model.node_mut(active.dragged) {
            node.state_mut().dragging = false;
        }
        if let Some(hover) = active.hover {
            if let Some(node) = model.node_mut(hover) {
                node.state_mut().drag_over = false;
            }
        }
        // The preview handle is dropped with the ActiveDrag, removing the
        // floating visual.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeNode;
    use crate::widget::layout::{Realizer, UniformRowLayout};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingPreviewState {
        built: usize,
        dropped: usize,
        last_offset: Option<(f32, f32)>,
    }

    struct RecordingPreview(Rc<RefCell<RecordingPreviewState>>);

    impl DragPreview for RecordingPreview {
        fn set_offset(&mut self, x: f32, y: f32) {
            self.0.borrow_mut().last_offset = Some((x, y));
        }
    }

    impl Drop for RecordingPreview {
        fn drop(&mut self) {
            self.0.borrow_mut().dropped += 1;
        }
    }

    struct RecordingFactory(Rc<RefCell<RecordingPreviewState>>);

    impl PreviewFactory for RecordingFactory {
        fn build_preview(&mut self, _model: &TreeModel, _node: NodeId) -> Box<dyn DragPreview> {
            self.0.borrow_mut().built += 1;
            Box::new(RecordingPreview(self.0.clone()))
        }
    }

    // Rows are 24 high: A row 0, B row 1, C row 2, D row 3, E row 4.
    fn scene() -> (TreeModel, UniformRowLayout, [NodeId; 5]) {
        let mut model = TreeModel::new();
        let a = model.add_root(TreeNode::new("A").with_expanded(true));
        let b = model.add_child(a, TreeNode::new("B")).unwrap();
        let c = model
            .add_child(a, TreeNode::new("C").with_expanded(true))
            .unwrap();
        let d = model.add_child(c, TreeNode::new("D")).unwrap();
        let e = model.add_child(c, TreeNode::new("E")).unwrap();

        let mut layout = UniformRowLayout::new().with_viewport(400.0, 300.0);
        layout.ensure_realized(&model, None);
        (model, layout, [a, b, c, d, e])
    }

    #[test]
    fn test_press_and_tiny_move_does_not_start_drag() {
        let (mut model, layout, _) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(61.0, 37.0));

        assert!(!session.is_dragging());
    }

    #[test]
    fn test_threshold_crossing_starts_drag_from_press_point() {
        let (mut model, layout, [_a, b, ..]) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 44.0));

        assert!(session.is_dragging());
        assert_eq!(session.dragged_node(), Some(b));
        assert!(model.node(b).unwrap().state().dragging);
    }

    #[test]
    fn test_press_over_toggle_area_spends_gesture() {
        let (mut model, layout, _) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        // x 30 is inside B's toggle area, outside every header.
        session.on_pointer_pressed(Point::new(30.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(30.0, 44.0));

        assert!(!session.is_dragging());
        // The gesture is spent; further moves stay idle.
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 60.0));
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_press_while_dragging_is_ignored() {
        let (mut model, layout, [_a, b, ..]) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 44.0));
        assert!(session.is_dragging());

        session.on_pointer_pressed(Point::new(60.0, 60.0));
        assert_eq!(session.dragged_node(), Some(b));
    }

    #[test]
    fn test_hover_flags_follow_pointer() {
        let (mut model, layout, [_a, _b, c, d, _e]) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 80.0));
        assert_eq!(session.hover_node(), Some(d));
        assert!(model.node(d).unwrap().state().drag_over);

        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(40.0, 60.0));
        assert_eq!(session.hover_node(), Some(c));
        assert!(!model.node(d).unwrap().state().drag_over);
        assert!(model.node(c).unwrap().state().drag_over);
    }

    #[test]
    fn test_preview_lifecycle() {
        let (mut model, layout, _) = scene();
        let state = Rc::new(RefCell::new(RecordingPreviewState::default()));
        let mut previews = RecordingFactory(state.clone());
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(65.0, 44.0));
        assert_eq!(state.borrow().built, 1);
        // B's item origin is (20, 24); the pointer moved (+5, +8).
        assert_eq!(state.borrow().last_offset, Some((25.0, 32.0)));

        session.on_pointer_released(&mut model);
        assert_eq!(state.borrow().dropped, 1);
    }

    #[test]
    fn test_release_returns_valid_drop_and_clears_state() {
        let (mut model, layout, [_a, b, c, ..]) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 60.0));
        assert!(session.current_drop().is_some());
        assert!(session.drop_indicator().is_some());

        let completed = session.on_pointer_released(&mut model).unwrap();
        assert_eq!(completed.node, b);
        assert_eq!(completed.target.target_parent, Some(c));

        assert!(!session.is_dragging());
        assert!(!model.node(b).unwrap().state().dragging);
        assert!(!model.node(c).unwrap().state().drag_over);
    }

    #[test]
    fn test_release_without_target_is_noop() {
        let (mut model, layout, _) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        // Move to empty space below the rows.
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 200.0));

        assert!(session.on_pointer_released(&mut model).is_none());
    }

    #[test]
    fn test_capture_lost_cancels_without_drop() {
        let (mut model, layout, [_a, b, _c, d, _e]) = scene();
        let mut previews = NullPreviewFactory;
        let mut session = DragSession::new(2.0);

        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 80.0));
        assert!(session.current_drop().is_some());

        session.on_capture_lost(&mut model);
        assert!(!session.is_dragging());
        assert!(!model.node(b).unwrap().state().dragging);
        assert!(!model.node(d).unwrap().state().drag_over);
        // A new gesture can start afterwards.
        session.on_pointer_pressed(Point::new(60.0, 36.0));
        session.on_pointer_moved(&mut model, &layout, &mut previews, Point::new(60.0, 44.0));
        assert!(session.is_dragging());
    }
}
