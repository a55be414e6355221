//! Drop-zone resolution for drag-and-drop reparenting.
//!
//! Given the node under the pointer, the pointer's vertical position decides
//! one of three zones relative to that node's row: insert-before, insert-into
//! (the midpoint band), or insert-after. The resolved [`DropTargetInfo`]
//! carries the target parent and insert index the controller will mutate
//! with, plus validity: a drop whose target parent is the dragged node or one
//! of its descendants is rejected here, before any mutation.

use crate::geometry::Point;
use crate::model::{NodeId, TreeModel};

use super::layout::VisualBounds;

/// Half-height of the row midpoint band that resolves to insert-into, in
/// device-independent units.
pub const DROP_INTO_BAND: f32 = 3.0;

/// Left inset of the indicator line when the zone is insert-into, marking the
/// line as a child-level insertion.
pub const DROP_INTO_INDICATOR_INSET: f32 = 25.0;

/// The zone a pointer position resolves to, relative to the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// Insert as the target's previous sibling.
    Before,
    /// Append as the target's last child.
    Into,
    /// Insert as the target's next sibling.
    After,
}

/// Where a completed drop would mutate the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTargetInfo {
    /// The list receiving the dragged node; `None` is the root list.
    pub target_parent: Option<NodeId>,
    /// Insert position within the target list, already corrected for the
    /// dragged node's pending removal from the same list.
    pub insert_index: usize,
    /// The zone the pointer resolved to.
    pub zone: DropZone,
    /// False when the drop would reparent the dragged node into its own
    /// subtree. Invalid drops never mutate and render no indicator.
    pub is_valid: bool,
}

/// Endpoints of the indicator line, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropIndicator {
    pub start: Point,
    pub end: Point,
}

/// A resolved drop decision plus its visual indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropResolution {
    pub target: DropTargetInfo,
    /// `None` when the decision is invalid.
    pub indicator: Option<DropIndicator>,
}

/// Resolves the drop decision for the current pointer position.
///
/// `hover` is the node from the child-first hit test; `offset_probe` refines
/// it vertically against sibling rows. Returns `None` when there is no
/// usable hover target at all (pointer over the dragged row itself or over
/// empty space).
pub fn resolve(
    model: &TreeModel,
    bounds: &dyn VisualBounds,
    dragged: NodeId,
    hover: Option<NodeId>,
    offset_probe: Option<NodeId>,
    pointer: Point,
    line_width: f32,
) -> Option<DropResolution> {
    let hover = hover?;
    if hover == dragged || offset_probe == Some(dragged) {
        return None;
    }

    let effective = offset_probe.unwrap_or(hover);
    let header = bounds.header_bounds(effective)?;
    let mid = header.center().y;

    let zone = if pointer.y < mid - DROP_INTO_BAND {
        DropZone::Before
    } else if pointer.y > mid + DROP_INTO_BAND {
        DropZone::After
    } else {
        DropZone::Into
    };

    let (target_parent, mut insert_index) = match zone {
        DropZone::Before => (model.parent_of(effective), model.index_in_parent(effective)?),
        DropZone::After => (
            model.parent_of(effective),
            model.index_in_parent(effective)? + 1,
        ),
        DropZone::Into => (Some(effective), model.children_of(effective).len()),
    };

    // Compensate for the dragged node's pending removal from the same list.
    if model.parent_of(dragged) == target_parent {
        if let Some(current) = model.index_in_parent(dragged) {
            if current < insert_index {
                insert_index -= 1;
            }
        }
    }

    let is_valid = target_parent != Some(dragged)
        && !target_parent.is_some_and(|parent| model.is_ancestor_of(dragged, parent));

    let target = DropTargetInfo {
        target_parent,
        insert_index,
        zone,
        is_valid,
    };

    let indicator = is_valid.then(|| indicator_for(bounds, &header, zone, line_width));

    tracing::trace!(
        target: "veneer::tree::drag",
        ?dragged,
        ?effective,
        ?zone,
        is_valid,
        insert_index,
        "drop zone resolved"
    );

    Some(DropResolution { target, indicator })
}

fn indicator_for(
    bounds: &dyn VisualBounds,
    header: &crate::geometry::Rect,
    zone: DropZone,
    line_width: f32,
) -> DropIndicator {
    let half = line_width / 2.0;
    let min_y = half;
    let max_y = bounds.view_bounds().height() - half;

    let (left, raw_y) = match zone {
        DropZone::Before => (header.left(), header.top() - half),
        DropZone::After => (header.left(), header.bottom() + half),
        DropZone::Into => (
            header.left() + DROP_INTO_INDICATOR_INSET,
            header.bottom() + half,
        ),
    };
    let y = raw_y.clamp(min_y, max_y);

    DropIndicator {
        start: Point::new(left, y),
        end: Point::new(header.right(), y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeNode;
    use crate::widget::layout::{Realizer, UniformRowLayout};

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
    fn test_above_midpoint_band_is_before() {
        let (model, layout, [a, b, c, ..]) = scene();
        // C's row spans 48..72, midpoint 60; y 50 is above the band.
        let resolution = resolve(
            &model,
            &layout,
            b,
            Some(c),
            Some(c),
            Point::new(60.0, 50.0),
            2.0,
        )
        .unwrap();

        assert_eq!(resolution.target.zone, DropZone::Before);
        assert_eq!(resolution.target.target_parent, Some(a));
        // C sits at index 1, but B's pending removal from index 0 shifts the
        // insert position down to 0.
        assert_eq!(resolution.target.insert_index, 0);
        assert!(resolution.target.is_valid);
    }

    #[test]
    fn test_midpoint_band_is_into() {
        let (model, layout, [_a, b, c, ..]) = scene();
        let resolution = resolve(
            &model,
            &layout,
            b,
            Some(c),
            Some(c),
            Point::new(60.0, 60.0),
            2.0,
        )
        .unwrap();

        assert_eq!(resolution.target.zone, DropZone::Into);
        assert_eq!(resolution.target.target_parent, Some(c));
        assert_eq!(resolution.target.insert_index, 2);
        assert!(resolution.target.is_valid);
    }

    #[test]
    fn test_below_midpoint_band_is_after() {
        let (model, layout, [a, b, c, ..]) = scene();
        let resolution = resolve(
            &model,
            &layout,
            b,
            Some(c),
            Some(c),
            Point::new(60.0, 70.0),
            2.0,
        )
        .unwrap();

        assert_eq!(resolution.target.zone, DropZone::After);
        assert_eq!(resolution.target.target_parent, Some(a));
        // B's index (0) is below the raw insert index (2), so the pending
        // removal shifts it down to 1.
        assert_eq!(resolution.target.insert_index, 1);
    }

    #[test]
    fn test_insert_after_self_position_is_noop_index() {
        let (model, layout, [_a, b, c, ..]) = scene();
        // Dropping B just before its next sibling resolves to B's own index:
        // remove-then-insert leaves the order unchanged.
        let resolution = resolve(
            &model,
            &layout,
            b,
            Some(c),
            Some(c),
            Point::new(60.0, 50.0),
            2.0,
        )
        .unwrap();

        assert_eq!(resolution.target.zone, DropZone::Before);
        assert_eq!(resolution.target.insert_index, 0);

        let mut model = model;
        model
            .move_node(b, resolution.target.target_parent, resolution.target.insert_index)
            .unwrap();
        let a = model.roots()[0];
        assert_eq!(model.children_of(a)[0], b);
    }

    #[test]
    fn test_moving_up_within_parent_keeps_raw_index() {
        let (model, layout, [_a, _b, c, d, e]) = scene();
        // Drag E (index 1 under C) above D (index 0): no correction applies
        // because E's index is not below the insert index.
        let resolution = resolve(
            &model,
            &layout,
            e,
            Some(d),
            Some(d),
            Point::new(60.0, 74.0),
            2.0,
        )
        .unwrap();

        assert_eq!(resolution.target.zone, DropZone::Before);
        assert_eq!(resolution.target.target_parent, Some(c));
        assert_eq!(resolution.target.insert_index, 0);
    }

    #[test]
    fn test_drop_into_descendant_is_invalid() {
        let (model, layout, [_a, _b, c, d, _e]) = scene();
        // Dragging C over its own child D: every zone is a cycle.
        for y in [74.0, 84.0, 94.0] {
            let resolution = resolve(
                &model,
                &layout,
                c,
                Some(d),
                Some(d),
                Point::new(60.0, y),
                2.0,
            )
            .unwrap();
            assert!(!resolution.target.is_valid, "y = {y}");
            assert!(resolution.indicator.is_none(), "y = {y}");
        }
    }

    #[test]
    fn test_hover_over_dragged_node_yields_nothing() {
        let (model, layout, [_a, b, ..]) = scene();
        assert!(
            resolve(&model, &layout, b, Some(b), None, Point::new(60.0, 36.0), 2.0).is_none()
        );
        assert!(resolve(&model, &layout, b, None, None, Point::new(60.0, 36.0), 2.0).is_none());
    }

    #[test]
    fn test_root_level_drop_targets_root_list() {
        let mut model = TreeModel::new();
        let a = model.add_root(TreeNode::new("A"));
        let b = model.add_root(TreeNode::new("B"));
        let mut layout = UniformRowLayout::new().with_viewport(400.0, 300.0);
        layout.ensure_realized(&model, None);

        // Drop B below A's row (A spans 0..24; y 20 is past the band).
        let resolution = resolve(
            &model,
            &layout,
            b,
            Some(a),
            Some(a),
            Point::new(60.0, 20.0),
            2.0,
        )
        .unwrap();

        assert_eq!(resolution.target.zone, DropZone::After);
        assert_eq!(resolution.target.target_parent, None);
        assert_eq!(resolution.target.insert_index, 1);
        assert!(resolution.target.is_valid);
    }

    #[test]
    fn test_indicator_geometry_and_clamping() {
        let (model, layout, [_a, b, c, ..]) = scene();

        // Before-zone line sits just above C's row top (48), spanning C's
        // header width.
        let before = resolve(&model, &layout, b, Some(c), Some(c), Point::new(60.0, 50.0), 2.0)
            .unwrap()
            .indicator
            .unwrap();
        assert_eq!(before.start.y, 47.0);
        assert_eq!(before.start.x, 36.0);
        assert_eq!(before.end.x, 400.0);

        // Into-zone line is inset on the left to signal child-level insert.
        let into = resolve(&model, &layout, b, Some(c), Some(c), Point::new(60.0, 60.0), 2.0)
            .unwrap()
            .indicator
            .unwrap();
        assert_eq!(into.start.x, 36.0 + DROP_INTO_INDICATOR_INSET);
        assert_eq!(into.start.y, 73.0);

        // A line that would land above the view clamps to half the width.
        let mut model = model;
        let roots: Vec<_> = model.roots().to_vec();
        let first = roots[0];
        let second = model.add_root(TreeNode::new("F"));
        let mut layout = UniformRowLayout::new().with_viewport(400.0, 300.0);
        layout.ensure_realized(&model, None);
        let clamped = resolve(
            &model,
            &layout,
            second,
            Some(first),
            Some(first),
            Point::new(60.0, 2.0),
            8.0,
        )
        .unwrap()
        .indicator
        .unwrap();
        assert_eq!(clamped.start.y, 4.0);
    }
}
