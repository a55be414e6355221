//! Layout collaborators and a uniform-row reference implementation.
//!
//! The tree engine never lays out or paints anything itself; the host
//! framework owns templating and rendering. What the engine needs from the
//! host is captured by two small traits:
//!
//! - [`Realizer`] forces a layout pass so that a container's children have
//!   valid, queryable bounds before hit testing or state propagation touches
//!   them.
//! - [`VisualBounds`] reports the realized bounds of visible nodes, in tree
//!   view coordinates.
//!
//! [`UniformRowLayout`] implements both for the common case of fixed-height
//! rows, and doubles as the reference implementation the engine is tested
//! against.

use slotmap::SecondaryMap;

use crate::geometry::{Rect, Size};
use crate::model::{NodeId, TreeModel};

/// Forces layout so a container's children become queryable.
pub trait Realizer {
    /// Runs a layout pass for `container` (or the whole tree when `None`).
    ///
    /// After this returns, children of the container that are visible (all
    /// ancestors expanded) must yield bounds from the paired
    /// [`VisualBounds`].
    fn ensure_realized(&mut self, model: &TreeModel, container: Option<NodeId>);
}

/// Reports realized node bounds in tree view coordinates.
///
/// Only currently-visible nodes (every ancestor expanded, realized into a
/// container) yield bounds; everything else is `None`.
pub trait VisualBounds {
    /// Bounds of the node's own row, excluding the expand/collapse
    /// affordance. This is the region a drag can originate from, so the
    /// affordance stays clickable without starting a drag.
    fn header_bounds(&self, node: NodeId) -> Option<Rect>;

    /// Bounds of the node's row plus its realized children, excluding the
    /// affordance. Used to find the hover node during a drag.
    fn subtree_bounds(&self, node: NodeId) -> Option<Rect>;

    /// Full container bounds of the node and its realized children,
    /// affordance included. Used by the vertical-offset drop refinement.
    fn item_bounds(&self, node: NodeId) -> Option<Rect>;

    /// The tree view's own bounds, origin at (0, 0).
    fn view_bounds(&self) -> Rect;
}

/// Both collaborator roles in one object, which is how most hosts implement
/// them.
pub trait LayoutHost: Realizer + VisualBounds {}

impl<T: Realizer + VisualBounds> LayoutHost for T {}

#[derive(Debug, Clone, Copy)]
struct Row {
    node: NodeId,
    depth: usize,
}

/// Fixed-row-height layout over the visible (expanded) portion of a tree.
///
/// Maintains a flattened row cache in display order, rebuilt on every
/// [`Realizer::ensure_realized`] call. Bounds are reported in view
/// coordinates, offset by the current vertical scroll position.
///
/// # Example
///
/// ```
/// use veneer::model::{TreeModel, TreeNode};
/// use veneer::widget::layout::{Realizer, UniformRowLayout, VisualBounds};
///
/// let mut model = TreeModel::new();
/// let root = model.add_root(TreeNode::new("Root").with_expanded(true));
/// model.add_child(root, TreeNode::new("Child")).unwrap();
///
/// let mut layout = UniformRowLayout::new().with_viewport(400.0, 300.0);
/// layout.ensure_realized(&model, None);
/// assert_eq!(layout.row_count(), 2);
/// assert!(layout.header_bounds(root).is_some());
/// ```
#[derive(Debug)]
pub struct UniformRowLayout {
    row_height: f32,
    indent_width: f32,
    toggle_width: f32,
    viewport: Size,
    scroll_y: f32,
    rows: Vec<Row>,
    row_index: SecondaryMap<NodeId, usize>,
    subtree_rows: SecondaryMap<NodeId, usize>,
}

impl Default for UniformRowLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformRowLayout {
    /// Creates a layout with default metrics and an empty viewport.
    pub fn new() -> Self {
        Self {
            row_height: 24.0,
            indent_width: 20.0,
            toggle_width: 16.0,
            viewport: Size::ZERO,
            scroll_y: 0.0,
            rows: Vec::new(),
            row_index: SecondaryMap::new(),
            subtree_rows: SecondaryMap::new(),
        }
    }

    /// Sets the row height.
    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the indentation per depth level.
    pub fn with_indent_width(mut self, indent_width: f32) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Sets the width reserved for the expand/collapse affordance.
    pub fn with_toggle_width(mut self, toggle_width: f32) -> Self {
        self.toggle_width = toggle_width;
        self
    }

    /// Sets the viewport size.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Size::new(width, height);
        self
    }

    /// Updates the viewport size.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
    }

    /// Current vertical scroll offset.
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Sets the vertical scroll offset.
    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
    }

    /// Number of realized (visible) rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The node realized at a given row.
    pub fn node_at_row(&self, row: usize) -> Option<NodeId> {
        self.rows.get(row).map(|r| r.node)
    }

    /// The row a node is realized at, if visible.
    pub fn row_of(&self, node: NodeId) -> Option<usize> {
        self.row_index.get(node).copied()
    }

    fn rebuild(&mut self, model: &TreeModel) {
        self.rows.clear();
        self.row_index.clear();
        self.subtree_rows.clear();
        for &root in model.roots() {
            self.push_subtree(model, root, 0);
        }
        tracing::trace!(
            target: "veneer::tree",
            rows = self.rows.len(),
            "uniform row layout rebuilt"
        );
    }

    fn push_subtree(&mut self, model: &TreeModel, node: NodeId, depth: usize) {
        let start = self.rows.len();
        self.row_index.insert(node, start);
        self.rows.push(Row { node, depth });

        if model.node(node).is_some_and(|n| n.is_expanded()) {
            let children = model.children_of(node).to_vec();
            for child in children {
                self.push_subtree(model, child, depth + 1);
            }
        }

        self.subtree_rows.insert(node, self.rows.len() - start);
    }

    fn row_top(&self, row: usize) -> f32 {
        row as f32 * self.row_height - self.scroll_y
    }
}

impl Realizer for UniformRowLayout {
    fn ensure_realized(&mut self, model: &TreeModel, _container: Option<NodeId>) {
        // Uniform rows are cheap enough to relayout wholesale.
        self.rebuild(model);
    }
}

impl VisualBounds for UniformRowLayout {
    fn header_bounds(&self, node: NodeId) -> Option<Rect> {
        let row = self.row_of(node)?;
        let depth = self.rows[row].depth;
        let x = depth as f32 * self.indent_width + self.toggle_width;
        Some(Rect::new(
            x,
            self.row_top(row),
            (self.viewport.width - x).max(0.0),
            self.row_height,
        ))
    }

    fn subtree_bounds(&self, node: NodeId) -> Option<Rect> {
        let row = self.row_of(node)?;
        let depth = self.rows[row].depth;
        let span = self.subtree_rows.get(node).copied().unwrap_or(1);
        let x = depth as f32 * self.indent_width + self.toggle_width;
        Some(Rect::new(
            x,
            self.row_top(row),
            (self.viewport.width - x).max(0.0),
            span as f32 * self.row_height,
        ))
    }

    fn item_bounds(&self, node: NodeId) -> Option<Rect> {
        let row = self.row_of(node)?;
        let depth = self.rows[row].depth;
        let span = self.subtree_rows.get(node).copied().unwrap_or(1);
        let x = depth as f32 * self.indent_width;
        Some(Rect::new(
            x,
            self.row_top(row),
            (self.viewport.width - x).max(0.0),
            span as f32 * self.row_height,
        ))
    }

    fn view_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeNode;

    fn expanded_tree() -> (TreeModel, NodeId, NodeId, NodeId, NodeId) {
        let mut model = TreeModel::new();
        let a = model.add_root(TreeNode::new("A").with_expanded(true));
        let b = model.add_child(a, TreeNode::new("B")).unwrap();
        let c = model
            .add_child(a, TreeNode::new("C").with_expanded(true))
            .unwrap();
        let d = model.add_child(c, TreeNode::new("D")).unwrap();
        (model, a, b, c, d)
    }

    fn realized_layout(model: &TreeModel) -> UniformRowLayout {
        let mut layout = UniformRowLayout::new().with_viewport(400.0, 300.0);
        layout.ensure_realized(model, None);
        layout
    }

    #[test]
    fn test_flattens_expanded_rows_in_display_order() {
        let (model, a, b, c, d) = expanded_tree();
        let layout = realized_layout(&model);

        assert_eq!(layout.row_count(), 4);
        assert_eq!(layout.node_at_row(0), Some(a));
        assert_eq!(layout.node_at_row(1), Some(b));
        assert_eq!(layout.node_at_row(2), Some(c));
        assert_eq!(layout.node_at_row(3), Some(d));
    }

    #[test]
    fn test_collapsed_children_are_not_realized() {
        let (mut model, a, _b, c, d) = expanded_tree();
        model.node_mut(c).unwrap().state_mut().expanded = false;

        let layout = realized_layout(&model);
        assert_eq!(layout.row_count(), 3);
        assert_eq!(layout.row_of(d), None);
        assert!(layout.header_bounds(d).is_none());
        assert!(layout.row_of(a).is_some());
    }

    #[test]
    fn test_header_excludes_toggle_item_includes_it() {
        let (model, _a, b, _c, _d) = expanded_tree();
        let layout = realized_layout(&model);

        // B sits at depth 1: indent 20, toggle 16.
        let header = layout.header_bounds(b).unwrap();
        assert_eq!(header.left(), 36.0);
        assert_eq!(header.top(), 24.0);
        assert_eq!(header.height(), 24.0);

        let item = layout.item_bounds(b).unwrap();
        assert_eq!(item.left(), 20.0);
    }

    #[test]
    fn test_subtree_bounds_span_children() {
        let (model, a, _b, c, _d) = expanded_tree();
        let layout = realized_layout(&model);

        let a_subtree = layout.subtree_bounds(a).unwrap();
        assert_eq!(a_subtree.height(), 4.0 * 24.0);

        let c_subtree = layout.subtree_bounds(c).unwrap();
        assert_eq!(c_subtree.height(), 2.0 * 24.0);
    }

    #[test]
    fn test_scroll_shifts_bounds() {
        let (model, _a, b, _c, _d) = expanded_tree();
        let mut layout = realized_layout(&model);
        layout.set_scroll_y(10.0);

        assert_eq!(layout.header_bounds(b).unwrap().top(), 14.0);
    }
}
