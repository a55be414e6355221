//! The tree view controller.
//!
//! [`TreeView`] owns a [`TreeModel`] and orchestrates everything around it:
//! expand/collapse state (including batched expand-all/collapse-all),
//! default-state application by path, the observable checked-items
//! collection, selection, and the wiring between the drag session and the
//! tree mutation a completed drop performs.
//!
//! The host framework drives it with pointer callbacks and implements the
//! [`LayoutHost`] collaborator; the view reports back through its public
//! signals.
//!
//! # Example
//!
//! ```
//! use veneer::model::{TreeDefaults, TreeModel, TreeNode};
//! use veneer::widget::{TreeView, UniformRowLayout};
//!
//! let mut model = TreeModel::new();
//! let root = model.add_root(TreeNode::new("Root").with_key("root"));
//! model.add_child(root, TreeNode::new("Child").with_key("child")).unwrap();
//!
//! let mut layout = UniformRowLayout::new().with_viewport(400.0, 300.0);
//! let mut view = TreeView::new(model).with_checkable(true);
//! view.attached(
//!     &mut layout,
//!     &TreeDefaults::new().check(["root", "child"]),
//! );
//! assert_eq!(view.checked_items().len(), 2);
//! ```

use std::cell::Cell;

use veneer_core::Signal;

use crate::geometry::Point;
use crate::model::{CheckState, NodeId, SelectionModel, TreeDefaults, TreeModel, TreePath};

use super::drag_session::{CompletedDrop, DragSession, PreviewFactory};
use super::drop_zone::DropIndicator;
use super::layout::{LayoutHost, VisualBounds};

/// Default thickness of the drop indicator line.
pub const DEFAULT_DRAG_INDICATOR_WIDTH: f32 = 2.0;

/// Payload of [`TreeView::node_moved`].
#[derive(Debug, Clone)]
pub struct NodeMoved {
    /// The node that was reparented.
    pub node: NodeId,
    /// Its previous parent (`None` for the root list).
    pub old_parent: Option<NodeId>,
    /// Its new parent (`None` for the root list).
    pub new_parent: Option<NodeId>,
    /// Its index within the new sibling list.
    pub index: usize,
}

/// Payload of [`TreeView::checked_items_changed`]: the add/remove delta
/// applied to the observable checked-items collection.
#[derive(Debug, Clone)]
pub struct CheckedItemsDelta {
    /// Nodes that became fully checked.
    pub added: Vec<NodeId>,
    /// Nodes that are no longer fully checked.
    pub removed: Vec<NodeId>,
}

/// Restores the motion setting and unblocks the expand/collapse signals when
/// a batch traversal ends, unwinding included.
struct BatchGuard<'a> {
    expanded: &'a Signal<NodeId>,
    collapsed: &'a Signal<NodeId>,
    motion: &'a Cell<bool>,
    prior_motion: bool,
}

impl<'a> BatchGuard<'a> {
    fn new(
        expanded: &'a Signal<NodeId>,
        collapsed: &'a Signal<NodeId>,
        motion: &'a Cell<bool>,
    ) -> Self {
        let prior_motion = motion.get();
        motion.set(false);
        expanded.set_blocked(true);
        collapsed.set_blocked(true);
        Self {
            expanded,
            collapsed,
            motion,
            prior_motion,
        }
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.expanded.set_blocked(false);
        self.collapsed.set_blocked(false);
        self.motion.set(self.prior_motion);
    }
}

/// A tree view: the controller for one tree of nodes.
pub struct TreeView {
    model: TreeModel,
    selection: SelectionModel,
    session: DragSession,
    checked_items: Vec<NodeId>,
    applying_checked_items: bool,
    checkable: bool,
    draggable: bool,
    default_expand_all: bool,
    motion_enabled: Cell<bool>,
    indicator_line_width: f32,

    // Signals
    /// Emitted when a node is expanded.
    pub node_expanded: Signal<NodeId>,
    /// Emitted when a node is collapsed.
    pub node_collapsed: Signal<NodeId>,
    /// Emitted when a node's checked state changes, propagation included.
    pub node_checked: Signal<(NodeId, CheckState)>,
    /// Emitted when the selection set changes. Carries the new selection.
    pub selection_changed: Signal<Vec<NodeId>>,
    /// Emitted after a completed drop reparents a node.
    pub node_moved: Signal<NodeMoved>,
    /// Emitted with the add/remove delta whenever the checked-items
    /// collection changes. Suppressed while the collection itself is being
    /// applied programmatically.
    pub checked_items_changed: Signal<CheckedItemsDelta>,
}

impl TreeView {
    /// Creates a view over the given model.
    pub fn new(model: TreeModel) -> Self {
        Self {
            model,
            selection: SelectionModel::new(),
            session: DragSession::new(DEFAULT_DRAG_INDICATOR_WIDTH),
            checked_items: Vec::new(),
            applying_checked_items: false,
            checkable: false,
            draggable: false,
            default_expand_all: false,
            motion_enabled: Cell::new(true),
            indicator_line_width: DEFAULT_DRAG_INDICATOR_WIDTH,
            node_expanded: Signal::new(),
            node_collapsed: Signal::new(),
            node_checked: Signal::new(),
            selection_changed: Signal::new(),
            node_moved: Signal::new(),
            checked_items_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Enables check-state propagation on this view.
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }

    /// Enables drag-and-drop reparenting on this view.
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Expands every node when the view is attached.
    pub fn with_default_expand_all(mut self, expand_all: bool) -> Self {
        self.default_expand_all = expand_all;
        self
    }

    /// Sets the drop indicator line thickness.
    pub fn with_indicator_line_width(mut self, width: f32) -> Self {
        self.indicator_line_width = width;
        self.session = DragSession::new(width);
        self
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Whether check-state propagation is enabled.
    pub fn is_checkable(&self) -> bool {
        self.checkable
    }

    /// Sets whether check-state propagation is enabled.
    pub fn set_checkable(&mut self, checkable: bool) {
        self.checkable = checkable;
    }

    /// Whether drag-and-drop reparenting is enabled.
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Sets whether drag-and-drop reparenting is enabled.
    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    /// Whether expand/collapse transitions may animate. Batch operations
    /// disable this for their duration and restore the prior value.
    pub fn is_motion_enabled(&self) -> bool {
        self.motion_enabled.get()
    }

    /// Sets whether expand/collapse transitions may animate.
    pub fn set_motion_enabled(&self, enabled: bool) {
        self.motion_enabled.set(enabled);
    }

    // =========================================================================
    // Model access
    // =========================================================================

    /// The tree data.
    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    /// The tree data, mutably. Hosts must re-realize their layout after
    /// structural changes.
    pub fn model_mut(&mut self) -> &mut TreeModel {
        &mut self.model
    }

    /// The selection set.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// The observable checked-items collection, in check order.
    pub fn checked_items(&self) -> &[NodeId] {
        &self.checked_items
    }

    // =========================================================================
    // Expand/Collapse
    // =========================================================================

    /// Expands a node. No-op for leaves and already-expanded nodes.
    pub fn expand(&mut self, node: NodeId) {
        let Some(current) = self.model.node(node) else {
            return;
        };
        if current.is_leaf() || current.is_expanded() {
            return;
        }
        self.model.node_mut(node).unwrap().state_mut().expanded = true;
        self.node_expanded.emit(node);
    }

    /// Collapses a node. No-op when already collapsed.
    pub fn collapse(&mut self, node: NodeId) {
        let Some(current) = self.model.node(node) else {
            return;
        };
        if !current.is_expanded() {
            return;
        }
        self.model.node_mut(node).unwrap().state_mut().expanded = false;
        self.node_collapsed.emit(node);
    }

    /// Toggles a node's expanded state.
    pub fn toggle_expanded(&mut self, node: NodeId) {
        match self.model.node(node) {
            Some(current) if current.is_expanded() => self.collapse(node),
            Some(_) => self.expand(node),
            None => {}
        }
    }

    /// Expands every ancestor of a node so it becomes visible.
    pub fn expand_to(&mut self, node: NodeId) {
        let ancestors: Vec<NodeId> = self.model.ancestors(node).collect();
        for ancestor in ancestors {
            self.expand(ancestor);
        }
    }

    /// Expands every non-leaf node.
    ///
    /// Runs as a batch: per-node notifications are suppressed and the motion
    /// setting is disabled for the duration, restored even if the traversal
    /// unwinds.
    pub fn expand_all(&mut self) {
        let _batch = BatchGuard::new(
            &self.node_expanded,
            &self.node_collapsed,
            &self.motion_enabled,
        );
        let mut targets = Vec::new();
        for &root in self.model.roots() {
            self.model.visit_subtree(root, &mut |id| targets.push(id));
        }
        for id in targets {
            let Some(node) = self.model.node_mut(id) else {
                continue;
            };
            if node.is_leaf() || node.is_expanded() {
                continue;
            }
            node.state_mut().expanded = true;
            self.node_expanded.emit(id);
        }
    }

    /// Collapses every node, with the same batch behavior as
    /// [`expand_all`](Self::expand_all).
    pub fn collapse_all(&mut self) {
        let _batch = BatchGuard::new(
            &self.node_expanded,
            &self.node_collapsed,
            &self.motion_enabled,
        );
        let mut targets = Vec::new();
        for &root in self.model.roots() {
            self.model.visit_subtree(root, &mut |id| targets.push(id));
        }
        for id in targets {
            let Some(node) = self.model.node_mut(id) else {
                continue;
            };
            if !node.is_expanded() {
                continue;
            }
            node.state_mut().expanded = false;
            self.node_collapsed.emit(id);
        }
    }

    // =========================================================================
    // Checked state
    // =========================================================================

    /// Checks a node and its subtree, propagating tri-state status to its
    /// ancestors. No-op unless the view is checkable.
    pub fn check_subtree(&mut self, host: &mut dyn LayoutHost, node: NodeId) {
        if !self.checkable {
            return;
        }
        host.ensure_realized(&self.model, Some(node));
        let changed = self.model.check_subtree(node);
        self.apply_checked_deltas(&changed);
    }

    /// Unchecks a node and its subtree, propagating tri-state status to its
    /// ancestors. No-op unless the view is checkable.
    pub fn uncheck_subtree(&mut self, host: &mut dyn LayoutHost, node: NodeId) {
        if !self.checkable {
            return;
        }
        host.ensure_realized(&self.model, Some(node));
        let changed = self.model.uncheck_subtree(node);
        self.apply_checked_deltas(&changed);
    }

    /// Drives the checked-items collection from the outside: checks every
    /// listed node's subtree and unchecks the rest. The
    /// [`checked_items_changed`](Self::checked_items_changed) signal is
    /// suppressed while the change is applied, so programmatic writes cannot
    /// feed back into themselves.
    pub fn set_checked_items(&mut self, host: &mut dyn LayoutHost, desired: &[NodeId]) {
        if !self.checkable {
            return;
        }
        self.applying_checked_items = true;
        let current = self.checked_items.clone();
        for id in current {
            if !desired.contains(&id) {
                host.ensure_realized(&self.model, Some(id));
                let changed = self.model.uncheck_subtree(id);
                self.apply_checked_deltas(&changed);
            }
        }
        for &id in desired {
            if !self.checked_items.contains(&id) {
                host.ensure_realized(&self.model, Some(id));
                let changed = self.model.check_subtree(id);
                self.apply_checked_deltas(&changed);
            }
        }
        self.applying_checked_items = false;
    }

    fn apply_checked_deltas(&mut self, changed: &[NodeId]) {
        if changed.is_empty() {
            return;
        }
        let mut added = Vec::new();
        let mut removed = Vec::new();
        for &id in changed {
            let Some(state) = self.model.node(id).map(|node| node.checked()) else {
                continue;
            };
            self.node_checked.emit((id, state));
            let listed = self.checked_items.contains(&id);
            if state.is_fully_checked() && !listed {
                self.checked_items.push(id);
                added.push(id);
            } else if !state.is_fully_checked() && listed {
                self.checked_items.retain(|&item| item != id);
                removed.push(id);
            }
        }
        if (!added.is_empty() || !removed.is_empty()) && !self.applying_checked_items {
            self.checked_items_changed
                .emit(CheckedItemsDelta { added, removed });
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Adds a node to the selection set.
    pub fn select(&mut self, node: NodeId) {
        if !self.model.contains(node) {
            return;
        }
        if self.selection.select(node) {
            self.model.node_mut(node).unwrap().state_mut().selected = true;
            self.selection_changed.emit(self.selection.selected().to_vec());
        }
    }

    /// Removes a node from the selection set.
    pub fn deselect(&mut self, node: NodeId) {
        if self.selection.deselect(node) {
            if let Some(current) = self.model.node_mut(node) {
                current.state_mut().selected = false;
            }
            self.selection_changed.emit(self.selection.selected().to_vec());
        }
    }

    // =========================================================================
    // Default state
    // =========================================================================

    /// Runs the attach-time sequence: expand-all when configured, then the
    /// default-state bundle.
    pub fn attached(&mut self, host: &mut dyn LayoutHost, defaults: &TreeDefaults) {
        if self.default_expand_all {
            self.expand_all();
        }
        self.apply_defaults(host, defaults);
        host.ensure_realized(&self.model, None);
    }

    /// Applies a default-state bundle against the current tree shape.
    ///
    /// Checked paths reuse the subtree propagation; any expansion performed
    /// solely to realize intermediate containers is rolled back afterwards,
    /// so defaults leave expansion state visibly unchanged unless a path is
    /// also an expanded default. Unresolvable paths are skipped silently -
    /// defaults are routinely stale against dynamically loaded data.
    pub fn apply_defaults(&mut self, host: &mut dyn LayoutHost, defaults: &TreeDefaults) {
        if self.checkable {
            for path in &defaults.checked {
                let Some((target, temp)) = self.resolve_with_realization(host, path) else {
                    continue;
                };
                let changed = self.model.check_subtree(target);
                self.apply_checked_deltas(&changed);
                self.rollback_expansions(&temp);
            }
        }

        for path in &defaults.expanded {
            let Some((target, temp)) = self.resolve_with_realization(host, path) else {
                continue;
            };
            self.rollback_expansions(&temp);
            self.expand(target);
        }

        let mut selection_changed = false;
        for path in &defaults.selected {
            let Some((target, temp)) = self.resolve_with_realization(host, path) else {
                continue;
            };
            self.rollback_expansions(&temp);
            if self.selection.select(target) {
                self.model.node_mut(target).unwrap().state_mut().selected = true;
                selection_changed = true;
            }
        }
        if selection_changed {
            self.selection_changed.emit(self.selection.selected().to_vec());
        }
    }

    /// Resolves a path, expanding and realizing intermediate containers as
    /// needed. Returns the target and the containers that were expanded only
    /// for resolution, in expansion order. A failed resolution rolls its
    /// expansions back itself.
    fn resolve_with_realization(
        &mut self,
        host: &mut dyn LayoutHost,
        path: &TreePath,
    ) -> Option<(NodeId, Vec<NodeId>)> {
        let segments = path.segments();
        if segments.is_empty() {
            return None;
        }

        let mut temp = Vec::new();
        let mut current: Option<NodeId> = None;
        for segment in segments {
            let scope: Vec<NodeId> = match current {
                None => {
                    host.ensure_realized(&self.model, None);
                    self.model.roots().to_vec()
                }
                Some(container) => {
                    if let Some(node) = self.model.node(container) {
                        if !node.is_leaf() && !node.is_expanded() {
                            self.model.node_mut(container).unwrap().state_mut().expanded = true;
                            temp.push(container);
                        }
                    }
                    host.ensure_realized(&self.model, Some(container));
                    self.model.children_of(container).to_vec()
                }
            };

            let matched = scope.into_iter().find(|&id| {
                self.model
                    .node(id)
                    .and_then(|node| node.key())
                    .is_some_and(|key| key == segment.as_str())
            });
            match matched {
                Some(id) => current = Some(id),
                None => {
                    self.rollback_expansions(&temp);
                    tracing::trace!(
                        target: "veneer::tree",
                        ?path,
                        "default path did not resolve, skipped"
                    );
                    return None;
                }
            }
        }

        current.map(|target| (target, temp))
    }

    fn rollback_expansions(&mut self, temp: &[NodeId]) {
        for &node in temp.iter().rev() {
            if let Some(current) = self.model.node_mut(node) {
                current.state_mut().expanded = false;
            }
        }
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Records a pointer press. Starts a drag gesture when dragging is
    /// enabled; ignored while a drag is already active.
    pub fn on_pointer_pressed(&mut self, point: Point) {
        if !self.draggable {
            return;
        }
        self.session.on_pointer_pressed(point);
    }

    /// Tracks a pointer move: drag start past the threshold, preview
    /// position, hover highlight, and the drop decision.
    pub fn on_pointer_moved(
        &mut self,
        host: &mut dyn LayoutHost,
        previews: &mut dyn PreviewFactory,
        point: Point,
    ) {
        if !self.draggable {
            return;
        }
        host.ensure_realized(&self.model, None);
        let bounds: &dyn VisualBounds = &*host;
        self.session
            .on_pointer_moved(&mut self.model, bounds, previews, point);
    }

    /// Completes the gesture: a valid drop decision reparents the dragged
    /// node, anything else is a no-op. Transient drag state is cleared.
    pub fn on_pointer_released(&mut self, host: &mut dyn LayoutHost) {
        if let Some(drop) = self.session.on_pointer_released(&mut self.model) {
            self.perform_drop(host, drop);
        }
    }

    /// Cancels the gesture on pointer-capture loss: never mutates the tree,
    /// clears all transient drag state.
    pub fn on_pointer_capture_lost(&mut self) {
        self.session.on_capture_lost(&mut self.model);
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }

    /// The indicator line the render layer should draw, if any.
    pub fn drop_indicator(&self) -> Option<DropIndicator> {
        self.session.drop_indicator()
    }

    fn perform_drop(&mut self, host: &mut dyn LayoutHost, drop: CompletedDrop) {
        let old_parent = self.model.parent_of(drop.node);
        if let Err(error) =
            self.model
                .move_node(drop.node, drop.target.target_parent, drop.target.insert_index)
        {
            tracing::warn!(target: "veneer::tree::drag", %error, "drop mutation rejected");
            return;
        }

        let mut changed = Vec::new();
        if let Some(parent) = old_parent {
            self.model.refresh_chain_at(parent, &mut changed);
        }
        if let Some(parent) = drop.target.target_parent {
            if Some(parent) != old_parent {
                self.model.refresh_chain_at(parent, &mut changed);
            }
        }
        let mut unique = Vec::new();
        for id in changed {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.apply_checked_deltas(&unique);

        host.ensure_realized(&self.model, None);

        let index = self
            .model
            .index_in_parent(drop.node)
            .unwrap_or(drop.target.insert_index);
        self.node_moved.emit(NodeMoved {
            node: drop.node,
            old_parent,
            new_parent: drop.target.target_parent,
            index,
        });
    }
}
