//! Tree nodes and the arena that owns them.
//!
//! [`TreeModel`] is the single owner of every node in a tree. Nodes refer to
//! each other through [`NodeId`]s: a node's children are an ordered id list,
//! and the parent back-reference is a non-owning id resolved through the
//! arena, so ownership stays strictly top-down and the ownership graph can
//! never contain a cycle.
//!
//! # Example
//!
//! ```
//! use veneer::model::{TreeModel, TreeNode};
//!
//! let mut model = TreeModel::new();
//! let root = model.add_root(TreeNode::new("Library").with_key("lib"));
//! let shelf = model.add_child(root, TreeNode::new("Shelf A")).unwrap();
//! assert_eq!(model.parent_of(shelf), Some(root));
//! assert!(!model.node(root).unwrap().is_leaf());
//! ```

use slotmap::{SlotMap, new_key_type};

use super::check::CheckState;
use crate::error::{Error, Result};

new_key_type! {
    /// A stable identifier for a node within its owning [`TreeModel`].
    ///
    /// Ids stay valid until the node is removed from the arena; a removed
    /// node's id never aliases a later insertion.
    pub struct NodeId;
}

/// Per-node interactive state.
///
/// The logical flags (`checked`, `expanded`, `selected`) persist for the
/// node's whole lifetime, independent of whether the node is currently
/// realized into a visual container. `dragging` and `drag_over` are transient
/// drag-session flags; they are mutated only by the engine and read by the
/// host's rendering layer.
#[derive(Debug, Clone, Default)]
pub struct NodeState {
    /// Tri-state checked status. Never set to
    /// [`CheckState::PartiallyChecked`] by direct user action - that value is
    /// only derived from children.
    pub checked: CheckState,
    /// Whether the node's children are shown.
    pub expanded: bool,
    /// Whether the node is in the selection set.
    pub selected: bool,
    /// The node is the source of the active drag session.
    pub dragging: bool,
    /// The pointer is hovering this node during a drag.
    pub drag_over: bool,
}

/// A single item in a tree.
///
/// Stores the display payload plus the configuration and state flags the
/// engine operates on. Child ordering is display ordering.
#[derive(Debug, Clone)]
pub struct TreeNode {
    key: Option<String>,
    label: String,
    enabled: bool,
    checkable: bool,
    state: NodeState,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    /// Creates a new node with the given display label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            key: None,
            label: label.into(),
            enabled: true,
            checkable: true,
            state: NodeState::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Sets the addressing key used by [`TreePath`](super::TreePath)
    /// resolution. Keys only need to be unique among siblings.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets whether the node is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets whether the node participates in check-state propagation.
    ///
    /// Defaults to `true`.
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }

    /// Sets the initial expanded state.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.state.expanded = expanded;
        self
    }

    /// Gets the addressing key.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Gets the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets the display label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Returns whether the node is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the node is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether the node is configured as checkable.
    pub fn is_checkable(&self) -> bool {
        self.checkable
    }

    /// Sets whether the node is configured as checkable.
    pub fn set_checkable(&mut self, checkable: bool) {
        self.checkable = checkable;
    }

    /// Returns whether check-state propagation may touch this node.
    ///
    /// A node is effectively checkable when it is both enabled and configured
    /// as checkable.
    pub fn is_effectively_checkable(&self) -> bool {
        self.enabled && self.checkable
    }

    /// Returns whether the node has no children.
    ///
    /// Derived from the child list, so it can never drift out of sync with
    /// child mutations.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Gets the node's interactive state.
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Gets the node's interactive state mutably.
    pub fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    /// Current tri-state checked status.
    pub fn checked(&self) -> CheckState {
        self.state.checked
    }

    /// Whether the node's children are shown.
    pub fn is_expanded(&self) -> bool {
        self.state.expanded
    }

    /// Whether the node is in the selection set.
    pub fn is_selected(&self) -> bool {
        self.state.selected
    }

    /// The parent id, or `None` for a root or detached node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The ordered child id list.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Arena-owned tree of [`TreeNode`]s.
///
/// One `TreeModel` is exclusively owned by one tree view. All structural
/// mutation goes through the model so parent/child links stay consistent;
/// handing a stale id to a mutation entry point is a structural error
/// ([`Error::StaleNode`]), not a silent no-op.
#[derive(Debug, Default)]
pub struct TreeModel {
    nodes: SlotMap<NodeId, TreeNode>,
    roots: Vec<NodeId>,
}

impl TreeModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the model contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether the id refers to a live node in this model.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// The ordered list of root nodes.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Gets a node by id.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Gets a node by id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Appends a node to the root list and returns its id.
    pub fn add_root(&mut self, node: TreeNode) -> NodeId {
        let id = self.insert_floating(node);
        self.roots.push(id);
        id
    }

    /// Inserts a node into the root list at `index` (clamped) and returns its
    /// id.
    pub fn insert_root(&mut self, index: usize, node: TreeNode) -> NodeId {
        let id = self.insert_floating(node);
        let index = index.min(self.roots.len());
        self.roots.insert(index, id);
        id
    }

    /// Appends a node to `parent`'s child list and returns its id.
    pub fn add_child(&mut self, parent: NodeId, node: TreeNode) -> Result<NodeId> {
        let len = self
            .node(parent)
            .ok_or(Error::StaleNode(parent))?
            .child_count();
        self.insert_child(parent, len, node)
    }

    /// Inserts a node into `parent`'s child list at `index` (clamped) and
    /// returns its id.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, node: TreeNode) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(Error::StaleNode(parent));
        }
        let id = self.insert_floating(node);
        self.nodes[id].parent = Some(parent);
        let children = &mut self.nodes[parent].children;
        let index = index.min(children.len());
        children.insert(index, id);
        Ok(id)
    }

    /// Removes a node from its parent's child list (or the root list) without
    /// dropping its subtree. The node stays in the arena, detached, until it
    /// is re-attached or removed.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::StaleNode(id));
        }
        match self.nodes[id].parent.take() {
            Some(parent) => {
                self.nodes[parent].children.retain(|&child| child != id);
            }
            None => {
                self.roots.retain(|&root| root != id);
            }
        }
        Ok(())
    }

    /// Attaches a detached node under `parent` (or the root list) at `index`
    /// (clamped).
    pub fn attach(&mut self, id: NodeId, parent: Option<NodeId>, index: usize) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::StaleNode(id));
        }
        if self.nodes[id].parent.is_some() || self.roots.contains(&id) {
            return Err(Error::AlreadyAttached(id));
        }
        match parent {
            Some(parent) => {
                if !self.contains(parent) {
                    return Err(Error::StaleNode(parent));
                }
                if parent == id || self.is_ancestor_of(id, parent) {
                    return Err(Error::WouldCycle(id));
                }
                self.nodes[id].parent = Some(parent);
                let children = &mut self.nodes[parent].children;
                let index = index.min(children.len());
                children.insert(index, id);
            }
            None => {
                let index = index.min(self.roots.len());
                self.roots.insert(index, id);
            }
        }
        Ok(())
    }

    /// Moves a node (and its subtree) under a new parent at `index`.
    ///
    /// Validation happens before any mutation, so a rejected move leaves the
    /// tree untouched.
    pub fn move_node(&mut self, id: NodeId, parent: Option<NodeId>, index: usize) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::StaleNode(id));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(Error::StaleNode(parent));
            }
            if parent == id || self.is_ancestor_of(id, parent) {
                return Err(Error::WouldCycle(id));
            }
        }
        self.detach(id)?;
        self.attach(id, parent, index)
    }

    /// Removes a node and its entire subtree from the arena.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    fn insert_floating(&mut self, mut node: TreeNode) -> NodeId {
        node.parent = None;
        node.children = Vec::new();
        self.nodes.insert(node)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The parent of a node, or `None` for roots and detached nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(TreeNode::parent)
    }

    /// The ordered child list of a node. Empty for stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// The sibling list a node currently lives in: its parent's child list,
    /// or the root list for top-level nodes.
    pub fn sibling_list(&self, id: NodeId) -> &[NodeId] {
        match self.parent_of(id) {
            Some(parent) => self.children_of(parent),
            None => &self.roots,
        }
    }

    /// The node's index within its sibling list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        self.sibling_list(id).iter().position(|&sibling| sibling == id)
    }

    /// Iterates the ancestor chain from the node's parent up to a root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent_of(id);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent_of(next);
            Some(next)
        })
    }

    /// Returns whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|candidate| candidate == ancestor)
    }

    /// Returns whether every ancestor of the node is expanded.
    ///
    /// True for roots. This is the expansion half of the "visible in
    /// viewport" test; the geometric half lives in the hit tester.
    pub fn ancestors_expanded(&self, id: NodeId) -> bool {
        self.ancestors(id)
            .all(|ancestor| self.nodes[ancestor].state.expanded)
    }

    /// Depth-first pre-order visit of a subtree, including its root.
    pub fn visit_subtree(&self, id: NodeId, visit: &mut impl FnMut(NodeId)) {
        if !self.contains(id) {
            return;
        }
        visit(id);
        let children = self.children_of(id).to_vec();
        for child in children {
            self.visit_subtree(child, visit);
        }
    }

    /// Collects a subtree in depth-first pre-order, including its root.
    pub fn collect_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.visit_subtree(id, &mut |node| out.push(node));
        out
    }
}
