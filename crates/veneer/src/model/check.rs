//! Tri-state checked status and its subtree propagation.
//!
//! Checking or unchecking a node applies the new state to its whole
//! effectively-checkable subtree and then re-derives the tri-state status of
//! every ancestor from that ancestor's immediate children. The derivation per
//! ancestor:
//!
//! - every effectively-checkable child checked (or no such children) =>
//!   `Checked`
//! - at least one child checked or partially checked => `PartiallyChecked`
//! - otherwise => `Unchecked`
//!
//! A node that is disabled or configured non-checkable is never touched: a
//! request against it is a no-op, recursion does not descend into its
//! subtree, and ancestor derivation ignores it. Ancestor ascent skips such a
//! node without modifying it and continues to the root.

use super::node::{NodeId, TreeModel};

/// Check state for checkable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    /// Item is unchecked.
    #[default]
    Unchecked,
    /// Item is partially checked (some, but not all, descendants checked).
    PartiallyChecked,
    /// Item is checked.
    Checked,
}

impl CheckState {
    /// Returns `true` if the item is checked (fully or partially).
    pub fn is_checked(&self) -> bool {
        !matches!(self, CheckState::Unchecked)
    }

    /// Returns `true` if the item is fully checked.
    pub fn is_fully_checked(&self) -> bool {
        matches!(self, CheckState::Checked)
    }

    /// Toggles between Unchecked and Checked.
    /// PartiallyChecked becomes Checked.
    pub fn toggle(&self) -> CheckState {
        match self {
            CheckState::Unchecked => CheckState::Checked,
            CheckState::PartiallyChecked | CheckState::Checked => CheckState::Unchecked,
        }
    }
}

impl TreeModel {
    /// Checks a node and its effectively-checkable subtree, then re-derives
    /// every ancestor's tri-state status.
    ///
    /// Returns the nodes whose checked value changed, in visit order. A
    /// request against a non-checkable or disabled node is a no-op and
    /// returns an empty set.
    pub fn check_subtree(&mut self, node: NodeId) -> Vec<NodeId> {
        self.apply_check(node, CheckState::Checked)
    }

    /// Unchecks a node and its effectively-checkable subtree, then re-derives
    /// every ancestor's tri-state status.
    ///
    /// Returns the nodes whose checked value changed, in visit order.
    pub fn uncheck_subtree(&mut self, node: NodeId) -> Vec<NodeId> {
        self.apply_check(node, CheckState::Unchecked)
    }

    fn apply_check(&mut self, node: NodeId, state: CheckState) -> Vec<NodeId> {
        let mut changed = Vec::new();
        let Some(target) = self.node(node) else {
            return changed;
        };
        if !target.is_effectively_checkable() {
            tracing::trace!(
                target: "veneer::tree::check",
                ?node,
                "check request on non-checkable node ignored"
            );
            return changed;
        }

        self.set_subtree_checked(node, state, &mut changed);
        self.refresh_ancestors_from(node, &mut changed);

        tracing::trace!(
            target: "veneer::tree::check",
            ?node,
            ?state,
            changed = changed.len(),
            "check propagation complete"
        );
        changed
    }

    fn set_subtree_checked(&mut self, node: NodeId, state: CheckState, changed: &mut Vec<NodeId>) {
        let Some(current) = self.node(node) else {
            return;
        };
        if !current.is_effectively_checkable() {
            return;
        }
        if current.checked() != state {
            self.node_mut(node).unwrap().state_mut().checked = state;
            changed.push(node);
        }
        let children = self.children_of(node).to_vec();
        for child in children {
            self.set_subtree_checked(child, state, changed);
        }
    }

    /// Re-derives the tri-state status of every ancestor above `node`.
    ///
    /// Non-checkable ancestors are left unmodified but do not stop the
    /// ascent. Appends the ancestors whose value changed to `changed`.
    pub(crate) fn refresh_ancestors_from(&mut self, node: NodeId, changed: &mut Vec<NodeId>) {
        let ancestors: Vec<NodeId> = self.ancestors(node).collect();
        for ancestor in ancestors {
            self.refresh_derived_state(ancestor, changed);
        }
    }

    /// Re-derives the tri-state status of `node` itself and every ancestor
    /// above it. Used after reparenting, where the node at the seam may
    /// itself need a refresh.
    pub(crate) fn refresh_chain_at(&mut self, node: NodeId, changed: &mut Vec<NodeId>) {
        self.refresh_derived_state(node, changed);
        self.refresh_ancestors_from(node, changed);
    }

    fn refresh_derived_state(&mut self, node: NodeId, changed: &mut Vec<NodeId>) {
        let Some(current) = self.node(node) else {
            return;
        };
        if !current.is_effectively_checkable() {
            return;
        }
        let derived = self.derive_from_children(node);
        if self.node(node).unwrap().checked() != derived {
            self.node_mut(node).unwrap().state_mut().checked = derived;
            changed.push(node);
        }
    }

    /// Derives a node's tri-state status from its immediate
    /// effectively-checkable children.
    pub fn derive_from_children(&self, node: NodeId) -> CheckState {
        let mut any = false;
        let mut all = true;
        for &child in self.children_of(node) {
            let Some(child_node) = self.node(child) else {
                continue;
            };
            if !child_node.is_effectively_checkable() {
                continue;
            }
            match child_node.checked() {
                CheckState::Checked => any = true,
                CheckState::PartiallyChecked => {
                    any = true;
                    all = false;
                }
                CheckState::Unchecked => all = false,
            }
        }
        if all {
            CheckState::Checked
        } else if any {
            CheckState::PartiallyChecked
        } else {
            CheckState::Unchecked
        }
    }
}
