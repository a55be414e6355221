//! Error types for the Veneer control layer.
//!
//! Recoverable per-node conditions (an unresolvable default path, a check
//! request on a non-checkable node, a drop that would create a cycle) are
//! absorbed as no-ops and never surface here. Only structural misuse of the
//! API - a stale or foreign node id handed to a mutation entry point - is an
//! error, because it indicates a wiring bug in the host application rather
//! than a runtime data condition.

use crate::model::NodeId;

/// Result type alias for Veneer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Veneer control layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A node id does not refer to a live node in the model it was used with.
    #[error("node {0:?} is not part of this tree model")]
    StaleNode(NodeId),

    /// An attach was requested for a node that is still in a child list.
    #[error("node {0:?} is already attached")]
    AlreadyAttached(NodeId),

    /// A reparenting operation would make a node an ancestor of itself.
    #[error("moving node {0:?} under its own subtree would create a cycle")]
    WouldCycle(NodeId),
}
