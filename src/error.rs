// Diagnostics raised when a reducer action cannot be applied.

use crate::layout::drop::DropDirection;
use crate::layout::NodeId;

/// Why an action was rejected. A rejected action leaves the tree untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("node {0} not found in tree")]
    NodeNotFound(NodeId),
    #[error("tree is empty")]
    EmptyTree,
    #[error("no pending action to commit")]
    MissingPendingAction,
    #[error("node {0} cannot be moved or swapped with itself")]
    SameNode(NodeId),
    #[error("root node {0} cannot be swapped")]
    RootNotSwappable(NodeId),
    #[error("node {descendant} is inside the subtree of {ancestor}")]
    AncestorConflict { ancestor: NodeId, descendant: NodeId },
    #[error("move names both a parent and insert-at-root")]
    AmbiguousMoveTarget,
    #[error("move names neither a parent nor insert-at-root")]
    MissingMoveTarget,
    #[error("node id {0} already exists in tree")]
    DuplicateNodeId(NodeId),
    #[error("no placement for {direction:?} drop on node {target}")]
    NoMoveResolved { target: NodeId, direction: DropDirection },
    #[error("invalid size {size} for node {node_id}")]
    InvalidSize { node_id: NodeId, size: f32 },
}
