// Layout tree state machine: actions in, new tree state out.
//
// Every action either applies completely or leaves the state untouched.
// ComputeMove only stages a pending action; CommitPendingAction replays it.

use serde::{Deserialize, Serialize};

use super::drop::{compute_move, DropDirection};
use super::geometry::{compute_layout, Rect};
use super::tree::{
    add_child_at, add_intermediate_node, balance_node, contains_node, disjoint_pair_mut, find_next_insert_location,
    find_node, find_node_mut, find_parent, find_parent_mut, index_in_parent, node_path, orient_subtree,
    remove_child,
};
use super::{LayoutNode, NodeId, NodeIdAllocator};
use crate::config::LayoutConfig;
use crate::error::LayoutError;

/// A requested size change for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeOperation {
    pub node_id: NodeId,
    pub size: f32,
}

/// Every action the reducer understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutTreeAction<T> {
    /// Resolve a drop of `node_to_move` onto `node` into a staged Move or Swap.
    ComputeMove {
        node: NodeId,
        node_to_move: NodeId,
        direction: DropDirection,
    },
    /// Discard the staged action.
    ClearPendingAction,
    /// Apply the staged action.
    CommitPendingAction,
    /// Graft `node` under `parent_id`, or beside the whole tree when
    /// `insert_at_root` is set. A node already in the tree is detached first.
    Move {
        parent_id: Option<NodeId>,
        insert_at_root: bool,
        index: usize,
        node: LayoutNode<T>,
    },
    /// Place a new node at the next free slot (or as the root of an empty tree).
    InsertNode {
        node: LayoutNode<T>,
        magnified: bool,
        focused: bool,
    },
    /// Remove a node and its subtree.
    DeleteNode { node_id: NodeId },
    /// Exchange the positions of two nodes.
    Swap { node1: NodeId, node2: NodeId },
    FocusNode { node_id: NodeId },
    MagnifyNodeToggle { node_id: NodeId },
    ResizeNode { resize_operations: Vec<ResizeOperation> },
}

impl<T> LayoutTreeAction<T> {
    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutTreeAction::ComputeMove { .. } => "compute_move",
            LayoutTreeAction::ClearPendingAction => "clear_pending_action",
            LayoutTreeAction::CommitPendingAction => "commit_pending_action",
            LayoutTreeAction::Move { .. } => "move",
            LayoutTreeAction::InsertNode { .. } => "insert_node",
            LayoutTreeAction::DeleteNode { .. } => "delete_node",
            LayoutTreeAction::Swap { .. } => "swap",
            LayoutTreeAction::FocusNode { .. } => "focus_node",
            LayoutTreeAction::MagnifyNodeToggle { .. } => "magnify_node_toggle",
            LayoutTreeAction::ResizeNode { .. } => "resize_node",
        }
    }
}

/// The state of one layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTreeState<T> {
    root_node: Option<LayoutNode<T>>,
    leafs: Vec<LayoutNode<T>>,
    pending_action: Option<LayoutTreeAction<T>>,
    generation: u64,
    focused_node_id: Option<NodeId>,
    magnified_node_id: Option<NodeId>,
    ids: NodeIdAllocator,
    #[serde(skip)]
    config: LayoutConfig,
}

impl<T: Clone> LayoutTreeState<T> {
    /// Create a state over `root`, balancing it first.
    pub fn new(root: LayoutNode<T>) -> Self {
        let mut ids = NodeIdAllocator::new();
        ids.reserve_subtree(&root);
        let balanced = balance_node(root);
        Self {
            root_node: balanced.node,
            leafs: balanced.leafs,
            pending_action: None,
            generation: 0,
            focused_node_id: None,
            magnified_node_id: None,
            ids,
            config: LayoutConfig::default(),
        }
    }

    /// Create a state with no nodes.
    pub fn empty() -> Self {
        Self {
            root_node: None,
            leafs: Vec::new(),
            pending_action: None,
            generation: 0,
            focused_node_id: None,
            magnified_node_id: None,
            ids: NodeIdAllocator::new(),
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root_node(&self) -> Option<&LayoutNode<T>> {
        self.root_node.as_ref()
    }

    /// In-order leaves of the current tree.
    pub fn leafs(&self) -> &[LayoutNode<T>] {
        &self.leafs
    }

    pub fn pending_action(&self) -> Option<&LayoutTreeAction<T>> {
        self.pending_action.as_ref()
    }

    /// Counter bumped on every committed change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn focused_node_id(&self) -> Option<NodeId> {
        self.focused_node_id
    }

    pub fn magnified_node_id(&self) -> Option<NodeId> {
        self.magnified_node_id
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Mint an id that no node in this tree has or will get.
    pub fn allocate_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    /// Build a leaf with a freshly allocated id, ready for InsertNode.
    pub fn new_leaf(&mut self, data: T) -> LayoutNode<T> {
        LayoutNode::leaf(self.allocate_id(), data)
    }

    /// Leaf rectangles inside `bounds`. A magnified node gets all of it.
    pub fn compute_layout(&self, bounds: Rect) -> Vec<(NodeId, Rect)> {
        let Some(root) = &self.root_node else {
            return Vec::new();
        };
        if let Some(node) = self.magnified_node_id.and_then(|id| find_node(root, id)) {
            return compute_layout(node, bounds);
        }
        compute_layout(root, bounds)
    }

    /// Apply an action, logging and ignoring it if it is rejected.
    pub fn apply(&mut self, action: LayoutTreeAction<T>) {
        let kind = action.kind();
        if let Err(e) = self.try_apply(action) {
            log::warn!("Ignoring {kind} action: {e}");
        }
    }

    /// Apply an action. On error nothing has changed.
    pub fn try_apply(&mut self, action: LayoutTreeAction<T>) -> Result<(), LayoutError> {
        match action {
            LayoutTreeAction::ComputeMove {
                node,
                node_to_move,
                direction,
            } => self.compute_move(node, node_to_move, direction),
            LayoutTreeAction::ClearPendingAction => {
                self.pending_action = None;
                Ok(())
            }
            LayoutTreeAction::CommitPendingAction => {
                let pending = self.pending_action.take().ok_or(LayoutError::MissingPendingAction)?;
                log::debug!("Committing pending {} action", pending.kind());
                self.try_apply(pending)
            }
            LayoutTreeAction::Move {
                parent_id,
                insert_at_root,
                index,
                node,
            } => {
                self.move_node(parent_id, insert_at_root, index, node)?;
                self.commit();
                Ok(())
            }
            LayoutTreeAction::InsertNode {
                node,
                magnified,
                focused,
            } => {
                self.insert_node(node, magnified, focused)?;
                self.commit();
                Ok(())
            }
            LayoutTreeAction::DeleteNode { node_id } => {
                self.delete_node(node_id)?;
                self.commit();
                Ok(())
            }
            LayoutTreeAction::Swap { node1, node2 } => {
                self.swap_nodes(node1, node2)?;
                self.commit();
                Ok(())
            }
            LayoutTreeAction::FocusNode { node_id } => self.focus_node(node_id),
            LayoutTreeAction::MagnifyNodeToggle { node_id } => self.magnify_node_toggle(node_id),
            LayoutTreeAction::ResizeNode { resize_operations } => {
                self.resize_nodes(&resize_operations)?;
                self.commit();
                Ok(())
            }
        }
    }

    fn compute_move(&mut self, node: NodeId, node_to_move: NodeId, direction: DropDirection) -> Result<(), LayoutError> {
        let root = self.root_node.as_ref().ok_or(LayoutError::EmptyTree)?;
        let staged = compute_move(root, node, node_to_move, direction)?;
        if let Some(action) = &staged {
            log::debug!("Staging {} of {} onto {} ({:?})", action.kind(), node_to_move, node, direction);
        }
        self.pending_action = staged;
        Ok(())
    }

    fn move_node(
        &mut self,
        parent_id: Option<NodeId>,
        insert_at_root: bool,
        index: usize,
        node: LayoutNode<T>,
    ) -> Result<(), LayoutError> {
        match (parent_id, insert_at_root) {
            (Some(_), true) => return Err(LayoutError::AmbiguousMoveTarget),
            (None, false) => return Err(LayoutError::MissingMoveTarget),
            _ => {}
        }

        let Some(root) = self.root_node.as_mut() else {
            if insert_at_root {
                // Nothing to sit beside: the node becomes the tree.
                self.ids.reserve_subtree(&node);
                self.root_node = Some(node);
                return Ok(());
            }
            return Err(LayoutError::EmptyTree);
        };

        // Validate everything before the first edit.
        let existing = find_node(root, node.id).cloned();
        match &existing {
            Some(current) => {
                if let Some(parent_id) = parent_id {
                    if contains_node(current, parent_id) {
                        return Err(LayoutError::AncestorConflict {
                            ancestor: node.id,
                            descendant: parent_id,
                        });
                    }
                } else if current.id == root.id {
                    return Err(LayoutError::AncestorConflict {
                        ancestor: node.id,
                        descendant: root.id,
                    });
                }
            }
            None => ensure_ids_free(root, &node)?,
        }
        if let Some(parent_id) = parent_id {
            if find_node(root, parent_id).is_none() {
                return Err(LayoutError::NodeNotFound(parent_id));
            }
        }

        let node_id = node.id;
        let old_parent_id = find_parent(root, node_id).map(|p| p.id);

        // Same parent: when the new slot is at or before the old one, the
        // stale copy ends up after the insert position.
        let mut start_index = 0;
        if let (Some(old), Some(new)) = (old_parent_id, parent_id) {
            if old == new {
                let current = find_node(root, old)
                    .and_then(|p| index_in_parent(p, node_id))
                    .unwrap_or(0);
                if current >= index {
                    start_index = index + 1;
                }
            }
        }

        let graft = existing.unwrap_or(node);
        self.ids.reserve_subtree(&graft);

        match parent_id {
            Some(parent_id) => {
                let parent = find_node_mut(root, parent_id).ok_or(LayoutError::NodeNotFound(parent_id))?;
                add_child_at(parent, index, graft, &mut self.ids);
            }
            None => {
                let direction = root.flex_direction.reverse();
                add_intermediate_node(root, self.ids.next_id(), direction);
                add_child_at(root, index, graft, &mut self.ids);
            }
        }

        if let Some(old_parent_id) = old_parent_id {
            if let Some(old_parent) = find_node_mut(root, old_parent_id) {
                remove_child(old_parent, node_id, start_index);
            }
        }
        Ok(())
    }

    fn insert_node(&mut self, node: LayoutNode<T>, magnified: bool, focused: bool) -> Result<(), LayoutError> {
        let inserted = node.first_leaf_id().unwrap_or(node.id);
        match self.root_node.as_mut() {
            None => {
                self.ids.reserve_subtree(&node);
                self.root_node = Some(node);
            }
            Some(root) => {
                ensure_ids_free(root, &node)?;
                let location = find_next_insert_location(root, self.config.max_children_per_node)
                    .ok_or(LayoutError::NodeNotFound(root.id))?;
                self.ids.reserve_subtree(&node);
                let target = find_node_mut(root, location.node_id).ok_or(LayoutError::NodeNotFound(location.node_id))?;
                add_child_at(target, location.index, node, &mut self.ids);
            }
        }
        if focused {
            self.focused_node_id = Some(inserted);
        }
        if magnified {
            self.magnified_node_id = Some(inserted);
        }
        Ok(())
    }

    fn delete_node(&mut self, node_id: NodeId) -> Result<(), LayoutError> {
        let root = self.root_node.as_mut().ok_or(LayoutError::EmptyTree)?;
        if root.id == node_id {
            self.root_node = None;
            return Ok(());
        }
        let parent = find_parent_mut(root, node_id).ok_or(LayoutError::NodeNotFound(node_id))?;
        remove_child(parent, node_id, 0);
        Ok(())
    }

    fn swap_nodes(&mut self, node1: NodeId, node2: NodeId) -> Result<(), LayoutError> {
        let root = self.root_node.as_mut().ok_or(LayoutError::EmptyTree)?;
        if node1 == node2 {
            return Err(LayoutError::SameNode(node1));
        }
        if node1 == root.id || node2 == root.id {
            return Err(LayoutError::RootNotSwappable(root.id));
        }
        let path1 = node_path(root, node1).ok_or(LayoutError::NodeNotFound(node1))?;
        let path2 = node_path(root, node2).ok_or(LayoutError::NodeNotFound(node2))?;
        if path2.starts_with(&path1) {
            return Err(LayoutError::AncestorConflict {
                ancestor: node1,
                descendant: node2,
            });
        }
        if path1.starts_with(&path2) {
            return Err(LayoutError::AncestorConflict {
                ancestor: node2,
                descendant: node1,
            });
        }

        // Each slot keeps its size and orientation; only the contents move.
        let (first, second) = disjoint_pair_mut(root, &path1, &path2).ok_or(LayoutError::NodeNotFound(node1))?;
        let (direction1, direction2) = (first.flex_direction, second.flex_direction);
        std::mem::swap(&mut first.size, &mut second.size);
        std::mem::swap(first, second);
        orient_subtree(first, direction1);
        orient_subtree(second, direction2);
        Ok(())
    }

    fn focus_node(&mut self, node_id: NodeId) -> Result<(), LayoutError> {
        let root = self.root_node.as_ref().ok_or(LayoutError::EmptyTree)?;
        if find_node(root, node_id).is_none() {
            return Err(LayoutError::NodeNotFound(node_id));
        }
        if self.focused_node_id != Some(node_id) {
            self.focused_node_id = Some(node_id);
            self.generation += 1;
        }
        Ok(())
    }

    fn magnify_node_toggle(&mut self, node_id: NodeId) -> Result<(), LayoutError> {
        let root = self.root_node.as_ref().ok_or(LayoutError::EmptyTree)?;
        if find_node(root, node_id).is_none() {
            return Err(LayoutError::NodeNotFound(node_id));
        }
        if self.magnified_node_id == Some(node_id) {
            self.magnified_node_id = None;
        } else {
            self.magnified_node_id = Some(node_id);
            self.focused_node_id = Some(node_id);
        }
        self.generation += 1;
        Ok(())
    }

    fn resize_nodes(&mut self, operations: &[ResizeOperation]) -> Result<(), LayoutError> {
        let root = self.root_node.as_mut().ok_or(LayoutError::EmptyTree)?;
        for op in operations {
            if !(op.size.is_finite() && op.size > 0.0) {
                return Err(LayoutError::InvalidSize {
                    node_id: op.node_id,
                    size: op.size,
                });
            }
            if find_node(root, op.node_id).is_none() {
                return Err(LayoutError::NodeNotFound(op.node_id));
            }
        }
        for op in operations {
            if let Some(node) = find_node_mut(root, op.node_id) {
                node.size = op.size;
            }
        }
        Ok(())
    }

    /// Rebalance after a structural edit, refresh derived state, bump generation.
    fn commit(&mut self) {
        match self.root_node.take() {
            Some(root) => {
                let balanced = balance_node(root);
                self.root_node = balanced.node;
                self.leafs = balanced.leafs;
            }
            None => self.leafs.clear(),
        }
        self.pending_action = None;

        let root = self.root_node.as_ref();
        let alive = |id: NodeId| root.is_some_and(|r| contains_node(r, id));
        if let Some(focused) = self.focused_node_id {
            if !alive(focused) {
                self.focused_node_id = self.leafs.first().map(|leaf| leaf.id);
            }
        }
        if let Some(magnified) = self.magnified_node_id {
            if !alive(magnified) {
                self.magnified_node_id = None;
            }
        }
        self.generation += 1;
        log::trace!("Layout generation {} with {} leaves", self.generation, self.leafs.len());
    }
}

impl<T: Clone> Default for LayoutTreeState<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Value-in, value-out form of `LayoutTreeState::apply`.
pub fn reduce<T: Clone>(mut state: LayoutTreeState<T>, action: LayoutTreeAction<T>) -> LayoutTreeState<T> {
    state.apply(action);
    state
}

/// Reject grafting `node` if any id in its subtree is already in `root`.
fn ensure_ids_free<T>(root: &LayoutNode<T>, node: &LayoutNode<T>) -> Result<(), LayoutError> {
    match node.node_ids().into_iter().find(|id| contains_node(root, *id)) {
        Some(id) => Err(LayoutError::DuplicateNodeId(id)),
        None => Ok(()),
    }
}
