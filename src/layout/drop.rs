// Drop-target resolution: turns a 9-zone drop onto a node into a Move or Swap.

use serde::{Deserialize, Serialize};

use super::reducer::LayoutTreeAction;
use super::tree::{contains_node, find_node, find_parent, index_in_parent};
use super::{FlexDirection, LayoutNode, NodeId};
use crate::error::LayoutError;

/// Zone of a drop target the dragged node was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropDirection {
    Top,
    Right,
    Bottom,
    Left,
    OuterTop,
    OuterRight,
    OuterBottom,
    OuterLeft,
    Center,
}

impl DropDirection {
    /// Orientation a drop in this zone arranges along. None for Center.
    pub fn axis(self) -> Option<FlexDirection> {
        match self {
            DropDirection::Top | DropDirection::Bottom | DropDirection::OuterTop | DropDirection::OuterBottom => {
                Some(FlexDirection::Column)
            }
            DropDirection::Left | DropDirection::Right | DropDirection::OuterLeft | DropDirection::OuterRight => {
                Some(FlexDirection::Row)
            }
            DropDirection::Center => None,
        }
    }

    /// Whether this is one of the outer-band zones.
    pub fn is_outer(self) -> bool {
        matches!(
            self,
            DropDirection::OuterTop | DropDirection::OuterRight | DropDirection::OuterBottom | DropDirection::OuterLeft
        )
    }

    /// 0 for zones that place before the target (top, left), 1 for after.
    fn offset(self) -> usize {
        match self {
            DropDirection::Bottom | DropDirection::Right | DropDirection::OuterBottom | DropDirection::OuterRight => 1,
            _ => 0,
        }
    }

    /// The outer-band counterpart of an inner edge zone.
    pub fn to_outer(self) -> Self {
        match self {
            DropDirection::Top => DropDirection::OuterTop,
            DropDirection::Right => DropDirection::OuterRight,
            DropDirection::Bottom => DropDirection::OuterBottom,
            DropDirection::Left => DropDirection::OuterLeft,
            other => other,
        }
    }
}

/// A resolved placement: graft under `parent_id`, or at the root level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    parent_id: Option<NodeId>,
    index: usize,
}

/// Resolve dropping `node_to_move` onto `target` in `direction`.
///
/// Returns `Ok(None)` when the resulting move would leave the tree unchanged.
pub fn compute_move<T: Clone>(
    root: &LayoutNode<T>,
    target: NodeId,
    node_to_move: NodeId,
    direction: DropDirection,
) -> Result<Option<LayoutTreeAction<T>>, LayoutError> {
    if target == node_to_move {
        return Err(LayoutError::SameNode(target));
    }
    let target_node = find_node(root, target).ok_or(LayoutError::NodeNotFound(target))?;
    let moving = find_node(root, node_to_move).ok_or(LayoutError::NodeNotFound(node_to_move))?;
    if contains_node(moving, target) {
        return Err(LayoutError::AncestorConflict {
            ancestor: node_to_move,
            descendant: target,
        });
    }

    let Some(axis) = direction.axis() else {
        if target == root.id || node_to_move == root.id {
            return Err(LayoutError::RootNotSwappable(root.id));
        }
        if contains_node(target_node, node_to_move) {
            return Err(LayoutError::AncestorConflict {
                ancestor: target,
                descendant: node_to_move,
            });
        }
        return Ok(Some(LayoutTreeAction::Swap {
            node1: target,
            node2: node_to_move,
        }));
    };

    let placement = resolve_edge_drop(root, target_node, axis, direction)
        .ok_or(LayoutError::NoMoveResolved { target, direction })?;

    let current_parent = find_parent(root, node_to_move);
    if let Some(parent) = current_parent {
        if placement.parent_id == Some(parent.id) {
            let current = index_in_parent(parent, node_to_move);
            let lands_in_place =
                current == Some(placement.index) || current.map(|i| i + 1) == Some(placement.index);
            if lands_in_place {
                log::debug!(
                    "Suppressing no-op move of {} to index {} under {}",
                    node_to_move,
                    placement.index,
                    parent.id
                );
                return Ok(None);
            }
        }
    }

    Ok(Some(LayoutTreeAction::Move {
        parent_id: placement.parent_id,
        insert_at_root: placement.parent_id.is_none(),
        index: placement.index,
        node: moving.clone(),
    }))
}

fn resolve_edge_drop<T>(
    root: &LayoutNode<T>,
    target: &LayoutNode<T>,
    axis: FlexDirection,
    direction: DropDirection,
) -> Option<Placement> {
    let offset = direction.offset();
    let parent = find_parent(root, target.id);
    let aligned = target.flex_direction == axis;

    // Outer zones pop out one level when the target already runs along the axis.
    if direction.is_outer() && aligned {
        let grandparent = parent.and_then(|p| find_parent(root, p.id).map(|gp| (p, gp)));
        if let Some((parent, grandparent)) = grandparent {
            if let Some(index) = index_in_parent(grandparent, parent.id) {
                return Some(Placement {
                    parent_id: Some(grandparent.id),
                    index: index + offset,
                });
            }
        }
    }

    if aligned {
        return Some(Placement {
            parent_id: Some(target.id),
            index: offset,
        });
    }
    if let Some(parent) = parent {
        let index = index_in_parent(parent, target.id)?;
        return Some(Placement {
            parent_id: Some(parent.id),
            index: index + offset,
        });
    }
    if target.id == root.id {
        return Some(Placement {
            parent_id: None,
            index: offset,
        });
    }
    None
}
