// Low-level tree surgery: lookup, graft, detach, wrap, balance, insert-slot search.
//
// None of the editing helpers rebalance by themselves; callers finish a batch
// of edits with `balance_node`.

use std::collections::VecDeque;

use super::{FlexDirection, LayoutNode, NodeContent, NodeId, NodeIdAllocator, DEFAULT_NODE_SIZE};

/// Sibling totals this close to `DEFAULT_NODE_SIZE` are left alone, so
/// rebalancing an already balanced tree is a fixed point.
const SIZE_TOLERANCE: f32 = 1e-3;

/// Result of a balancing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced<T> {
    /// The normalized subtree, or None if nothing survived.
    pub node: Option<LayoutNode<T>>,
    /// In-order leaves of `node`.
    pub leafs: Vec<LayoutNode<T>>,
}

/// Where a new leaf should be grafted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertLocation {
    pub node_id: NodeId,
    pub index: usize,
}

/// Depth-first search by id. Returns the node itself, the root included.
pub fn find_node<T>(node: &LayoutNode<T>, id: NodeId) -> Option<&LayoutNode<T>> {
    if node.id == id {
        return Some(node);
    }
    node.children().iter().find_map(|child| find_node(child, id))
}

pub fn find_node_mut<T>(node: &mut LayoutNode<T>, id: NodeId) -> Option<&mut LayoutNode<T>> {
    if node.id == id {
        return Some(node);
    }
    match &mut node.content {
        NodeContent::Leaf(_) => None,
        NodeContent::Children(children) => children.iter_mut().find_map(|child| find_node_mut(child, id)),
    }
}

/// Immediate parent of the node with `id`. None for the root or a missing id.
pub fn find_parent<T>(node: &LayoutNode<T>, id: NodeId) -> Option<&LayoutNode<T>> {
    if node.id == id {
        return None;
    }
    let children = node.children();
    if children.iter().any(|child| child.id == id) {
        return Some(node);
    }
    children.iter().find_map(|child| find_parent(child, id))
}

pub fn find_parent_mut<T>(node: &mut LayoutNode<T>, id: NodeId) -> Option<&mut LayoutNode<T>> {
    if node.id == id {
        return None;
    }
    if node.children().iter().any(|child| child.id == id) {
        return Some(node);
    }
    match &mut node.content {
        NodeContent::Leaf(_) => None,
        NodeContent::Children(children) => children.iter_mut().find_map(|child| find_parent_mut(child, id)),
    }
}

/// Position of the child with `id` among `parent`'s children.
pub fn index_in_parent<T>(parent: &LayoutNode<T>, id: NodeId) -> Option<usize> {
    parent.children().iter().position(|child| child.id == id)
}

/// Whether the subtree rooted at `node` contains `id` (`node` itself included).
pub fn contains_node<T>(node: &LayoutNode<T>, id: NodeId) -> bool {
    find_node(node, id).is_some()
}

/// Graft `node` into `parent`'s children at `index`, clamped into `[0, len]`.
///
/// A leaf parent is first wrapped with `add_intermediate_node`, keeping its
/// orientation, so it can adopt children. The grafted subtree is re-oriented
/// to alternate under its parent and takes an equal share of the sibling sizes.
pub fn add_child_at<T>(parent: &mut LayoutNode<T>, index: usize, mut node: LayoutNode<T>, ids: &mut NodeIdAllocator) {
    if parent.is_leaf() {
        let direction = parent.flex_direction;
        add_intermediate_node(parent, ids.next_id(), direction);
    }
    let direction = parent.flex_direction.reverse();
    let Some(children) = parent.children_mut() else {
        return;
    };
    orient_subtree(&mut node, direction);
    if !children.is_empty() {
        let total: f32 = children.iter().map(|child| child.size).sum();
        node.size = total / children.len() as f32;
    }
    let index = index.min(children.len());
    children.insert(index, node);
}

/// Remove the first child with `id` at or after `start_index`.
///
/// In a same-parent move the new copy is inserted before the stale one is
/// removed; searching past the insert position skips the new copy.
pub fn remove_child<T>(parent: &mut LayoutNode<T>, id: NodeId, start_index: usize) -> Option<LayoutNode<T>> {
    let children = parent.children_mut()?;
    let offset = children
        .iter()
        .skip(start_index)
        .position(|child| child.id == id)?;
    Some(children.remove(start_index + offset))
}

/// Replace `node` in place with a new container (`id`, `flex_direction`)
/// whose only child is the old node. The old node keeps its own id, so a
/// leaf's identity survives being split.
pub fn add_intermediate_node<T>(node: &mut LayoutNode<T>, id: NodeId, flex_direction: FlexDirection) {
    let container = LayoutNode {
        id,
        content: NodeContent::Children(Vec::with_capacity(2)),
        flex_direction,
        size: node.size,
        visible: node.visible,
    };
    let mut previous = std::mem::replace(node, container);
    previous.size = DEFAULT_NODE_SIZE;
    if previous.is_leaf() {
        previous.flex_direction = flex_direction.reverse();
    }
    if let NodeContent::Children(children) = &mut node.content {
        children.push(previous);
    }
}

/// Set `node` to `direction` and alternate the orientation of everything below it.
pub fn orient_subtree<T>(node: &mut LayoutNode<T>, direction: FlexDirection) {
    node.flex_direction = direction;
    if let Some(children) = node.children_mut() {
        for child in children {
            orient_subtree(child, direction.reverse());
        }
    }
}

/// Child indices leading from `root` to the node with `id`. Empty for the root.
pub fn node_path<T>(root: &LayoutNode<T>, id: NodeId) -> Option<Vec<usize>> {
    if root.id == id {
        return Some(Vec::new());
    }
    root.children().iter().enumerate().find_map(|(i, child)| {
        let mut path = node_path(child, id)?;
        path.insert(0, i);
        Some(path)
    })
}

pub fn node_at_path_mut<'a, T>(mut node: &'a mut LayoutNode<T>, path: &[usize]) -> Option<&'a mut LayoutNode<T>> {
    for &i in path {
        node = node.children_mut()?.get_mut(i)?;
    }
    Some(node)
}

/// Borrow two nodes at once. None if either path is a prefix of the other.
pub fn disjoint_pair_mut<'a, T>(
    root: &'a mut LayoutNode<T>,
    a: &[usize],
    b: &[usize],
) -> Option<(&'a mut LayoutNode<T>, &'a mut LayoutNode<T>)> {
    let fork = a.iter().zip(b).position(|(x, y)| x != y)?;
    let children = node_at_path_mut(root, &a[..fork])?.children_mut()?;
    let (i, j) = (a[fork], b[fork]);
    let (first, second) = if i < j {
        let (left, right) = children.split_at_mut(j);
        (left.get_mut(i)?, right.first_mut()?)
    } else {
        let (left, right) = children.split_at_mut(i);
        (right.first_mut()?, left.get_mut(j)?)
    };
    Some((
        node_at_path_mut(first, &a[fork + 1..])?,
        node_at_path_mut(second, &b[fork + 1..])?,
    ))
}

/// Swap `replacement` into the slot holding `id`, returning the old subtree.
pub fn replace_node<T>(root: &mut LayoutNode<T>, id: NodeId, replacement: LayoutNode<T>) -> Option<LayoutNode<T>> {
    let slot = find_node_mut(root, id)?;
    Some(std::mem::replace(slot, replacement))
}

/// Clone the in-order leaves of a subtree.
pub fn collect_leafs<T: Clone>(node: &LayoutNode<T>) -> Vec<LayoutNode<T>> {
    let mut leafs = Vec::new();
    node.visit(&mut |n| {
        if n.is_leaf() {
            leafs.push(n.clone());
        }
    });
    leafs
}

/// Normalize a subtree and collect its leaves.
///
/// Empty internal nodes are dropped and single-child nodes are replaced by
/// their child. Every other node survives. Orientation is then made to
/// alternate from the root down, and sibling sizes are rescaled to sum to
/// `DEFAULT_NODE_SIZE`.
pub fn balance_node<T: Clone>(node: LayoutNode<T>) -> Balanced<T> {
    let mut node = balance_subtree(node);
    if let Some(root) = node.as_mut() {
        let direction = root.flex_direction;
        orient_subtree(root, direction);
    }
    let leafs = node.as_ref().map(collect_leafs).unwrap_or_default();
    Balanced { node, leafs }
}

fn balance_subtree<T>(mut node: LayoutNode<T>) -> Option<LayoutNode<T>> {
    if node.is_leaf() {
        return Some(node);
    }
    let children = match &mut node.content {
        NodeContent::Children(children) => std::mem::take(children),
        NodeContent::Leaf(_) => Vec::new(),
    };
    let mut balanced: Vec<LayoutNode<T>> = children.into_iter().filter_map(balance_subtree).collect();

    match balanced.len() {
        0 => {
            log::trace!("Dropping empty node {}", node.id);
            None
        }
        1 => {
            let mut only = balanced.pop()?;
            log::trace!("Collapsing node {} into its only child {}", node.id, only.id);
            only.size = node.size;
            if only.is_leaf() {
                only.flex_direction = node.flex_direction;
            }
            Some(only)
        }
        _ => {
            normalize_sizes(&mut balanced);
            node.content = NodeContent::Children(balanced);
            Some(node)
        }
    }
}

/// Replace non-finite or non-positive sizes with the mean of the valid ones.
fn sanitize_sizes<T>(siblings: &mut [LayoutNode<T>]) {
    let valid: Vec<f32> = siblings
        .iter()
        .map(|s| s.size)
        .filter(|size| size.is_finite() && *size > 0.0)
        .collect();
    if valid.len() == siblings.len() {
        return;
    }
    let fallback = if valid.is_empty() {
        DEFAULT_NODE_SIZE
    } else {
        valid.iter().sum::<f32>() / valid.len() as f32
    };
    for sibling in siblings.iter_mut() {
        if !(sibling.size.is_finite() && sibling.size > 0.0) {
            sibling.size = fallback;
        }
    }
}

fn normalize_sizes<T>(siblings: &mut [LayoutNode<T>]) {
    sanitize_sizes(siblings);
    let total: f32 = siblings.iter().map(|s| s.size).sum();
    if total <= 0.0 || !total.is_finite() || (total - DEFAULT_NODE_SIZE).abs() < SIZE_TOLERANCE {
        return;
    }
    let scale = DEFAULT_NODE_SIZE / total;
    for sibling in siblings.iter_mut() {
        sibling.size *= scale;
    }
}

/// Find where a new leaf should go without restructuring deep subtrees.
///
/// Level-order from the root, siblings visited right to left: the first
/// internal node with fewer than `max_children` children is appended to.
/// If every internal node is full, the shallowest right-most leaf is split
/// (index 1 places the new leaf after it).
pub fn find_next_insert_location<T>(root: &LayoutNode<T>, max_children: usize) -> Option<InsertLocation> {
    let mut shallowest_leaf = None;
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        match &node.content {
            NodeContent::Leaf(_) => {
                if shallowest_leaf.is_none() {
                    shallowest_leaf = Some(node.id);
                }
            }
            NodeContent::Children(children) => {
                if children.len() < max_children {
                    return Some(InsertLocation {
                        node_id: node.id,
                        index: children.len(),
                    });
                }
                queue.extend(children.iter().rev());
            }
        }
    }
    shallowest_leaf.map(|node_id| InsertLocation { node_id, index: 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u64) -> LayoutNode<u64> {
        LayoutNode::leaf(NodeId(id), id)
    }

    fn row(id: u64, children: Vec<LayoutNode<u64>>) -> LayoutNode<u64> {
        LayoutNode::container(NodeId(id), FlexDirection::Row, children)
    }

    fn column(id: u64, children: Vec<LayoutNode<u64>>) -> LayoutNode<u64> {
        LayoutNode::container(NodeId(id), FlexDirection::Column, children)
    }

    fn allocator_for(node: &LayoutNode<u64>) -> NodeIdAllocator {
        let mut ids = NodeIdAllocator::new();
        ids.reserve_subtree(node);
        ids
    }

    fn child_ids(node: &LayoutNode<u64>) -> Vec<u64> {
        node.children().iter().map(|c| c.id.0).collect()
    }

    // ── find_node / find_parent ───────────────────────────────────────

    #[test]
    fn find_node_returns_root() {
        let tree = row(1, vec![leaf(2), leaf(3)]);
        assert_eq!(find_node(&tree, NodeId(1)).map(|n| n.id), Some(NodeId(1)));
    }

    #[test]
    fn find_node_descends_into_children() {
        let tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)])]);
        assert_eq!(find_node(&tree, NodeId(5)).map(|n| n.id), Some(NodeId(5)));
        assert!(find_node(&tree, NodeId(99)).is_none());
    }

    #[test]
    fn find_parent_of_nested_node() {
        let tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)])]);
        assert_eq!(find_parent(&tree, NodeId(4)).map(|n| n.id), Some(NodeId(3)));
        assert_eq!(find_parent(&tree, NodeId(2)).map(|n| n.id), Some(NodeId(1)));
    }

    #[test]
    fn find_parent_of_root_or_missing_is_none() {
        let tree = row(1, vec![leaf(2), leaf(3)]);
        assert!(find_parent(&tree, NodeId(1)).is_none());
        assert!(find_parent(&tree, NodeId(42)).is_none());
    }

    #[test]
    fn find_parent_mut_allows_editing() {
        let mut tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)])]);
        let parent = find_parent_mut(&mut tree, NodeId(5)).unwrap();
        parent.size = 7.0;
        assert_eq!(find_node(&tree, NodeId(3)).unwrap().size, 7.0);
    }

    #[test]
    fn contains_node_includes_self() {
        let tree = column(3, vec![leaf(4), leaf(5)]);
        assert!(contains_node(&tree, NodeId(3)));
        assert!(contains_node(&tree, NodeId(5)));
        assert!(!contains_node(&tree, NodeId(1)));
    }

    // ── add_child_at ──────────────────────────────────────────────────

    #[test]
    fn add_child_at_clamps_index() {
        let mut tree = row(1, vec![leaf(2), leaf(3)]);
        let mut ids = allocator_for(&tree);
        add_child_at(&mut tree, 99, leaf(4), &mut ids);
        assert_eq!(child_ids(&tree), vec![2, 3, 4]);
    }

    #[test]
    fn add_child_at_front() {
        let mut tree = row(1, vec![leaf(2), leaf(3)]);
        let mut ids = allocator_for(&tree);
        add_child_at(&mut tree, 0, leaf(4), &mut ids);
        assert_eq!(child_ids(&tree), vec![4, 2, 3]);
    }

    #[test]
    fn add_child_at_orients_and_sizes_new_child() {
        let mut tree = row(1, vec![leaf(2).with_size(30.0), leaf(3).with_size(70.0)]);
        let mut ids = allocator_for(&tree);
        add_child_at(&mut tree, 2, leaf(4).with_flex_direction(FlexDirection::Row), &mut ids);
        let added = find_node(&tree, NodeId(4)).unwrap();
        assert_eq!(added.flex_direction, FlexDirection::Column);
        assert_eq!(added.size, 50.0);
    }

    #[test]
    fn add_child_at_reorients_grafted_subtree() {
        let mut tree = row(1, vec![leaf(2), leaf(3)]);
        let mut ids = allocator_for(&tree);
        add_child_at(&mut tree, 1, row(4, vec![leaf(5), column(6, vec![leaf(7), leaf(8)])]), &mut ids);
        assert_eq!(child_ids(&tree), vec![2, 4, 3]);
        let grafted = find_node(&tree, NodeId(4)).unwrap();
        assert_eq!(grafted.flex_direction, FlexDirection::Column);
        assert_eq!(find_node(&tree, NodeId(6)).unwrap().flex_direction, FlexDirection::Row);
        assert_eq!(find_node(&tree, NodeId(7)).unwrap().flex_direction, FlexDirection::Column);
    }

    #[test]
    fn add_child_at_leaf_wraps_it_first() {
        let mut tree = leaf(1).with_flex_direction(FlexDirection::Column);
        let mut ids = allocator_for(&tree);
        add_child_at(&mut tree, 0, leaf(2), &mut ids);
        assert!(!tree.is_leaf());
        assert_eq!(tree.id, NodeId::generated(1));
        assert_eq!(tree.flex_direction, FlexDirection::Column);
        assert_eq!(child_ids(&tree), vec![2, 1]);
    }

    // ── remove_child ──────────────────────────────────────────────────

    #[test]
    fn remove_child_by_id() {
        let mut tree = row(1, vec![leaf(2), leaf(3), leaf(4)]);
        let removed = remove_child(&mut tree, NodeId(3), 0);
        assert_eq!(removed.map(|n| n.id), Some(NodeId(3)));
        assert_eq!(child_ids(&tree), vec![2, 4]);
    }

    #[test]
    fn remove_child_honors_start_index() {
        // Simulates a same-parent move: the fresh copy of 4 sits at index 0.
        let mut tree = row(1, vec![leaf(4), leaf(2), leaf(3), leaf(4)]);
        remove_child(&mut tree, NodeId(4), 1);
        assert_eq!(child_ids(&tree), vec![4, 2, 3]);
    }

    #[test]
    fn remove_child_missing_is_none() {
        let mut tree = row(1, vec![leaf(2), leaf(3)]);
        assert!(remove_child(&mut tree, NodeId(9), 0).is_none());
        assert!(remove_child(&mut tree, NodeId(2), 1).is_none());
        let mut single = leaf(5);
        assert!(remove_child(&mut single, NodeId(5), 0).is_none());
    }

    // ── add_intermediate_node ─────────────────────────────────────────

    #[test]
    fn intermediate_node_keeps_leaf_identity() {
        let mut node = leaf(1).with_size(40.0);
        add_intermediate_node(&mut node, NodeId(10), FlexDirection::Row);
        assert_eq!(node.id, NodeId(10));
        assert_eq!(node.size, 40.0);
        assert_eq!(child_ids(&node), vec![1]);
        assert_eq!(node.children()[0].flex_direction, FlexDirection::Column);
    }

    #[test]
    fn intermediate_node_keeps_internal_orientation() {
        let mut node = row(1, vec![leaf(2), leaf(3)]);
        add_intermediate_node(&mut node, NodeId(10), FlexDirection::Column);
        assert_eq!(node.flex_direction, FlexDirection::Column);
        assert_eq!(node.children()[0].flex_direction, FlexDirection::Row);
    }

    // ── node paths ────────────────────────────────────────────────────

    #[test]
    fn node_path_follows_child_indices() {
        let tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)])]);
        assert_eq!(node_path(&tree, NodeId(1)), Some(vec![]));
        assert_eq!(node_path(&tree, NodeId(5)), Some(vec![1, 1]));
        assert_eq!(node_path(&tree, NodeId(9)), None);
    }

    #[test]
    fn disjoint_pair_borrows_both_nodes() {
        let mut tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)])]);
        let (a, b) = disjoint_pair_mut(&mut tree, &[1, 1], &[0]).unwrap();
        assert_eq!((a.id, b.id), (NodeId(5), NodeId(2)));
        std::mem::swap(a, b);
        assert_eq!(tree.leaf_ids(), vec![NodeId(5), NodeId(4), NodeId(2)]);
    }

    #[test]
    fn disjoint_pair_rejects_nested_paths() {
        let mut tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)])]);
        assert!(disjoint_pair_mut(&mut tree, &[1], &[1, 0]).is_none());
        assert!(disjoint_pair_mut(&mut tree, &[0], &[0]).is_none());
    }

    // ── replace_node ──────────────────────────────────────────────────

    #[test]
    fn replace_node_returns_previous_subtree() {
        let mut tree = row(1, vec![leaf(2), leaf(3)]);
        let old = replace_node(&mut tree, NodeId(3), leaf(9));
        assert_eq!(old.map(|n| n.id), Some(NodeId(3)));
        assert_eq!(child_ids(&tree), vec![2, 9]);
        assert!(replace_node(&mut tree, NodeId(3), leaf(8)).is_none());
    }

    // ── balance_node ──────────────────────────────────────────────────

    #[test]
    fn balance_collapses_single_child_chain() {
        let tree = row(1, vec![column(2, vec![row(3, vec![leaf(4)])])]);
        let balanced = balance_node(tree);
        let node = balanced.node.unwrap();
        assert_eq!(node.id, NodeId(4));
        assert!(node.is_leaf());
        assert_eq!(balanced.leafs.len(), 1);
    }

    #[test]
    fn balance_drops_empty_nodes() {
        let tree = row(1, vec![column(2, vec![]), leaf(3), leaf(4)]);
        let node = balance_node(tree).node.unwrap();
        assert_eq!(child_ids(&node), vec![3, 4]);
    }

    #[test]
    fn balance_of_empty_container_is_none() {
        let balanced = balance_node(row(1, vec![]));
        assert!(balanced.node.is_none());
        assert!(balanced.leafs.is_empty());
    }

    #[test]
    fn balance_reorients_same_orientation_child() {
        let tree = row(
            1,
            vec![
                leaf(2).with_size(50.0),
                row(3, vec![leaf(4), leaf(5)]).with_size(50.0),
            ],
        );
        let node = balance_node(tree).node.unwrap();
        assert_eq!(child_ids(&node), vec![2, 3]);
        let inner = find_node(&node, NodeId(3)).unwrap();
        assert_eq!(inner.flex_direction, FlexDirection::Column);
        assert_eq!(child_ids(inner), vec![4, 5]);
        for child in inner.children() {
            assert_eq!(child.flex_direction, FlexDirection::Row);
        }
    }

    #[test]
    fn balance_keeps_collapsed_internal_root_orientation() {
        let tree = row(1, vec![column(2, vec![leaf(3), leaf(4)])]);
        let node = balance_node(tree).node.unwrap();
        assert_eq!(node.id, NodeId(2));
        assert_eq!(node.flex_direction, FlexDirection::Column);
    }

    #[test]
    fn balance_reorients_collapsed_internal_child() {
        // Column(3) collapses into Row(7), which then sits directly under Row(1).
        let tree = row(1, vec![leaf(2), column(3, vec![row(7, vec![leaf(8), leaf(9)])])]);
        let node = balance_node(tree).node.unwrap();
        assert_eq!(child_ids(&node), vec![2, 7]);
        assert_eq!(find_node(&node, NodeId(7)).unwrap().flex_direction, FlexDirection::Column);
        assert!(find_node(&node, NodeId(3)).is_none());
    }

    #[test]
    fn balance_normalizes_sizes() {
        let tree = row(1, vec![leaf(2).with_size(1.0), leaf(3).with_size(3.0)]);
        let node = balance_node(tree).node.unwrap();
        let sizes: Vec<f32> = node.children().iter().map(|c| c.size).collect();
        assert_eq!(sizes, vec![25.0, 75.0]);
    }

    #[test]
    fn balance_repairs_invalid_sizes() {
        let tree = row(
            1,
            vec![leaf(2).with_size(f32::NAN), leaf(3).with_size(-4.0), leaf(4).with_size(10.0)],
        );
        let node = balance_node(tree).node.unwrap();
        for child in node.children() {
            assert!((child.size - DEFAULT_NODE_SIZE / 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn balance_orients_leaves_against_parent() {
        let tree = column(
            1,
            vec![leaf(2).with_flex_direction(FlexDirection::Column), leaf(3)],
        );
        let node = balance_node(tree).node.unwrap();
        for child in node.children() {
            assert_eq!(child.flex_direction, FlexDirection::Row);
        }
    }

    #[test]
    fn balance_collects_leafs_in_order() {
        let tree = row(1, vec![leaf(2), column(3, vec![leaf(4), leaf(5)]), leaf(6)]);
        let balanced = balance_node(tree);
        let ids: Vec<u64> = balanced.leafs.iter().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![2, 4, 5, 6]);
    }

    #[test]
    fn collapsed_child_inherits_slot_size() {
        let tree = row(1, vec![leaf(2).with_size(75.0), column(3, vec![leaf(4)]).with_size(25.0)]);
        let node = balance_node(tree).node.unwrap();
        let collapsed = find_node(&node, NodeId(4)).unwrap();
        assert_eq!(collapsed.size, 25.0);
        assert_eq!(collapsed.flex_direction, FlexDirection::Column);
    }

    // ── find_next_insert_location ─────────────────────────────────────

    #[test]
    fn insert_location_for_leaf_root_splits_it() {
        let tree = leaf(1);
        let loc = find_next_insert_location(&tree, 5).unwrap();
        assert_eq!(loc, InsertLocation { node_id: NodeId(1), index: 1 });
    }

    #[test]
    fn insert_location_appends_to_underfull_root() {
        let tree = row(1, vec![leaf(2), leaf(3)]);
        let loc = find_next_insert_location(&tree, 5).unwrap();
        assert_eq!(loc, InsertLocation { node_id: NodeId(1), index: 2 });
    }

    #[test]
    fn insert_location_prefers_shallow_underfull_node() {
        let tree = row(
            1,
            vec![leaf(2), column(3, vec![leaf(4), leaf(5)]), leaf(6)],
        );
        let loc = find_next_insert_location(&tree, 3).unwrap();
        assert_eq!(loc, InsertLocation { node_id: NodeId(3), index: 2 });
    }

    #[test]
    fn insert_location_splits_rightmost_shallow_leaf_when_full() {
        let tree = row(1, vec![leaf(2), leaf(3)]);
        let loc = find_next_insert_location(&tree, 2).unwrap();
        assert_eq!(loc, InsertLocation { node_id: NodeId(3), index: 1 });
    }
}
