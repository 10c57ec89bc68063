// Layout engine: n-ary tree of flex-sized panes and the reducer that edits it.

pub mod drop;
pub mod geometry;
pub mod interaction;
pub mod reducer;
pub mod tree;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total that the sizes of a group of siblings are normalized to.
pub const DEFAULT_NODE_SIZE: f32 = 100.0;

/// Tag bit marking ids minted by a tree's own allocator.
const GENERATED_BIT: u64 = 1 << 63;

/// Unique identifier for a node in a layout tree.
///
/// Hosts own the ids below `2^63`. Containers the engine creates for itself
/// (splits, root wrappers) get ids with the top bit set, so sequential host
/// ids can never collide with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The `n`-th id in the engine-generated namespace.
    pub const fn generated(n: u64) -> Self {
        NodeId(GENERATED_BIT | n)
    }

    /// Whether this id was minted by a `NodeIdAllocator`.
    pub fn is_generated(self) -> bool {
        self.0 & GENERATED_BIT != 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_generated() {
            write!(f, "#g{}", self.0 & !GENERATED_BIT)
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Monotonic generator for engine-owned node ids, one per tree.
///
/// It only hands out ids in the generated namespace. `reserve` moves the
/// counter past generated ids that come back into the tree (deserialized
/// state, moved subtrees); host ids are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdAllocator {
    next: u64,
}

impl NodeIdAllocator {
    /// Create an allocator whose first id is `NodeId::generated(1)`.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Generate a new unique NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId::generated(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Make sure a generated `id` (and everything below it) is never handed out again.
    pub fn reserve(&mut self, id: NodeId) {
        if !id.is_generated() {
            return;
        }
        let n = id.0 & !GENERATED_BIT;
        if n >= self.next {
            self.next = n.saturating_add(1);
        }
    }

    /// Reserve every id in the subtree rooted at `node`.
    pub fn reserve_subtree<T>(&mut self, node: &LayoutNode<T>) {
        self.reserve(node.id);
        for child in node.children() {
            self.reserve_subtree(child);
        }
    }

    /// The id the next call to `next_id` will return.
    pub fn peek(&self) -> NodeId {
        NodeId::generated(self.next)
    }
}

impl Default for NodeIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Orientation used to lay out a node's children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    /// Children side by side, left to right.
    #[default]
    Row,
    /// Children stacked, top to bottom.
    Column,
}

impl FlexDirection {
    /// The perpendicular orientation.
    pub fn reverse(self) -> Self {
        match self {
            FlexDirection::Row => FlexDirection::Column,
            FlexDirection::Column => FlexDirection::Row,
        }
    }
}

/// What a node holds: either a content payload or its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeContent<T> {
    /// A leaf carrying the identifier of a content pane.
    Leaf(T),
    /// An internal node. Fewer than two children only exists transiently.
    Children(Vec<LayoutNode<T>>),
}

/// A node in the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode<T> {
    pub id: NodeId,
    pub content: NodeContent<T>,
    pub flex_direction: FlexDirection,
    /// Flex weight relative to the node's siblings.
    pub size: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl<T> LayoutNode<T> {
    /// Create a new leaf node.
    pub fn leaf(id: NodeId, data: T) -> Self {
        Self {
            id,
            content: NodeContent::Leaf(data),
            flex_direction: FlexDirection::default(),
            size: DEFAULT_NODE_SIZE,
            visible: true,
        }
    }

    /// Create a new internal node over `children`.
    pub fn container(id: NodeId, flex_direction: FlexDirection, children: Vec<LayoutNode<T>>) -> Self {
        Self {
            id,
            content: NodeContent::Children(children),
            flex_direction,
            size: DEFAULT_NODE_SIZE,
            visible: true,
        }
    }

    pub fn with_flex_direction(mut self, flex_direction: FlexDirection) -> Self {
        self.flex_direction = flex_direction;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Check if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, NodeContent::Leaf(_))
    }

    /// Get the payload if this is a leaf node.
    pub fn data(&self) -> Option<&T> {
        match &self.content {
            NodeContent::Leaf(data) => Some(data),
            NodeContent::Children(_) => None,
        }
    }

    /// Children of an internal node; empty for a leaf.
    pub fn children(&self) -> &[LayoutNode<T>] {
        match &self.content {
            NodeContent::Leaf(_) => &[],
            NodeContent::Children(children) => children,
        }
    }

    /// Mutable children, or None for a leaf.
    pub fn children_mut(&mut self) -> Option<&mut Vec<LayoutNode<T>>> {
        match &mut self.content {
            NodeContent::Leaf(_) => None,
            NodeContent::Children(children) => Some(children),
        }
    }

    /// Count the number of leaf nodes in this subtree.
    pub fn leaf_count(&self) -> usize {
        match &self.content {
            NodeContent::Leaf(_) => 1,
            NodeContent::Children(children) => children.iter().map(LayoutNode::leaf_count).sum(),
        }
    }

    /// Collect all leaf ids in this subtree, in order.
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.visit(&mut |node| {
            if node.is_leaf() {
                ids.push(node.id);
            }
        });
        ids
    }

    /// Collect the ids of every node in this subtree, pre-order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.visit(&mut |node| ids.push(node.id));
        ids
    }

    /// Id of the first leaf in this subtree.
    pub fn first_leaf_id(&self) -> Option<NodeId> {
        match &self.content {
            NodeContent::Leaf(_) => Some(self.id),
            NodeContent::Children(children) => children.iter().find_map(LayoutNode::first_leaf_id),
        }
    }

    /// Pre-order walk over the subtree.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a LayoutNode<T>)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }
}
