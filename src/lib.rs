//! Tiling layout engine.
//!
//! A layout is an n-ary tree whose leaves carry host data and whose internal
//! nodes split their space along alternating flex directions. All edits go
//! through [`LayoutTreeState::apply`], which keeps the tree balanced.

pub mod config;
pub mod error;
pub mod layout;

pub use config::{ConfigError, DropZoneConfig, LayoutConfig};
pub use error::LayoutError;
pub use layout::drop::DropDirection;
pub use layout::geometry::{compute_layout, determine_drop_direction, Rect};
pub use layout::interaction::{DragInteraction, DragState, DropHover};
pub use layout::reducer::{reduce, LayoutTreeAction, LayoutTreeState, ResizeOperation};
pub use layout::{FlexDirection, LayoutNode, NodeContent, NodeId, NodeIdAllocator, DEFAULT_NODE_SIZE};
