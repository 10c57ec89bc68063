// DragInteraction state machine for pointer-driven node moves.

use super::drop::DropDirection;
use super::geometry::{determine_drop_direction, Rect};
use super::reducer::LayoutTreeAction;
use super::NodeId;
use crate::config::DropZoneConfig;

/// The drop zone currently under the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropHover {
    pub target: NodeId,
    pub direction: DropDirection,
}

/// The current state of a drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    Idle,
    /// A node is being dragged.
    Dragging {
        node_id: NodeId,
        /// Zone the last ComputeMove was emitted for.
        hover: Option<DropHover>,
    },
}

/// Turns raw pointer events into reducer actions.
///
/// Each hover change stages a move with `ComputeMove`; releasing commits it.
/// The caller dispatches the returned actions to its `LayoutTreeState`.
pub struct DragInteraction {
    state: DragState,
    zones: DropZoneConfig,
}

impl DragInteraction {
    pub fn new(zones: DropZoneConfig) -> Self {
        Self {
            state: DragState::Idle,
            zones,
        }
    }

    /// Get the current drag state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start dragging `node_id`. Any gesture already in progress is dropped.
    pub fn begin(&mut self, node_id: NodeId) {
        log::debug!("Drag started on {node_id}");
        self.state = DragState::Dragging { node_id, hover: None };
    }

    /// Process a cursor move against the current leaf layout.
    ///
    /// Returns an action only when the hovered zone changes.
    pub fn on_cursor_moved<T>(&mut self, x: f32, y: f32, layout: &[(NodeId, Rect)]) -> Option<LayoutTreeAction<T>> {
        let DragState::Dragging { node_id, hover } = &mut self.state else {
            return None;
        };
        let dragged = *node_id;

        let next = layout
            .iter()
            .find(|(id, rect)| *id != dragged && rect.contains_point(x, y))
            .and_then(|&(target, rect)| {
                determine_drop_direction(rect, x, y, &self.zones).map(|direction| DropHover { target, direction })
            });

        if next == *hover {
            return None;
        }
        let previous = std::mem::replace(hover, next);
        match next {
            Some(h) => Some(LayoutTreeAction::ComputeMove {
                node: h.target,
                node_to_move: dragged,
                direction: h.direction,
            }),
            None if previous.is_some() => Some(LayoutTreeAction::ClearPendingAction),
            None => None,
        }
    }

    /// Finish the gesture, committing the staged move if a zone is hovered.
    pub fn on_release<T>(&mut self) -> Option<LayoutTreeAction<T>> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => None,
            DragState::Dragging { hover: Some(h), node_id } => {
                log::debug!("Drag of {node_id} released over {} ({:?})", h.target, h.direction);
                Some(LayoutTreeAction::CommitPendingAction)
            }
            DragState::Dragging { hover: None, .. } => Some(LayoutTreeAction::ClearPendingAction),
        }
    }

    /// Abort the gesture and discard any staged move.
    pub fn cancel<T>(&mut self) -> Option<LayoutTreeAction<T>> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => None,
            DragState::Dragging { .. } => Some(LayoutTreeAction::ClearPendingAction),
        }
    }
}

impl Default for DragInteraction {
    fn default() -> Self {
        Self::new(DropZoneConfig::default())
    }
}
