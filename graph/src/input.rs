//! Input model: pointer buttons and the drag gesture state machine.
//!
//! A gesture starts when the primary button goes down on a node. Until the
//! button comes up the pointer owns that node's position. Whether the gesture
//! was a drag or a click is decided on release from the session's `moved`
//! flag, which flips once the pointer leaves a small slop circle around where
//! the press started.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::DRAG_SLOP_PX;
use crate::geom::Point;
use crate::note::NoteId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// A press on a node that has not been released yet.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Node under the pointer at press time.
    pub node_id: NoteId,
    /// Pointer position at press time.
    pub origin: Point,
    /// Whether the pointer has left the slop circle since the press.
    pub moved: bool,
}

impl DragSession {
    #[must_use]
    pub fn new(node_id: NoteId, origin: Point) -> Self {
        Self { node_id, origin, moved: false }
    }

    /// Record a pointer position. Once moved, a session stays moved.
    pub fn track(&mut self, point: Point) {
        if !self.moved && self.origin.distance(point) > DRAG_SLOP_PX {
            self.moved = true;
        }
    }

    /// A release without movement is a click on the node.
    #[must_use]
    pub fn is_click(&self) -> bool {
        !self.moved
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The primary button is down on a node.
    Dragging(DragSession),
}

impl InputState {
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}
