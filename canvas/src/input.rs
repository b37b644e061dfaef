//! Editor modes and raw input events.
//!
//! `Tool` is the editing mode that decides what a primary click means.
//! Pointer, wheel, and key events arrive as `Button`, `WheelDelta`, and `Key`
//! plus the `Modifiers` held at the time. `UiState` is the non-undoable
//! editor state the scene builder reads (tool, selection, pending wall
//! anchor, hover); `InputState` is the drag in progress between pointer-down
//! and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{ObjectId, ObjectKind};

/// Editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pick walls, windows, and doors for editing.
    Select,
    /// Draw chained walls with successive grid-snapped clicks (default).
    #[default]
    Wall,
    /// Place a window on the wall under the pointer.
    Window,
    /// Place a door on the wall under the pointer.
    Door,
    /// Drag the viewport.
    Pan,
}

impl Tool {
    /// Parse a tool name as used by the toolbar and scripts.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "select" => Some(Self::Select),
            "wall" => Some(Self::Wall),
            "window" => Some(Self::Window),
            "door" => Some(Self::Door),
            "pan" => Some(Self::Pan),
            _ => None,
        }
    }

    /// Whether this tool highlights the wall under the pointer.
    #[must_use]
    pub fn hovers_walls(self) -> bool {
        matches!(self, Self::Select | Self::Window | Self::Door)
    }
}

/// Modifier keys held while an event fired.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Turns undo into redo with `z`.
    pub shift: bool,
    pub ctrl: bool,
    /// Option on macOS; starts a pan drag with the primary button.
    pub alt: bool,
    /// Command on macOS.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button that went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Runs the active tool.
    Primary,
    /// Always pans.
    Middle,
    /// Cancels a pending wall anchor.
    Secondary,
}

/// Key name as the host reports it, e.g. `"Delete"`, `"Escape"`, `"w"`, `" "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Scroll distance of a wheel or trackpad event, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down, and zooms out when combined with Ctrl/Meta.
    pub dy: f64,
}

/// The selected entity. Id and kind always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

/// Editor state outside the document; never recorded in history.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The selected entity, if any.
    pub selection: Option<Selection>,
    /// Anchor of a wall being drawn; the next wall click commits from here.
    pub temp_wall_start: Option<Point>,
    /// Wall under the pointer for hover highlighting.
    pub hovered_wall: Option<ObjectId>,
    /// Last known pointer position in world space.
    pub cursor_world: Option<Point>,
}

/// Drag in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    #[default]
    Idle,
    /// Viewport drag; each move pans by the delta from `last_screen`.
    Panning { last_screen: Point },
}
