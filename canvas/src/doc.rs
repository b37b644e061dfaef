//! Document model: walls, windows, doors, and the in-memory entity store.
//!
//! This module defines the entities that make up a floor plan (`Wall`,
//! `Window`, `Door`), sparse-update types for property edits (`PartialWall`,
//! `PartialWindow`, `PartialDoor`), the value-type `Snapshot` of all three
//! collections, and the runtime store that owns them (`DocStore`).
//!
//! Windows and doors reference their host wall by id. The store never
//! produces a dangling reference itself (removing a wall cascades), but
//! readers must still tolerate one: a caller may insert with a bad `wall_id`.
//! Collections keep insertion order, which is also hit-test priority order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DOOR_COLOR, WINDOW_COLOR};
use crate::geom::{self, Segment};

/// Unique identifier for a floor-plan entity.
pub type ObjectId = Uuid;

/// The kind of a floor-plan entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Wall,
    Window,
    Door,
}

/// Side a door swings toward, relative to the wall direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenDirection {
    Left,
    #[default]
    Right,
}

/// A straight wall between two world-space points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: ObjectId,
    pub start: Point,
    pub end: Point,
    /// Drawn thickness in world units.
    pub thickness: f64,
}

impl Wall {
    #[must_use]
    pub fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.segment().length()
    }

    /// Direction angle in radians; `0.0` for a zero-length wall.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.segment().angle()
    }

    /// World point at parameter `t` along the wall (not clamped).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        self.segment().point_at(t)
    }

    /// Clamped parameter of the projection of `point` onto the wall.
    #[must_use]
    pub fn position_of(&self, point: Point) -> f64 {
        self.segment().parametric_position(point)
    }

    /// Whether windows and doors on this wall are drawn, hit-tested, or placed.
    /// A zero-length wall hosts none.
    #[must_use]
    pub fn hosts_openings(&self) -> bool {
        let length = self.length();
        length > 0.0 && length.is_finite()
    }

    /// Parametric span of an opening hosted on this wall; see [`geom::opening_span`].
    #[must_use]
    pub fn opening_span(&self, position: f64, width: f64) -> Option<(f64, f64)> {
        geom::opening_span(position, width, self.length())
    }
}

/// A window hosted on a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: ObjectId,
    pub wall_id: ObjectId,
    /// Parametric position of the window center along the host wall, in `[0, 1]`.
    pub position: f64,
    /// Width in world units.
    pub width: f64,
    /// CSS color string. Older documents lack it and get the default.
    #[serde(default = "default_window_color")]
    pub color: String,
}

/// A door hosted on a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub id: ObjectId,
    pub wall_id: ObjectId,
    /// Parametric position of the door center along the host wall, in `[0, 1]`.
    pub position: f64,
    /// Width in world units.
    pub width: f64,
    #[serde(default)]
    pub open_direction: OpenDirection,
    /// CSS color string. Older documents lack it and get the default.
    #[serde(default = "default_door_color")]
    pub color: String,
}

pub(crate) fn default_window_color() -> String {
    WINDOW_COLOR.to_string()
}

pub(crate) fn default_door_color() -> String {
    DOOR_COLOR.to_string()
}

/// Sparse update for a wall. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialWall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    /// Ignored unless finite and positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

/// Sparse update for a window. Only present fields are applied.
///
/// The host wall is fixed at creation; moving an opening to another wall is
/// a delete followed by an add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialWindow {
    /// Clamped into `[0, 1]` when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    /// Ignored unless finite and positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Sparse update for a door. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDoor {
    /// Clamped into `[0, 1]` when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    /// Ignored unless finite and positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_direction: Option<OpenDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Value copy of the three entity collections, used for history and persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub walls: Vec<Wall>,
    pub windows: Vec<Window>,
    pub doors: Vec<Door>,
}

impl Snapshot {
    /// Total number of entities across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len() + self.windows.len() + self.doors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clamp a parametric position into `[0, 1]`; non-finite input maps to the wall midpoint.
#[must_use]
pub fn clamp_position(position: f64) -> f64 {
    if position.is_finite() { position.clamp(0.0, 1.0) } else { 0.5 }
}

/// Whether a width or thickness value is usable.
#[must_use]
pub fn is_valid_extent(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// In-memory store of floor-plan entities.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    walls: Vec<Wall>,
    windows: Vec<Window>,
    doors: Vec<Door>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Reads ---

    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    #[must_use]
    pub fn wall(&self, id: &ObjectId) -> Option<&Wall> {
        self.walls.iter().find(|w| &w.id == id)
    }

    #[must_use]
    pub fn window(&self, id: &ObjectId) -> Option<&Window> {
        self.windows.iter().find(|w| &w.id == id)
    }

    #[must_use]
    pub fn door(&self, id: &ObjectId) -> Option<&Door> {
        self.doors.iter().find(|d| &d.id == id)
    }

    /// Whether an entity of `kind` with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &ObjectId, kind: ObjectKind) -> bool {
        match kind {
            ObjectKind::Wall => self.wall(id).is_some(),
            ObjectKind::Window => self.window(id).is_some(),
            ObjectKind::Door => self.door(id).is_some(),
        }
    }

    /// Windows hosted on `wall_id`, in insertion order.
    pub fn windows_on<'a>(&'a self, wall_id: &'a ObjectId) -> impl Iterator<Item = &'a Window> + 'a {
        self.windows.iter().filter(move |w| &w.wall_id == wall_id)
    }

    /// Doors hosted on `wall_id`, in insertion order.
    pub fn doors_on<'a>(&'a self, wall_id: &'a ObjectId) -> impl Iterator<Item = &'a Door> + 'a {
        self.doors.iter().filter(move |d| &d.wall_id == wall_id)
    }

    // --- Inserts ---

    pub fn insert_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    /// Append a window. The host reference is not checked.
    pub fn insert_window(&mut self, window: Window) {
        self.windows.push(window);
    }

    /// Append a door. The host reference is not checked.
    pub fn insert_door(&mut self, door: Door) {
        self.doors.push(door);
    }

    // --- Updates ---

    /// Merge `partial` into the wall with `id`. Returns true only if a field changed.
    pub fn update_wall(&mut self, id: &ObjectId, partial: &PartialWall) -> bool {
        let Some(wall) = self.walls.iter_mut().find(|w| &w.id == id) else {
            return false;
        };
        let before = wall.clone();
        if let Some(start) = partial.start {
            wall.start = start;
        }
        if let Some(end) = partial.end {
            wall.end = end;
        }
        if let Some(t) = partial.thickness.filter(|t| is_valid_extent(*t)) {
            wall.thickness = t;
        }
        *wall != before
    }

    /// Merge `partial` into the window with `id`. Returns true only if a field changed.
    pub fn update_window(&mut self, id: &ObjectId, partial: &PartialWindow) -> bool {
        let Some(window) = self.windows.iter_mut().find(|w| &w.id == id) else {
            return false;
        };
        let before = window.clone();
        if let Some(p) = partial.position {
            window.position = clamp_position(p);
        }
        if let Some(w) = partial.width.filter(|w| is_valid_extent(*w)) {
            window.width = w;
        }
        if let Some(ref color) = partial.color {
            window.color.clone_from(color);
        }
        *window != before
    }

    /// Merge `partial` into the door with `id`. Returns true only if a field changed.
    pub fn update_door(&mut self, id: &ObjectId, partial: &PartialDoor) -> bool {
        let Some(door) = self.doors.iter_mut().find(|d| &d.id == id) else {
            return false;
        };
        let before = door.clone();
        if let Some(p) = partial.position {
            door.position = clamp_position(p);
        }
        if let Some(w) = partial.width.filter(|w| is_valid_extent(*w)) {
            door.width = w;
        }
        if let Some(dir) = partial.open_direction {
            door.open_direction = dir;
        }
        if let Some(ref color) = partial.color {
            door.color.clone_from(color);
        }
        *door != before
    }

    // --- Removes ---

    /// Remove a wall and every window and door hosted on it.
    ///
    /// Returns the ids of all removed entities, wall first; empty if the wall
    /// doesn't exist.
    pub fn remove_wall(&mut self, id: &ObjectId) -> Vec<ObjectId> {
        let Some(idx) = self.walls.iter().position(|w| &w.id == id) else {
            return Vec::new();
        };
        let wall = self.walls.remove(idx);
        let mut removed = vec![wall.id];
        self.windows.retain(|w| {
            let hosted = w.wall_id == wall.id;
            if hosted {
                removed.push(w.id);
            }
            !hosted
        });
        self.doors.retain(|d| {
            let hosted = d.wall_id == wall.id;
            if hosted {
                removed.push(d.id);
            }
            !hosted
        });
        removed
    }

    /// Remove a window, returning it if it was present.
    pub fn remove_window(&mut self, id: &ObjectId) -> Option<Window> {
        let idx = self.windows.iter().position(|w| &w.id == id)?;
        Some(self.windows.remove(idx))
    }

    /// Remove a door, returning it if it was present.
    pub fn remove_door(&mut self, id: &ObjectId) -> Option<Door> {
        let idx = self.doors.iter().position(|d| &d.id == id)?;
        Some(self.doors.remove(idx))
    }

    /// Remove an entity of `kind`, cascading for walls. Returns the removed ids.
    pub fn remove(&mut self, id: &ObjectId, kind: ObjectKind) -> Vec<ObjectId> {
        match kind {
            ObjectKind::Wall => self.remove_wall(id),
            ObjectKind::Window => self.remove_window(id).map(|w| w.id).into_iter().collect(),
            ObjectKind::Door => self.remove_door(id).map(|d| d.id).into_iter().collect(),
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.walls.clear();
        self.windows.clear();
        self.doors.clear();
    }

    // --- Snapshots ---

    /// Copy out all three collections.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { walls: self.walls.clone(), windows: self.windows.clone(), doors: self.doors.clone() }
    }

    /// Replace all three collections with a snapshot.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.walls = snapshot.walls;
        self.windows = snapshot.windows;
        self.doors = snapshot.doors;
    }

    /// Number of entities currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len() + self.windows.len() + self.doors.len()
    }

    /// Returns `true` if the store contains no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
