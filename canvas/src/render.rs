//! Scene building: a world-space description of what the presentation layer draws.
//!
//! This module is the only place that turns document and UI state into
//! drawable geometry. It receives read-only views and produces a [`Scene`];
//! it does not mutate any application state. Visual styling (stroke widths,
//! fills, icons) stays with the host.
//!
//! Opening spans are recomputed from the host wall on every build, so moving
//! or resizing a wall is reflected without touching its windows and doors.
//! Openings whose host wall is missing or has zero length are skipped.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::FRAC_PI_2;

use crate::camera::Point;
use crate::doc::{DocStore, ObjectId, ObjectKind, OpenDirection, Wall};
use crate::engine::Settings;
use crate::geom::{self, Segment};
use crate::input::{Tool, UiState};

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub walls: Vec<WallItem>,
    pub openings: Vec<OpeningItem>,
    /// Live segment from the wall anchor to the snapped cursor.
    pub preview: Option<Segment>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallItem {
    pub id: ObjectId,
    pub segment: Segment,
    pub thickness: f64,
    pub selected: bool,
    pub hovered: bool,
}

/// A window or door, resolved against its host wall.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningItem {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub wall_id: ObjectId,
    /// The clamped span along the wall.
    pub span: Segment,
    /// Thickness of the host wall, so the opening can cut it cleanly.
    pub thickness: f64,
    pub color: String,
    pub selected: bool,
    /// Door leaf swing; `None` for windows.
    pub swing: Option<Swing>,
}

/// Quarter-circle swing of a door leaf, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    pub hinge: Point,
    /// End of the fully open leaf.
    pub leaf_end: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Entity counts for the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub walls: usize,
    pub windows: usize,
    pub doors: usize,
}

/// Build the scene for the current document and UI state.
#[must_use]
pub fn build_scene(doc: &DocStore, ui: &UiState, settings: &Settings) -> Scene {
    let is_selected = |id: ObjectId, kind: ObjectKind| ui.selection.is_some_and(|s| s.id == id && s.kind == kind);

    let walls = doc
        .walls()
        .iter()
        .map(|w| WallItem {
            id: w.id,
            segment: w.segment(),
            thickness: w.thickness,
            selected: is_selected(w.id, ObjectKind::Wall),
            hovered: ui.hovered_wall == Some(w.id),
        })
        .collect();

    let mut openings = Vec::with_capacity(doc.windows().len() + doc.doors().len());
    for window in doc.windows() {
        let Some((wall, span)) = resolve_span(doc, &window.wall_id, window.position, window.width) else {
            continue;
        };
        openings.push(OpeningItem {
            id: window.id,
            kind: ObjectKind::Window,
            wall_id: window.wall_id,
            span,
            thickness: wall.thickness,
            color: window.color.clone(),
            selected: is_selected(window.id, ObjectKind::Window),
            swing: None,
        });
    }
    for door in doc.doors() {
        let Some((wall, span)) = resolve_span(doc, &door.wall_id, door.position, door.width) else {
            continue;
        };
        openings.push(OpeningItem {
            id: door.id,
            kind: ObjectKind::Door,
            wall_id: door.wall_id,
            span,
            thickness: wall.thickness,
            color: door.color.clone(),
            selected: is_selected(door.id, ObjectKind::Door),
            swing: Some(door_swing(span, wall.angle(), door.open_direction)),
        });
    }

    let preview = match (ui.tool, ui.temp_wall_start, ui.cursor_world) {
        (Tool::Wall, Some(anchor), Some(cursor)) => {
            Some(Segment::new(anchor, geom::snap_to_grid(cursor, settings.grid_size)))
        }
        _ => None,
    };

    Scene {
        walls,
        openings,
        preview,
        stats: Stats { walls: doc.walls().len(), windows: doc.windows().len(), doors: doc.doors().len() },
    }
}

fn resolve_span<'a>(doc: &'a DocStore, wall_id: &ObjectId, position: f64, width: f64) -> Option<(&'a Wall, Segment)> {
    let wall = doc.wall(wall_id).filter(|w| w.hosts_openings())?;
    let (start, end) = wall.opening_span(position, width)?;
    Some((wall, Segment::new(wall.point_at(start), wall.point_at(end))))
}

/// Right-opening doors hinge at the span start, left-opening at the end.
fn door_swing(span: Segment, wall_angle: f64, direction: OpenDirection) -> Swing {
    let (hinge, turn) = match direction {
        OpenDirection::Right => (span.start, 1.0),
        OpenDirection::Left => (span.end, -1.0),
    };
    let radius = span.length();
    let start_angle = wall_angle;
    let end_angle = wall_angle + FRAC_PI_2 * turn;
    let leaf_end = Point::new(hinge.x + radius * end_angle.cos(), hinge.y + radius * end_angle.sin());
    Swing { hinge, leaf_end, radius, start_angle, end_angle }
}
