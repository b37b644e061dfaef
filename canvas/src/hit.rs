//! Hit-testing against floor-plan entities.
//!
//! Priority is windows, then doors, then walls; within a collection the first
//! candidate in insertion order wins. Radii are screen pixels converted to
//! world units through the camera. Openings whose host wall is missing or has
//! zero length are never hit, matching what the scene draws.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{OPENING_HIT_RADIUS_PX, WALL_HIT_RADIUS_PX};
use crate::doc::{DocStore, ObjectId, ObjectKind, Wall};
use crate::geom;
use crate::input::Selection;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

impl From<Hit> for Selection {
    fn from(hit: Hit) -> Self {
        Selection { id: hit.id, kind: hit.kind }
    }
}

/// Test which entity (if any) is under `world_pt`.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &DocStore, camera: &Camera) -> Option<Hit> {
    opening_at(world_pt, doc, camera)
        .or_else(|| wall_at(world_pt, doc, camera).map(|w| Hit { id: w.id, kind: ObjectKind::Wall }))
}

/// The first window or door whose center lies within the opening hit radius.
#[must_use]
pub fn opening_at(world_pt: Point, doc: &DocStore, camera: &Camera) -> Option<Hit> {
    let radius = camera.screen_dist_to_world(OPENING_HIT_RADIUS_PX);
    let near_center = |wall_id: &ObjectId, position: f64| {
        doc.wall(wall_id)
            .filter(|wall| wall.hosts_openings())
            .is_some_and(|wall| geom::distance(world_pt, wall.point_at(position)) < radius)
    };

    let window = doc
        .windows()
        .iter()
        .find(|w| near_center(&w.wall_id, w.position))
        .map(|w| Hit { id: w.id, kind: ObjectKind::Window });
    window.or_else(|| {
        doc.doors()
            .iter()
            .find(|d| near_center(&d.wall_id, d.position))
            .map(|d| Hit { id: d.id, kind: ObjectKind::Door })
    })
}

/// The first wall within the wall hit radius of `world_pt`.
#[must_use]
pub fn wall_at<'a>(world_pt: Point, doc: &'a DocStore, camera: &Camera) -> Option<&'a Wall> {
    let radius = camera.screen_dist_to_world(WALL_HIT_RADIUS_PX);
    doc.walls()
        .iter()
        .find(|w| geom::is_near_segment(world_pt, w.start, w.end, radius))
}

/// The first wall within the wall hit radius that can take a new window or door.
#[must_use]
pub fn host_wall_at<'a>(world_pt: Point, doc: &'a DocStore, camera: &Camera) -> Option<&'a Wall> {
    let radius = camera.screen_dist_to_world(WALL_HIT_RADIUS_PX);
    doc.walls()
        .iter()
        .filter(|w| w.hosts_openings())
        .find(|w| geom::is_near_segment(world_pt, w.start, w.end, radius))
}
