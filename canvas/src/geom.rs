//! Geometry kernel: pure functions over points and line segments.
//!
//! Everything here is stateless. Degenerate segments (start == end) never
//! fail: projections fall back to the start point, angles to `0.0`.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::camera::Point;

/// A directed line segment in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Euclidean length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Direction angle in radians. A zero-length segment yields `0.0`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    /// Whether the segment has zero length.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length_sq() == 0.0
    }

    /// Linear interpolation `start + t * (end - start)`. `t` is not clamped.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        Point {
            x: self.start.x + (self.end.x - self.start.x) * t,
            y: self.start.y + (self.end.y - self.start.y) * t,
        }
    }

    /// Project `point` onto the segment's line and clamp the parameter into `[0, 1]`.
    ///
    /// A zero-length segment returns `0.0`.
    #[must_use]
    pub fn parametric_position(&self, point: Point) -> f64 {
        self.raw_parameter(point).map_or(0.0, |t| t.clamp(0.0, 1.0))
    }

    /// Distance from `point` to the nearest point on the segment.
    #[must_use]
    pub fn distance_to(&self, point: Point) -> f64 {
        // Degenerate segments project to the start point.
        let t = self.raw_parameter(point).unwrap_or(-1.0);
        let nearest = if t < 0.0 {
            self.start
        } else if t > 1.0 {
            self.end
        } else {
            self.point_at(t)
        };
        distance(point, nearest)
    }

    fn length_sq(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        dx * dx + dy * dy
    }

    /// Unclamped projection parameter, or `None` for a zero-length segment.
    fn raw_parameter(&self, point: Point) -> Option<f64> {
        let len_sq = self.length_sq();
        if len_sq == 0.0 {
            return None;
        }
        let dot = (point.x - self.start.x) * (self.end.x - self.start.x)
            + (point.y - self.start.y) * (self.end.y - self.start.y);
        Some(dot / len_sq)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Distance from `point` to the segment `seg_start..seg_end`, clamped to the nearest endpoint.
#[must_use]
pub fn point_to_segment_distance(point: Point, seg_start: Point, seg_end: Point) -> f64 {
    Segment::new(seg_start, seg_end).distance_to(point)
}

/// Whether `point` lies within `threshold` of the segment (inclusive).
#[must_use]
pub fn is_near_segment(point: Point, seg_start: Point, seg_end: Point, threshold: f64) -> bool {
    point_to_segment_distance(point, seg_start, seg_end) <= threshold
}

/// Round each coordinate to the nearest multiple of `grid_size`.
#[must_use]
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point {
        x: (point.x / grid_size).round() * grid_size,
        y: (point.y / grid_size).round() * grid_size,
    }
}

/// Parametric span `(start, end)` occupied by an opening of `width` centered at
/// `position` on a wall of `wall_length`.
///
/// The span never leaves `[0, 1]`; an opening wider than the wall covers all of it.
/// Returns `None` for a zero-length or non-finite wall, where no span exists.
#[must_use]
pub fn opening_span(position: f64, width: f64, wall_length: f64) -> Option<(f64, f64)> {
    if wall_length <= 0.0 || !wall_length.is_finite() {
        return None;
    }
    let width_frac = width / wall_length;
    let start = (position - width_frac / 2.0).min(1.0 - width_frac).max(0.0);
    let end = (start + width_frac).min(1.0).max(0.0);
    Some((start, end))
}
