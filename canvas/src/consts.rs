//! Shared numeric constants for the canvas crate.

// ── Grid ────────────────────────────────────────────────────────

/// World-space spacing of the snapping grid.
pub const GRID_SIZE: f64 = 20.0;

// ── Entity defaults ─────────────────────────────────────────────

/// Thickness given to newly drawn walls, in world units.
pub const WALL_THICKNESS: f64 = 10.0;

/// Width given to newly placed windows, in world units.
pub const WINDOW_WIDTH: f64 = 100.0;

/// Width given to newly placed doors, in world units.
pub const DOOR_WIDTH: f64 = 90.0;

/// Color for windows that carry none (older documents).
pub const WINDOW_COLOR: &str = "#60a5fa";

/// Color for doors that carry none (older documents).
pub const DOOR_COLOR: &str = "#f59e0b";

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius around a window or door center that selects it.
pub const OPENING_HIT_RADIUS_PX: f64 = 20.0;

/// Screen-space perpendicular distance within which a wall is hit.
pub const WALL_HIT_RADIUS_PX: f64 = 15.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots kept for undo/redo.
pub const HISTORY_CAP: usize = 50;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.5;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom multiplier per 100 px of wheel travel.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

// ── Persistence ─────────────────────────────────────────────────

/// Key under which the session document is stored.
pub const STORAGE_KEY: &str = "2d_editor_project";
