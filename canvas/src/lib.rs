//! Geometric editing and history engine for 2D floor plans.
//!
//! This crate owns everything about an editing session except drawing and
//! the storage medium: translating raw input events into wall, window, and
//! door edits, maintaining camera state for pan/zoom, hit-testing entities,
//! bounded undo/redo, and the JSON project document. The host is responsible
//! only for wiring input to the engine, drawing the [`render::Scene`], and
//! providing a [`persist::Storage`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Storage-bound [`engine::Engine`] and testable [`engine::EngineCore`] |
//! | [`doc`] | In-memory entity store and wall/window/door types |
//! | [`geom`] | Segment math, grid snapping, opening spans |
//! | [`history`] | Bounded snapshot history for undo/redo |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against entities |
//! | [`render`] | World-space scene description for the presentation layer |
//! | [`persist`] | Project documents, storage contract, load-time validation |
//! | [`consts`] | Shared constants (grid, entity defaults, hit radii, zoom limits) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod history;
pub mod input;
pub mod persist;
pub mod render;
