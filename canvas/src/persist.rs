//! Persistence adapter: the project document, storage contract, and validation.
//!
//! DESIGN
//! ======
//! The core never talks to a storage medium directly. Hosts implement
//! [`Storage`] (a single-slot key/value store, like browser local storage)
//! and the functions here move [`Snapshot`]s in and out of it as JSON
//! [`Project`] documents.
//!
//! ERROR HANDLING
//! ==============
//! `save` is best-effort: failures are logged and swallowed so an edit is
//! never rolled back or blocked by storage. `load` and `import` surface
//! failures to the caller and return a fully validated snapshot, so a caller
//! only swaps state once nothing can fail anymore.
//!
//! Validation repairs rather than rejects: windows and doors whose host wall
//! is missing are dropped, duplicate ids are dropped (first wins), positions
//! are clamped into `[0, 1]`, and unusable widths/thickness get defaults.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::consts::{DOOR_WIDTH, STORAGE_KEY, WALL_THICKNESS, WINDOW_WIDTH};
use crate::doc::{Door, ObjectId, Snapshot, Wall, Window, clamp_position, is_valid_extent};

/// Name written by the autosave.
pub const SESSION_PROJECT_NAME: &str = "Unnamed Project";

/// Default name for exported documents.
pub const EXPORT_PROJECT_NAME: &str = "Exported Project";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("malformed project document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// STORAGE
// =============================================================================

/// A single-slot document store.
pub trait Storage {
    /// Read the stored document, or `None` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the medium can't be read.
    fn read(&self) -> Result<Option<String>, PersistError>;

    /// Replace the stored document.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the medium can't be written.
    fn write(&mut self, contents: &str) -> Result<(), PersistError>;

    /// Delete the stored document. Deleting an absent document succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the medium can't be modified.
    fn remove(&mut self) -> Result<(), PersistError>;
}

/// In-memory storage, keyed like browser local storage under [`STORAGE_KEY`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: std::collections::HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.slots.get(STORAGE_KEY).cloned())
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistError> {
        self.slots.insert(STORAGE_KEY.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), PersistError> {
        self.slots.remove(STORAGE_KEY);
        Ok(())
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// A serialized floor plan with metadata.
///
/// `created_at` / `updated_at` stamp the save or export action itself; they
/// are not carried over from earlier documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default = "default_project_name")]
    pub name: String,
    pub walls: Vec<Wall>,
    pub windows: Vec<Window>,
    pub doors: Vec<Door>,
    #[serde(with = "time::serde::rfc3339", default = "OffsetDateTime::now_utc")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339", default = "OffsetDateTime::now_utc")]
    pub updated_at: OffsetDateTime,
}

fn default_project_name() -> String {
    SESSION_PROJECT_NAME.to_string()
}

impl Project {
    /// Wrap a snapshot, stamping both timestamps with the current time.
    #[must_use]
    pub fn new(name: &str, snapshot: Snapshot) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            name: name.to_string(),
            walls: snapshot.walls,
            windows: snapshot.windows,
            doors: snapshot.doors,
            created_at: now,
            updated_at: now,
        }
    }

    /// Drop the metadata and keep the collections.
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot { walls: self.walls, windows: self.windows, doors: self.doors }
    }
}

/// A validated document ready to replace the live state.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub name: String,
    pub snapshot: Snapshot,
    pub report: RepairReport,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// What the validation pass had to fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Windows and doors dropped because their host wall is missing.
    pub orphans_dropped: usize,
    /// Entities dropped because their id was already taken.
    pub duplicates_dropped: usize,
    /// Walls dropped because a coordinate was not finite.
    pub invalid_dropped: usize,
    /// Individual fields clamped or reset to a default.
    pub fields_repaired: usize,
}

impl RepairReport {
    /// Whether the document needed no repairs.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Validate and repair a snapshot so every invariant of the live store holds.
#[must_use]
pub fn validate(snapshot: Snapshot) -> (Snapshot, RepairReport) {
    let mut report = RepairReport::default();
    let mut seen: HashSet<ObjectId> = HashSet::new();

    let mut walls = Vec::with_capacity(snapshot.walls.len());
    for mut wall in snapshot.walls {
        let finite = [wall.start.x, wall.start.y, wall.end.x, wall.end.y]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            report.invalid_dropped += 1;
            continue;
        }
        if !seen.insert(wall.id) {
            report.duplicates_dropped += 1;
            continue;
        }
        if !is_valid_extent(wall.thickness) {
            wall.thickness = WALL_THICKNESS;
            report.fields_repaired += 1;
        }
        walls.push(wall);
    }

    let hosts: HashSet<ObjectId> = walls.iter().map(|w| w.id).collect();

    let mut windows = Vec::with_capacity(snapshot.windows.len());
    for mut window in snapshot.windows {
        if !hosts.contains(&window.wall_id) {
            report.orphans_dropped += 1;
            continue;
        }
        if !seen.insert(window.id) {
            report.duplicates_dropped += 1;
            continue;
        }
        report.fields_repaired += repair_opening(&mut window.position, &mut window.width, WINDOW_WIDTH);
        windows.push(window);
    }

    let mut doors = Vec::with_capacity(snapshot.doors.len());
    for mut door in snapshot.doors {
        if !hosts.contains(&door.wall_id) {
            report.orphans_dropped += 1;
            continue;
        }
        if !seen.insert(door.id) {
            report.duplicates_dropped += 1;
            continue;
        }
        report.fields_repaired += repair_opening(&mut door.position, &mut door.width, DOOR_WIDTH);
        doors.push(door);
    }

    (Snapshot { walls, windows, doors }, report)
}

/// Clamp position and reset width; returns how many fields changed.
fn repair_opening(position: &mut f64, width: &mut f64, default_width: f64) -> usize {
    let mut repaired = 0;
    let clamped = clamp_position(*position);
    if clamped.to_bits() != position.to_bits() {
        *position = clamped;
        repaired += 1;
    }
    if !is_valid_extent(*width) {
        *width = default_width;
        repaired += 1;
    }
    repaired
}

fn log_repairs(source: &str, report: &RepairReport) {
    if !report.is_clean() {
        warn!(
            source,
            orphans = report.orphans_dropped,
            duplicates = report.duplicates_dropped,
            invalid = report.invalid_dropped,
            fields = report.fields_repaired,
            "repaired inconsistent project document"
        );
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Serialize the session and write it to storage.
///
/// # Errors
///
/// Returns `Parse` if serialization fails or `Io` if the write fails.
pub fn try_save<S: Storage + ?Sized>(storage: &mut S, snapshot: &Snapshot) -> Result<(), PersistError> {
    let project = Project::new(SESSION_PROJECT_NAME, snapshot.clone());
    let json = serde_json::to_string(&project)?;
    storage.write(&json)
}

/// Best-effort save: failures are logged and never propagated.
pub fn save<S: Storage + ?Sized>(storage: &mut S, snapshot: &Snapshot) {
    if let Err(e) = try_save(storage, snapshot) {
        warn!(error = %e, "project save failed");
    }
}

/// Read and validate the stored session.
///
/// # Errors
///
/// Returns `Io` if storage can't be read or `Parse` if the stored document is malformed.
pub fn load<S: Storage + ?Sized>(storage: &S) -> Result<Option<Loaded>, PersistError> {
    let Some(text) = storage.read()? else {
        return Ok(None);
    };
    let loaded = parse_document(&text)?;
    log_repairs("storage", &loaded.report);
    info!(
        walls = loaded.snapshot.walls.len(),
        windows = loaded.snapshot.windows.len(),
        doors = loaded.snapshot.doors.len(),
        "loaded project from storage"
    );
    Ok(Some(loaded))
}

/// Remove the stored session.
///
/// # Errors
///
/// Returns `Io` if storage can't be modified.
pub fn clear<S: Storage + ?Sized>(storage: &mut S) -> Result<(), PersistError> {
    storage.remove()?;
    info!("cleared stored project");
    Ok(())
}

/// Render an export document (pretty JSON) stamped with the export time.
///
/// # Errors
///
/// Returns `Parse` if serialization fails.
pub fn export(snapshot: &Snapshot, name: &str) -> Result<String, PersistError> {
    let project = Project::new(name, snapshot.clone());
    let json = serde_json::to_string_pretty(&project)?;
    info!(name, entities = snapshot.len(), "exported project");
    Ok(json)
}

/// Suggested file name for an export made at `at`.
#[must_use]
pub fn export_file_name(at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("floor-plan-{millis}.json")
}

/// Parse and validate an imported document.
///
/// # Errors
///
/// Returns `Parse` if the text is not a well-formed project document.
pub fn import(text: &str) -> Result<Loaded, PersistError> {
    let loaded = parse_document(text)?;
    log_repairs("import", &loaded.report);
    Ok(loaded)
}

fn parse_document(text: &str) -> Result<Loaded, PersistError> {
    let project: Project = serde_json::from_str(text)?;
    let name = project.name.clone();
    let (snapshot, report) = validate(project.into_snapshot());
    Ok(Loaded { name, snapshot, report })
}
