//! Editing engine: entity operations, undo history, and the input state machine.
//!
//! DESIGN
//! ======
//! `EngineCore` owns every piece of editor state (document, camera, UI state,
//! gesture state, history) and has no host dependencies, so it is driven the
//! same way from tests, scripts, and a UI shell. Every committed document
//! mutation records one history snapshot and bumps `revision`; hosts watch
//! the revision (or the returned [`Action`]s) to know when to persist.
//!
//! `Engine` wraps a core together with a [`Storage`] and autosaves after any
//! call that changed the document.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};
use uuid::Uuid;

use crate::camera::{Camera, Point};
use crate::consts::{
    DOOR_COLOR, DOOR_WIDTH, GRID_SIZE, HISTORY_CAP, WALL_THICKNESS, WHEEL_ZOOM_STEP, WINDOW_COLOR, WINDOW_WIDTH,
};
use crate::doc::{
    DocStore, Door, ObjectId, ObjectKind, OpenDirection, PartialDoor, PartialWall, PartialWindow, Snapshot, Wall,
    Window, clamp_position,
};
use crate::geom;
use crate::hit;
use crate::history::History;
use crate::input::{Button, InputState, Key, Modifiers, Selection, Tool, UiState, WheelDelta};
use crate::persist::{self, PersistError, RepairReport, Storage};
use crate::render::{self, Scene};

/// Tunables for an editing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Grid spacing used for wall snapping.
    pub grid_size: f64,
    /// Maximum number of history snapshots.
    pub history_cap: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { grid_size: GRID_SIZE, history_cap: HISTORY_CAP }
    }
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    WallCreated(Wall),
    WindowCreated(Window),
    DoorCreated(Door),
    ObjectsDeleted { ids: Vec<ObjectId> },
    SelectionChanged(Option<Selection>),
    ToolChanged(Tool),
    /// The whole document was swapped (undo/redo).
    DocReplaced,
    SetCursor(String),
    RenderNeeded,
}

impl Action {
    /// Whether the action reflects a change to the document.
    #[must_use]
    pub fn changes_doc(&self) -> bool {
        matches!(
            self,
            Self::WallCreated(_)
                | Self::WindowCreated(_)
                | Self::DoorCreated(_)
                | Self::ObjectsDeleted { .. }
                | Self::DocReplaced
        )
    }
}

/// Core engine state: all editing logic, independent of any host.
pub struct EngineCore {
    pub doc: DocStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub history: History,
    pub settings: Settings,
    revision: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty session; the empty document is the history baseline.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        let doc = DocStore::new();
        let mut history = History::with_cap(settings.history_cap);
        history.reset(doc.snapshot());
        Self {
            doc,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            history,
            settings,
            revision: 0,
        }
    }

    // --- Data inputs ---

    /// Replace the document with a loaded session. History restarts from it.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.doc.restore(snapshot);
        self.history.reset(self.doc.snapshot());
        self.reset_transient();
        self.revision += 1;
    }

    /// Replace the document with an imported one. Import is undoable.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if `text` is not a well-formed project document; the
    /// current document is left untouched.
    pub fn import_document(&mut self, text: &str) -> Result<RepairReport, PersistError> {
        let loaded = persist::import(text)?;
        info!(name = %loaded.name, entities = loaded.snapshot.len(), "imported project");
        self.doc.restore(loaded.snapshot);
        self.reset_transient();
        self.commit();
        Ok(loaded.report)
    }

    /// Serialize the current document as an export.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn export_document(&self, name: &str) -> Result<String, PersistError> {
        persist::export(&self.doc.snapshot(), name)
    }

    // --- Entity operations ---

    /// Add a wall with default thickness.
    pub fn add_wall(&mut self, start: Point, end: Point) -> Wall {
        let wall = Wall { id: Uuid::new_v4(), start, end, thickness: WALL_THICKNESS };
        self.doc.insert_wall(wall.clone());
        self.commit();
        debug!(id = %wall.id, "wall added");
        wall
    }

    /// Add a window on `wall_id` and select it.
    pub fn add_window(&mut self, wall_id: ObjectId, position: f64) -> Window {
        if self.doc.wall(&wall_id).is_none() {
            debug!(%wall_id, "window placed on missing wall");
        }
        let window = Window {
            id: Uuid::new_v4(),
            wall_id,
            position: clamp_position(position),
            width: WINDOW_WIDTH,
            color: WINDOW_COLOR.to_string(),
        };
        self.doc.insert_window(window.clone());
        self.ui.selection = Some(Selection { id: window.id, kind: ObjectKind::Window });
        self.commit();
        debug!(id = %window.id, %wall_id, "window added");
        window
    }

    /// Add a door on `wall_id` and select it.
    pub fn add_door(&mut self, wall_id: ObjectId, position: f64) -> Door {
        if self.doc.wall(&wall_id).is_none() {
            debug!(%wall_id, "door placed on missing wall");
        }
        let door = Door {
            id: Uuid::new_v4(),
            wall_id,
            position: clamp_position(position),
            width: DOOR_WIDTH,
            open_direction: OpenDirection::default(),
            color: DOOR_COLOR.to_string(),
        };
        self.doc.insert_door(door.clone());
        self.ui.selection = Some(Selection { id: door.id, kind: ObjectKind::Door });
        self.commit();
        debug!(id = %door.id, %wall_id, "door added");
        door
    }

    /// Select an existing entity and switch to the select tool, dropping any
    /// pending wall anchor. Returns false if it doesn't exist.
    pub fn select_object(&mut self, id: ObjectId, kind: ObjectKind) -> bool {
        if !self.doc.contains(&id, kind) {
            return false;
        }
        self.ui.tool = Tool::Select;
        self.ui.temp_wall_start = None;
        self.ui.selection = Some(Selection { id, kind });
        true
    }

    pub fn clear_selection(&mut self) {
        self.ui.selection = None;
    }

    /// Delete the selected entity (cascading for walls). Returns removed ids.
    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        let Some(selection) = self.ui.selection.take() else {
            return Vec::new();
        };
        let removed = self.doc.remove(&selection.id, selection.kind);
        if removed.is_empty() {
            return removed;
        }
        if self.ui.hovered_wall.is_some_and(|id| removed.contains(&id)) {
            self.ui.hovered_wall = None;
        }
        self.commit();
        debug!(id = %selection.id, kind = ?selection.kind, removed = removed.len(), "deleted selection");
        removed
    }

    /// Merge `partial` into an entity. Records history only when a field actually changed.
    pub fn update_wall(&mut self, id: &ObjectId, partial: &PartialWall) -> bool {
        let changed = self.doc.update_wall(id, partial);
        if changed {
            self.commit();
            debug!(%id, "wall updated");
        }
        changed
    }

    pub fn update_window(&mut self, id: &ObjectId, partial: &PartialWindow) -> bool {
        let changed = self.doc.update_window(id, partial);
        if changed {
            self.commit();
            debug!(%id, "window updated");
        }
        changed
    }

    pub fn update_door(&mut self, id: &ObjectId, partial: &PartialDoor) -> bool {
        let changed = self.doc.update_door(id, partial);
        if changed {
            self.commit();
            debug!(%id, "door updated");
        }
        changed
    }

    /// Remove every entity. Undoable. Returns how many entities were removed;
    /// clearing an empty document records nothing.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.doc.len();
        self.reset_transient();
        if removed > 0 {
            self.doc.clear();
            self.commit();
            info!(removed, "cleared all entities");
        }
        removed
    }

    /// Step back one snapshot. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.replace_doc(snapshot);
        debug!(index = ?self.history.index(), "undo");
        true
    }

    /// Step forward one snapshot. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.replace_doc(snapshot);
        debug!(index = ?self.history.index(), "redo");
        true
    }

    // --- Tool / viewport ---

    /// Switch tools. Any selection, pending wall anchor, and hover are dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
        self.ui.selection = None;
        self.ui.temp_wall_start = None;
        self.ui.hovered_wall = None;
    }

    pub fn set_temp_wall_start(&mut self, point: Option<Point>) {
        self.ui.temp_wall_start = point;
    }

    /// Set the zoom factor (clamped to the allowed range).
    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.camera.set_pan(pan);
    }

    // --- Input events ---

    /// Handle a pointer-down event.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let pans = button == Button::Middle
            || (button == Button::Primary && (modifiers.alt || self.ui.tool == Tool::Pan));
        if pans {
            self.input = InputState::Panning { last_screen: screen_pt };
            return vec![Action::SetCursor("grabbing".into())];
        }

        let world = self.camera.screen_to_world(screen_pt);
        self.ui.cursor_world = Some(world);

        match button {
            Button::Secondary => self.cancel_wall_anchor(),
            Button::Primary => match self.ui.tool {
                Tool::Wall => self.click_wall(world),
                Tool::Select => self.click_select(world),
                Tool::Window | Tool::Door => self.click_opening(world),
                // Pan-tool drags start above.
                Tool::Pan => Vec::new(),
            },
            Button::Middle => Vec::new(),
        }
    }

    /// Handle a pointer-move event.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        if let InputState::Panning { last_screen } = self.input {
            self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
            self.input = InputState::Panning { last_screen: screen_pt };
            return vec![Action::RenderNeeded];
        }

        let world = self.camera.screen_to_world(screen_pt);
        self.ui.cursor_world = Some(world);

        let mut needs_render = self.ui.tool == Tool::Wall && self.ui.temp_wall_start.is_some();
        if self.ui.tool.hovers_walls() {
            let hovered = match self.ui.tool {
                Tool::Window | Tool::Door => hit::host_wall_at(world, &self.doc, &self.camera),
                _ => hit::wall_at(world, &self.doc, &self.camera),
            }
            .map(|w| w.id);
            if hovered != self.ui.hovered_wall {
                self.ui.hovered_wall = hovered;
                needs_render = true;
            }
        }

        if needs_render { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Handle a pointer-up event. Ends a pan gesture.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Panning { .. } => vec![Action::SetCursor(self.cursor_for_tool().into())],
            InputState::Idle => Vec::new(),
        }
    }

    /// Handle a wheel event: command-modified zooms about the pointer, otherwise pans.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let factor = WHEEL_ZOOM_STEP.powf(-delta.dy / 100.0);
            self.camera.zoom_about(screen_pt, self.camera.zoom * factor);
        } else {
            self.camera.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    /// Handle a key-down event: tool shortcuts, delete, escape, undo/redo.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let undo = key.is("z") && !modifiers.shift;
            let redo = key.is("y") || (key.is("z") && modifiers.shift);
            let changed = if undo {
                self.undo()
            } else if redo {
                self.redo()
            } else {
                false
            };
            return if changed {
                vec![Action::DocReplaced, Action::SelectionChanged(None), Action::RenderNeeded]
            } else {
                Vec::new()
            };
        }

        let tool = if key.is("s") {
            Some(Tool::Select)
        } else if key.is("w") {
            Some(Tool::Wall)
        } else if key.is("n") {
            Some(Tool::Window)
        } else if key.is("d") {
            Some(Tool::Door)
        } else if key.is(" ") || key.is("Space") {
            Some(Tool::Pan)
        } else {
            None
        };
        if let Some(tool) = tool {
            self.set_tool(tool);
            return vec![
                Action::ToolChanged(tool),
                Action::SetCursor(self.cursor_for_tool().into()),
                Action::RenderNeeded,
            ];
        }

        if key.is("Delete") || key.is("Backspace") {
            let ids = self.delete_selected();
            if ids.is_empty() {
                return Vec::new();
            }
            return vec![Action::ObjectsDeleted { ids }, Action::SelectionChanged(None), Action::RenderNeeded];
        }

        if key.is("Escape") {
            return self.escape();
        }

        Vec::new()
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.ui.selection
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.doc.snapshot()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Counter bumped on every document change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Build the render description of the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        render::build_scene(&self.doc, &self.ui, &self.settings)
    }

    // --- Internal helpers ---

    fn commit(&mut self) {
        self.history.record(self.doc.snapshot());
        self.revision += 1;
    }

    fn replace_doc(&mut self, snapshot: Snapshot) {
        self.doc.restore(snapshot);
        self.ui.selection = None;
        self.ui.hovered_wall = None;
        self.revision += 1;
    }

    fn reset_transient(&mut self) {
        self.ui.selection = None;
        self.ui.temp_wall_start = None;
        self.ui.hovered_wall = None;
    }

    fn cursor_for_tool(&self) -> &'static str {
        if self.ui.tool == Tool::Pan { "grab" } else { "crosshair" }
    }

    fn cancel_wall_anchor(&mut self) -> Vec<Action> {
        if self.ui.temp_wall_start.take().is_some() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Escape drops the pending wall anchor first, otherwise the selection.
    fn escape(&mut self) -> Vec<Action> {
        if self.ui.tool == Tool::Wall && self.ui.temp_wall_start.is_some() {
            return self.cancel_wall_anchor();
        }
        if self.ui.selection.take().is_some() {
            return vec![Action::SelectionChanged(None), Action::RenderNeeded];
        }
        Vec::new()
    }

    /// Wall tool: the first click anchors, later clicks commit a wall and chain.
    fn click_wall(&mut self, world: Point) -> Vec<Action> {
        let snapped = geom::snap_to_grid(world, self.settings.grid_size);
        let mut actions = Vec::new();
        if let Some(anchor) = self.ui.temp_wall_start
            && geom::distance(anchor, snapped) > self.settings.grid_size / 2.0
        {
            actions.push(Action::WallCreated(self.add_wall(anchor, snapped)));
        }
        self.ui.temp_wall_start = Some(snapped);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select tool: a hit selects, a miss leaves the selection alone.
    fn click_select(&mut self, world: Point) -> Vec<Action> {
        let Some(hit) = hit::hit_test(world, &self.doc, &self.camera) else {
            return Vec::new();
        };
        let selection = Selection::from(hit);
        if self.ui.selection == Some(selection) {
            return Vec::new();
        }
        self.ui.selection = Some(selection);
        vec![Action::SelectionChanged(Some(selection)), Action::RenderNeeded]
    }

    /// Window/door tool: place an opening at the nearest point of the wall under the pointer.
    fn click_opening(&mut self, world: Point) -> Vec<Action> {
        let Some((wall_id, position)) =
            hit::host_wall_at(world, &self.doc, &self.camera).map(|w| (w.id, w.position_of(world)))
        else {
            return Vec::new();
        };
        let created = if self.ui.tool == Tool::Door {
            Action::DoorCreated(self.add_door(wall_id, position))
        } else {
            Action::WindowCreated(self.add_window(wall_id, position))
        };
        vec![created, Action::SelectionChanged(self.ui.selection), Action::RenderNeeded]
    }
}

/// An editing session bound to a storage backend.
///
/// Every call that changes the document is followed by a best-effort save.
pub struct Engine<S: Storage> {
    pub core: EngineCore,
    storage: S,
}

impl<S: Storage> Engine<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, Settings::default())
    }

    #[must_use]
    pub fn with_settings(storage: S, settings: Settings) -> Self {
        Self { core: EngineCore::with_settings(settings), storage }
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // --- Persistence ---

    /// Load the stored session, if any. On error the session is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Io` if storage can't be read or `Parse` if the stored document is malformed.
    pub fn load(&mut self) -> Result<Option<RepairReport>, PersistError> {
        let Some(loaded) = persist::load(&self.storage)? else {
            return Ok(None);
        };
        self.core.load_snapshot(loaded.snapshot);
        Ok(Some(loaded.report))
    }

    /// Import a document, replacing the session (undoable) and saving it.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if `text` is not a well-formed project document.
    pub fn import(&mut self, text: &str) -> Result<RepairReport, PersistError> {
        self.tracked(|core| core.import_document(text))
    }

    /// Serialize the session as an export.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn export(&self, name: &str) -> Result<String, PersistError> {
        self.core.export_document(name)
    }

    /// Delete the stored session without touching the in-memory document.
    ///
    /// # Errors
    ///
    /// Returns `Io` if storage can't be modified.
    pub fn clear_storage(&mut self) -> Result<(), PersistError> {
        persist::clear(&mut self.storage)
    }

    // --- Delegated operations ---

    pub fn add_wall(&mut self, start: Point, end: Point) -> Wall {
        self.tracked(|core| core.add_wall(start, end))
    }

    pub fn add_window(&mut self, wall_id: ObjectId, position: f64) -> Window {
        self.tracked(|core| core.add_window(wall_id, position))
    }

    pub fn add_door(&mut self, wall_id: ObjectId, position: f64) -> Door {
        self.tracked(|core| core.add_door(wall_id, position))
    }

    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        self.tracked(EngineCore::delete_selected)
    }

    pub fn update_wall(&mut self, id: &ObjectId, partial: &PartialWall) -> bool {
        self.tracked(|core| core.update_wall(id, partial))
    }

    pub fn update_window(&mut self, id: &ObjectId, partial: &PartialWindow) -> bool {
        self.tracked(|core| core.update_window(id, partial))
    }

    pub fn update_door(&mut self, id: &ObjectId, partial: &PartialDoor) -> bool {
        self.tracked(|core| core.update_door(id, partial))
    }

    pub fn clear_all(&mut self) -> usize {
        self.tracked(EngineCore::clear_all)
    }

    pub fn undo(&mut self) -> bool {
        self.tracked(EngineCore::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.tracked(EngineCore::redo)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.tracked(|core| core.on_pointer_down(screen_pt, button, modifiers))
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.tracked(|core| core.on_key_down(key, modifiers))
    }

    fn tracked<T>(&mut self, f: impl FnOnce(&mut EngineCore) -> T) -> T {
        let before = self.core.revision();
        let out = f(&mut self.core);
        if self.core.revision() != before {
            persist::save(&mut self.storage, &self.core.doc.snapshot());
        }
        out
    }
}
