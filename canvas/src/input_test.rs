use uuid::Uuid;

use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_wall() {
    assert_eq!(Tool::default(), Tool::Wall);
}

#[test]
fn tool_from_name_is_case_insensitive() {
    assert_eq!(Tool::from_name("select"), Some(Tool::Select));
    assert_eq!(Tool::from_name("WALL"), Some(Tool::Wall));
    assert_eq!(Tool::from_name("Window"), Some(Tool::Window));
    assert_eq!(Tool::from_name("door"), Some(Tool::Door));
    assert_eq!(Tool::from_name("pan"), Some(Tool::Pan));
    assert_eq!(Tool::from_name("lasso"), None);
}

#[test]
fn tool_hover_set() {
    assert!(Tool::Select.hovers_walls());
    assert!(Tool::Window.hovers_walls());
    assert!(Tool::Door.hovers_walls());
    assert!(!Tool::Wall.hovers_walls());
    assert!(!Tool::Pan.hovers_walls());
}

#[test]
fn tool_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Pan).unwrap(), "\"pan\"");
}

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
    assert!(!m.command());
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Default::default() }.command());
}

// =============================================================
// Key
// =============================================================

#[test]
fn key_is_matches_case_insensitively() {
    let key = Key::new("ESCAPE");
    assert!(key.is("Escape"));
    assert!(!key.is("Enter"));
    assert!(Key::new("W").is("w"));
}

// =============================================================
// UiState / InputState
// =============================================================

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Wall);
    assert!(ui.selection.is_none());
    assert!(ui.temp_wall_start.is_none());
    assert!(ui.hovered_wall.is_none());
    assert!(ui.cursor_world.is_none());
}

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn selection_pairs_id_and_kind() {
    let id = Uuid::new_v4();
    let sel = Selection { id, kind: ObjectKind::Door };
    let json = serde_json::to_value(sel).unwrap();
    assert_eq!(json["kind"], "door");
    assert_eq!(json["id"], serde_json::json!(id));
}
