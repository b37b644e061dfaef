use canvas::doc::{ObjectKind, OpenDirection};
use canvas::persist::MemoryStorage;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn replay(text: &str) -> (Engine<MemoryStorage>, ReplaySummary) {
    let steps = parse(text).unwrap();
    let mut engine = Engine::new(MemoryStorage::new());
    let summary = run(&mut engine, &steps);
    (engine, summary)
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parses_every_command() {
    let steps = parse(
        "tool select\n\
         click 10 20\n\
         click 1.5 -2 secondary\n\
         move 3 4\n\
         release 3 4\n\
         key Delete\n\
         key z ctrl shift\n\
         wheel 100 100 0 -100 ctrl\n\
         undo\n\
         redo\n\
         zoom 2",
    )
    .unwrap();

    assert_eq!(
        steps,
        vec![
            Step::Tool(Tool::Select),
            Step::Click { at: pt(10.0, 20.0), button: Button::Primary },
            Step::Click { at: pt(1.5, -2.0), button: Button::Secondary },
            Step::Move(pt(3.0, 4.0)),
            Step::Release(pt(3.0, 4.0)),
            Step::Key { key: Key::new("Delete"), modifiers: Modifiers::default() },
            Step::Key { key: Key::new("z"), modifiers: Modifiers { ctrl: true, shift: true, ..Default::default() } },
            Step::Wheel {
                at: pt(100.0, 100.0),
                delta: WheelDelta { dx: 0.0, dy: -100.0 },
                modifiers: Modifiers { ctrl: true, ..Default::default() },
            },
            Step::Undo,
            Step::Redo,
            Step::Zoom(2.0),
        ]
    );
}

#[test]
fn comments_and_blank_lines_skipped() {
    let steps = parse("# header\n\n   \nundo # trailing comment\n").unwrap();
    assert_eq!(steps, vec![Step::Undo]);
}

#[test]
fn parses_property_edits() {
    let steps = parse(
        "set thickness 20\n\
         set width 60.5\n\
         set position 0.25\n\
         set color #22c55e # green\n\
         set direction LEFT\n\
         clear",
    )
    .unwrap();
    assert_eq!(
        steps,
        vec![
            Step::Set(Property::Thickness(20.0)),
            Step::Set(Property::Width(60.5)),
            Step::Set(Property::Position(0.25)),
            Step::Set(Property::Color("#22c55e".into())),
            Step::Set(Property::Direction(OpenDirection::Left)),
            Step::Clear,
        ]
    );
}

#[test]
fn bad_property_edits_rejected() {
    assert!(matches!(parse("set height 3"), Err(ScriptError::UnknownName { what: "property", .. })));
    assert!(matches!(parse("set direction up"), Err(ScriptError::UnknownName { what: "direction", .. })));
    assert!(matches!(parse("set width wide"), Err(ScriptError::InvalidNumber { .. })));
    assert_eq!(parse("set").unwrap_err(), ScriptError::MissingArgument { line: 1, expected: "property name" });
    assert!(matches!(parse("clear all"), Err(ScriptError::UnexpectedArgument { .. })));
}

#[test]
fn commands_are_case_insensitive() {
    assert_eq!(parse("TOOL Door").unwrap(), vec![Step::Tool(Tool::Door)]);
}

#[test]
fn unknown_command_reports_line() {
    let err = parse("undo\nfly 1 2").unwrap_err();
    assert_eq!(err, ScriptError::UnknownCommand { line: 2, command: "fly".into() });
}

#[test]
fn missing_coordinate() {
    let err = parse("click 10").unwrap_err();
    assert_eq!(err, ScriptError::MissingArgument { line: 1, expected: "y coordinate" });
}

#[test]
fn non_finite_number_rejected() {
    assert!(matches!(parse("zoom inf"), Err(ScriptError::InvalidNumber { .. })));
    assert!(matches!(parse("move a 2"), Err(ScriptError::InvalidNumber { .. })));
}

#[test]
fn unknown_names_rejected() {
    assert!(matches!(parse("tool lasso"), Err(ScriptError::UnknownName { what: "tool", .. })));
    assert!(matches!(parse("click 1 2 thumb"), Err(ScriptError::UnknownName { what: "button", .. })));
    assert!(matches!(parse("key z hyper"), Err(ScriptError::UnknownName { what: "modifier", .. })));
}

#[test]
fn trailing_argument_rejected() {
    let err = parse("undo now").unwrap_err();
    assert_eq!(err, ScriptError::UnexpectedArgument { line: 1, value: "now".into() });
}

#[test]
fn error_message_names_line() {
    let err = parse("\n\nzoom").unwrap_err();
    assert_eq!(err.to_string(), "line 3: missing zoom factor");
}

// =============================================================================
// Running
// =============================================================================

#[test]
fn replay_draws_chained_walls() {
    let (engine, summary) = replay("click 0 0\nclick 200 0\nclick 200 200\nkey escape");
    assert_eq!(summary.steps, 4);
    assert_eq!(summary.created, 2);
    assert_eq!(engine.core.doc.walls().len(), 2);
    assert!(engine.core.ui.temp_wall_start.is_none());
}

#[test]
fn replay_places_window_and_undoes() {
    let (engine, summary) = replay(
        "click 0 0\nclick 200 0\n\
         tool window\nclick 100 5\n\
         key z ctrl",
    );
    assert_eq!(summary.created, 2);
    assert_eq!(summary.history_moves, 1);
    assert_eq!(engine.core.doc.walls().len(), 1);
    assert!(engine.core.doc.windows().is_empty());
}

#[test]
fn replay_select_and_delete_cascades() {
    let (engine, summary) = replay(
        "click 0 0\nclick 200 0\n\
         tool door\nclick 50 0\n\
         tool select\nclick 150 10\n\
         key Delete",
    );
    assert_eq!(summary.deleted, 2);
    assert!(engine.core.doc.is_empty());
}

#[test]
fn replay_select_keeps_kind() {
    let (engine, _) = replay("click 0 0\nclick 200 0\ntool select\nclick 100 10");
    assert_eq!(engine.core.selection().map(|s| s.kind), Some(ObjectKind::Wall));
}

#[test]
fn replay_pan_and_zoom_shift_world_coordinates() {
    let (engine, _) = replay(
        "click 0 0 middle\nmove 100 0\nrelease 100 0\n\
         zoom 2\n\
         click 100 0\nclick 140 0",
    );
    let walls = engine.core.doc.walls();
    assert_eq!(walls.len(), 1);
    // Pan (100,0) and zoom 2 map screen x=140 to world 20.
    assert_eq!(walls[0].start, pt(0.0, 0.0));
    assert_eq!(walls[0].end, pt(20.0, 0.0));
}

#[test]
fn replay_edits_selected_window() {
    let (engine, summary) = replay(
        "click 0 0\nclick 200 0\n\
         tool window\nclick 100 5\n\
         set width 60\nset position 0.25\nset color #22c55e",
    );
    assert_eq!(summary.updated, 3);
    let window = &engine.core.doc.windows()[0];
    assert_eq!(window.width, 60.0);
    assert_eq!(window.position, 0.25);
    assert_eq!(window.color, "#22c55e");
}

#[test]
fn replay_edits_wall_and_door() {
    let (engine, summary) = replay(
        "click 0 0\nclick 200 0\n\
         tool select\nclick 100 5\nset thickness 24\n\
         tool door\nclick 50 0\nset direction left",
    );
    assert_eq!(summary.updated, 2);
    assert_eq!(engine.core.doc.walls()[0].thickness, 24.0);
    assert_eq!(engine.core.doc.doors()[0].open_direction, OpenDirection::Left);
}

#[test]
fn set_without_effect_is_skipped() {
    let (engine, summary) = replay(
        "set width 10\n\
         click 0 0\nclick 200 0\n\
         tool select\nclick 100 5\n\
         set width 10\nset thickness -4\nset thickness 10",
    );
    assert_eq!(summary.updated, 0);
    // Only the wall creation is in history.
    assert_eq!(engine.core.history.len(), 2);
}

#[test]
fn replay_clear_is_undoable() {
    let (mut engine, summary) = replay(
        "click 0 0\nclick 200 0\n\
         tool door\nclick 50 0\n\
         clear\nclear",
    );
    assert_eq!(summary.deleted, 2);
    assert!(engine.core.doc.is_empty());

    assert!(engine.undo());
    assert_eq!(engine.core.doc.len(), 2);
}

#[test]
fn replay_autosaves() {
    let (engine, _) = replay("click 0 0\nclick 100 0");
    assert!(engine.storage().read().unwrap().is_some());
}

#[test]
fn redo_counts_only_effective_moves() {
    let (_, summary) = replay("undo\nredo");
    assert_eq!(summary.history_moves, 0);
}
