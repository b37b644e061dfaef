//! Replay scripts: line-oriented input events driven through an engine.
//!
//! DESIGN
//! ======
//! Each non-blank line is one step. Coordinates are screen pixels, exactly as
//! a pointer event would deliver them, so scripts exercise the same camera
//! conversion, snapping, and hit-testing as interactive input.
//!
//! ```text
//! # two walls forming a corner
//! tool wall
//! click 0 0
//! click 200 0
//! click 200 200
//! key escape
//! tool window
//! click 100 5
//! set width 60
//! set color #22c55e
//! key z ctrl
//! ```
//!
//! `set <property> <value>` edits the current selection: `thickness` for
//! walls, `width`, `position` and `color` for windows and doors, and
//! `direction <left|right>` for doors. `clear` removes every entity.
//!
//! The whole script is parsed before anything runs, so a typo on the last
//! line never leaves a half-applied session.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use canvas::camera::Point;
use canvas::doc::{ObjectKind, OpenDirection, PartialDoor, PartialWall, PartialWindow};
use canvas::engine::{Action, Engine};
use canvas::input::{Button, Key, Modifiers, Tool, WheelDelta};
use canvas::persist::Storage;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: missing {expected}")]
    MissingArgument { line: usize, expected: &'static str },
    #[error("line {line}: `{value}` is not a finite number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: unknown {what} `{value}`")]
    UnknownName { line: usize, what: &'static str, value: String },
    #[error("line {line}: unexpected argument `{value}`")]
    UnexpectedArgument { line: usize, value: String },
}

/// One scripted input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Tool(Tool),
    Click { at: Point, button: Button },
    Move(Point),
    Release(Point),
    Key { key: Key, modifiers: Modifiers },
    Wheel { at: Point, delta: WheelDelta, modifiers: Modifiers },
    Set(Property),
    Clear,
    Undo,
    Redo,
    Zoom(f64),
}

/// An edit applied to the selected entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Thickness(f64),
    Width(f64),
    Position(f64),
    Color(String),
    Direction(OpenDirection),
}

/// What a replay did to the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub created: usize,
    pub deleted: usize,
    pub updated: usize,
    pub history_moves: usize,
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse(text: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }
        steps.push(parse_line(line, content)?);
    }
    Ok(steps)
}

/// A line starting with `#` is a comment, as is a `#` followed by whitespace
/// later on. `#22c55e` is a color value, not a comment.
fn strip_comment(raw: &str) -> &str {
    if raw.trim_start().starts_with('#') {
        return "";
    }
    let cut = raw
        .char_indices()
        .find(|&(i, c)| c == '#' && raw[i + 1..].chars().next().is_none_or(char::is_whitespace))
        .map_or(raw.len(), |(i, _)| i);
    &raw[..cut]
}

fn parse_line(line: usize, content: &str) -> Result<Step, ScriptError> {
    let mut words = content.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let mut args = Args { line, words };

    let step = match command.as_str() {
        "tool" => {
            let name = args.word("tool name")?;
            let tool = Tool::from_name(name).ok_or_else(|| ScriptError::UnknownName {
                line,
                what: "tool",
                value: name.to_string(),
            })?;
            Step::Tool(tool)
        }
        "click" => {
            let at = args.point()?;
            let button = match args.optional_word() {
                None => Button::Primary,
                Some(name) => parse_button(line, name)?,
            };
            Step::Click { at, button }
        }
        "move" => Step::Move(args.point()?),
        "release" => Step::Release(args.point()?),
        "key" => {
            let key = Key::new(args.word("key name")?);
            let mut modifiers = Modifiers::default();
            while let Some(name) = args.optional_word() {
                match name.to_ascii_lowercase().as_str() {
                    "ctrl" => modifiers.ctrl = true,
                    "shift" => modifiers.shift = true,
                    "alt" => modifiers.alt = true,
                    "meta" => modifiers.meta = true,
                    _ => {
                        return Err(ScriptError::UnknownName { line, what: "modifier", value: name.to_string() });
                    }
                }
            }
            return Ok(Step::Key { key, modifiers });
        }
        "wheel" => {
            let at = args.point()?;
            let delta = WheelDelta { dx: args.number("dx")?, dy: args.number("dy")? };
            let modifiers = match args.optional_word() {
                None => Modifiers::default(),
                Some(name) if name.eq_ignore_ascii_case("ctrl") => Modifiers { ctrl: true, ..Default::default() },
                Some(name) => {
                    return Err(ScriptError::UnknownName { line, what: "modifier", value: name.to_string() });
                }
            };
            Step::Wheel { at, delta, modifiers }
        }
        "set" => Step::Set(parse_property(&mut args)?),
        "clear" => Step::Clear,
        "undo" => Step::Undo,
        "redo" => Step::Redo,
        "zoom" => Step::Zoom(args.number("zoom factor")?),
        other => return Err(ScriptError::UnknownCommand { line, command: other.to_string() }),
    };
    args.finish()?;
    Ok(step)
}

fn parse_property(args: &mut Args<'_>) -> Result<Property, ScriptError> {
    let line = args.line;
    let name = args.word("property name")?;
    let property = match name.to_ascii_lowercase().as_str() {
        "thickness" => Property::Thickness(args.number("thickness")?),
        "width" => Property::Width(args.number("width")?),
        "position" => Property::Position(args.number("position")?),
        "color" => Property::Color(args.word("color")?.to_string()),
        "direction" => {
            let value = args.word("direction")?;
            let direction = match value.to_ascii_lowercase().as_str() {
                "left" => OpenDirection::Left,
                "right" => OpenDirection::Right,
                _ => return Err(ScriptError::UnknownName { line, what: "direction", value: value.to_string() }),
            };
            Property::Direction(direction)
        }
        _ => return Err(ScriptError::UnknownName { line, what: "property", value: name.to_string() }),
    };
    Ok(property)
}

fn parse_button(line: usize, name: &str) -> Result<Button, ScriptError> {
    match name.to_ascii_lowercase().as_str() {
        "primary" | "left" => Ok(Button::Primary),
        "middle" => Ok(Button::Middle),
        "secondary" | "right" => Ok(Button::Secondary),
        _ => Err(ScriptError::UnknownName { line, what: "button", value: name.to_string() }),
    }
}

struct Args<'a> {
    line: usize,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn optional_word(&mut self) -> Option<&'a str> {
        self.words.next()
    }

    fn word(&mut self, expected: &'static str) -> Result<&'a str, ScriptError> {
        self.words.next().ok_or(ScriptError::MissingArgument { line: self.line, expected })
    }

    fn number(&mut self, expected: &'static str) -> Result<f64, ScriptError> {
        let value = self.word(expected)?;
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(ScriptError::InvalidNumber { line: self.line, value: value.to_string() }),
        }
    }

    fn point(&mut self) -> Result<Point, ScriptError> {
        Ok(Point::new(self.number("x coordinate")?, self.number("y coordinate")?))
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.words.next() {
            None => Ok(()),
            Some(value) => Err(ScriptError::UnexpectedArgument { line: self.line, value: value.to_string() }),
        }
    }
}

/// Drive parsed steps through an engine. Document changes autosave as they happen.
pub fn run<S: Storage>(engine: &mut Engine<S>, steps: &[Step]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for step in steps {
        let actions = match step {
            Step::Tool(tool) => {
                engine.core.set_tool(*tool);
                Vec::new()
            }
            Step::Click { at, button } => engine.on_pointer_down(*at, *button, Modifiers::default()),
            Step::Move(at) => engine.on_pointer_move(*at, Modifiers::default()),
            Step::Release(at) => engine.on_pointer_up(*at, Button::Primary, Modifiers::default()),
            Step::Key { key, modifiers } => engine.on_key_down(key, *modifiers),
            Step::Wheel { at, delta, modifiers } => engine.on_wheel(*at, *delta, *modifiers),
            Step::Set(property) => {
                if set_property(engine, property) {
                    summary.updated += 1;
                }
                Vec::new()
            }
            Step::Clear => {
                summary.deleted += engine.clear_all();
                Vec::new()
            }
            Step::Undo => {
                if engine.undo() {
                    summary.history_moves += 1;
                }
                Vec::new()
            }
            Step::Redo => {
                if engine.redo() {
                    summary.history_moves += 1;
                }
                Vec::new()
            }
            Step::Zoom(factor) => {
                engine.core.set_zoom(*factor);
                Vec::new()
            }
        };
        for action in &actions {
            match action {
                Action::WallCreated(_) | Action::WindowCreated(_) | Action::DoorCreated(_) => summary.created += 1,
                Action::ObjectsDeleted { ids } => summary.deleted += ids.len(),
                Action::DocReplaced => summary.history_moves += 1,
                _ => {}
            }
        }
        summary.steps += 1;
        debug!(step = ?step, actions = actions.len(), "replayed step");
    }
    summary
}

/// Apply `property` to the selected entity. Returns true if the document changed.
fn set_property<S: Storage>(engine: &mut Engine<S>, property: &Property) -> bool {
    let Some(selection) = engine.core.selection() else {
        warn!(?property, "set ignored: nothing selected");
        return false;
    };
    let id = selection.id;
    match (selection.kind, property) {
        (ObjectKind::Wall, Property::Thickness(t)) => {
            engine.update_wall(&id, &PartialWall { thickness: Some(*t), ..Default::default() })
        }
        (ObjectKind::Window, Property::Width(w)) => {
            engine.update_window(&id, &PartialWindow { width: Some(*w), ..Default::default() })
        }
        (ObjectKind::Window, Property::Position(p)) => {
            engine.update_window(&id, &PartialWindow { position: Some(*p), ..Default::default() })
        }
        (ObjectKind::Window, Property::Color(c)) => {
            engine.update_window(&id, &PartialWindow { color: Some(c.clone()), ..Default::default() })
        }
        (ObjectKind::Door, Property::Width(w)) => {
            engine.update_door(&id, &PartialDoor { width: Some(*w), ..Default::default() })
        }
        (ObjectKind::Door, Property::Position(p)) => {
            engine.update_door(&id, &PartialDoor { position: Some(*p), ..Default::default() })
        }
        (ObjectKind::Door, Property::Color(c)) => {
            engine.update_door(&id, &PartialDoor { color: Some(c.clone()), ..Default::default() })
        }
        (ObjectKind::Door, Property::Direction(d)) => {
            engine.update_door(&id, &PartialDoor { open_direction: Some(*d), ..Default::default() })
        }
        (kind, property) => {
            warn!(?kind, ?property, "set ignored: property does not apply");
            false
        }
    }
}
