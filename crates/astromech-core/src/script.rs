//! Routine scripts: parsing, shape validation and canonical formatting.
//!
//! A script is a JSON document of the form `{ "commands": [ ... ] }` where each
//! command is an object carrying any of `servo`/`angle`, `delay` or `audio`.
//! Validation only checks shape; whether a servo or audio file exists is the
//! backend's business.

use crate::error::{AstromechError, Result};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One step the executor performs.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MoveServo { servo: String, angle: f64 },
    Delay { ms: f64 },
    PlayAudio { file: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveServo { servo, angle } => write!(f, "servo '{servo}' -> {angle}°"),
            Action::Delay { ms } => write!(f, "delay {ms} ms"),
            Action::PlayAudio { file } => write!(f, "audio '{file}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A single entry of the `commands` array.
///
/// One object may combine several actions. An object with none of the
/// recognized keys decodes to a command with no actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    pub actions: Vec<Action>,
}

impl Command {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// A shape-valid script.
///
/// Keeps the parsed document alongside the decoded commands so that
/// submission sends exactly what the operator wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    commands: Vec<Command>,
    document: Value,
}

impl Script {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All actions in execution order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.commands.iter().flat_map(|c| c.actions.iter())
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Parse script text as JSON. The error carries the parser's message.
pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(AstromechError::InvalidJson)
}

/// Check that `parsed` is a well-formed script.
///
/// Stops at the first offending command; positions are 0-based.
pub fn validate(parsed: &Value) -> Result<Script> {
    let Some(entries) = parsed.get("commands").and_then(Value::as_array) else {
        return Err(shape("Script must contain a commands array"));
    };

    let commands = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_command(index, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(Script {
        commands,
        document: parsed.clone(),
    })
}

/// Parse then validate, as done before saving or running a script.
pub fn parse_and_validate(text: &str) -> Result<Script> {
    validate(&parse(text)?)
}

/// Pretty-print script text with two-space indentation, keeping key order.
///
/// Idempotent on anything that parses.
pub fn format(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text).map_err(|_| AstromechError::InvalidJsonFormat)?;
    to_canonical(&value)
}

/// Canonical serialization used for stored scripts.
pub fn to_canonical(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn decode_command(index: usize, entry: &Value) -> Result<Command> {
    let Some(fields) = entry.as_object() else {
        return Err(shape(format!(
            "Invalid command at position {index}: must be an object"
        )));
    };

    let mut actions = Vec::new();

    if let Some(servo) = fields.get("servo") {
        let Some(angle) = fields.get("angle").and_then(Value::as_f64) else {
            return Err(shape(format!(
                "Invalid servo action at position {index}: must include angle"
            )));
        };
        actions.push(Action::MoveServo {
            servo: identifier(servo),
            angle,
        });
    }

    if let Some(delay) = fields.get("delay") {
        let Some(ms) = delay.as_f64() else {
            return Err(shape(format!(
                "Invalid delay at position {index}: must be a number"
            )));
        };
        actions.push(Action::Delay { ms });
    }

    if let Some(audio) = fields.get("audio") {
        let Some(file) = audio.as_str() else {
            return Err(shape(format!(
                "Invalid audio at position {index}: must be a string"
            )));
        };
        actions.push(Action::PlayAudio {
            file: file.to_string(),
        });
    }

    Ok(Command { actions })
}

/// Servo targets are not type-checked; non-string ids keep their JSON text.
fn identifier(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn shape(message: impl Into<String>) -> AstromechError {
    AstromechError::Shape(message.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
