//! Text command grammar for the command channel.
//!
//! Every datagram on the command port carries one line of ASCII text:
//!
//! ```text
//! VERB[:PAYLOAD]
//! ```
//!
//! The verb is matched case-sensitively against a closed set.  Only
//! `MOVE_DELTA` and `SET_SCALE` read a payload; the other verbs ignore one if
//! present.  Hotkeys embed their key names in the verb itself
//! (`HOTKEY_CTRL_SHIFT_ESC`).
//!
//! | Verb | Payload | Parsed as |
//! |------|---------|-----------|
//! | `MOVE_DELTA` | `dx,dy` | [`Command::MoveDelta`] |
//! | `SET_SCALE` | `factor` | [`Command::SetScale`] |
//! | `SCROLL_UP` / `SCROLL_DOWN` | – | [`Command::Scroll`] |
//! | `LEFT_CLICK` / `RIGHT_CLICK` | – | [`Command::Click`] |
//! | `LEFT_DOWN` / `LEFT_UP` | – | [`Command::Press`] / [`Command::Release`] |
//! | `HOTKEY_<NAME>` | – | [`Command::Hotkey`] |

use thiserror::Error;

use crate::domain::hotkey::HotkeyCombo;
use crate::domain::motion::ScaleFactor;

/// Separates the verb from its payload.
pub const COMMAND_DELIMITER: char = ':';

/// Separates the two coordinates of a `MOVE_DELTA` payload.
pub const COORDINATE_DELIMITER: char = ',';

/// Verb prefix for hotkey commands.
pub const HOTKEY_PREFIX: &str = "HOTKEY_";

/// Errors produced while parsing a command line.
///
/// None of these are fatal: the dispatcher logs them and moves on to the next
/// datagram.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The line was empty or whitespace only.
    #[error("empty command")]
    Empty,

    /// The verb is not part of the command set.
    #[error("unknown verb: {0:?}")]
    UnknownVerb(String),

    /// A verb that requires a payload arrived without one.
    #[error("{verb} requires a payload")]
    MissingPayload { verb: &'static str },

    /// The payload had the wrong number of comma-separated fields.
    #[error("{verb} expects {expected} field(s), got {found}")]
    WrongArity {
        verb: &'static str,
        expected: usize,
        found: usize,
    },

    /// A payload field is not a finite number.
    #[error("{field} is not a finite number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A `HOTKEY_` verb contained no key names.
    #[error("hotkey {0:?} contains no key names")]
    EmptyHotkey(String),
}

/// Mouse buttons addressable by the command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Direction of a scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Sign applied to the configured scroll magnitude.
    pub fn sign(self) -> i32 {
        match self {
            ScrollDirection::Up => 1,
            ScrollDirection::Down => -1,
        }
    }
}

/// A fully parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Relative pointer motion in sender pixels, before scaling.
    MoveDelta { dx: f64, dy: f64 },
    /// Replace the dispatcher's scale factor.
    SetScale(ScaleFactor),
    /// One fixed-magnitude vertical scroll tick.
    Scroll(ScrollDirection),
    /// Press and release a button.
    Click(MouseButton),
    /// Press a button without releasing it (drag start).
    Press(MouseButton),
    /// Release a previously pressed button (drag end).
    Release(MouseButton),
    /// Send a key combination.
    Hotkey(HotkeyCombo),
}

impl Command {
    /// The wire verb this command was parsed from, for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::MoveDelta { .. } => "MOVE_DELTA",
            Command::SetScale(_) => "SET_SCALE",
            Command::Scroll(ScrollDirection::Up) => "SCROLL_UP",
            Command::Scroll(ScrollDirection::Down) => "SCROLL_DOWN",
            Command::Click(MouseButton::Left) => "LEFT_CLICK",
            Command::Click(MouseButton::Right) => "RIGHT_CLICK",
            Command::Press(_) => "LEFT_DOWN",
            Command::Release(_) => "LEFT_UP",
            Command::Hotkey(_) => "HOTKEY",
        }
    }
}

/// Parses one command line.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
///
/// # Examples
///
/// ```rust
/// use airmouse_core::protocol::{parse_command, Command};
///
/// let cmd = parse_command("MOVE_DELTA:1.5,-2").unwrap();
/// assert_eq!(cmd, Command::MoveDelta { dx: 1.5, dy: -2.0 });
/// ```
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (verb, payload) = match line.split_once(COMMAND_DELIMITER) {
        Some((verb, payload)) => (verb.trim(), Some(payload.trim())),
        None => (line, None),
    };

    match verb {
        "MOVE_DELTA" => parse_move_delta(require_payload("MOVE_DELTA", payload)?),
        "SET_SCALE" => parse_set_scale(require_payload("SET_SCALE", payload)?),
        "SCROLL_UP" => Ok(Command::Scroll(ScrollDirection::Up)),
        "SCROLL_DOWN" => Ok(Command::Scroll(ScrollDirection::Down)),
        "LEFT_CLICK" => Ok(Command::Click(MouseButton::Left)),
        "RIGHT_CLICK" => Ok(Command::Click(MouseButton::Right)),
        "LEFT_DOWN" => Ok(Command::Press(MouseButton::Left)),
        "LEFT_UP" => Ok(Command::Release(MouseButton::Left)),
        other => match other.strip_prefix(HOTKEY_PREFIX) {
            Some(name) => HotkeyCombo::parse(name).map(Command::Hotkey),
            None => Err(ParseError::UnknownVerb(other.to_string())),
        },
    }
}

fn require_payload<'a>(verb: &'static str, payload: Option<&'a str>) -> Result<&'a str, ParseError> {
    match payload {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ParseError::MissingPayload { verb }),
    }
}

fn parse_move_delta(payload: &str) -> Result<Command, ParseError> {
    let fields: Vec<&str> = payload.split(COORDINATE_DELIMITER).collect();
    if fields.len() != 2 {
        return Err(ParseError::WrongArity {
            verb: "MOVE_DELTA",
            expected: 2,
            found: fields.len(),
        });
    }
    let dx = parse_finite("dx", fields[0])?;
    let dy = parse_finite("dy", fields[1])?;
    Ok(Command::MoveDelta { dx, dy })
}

fn parse_set_scale(payload: &str) -> Result<Command, ParseError> {
    let value = parse_finite("scale", payload)?;
    ScaleFactor::new(value)
        .map(Command::SetScale)
        .ok_or_else(|| ParseError::InvalidNumber {
            field: "scale",
            value: payload.trim().to_string(),
        })
}

fn parse_finite(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
