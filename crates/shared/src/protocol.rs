use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{domain::Direction, error::ProtocolError};

/// A single unit of work for the remote process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleModifier,
    DirectionTransition { direction: Direction, pressed: bool },
}

impl Command {
    pub fn press(direction: Direction) -> Self {
        Self::DirectionTransition {
            direction,
            pressed: true,
        }
    }

    pub fn release(direction: Direction) -> Self {
        Self::DirectionTransition {
            direction,
            pressed: false,
        }
    }

    /// Human-readable description used for status reporting only.
    pub fn label(&self) -> String {
        match self {
            Command::ToggleModifier => "toggle ctrl".to_string(),
            Command::DirectionTransition { direction, pressed } => {
                let kind = if *pressed {
                    "direction_down"
                } else {
                    "direction_up"
                };
                format!("{kind} {direction}")
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    ToggleLeftCtrl,
    DirectionDown { direction: Direction },
    DirectionUp { direction: Direction },
    /// Tap-based legacy message: each key in `sequence` is pressed and released.
    Strategem { name: String, sequence: Vec<String> },
}

impl WireMessage {
    pub fn type_name(&self) -> &'static str {
        match self {
            WireMessage::ToggleLeftCtrl => "toggle_left_ctrl",
            WireMessage::DirectionDown { .. } => "direction_down",
            WireMessage::DirectionUp { .. } => "direction_up",
            WireMessage::Strategem { .. } => "strategem",
        }
    }
}

/// Wire dialect a deployment speaks. The two are not wire-compatible for
/// directional input; the receiver understands both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireSchema {
    #[default]
    Canonical,
    LegacyTap,
}

impl WireSchema {
    /// Maps a command onto this schema. Returns `None` when the schema has no
    /// representation for it (a release under the tap-based schema).
    pub fn encode(self, command: &Command) -> Option<WireMessage> {
        match (self, *command) {
            (_, Command::ToggleModifier) => Some(WireMessage::ToggleLeftCtrl),
            (
                WireSchema::Canonical,
                Command::DirectionTransition {
                    direction,
                    pressed: true,
                },
            ) => Some(WireMessage::DirectionDown { direction }),
            (
                WireSchema::Canonical,
                Command::DirectionTransition {
                    direction,
                    pressed: false,
                },
            ) => Some(WireMessage::DirectionUp { direction }),
            (
                WireSchema::LegacyTap,
                Command::DirectionTransition {
                    direction,
                    pressed: true,
                },
            ) => Some(WireMessage::Strategem {
                name: format!("dir_{direction}"),
                sequence: vec![direction.key_name().to_string()],
            }),
            (WireSchema::LegacyTap, Command::DirectionTransition { pressed: false, .. }) => None,
        }
    }

    pub fn carries(self, command: &Command) -> bool {
        self.encode(command).is_some()
    }
}

impl std::str::FromStr for WireSchema {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "canonical" => Ok(WireSchema::Canonical),
            "legacy_tap" | "legacy" => Ok(WireSchema::LegacyTap),
            other => Err(format!("unknown wire schema '{other}'")),
        }
    }
}

/// Serializes one message as compact JSON followed by the `\n` frame
/// delimiter.
pub fn encode_frame(message: &WireMessage) -> Result<Vec<u8>, ProtocolError> {
    let mut frame = serde_json::to_vec(message).map_err(ProtocolError::Serialize)?;
    frame.push(b'\n');
    Ok(frame)
}

/// Parses one frame (with or without its trailing delimiter).
pub fn decode_frame(line: &[u8]) -> Result<WireMessage, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_slice(line.trim_ascii()).map_err(ProtocolError::InvalidJson)?;
    let message_type = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    serde_json::from_value(value).map_err(|err| ProtocolError::UnsupportedMessage {
        message_type,
        reason: err.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
