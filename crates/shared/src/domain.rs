use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{error::ProtocolError, DEFAULT_PORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Keyboard key the receiver presses for this direction.
    pub fn key_name(self) -> &'static str {
        match self {
            Direction::Up => "w",
            Direction::Down => "s",
            Direction::Left => "a",
            Direction::Right => "d",
        }
    }

    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.key_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ProtocolError::UnknownDirection(trimmed.to_string()))
    }
}

/// Accepts any casing on the wire (`"UP"`, `"Left"`), like `FromStr`.
impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Remote host/port a command is delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Reads a port given as a number or as a numeric string. A string that is
/// not a port falls back to the default port.
fn lenient_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortField {
        Number(u16),
        Text(String),
    }

    Ok(match PortField::deserialize(deserializer)? {
        PortField::Number(port) => port,
        PortField::Text(text) => text.trim().parse().unwrap_or(DEFAULT_PORT),
    })
}

/// JSON payload advertised by the receiver (rendered as a QR code) and
/// imported by the pad to configure its endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingPayload {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "lenient_port")]
    pub port: u16,
}

impl PairingPayload {
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let payload: Self = serde_json::from_str(raw.trim())
            .map_err(|err| ProtocolError::InvalidPairing(err.to_string()))?;
        if payload.host.trim().is_empty() {
            return Err(ProtocolError::InvalidPairing("host is empty".into()));
        }
        Ok(Self {
            host: payload.host.trim().to_string(),
            port: payload.port,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }
}

impl From<&Endpoint> for PairingPayload {
    fn from(value: &Endpoint) -> Self {
        Self {
            host: value.host.clone(),
            port: value.port,
        }
    }
}
