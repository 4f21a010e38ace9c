//! Text input surface. Everything is validated here so only well-formed
//! events ever reach the controller.

use client_core::InputEvent;
use shared::{domain::Direction, error::ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unrecognized input '{0}' (expected ctrl, <dir>, <dir>+ or <dir>-)")]
    UnknownToken(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("{0} requires an argument")]
    MissingArgument(&'static str),
}

/// One line typed in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Events(Vec<InputEvent>),
    Host { host: String, port: String },
    Pair(String),
    State,
    Quit,
}

/// `ctrl` toggles the modifier, `up+` presses, `up-` releases, and a bare
/// direction is a tap (press then release).
pub fn parse_token(token: &str) -> Result<Vec<InputEvent>, InputError> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("ctrl") || token.eq_ignore_ascii_case("toggle") {
        return Ok(vec![InputEvent::ToggleModifier]);
    }

    let unknown = |_: ProtocolError| InputError::UnknownToken(token.to_string());
    if let Some(name) = token.strip_suffix('+') {
        let direction: Direction = name.parse().map_err(unknown)?;
        return Ok(vec![InputEvent::pressed(direction)]);
    }
    if let Some(name) = token.strip_suffix('-') {
        let direction: Direction = name.parse().map_err(unknown)?;
        return Ok(vec![InputEvent::released(direction)]);
    }
    let direction: Direction = token.parse().map_err(unknown)?;
    Ok(vec![
        InputEvent::pressed(direction),
        InputEvent::released(direction),
    ])
}

pub fn parse_tokens<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<InputEvent>, InputError> {
    let mut events = Vec::new();
    for token in tokens {
        events.extend(parse_token(token)?);
    }
    Ok(events)
}

pub fn parse_line(line: &str) -> Result<Line, InputError> {
    let line = line.trim();
    let Some(meta) = line.strip_prefix(':') else {
        return parse_tokens(line.split_whitespace()).map(Line::Events);
    };

    let (command, rest) = meta
        .split_once(char::is_whitespace)
        .map_or((meta, ""), |(command, rest)| (command, rest.trim()));
    match command {
        "host" => {
            let mut parts = rest.split_whitespace();
            let host = parts.next().ok_or(InputError::MissingArgument(":host"))?;
            Ok(Line::Host {
                host: host.to_string(),
                port: parts.next().unwrap_or_default().to_string(),
            })
        }
        "pair" if rest.is_empty() => Err(InputError::MissingArgument(":pair")),
        "pair" => Ok(Line::Pair(rest.to_string())),
        "state" => Ok(Line::State),
        "quit" | "q" => Ok(Line::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
