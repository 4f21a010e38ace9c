//! Key actions the receiver performs on the host.

use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use shared::domain::Direction;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    LeftCtrl,
}

impl Key {
    /// Looks up a key by the name used in frames (`w`, `a`, `s`, `d`,
    /// `left ctrl`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "left ctrl" => Some(Key::LeftCtrl),
            _ => None,
        }
    }

    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Key::W,
            Direction::Down => Key::S,
            Direction::Left => Key::A,
            Direction::Right => Key::D,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::LeftCtrl => "left ctrl",
        })
    }
}

/// Presses or releases a key on the host. Platform adapters plug in here.
pub trait KeyInjector: Send + Sync {
    fn send_key(&self, key: Key, pressed: bool);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingKeyInjector;

impl KeyInjector for LoggingKeyInjector {
    fn send_key(&self, key: Key, pressed: bool) {
        let state = if pressed { "down" } else { "up" };
        info!(%key, state, "key");
    }
}

/// Tracks whether Left Ctrl is held so repeated requests stay idempotent.
#[derive(Debug, Default)]
pub struct ModifierLatch {
    held: Mutex<bool>,
}

impl ModifierLatch {
    pub fn is_held(&self) -> bool {
        *self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle(&self, injector: &dyn KeyInjector) -> bool {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        *held = !*held;
        injector.send_key(Key::LeftCtrl, *held);
        *held
    }

    /// Forces the modifier into `down`. Only emits a key event on change.
    pub fn set(&self, down: bool, injector: &dyn KeyInjector) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if *held != down {
            injector.send_key(Key::LeftCtrl, down);
            *held = down;
        }
    }
}
