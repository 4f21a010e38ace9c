//! Arm-state machine that turns surface input into commands.

use shared::{domain::Direction, protocol::Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArmState {
    #[default]
    Disarmed,
    Armed,
}

impl ArmState {
    pub fn is_armed(self) -> bool {
        self == ArmState::Armed
    }

    pub fn toggled(self) -> Self {
        match self {
            ArmState::Disarmed => ArmState::Armed,
            ArmState::Armed => ArmState::Disarmed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released,
}

/// Discrete event coming from the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ToggleModifier,
    Direction {
        direction: Direction,
        transition: Transition,
    },
}

impl InputEvent {
    pub fn pressed(direction: Direction) -> Self {
        Self::Direction {
            direction,
            transition: Transition::Pressed,
        }
    }

    pub fn released(direction: Direction) -> Self {
        Self::Direction {
            direction,
            transition: Transition::Released,
        }
    }
}

/// Owns the arm flag. Must live on the thread that feeds it input; nothing
/// here blocks or fails.
#[derive(Debug, Default)]
pub struct CommandEncoder {
    state: ArmState,
}

impl CommandEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ArmState {
        self.state
    }

    /// Applies one input event. Directional input while disarmed is
    /// swallowed; there is no per-direction press tracking and no debouncing.
    pub fn encode(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::ToggleModifier => {
                self.state = self.state.toggled();
                Some(Command::ToggleModifier)
            }
            InputEvent::Direction {
                direction,
                transition,
            } => {
                if !self.state.is_armed() {
                    return None;
                }
                Some(Command::DirectionTransition {
                    direction,
                    pressed: transition == Transition::Pressed,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/arm_tests.rs"]
mod tests;
