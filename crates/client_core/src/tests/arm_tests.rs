use super::*;

fn every_direction_event() -> Vec<InputEvent> {
    Direction::ALL
        .into_iter()
        .flat_map(|direction| [InputEvent::pressed(direction), InputEvent::released(direction)])
        .collect()
}

#[test]
fn starts_disarmed() {
    assert_eq!(CommandEncoder::new().state(), ArmState::Disarmed);
}

#[test]
fn direction_input_is_swallowed_while_disarmed() {
    let mut encoder = CommandEncoder::new();
    let events = every_direction_event();
    for _ in 0..3 {
        for event in &events {
            assert_eq!(encoder.encode(*event), None);
        }
    }
    assert_eq!(encoder.state(), ArmState::Disarmed);
}

#[test]
fn toggle_always_emits_and_flips_state() {
    let mut encoder = CommandEncoder::new();

    assert_eq!(
        encoder.encode(InputEvent::ToggleModifier),
        Some(Command::ToggleModifier)
    );
    assert_eq!(encoder.state(), ArmState::Armed);

    assert_eq!(
        encoder.encode(InputEvent::ToggleModifier),
        Some(Command::ToggleModifier)
    );
    assert_eq!(encoder.state(), ArmState::Disarmed);
}

#[test]
fn armed_direction_maps_transition_to_pressed_flag() {
    let mut encoder = CommandEncoder::new();
    encoder.encode(InputEvent::ToggleModifier);

    assert_eq!(
        encoder.encode(InputEvent::pressed(Direction::Up)),
        Some(Command::press(Direction::Up))
    );
    assert_eq!(
        encoder.encode(InputEvent::released(Direction::Up)),
        Some(Command::release(Direction::Up))
    );
}

#[test]
fn bounce_produces_one_command_per_transition() {
    let mut encoder = CommandEncoder::new();
    encoder.encode(InputEvent::ToggleModifier);

    let commands: Vec<_> = (0..5)
        .flat_map(|_| {
            [
                InputEvent::pressed(Direction::Left),
                InputEvent::released(Direction::Left),
            ]
        })
        .filter_map(|event| encoder.encode(event))
        .collect();
    assert_eq!(commands.len(), 10);
}

#[test]
fn release_without_press_still_emits() {
    let mut encoder = CommandEncoder::new();
    encoder.encode(InputEvent::ToggleModifier);
    assert_eq!(
        encoder.encode(InputEvent::released(Direction::Right)),
        Some(Command::release(Direction::Right))
    );
}

#[test]
fn concurrent_presses_are_not_interlocked() {
    let mut encoder = CommandEncoder::new();
    encoder.encode(InputEvent::ToggleModifier);
    assert!(encoder.encode(InputEvent::pressed(Direction::Up)).is_some());
    assert!(encoder.encode(InputEvent::pressed(Direction::Left)).is_some());
}

#[test]
fn disarming_gates_subsequent_direction_input() {
    let mut encoder = CommandEncoder::new();
    encoder.encode(InputEvent::ToggleModifier);
    encoder.encode(InputEvent::ToggleModifier);
    assert_eq!(encoder.encode(InputEvent::pressed(Direction::Down)), None);
}
