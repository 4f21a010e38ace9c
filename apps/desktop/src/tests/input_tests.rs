use super::*;

#[test]
fn ctrl_token_toggles() {
    assert_eq!(parse_token("CTRL").expect("ctrl"), vec![InputEvent::ToggleModifier]);
}

#[test]
fn suffixes_select_press_or_release() {
    assert_eq!(
        parse_token("up+").expect("press"),
        vec![InputEvent::pressed(Direction::Up)]
    );
    assert_eq!(
        parse_token("left-").expect("release"),
        vec![InputEvent::released(Direction::Left)]
    );
}

#[test]
fn bare_direction_is_a_tap() {
    assert_eq!(
        parse_token("right").expect("tap"),
        vec![
            InputEvent::pressed(Direction::Right),
            InputEvent::released(Direction::Right)
        ]
    );
}

#[test]
fn unknown_tokens_are_rejected_before_any_event() {
    let result = parse_tokens(["ctrl", "up+", "jump"]);
    assert!(matches!(result, Err(InputError::UnknownToken(token)) if token == "jump"));
    assert!(matches!(
        parse_token("north+"),
        Err(InputError::UnknownToken(_))
    ));
}

#[test]
fn lines_split_into_events() {
    assert_eq!(
        parse_line("  ctrl down+ down- ").expect("line"),
        Line::Events(vec![
            InputEvent::ToggleModifier,
            InputEvent::pressed(Direction::Down),
            InputEvent::released(Direction::Down),
        ])
    );
    assert_eq!(parse_line("").expect("empty"), Line::Events(Vec::new()));
}

#[test]
fn meta_commands_parse() {
    assert_eq!(
        parse_line(":host 192.168.1.4 6000").expect("host"),
        Line::Host {
            host: "192.168.1.4".into(),
            port: "6000".into()
        }
    );
    assert_eq!(
        parse_line(":host pc.local").expect("host"),
        Line::Host {
            host: "pc.local".into(),
            port: String::new()
        }
    );
    assert_eq!(
        parse_line(r#":pair {"host":"10.0.0.2","port":50555}"#).expect("pair"),
        Line::Pair(r#"{"host":"10.0.0.2","port":50555}"#.into())
    );
    assert_eq!(parse_line(":state").expect("state"), Line::State);
    assert_eq!(parse_line(":q").expect("quit"), Line::Quit);
}

#[test]
fn meta_commands_validate_arguments() {
    assert!(matches!(
        parse_line(":host"),
        Err(InputError::MissingArgument(":host"))
    ));
    assert!(matches!(
        parse_line(":pair   "),
        Err(InputError::MissingArgument(":pair"))
    ));
    assert!(matches!(
        parse_line(":reboot"),
        Err(InputError::UnknownCommand(name)) if name == "reboot"
    ));
}
