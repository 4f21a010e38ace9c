use super::*;

fn file(raw: &str) -> HashMap<String, toml::Value> {
    toml::from_str(raw).expect("toml")
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_listen_on_all_interfaces_at_default_port() {
    let settings = resolve_settings(&HashMap::new(), no_env);
    assert_eq!(settings.server_bind, "0.0.0.0:50555");
    assert_eq!(settings.advertise_host, None);
    assert_eq!(settings.tap_gap(), Duration::from_millis(50));
}

#[test]
fn file_values_apply_and_env_wins() {
    let cfg = file("bind_addr = \"127.0.0.1:6000\"\ntap_gap_ms = 10\nadvertise_host = \"pc.lan\"\n");
    let settings = resolve_settings(&cfg, |key| {
        (key == "PAD_SERVER_BIND").then(|| "0.0.0.0:7000".to_string())
    });
    assert_eq!(settings.server_bind, "0.0.0.0:7000");
    assert_eq!(settings.tap_gap_ms, 10);
    assert_eq!(settings.advertise_host.as_deref(), Some("pc.lan"));
}

#[test]
fn invalid_values_are_ignored() {
    let cfg = file("tap_gap_ms = -5\n");
    let settings = resolve_settings(&cfg, |key| {
        (key == "PAD_TAP_GAP_MS").then(|| "soon".to_string())
    });
    assert_eq!(settings.tap_gap_ms, 50);
}
