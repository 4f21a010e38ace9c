use std::{collections::HashMap, fs, time::Duration};

use shared::DEFAULT_PORT;
use tracing::warn;

#[derive(Debug)]
pub struct Settings {
    pub server_bind: String,
    /// Host advertised in the pairing payload; detected when unset.
    pub advertise_host: Option<String>,
    pub tap_gap_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: format!("0.0.0.0:{DEFAULT_PORT}"),
            advertise_host: None,
            tap_gap_ms: 50,
        }
    }
}

impl Settings {
    pub fn tap_gap(&self) -> Duration {
        Duration::from_millis(self.tap_gap_ms)
    }
}

pub fn load_settings() -> Settings {
    let file_cfg = fs::read_to_string("server.toml")
        .ok()
        .and_then(|raw| toml::from_str::<HashMap<String, toml::Value>>(&raw).ok())
        .unwrap_or_default();
    resolve_settings(&file_cfg, |key| std::env::var(key).ok())
}

fn resolve_settings(
    file_cfg: &HashMap<String, toml::Value>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg.get("advertise_host").and_then(toml::Value::as_str) {
        settings.advertise_host = Some(v.to_string());
    }
    if let Some(v) = file_cfg.get("tap_gap_ms").and_then(toml::Value::as_integer) {
        match u64::try_from(v) {
            Ok(ms) => settings.tap_gap_ms = ms,
            Err(_) => warn!(value = v, "ignoring negative tap_gap_ms"),
        }
    }

    if let Some(v) = env("PAD_SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("PAD_ADVERTISE_HOST") {
        settings.advertise_host = Some(v);
    }
    if let Some(v) = env("PAD_TAP_GAP_MS") {
        match v.parse::<u64>() {
            Ok(ms) => settings.tap_gap_ms = ms,
            Err(_) => warn!(value = %v, "ignoring invalid PAD_TAP_GAP_MS"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
