//! Pad settings: defaults, `pad.toml`, environment, and out-of-band updates.

use std::{
    fs,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use serde::Deserialize;
use shared::{
    domain::{Endpoint, PairingPayload},
    error::ProtocolError,
    protocol::WireSchema,
    DEFAULT_PORT,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::transport::{Timeouts, DEFAULT_CONNECT_TIMEOUT, DEFAULT_WRITE_TIMEOUT};

pub const DEFAULT_CONFIG_FILE: &str = "pad.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("host is not configured")]
    MissingHost,
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Pairing(#[from] ProtocolError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PadSettings {
    pub host: String,
    pub port: u16,
    pub schema: WireSchema,
    pub connect_timeout_ms: u64,
    pub write_timeout_ms: u64,
}

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            schema: WireSchema::Canonical,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT.as_millis() as u64,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT.as_millis() as u64,
        }
    }
}

impl PadSettings {
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        Ok(Endpoint::new(host, self.port))
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_millis(self.connect_timeout_ms.max(1)),
            write: Duration::from_millis(self.write_timeout_ms.max(1)),
        }
    }
}

/// Loads settings from `path` (or `pad.toml` when present) and then applies
/// `PAD_*` environment overrides.
pub fn load_settings(path: Option<&Path>) -> Result<PadSettings, ConfigError> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_settings_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => PadSettings::default(),
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<PadSettings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn apply_env_overrides(
    settings: &mut PadSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("PAD_HOST") {
        settings.host = v.trim().to_string();
    }
    if let Some(v) = lookup("PAD_PORT") {
        match v.trim().parse::<u16>() {
            Ok(port) => settings.port = port,
            Err(_) => warn!(value = %v, "ignoring invalid PAD_PORT"),
        }
    }
    if let Some(v) = lookup("PAD_SCHEMA") {
        match v.parse::<WireSchema>() {
            Ok(schema) => settings.schema = schema,
            Err(err) => warn!(value = %v, error = %err, "ignoring invalid PAD_SCHEMA"),
        }
    }
    if let Some(v) = lookup("PAD_CONNECT_TIMEOUT_MS") {
        match v.trim().parse::<u64>() {
            Ok(ms) => settings.connect_timeout_ms = ms,
            Err(_) => warn!(value = %v, "ignoring invalid PAD_CONNECT_TIMEOUT_MS"),
        }
    }
    if let Some(v) = lookup("PAD_WRITE_TIMEOUT_MS") {
        match v.trim().parse::<u64>() {
            Ok(ms) => settings.write_timeout_ms = ms,
            Err(_) => warn!(value = %v, "ignoring invalid PAD_WRITE_TIMEOUT_MS"),
        }
    }
}

/// Supplies the endpoint for each dispatch. Implementations must return the
/// current value, not one captured at startup.
pub trait EndpointSource: Send + Sync {
    fn endpoint(&self) -> Result<Endpoint, ConfigError>;
}

/// Settings shared between the input surface and whatever edits them.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<PadSettings>>,
}

impl SettingsStore {
    pub fn new(settings: PadSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn snapshot(&self) -> PadSettings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Manual host/port entry. A blank host is rejected; a port that does not
    /// parse falls back to the default port.
    pub fn apply_manual(&self, host: &str, port_text: &str) -> Result<Endpoint, ConfigError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        let port = port_text.trim().parse::<u16>().unwrap_or(DEFAULT_PORT);
        Ok(self.set_endpoint(Endpoint::new(host, port)))
    }

    /// Imports a scanned pairing payload. Invalid payloads leave the stored
    /// settings untouched.
    pub fn apply_pairing_json(&self, raw: &str) -> Result<Endpoint, ConfigError> {
        let payload = PairingPayload::parse(raw)?;
        Ok(self.set_endpoint(payload.endpoint()))
    }

    fn set_endpoint(&self, endpoint: Endpoint) -> Endpoint {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.host = endpoint.host.clone();
        guard.port = endpoint.port;
        info!(%endpoint, "endpoint updated");
        endpoint
    }
}

impl EndpointSource for SettingsStore {
    fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .endpoint()
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
