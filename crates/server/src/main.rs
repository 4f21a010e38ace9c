use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod keys;
mod pairing;
mod receiver;

use config::load_settings;
use keys::LoggingKeyInjector;
use pairing::pairing_payload;
use receiver::Receiver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!(%local, "receiver listening");

    let payload = pairing_payload(settings.advertise_host.as_deref(), local.ip(), local.port());
    info!(pairing = %serde_json::to_string(&payload)?, "pairing payload");

    let receiver = Receiver::new(Arc::new(LoggingKeyInjector), settings.tap_gap());
    tokio::select! {
        result = receiver.serve(listener) => result.context("accept loop failed")?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    if receiver.modifier_held() {
        info!("releasing held left ctrl");
        receiver.release_modifier();
    }
    Ok(())
}
