use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, ChannelStatusSink, DispatchResult, PadController, SettingsStore, StatusReport,
};
use crossbeam_channel::Receiver;
use shared::protocol::WireSchema;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

mod input;
mod interactive;

use input::parse_tokens;

#[derive(Parser, Debug)]
#[command(name = "pad", about = "Send pad commands to a receiver on the local network")]
struct Args {
    /// Settings file (defaults to ./pad.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    schema: Option<WireSchema>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Send each token in order, waiting for one to finish before the next.
    Send {
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Read tokens from stdin, one line at a time.
    Interactive,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(schema) = args.schema {
        settings.schema = schema;
    }
    let store = SettingsStore::new(settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to build dispatch runtime")?;
    let (sink, status_rx) = ChannelStatusSink::new();
    let mut controller = PadController::from_settings(runtime.handle().clone(), &store, Arc::new(sink));

    match args.mode {
        Mode::Send { tokens } => run_send(&runtime, &mut controller, &status_rx, &tokens),
        Mode::Interactive => {
            let lines = interactive::spawn_stdin_reader();
            interactive::run(
                &runtime,
                &mut controller,
                &store,
                &lines,
                &status_rx,
                &mut io::stdout(),
            )
        }
    }
}

fn run_send(
    runtime: &Runtime,
    controller: &mut PadController,
    status_rx: &Receiver<StatusReport>,
    tokens: &[String],
) -> Result<()> {
    let events = parse_tokens(tokens.iter().map(String::as_str))?;
    let mut failures = 0usize;
    for event in events {
        if let Some(handle) = controller.handle(event) {
            runtime.block_on(handle).context("dispatch task panicked")?;
        }
        failures += drain_status(status_rx);
    }
    if failures > 0 {
        anyhow::bail!("{failures} command(s) were not delivered");
    }
    Ok(())
}

/// Prints every queued report and returns how many were failures.
fn drain_status(status_rx: &Receiver<StatusReport>) -> usize {
    status_rx
        .try_iter()
        .inspect(|report| println!("status: {report}"))
        .filter(|report| matches!(report, StatusReport::Finished(DispatchResult::Failure { .. })))
        .count()
}
