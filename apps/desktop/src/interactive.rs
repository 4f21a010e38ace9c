//! Interactive mode: stdin lines and dispatch status are multiplexed on the
//! input thread so outcomes print as soon as they arrive.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use client_core::{DispatchResult, PadController, SettingsStore, StatusReport};
use crossbeam_channel::{select, Receiver};
use futures::future::join_all;
use shared::domain::PairingPayload;
use tokio::{runtime::Runtime, task::JoinHandle};
use tracing::warn;

use crate::input::{parse_line, Line};

/// Reads stdin on its own thread. The channel disconnects at EOF.
pub fn spawn_stdin_reader() -> Receiver<io::Result<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn run(
    runtime: &Runtime,
    controller: &mut PadController,
    store: &SettingsStore,
    lines: &Receiver<io::Result<String>>,
    status_rx: &Receiver<StatusReport>,
    out: &mut impl Write,
) -> Result<()> {
    let mut in_flight: Vec<JoinHandle<DispatchResult>> = Vec::new();
    loop {
        select! {
            recv(lines) -> line => {
                let Ok(line) = line else { break };
                let line = line.context("failed to read stdin")?;
                if !apply_line(&line, controller, store, &mut in_flight, out)? {
                    break;
                }
                in_flight.retain(|handle| !handle.is_finished());
            }
            recv(status_rx) -> report => {
                if let Ok(report) = report {
                    writeln!(out, "status: {report}")?;
                }
            }
        }
    }

    for result in runtime.block_on(join_all(in_flight)) {
        if let Err(err) = result {
            warn!(error = %err, "dispatch task did not complete");
        }
    }
    for report in status_rx.try_iter() {
        writeln!(out, "status: {report}")?;
    }
    Ok(())
}

/// Returns `false` once the user asks to quit.
fn apply_line(
    line: &str,
    controller: &mut PadController,
    store: &SettingsStore,
    in_flight: &mut Vec<JoinHandle<DispatchResult>>,
    out: &mut impl Write,
) -> Result<bool> {
    match parse_line(line) {
        Ok(Line::Events(events)) => {
            for event in events {
                in_flight.extend(controller.handle(event));
            }
        }
        Ok(Line::Host { host, port }) => match store.apply_manual(&host, &port) {
            Ok(endpoint) => writeln!(out, "endpoint: {endpoint}")?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        Ok(Line::Pair(raw)) => match store.apply_pairing_json(&raw) {
            Ok(endpoint) => writeln!(out, "paired: {endpoint}")?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        Ok(Line::State) => {
            let settings = store.snapshot();
            let endpoint = PairingPayload {
                host: settings.host,
                port: settings.port,
            };
            writeln!(
                out,
                "modifier: {:?}, endpoint: {}",
                controller.arm_state(),
                serde_json::to_string(&endpoint)?
            )?;
        }
        Ok(Line::Quit) => return Ok(false),
        Err(err) => writeln!(out, "error: {err}")?,
    }
    Ok(true)
}

#[cfg(test)]
#[path = "tests/interactive_tests.rs"]
mod tests;
