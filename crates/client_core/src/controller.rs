use std::sync::Arc;

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    arm::{ArmState, CommandEncoder, InputEvent},
    config::{EndpointSource, PadSettings, SettingsStore},
    status::{DispatchResult, StatusReport, StatusSink},
    transport::TransportClient,
};

/// Glue for an input surface: owns the arm flag and hands commands to the
/// transport. Lives on the input thread.
pub struct PadController<E: EndpointSource = SettingsStore> {
    encoder: CommandEncoder,
    transport: TransportClient,
    endpoints: E,
}

impl PadController<SettingsStore> {
    /// Builds a TCP-backed controller whose schema and timeouts come from
    /// `settings`.
    pub fn from_settings(
        runtime: Handle,
        settings: &SettingsStore,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let snapshot: PadSettings = settings.snapshot();
        let transport = TransportClient::new(runtime, sink)
            .with_schema(snapshot.schema)
            .with_timeouts(snapshot.timeouts());
        Self::new(transport, settings.clone())
    }
}

impl<E: EndpointSource> PadController<E> {
    pub fn new(transport: TransportClient, endpoints: E) -> Self {
        Self {
            encoder: CommandEncoder::new(),
            transport,
            endpoints,
        }
    }

    pub fn arm_state(&self) -> ArmState {
        self.encoder.state()
    }

    pub fn endpoints(&self) -> &E {
        &self.endpoints
    }

    /// Applies one input event. Returns the in-flight dispatch, if any. The
    /// arm flag is updated before anything is sent, so a failed toggle still
    /// leaves the local state flipped.
    pub fn handle(&mut self, event: InputEvent) -> Option<JoinHandle<DispatchResult>> {
        let command = self.encoder.encode(event)?;
        if !self.transport.schema().carries(&command) {
            debug!(label = %command, schema = ?self.transport.schema(), "schema has no frame for command");
            return None;
        }

        match self.endpoints.endpoint() {
            Ok(endpoint) => Some(self.transport.dispatch(command, endpoint)),
            Err(err) => {
                let label = command.label();
                warn!(%label, error = %err, "no endpoint for command");
                let sink = self.transport.sink();
                sink.report(StatusReport::Sending {
                    label: label.clone(),
                });
                sink.report(StatusReport::Finished(DispatchResult::Failure {
                    label,
                    cause: err.to_string(),
                }));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
