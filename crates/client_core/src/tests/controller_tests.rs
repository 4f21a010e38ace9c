use super::*;
use std::{sync::Mutex, time::Duration};

use shared::domain::{Direction, Endpoint};
use tokio::{io::AsyncReadExt, net::TcpListener};

use crate::{config::ConfigError, transport::Timeouts};

#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<StatusReport>>,
}

impl RecordingSink {
    fn finished(&self) -> Vec<DispatchResult> {
        self.reports
            .lock()
            .expect("sink lock")
            .iter()
            .filter_map(|report| match report {
                StatusReport::Finished(result) => Some(result.clone()),
                StatusReport::Sending { .. } => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, report: StatusReport) {
        self.reports.lock().expect("sink lock").push(report);
    }
}

struct FixedEndpoint(Endpoint);

impl EndpointSource for FixedEndpoint {
    fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        Ok(self.0.clone())
    }
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

fn fast_transport(sink: Arc<RecordingSink>) -> TransportClient {
    TransportClient::new(Handle::current(), sink).with_timeouts(Timeouts {
        connect: Duration::from_millis(500),
        write: Duration::from_millis(500),
    })
}

#[tokio::test]
async fn disarmed_direction_input_dispatches_nothing() {
    let sink = Arc::new(RecordingSink::default());
    let mut controller = PadController::new(
        fast_transport(Arc::clone(&sink)),
        FixedEndpoint(Endpoint::new("127.0.0.1", closed_port())),
    );

    for direction in Direction::ALL {
        assert!(controller.handle(InputEvent::pressed(direction)).is_none());
        assert!(controller.handle(InputEvent::released(direction)).is_none());
    }
    assert!(sink.reports.lock().expect("sink lock").is_empty());
}

#[tokio::test]
async fn failed_toggle_still_flips_local_state() {
    let sink = Arc::new(RecordingSink::default());
    let mut controller = PadController::new(
        fast_transport(Arc::clone(&sink)),
        FixedEndpoint(Endpoint::new("127.0.0.1", closed_port())),
    );

    let handle = controller
        .handle(InputEvent::ToggleModifier)
        .expect("toggle dispatch");
    assert_eq!(controller.arm_state(), ArmState::Armed);

    let result = handle.await.expect("dispatch task");
    assert!(!result.is_success());
    assert_eq!(controller.arm_state(), ArmState::Armed);
    assert_eq!(sink.finished(), vec![result]);
}

#[tokio::test]
async fn missing_host_reports_failure_without_dispatching() {
    let sink = Arc::new(RecordingSink::default());
    let store = SettingsStore::default();
    let mut controller = PadController::new(fast_transport(Arc::clone(&sink)), store);

    assert!(controller.handle(InputEvent::ToggleModifier).is_none());
    assert_eq!(controller.arm_state(), ArmState::Armed);
    assert_eq!(
        sink.finished(),
        vec![DispatchResult::Failure {
            label: "toggle ctrl".into(),
            cause: "host is not configured".into(),
        }]
    );
}

#[tokio::test]
async fn endpoint_changes_apply_to_the_next_dispatch() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = String::new();
        socket.read_to_string(&mut buf).await.expect("read");
        buf
    });

    let sink = Arc::new(RecordingSink::default());
    let store = SettingsStore::default();
    let mut controller = PadController::new(fast_transport(Arc::clone(&sink)), store.clone());

    assert!(controller.handle(InputEvent::ToggleModifier).is_none());

    store
        .apply_pairing_json(&format!(r#"{{"host":"127.0.0.1","port":{port}}}"#))
        .expect("pairing");
    let result = controller
        .handle(InputEvent::pressed(Direction::Up))
        .expect("press dispatch")
        .await
        .expect("dispatch task");

    assert!(result.is_success());
    assert_eq!(
        server.await.expect("server"),
        "{\"type\":\"direction_down\",\"direction\":\"up\"}\n"
    );
}

#[tokio::test]
async fn legacy_schema_skips_releases() {
    let sink = Arc::new(RecordingSink::default());
    let transport = fast_transport(Arc::clone(&sink)).with_schema(shared::protocol::WireSchema::LegacyTap);
    let mut controller = PadController::new(
        transport,
        FixedEndpoint(Endpoint::new("127.0.0.1", closed_port())),
    );

    let _ = controller.handle(InputEvent::ToggleModifier);
    assert!(controller.handle(InputEvent::released(Direction::Left)).is_none());
    assert!(controller.handle(InputEvent::pressed(Direction::Left)).is_some());
}

#[tokio::test]
async fn from_settings_uses_configured_schema_and_timeouts() {
    let sink: Arc<dyn StatusSink> = Arc::new(RecordingSink::default());
    let store = SettingsStore::new(PadSettings {
        host: "127.0.0.1".into(),
        schema: shared::protocol::WireSchema::LegacyTap,
        connect_timeout_ms: 250,
        ..PadSettings::default()
    });

    let controller = PadController::from_settings(Handle::current(), &store, sink);

    assert_eq!(controller.transport.schema(), shared::protocol::WireSchema::LegacyTap);
    assert_eq!(controller.transport.timeouts().connect, Duration::from_millis(250));
    assert_eq!(
        controller.endpoints().endpoint().expect("endpoint"),
        Endpoint::new("127.0.0.1", 50555)
    );
}
