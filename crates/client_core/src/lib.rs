//! Command protocol client for the pad: arm-state encoding, per-command TCP
//! delivery, and status feedback.

pub mod arm;
pub mod config;
pub mod controller;
pub mod status;
pub mod transport;

pub use arm::{ArmState, CommandEncoder, InputEvent, Transition};
pub use config::{load_settings, ConfigError, EndpointSource, PadSettings, SettingsStore};
pub use controller::PadController;
pub use status::{ChannelStatusSink, DispatchResult, StatusReport, StatusSink};
pub use transport::{Connection, Connector, DispatchError, TcpConnector, Timeouts, TransportClient};
