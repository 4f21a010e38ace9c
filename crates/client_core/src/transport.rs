//! One-connection-per-command delivery of frames to the remote process.

use std::{io, sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::Endpoint,
    error::ProtocolError,
    protocol::{encode_frame, Command, WireSchema},
};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, net::TcpStream, runtime::Handle, task::JoinHandle, time::timeout};
use tracing::{debug, warn};

use crate::status::{DispatchResult, StatusReport, StatusSink};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub write: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            write: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },
    #[error("timed out connecting to {endpoint} after {}ms", .after.as_millis())]
    ConnectTimeout { endpoint: Endpoint, after: Duration },
    #[error("failed to write to {endpoint}: {source}")]
    Write {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },
    #[error("timed out writing to {endpoint} after {}ms", .after.as_millis())]
    WriteTimeout { endpoint: Endpoint, after: Duration },
    #[error("{label} has no {schema:?} encoding")]
    Unencodable { label: String, schema: WireSchema },
    #[error(transparent)]
    Encode(#[from] ProtocolError),
}

/// Opens a fresh stream for a single frame.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<Box<dyn Connection>>;
}

/// A stream owned by exactly one dispatch. Dropping it releases the socket.
#[async_trait]
pub trait Connection: Send {
    async fn write_all(&mut self, frame: &[u8]) -> io::Result<()>;
    async fn flush(&mut self) -> io::Result<()>;
    async fn shutdown(&mut self) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &Endpoint) -> io::Result<Box<dyn Connection>> {
        let stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port)).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(TcpConnection { stream }))
    }
}

struct TcpConnection {
    stream: TcpStream,
}

#[async_trait]
impl Connection for TcpConnection {
    async fn write_all(&mut self, frame: &[u8]) -> io::Result<()> {
        self.stream.write_all(frame).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.stream.flush().await
    }

    async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

async fn write_frame(connection: &mut dyn Connection, frame: &[u8]) -> io::Result<()> {
    connection.write_all(frame).await?;
    connection.flush().await?;
    connection.shutdown().await
}

/// Fire-and-forget delivery. No pooling, no retries, no reply is read.
#[derive(Clone)]
pub struct TransportClient {
    connector: Arc<dyn Connector>,
    sink: Arc<dyn StatusSink>,
    schema: WireSchema,
    timeouts: Timeouts,
    runtime: Handle,
}

impl TransportClient {
    pub fn new(runtime: Handle, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            connector: Arc::new(TcpConnector),
            sink,
            schema: WireSchema::default(),
            timeouts: Timeouts::default(),
            runtime,
        }
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_schema(mut self, schema: WireSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn schema(&self) -> WireSchema {
        self.schema
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn sink(&self) -> &Arc<dyn StatusSink> {
        &self.sink
    }

    /// Hands the command to the runtime and returns immediately. Safe to
    /// call from threads that are not part of the runtime.
    pub fn dispatch(&self, command: Command, endpoint: Endpoint) -> JoinHandle<DispatchResult> {
        self.sink.report(StatusReport::Sending {
            label: command.label(),
        });
        let client = self.clone();
        self.runtime
            .spawn(async move { client.deliver(command, endpoint).await })
    }

    /// Delivers on the current task.
    pub async fn send(&self, command: Command, endpoint: Endpoint) -> DispatchResult {
        self.sink.report(StatusReport::Sending {
            label: command.label(),
        });
        self.deliver(command, endpoint).await
    }

    async fn deliver(&self, command: Command, endpoint: Endpoint) -> DispatchResult {
        let label = command.label();
        let result = match self.try_deliver(&command, &endpoint).await {
            Ok(()) => {
                debug!(%label, %endpoint, "frame delivered");
                DispatchResult::Success { label }
            }
            Err(err) => {
                warn!(%label, %endpoint, error = %err, "dropping command");
                DispatchResult::Failure {
                    label,
                    cause: err.to_string(),
                }
            }
        };
        self.sink.report(StatusReport::Finished(result.clone()));
        result
    }

    async fn try_deliver(&self, command: &Command, endpoint: &Endpoint) -> Result<(), DispatchError> {
        let message = self
            .schema
            .encode(command)
            .ok_or_else(|| DispatchError::Unencodable {
                label: command.label(),
                schema: self.schema,
            })?;
        let frame = encode_frame(&message)?;

        let mut connection =
            match timeout(self.timeouts.connect, self.connector.connect(endpoint)).await {
                Ok(Ok(connection)) => connection,
                Ok(Err(source)) => {
                    return Err(DispatchError::Connect {
                        endpoint: endpoint.clone(),
                        source,
                    })
                }
                Err(_) => {
                    return Err(DispatchError::ConnectTimeout {
                        endpoint: endpoint.clone(),
                        after: self.timeouts.connect,
                    })
                }
            };

        let written = timeout(self.timeouts.write, write_frame(connection.as_mut(), &frame)).await;
        drop(connection);

        match written {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(DispatchError::Write {
                endpoint: endpoint.clone(),
                source,
            }),
            Err(_) => Err(DispatchError::WriteTimeout {
                endpoint: endpoint.clone(),
                after: self.timeouts.write,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
