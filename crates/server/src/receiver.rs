//! Accepts pad connections and turns frames into key actions.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use shared::{
    error::ProtocolError,
    protocol::{decode_frame, WireMessage},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader},
    net::TcpListener,
};
use tracing::{debug, info, warn};

use crate::keys::{Key, KeyInjector, ModifierLatch};

/// Upper bound on a single frame, delimiter excluded. A longer line closes
/// the connection before more than this is buffered.
const MAX_FRAME_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct Receiver {
    injector: Arc<dyn KeyInjector>,
    latch: Arc<ModifierLatch>,
    tap_gap: Duration,
}

impl Receiver {
    pub fn new(injector: Arc<dyn KeyInjector>, tap_gap: Duration) -> Self {
        Self {
            injector,
            latch: Arc::new(ModifierLatch::default()),
            tap_gap,
        }
    }

    pub fn modifier_held(&self) -> bool {
        self.latch.is_held()
    }

    /// Lets go of the modifier if a pad left it held.
    pub fn release_modifier(&self) {
        self.latch.set(false, self.injector.as_ref());
    }

    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let receiver = self.clone();
            tokio::spawn(async move {
                receiver.handle_connection(stream, peer).await;
            });
        }
    }

    /// Reads newline-delimited frames until EOF. Bad frames are logged and
    /// skipped; the connection stays open.
    pub async fn handle_connection<R>(&self, stream: R, peer: SocketAddr)
    where
        R: AsyncRead + Unpin,
    {
        debug!(%peer, "pad connected");
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();
        loop {
            line.clear();
            let limit = (MAX_FRAME_BYTES + 1) as u64;
            match (&mut reader).take(limit).read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) if line.len() > MAX_FRAME_BYTES && line.last() != Some(&b'\n') => {
                    warn!(%peer, bytes = line.len(), "frame too large; closing connection");
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%peer, error = %err, "read failed");
                    break;
                }
            }
            if line.trim_ascii().is_empty() {
                continue;
            }
            match decode_frame(&line) {
                Ok(message) => self.process_message(message).await,
                Err(ProtocolError::UnsupportedMessage {
                    message_type,
                    reason,
                }) => {
                    warn!(%peer, ?message_type, %reason, "unsupported message");
                }
                Err(err) => {
                    warn!(%peer, error = %err, frame = %String::from_utf8_lossy(&line), "invalid frame");
                }
            }
        }
        debug!(%peer, "pad disconnected");
    }

    pub async fn process_message(&self, message: WireMessage) {
        match message {
            WireMessage::ToggleLeftCtrl => {
                let held = self.latch.toggle(self.injector.as_ref());
                info!(held, "toggle left ctrl");
            }
            WireMessage::DirectionDown { direction } => {
                info!(%direction, "direction down");
                self.injector.send_key(Key::for_direction(direction), true);
            }
            WireMessage::DirectionUp { direction } => {
                info!(%direction, "direction up");
                self.injector.send_key(Key::for_direction(direction), false);
            }
            WireMessage::Strategem { name, sequence } => {
                info!(%name, ?sequence, "strategem");
                self.tap_sequence(&sequence).await;
            }
        }
    }

    async fn tap_sequence(&self, sequence: &[String]) {
        for name in sequence {
            let Some(key) = Key::from_name(name) else {
                warn!(key = %name, "unknown key in sequence");
                continue;
            };
            self.injector.send_key(key, true);
            tokio::time::sleep(self.tap_gap).await;
            self.injector.send_key(key, false);
        }
    }
}

#[cfg(test)]
#[path = "tests/receiver_tests.rs"]
mod tests;
