use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{Direction, Endpoint},
    protocol::{encode_frame, WireMessage},
    DEFAULT_PORT,
};
use tokio::{io::AsyncWriteExt, net::TcpStream};

/// Sends raw frames to a receiver, bypassing the pad's arm-state gate.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Toggle Left Ctrl on the receiver.
    Ctrl,
    /// Send a legacy tap sequence.
    Strategem {
        #[arg(long, default_value = "test_orbital")]
        name: String,
        #[arg(long, value_delimiter = ',', default_value = "w,s,d,a")]
        sequence: Vec<String>,
    },
    /// Hold or release one direction.
    Direction {
        direction: Direction,
        #[arg(long)]
        release: bool,
    },
}

impl Command {
    fn into_message(self) -> WireMessage {
        match self {
            Command::Ctrl => WireMessage::ToggleLeftCtrl,
            Command::Strategem { name, sequence } => WireMessage::Strategem { name, sequence },
            Command::Direction {
                direction,
                release: false,
            } => WireMessage::DirectionDown { direction },
            Command::Direction {
                direction,
                release: true,
            } => WireMessage::DirectionUp { direction },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let endpoint = Endpoint::new(cli.host, cli.port);
    let message = cli.command.into_message();
    let frame = encode_frame(&message)?;

    let mut stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
        .await
        .with_context(|| format!("failed to connect to {endpoint}"))?;
    stream
        .write_all(&frame)
        .await
        .with_context(|| format!("failed to write to {endpoint}"))?;
    stream.shutdown().await?;

    println!("sent {} to {endpoint}", message.type_name());
    Ok(())
}
