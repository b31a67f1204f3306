mod sim;

use anyhow::Result;
use sim::{SimAction, SimMode, SimRadio};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{interval, sleep_until, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Delay between enabling auto-accept and the simulated peer connecting
const CONNECT_DELAY: Duration = Duration::from_secs(2);

/// Interval between payload lines in streaming mode
const PAYLOAD_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let listener = TcpListener::bind("0.0.0.0:9000").await?;
    info!("[SIM] Radio simulator listening on :9000");

    // One bridge at a time, like the real UART
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("[SIM] Bridge attached from {}", peer);
        match serve(socket).await {
            Ok(()) => info!("[SIM] Bridge detached"),
            Err(e) => warn!("[SIM] Session ended: {}", e),
        }
    }
}

/// Play the radio for one attached bridge
async fn serve(socket: TcpStream) -> Result<()> {
    socket.set_nodelay(true)?;
    let (mut reader, mut writer) = socket.into_split();

    let mut radio = SimRadio::new();
    let mut read_buf = [0u8; 256];
    let mut connect_at: Option<Instant> = None;
    let mut payload_ticker = interval(PAYLOAD_INTERVAL);
    let mut echo_line = Vec::new();

    loop {
        tokio::select! {
            result = reader.read(&mut read_buf) => {
                let n = result?;
                if n == 0 {
                    return Ok(());
                }
                let was_streaming = radio.mode() == SimMode::Streaming;
                for &byte in &read_buf[..n] {
                    for action in radio.feed(byte) {
                        match action {
                            SimAction::Send(bytes) => writer.write_all(&bytes).await?,
                            SimAction::ScheduleConnect if !radio.is_connected() => {
                                connect_at = Some(Instant::now() + CONNECT_DELAY);
                            }
                            SimAction::ScheduleConnect => {}
                            SimAction::Echo { byte, expected: Some(sent) } => {
                                if byte != sent {
                                    warn!("[SIM] Echo mismatch: sent {:#04x}, got {:#04x}", sent, byte);
                                }
                                echo_line.push(byte);
                                if byte == b'\n' {
                                    info!("[SIM] Echoed: {:?}", String::from_utf8_lossy(&echo_line));
                                    echo_line.clear();
                                }
                            }
                            SimAction::Echo { byte, expected: None } => {
                                debug!("[SIM] Unsolicited byte {:#04x}", byte);
                            }
                        }
                    }
                }
                if !was_streaming && radio.mode() == SimMode::Streaming {
                    info!("[SIM] Entered streaming mode");
                }
            }

            _ = sleep_until(connect_at.unwrap_or_else(Instant::now)), if connect_at.is_some() => {
                connect_at = None;
                if let Some(notice) = radio.connect() {
                    info!("[SIM] Peer connected");
                    writer.write_all(&notice).await?;
                }
            }

            _ = payload_ticker.tick() => {
                if let Some(payload) = radio.next_payload() {
                    writer.write_all(&payload).await?;
                    debug!("[SIM] {} bytes awaiting echo", radio.outstanding());
                }
            }
        }
    }
}
