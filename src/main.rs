mod config;
mod peripheral;
mod radio;

use anyhow::{Context, Result};
use config::{BridgeConfig, ConsoleConfig, RadioLinkConfig};
use peripheral::{Console, LinkStream, PeripheralConnector, SerialConnector, TcpSimConnector};
use radio::{initialize_radio, RadioLink, StreamingBridge};
use tokio::io::AsyncWrite;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type ConsoleWriter = Box<dyn AsyncWrite + Send + Unpin>;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the console stream
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = BridgeConfig::from_env()?;

    info!("SPP bridge starting");
    info!("  Radio: {:?}", config.radio);
    info!("  Console: {:?}", config.console);
    match config.handshake_timeout {
        Some(limit) => info!("  Handshake timeout: {:?}", limit),
        None => info!("  Handshake timeout: none"),
    }

    let console = open_console(&config.console).await?;

    match &config.radio {
        RadioLinkConfig::Serial { port, settings } => {
            let connector = SerialConnector::new_radio(port.clone(), *settings);
            run(connector, console, &config).await
        }
        RadioLinkConfig::TcpSimulation { address } => {
            let connector = TcpSimConnector::new(address.clone());
            run(connector, console, &config).await
        }
    }
}

/// Open the text output service
async fn open_console(config: &ConsoleConfig) -> Result<Console<ConsoleWriter>> {
    let writer: ConsoleWriter = match config {
        ConsoleConfig::Stdout => Box::new(tokio::io::stdout()),
        ConsoleConfig::Serial { port, settings } => {
            let connector = SerialConnector::new_console(port.clone(), *settings);
            Box::new(connector.open().await?)
        }
    };
    Ok(Console::new(writer, config.line_ending()))
}

/// Bring up the radio, bootstrap it and bridge until the link fails
async fn run<C: PeripheralConnector>(
    connector: C,
    mut console: Console<ConsoleWriter>,
    config: &BridgeConfig,
) -> Result<()> {
    let stream = connector.open().await?;
    info!("[RADIO] {} enabled", connector.name());

    let mut link = RadioLink::new(stream);
    initialize_radio(&mut link, &mut console)
        .await
        .context("radio bootstrap failed")?;

    let mut bridge = StreamingBridge::new(config.handshake_timeout);
    let err = match bridge.run(&mut link, &mut console).await {
        Ok(never) => match never {},
        Err(e) => e,
    };

    error!("[BRIDGE] Stopped in {}: {}", err.state(), err);
    if let Err(e) = link.get_mut().close().await {
        error!("[RADIO] Shutdown failed: {}", e);
    }
    Err(err.into())
}
