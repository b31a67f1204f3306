//! TCP stand-in for the radio UART, used against the radio simulator

use crate::peripheral::traits::{LinkStream, PeripheralConnector};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::info;

impl LinkStream for TcpStream {}

/// Connector for the simulated radio
pub struct TcpSimConnector {
    address: String,
}

impl TcpSimConnector {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

#[async_trait]
impl PeripheralConnector for TcpSimConnector {
    type Stream = TcpStream;

    async fn open(&self) -> Result<Self::Stream> {
        info!("[SIM] Connecting to simulated radio at {}", self.address);
        let stream = TcpStream::connect(&self.address)
            .await
            .with_context(|| format!("failed to reach radio simulator at {}", self.address))?;
        // One byte per write; don't let Nagle batch the echo
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "Radio simulation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_connector_name() {
        let sim = TcpSimConnector::new("127.0.0.1:9000".into());
        assert_eq!(sim.name(), "Radio simulation");
    }

    #[tokio::test]
    async fn test_open_and_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"OK").await.unwrap();
            let mut buf = [0u8; 2];
            socket.read_exact(&mut buf).await.unwrap();
            buf
        });

        let mut stream = TcpSimConnector::new(addr.to_string()).open().await.unwrap();
        let mut buf = [0u8; 2];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"OK");
        stream.write_all(b"hi").await.unwrap();
        stream.close().await.unwrap();

        assert_eq!(&server.await.unwrap(), b"hi");
    }
}
