//! Peripheral trait abstraction for pluggable byte links

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// An enabled interface that can read and write bytes
///
/// Any tokio byte stream qualifies; the only addition is an orderly close
/// once the bridge gives up on the link.
#[async_trait]
pub trait LinkStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {
    /// Flush pending output and release the interface
    async fn close(&mut self) -> Result<()> {
        AsyncWriteExt::shutdown(self).await?;
        Ok(())
    }
}

/// Factory that configures and enables an interface
#[async_trait]
pub trait PeripheralConnector: Send + Sync {
    /// The stream type this connector produces
    type Stream: LinkStream;

    /// Configure and enable the interface; byte I/O is valid once this returns
    async fn open(&self) -> Result<Self::Stream>;

    /// Human-readable name for this interface
    fn name(&self) -> &'static str;
}
