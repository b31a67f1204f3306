//! Byte-level access to the radio UART

use spp_bridge_shared::{Command, TokenMatcher};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Exclusive handle on the radio interface
///
/// Reads are unbuffered: every call pulls exactly the bytes it returns, so
/// nothing the radio sends is held back from the next consumer.
pub struct RadioLink<S> {
    inner: S,
}

impl<S: AsyncRead + AsyncWrite + Unpin> RadioLink<S> {
    pub fn new(stream: S) -> Self {
        Self { inner: stream }
    }

    /// Write a terminated command line and flush it out
    pub async fn send_command(&mut self, command: &Command) -> io::Result<()> {
        debug!("[RADIO] > {}", command);
        self.inner.write_all(&command.encode()).await?;
        self.inner.flush().await
    }

    /// Block until one byte arrives; end-of-stream is `UnexpectedEof`
    pub async fn read_byte(&mut self) -> io::Result<u8> {
        self.inner.read_u8().await
    }

    /// Write one byte and flush it out
    pub async fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_all(&[byte]).await?;
        self.inner.flush().await
    }

    /// Consume bytes until `token` has been seen, returning how many bytes
    /// were read including the token itself
    pub async fn wait_for(&mut self, token: &'static [u8]) -> io::Result<usize> {
        let mut matcher = TokenMatcher::new(token);
        let mut consumed = 0usize;
        while !matcher.is_complete() {
            let byte = self.read_byte().await?;
            consumed += 1;
            matcher.feed(byte);
        }
        debug!(
            "[RADIO] < {} after {} bytes",
            String::from_utf8_lossy(token),
            consumed
        );
        Ok(consumed)
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spp_bridge_shared::command::STREAM_REQUEST;

    #[tokio::test]
    async fn test_send_command_is_terminated() {
        let (near, mut far) = tokio::io::duplex(64);
        let mut link = RadioLink::new(near);
        link.send_command(&STREAM_REQUEST).await.unwrap();
        drop(link);

        let mut out = Vec::new();
        far.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"AT+JSCR\r\n");
    }

    #[tokio::test]
    async fn test_wait_for_skips_noise() {
        let (near, mut far) = tokio::io::duplex(64);
        far.write_all(b"OK\r\n+R+RCCRCV=1\r\n").await.unwrap();

        let mut link = RadioLink::new(near);
        assert_eq!(link.wait_for(b"+RCC").await.unwrap(), 10);
        // Bytes after the token stay unread
        assert_eq!(link.read_byte().await.unwrap(), b'R');
    }

    #[tokio::test]
    async fn test_wait_for_eof() {
        let (near, mut far) = tokio::io::duplex(64);
        far.write_all(b"+RC").await.unwrap();
        drop(far);

        let mut link = RadioLink::new(near);
        let err = link.wait_for(b"+RCC").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
