//! Debug console text output

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Line ending for status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`, for a host terminal
    #[default]
    Lf,
    /// `\r\n`, for a serial terminal
    CrLf,
}

impl LineEnding {
    fn bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Human-readable output to the debug console
///
/// Status lines get the configured line ending; forwarded bytes are written
/// raw and untranslated.
pub struct Console<W> {
    out: W,
    line_ending: LineEnding,
}

impl<W: AsyncWrite + Unpin> Console<W> {
    pub fn new(out: W, line_ending: LineEnding) -> Self {
        Self { out, line_ending }
    }

    /// Write one status line and flush
    pub async fn status(&mut self, line: &str) -> io::Result<()> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(self.line_ending.bytes()).await?;
        self.out.flush().await
    }

    /// Write one raw byte and flush
    pub async fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.out.write_all(&[byte]).await?;
        self.out.flush().await
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
