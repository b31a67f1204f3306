//! Line codec for radio commands
//!
//! Every command travels on the wire as:
//! ```text
//! [ N bytes: ASCII command text ][ 2 bytes: "\r\n" ]
//! ```
//!
//! The radio treats the terminator as the end of a command, so the text
//! itself may never contain CR or LF.

use std::borrow::Cow;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::protocol;

/// Terminator appended to every command
pub const LINE_TERMINATOR: &[u8; 2] = b"\r\n";

/// Errors that can occur when building a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command text contains a line terminator at byte {position}")]
    EmbeddedTerminator { position: usize },

    #[error("Command text is empty")]
    Empty,
}

/// An immutable command line sent to the radio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: Cow<'static, str>,
}

impl Command {
    /// Build a command from arbitrary text, rejecting embedded terminators
    pub fn new(text: impl Into<Cow<'static, str>>) -> Result<Self, CommandError> {
        let text = text.into();
        if text.is_empty() {
            return Err(CommandError::Empty);
        }
        if let Some(position) = text.bytes().position(|b| b == b'\r' || b == b'\n') {
            return Err(CommandError::EmbeddedTerminator { position });
        }
        Ok(Self { text })
    }

    /// Build a command from one of the protocol constants
    ///
    /// Only used with literals from [`protocol`]; those are covered by tests.
    pub const fn from_static(text: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(text),
        }
    }

    /// Command text without the terminator
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length on the wire including the terminator
    pub fn encoded_len(&self) -> usize {
        self.text.len() + LINE_TERMINATOR.len()
    }

    /// Encode the command into a terminated byte buffer
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Encode the command directly into a provided buffer
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_slice(self.text.as_bytes());
        buf.put_slice(LINE_TERMINATOR);
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Configuration commands issued at startup, in transmission order
pub static BOOTSTRAP_SEQUENCE: [Command; 6] = [
    Command::from_static(protocol::CMD_RESET),
    Command::from_static(protocol::CMD_SECURITY),
    Command::from_static(protocol::CMD_NAME),
    Command::from_static(protocol::CMD_DISCOVERABLE),
    Command::from_static(protocol::CMD_REGISTER_SPP),
    Command::from_static(protocol::CMD_AUTO_ACCEPT),
];

/// Streaming mode request
pub static STREAM_REQUEST: Command = Command::from_static(protocol::CMD_STREAM);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_appends_single_terminator() {
        let cmd = Command::new("AT+JRES").expect("valid command");
        assert_eq!(&cmd.encode()[..], b"AT+JRES\r\n");
        assert_eq!(cmd.encoded_len(), 9);
    }

    #[test]
    fn test_all_protocol_commands_have_exactly_one_terminator() {
        let all = BOOTSTRAP_SEQUENCE.iter().chain(std::iter::once(&STREAM_REQUEST));
        for cmd in all {
            // Revalidate the unchecked constants
            assert_eq!(Command::new(cmd.text().to_string()).as_ref(), Ok(cmd));

            let encoded = cmd.encode();
            assert!(encoded.ends_with(LINE_TERMINATOR), "{} lacks CRLF", cmd);
            let body = &encoded[..encoded.len() - 2];
            assert!(
                !body.iter().any(|&b| b == b'\r' || b == b'\n'),
                "{} has a terminator mid-string",
                cmd
            );
        }
    }

    #[test]
    fn test_bootstrap_order() {
        let texts: Vec<&str> = BOOTSTRAP_SEQUENCE.iter().map(Command::text).collect();
        assert_eq!(
            texts,
            [
                "AT+JRES",
                "AT+JSEC=1,2,2,04,1234",
                "AT+JSLN=09,dashboard",
                "AT+JDIS=3",
                "AT+JRLS=1101,11,Serial port,01,000000",
                "AT+JAAC=1",
            ]
        );
    }

    #[test]
    fn test_rejects_embedded_terminator() {
        assert_eq!(
            Command::new("AT+JRES\r\nAT+JDIS=3"),
            Err(CommandError::EmbeddedTerminator { position: 7 })
        );
        assert_eq!(
            Command::new("AT\n"),
            Err(CommandError::EmbeddedTerminator { position: 2 })
        );
        assert_eq!(Command::new(""), Err(CommandError::Empty));
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buf = BytesMut::new();
        BOOTSTRAP_SEQUENCE[0].encode_into(&mut buf);
        STREAM_REQUEST.encode_into(&mut buf);
        assert_eq!(&buf[..], b"AT+JRES\r\nAT+JSCR\r\n");
    }
}
