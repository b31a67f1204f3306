//! Simulated radio module
//!
//! Answers the command set the bridge uses, announces a peer connection once
//! auto-accept is enabled, and in streaming mode checks that whatever it
//! sends comes back unchanged.

use bytes::Bytes;
use spp_bridge_shared::{protocol, LINE_TERMINATOR};
use std::collections::VecDeque;

/// Notification written when the simulated peer connects
pub const CONNECT_NOTICE: &[u8] = b"+RCCRCV=0016A4000001,01\r\n";

const REPLY_OK: &[u8] = b"OK\r\n";
const REPLY_ERROR: &[u8] = b"ERROR\r\n";

/// Longest command line kept before the buffer is discarded
const MAX_LINE: usize = 128;

/// Operating mode of the simulated module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Parsing CRLF-terminated AT commands
    Command,
    /// Raw payload
    Streaming,
}

/// What the network loop should do after feeding a byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimAction {
    /// Write these bytes to the bridge
    Send(Bytes),
    /// Auto-accept was enabled; a peer should connect shortly
    ScheduleConnect,
    /// A streaming byte came back; `expected` is what was sent in its place
    Echo { byte: u8, expected: Option<u8> },
}

/// Protocol state of the simulated module
#[derive(Debug)]
pub struct SimRadio {
    mode: SimMode,
    line: Vec<u8>,
    auto_accept: bool,
    connected: bool,
    outstanding: VecDeque<u8>,
    payloads_sent: u64,
}

impl Default for SimRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRadio {
    pub fn new() -> Self {
        Self {
            mode: SimMode::Command,
            line: Vec::with_capacity(MAX_LINE),
            auto_accept: false,
            connected: false,
            outstanding: VecDeque::new(),
            payloads_sent: 0,
        }
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of payload bytes not yet echoed back
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Process one byte from the bridge
    pub fn feed(&mut self, byte: u8) -> Vec<SimAction> {
        match self.mode {
            SimMode::Streaming => vec![SimAction::Echo {
                byte,
                expected: self.outstanding.pop_front(),
            }],
            SimMode::Command => {
                self.line.push(byte);
                if self.line.ends_with(LINE_TERMINATOR) {
                    let len = self.line.len() - LINE_TERMINATOR.len();
                    let line = String::from_utf8_lossy(&self.line[..len]).into_owned();
                    self.line.clear();
                    self.handle_command(&line)
                } else {
                    if self.line.len() > MAX_LINE {
                        self.line.clear();
                    }
                    Vec::new()
                }
            }
        }
    }

    /// Simulate the peer connecting; returns the notification to send
    pub fn connect(&mut self) -> Option<Bytes> {
        if !self.auto_accept || self.connected {
            return None;
        }
        self.connected = true;
        Some(Bytes::from_static(CONNECT_NOTICE))
    }

    /// Next payload line to push while streaming
    pub fn next_payload(&mut self) -> Option<Bytes> {
        if self.mode != SimMode::Streaming {
            return None;
        }
        self.payloads_sent += 1;
        let line = format!("ping {}\r\n", self.payloads_sent);
        self.outstanding.extend(line.bytes());
        Some(Bytes::from(line))
    }

    fn handle_command(&mut self, line: &str) -> Vec<SimAction> {
        let ok = SimAction::Send(Bytes::from_static(REPLY_OK));
        match line {
            protocol::CMD_RESET => {
                self.auto_accept = false;
                self.connected = false;
                vec![ok]
            }
            protocol::CMD_AUTO_ACCEPT => {
                self.auto_accept = true;
                vec![ok, SimAction::ScheduleConnect]
            }
            protocol::CMD_STREAM if self.connected => {
                self.mode = SimMode::Streaming;
                vec![ok]
            }
            protocol::CMD_STREAM => vec![SimAction::Send(Bytes::from_static(REPLY_ERROR))],
            other if other.starts_with("AT+") => vec![ok],
            _ => vec![SimAction::Send(Bytes::from_static(REPLY_ERROR))],
        }
    }
}
