//! Errors surfaced by the bridge

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::state_machine::{BridgeEvent, BridgeState};

/// Errors that stop the bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Timed out after {waited:?} in {state}")]
    Timeout { state: BridgeState, waited: Duration },

    #[error("Radio link closed in {state}")]
    LinkClosed { state: BridgeState },

    #[error("Unexpected {event:?} in {from}")]
    InvalidTransition { from: BridgeState, event: BridgeEvent },

    #[error("Forwarding requested before streaming, in {state}")]
    NotStreaming { state: BridgeState },

    #[error("I/O error in {state}: {source}")]
    Io {
        state: BridgeState,
        #[source]
        source: io::Error,
    },
}

impl BridgeError {
    /// Map an I/O error, treating end-of-stream as a closed link
    pub fn from_io(state: BridgeState, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            BridgeError::LinkClosed { state }
        } else {
            BridgeError::Io { state, source }
        }
    }

    /// State the bridge was in when it failed
    pub fn state(&self) -> BridgeState {
        match self {
            BridgeError::Timeout { state, .. }
            | BridgeError::LinkClosed { state }
            | BridgeError::NotStreaming { state }
            | BridgeError::Io { state, .. } => *state,
            BridgeError::InvalidTransition { from, .. } => *from,
        }
    }

    /// Whether retrying the failed wait could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }
}
