//! Streaming Bridge State Machine
//!
//! Defines valid handshake transitions from boot to streaming.

use std::fmt;

use crate::protocol;

/// Handshake progress of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeState {
    /// Radio configured, waiting for a peer to connect
    AwaitingConnection,
    /// Peer connected, stream mode request being sent
    RequestingStreamMode,
    /// Stream mode requested, waiting for the radio to acknowledge
    AwaitingStreamAck,
    /// Raw byte forwarding; never left
    Streaming,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeState::AwaitingConnection => write!(f, "AwaitingConnection"),
            BridgeState::RequestingStreamMode => write!(f, "RequestingStreamMode"),
            BridgeState::AwaitingStreamAck => write!(f, "AwaitingStreamAck"),
            BridgeState::Streaming => write!(f, "Streaming"),
        }
    }
}

/// Literals the radio emits that drive the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `+RCC`: a remote device connected
    Connected,
    /// `OK`: command acknowledged
    Ok,
}

impl Token {
    /// Bytes of the literal on the wire
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Token::Connected => protocol::TOKEN_CONNECTED,
            Token::Ok => protocol::TOKEN_OK,
        }
    }
}

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A token was fully observed on the radio link
    TokenObserved(Token),
    /// The stream mode request was fully written
    CommandSent,
}

/// Result of a state transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition was valid and state changed
    Success(BridgeState),
    /// Event is not expected in the current state
    Invalid { from: BridgeState, event: BridgeEvent },
}

/// The handshake state machine
#[derive(Debug)]
pub struct BridgeStateMachine {
    current_state: BridgeState,
}

impl Default for BridgeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeStateMachine {
    /// Create a new state machine waiting for a connection
    pub fn new() -> Self {
        Self {
            current_state: BridgeState::AwaitingConnection,
        }
    }

    /// Get current state
    pub fn state(&self) -> BridgeState {
        self.current_state
    }

    /// Token the current state is waiting for, if any
    pub fn expected_token(&self) -> Option<Token> {
        match self.current_state {
            BridgeState::AwaitingConnection => Some(Token::Connected),
            BridgeState::AwaitingStreamAck => Some(Token::Ok),
            BridgeState::RequestingStreamMode | BridgeState::Streaming => None,
        }
    }

    /// Process an event and return the transition result
    pub fn process_event(&mut self, event: BridgeEvent) -> TransitionResult {
        match self.get_next_state(&event) {
            Some(state) => {
                self.current_state = state;
                TransitionResult::Success(state)
            }
            None => TransitionResult::Invalid {
                from: self.current_state,
                event,
            },
        }
    }

    fn get_next_state(&self, event: &BridgeEvent) -> Option<BridgeState> {
        use BridgeEvent::*;
        use BridgeState::*;

        match (self.current_state, event) {
            (AwaitingConnection, TokenObserved(Token::Connected)) => Some(RequestingStreamMode),
            (RequestingStreamMode, CommandSent) => Some(AwaitingStreamAck),
            (AwaitingStreamAck, TokenObserved(Token::Ok)) => Some(Streaming),

            // Streaming is terminal; everything else is out of order
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let fsm = BridgeStateMachine::new();
        assert_eq!(fsm.state(), BridgeState::AwaitingConnection);
        assert_eq!(fsm.expected_token(), Some(Token::Connected));
    }

    #[test]
    fn test_handshake_flow() {
        let mut fsm = BridgeStateMachine::new();

        let result = fsm.process_event(BridgeEvent::TokenObserved(Token::Connected));
        assert_eq!(result, TransitionResult::Success(BridgeState::RequestingStreamMode));
        assert_eq!(fsm.expected_token(), None);

        let result = fsm.process_event(BridgeEvent::CommandSent);
        assert_eq!(result, TransitionResult::Success(BridgeState::AwaitingStreamAck));
        assert_eq!(fsm.expected_token(), Some(Token::Ok));

        let result = fsm.process_event(BridgeEvent::TokenObserved(Token::Ok));
        assert_eq!(result, TransitionResult::Success(BridgeState::Streaming));
    }

    #[test]
    fn test_ok_before_connection_is_invalid() {
        let mut fsm = BridgeStateMachine::new();

        // Bootstrap replies arrive before +RCC and must not advance anything
        let result = fsm.process_event(BridgeEvent::TokenObserved(Token::Ok));
        assert!(matches!(result, TransitionResult::Invalid { .. }));
        assert_eq!(fsm.state(), BridgeState::AwaitingConnection);
    }

    #[test]
    fn test_ack_requires_command_sent() {
        let mut fsm = BridgeStateMachine::new();
        fsm.process_event(BridgeEvent::TokenObserved(Token::Connected));

        let result = fsm.process_event(BridgeEvent::TokenObserved(Token::Ok));
        assert_eq!(
            result,
            TransitionResult::Invalid {
                from: BridgeState::RequestingStreamMode,
                event: BridgeEvent::TokenObserved(Token::Ok),
            }
        );
    }

    #[test]
    fn test_streaming_is_terminal() {
        let mut fsm = BridgeStateMachine::new();
        fsm.process_event(BridgeEvent::TokenObserved(Token::Connected));
        fsm.process_event(BridgeEvent::CommandSent);
        fsm.process_event(BridgeEvent::TokenObserved(Token::Ok));

        for event in [
            BridgeEvent::TokenObserved(Token::Connected),
            BridgeEvent::TokenObserved(Token::Ok),
            BridgeEvent::CommandSent,
        ] {
            assert!(matches!(fsm.process_event(event), TransitionResult::Invalid { .. }));
            assert_eq!(fsm.state(), BridgeState::Streaming);
        }
    }
}
