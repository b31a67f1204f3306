//! Streaming Bridge
//!
//! Waits for a peer to connect, switches the radio into streaming mode and
//! then echoes every received byte to the console and back to the radio.

use crate::peripheral::Console;
use crate::radio::link::RadioLink;
use spp_bridge_shared::command::STREAM_REQUEST;
use spp_bridge_shared::{
    BridgeError, BridgeEvent, BridgeState, BridgeStateMachine, Token, TransitionResult,
};
use std::convert::Infallible;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;
use tracing::{debug, info};

/// Drives the handshake and the forwarding loop
#[derive(Debug)]
pub struct StreamingBridge {
    fsm: BridgeStateMachine,
    /// Bound on each token wait; `None` waits forever
    handshake_timeout: Option<Duration>,
}

impl StreamingBridge {
    pub fn new(handshake_timeout: Option<Duration>) -> Self {
        Self {
            fsm: BridgeStateMachine::new(),
            handshake_timeout,
        }
    }

    /// Current handshake state
    pub fn state(&self) -> BridgeState {
        self.fsm.state()
    }

    /// Run the handshake and then forward bytes until the link fails
    pub async fn run<S, W>(
        &mut self,
        link: &mut RadioLink<S>,
        console: &mut Console<W>,
    ) -> Result<Infallible, BridgeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.establish(link, console).await?;
        self.forward(link, console).await
    }

    /// Advance the handshake from wherever it stands until `Streaming`
    ///
    /// Safe to call again after a timeout: it resumes the wait that timed
    /// out, and the stream request is only written once.
    pub async fn establish<S, W>(
        &mut self,
        link: &mut RadioLink<S>,
        console: &mut Console<W>,
    ) -> Result<(), BridgeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            match (self.state(), self.fsm.expected_token()) {
                (_, Some(token)) => {
                    if token == Token::Connected {
                        info!("[BRIDGE] Waiting for a connection");
                    }
                    self.await_token(link, token).await?;
                    self.announce(console, token).await?;
                }
                (BridgeState::RequestingStreamMode, None) => {
                    link.send_command(&STREAM_REQUEST)
                        .await
                        .map_err(|e| BridgeError::from_io(BridgeState::RequestingStreamMode, e))?;
                    self.transition(BridgeEvent::CommandSent)?;
                }
                (_, None) => return Ok(()),
            }
        }
    }

    /// Console lines printed once `token` has been accepted
    async fn announce<W>(&self, console: &mut Console<W>, token: Token) -> Result<(), BridgeError>
    where
        W: AsyncWrite + Unpin,
    {
        let lines: &[&str] = match token {
            Token::Connected => &["Received connection request", "Entering streaming mode..."],
            Token::Ok => &["Entered streaming mode", ""],
        };
        for line in lines {
            console
                .status(line)
                .await
                .map_err(|e| BridgeError::from_io(self.state(), e))?;
        }
        Ok(())
    }

    /// Echo loop; only returns on a link or console failure
    async fn forward<S, W>(
        &mut self,
        link: &mut RadioLink<S>,
        console: &mut Console<W>,
    ) -> Result<Infallible, BridgeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        W: AsyncWrite + Unpin,
    {
        let state = self.state();
        if state != BridgeState::Streaming {
            return Err(BridgeError::NotStreaming { state });
        }

        let mut forwarded: u64 = 0;
        loop {
            let byte = link
                .read_byte()
                .await
                .map_err(|e| self.forward_error(e, forwarded))?;
            console
                .put_byte(byte)
                .await
                .map_err(|e| self.forward_error(e, forwarded))?;
            link.write_byte(byte)
                .await
                .map_err(|e| self.forward_error(e, forwarded))?;
            forwarded += 1;
        }
    }

    fn forward_error(&self, e: std::io::Error, forwarded: u64) -> BridgeError {
        debug!("[BRIDGE] Forwarding stopped after {} bytes", forwarded);
        BridgeError::from_io(self.state(), e)
    }

    /// Wait for `token`, honoring the optional bound, then advance the machine
    async fn await_token<S>(&mut self, link: &mut RadioLink<S>, token: Token) -> Result<(), BridgeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let state = self.state();
        let wait = link.wait_for(token.bytes());

        let result = match self.handshake_timeout {
            Some(limit) => match timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(BridgeError::Timeout {
                        state,
                        waited: limit,
                    })
                }
            },
            None => wait.await,
        };
        result.map_err(|e| BridgeError::from_io(state, e))?;

        self.transition(BridgeEvent::TokenObserved(token))
    }

    fn transition(&mut self, event: BridgeEvent) -> Result<(), BridgeError> {
        let from = self.fsm.state();
        match self.fsm.process_event(event) {
            TransitionResult::Success(to) => {
                info!("[BRIDGE] {} -> {}", from, to);
                Ok(())
            }
            TransitionResult::Invalid { from, event } => {
                Err(BridgeError::InvalidTransition { from, event })
            }
        }
    }
}
