//! SPP Bridge Shared Protocol Types
//!
//! This crate provides the radio wire protocol, the token matcher and the
//! bridge state machine shared by the bridge binary and the radio simulator.

pub mod command;
pub mod error;
pub mod matcher;
pub mod state_machine;

// Re-export commonly used types at crate root
pub use command::{Command, CommandError, LINE_TERMINATOR};
pub use error::BridgeError;
pub use matcher::TokenMatcher;
pub use state_machine::{BridgeEvent, BridgeState, BridgeStateMachine, Token, TransitionResult};

/// Fixed parameters of the radio module protocol
pub mod protocol {
    /// Baud rate of the radio UART
    pub const RADIO_BAUD: u32 = 9600;

    /// Baud rate of the debug console UART
    pub const CONSOLE_BAUD: u32 = 115_200;

    /// Fixed pairing PIN
    pub const PIN: &str = "1234";

    /// Friendly device name advertised during discovery
    pub const DEVICE_NAME: &str = "dashboard";

    /// Soft reset
    pub const CMD_RESET: &str = "AT+JRES";

    /// Security mode 1 with the fixed PIN
    pub const CMD_SECURITY: &str = "AT+JSEC=1,2,2,04,1234";

    /// Friendly name (length-prefixed)
    pub const CMD_NAME: &str = "AT+JSLN=09,dashboard";

    /// Make the device discoverable
    pub const CMD_DISCOVERABLE: &str = "AT+JDIS=3";

    /// Register a local service record for the serial port profile (UUID 0x1101)
    pub const CMD_REGISTER_SPP: &str = "AT+JRLS=1101,11,Serial port,01,000000";

    /// Auto accept inbound connection requests
    pub const CMD_AUTO_ACCEPT: &str = "AT+JAAC=1";

    /// Request streaming mode
    pub const CMD_STREAM: &str = "AT+JSCR";

    /// Notification prefix sent by the radio when a peer connects
    pub const TOKEN_CONNECTED: &[u8] = b"+RCC";

    /// Acknowledgement of the streaming mode request
    pub const TOKEN_OK: &[u8] = b"OK";
}

#[cfg(test)]
mod tests {
    use super::protocol::*;

    #[test]
    fn test_name_command_carries_length_prefix() {
        let prefix = format!("{:02}", DEVICE_NAME.len());
        assert_eq!(CMD_NAME, format!("AT+JSLN={},{}", prefix, DEVICE_NAME));
    }

    #[test]
    fn test_security_command_carries_pin() {
        assert!(CMD_SECURITY.ends_with(PIN));
    }
}
