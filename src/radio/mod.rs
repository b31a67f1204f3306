//! Radio Module
//!
//! Drives a PAN1321 class SPP radio over its UART: configuration at boot,
//! the connection handshake, and the streaming echo loop.

mod bootstrap;
mod bridge;
mod link;

pub use bootstrap::initialize_radio;
pub use bridge::StreamingBridge;
pub use link::RadioLink;
