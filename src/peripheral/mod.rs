//! Peripheral services consumed by the bridge
//!
//! This module handles:
//! - Configuring and enabling the radio and console interfaces
//! - A TCP stand-in for the radio when running against the simulator
//! - Text output to the debug console

pub mod console;
pub mod serial;
pub mod tcp;
pub mod traits;

pub use console::{Console, LineEnding};
pub use serial::{SerialConnector, SerialSettings};
pub use tcp::TcpSimConnector;
pub use traits::{LinkStream, PeripheralConnector};
