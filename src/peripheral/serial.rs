//! UART peripheral initialization backed by tokio-serial

use crate::peripheral::traits::{LinkStream, PeripheralConnector};
use anyhow::{Context, Result};
use async_trait::async_trait;
use spp_bridge_shared::protocol;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::info;

/// Line settings for one UART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    /// Baud rate
    pub baud: u32,
    /// Word length
    pub data_bits: DataBits,
    /// Parity
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
    /// RTS/CTS handling
    pub flow_control: FlowControl,
}

impl SerialSettings {
    /// 9600 8N1 with RTS/CTS, as the radio expects
    pub fn radio() -> Self {
        Self {
            baud: protocol::RADIO_BAUD,
            flow_control: FlowControl::Hardware,
            ..Default::default()
        }
    }

    /// 115200 8N1 without flow control
    pub fn console() -> Self {
        Self {
            baud: protocol::CONSOLE_BAUD,
            ..Default::default()
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud: protocol::CONSOLE_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

impl LinkStream for SerialStream {}

/// Connector that configures and enables a serial port
pub struct SerialConnector {
    path: String,
    settings: SerialSettings,
    name: &'static str,
}

impl SerialConnector {
    /// Connector for the radio UART
    pub fn new_radio(path: String, settings: SerialSettings) -> Self {
        Self {
            path,
            settings,
            name: "Radio UART",
        }
    }

    /// Connector for the debug console UART
    pub fn new_console(path: String, settings: SerialSettings) -> Self {
        Self {
            path,
            settings,
            name: "Console UART",
        }
    }
}

#[async_trait]
impl PeripheralConnector for SerialConnector {
    type Stream = SerialStream;

    async fn open(&self) -> Result<Self::Stream> {
        let s = &self.settings;
        info!(
            "[UART] Opening {} at {} baud ({:?}, {:?}, {:?}, flow {:?})",
            self.path, s.baud, s.data_bits, s.parity, s.stop_bits, s.flow_control
        );

        let stream = tokio_serial::new(&self.path, s.baud)
            .data_bits(s.data_bits)
            .parity(s.parity)
            .stop_bits(s.stop_bits)
            .flow_control(s.flow_control)
            .open_native_async()
            .with_context(|| format!("failed to open serial port {}", self.path))?;
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radio_settings() {
        let s = SerialSettings::radio();
        assert_eq!(s.baud, 9600);
        assert_eq!(s.data_bits, DataBits::Eight);
        assert_eq!(s.parity, Parity::None);
        assert_eq!(s.stop_bits, StopBits::One);
        assert_eq!(s.flow_control, FlowControl::Hardware);
    }

    #[test]
    fn test_console_settings() {
        let s = SerialSettings::console();
        assert_eq!(s.baud, 115_200);
        assert_eq!(s.flow_control, FlowControl::None);
    }

    #[test]
    fn test_connector_names() {
        let radio = SerialConnector::new_radio("/dev/ttyUSB0".into(), SerialSettings::radio());
        assert_eq!(radio.name(), "Radio UART");
        assert_eq!(radio.settings.baud, 9600);

        let console = SerialConnector::new_console("/dev/ttyUSB1".into(), SerialSettings::console());
        assert_eq!(console.name(), "Console UART");
    }

    #[tokio::test]
    async fn test_open_missing_port_fails() {
        let connector = SerialConnector::new_radio(
            "/dev/spp-bridge-does-not-exist".into(),
            SerialSettings::radio(),
        );
        let err = connector.open().await.err().expect("open should fail");
        assert!(err.to_string().contains("spp-bridge-does-not-exist"));
    }
}
