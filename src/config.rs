//! Bridge configuration
//!
//! All protocol parameters are constants; only device selection and the
//! optional handshake bound come from the environment.

use crate::peripheral::{LineEnding, SerialSettings};
use anyhow::{Context, Result};
use std::time::Duration;

/// Serial device path of the radio; unset selects the simulator
pub const ENV_RADIO_PORT: &str = "SPP_BRIDGE_RADIO_PORT";
/// Serial device path for the console; unset selects stdout
pub const ENV_CONSOLE_PORT: &str = "SPP_BRIDGE_CONSOLE_PORT";
/// Seconds to wait for each handshake token; unset waits forever
pub const ENV_HANDSHAKE_TIMEOUT: &str = "SPP_BRIDGE_HANDSHAKE_TIMEOUT_SECS";

/// Where the radio is reached
#[derive(Debug, Clone, PartialEq)]
pub enum RadioLinkConfig {
    /// Real module on a UART with RTS/CTS
    Serial { port: String, settings: SerialSettings },
    /// `radio-sim` over TCP (for development)
    TcpSimulation { address: String },
}

impl Default for RadioLinkConfig {
    fn default() -> Self {
        Self::TcpSimulation {
            address: "127.0.0.1:9000".into(),
        }
    }
}

/// Where status lines and forwarded bytes are shown
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConsoleConfig {
    /// Process stdout
    #[default]
    Stdout,
    /// A second UART
    Serial { port: String, settings: SerialSettings },
}

impl ConsoleConfig {
    /// Serial terminals expect CRLF
    pub fn line_ending(&self) -> LineEnding {
        match self {
            ConsoleConfig::Stdout => LineEnding::Lf,
            ConsoleConfig::Serial { .. } => LineEnding::CrLf,
        }
    }
}

/// Configuration for the bridge binary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BridgeConfig {
    /// Radio interface
    pub radio: RadioLinkConfig,
    /// Debug console
    pub console: ConsoleConfig,
    /// Bound on each handshake wait
    pub handshake_timeout: Option<Duration>,
}

impl BridgeConfig {
    /// Build from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup(ENV_RADIO_PORT).filter(|p| !p.is_empty()) {
            config.radio = RadioLinkConfig::Serial {
                port,
                settings: SerialSettings::radio(),
            };
        }

        if let Some(port) = lookup(ENV_CONSOLE_PORT).filter(|p| !p.is_empty()) {
            config.console = ConsoleConfig::Serial {
                port,
                settings: SerialSettings::console(),
            };
        }

        if let Some(raw) = lookup(ENV_HANDSHAKE_TIMEOUT) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be whole seconds, got {:?}", ENV_HANDSHAKE_TIMEOUT, raw))?;
            // Zero keeps the unbounded wait
            config.handshake_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.radio,
            RadioLinkConfig::TcpSimulation {
                address: "127.0.0.1:9000".into()
            }
        );
        assert_eq!(config.console, ConsoleConfig::Stdout);
        assert!(config.handshake_timeout.is_none());
    }

    #[test]
    fn test_empty_environment_is_default() {
        let config = BridgeConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_serial_ports() {
        let config = BridgeConfig::from_lookup(lookup_from(&[
            (ENV_RADIO_PORT, "/dev/ttyUSB0"),
            (ENV_CONSOLE_PORT, "/dev/ttyUSB1"),
        ]))
        .unwrap();

        assert_eq!(
            config.radio,
            RadioLinkConfig::Serial {
                port: "/dev/ttyUSB0".into(),
                settings: SerialSettings::radio(),
            }
        );
        assert_eq!(config.console.line_ending(), LineEnding::CrLf);
    }

    #[test]
    fn test_handshake_timeout() {
        let config =
            BridgeConfig::from_lookup(lookup_from(&[(ENV_HANDSHAKE_TIMEOUT, " 30 ")])).unwrap();
        assert_eq!(config.handshake_timeout, Some(Duration::from_secs(30)));

        let config = BridgeConfig::from_lookup(lookup_from(&[(ENV_HANDSHAKE_TIMEOUT, "0")])).unwrap();
        assert_eq!(config.handshake_timeout, None);

        let err = BridgeConfig::from_lookup(lookup_from(&[(ENV_HANDSHAKE_TIMEOUT, "soon")]));
        assert!(err.is_err());
    }
}
