//! Link Bootstrapper
//!
//! Puts the radio into discoverable, auto-accept SPP mode by writing the fixed
//! configuration sequence. Nothing the radio answers is read here: replies
//! stay on the link and are skipped by the bridge while it waits for `+RCC`.

use crate::peripheral::Console;
use crate::radio::link::RadioLink;
use spp_bridge_shared::command::BOOTSTRAP_SEQUENCE;
use spp_bridge_shared::protocol;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

/// Transmit the configuration sequence in order, without waiting for replies
pub async fn initialize_radio<S, W>(link: &mut RadioLink<S>, console: &mut Console<W>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    console.status("Enabling bluetooth").await?;

    for command in BOOTSTRAP_SEQUENCE.iter() {
        link.send_command(command).await?;

        match command.text() {
            protocol::CMD_DISCOVERABLE => {
                console.status("Enabled service discovery").await?;
            }
            protocol::CMD_AUTO_ACCEPT => {
                console.status("Auto accepting connection requests...").await?;
            }
            _ => {}
        }
    }

    info!(
        "[RADIO] Issued {} configuration commands (name={}, pin={})",
        BOOTSTRAP_SEQUENCE.len(),
        protocol::DEVICE_NAME,
        protocol::PIN
    );
    Ok(())
}
