//! Console UART transmit task
//!
//! Writes reply lines queued by the other tasks.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::REPLY_CHANNEL;

/// Console TX task - sends reply lines to the host
#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx) {
    info!("Console TX task started");

    loop {
        let line = REPLY_CHANNEL.receive().await;
        let result = match tx.write_all(line.as_bytes()).await {
            Ok(()) => tx.write_all(b"\r\n").await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("Failed to send reply: {:?}", e);
        }
    }
}
